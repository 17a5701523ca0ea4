// Profile API: read the caller's profile and rebuild it from résumé text.

pub mod handlers;
pub mod prompts;
pub mod resume_parser;
