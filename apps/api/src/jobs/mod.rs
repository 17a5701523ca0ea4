// Jobs API: matches, skill gap, and the ingestion hook.

pub mod handlers;
