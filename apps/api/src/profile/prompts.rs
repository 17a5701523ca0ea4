// Prompt template for résumé extraction. `{resume_text}` is replaced verbatim.

pub const RESUME_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the following fields from the resume text. Return STRICT JSON only with keys:
- fullName (string)
- headline (string)
- skills (string[] of unique skill names)
If a field is missing, use an empty value.

Resume Text:
"""
{resume_text}
""""#;
