// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every system prompt; the API is called in JSON-object mode,
/// which also requires the word "JSON" to appear in the prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// The exact shape of an error record the model must produce.
pub const ERROR_RECORD_SCHEMA: &str = r#"{
      "id": "e1",
      "error_type": "grammar | spelling | punctuation | style_guide | other",
      "category": "short category like capitalization, comma, date_format, etc.",
      "rule_description": "Short description of the rule being broken",
      "original_text": "exact substring containing the error, exactly as in article",
      "suggested_correction": "corrected version of that substring",
      "explanation": "1-3 sentences explaining the rule and fix"
    }"#;

/// Joins a task-specific system prompt with the JSON-only instruction.
pub fn with_json_instruction(system: &str) -> String {
    format!("{system}\n\n{JSON_ONLY_INSTRUCTION}")
}

/// Fills `{name}` placeholders in a template in a single pass, so text inserted
/// for one placeholder is never expanded again. Unknown placeholders are left as-is.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let matched = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (close, *value))
        });
        match matched {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
