// All LLM prompt constants for the game module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Article generation system prompt.
/// Replace: {target_words}, {subject}, {tone}, {difficulty}, {num_errors}, {error_schema}
pub const GENERATE_SYSTEM_TEMPLATE: &str = r#"You are an article generator for a copy editing practice game. Generate a realistic article with intentional errors that violate both general grammar rules and the provided style guide rules.

Requirements:
- Article length: approximately {target_words} words (target under 1000 words)
- Subject: {subject}
- Tone/Style: {tone}
- Difficulty: {difficulty}
- Number of errors: {num_errors}

Error types to include:
- Grammar errors (subject-verb agreement, tense consistency, etc.)
- Spelling errors
- Punctuation errors
- Style guide violations (based on the provided style guide rules)
- Other common copy editing issues

Return a JSON object with this exact structure:
{
  "article": "full article text with errors",
  "errors": [
    {error_schema}
  ]
}

Make sure each error's original_text appears exactly as written in the article."#;

/// Replace: {rules_summary}, {num_errors}
pub const GENERATE_USER_TEMPLATE: &str = "Style Guide Rules Summary:
{rules_summary}

Generate the article with {num_errors} errors as specified.";

/// Article analysis system prompt. Replace: {error_schema}
pub const ANALYZE_SYSTEM_TEMPLATE: &str = r#"You are a copy editor reviewing an article for a copy editing practice game. Find the errors in the article the user provides: general grammar, spelling and punctuation errors, and violations of the provided style guide rules.

Do NOT rewrite the article. Report only errors that are actually present.

Return a JSON object with this exact structure:
{
  "article": "the article text exactly as provided, unchanged",
  "errors": [
    {error_schema}
  ]
}

Each error's original_text MUST be copied character for character from the article, and should be the shortest span that shows the error. List errors in the order they appear."#;

/// Replace: {rules_summary}, {article}
pub const ANALYZE_USER_TEMPLATE: &str = "Style Guide Rules Summary:
{rules_summary}

Article to analyze:
{article}

Find the errors in this article.";

pub const SCORING_SYSTEM: &str = r#"You are a copy editing evaluator. Compare the original article (with errors) against the user's edited version and the answer key. Determine which errors from the answer key have been fixed and which remain.

CRITICAL EVALUATION RULES:
1. An error is considered FIXED if:
   - The incorrect text from the answer key is no longer present in the edited article
   - The user's correction addresses the same issue, even if worded differently
   - The user's correction is grammatically correct and follows the style guide rules
   - The user fixed the error in a different but equally valid way

2. An error is considered NOT FIXED if:
   - The original incorrect text still appears in the edited article
   - The error was partially fixed but still incorrect
   - The user introduced a different error in the same location

3. Be GENEROUS with scoring - if the user fixed the error correctly (even if not exactly matching the suggested correction), mark it as fixed.

4. Count the "foundErrors" by counting how many errors in the answer key have "fixed": true.

5. Do NOT penalize for alternative correct fixes - if the user's solution is correct, it counts as fixed.

Return JSON with this exact structure:
{
  "score": {
    "foundErrors": number of errors fixed (count of perError items with fixed: true),
    "totalErrors": total number of errors in answer key,
    "percentage": percentage score (0-100)
  },
  "perError": [
    {
      "id": "e1",
      "fixed": true or false,
      "comment": "Short explanation of why this is correct/incorrect. Be specific about what was fixed or what remains wrong."
    }
  ],
  "overallFeedback": "2-5 sentences of high-level feedback about the user's editing performance"
}"#;

/// Replace: {rules_summary}, {article}, {answer_key}, {edited_article}
pub const SCORING_USER_TEMPLATE: &str = "Style Guide Rules Summary:
{rules_summary}

Original Article (with errors):
{article}

Answer Key (errors that should be fixed):
{answer_key}

User's Edited Article:
{edited_article}

Evaluate the user's edits and provide scoring.";

pub const HINT_SYSTEM: &str = r#"You are a hint generator for a copy editing practice game. Generate a helpful hint that points the user toward one of the remaining errors without revealing the exact solution.

The hint should:
- Reference the type of error and approximate location
- Not reveal the exact wording or direct solution
- Be encouraging and educational
- Point to a specific error from the answer key

Example hints:
- "Check the way the date is formatted in the first paragraph."
- "Look at capitalization of job titles in the second paragraph."
- "Review comma usage in the list near the end of the article."

Return JSON with this structure:
{
  "hint": "your hint text here"
}"#;

/// Replace: {rules_summary}, {article}, {error_metadata}
pub const HINT_USER_TEMPLATE: &str = "Style Guide Rules Summary:
{rules_summary}

Article:
{article}

Answer Key (errors to find):
{error_metadata}

Generate a helpful hint about one of the errors.";

/// Returned when the model's hint cannot be used.
pub const FALLBACK_HINT: &str =
    "Look carefully for style guide violations and grammar errors throughout the article.";

/// Stands in for the rules when a game's style guide is no longer in the store.
pub const MISSING_RULES_PLACEHOLDER: &str = "(style guide unavailable; apply general copy editing rules)";
