// All LLM prompt constants for the style guide module.

/// System prompt for style guide summarization.
pub const STYLE_SUMMARY_SYSTEM: &str = "You are a style guide analyzer. \
    Extract and summarize style rules from the provided style guide into concise, \
    prescriptive bullet-style rules (300-600 words). \
    Focus on actionable copy editing rules that can be used to identify errors in articles. \
    Return your response as a JSON object with a 'summary' field containing the rules summary.";

/// Style guide summarization prompt. Replace `{name}` and `{text}` before sending.
pub const STYLE_SUMMARY_PROMPT_TEMPLATE: &str = "Please analyze this style guide and create a concise summary of its rules.

Style guide name: {name}

{text}";
