//! Prompt templates for the editing agents

/// Fixed system role description shared by both agents
pub const SYSTEM_PROMPT: &str =
    "You are editorAI, a large language model tasked with transcribing, correcting and summarizing text content.";

/// Editor role: clean up a transcription and summarize it, returning JSON
pub const EDITOR_PROMPT: &str = r#"1. First, read the following transcription:
<transcription>
{input}
</transcription>

2. Clean up the transcription:
   - Remove filler words (um, uh, like, you know, etc.)
   - Correct any obvious grammatical errors
   - Ensure proper capitalization and punctuation
   - Combine fragmented sentences into coherent thoughts
   - Remove any irrelevant or repetitive content

3. Summarize the cleaned-up transcription in bullet points:
   - Identify the main ideas and key points
   - Create concise bullet points that capture the essence of each main idea
   - Ensure the summary is comprehensive yet brief

4. Output your results as a JSON object in the following format:
   {
       "cleaned_transcription": "[Insert the cleaned-up transcription here]",
       "summary": "[Insert bullet point summary here]"
   }
"#;

/// Headline role: produce a short directory-name-safe headline as JSON
pub const HEADLINE_PROMPT: &str = r#"Based on the following summary, create a short, catchy headline of at most five words. The headline will be used as a directory name, so use only letters, digits and spaces.

<summary>
{input}
</summary>

Output your result as a JSON object in the following format:
   {
       "headline": "[Insert the headline here]"
   }
"#;

/// Interpolate the caller's input text into a prompt template
pub fn render(template: &str, input: &str) -> String {
    template.replace("{input}", input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_the_input() {
        let prompt = render(EDITOR_PROMPT, "um so basically it works");
        assert!(prompt.contains("um so basically it works"));
        assert!(!prompt.contains("{input}"));
    }

    #[test]
    fn editor_prompt_asks_for_both_keys() {
        assert!(EDITOR_PROMPT.contains("cleaned_transcription"));
        assert!(EDITOR_PROMPT.contains("summary"));
    }

    #[test]
    fn headline_prompt_bounds_the_word_count() {
        assert!(HEADLINE_PROMPT.contains("five words"));
        assert!(HEADLINE_PROMPT.contains("headline"));
    }
}
