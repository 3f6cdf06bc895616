// Prompt constants for the generative fallbacks used during matching.
// Replace `{text}` before sending.

/// System prompt shared by every fallback: terse plain text, no commentary.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a precise assistant that reads resumes and job descriptions. \
    Answer with plain text only. \
    Do NOT use markdown. \
    Do NOT include explanations or apologies.";

pub const SKILLS_PROMPT: &str = "List the technical and soft skills, comma separated, present in this text:\n\n{text}";

pub const EXPERIENCE_PROMPT: &str = "From the following resume text, estimate how many years of professional \
    experience the candidate has. If not clear, answer 0.\n\n{text}";

pub const ACRONYM_PROMPT: &str = "Expand acronyms and shortforms in the following professional resume text \
    (keep everything else same):\n\n{text}";

pub fn render(template: &str, text: &str) -> String {
    template.replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_text() {
        let prompt = render(SKILLS_PROMPT, "Rust, Kafka");
        assert!(prompt.ends_with("Rust, Kafka"));
        assert!(!prompt.contains("{text}"));
    }
}
