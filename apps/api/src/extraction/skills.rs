//! Skill Extractor: approximate, heuristic skill/keyword sets.
//!
//! Three candidate sources are unioned before cleanup:
//! 1. phrase heuristics: runs of content words between punctuation and
//!    stopwords, kept when 2–40 characters and at most 4 words
//! 2. a fixed table of domain patterns (languages, tools), case-insensitive
//! 3. an optional generative fallback listing skills as delimited text

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::llm_client::prompts::{render, SKILLS_PROMPT};
use crate::llm_client::TextGenerator;

const MIN_SPAN_CHARS: usize = 2;
const MAX_SPAN_CHARS: usize = 40;
const MAX_SKILL_WORDS: usize = 4;

const STOPWORDS: &[&str] = &[
    "a", "about", "able", "ability", "across", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "been", "being", "both", "but", "by", "can", "candidate", "could", "did", "do",
    "does", "done", "each", "either", "etc", "excellent", "experience", "experienced", "few",
    "for", "from", "good", "great", "had", "has", "have", "having", "he", "her", "here", "his",
    "how", "i", "ideal", "in", "include", "includes", "including", "into", "is", "it", "its",
    "join", "just", "least", "less", "looking", "many", "may", "me", "might", "more", "most",
    "much", "must", "my", "neither", "new", "no", "nor", "not", "of", "on", "only", "or", "other",
    "others", "our", "out", "over", "own", "per", "plus", "position", "preferred", "required",
    "requirements", "responsibilities", "responsible", "role", "same", "seeking", "shall", "she",
    "should", "so", "some", "strong", "such", "team", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "to", "under", "up", "us", "use", "used",
    "using", "very", "via", "was", "we", "well", "were", "what", "when", "where", "which", "who",
    "whom", "why", "will", "with", "within", "work", "worked", "working", "would", "year",
    "years", "yes", "yrs", "you", "your", "yours",
];

/// Canonical label and case-insensitive pattern for well-known skills.
const DOMAIN_PATTERNS: &[(&str, &str)] = &[
    ("python", r"\bpython\b"),
    ("pytorch", r"\bpytorch\b"),
    ("tensorflow", r"\btensorflow\b"),
    ("sql", r"\bsql\b"),
    ("aws", r"\baws\b"),
    ("docker", r"\bdocker\b"),
    ("kubernetes", r"\b(?:kubernetes|k8s)\b"),
    ("machine learning", r"\bmachine\s+learning\b"),
    ("deep learning", r"\bdeep\s+learning\b"),
    ("nlp", r"\bnlp\b"),
    ("rust", r"\brust\b"),
    ("java", r"\bjava\b"),
    ("javascript", r"\bjavascript\b"),
    ("typescript", r"\btypescript\b"),
    ("c++", r"\bc\+\+"),
    ("c#", r"\bc#"),
    ("react", r"\breact(?:\.js|js)?\b"),
    ("node.js", r"\bnode(?:\.js|js)\b"),
    ("postgresql", r"\b(?:postgresql|postgres)\b"),
    ("mongodb", r"\bmongodb\b"),
    ("kafka", r"\bkafka\b"),
    ("spark", r"\b(?:apache\s+)?spark\b"),
    ("terraform", r"\bterraform\b"),
    ("linux", r"\blinux\b"),
    ("git", r"\bgit\b"),
    ("gcp", r"\bgcp\b"),
    ("azure", r"\bazure\b"),
    ("graphql", r"\bgraphql\b"),
];

fn domain_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DOMAIN_PATTERNS
            .iter()
            .map(|(label, pattern)| {
                let re = Regex::new(&format!("(?i){pattern}")).expect("valid domain skill pattern");
                (*label, re)
            })
            .collect()
    })
}

fn listed_skill_delimiters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,;\n]").expect("valid delimiter pattern"))
}

/// Extracts a normalized skill set from document text.
///
/// Never fails: a missing or failing generator only removes the third
/// candidate source.
#[derive(Clone, Default)]
pub struct SkillExtractor {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SkillExtractor {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub async fn extract(&self, text: &str) -> BTreeSet<String> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }

        let mut candidates = phrase_candidates(text);
        candidates.extend(pattern_candidates(text));

        if let Some(generator) = &self.generator {
            match generator.complete(&render(SKILLS_PROMPT, text)).await {
                Ok(reply) => candidates.extend(parse_listed_skills(&reply)),
                Err(e) => warn!("skill extraction fallback failed, continuing without it: {e}"),
            }
        }

        let skills: BTreeSet<String> = candidates.iter().filter_map(|c| clean_skill(c)).collect();
        debug!("extracted {} skills from {} candidates", skills.len(), candidates.len());
        skills
    }
}

/// Runs of content words between delimiters and stopwords.
pub fn phrase_candidates(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut phrases = Vec::new();

    for segment in lowered.split(|c: char| !(c.is_alphanumeric() || c.is_whitespace() || "+#.-".contains(c))) {
        let mut run: Vec<&str> = Vec::new();
        for raw in segment.split_whitespace() {
            let ends_sentence = raw.ends_with('.');
            let token = raw.trim_matches(|c: char| c == '-' || c == '.');
            let is_content = !token.is_empty()
                && !STOPWORDS.contains(&token)
                && !token.chars().all(|c| c.is_ascii_digit() || c == '+');

            if is_content {
                run.push(token);
            } else {
                flush_run(&mut run, &mut phrases);
            }
            if ends_sentence {
                flush_run(&mut run, &mut phrases);
            }
        }
        flush_run(&mut run, &mut phrases);
    }
    phrases
}

fn flush_run(run: &mut Vec<&str>, phrases: &mut Vec<String>) {
    if run.is_empty() {
        return;
    }
    let phrase = run.join(" ");
    let chars = phrase.chars().count();
    if run.len() <= MAX_SKILL_WORDS && (MIN_SPAN_CHARS..=MAX_SPAN_CHARS).contains(&chars) {
        phrases.push(phrase);
    }
    run.clear();
}

/// Canonical labels of every domain pattern found in `text`.
pub fn pattern_candidates(text: &str) -> Vec<String> {
    domain_patterns()
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Splits a generated skill listing on commas, semicolons and newlines.
pub fn parse_listed_skills(reply: &str) -> Vec<String> {
    listed_skill_delimiters()
        .split(reply)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keeps only `[a-z0-9+#.\s-]`, collapses whitespace, and rejects results
/// shorter than 2 characters or longer than 4 words.
pub fn clean_skill(raw: &str) -> Option<String> {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || "+#.-".contains(*c))
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = collapsed
        .trim_start_matches(['-', ' '])
        .trim_end_matches(['-', '.', ' '])
        .to_string();

    let words = cleaned.split_whitespace().count();
    if cleaned.chars().count() < MIN_SPAN_CHARS || words == 0 || words > MAX_SKILL_WORDS {
        return None;
    }
    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    #[test]
    fn test_phrases_split_on_stopwords_and_punctuation() {
        let phrases = phrase_candidates("Built data pipelines with Apache Kafka, Rust and PostgreSQL.");
        assert!(phrases.contains(&"built data pipelines".to_string()));
        assert!(phrases.contains(&"apache kafka".to_string()));
        assert!(phrases.contains(&"rust".to_string()));
        assert!(phrases.contains(&"postgresql".to_string()));
    }

    #[test]
    fn test_long_runs_are_dropped() {
        let phrases = phrase_candidates("senior staff principal distributed systems platform architect");
        assert!(phrases.is_empty(), "got {phrases:?}");
    }

    #[test]
    fn test_dotted_tokens_survive() {
        let phrases = phrase_candidates("Shipped node.js services. Then more.");
        assert!(phrases.contains(&"shipped node.js services".to_string()));
        assert!(!phrases.iter().any(|p| p.ends_with('.')));
    }

    #[test]
    fn test_numbers_break_runs() {
        let phrases = phrase_candidates("5+ years python");
        assert_eq!(phrases, vec!["python".to_string()]);
    }

    #[test]
    fn test_domain_patterns_are_case_insensitive() {
        let found = pattern_candidates("Expert in PyTorch, K8s and C++; some Machine  Learning");
        assert!(found.contains(&"pytorch".to_string()));
        assert!(found.contains(&"kubernetes".to_string()));
        assert!(found.contains(&"c++".to_string()));
        assert!(found.contains(&"machine learning".to_string()));
        assert!(!found.contains(&"java".to_string()));
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let found = pattern_candidates("JavaScript only");
        assert!(found.contains(&"javascript".to_string()));
        assert!(!found.contains(&"java".to_string()));
    }

    #[test]
    fn test_parse_listed_skills_handles_all_delimiters() {
        let parsed = parse_listed_skills("Python, SQL;Docker\n  Team Leadership ,,");
        assert_eq!(parsed, vec!["python", "sql", "docker", "team leadership"]);
    }

    #[test]
    fn test_clean_skill_strips_and_filters() {
        assert_eq!(clean_skill("  C++ (advanced)!"), Some("c++ advanced".to_string()));
        assert_eq!(clean_skill("- Node.js"), Some("node.js".to_string()));
        assert_eq!(clean_skill("x"), None);
        assert_eq!(clean_skill("!!!"), None);
        assert_eq!(clean_skill("one two three four five"), None);
        assert_eq!(clean_skill("über   café"), Some("ber caf".to_string()));
    }

    #[tokio::test]
    async fn test_extract_without_generator() {
        let skills = SkillExtractor::default()
            .extract("Backend engineer. Python and SQL on AWS.")
            .await;
        assert!(skills.contains("backend engineer"));
        assert!(skills.contains("python"));
        assert!(skills.contains("sql"));
        assert!(skills.contains("aws"));
    }

    #[tokio::test]
    async fn test_extract_merges_generated_skills() {
        let generator = Arc::new(ScriptedGenerator::replying("Stakeholder Management; GraphQL"));
        let skills = SkillExtractor::new(Some(generator.clone())).extract("Python developer").await;
        assert!(skills.contains("stakeholder management"));
        assert!(skills.contains("graphql"));
        assert!(skills.contains("python developer"));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generator_failure_is_swallowed() {
        let generator = Arc::new(ScriptedGenerator::failing());
        let skills = SkillExtractor::new(Some(generator)).extract("Rust developer").await;
        assert!(skills.contains("rust"));
        assert!(skills.contains("rust developer"));
    }

    #[tokio::test]
    async fn test_blank_text_yields_empty_set_without_generator_call() {
        let generator = Arc::new(ScriptedGenerator::replying("python"));
        let skills = SkillExtractor::new(Some(generator.clone())).extract("   ").await;
        assert!(skills.is_empty());
        assert_eq!(generator.call_count(), 0);
    }
}
