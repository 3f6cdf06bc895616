//! Recommendation helpers: ranked skill gaps, templated bullet suggestions,
//! a learning plan, and a one-line verdict. Deliberately simple and
//! deterministic; no generative calls.

use std::collections::{BTreeMap, BTreeSet};

/// JD skills missing from the resume, ranked by how often the skill occurs in
/// the (lower-cased) job description, then alphabetically.
pub fn rank_missing_skills(
    jd_skills: &BTreeSet<String>,
    resume_skills: &BTreeSet<String>,
    jd_text: &str,
) -> Vec<String> {
    let jd_lower = jd_text.to_lowercase();
    let mut missing: Vec<(usize, &String)> = jd_skills
        .difference(resume_skills)
        .map(|skill| (jd_lower.matches(skill.as_str()).count(), skill))
        .collect();
    missing.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    missing.into_iter().map(|(_, skill)| skill.clone()).collect()
}

/// One templated bullet per missing skill, for the first `limit` skills.
pub fn bullet_suggestions(missing: &[String], limit: usize) -> BTreeMap<String, Vec<String>> {
    missing
        .iter()
        .take(limit)
        .map(|skill| (skill.clone(), vec![format!("Demonstrated experience with {skill}.")]))
        .collect()
}

/// One study line per missing skill; empty when nothing is missing.
pub fn learning_plan(missing: &[String]) -> String {
    missing
        .iter()
        .map(|skill| format!("- Study and practice {skill}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable verdict from the final score and the top gaps.
pub fn build_recommendation(final_score_pct: f64, missing: &[String]) -> String {
    let top_gaps: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    if final_score_pct >= 80.0 {
        "Strong fit. The resume directly covers the key job requirements.".to_string()
    } else if top_gaps.is_empty() {
        format!("Partial fit ({final_score_pct:.0}/100). No explicit skill gaps; strengthen how experience is described.")
    } else if final_score_pct >= 60.0 {
        format!(
            "Moderate fit ({final_score_pct:.0}/100). Consider adding evidence for: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low fit ({final_score_pct:.0}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}
