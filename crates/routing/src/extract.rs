//! Phrase extraction for requirement-style questions.
//!
//! Recovers the "required thing" noun phrase from questions shaped like
//! "Is X required?" or "Do I need X". Matching is case-insensitive and
//! anchored to the end of the question to avoid over-capturing trailing
//! clauses.

use regex::Regex;
use std::sync::LazyLock;

static IS_ARE_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:is|are)\s+(.+?)\s+(?:required|mandatory|necessary)\s*\??\s*$")
        .expect("extractor pattern must compile")
});

static NEED_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:do\s+i\s+need|must\s+i\s+have)\s+(.+?)\s*[?.!]*\s*$")
        .expect("extractor pattern must compile")
});

/// Extract the noun phrase a requirement question is asking about.
///
/// Returns `None` when neither sentence template matches.
pub fn extract_required_thing(question: &str) -> Option<String> {
    let q = question.trim();

    for template in [&*IS_ARE_TEMPLATE, &*NEED_TEMPLATE] {
        if let Some(caps) = template.captures(q) {
            let thing = caps
                .get(1)
                .map(|m| m.as_str().trim_end_matches(['?', '.', '!']).trim())
                .unwrap_or("");
            if !thing.is_empty() {
                return Some(thing.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_required_template() {
        assert_eq!(
            extract_required_thing("Is a portfolio required?"),
            Some("a portfolio".to_string())
        );
    }

    #[test]
    fn test_are_mandatory_template() {
        assert_eq!(
            extract_required_thing("Are GRE scores mandatory"),
            Some("GRE scores".to_string())
        );
    }

    #[test]
    fn test_do_i_need_template() {
        assert_eq!(
            extract_required_thing("Do I need a laptop"),
            Some("a laptop".to_string())
        );
    }

    #[test]
    fn test_must_i_have_template() {
        assert_eq!(
            extract_required_thing("Must I have work experience?"),
            Some("work experience".to_string())
        );
    }

    #[test]
    fn test_no_template_match() {
        assert_eq!(extract_required_thing("What is EDI?"), None);
        assert_eq!(extract_required_thing("Tell me about the programme"), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            extract_required_thing("IS A PORTFOLIO REQUIRED?"),
            Some("A PORTFOLIO".to_string())
        );
    }

    #[test]
    fn test_embedded_clause_anchored_to_end() {
        // The capture reaches to the requirement keyword at the end, not
        // beyond it.
        assert_eq!(
            extract_required_thing("For admission, is prior coding experience necessary?"),
            Some("prior coding experience".to_string())
        );
    }
}
