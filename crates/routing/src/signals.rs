//! Signal catalogue: named pattern groups used to classify questions and
//! retrieved context.
//!
//! Matching is case-insensitive substring/pattern search over raw text,
//! not full-text parsing. All patterns are compiled once at first use and
//! shared across requests.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! signal {
    ($name:ident, $pattern:expr) => {
        pub static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("signal pattern must compile"));
    };
}

// Smalltalk (anchored: the whole question is the pleasantry)
signal!(
    GREETING,
    r"(?i)^(hi|hello|hey|good morning|good afternoon|good evening|how are you)\W*$"
);
signal!(THANKS, r"(?i)^(thanks|thank you|thx|bye|goodbye)\W*$");
signal!(PRAISE, r"(?i)^(nice response|good answer|that helps|great)\W*$");

// Programme guard: the similarly named MDes programme is out of scope
signal!(
    MDES,
    r"(?i)\b(mdes|master\s+of\s+design|integrated\s+design)\b"
);

// Requirement intent (kept conservative)
signal!(
    REQUIREMENT,
    r"(?i)\b(required|required for admission|admission requirement|is .* mandatory|requirement)\b"
);
signal!(WH_PREFIX, r"(?i)^\s*(when|where|how|what|which)\b");

// Suitability / candidate profile
signal!(
    SUITABILITY,
    r"(?i)\b(good fit|fit for|suitable|eligible|my background|background)\b"
);
signal!(
    SUITABILITY_PROFILE,
    r"(?i)\b(kind of candidate|who thrives|who tends to thrive|who is suited|who should apply|profile of students)\b"
);

// Intake / dates
signal!(INTAKE, r"(?i)\b(intake|matriculat\w*|cohort)\b");
signal!(
    PROGRAMME_START,
    r"(?i)\b(programme\s+start|program\s+start|start\s+date|classes\s+begin|when\s+does\s+edi\s+start)\b"
);
signal!(
    APPLICATION_PERIOD,
    r"(?i)\b(application\s+period|application\s+window|applications?\s+open|applications?\s+close|apply\s+by|deadline)\b"
);

// Policy / process
signal!(
    REAPPLICATION,
    r"(?i)\b(reapply|re-apply|apply again|second attempt|try again)\b"
);
signal!(
    OFFER_OUTCOME,
    r"(?i)\b(not accept|do not accept|dont accept|decline|reject|lapse|expire|miss the acceptance deadline|what happens if.*accept)\b"
);

// Logistics
signal!(
    ARRIVAL,
    r"(?i)\b(arrive|arrival|reach|come to nus|on campus|move to singapore)\b"
);
signal!(VISA, r"(?i)\bvisa\b|\bstudent\s*pass\b|\bimmigration\b");
// Visa process questions must mention visa explicitly, in either clause order
signal!(
    VISA_PROCESS,
    r"(?i)(visa|student\s*pass|immigration).*(apply|application|process|procedure|how)|(apply|application|process|procedure|how).*(visa|student\s*pass|immigration)"
);
signal!(
    LOGISTICS,
    r"(?i)\b(visa|student pass|immigration|ipa|entry permit|arrive|arrival|on campus|move to singapore)\b"
);

/// A named, immutable group of patterns matched against retrieved context.
pub struct SignalGroup {
    name: &'static str,
    patterns: LazyLock<Vec<Regex>>,
}

impl SignalGroup {
    /// Group name, used for logging.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if any pattern in the group matches the text.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

fn compile_group(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("signal pattern must compile"))
        .collect()
}

/// Phrases indicating a hard admission requirement in context text.
pub static HARD_REQUIREMENT: SignalGroup = SignalGroup {
    name: "hard-requirement",
    patterns: LazyLock::new(|| {
        compile_group(&[
            r"(?i)\bis required\b",
            r"(?i)\bmust have\b",
            r"(?i)\bminimum requirement\b",
            r"(?i)\bapplicants must\b",
        ])
    }),
};

/// Phrases indicating inclusive programme positioning in context text.
pub static POSITIONING: SignalGroup = SignalGroup {
    name: "positioning",
    patterns: LazyLock::new(|| {
        compile_group(&[
            r"(?i)\bengineers?\b.*\bdesigners?\b.*\binnovators?\b",
            r"(?i)\binterdisciplin(ar|ary)\b",
            r"(?i)\bmulti[-\s]?disciplin(ar|ary)\b",
            r"(?i)\bvaried backgrounds?\b",
            r"(?i)\bopen to\b.*\bbackgrounds?\b",
        ])
    }),
};
