//! Ordered intent routing.
//!
//! The router classifies a question through a fixed-priority rule table and
//! decides how it should be answered: with a canned reply, with a direct
//! answer computed from retrieved context, by deferring to generation with a
//! chosen fallback, or by continuing to the default retrieval+generation
//! flow.
//!
//! Retrieval is expensive and rate-limited upstream, so the contract is
//! strict: at most one retrieval per routed question. The two-phase API
//! enforces this structurally: [`route`] either returns a final
//! [`RouteDecision`] or a [`PendingRoute`] that must be resolved exactly once
//! with the retrieved chunk texts.

use crate::extract::extract_required_thing;
use crate::fallbacks;
use crate::signals;

/// Final routing decision for a question. Exactly one case per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Final answer; retrieval and generation are never invoked.
    EarlyExit(String),

    /// Final answer computed from classification plus retrieved context;
    /// generation is not invoked.
    Direct(String),

    /// Proceed to generation; if its output is judged insufficient, fall
    /// back to this text.
    Defer { fallback: String },

    /// No rule fired a terminal decision; proceed to the default
    /// retrieval+generation flow with a generically selected fallback.
    Continue,
}

/// What a pending route needs context for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ContextIntent {
    /// Arrival/relocation logistics: answerable only if the index has
    /// relevant material.
    Arrival,

    /// Requirement question about `thing`; context decides yes/no/unknown.
    Requirement { thing: String },
}

/// A routing classification that needs retrieved context to finish.
///
/// Consumed by [`PendingRoute::resolve`]; ownership guarantees the caller
/// retrieves at most once per question.
#[derive(Debug)]
pub struct PendingRoute {
    intent: ContextIntent,
}

impl PendingRoute {
    /// Intent label for logging.
    pub fn intent_name(&self) -> &'static str {
        match self.intent {
            ContextIntent::Arrival => "arrival",
            ContextIntent::Requirement { .. } => "requirement",
        }
    }

    /// Finish routing with the retrieved chunk texts.
    pub fn resolve<T: AsRef<str>>(self, chunks: &[T]) -> RouteDecision {
        match self.intent {
            ContextIntent::Arrival => {
                if chunks.is_empty() {
                    RouteDecision::EarlyExit(fallbacks::NOT_FOUND.to_string())
                } else {
                    RouteDecision::Continue
                }
            }
            ContextIntent::Requirement { thing } => {
                let context = chunks
                    .iter()
                    .map(|c| c.as_ref())
                    .filter(|c| !c.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
                    .to_lowercase();

                if !context.is_empty() && signals::HARD_REQUIREMENT.matches(&context) {
                    RouteDecision::Direct(format!(
                        "Yes — {} is required for admission to MSc Engineering Design & \
                         Innovation (EDI).",
                        thing
                    ))
                } else if !context.is_empty() && signals::POSITIONING.matches(&context) {
                    RouteDecision::Direct(format!(
                        "No — {} is not a formal requirement for admission to MSc Engineering \
                         Design & Innovation (EDI). The programme is intended for applicants \
                         from varied backgrounds, and admissions are usually assessed \
                         holistically.",
                        thing
                    ))
                } else {
                    RouteDecision::Direct(fallbacks::REQUIREMENT_GENERIC.to_string())
                }
            }
        }
    }
}

/// Outcome of the first routing phase.
#[derive(Debug)]
pub enum RouteOutcome {
    /// Routing finished without needing context.
    Decided(RouteDecision),

    /// Routing needs one round of retrieved context to finish.
    NeedsContext(PendingRoute),
}

/// One entry in the priority table.
struct Rule {
    name: &'static str,
    apply: fn(&str) -> Option<RouteOutcome>,
}

/// The rule table. Order is the priority: first match wins and no later
/// rule is evaluated.
static RULES: &[Rule] = &[
    Rule {
        name: "smalltalk",
        apply: smalltalk_rule,
    },
    Rule {
        name: "programme-guard",
        apply: programme_guard_rule,
    },
    Rule {
        name: "intake",
        apply: intake_rule,
    },
    Rule {
        name: "policy",
        apply: policy_rule,
    },
    Rule {
        name: "arrival",
        apply: arrival_rule,
    },
    Rule {
        name: "requirement",
        apply: requirement_rule,
    },
    Rule {
        name: "suitability",
        apply: suitability_rule,
    },
];

/// Classify a question through the rule table.
///
/// Never fails for well-formed string input: questions no rule claims fall
/// through to `Decided(Continue)`.
pub fn route(question: &str) -> RouteOutcome {
    let q = question.trim();

    for rule in RULES {
        if let Some(outcome) = (rule.apply)(q) {
            tracing::debug!(rule = rule.name, "routing rule matched");
            return outcome;
        }
    }

    tracing::debug!("no routing rule matched, continuing to default flow");
    RouteOutcome::Decided(RouteDecision::Continue)
}

/// Single-call convenience: drives both routing phases, invoking `fetch`
/// at most once (only when the matched rule needs context).
pub fn route_with<F>(question: &str, fetch: F) -> RouteDecision
where
    F: FnOnce() -> Vec<String>,
{
    match route(question) {
        RouteOutcome::Decided(decision) => decision,
        RouteOutcome::NeedsContext(pending) => pending.resolve(&fetch()),
    }
}

/// Pick the fallback text for a question that reached generation through
/// the default flow, by re-classifying the bare question text.
pub fn select_fallback(question: &str) -> &'static str {
    let q = question.trim();

    if is_requirement_question(q) {
        fallbacks::REQUIREMENT_GENERIC
    } else if is_suitability_question(q) {
        fallbacks::SUITABILITY
    } else {
        fallbacks::NOT_FOUND
    }
}

fn is_requirement_question(q: &str) -> bool {
    signals::REQUIREMENT.is_match(q) && !signals::WH_PREFIX.is_match(q) && !signals::LOGISTICS.is_match(q)
}

fn is_suitability_question(q: &str) -> bool {
    signals::SUITABILITY.is_match(q) || signals::SUITABILITY_PROFILE.is_match(q)
}

fn early_exit(text: &str) -> Option<RouteOutcome> {
    Some(RouteOutcome::Decided(RouteDecision::EarlyExit(
        text.to_string(),
    )))
}

fn smalltalk_rule(q: &str) -> Option<RouteOutcome> {
    if signals::GREETING.is_match(q) {
        return early_exit(fallbacks::GREETING_REPLY);
    }
    if signals::THANKS.is_match(q) {
        return early_exit(fallbacks::THANKS_REPLY);
    }
    if signals::PRAISE.is_match(q) {
        return early_exit(fallbacks::PRAISE_REPLY);
    }
    None
}

fn programme_guard_rule(q: &str) -> Option<RouteOutcome> {
    if signals::MDES.is_match(q) {
        return early_exit(fallbacks::MDES_REDIRECT);
    }
    None
}

fn intake_rule(q: &str) -> Option<RouteOutcome> {
    if !signals::INTAKE.is_match(q) {
        return None;
    }
    if signals::PROGRAMME_START.is_match(q) {
        return early_exit(fallbacks::PROGRAMME_START);
    }
    if signals::APPLICATION_PERIOD.is_match(q) {
        // Application-window questions go through the normal flow
        return Some(RouteOutcome::Decided(RouteDecision::Continue));
    }
    early_exit(fallbacks::INTAKE_DISAMBIGUATION)
}

fn policy_rule(q: &str) -> Option<RouteOutcome> {
    if signals::OFFER_OUTCOME.is_match(q) {
        return early_exit(fallbacks::OFFER_OUTCOME);
    }
    if signals::REAPPLICATION.is_match(q) {
        return early_exit(fallbacks::REAPPLICATION);
    }
    // Visa process does not depend on retrieval
    if signals::VISA_PROCESS.is_match(q) {
        return early_exit(fallbacks::VISA_PROCESS);
    }
    if signals::VISA.is_match(q) {
        return early_exit(fallbacks::VISA_NEED);
    }
    None
}

fn arrival_rule(q: &str) -> Option<RouteOutcome> {
    if signals::ARRIVAL.is_match(q) {
        // Answerable only if the index has material; otherwise not-found
        return Some(RouteOutcome::NeedsContext(PendingRoute {
            intent: ContextIntent::Arrival,
        }));
    }
    None
}

fn requirement_rule(q: &str) -> Option<RouteOutcome> {
    if is_requirement_question(q) {
        let thing = extract_required_thing(q).unwrap_or_else(|| "that".to_string());
        return Some(RouteOutcome::NeedsContext(PendingRoute {
            intent: ContextIntent::Requirement { thing },
        }));
    }
    None
}

fn suitability_rule(q: &str) -> Option<RouteOutcome> {
    if is_suitability_question(q) {
        // Suitability always defers to generation; weak output degrades to
        // the profile fallback rather than an empty answer.
        return Some(RouteOutcome::Decided(RouteDecision::Defer {
            fallback: fallbacks::SUITABILITY.to_string(),
        }));
    }
    None
}
