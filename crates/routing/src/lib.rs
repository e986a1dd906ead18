//! Deterministic intent routing for EDI admissions questions.
//!
//! This crate is the pre-filter in front of retrieval-augmented generation:
//! - `signals`: the catalogue of named classification patterns
//! - `extract`: noun-phrase extraction for requirement questions
//! - `fallbacks`: the static catalogue of canned response texts
//! - `route`: the ordered first-match-wins rule chain
//!
//! Everything here is pure and synchronous: no I/O, no shared mutable
//! state, safe to call concurrently across requests.

pub mod extract;
pub mod fallbacks;
pub mod route;
pub mod signals;

// Re-export the routing surface
pub use extract::extract_required_thing;
pub use route::{route, route_with, select_fallback, PendingRoute, RouteDecision, RouteOutcome};
