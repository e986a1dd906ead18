//! Output repair for EDI Assist answers.
//!
//! Two independent, pure text transforms:
//! - `sanitize`: cleans raw generated text and guarantees minimum content,
//!   substituting a caller-supplied fallback for degenerate output
//! - `markdown`: line-oriented layout repair that never alters wording and
//!   treats fenced code regions as opaque
//!
//! Both are synchronous, stateless, and safe to call concurrently.

pub mod markdown;
pub mod sanitize;

pub use markdown::normalize;
pub use sanitize::sanitize;
