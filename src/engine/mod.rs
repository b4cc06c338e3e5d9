//! Protected-region-aware line rewriting, shared by every converter.
pub mod guard;
pub mod region;
pub mod rule;
pub mod text;

pub use region::{ProtectedSpan, SpanKind, scan};
pub use rule::{Edit, Guard, Rewrite, Rule, RuleSet, Site};
