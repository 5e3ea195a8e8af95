//! Declarative structure matching for composed menus.
//!
//! # Purpose
//!
//! Tests describe the shape a [`ComposedMenu`](toolmenus_registry::ComposedMenu) should have
//! as a [`MenuPattern`] built with the DSL in [`pattern`], then check it with [`matches`] or
//! [`match_menu`] under a set of [`MatchRules`].
//!
//! # Tiers
//!
//! Sections and entries are matched independently, each under its own [`TierRules`]. Entry
//! patterns are only checked inside the actual section their section pattern matched.
//!
//! # Invariants
//!
//! - Matching never mutates or re-orders the composed menu.
//! - A report lists every failure found, not just the first.
//! - A wildcard is counted against the items the other patterns at its level left unmatched.

mod engine;
pub mod pattern;
mod report;
mod rules;

pub use engine::{match_menu, matches};
pub use pattern::{
	EntryPattern, MenuPattern, Occurrence, PatternNode, SectionPattern, Selector, any, any_menu, any_section, entry,
	labeled, labeled_section, menu, section, separator,
};
pub use report::{FailureKind, MatchError, MatchFailure, MatchReport, Tier};
pub use rules::{MatchRules, RulesError, TierRules};

#[cfg(test)]
mod tests;
