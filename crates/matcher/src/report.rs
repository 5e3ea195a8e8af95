use std::fmt;

use crate::pattern::Occurrence;

/// Level of the tree a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
	Menu,
	Section,
	Entry,
}

impl fmt::Display for Tier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Menu => "menu",
			Self::Section => "section",
			Self::Entry => "entry",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
	/// An expected item has no counterpart.
	Missing,
	/// The item exists but before an item matched by an earlier pattern.
	OrderMismatch,
	/// An actual item no pattern accounts for.
	Unexpected,
	/// A cardinality constraint does not hold.
	Occurrence { occurrence: Occurrence, found: usize },
	/// The menu is not the one the pattern names.
	NameMismatch,
	/// Nothing at this tier matched any expected item.
	NoneMatched,
	/// A label glob failed to compile.
	InvalidPattern(String),
}

/// One structured mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
	pub tier: Tier,
	/// Section name for entry failures; empty otherwise.
	pub path: Vec<String>,
	/// The pattern (or, for [`FailureKind::Unexpected`], the actual item) that failed.
	pub expected: String,
	pub kind: FailureKind,
	/// Up to three actual names closest to `expected`.
	pub candidates: Vec<String>,
}

impl fmt::Display for MatchFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.tier)?;
		if !self.path.is_empty() {
			write!(f, " in {}", self.path.join("/"))?;
		}
		write!(f, " {}: ", self.expected)?;
		match &self.kind {
			FailureKind::Missing => f.write_str("missing")?,
			FailureKind::OrderMismatch => f.write_str("out of order")?,
			FailureKind::Unexpected => f.write_str("not expected")?,
			FailureKind::Occurrence { occurrence, found } => {
				write!(f, "expected {occurrence:?}, found {found}")?
			}
			FailureKind::NameMismatch => f.write_str("name mismatch")?,
			FailureKind::NoneMatched => f.write_str("no expected item matched")?,
			FailureKind::InvalidPattern(error) => write!(f, "invalid pattern: {error}")?,
		}
		if !self.candidates.is_empty() {
			write!(f, " (nearest: {})", self.candidates.join(", "))?;
		}
		Ok(())
	}
}

/// Every failure found by one match run. Empty means the structures match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchReport {
	failures: Vec<MatchFailure>,
}

impl MatchReport {
	pub(crate) fn push(&mut self, failure: MatchFailure) {
		self.failures.push(failure);
	}

	pub fn is_match(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn failures(&self) -> &[MatchFailure] {
		&self.failures
	}

	/// `Ok(())` on a match, otherwise the report wrapped in a [`MatchError`].
	pub fn into_result(self) -> Result<(), MatchError> {
		if self.is_match() { Ok(()) } else { Err(MatchError(self)) }
	}
}

impl fmt::Display for MatchReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.failures.is_empty() {
			return f.write_str("menu matches");
		}
		writeln!(f, "{} mismatch(es):", self.failures.len())?;
		for failure in &self.failures {
			writeln!(f, "  - {failure}")?;
		}
		Ok(())
	}
}

/// A non-empty [`MatchReport`], for use with `?` in tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MatchError(pub MatchReport);

impl MatchError {
	pub fn report(&self) -> &MatchReport {
		&self.0
	}
}
