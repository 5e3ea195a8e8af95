use std::fmt;

/// How an item is placed relative to its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InsertRelation {
	/// Append, but stay ahead of items placed with [`InsertRelation::Last`].
	#[default]
	Default,
	/// Directly before the anchor.
	Before,
	/// Directly after the anchor (and after earlier items placed after the same anchor).
	After,
	/// Ahead of everything except earlier [`InsertRelation::First`] items.
	First,
	/// At the very end.
	Last,
}

/// Relative placement directive for a section or entry.
///
/// Anchors are resolved during composition against siblings that are already placed.
/// An anchor that never appears degrades to [`InsertRelation::Default`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InsertPosition {
	pub anchor: Option<String>,
	pub relation: InsertRelation,
}

impl InsertPosition {
	pub fn before(anchor: impl Into<String>) -> Self {
		Self {
			anchor: Some(anchor.into()),
			relation: InsertRelation::Before,
		}
	}

	pub fn after(anchor: impl Into<String>) -> Self {
		Self {
			anchor: Some(anchor.into()),
			relation: InsertRelation::After,
		}
	}

	pub const fn first() -> Self {
		Self {
			anchor: None,
			relation: InsertRelation::First,
		}
	}

	pub const fn last() -> Self {
		Self {
			anchor: None,
			relation: InsertRelation::Last,
		}
	}

	#[inline]
	pub fn is_default(&self) -> bool {
		self.relation == InsertRelation::Default
	}

	#[inline]
	pub fn anchor(&self) -> Option<&str> {
		self.anchor.as_deref()
	}
}

impl fmt::Display for InsertPosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (self.relation, self.anchor()) {
			(InsertRelation::Before, Some(anchor)) => write!(f, "before {anchor:?}"),
			(InsertRelation::After, Some(anchor)) => write!(f, "after {anchor:?}"),
			(InsertRelation::Before | InsertRelation::After, None) => write!(f, "{:?} <no anchor>", self.relation),
			(InsertRelation::First, _) => f.write_str("first"),
			(InsertRelation::Last, _) => f.write_str("last"),
			(InsertRelation::Default, _) => f.write_str("default"),
		}
	}
}
