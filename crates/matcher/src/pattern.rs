//! Expected-structure patterns and the builder DSL.
//!
//! ```
//! use toolmenus_matcher::{any, entry, menu, section, separator, PatternNode};
//!
//! let expected = menu(
//! 	"Main",
//! 	[
//! 		section("File", [entry("Open"), separator(), any()]),
//! 		section("Help", [entry("About").optional()]),
//! 	],
//! );
//! assert_eq!(expected.sections.len(), 2);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cardinality constraint on a pattern node, evaluated against the actual items not yet
/// consumed by earlier patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
	/// Exactly one match is consumed.
	#[default]
	ExactlyOne,
	/// Zero or more; every match is consumed.
	Any,
	/// Every remaining item must match.
	All,
	/// No remaining item may match.
	ExactlyZero,
	/// At least one; every match is consumed.
	OneOrMore,
}

/// What a pattern node compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
	/// Exact name equality.
	Name(String),
	/// Glob over the item's label.
	Label(String),
	/// Entries of kind separator, whatever their name.
	Separator,
	/// Any item. Counted against what the other patterns leave behind.
	Wildcard,
}

impl Selector {
	pub fn is_wildcard(&self) -> bool {
		matches!(self, Self::Wildcard)
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Name(name) => write!(f, "{name:?}"),
			Self::Label(glob) => write!(f, "label ~ {glob:?}"),
			Self::Separator => f.write_str("<separator>"),
			Self::Wildcard => f.write_str("*"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPattern {
	pub selector: Selector,
	pub occurrence: Occurrence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPattern {
	pub selector: Selector,
	pub occurrence: Occurrence,
	/// Empty means the pattern does not say anything about entries.
	pub entries: Vec<EntryPattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuPattern {
	/// Checked against the composed menu's name when set.
	pub name: Option<String>,
	/// Empty means the pattern does not say anything about sections.
	pub sections: Vec<SectionPattern>,
}

/// Occurrence modifiers shared by section and entry patterns.
pub trait PatternNode: Sized {
	fn selector(&self) -> &Selector;
	fn occurrence(&self) -> Occurrence;
	fn occurs(self, occurrence: Occurrence) -> Self;

	/// The node must not match anything.
	fn absent(self) -> Self {
		self.occurs(Occurrence::ExactlyZero)
	}

	fn one_or_more(self) -> Self {
		self.occurs(Occurrence::OneOrMore)
	}

	/// Zero or more matches.
	fn optional(self) -> Self {
		self.occurs(Occurrence::Any)
	}

	/// Every remaining item must match.
	fn every(self) -> Self {
		self.occurs(Occurrence::All)
	}
}

impl PatternNode for EntryPattern {
	fn selector(&self) -> &Selector {
		&self.selector
	}

	fn occurrence(&self) -> Occurrence {
		self.occurrence
	}

	fn occurs(mut self, occurrence: Occurrence) -> Self {
		self.occurrence = occurrence;
		self
	}
}

impl PatternNode for SectionPattern {
	fn selector(&self) -> &Selector {
		&self.selector
	}

	fn occurrence(&self) -> Occurrence {
		self.occurrence
	}

	fn occurs(mut self, occurrence: Occurrence) -> Self {
		self.occurrence = occurrence;
		self
	}
}

/// A menu pattern checked against the composed menu named `name`.
pub fn menu(name: impl Into<String>, sections: impl IntoIterator<Item = SectionPattern>) -> MenuPattern {
	MenuPattern {
		name: Some(name.into()),
		sections: sections.into_iter().collect(),
	}
}

/// A menu pattern that ignores the menu's name.
pub fn any_menu(sections: impl IntoIterator<Item = SectionPattern>) -> MenuPattern {
	MenuPattern {
		name: None,
		sections: sections.into_iter().collect(),
	}
}

pub fn section(name: impl Into<String>, entries: impl IntoIterator<Item = EntryPattern>) -> SectionPattern {
	SectionPattern {
		selector: Selector::Name(name.into()),
		occurrence: Occurrence::ExactlyOne,
		entries: entries.into_iter().collect(),
	}
}

/// A section matched by a glob over its label.
pub fn labeled_section(glob: impl Into<String>, entries: impl IntoIterator<Item = EntryPattern>) -> SectionPattern {
	SectionPattern {
		selector: Selector::Label(glob.into()),
		occurrence: Occurrence::ExactlyOne,
		entries: entries.into_iter().collect(),
	}
}

/// Wildcard section, zero or more by default.
pub fn any_section() -> SectionPattern {
	SectionPattern {
		selector: Selector::Wildcard,
		occurrence: Occurrence::Any,
		entries: Vec::new(),
	}
}

pub fn entry(name: impl Into<String>) -> EntryPattern {
	EntryPattern {
		selector: Selector::Name(name.into()),
		occurrence: Occurrence::ExactlyOne,
	}
}

/// An entry matched by a glob over its label.
pub fn labeled(glob: impl Into<String>) -> EntryPattern {
	EntryPattern {
		selector: Selector::Label(glob.into()),
		occurrence: Occurrence::ExactlyOne,
	}
}

/// Wildcard entry, zero or more by default. Use [`PatternNode::occurs`] to require an
/// exact count.
pub fn any() -> EntryPattern {
	EntryPattern {
		selector: Selector::Wildcard,
		occurrence: Occurrence::Any,
	}
}

pub fn separator() -> EntryPattern {
	EntryPattern {
		selector: Selector::Separator,
		occurrence: Occurrence::ExactlyOne,
	}
}
