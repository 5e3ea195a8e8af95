//! Fully resolved composition output.
//!
//! Nothing here is lazy. A [`ComposedMenu`] is a throwaway value owned by the caller; the
//! registry never stores one.

use serde::Serialize;

use crate::model::{CheckState, MenuKind, WidgetHandle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComposedEntryKind {
	Action { command: Option<String> },
	Separator,
	Widget { handle: WidgetHandle },
	/// Fully resolved name of the menu this entry opens.
	Submenu { menu: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedEntry {
	pub name: String,
	pub kind: ComposedEntryKind,
	pub label: Option<String>,
	pub tooltip: Option<String>,
	pub checked: Option<CheckState>,
	pub enabled: bool,
}

impl ComposedEntry {
	pub fn is_separator(&self) -> bool {
		matches!(self.kind, ComposedEntryKind::Separator)
	}

	/// The submenu this entry opens, if it is a submenu entry.
	pub fn submenu(&self) -> Option<&str> {
		match &self.kind {
			ComposedEntryKind::Submenu { menu } => Some(menu),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ComposedSection {
	pub name: String,
	pub label: Option<String>,
	pub entries: Vec<ComposedEntry>,
}

impl ComposedSection {
	pub fn find_entry(&self, name: &str) -> Option<&ComposedEntry> {
		self.entries.iter().find(|entry| entry.name == name)
	}

	pub fn entry_names(&self) -> Vec<&str> {
		self.entries.iter().map(|entry| entry.name.as_str()).collect()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ComposedMenu {
	pub name: String,
	pub kind: MenuKind,
	pub sections: Vec<ComposedSection>,
}

impl ComposedMenu {
	/// An empty menu, produced when the requested menu does not exist.
	pub fn empty(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn is_empty(&self) -> bool {
		self.sections.iter().all(|section| section.entries.is_empty())
	}

	pub fn find_section(&self, name: &str) -> Option<&ComposedSection> {
		self.sections.iter().find(|section| section.name == name)
	}

	/// First entry named `name` in any section.
	pub fn find_entry(&self, name: &str) -> Option<&ComposedEntry> {
		self.sections.iter().find_map(|section| section.find_entry(name))
	}

	pub fn section_names(&self) -> Vec<&str> {
		self.sections.iter().map(|section| section.name.as_str()).collect()
	}

	/// Entry names of section `section`, or an empty list if it is absent.
	pub fn entry_names(&self, section: &str) -> Vec<&str> {
		self.find_section(section)
			.map(ComposedSection::entry_names)
			.unwrap_or_default()
	}

	pub fn entries(&self) -> impl Iterator<Item = &ComposedEntry> {
		self.sections.iter().flat_map(|section| section.entries.iter())
	}
}
