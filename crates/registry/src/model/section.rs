use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::{Attribute, Entry, InsertPosition, OwnerToken};
use crate::context::Context;
use crate::contribution::{DynamicEntries, EntryConstructor};

/// Comparator applied (stably) to a section's entries after placement.
pub(crate) type SectionSorter = dyn Fn(&Entry, &Entry, &Context<'_>) -> Ordering;

/// A named, ordered group of entries.
#[derive(Clone)]
pub struct Section {
	pub name: String,
	pub label: Option<Attribute<String>>,
	pub visibility: Option<Attribute<bool>>,
	pub insert_position: InsertPosition,
	pub(crate) entries: Vec<Entry>,
	pub(crate) constructors: Vec<EntryConstructor>,
	pub(crate) sorter: Option<Arc<SectionSorter>>,
	pub(crate) owner: Option<OwnerToken>,
	pub(crate) registered: bool,
}

impl Section {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			visibility: None,
			insert_position: InsertPosition::default(),
			entries: Vec::new(),
			constructors: Vec::new(),
			sorter: None,
			owner: None,
			registered: false,
		}
	}

	pub fn with_label(mut self, label: impl Into<Attribute<String>>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_visibility(mut self, visibility: impl Into<Attribute<bool>>) -> Self {
		self.visibility = Some(visibility.into());
		self
	}

	pub fn with_insert_position(mut self, position: InsertPosition) -> Self {
		self.insert_position = position;
		self
	}

	pub fn with_entry(mut self, entry: Entry) -> Self {
		self.add_entry(entry);
		self
	}

	pub fn with_entries(mut self, entries: impl IntoIterator<Item = Entry>) -> Self {
		for entry in entries {
			self.add_entry(entry);
		}
		self
	}

	pub fn with_sorter(
		mut self,
		sorter: impl Fn(&Entry, &Entry, &Context<'_>) -> Ordering + 'static,
	) -> Self {
		self.sorter = Some(Arc::new(sorter));
		self
	}

	pub fn with_owner(mut self, owner: OwnerToken) -> Self {
		self.owner = Some(owner);
		self
	}

	/// Adds `entry`, replacing an existing entry of the same non-empty name in place.
	pub fn add_entry(&mut self, entry: Entry) -> &mut Self {
		match self.position_of(&entry.name) {
			Some(index) => self.entries[index] = entry,
			None => self.entries.push(entry),
		}
		self
	}

	/// Attaches a constructor that produces entries at composition time.
	///
	/// A constructor with the same name replaces the earlier one.
	pub fn add_dynamic_entries(
		&mut self,
		name: impl Into<String>,
		construct: impl DynamicEntries + 'static,
	) -> &mut Self {
		self.add_constructor(EntryConstructor::new(name, Arc::new(construct)));
		self
	}

	pub(crate) fn add_constructor(&mut self, constructor: EntryConstructor) {
		match self.constructors.iter().position(|c| c.name == constructor.name) {
			Some(index) => self.constructors[index] = constructor,
			None => self.constructors.push(constructor),
		}
	}

	pub fn remove_entry(&mut self, name: &str) -> Option<Entry> {
		let index = self.position_of(name)?;
		Some(self.entries.remove(index))
	}

	pub fn find_entry(&self, name: &str) -> Option<&Entry> {
		self.position_of(name).map(|index| &self.entries[index])
	}

	pub fn find_entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
		self.position_of(name).map(|index| &mut self.entries[index])
	}

	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Direct access for callers that need to reorder entries arbitrarily.
	pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
		&mut self.entries
	}

	pub fn entry_names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|entry| entry.name.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn has_constructors(&self) -> bool {
		!self.constructors.is_empty()
	}

	pub fn owner(&self) -> Option<&OwnerToken> {
		self.owner.as_ref()
	}

	fn position_of(&self, name: &str) -> Option<usize> {
		if name.is_empty() {
			return None;
		}
		self.entries.iter().position(|entry| entry.name == name)
	}

	/// Copy of the section's header (name, label, visibility, position) with no entries.
	pub(crate) fn header(&self) -> Self {
		Self {
			name: self.name.clone(),
			label: self.label.clone(),
			visibility: self.visibility.clone(),
			insert_position: self.insert_position.clone(),
			entries: Vec::new(),
			constructors: Vec::new(),
			sorter: self.sorter.clone(),
			owner: self.owner.clone(),
			registered: self.registered,
		}
	}

	/// Removes everything contributed by `owner`. Returns the number of items removed.
	pub(crate) fn remove_owned(&mut self, owner: &OwnerToken) -> usize {
		let before = self.entries.len() + self.constructors.len();
		self.entries.retain(|entry| entry.owner.as_ref() != Some(owner));
		self.constructors.retain(|constructor| constructor.owner.as_ref() != Some(owner));
		before - self.entries.len() - self.constructors.len()
	}
}

impl fmt::Debug for Section {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Section")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("insert_position", &self.insert_position)
			.field("entries", &self.entries)
			.field("constructors", &self.constructors)
			.field("sorted", &self.sorter.is_some())
			.field("owner", &self.owner)
			.finish()
	}
}
