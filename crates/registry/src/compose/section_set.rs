use crate::compose::placement;
use crate::model::{Entry, Section};

/// The ordered, name-keyed sections of a menu under composition.
///
/// Extenders receive this to add, remove or reorder sections and entries. Every insertion
/// honors the item's [`InsertPosition`](crate::InsertPosition).
#[derive(Debug, Clone, Default)]
pub struct SectionSet {
	menu: String,
	sections: Vec<Section>,
}

impl SectionSet {
	pub(crate) fn new(menu: impl Into<String>) -> Self {
		Self {
			menu: menu.into(),
			sections: Vec::new(),
		}
	}

	/// Name of the menu being composed.
	pub fn menu(&self) -> &str {
		&self.menu
	}

	pub fn find(&self, name: &str) -> Option<&Section> {
		self.sections.iter().find(|section| section.name == name)
	}

	pub fn find_mut(&mut self, name: &str) -> Option<&mut Section> {
		self.sections.iter_mut().find(|section| section.name == name)
	}

	/// Returns the named section, appending an empty one if it is absent.
	pub fn find_or_add(&mut self, name: &str) -> &mut Section {
		if self.index_of(name).is_none() {
			self.place_headers(vec![Section::new(name)]);
		}
		let index = self.index_of(name).unwrap_or(self.sections.len() - 1);
		&mut self.sections[index]
	}

	/// Merges `section` into the set.
	///
	/// A new section is placed by its insert position; an existing one keeps its header
	/// (filling unset fields) and receives the entries by their own positions.
	pub fn add_section(&mut self, section: Section) -> &mut Section {
		let name = section.name.clone();
		self.merge(vec![section]);
		let index = self.index_of(&name).unwrap_or(self.sections.len() - 1);
		&mut self.sections[index]
	}

	pub fn remove_section(&mut self, name: &str) -> Option<Section> {
		let index = self.index_of(name)?;
		Some(self.sections.remove(index))
	}

	/// Places `entry` into `section`, creating the section if needed.
	pub fn insert_entry(&mut self, section: &str, entry: Entry) {
		let name = entry.name.clone();
		let menu = self.menu.clone();
		let target = self.find_or_add(section);
		if !placement::place_one(&mut target.entries, entry) {
			tracing::warn!(menu = %menu, section, entry = %name, "entry anchor not found, appended");
		}
	}

	pub fn remove_entry(&mut self, section: &str, entry: &str) -> Option<Entry> {
		self.find_mut(section)?.remove_entry(entry)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Section> {
		self.sections.iter()
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Section> {
		self.sections.iter_mut()
	}

	pub fn section_names(&self) -> Vec<&str> {
		self.sections.iter().map(|section| section.name.as_str()).collect()
	}

	pub fn len(&self) -> usize {
		self.sections.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}

	/// Merges a batch of sections, placing new headers first and then each batch's entries.
	pub(crate) fn merge(&mut self, batch: Vec<Section>) {
		let mut headers: Vec<Section> = Vec::new();
		for section in &batch {
			if let Some(index) = self.index_of(&section.name) {
				let existing = &mut self.sections[index];
				let relocate = existing.insert_position.is_default() && !section.insert_position.is_default();
				fill_header(existing, section);
				if relocate {
					headers.push(self.sections.remove(index));
				}
			} else if let Some(pending) = headers.iter_mut().find(|h| h.name == section.name) {
				fill_header(pending, section);
			} else {
				headers.push(section.header());
			}
		}
		self.place_headers(headers);

		for section in batch {
			let Some(target) = self.find_mut(&section.name) else {
				continue;
			};
			let unresolved = placement::place_all(&mut target.entries, section.entries);
			for constructor in section.constructors {
				target.add_constructor(constructor);
			}
			for entry in unresolved {
				tracing::warn!(menu = %self.menu, section = %section.name, %entry, "entry anchor not found, appended");
			}
		}
	}

	pub(crate) fn sections_mut(&mut self) -> &mut Vec<Section> {
		&mut self.sections
	}

	pub(crate) fn into_sections(self) -> Vec<Section> {
		self.sections
	}

	fn place_headers(&mut self, headers: Vec<Section>) {
		if headers.is_empty() {
			return;
		}
		for section in placement::place_all(&mut self.sections, headers) {
			tracing::warn!(menu = %self.menu, %section, "section anchor not found, appended");
		}
	}

	fn index_of(&self, name: &str) -> Option<usize> {
		self.sections.iter().position(|section| section.name == name)
	}
}

/// The first label, visibility, position and sorter to be set win.
fn fill_header(existing: &mut Section, incoming: &Section) {
	if existing.label.is_none() {
		existing.label = incoming.label.clone();
	}
	if existing.visibility.is_none() {
		existing.visibility = incoming.visibility.clone();
	}
	if existing.insert_position.is_default() {
		existing.insert_position = incoming.insert_position.clone();
	}
	if existing.sorter.is_none() {
		existing.sorter = incoming.sorter.clone();
	}
}
