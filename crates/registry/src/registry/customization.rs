use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::compose::SectionSet;

/// Runtime edits layered over a composed menu: hidden items and explicit ordering.
///
/// Held in memory only. Customizations of every menu in a hierarchy are flattened ancestor
/// first, so a descendant's ordering overrides an ancestor's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuCustomization {
	hidden_sections: HashSet<String>,
	hidden_entries: HashSet<String>,
	section_order: Vec<String>,
	entry_order: HashMap<String, Vec<String>>,
}

impl MenuCustomization {
	pub fn hide_section(&mut self, name: impl Into<String>) -> &mut Self {
		self.hidden_sections.insert(name.into());
		self
	}

	pub fn show_section(&mut self, name: &str) -> &mut Self {
		self.hidden_sections.remove(name);
		self
	}

	/// Hides entries named `name` in every section.
	pub fn hide_entry(&mut self, name: impl Into<String>) -> &mut Self {
		self.hidden_entries.insert(name.into());
		self
	}

	pub fn show_entry(&mut self, name: &str) -> &mut Self {
		self.hidden_entries.remove(name);
		self
	}

	/// Sections named here come first, in this order; the rest keep their relative order.
	pub fn set_section_order(&mut self, order: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
		self.section_order = order.into_iter().map(Into::into).collect();
		self
	}

	pub fn set_entry_order(
		&mut self,
		section: impl Into<String>,
		order: impl IntoIterator<Item = impl Into<String>>,
	) -> &mut Self {
		self.entry_order
			.insert(section.into(), order.into_iter().map(Into::into).collect());
		self
	}

	pub fn is_section_hidden(&self, name: &str) -> bool {
		self.hidden_sections.contains(name)
	}

	pub fn is_entry_hidden(&self, name: &str) -> bool {
		self.hidden_entries.contains(name)
	}

	pub fn is_empty(&self) -> bool {
		self.hidden_sections.is_empty()
			&& self.hidden_entries.is_empty()
			&& self.section_order.is_empty()
			&& self.entry_order.is_empty()
	}

	/// Folds `other` (closer to the leaf) over `self`.
	pub(crate) fn merge(&mut self, other: &Self) {
		self.hidden_sections.extend(other.hidden_sections.iter().cloned());
		self.hidden_entries.extend(other.hidden_entries.iter().cloned());
		if !other.section_order.is_empty() {
			self.section_order = other.section_order.clone();
		}
		for (section, order) in &other.entry_order {
			self.entry_order.insert(section.clone(), order.clone());
		}
	}

	pub(crate) fn apply(&self, set: &mut SectionSet) {
		let sections = set.sections_mut();
		sections.retain(|section| !self.hidden_sections.contains(&section.name));
		reorder(sections, &self.section_order, |section| section.name.as_str());

		for section in sections.iter_mut() {
			section
				.entries
				.retain(|entry| entry.is_anonymous() || !self.hidden_entries.contains(&entry.name));
			if let Some(order) = self.entry_order.get(&section.name) {
				reorder(&mut section.entries, order, |entry| entry.name.as_str());
			}
		}
	}
}

/// Moves the items named in `order` to the front, in that order. Stable for the rest.
fn reorder<T>(items: &mut Vec<T>, order: &[String], name: impl Fn(&T) -> &str) {
	if order.is_empty() {
		return;
	}
	let rank = |item: &T| {
		order
			.iter()
			.position(|wanted| wanted == name(item))
			.unwrap_or(order.len())
	};
	items.sort_by_key(|item| rank(item));
}
