use std::cmp::Ordering;
use std::sync::Arc;

use crate::context::Context;
use crate::contribution::{
	Contribution, ContributionKind, DynamicEntries, DynamicSection, EntryConstructor, Extender,
};
use crate::error::RegistryError;
use crate::model::{Attribute, Entry, InsertPosition, Menu, OwnerToken, Section, stamp, stamp_entry};

/// Mutation handle for one menu, returned by [`ToolMenus::register`](crate::ToolMenus::register)
/// and [`ToolMenus::extend`](crate::ToolMenus::extend).
///
/// Everything added through it is stamped with the owner that was active when the handle
/// was created.
pub struct MenuBuilder<'r> {
	menu: &'r mut Menu,
	owner: Option<OwnerToken>,
	registering: bool,
}

impl<'r> MenuBuilder<'r> {
	pub(crate) fn new(menu: &'r mut Menu, owner: Option<OwnerToken>, registering: bool) -> Self {
		Self {
			menu,
			owner,
			registering,
		}
	}

	pub fn name(&self) -> &str {
		&self.menu.name
	}

	pub fn menu(&self) -> &Menu {
		self.menu
	}

	/// Adds `section`, merging it into an existing section of the same name.
	///
	/// # Errors
	///
	/// [`ConfigurationError::ConflictingSection`](crate::ConfigurationError::ConflictingSection)
	/// when both define a static label or a non-default position and they differ.
	pub fn add_section(&mut self, mut section: Section) -> Result<SectionBuilder<'_>, RegistryError> {
		stamp(&mut section, self.owner.as_ref(), self.registering);
		let section = self.menu.add_section(section)?;
		Ok(SectionBuilder {
			section,
			owner: self.owner.clone(),
			registering: self.registering,
		})
	}

	/// Returns the named section, adding an empty one if it does not exist.
	pub fn section(&mut self, name: &str) -> SectionBuilder<'_> {
		let index = match self.menu.sections.iter().position(|section| section.name == name) {
			Some(index) => index,
			None => {
				let mut section = Section::new(name);
				stamp(&mut section, self.owner.as_ref(), self.registering);
				self.menu.sections.push(section);
				self.menu.sections.len() - 1
			}
		};
		SectionBuilder {
			section: &mut self.menu.sections[index],
			owner: self.owner.clone(),
			registering: self.registering,
		}
	}

	/// Attaches a section computed at composition time.
	pub fn add_dynamic_section(
		&mut self,
		name: impl Into<String>,
		construct: impl DynamicSection + 'static,
	) -> &mut Self {
		self.add_dynamic_section_at(name, InsertPosition::default(), construct)
	}

	/// Like [`MenuBuilder::add_dynamic_section`], placing a new section at `position` unless
	/// the produced section picks its own.
	pub fn add_dynamic_section_at(
		&mut self,
		name: impl Into<String>,
		position: InsertPosition,
		construct: impl DynamicSection + 'static,
	) -> &mut Self {
		let kind = ContributionKind::DynamicSection {
			construct: Arc::new(construct),
			insert_position: position,
		};
		self.menu
			.add_contribution(Contribution::new(name, self.owner.clone(), kind));
		self
	}

	/// Attaches a callback that edits the assembled sections of this menu.
	pub fn add_extender(&mut self, name: impl Into<String>, extender: impl Extender + 'static) -> &mut Self {
		let kind = ContributionKind::Extender(Arc::new(extender));
		self.menu
			.add_contribution(Contribution::new(name, self.owner.clone(), kind));
		self
	}

	/// Removes every contribution called `name`. Returns whether any was removed.
	pub fn remove_contribution(&mut self, name: &str) -> bool {
		let before = self.menu.contributions.len();
		self.menu.contributions.retain(|c| c.name != name);
		before != self.menu.contributions.len()
	}

	pub fn remove_section(&mut self, name: &str) -> Option<Section> {
		self.menu.remove_section(name)
	}

	/// Disables extenders for this menu and every menu that inherits from it.
	pub fn set_extenders_enabled(&mut self, enabled: bool) -> &mut Self {
		self.menu.extenders_enabled = enabled;
		self
	}
}

/// Mutation handle for one section of a menu.
pub struct SectionBuilder<'m> {
	section: &'m mut Section,
	owner: Option<OwnerToken>,
	registering: bool,
}

impl SectionBuilder<'_> {
	pub fn section(&self) -> &Section {
		self.section
	}

	/// Adds `entry`; an entry with the same non-empty name is replaced in place.
	pub fn add_entry(&mut self, mut entry: Entry) -> &mut Self {
		stamp_entry(&mut entry, self.owner.as_ref(), self.registering);
		self.section.add_entry(entry);
		self
	}

	pub fn add_separator(&mut self, name: impl Into<String>) -> &mut Self {
		self.add_entry(Entry::separator(name))
	}

	/// Attaches a constructor whose entries are produced at composition time.
	pub fn add_dynamic_entries(
		&mut self,
		name: impl Into<String>,
		construct: impl DynamicEntries + 'static,
	) -> &mut Self {
		self.add_dynamic_entries_at(name, InsertPosition::default(), construct)
	}

	/// Like [`SectionBuilder::add_dynamic_entries`]; produced entries without a position of
	/// their own are placed at `position`.
	pub fn add_dynamic_entries_at(
		&mut self,
		name: impl Into<String>,
		position: InsertPosition,
		construct: impl DynamicEntries + 'static,
	) -> &mut Self {
		let mut constructor = EntryConstructor::new(name, Arc::new(construct));
		constructor.insert_position = position;
		constructor.owner = self.owner.clone();
		constructor.registered = self.registering;
		self.section.add_constructor(constructor);
		self
	}

	pub fn remove_entry(&mut self, name: &str) -> Option<Entry> {
		self.section.remove_entry(name)
	}

	pub fn set_label(&mut self, label: impl Into<Attribute<String>>) -> &mut Self {
		self.section.label = Some(label.into());
		self
	}

	pub fn set_visibility(&mut self, visibility: impl Into<Attribute<bool>>) -> &mut Self {
		self.section.visibility = Some(visibility.into());
		self
	}

	pub fn set_insert_position(&mut self, position: InsertPosition) -> &mut Self {
		self.section.insert_position = position;
		self
	}

	/// Sorts the section's entries (stably) after placement, on every composition.
	pub fn set_sorter(
		&mut self,
		sorter: impl Fn(&Entry, &Entry, &Context<'_>) -> Ordering + 'static,
	) -> &mut Self {
		self.section.sorter = Some(Arc::new(sorter));
		self
	}
}
