use serde::Serialize;

use super::{Entry, OwnerToken, Section};
use crate::contribution::Contribution;
use crate::error::ConfigurationError;

/// How a menu is presented. Menu bars collapse all sections into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuKind {
	#[default]
	Menu,
	MenuBar,
	Toolbar,
	ContextMenu,
}

/// Base shape passed to [`ToolMenus::register`](crate::ToolMenus::register).
#[derive(Debug, Clone, Default)]
pub struct MenuDef {
	pub parent: Option<String>,
	pub kind: MenuKind,
	pub sections: Vec<Section>,
}

impl MenuDef {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	pub fn with_kind(mut self, kind: MenuKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn with_section(mut self, section: Section) -> Self {
		self.sections.push(section);
		self
	}
}

/// A registered (or extended) menu as stored in the registry.
#[derive(Debug, Clone)]
pub struct Menu {
	pub(crate) name: String,
	pub(crate) parent: Option<String>,
	pub(crate) kind: MenuKind,
	pub(crate) sections: Vec<Section>,
	pub(crate) contributions: Vec<Contribution>,
	pub(crate) owner: Option<OwnerToken>,
	/// False for placeholders created by `extend` before anyone registered the menu.
	pub(crate) registered: bool,
	pub(crate) extenders_enabled: bool,
}

impl Menu {
	pub(crate) fn placeholder(name: String) -> Self {
		Self {
			name,
			parent: None,
			kind: MenuKind::default(),
			sections: Vec::new(),
			contributions: Vec::new(),
			owner: None,
			registered: false,
			extenders_enabled: true,
		}
	}

	/// Turns this menu into a registered one using `def` as its base shape.
	pub(crate) fn adopt(
		&mut self,
		def: MenuDef,
		owner: Option<OwnerToken>,
	) -> Result<(), ConfigurationError> {
		self.parent = def.parent;
		self.kind = def.kind;
		self.owner = owner.clone();
		self.registered = true;
		for mut section in def.sections {
			stamp(&mut section, owner.as_ref(), true);
			self.add_section(section)?;
		}
		Ok(())
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	pub fn kind(&self) -> MenuKind {
		self.kind
	}

	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	pub fn contributions(&self) -> &[Contribution] {
		&self.contributions
	}

	pub fn owner(&self) -> Option<&OwnerToken> {
		self.owner.as_ref()
	}

	pub fn is_registered(&self) -> bool {
		self.registered
	}

	pub fn extenders_enabled(&self) -> bool {
		self.extenders_enabled
	}

	pub fn find_section(&self, name: &str) -> Option<&Section> {
		self.sections.iter().find(|section| section.name == name)
	}

	pub(crate) fn find_section_mut(&mut self, name: &str) -> Option<&mut Section> {
		self.sections.iter_mut().find(|section| section.name == name)
	}

	/// Adds `section`, merging into an existing section of the same name.
	///
	/// Fails when both carry a static label or a non-default position and they differ.
	pub(crate) fn add_section(&mut self, section: Section) -> Result<&mut Section, ConfigurationError> {
		let Some(index) = self.sections.iter().position(|s| s.name == section.name) else {
			self.sections.push(section);
			let last = self.sections.len() - 1;
			return Ok(&mut self.sections[last]);
		};

		if let Some(reason) = conflict(&self.sections[index], &section) {
			return Err(ConfigurationError::ConflictingSection {
				menu: self.name.clone(),
				section: section.name,
				reason,
			});
		}

		let existing = &mut self.sections[index];
		if existing.label.is_none() {
			existing.label = section.label;
		}
		if existing.visibility.is_none() {
			existing.visibility = section.visibility;
		}
		if existing.insert_position.is_default() {
			existing.insert_position = section.insert_position;
		}
		if existing.sorter.is_none() {
			existing.sorter = section.sorter;
		}
		for entry in section.entries {
			existing.add_entry(entry);
		}
		for constructor in section.constructors {
			existing.add_constructor(constructor);
		}
		Ok(existing)
	}

	pub(crate) fn add_contribution(&mut self, contribution: Contribution) {
		let slot = self
			.contributions
			.iter()
			.position(|c| c.name == contribution.name && c.kind.tag() == contribution.kind.tag());
		match slot {
			Some(index) => self.contributions[index] = contribution,
			None => self.contributions.push(contribution),
		}
	}

	pub(crate) fn remove_section(&mut self, name: &str) -> Option<Section> {
		let index = self.sections.iter().position(|section| section.name == name)?;
		Some(self.sections.remove(index))
	}

	/// Removes everything contributed by `owner`. Owned sections go away once empty.
	pub(crate) fn remove_owned(&mut self, owner: &OwnerToken) -> usize {
		let mut removed = 0;

		let before = self.contributions.len();
		self.contributions.retain(|c| c.owner.as_ref() != Some(owner));
		removed += before - self.contributions.len();

		self.sections.retain_mut(|section| {
			removed += section.remove_owned(owner);
			let drop_section = section.owner.as_ref() == Some(owner)
				&& section.entries.is_empty()
				&& section.constructors.is_empty();
			if drop_section {
				removed += 1;
			}
			!drop_section
		});

		removed
	}
}

/// Stamps a section and everything in it with `owner` (where unset) and the registration flag.
pub(crate) fn stamp(section: &mut Section, owner: Option<&OwnerToken>, registered: bool) {
	section.registered = registered;
	if section.owner.is_none() {
		section.owner = owner.cloned();
	}
	for entry in &mut section.entries {
		stamp_entry(entry, owner, registered);
	}
	for constructor in &mut section.constructors {
		constructor.registered = registered;
		if constructor.owner.is_none() {
			constructor.owner = owner.cloned();
		}
	}
}

pub(crate) fn stamp_entry(entry: &mut Entry, owner: Option<&OwnerToken>, registered: bool) {
	entry.registered = registered;
	if entry.owner.is_none() {
		entry.owner = owner.cloned();
	}
}

fn conflict(existing: &Section, incoming: &Section) -> Option<String> {
	let labels = existing
		.label
		.as_ref()
		.and_then(|l| l.as_static())
		.zip(incoming.label.as_ref().and_then(|l| l.as_static()));
	if let Some((a, b)) = labels
		&& a != b
	{
		return Some(format!("label {a:?} vs {b:?}"));
	}

	let positions_differ = !existing.insert_position.is_default()
		&& !incoming.insert_position.is_default()
		&& existing.insert_position != incoming.insert_position;
	if positions_differ {
		return Some(format!(
			"position {} vs {}",
			existing.insert_position, incoming.insert_position
		));
	}

	None
}

