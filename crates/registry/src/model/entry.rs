use serde::Serialize;

use super::{Attribute, InsertPosition, OwnerToken};

/// Opaque index into a widget arena owned by the rendering layer.
///
/// The registry only stores and forwards it; it never dereferences live widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WidgetHandle(pub u64);

/// Tri-state check mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
	#[default]
	Unchecked,
	Checked,
	Undetermined,
}

impl From<bool> for CheckState {
	fn from(checked: bool) -> Self {
		if checked { Self::Checked } else { Self::Unchecked }
	}
}

/// What an entry does when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
	/// A clickable item, optionally routed through the context's command list.
	Action { command: Option<String> },
	Separator,
	/// Placeholder for a widget built by the rendering layer.
	Widget { handle: WidgetHandle },
	/// Opens another menu. `None` resolves to `"<parent menu>.<entry name>"`.
	SubmenuReference { menu: Option<String> },
}

/// A single leaf item inside a [`Section`](super::Section).
///
/// Names are unique within a section unless empty; anonymous entries never collide.
#[derive(Debug, Clone)]
pub struct Entry {
	pub name: String,
	pub kind: EntryKind,
	pub label: Option<Attribute<String>>,
	pub tooltip: Option<Attribute<String>>,
	pub visibility: Attribute<bool>,
	pub enabled: Attribute<bool>,
	pub checked: Option<Attribute<CheckState>>,
	pub insert_position: InsertPosition,
	pub(crate) owner: Option<OwnerToken>,
	/// Added while the owning menu was being registered (assembled ahead of extensions).
	pub(crate) registered: bool,
}

impl Entry {
	pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
		Self {
			name: name.into(),
			kind,
			label: None,
			tooltip: None,
			visibility: Attribute::Static(true),
			enabled: Attribute::Static(true),
			checked: None,
			insert_position: InsertPosition::default(),
			owner: None,
			registered: false,
		}
	}

	/// A plain action with a static label.
	pub fn action(name: impl Into<String>, label: impl Into<Attribute<String>>) -> Self {
		Self::new(name, EntryKind::Action { command: None }).with_label(label)
	}

	/// An action bound to `command` in the context's command list.
	pub fn command(name: impl Into<String>, command: impl Into<String>) -> Self {
		Self::new(
			name,
			EntryKind::Action {
				command: Some(command.into()),
			},
		)
	}

	pub fn separator(name: impl Into<String>) -> Self {
		Self::new(name, EntryKind::Separator)
	}

	pub fn widget(name: impl Into<String>, handle: WidgetHandle) -> Self {
		Self::new(name, EntryKind::Widget { handle })
	}

	/// A submenu resolved by path from the parent menu's name.
	pub fn submenu(name: impl Into<String>, label: impl Into<Attribute<String>>) -> Self {
		Self::new(name, EntryKind::SubmenuReference { menu: None }).with_label(label)
	}

	/// Points a submenu entry at an explicitly named menu.
	pub fn with_submenu_name(mut self, menu: impl Into<String>) -> Self {
		self.kind = EntryKind::SubmenuReference {
			menu: Some(menu.into()),
		};
		self
	}

	pub fn with_label(mut self, label: impl Into<Attribute<String>>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_tooltip(mut self, tooltip: impl Into<Attribute<String>>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}

	pub fn with_visibility(mut self, visibility: impl Into<Attribute<bool>>) -> Self {
		self.visibility = visibility.into();
		self
	}

	pub fn with_enabled(mut self, enabled: impl Into<Attribute<bool>>) -> Self {
		self.enabled = enabled.into();
		self
	}

	pub fn with_checked(mut self, checked: impl Into<Attribute<CheckState>>) -> Self {
		self.checked = Some(checked.into());
		self
	}

	pub fn with_insert_position(mut self, position: InsertPosition) -> Self {
		self.insert_position = position;
		self
	}

	pub fn with_owner(mut self, owner: OwnerToken) -> Self {
		self.owner = Some(owner);
		self
	}

	pub fn owner(&self) -> Option<&OwnerToken> {
		self.owner.as_ref()
	}

	#[inline]
	pub fn is_anonymous(&self) -> bool {
		self.name.is_empty()
	}

	#[inline]
	pub fn is_separator(&self) -> bool {
		matches!(self.kind, EntryKind::Separator)
	}
}
