//! Menu, section and entry definitions.
//!
//! Pure data: nothing here evaluates contributions or resolves ordering. Lazy values are
//! carried as [`Attribute`]s and only evaluated by the composer.

mod attribute;
mod entry;
mod menu;
mod owner;
mod position;
mod section;

pub use attribute::Attribute;
pub use entry::{CheckState, Entry, EntryKind, WidgetHandle};
pub use menu::{Menu, MenuDef, MenuKind};
pub(crate) use menu::{stamp, stamp_entry};
pub use owner::OwnerToken;
pub use position::{InsertPosition, InsertRelation};
pub use section::Section;

/// Items that can be placed relative to named siblings.
pub(crate) trait Placeable {
	fn place_name(&self) -> &str;
	fn place_position(&self) -> &InsertPosition;
}

impl Placeable for Entry {
	fn place_name(&self) -> &str {
		&self.name
	}

	fn place_position(&self) -> &InsertPosition {
		&self.insert_position
	}
}

impl Placeable for Section {
	fn place_name(&self) -> &str {
		&self.name
	}

	fn place_position(&self) -> &InsertPosition {
		&self.insert_position
	}
}
