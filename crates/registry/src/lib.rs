//! Extensible menu and toolbar registry.
//!
//! # Purpose
//!
//! Many independent callers contribute sections and entries to the same named menu at
//! different times. This crate keeps the base definitions, the contributions layered on top
//! of them, and composes the final ordered tree on demand.
//!
//! # Mental Model
//!
//! 1. **Registration:** A host constructs one [`ToolMenus`] service and hands it to every
//!    caller. Menus are created with [`ToolMenus::register`] (first registration wins) or
//!    [`ToolMenus::extend`] (find-or-create, used by callers that did not author the menu).
//! 2. **Contribution:** Callers add [`Section`]s and [`Entry`]s directly, or attach
//!    [`DynamicSection`]s and [`Extender`]s that are evaluated per composition.
//! 3. **Composition:** [`ToolMenus::generate`] walks the parent chain, merges sections by
//!    name, runs contributions against the caller's [`Context`], resolves
//!    [`InsertPosition`]s and evaluates lazy attributes into a [`ComposedMenu`].
//! 4. **Cleanup:** Everything added while an [`OwnerToken`] is active is stamped with it;
//!    [`ToolMenus::unregister_owner`] removes all of it in one call.
//!
//! # Error Policy
//!
//! Configuration problems (cyclic parents, conflicting section shapes) fail the specific
//! registry call with [`RegistryError`]. Contribution failures and unresolved anchors are
//! logged through `tracing` and degrade the composed output; `generate` never fails.
//!
//! # Concurrency
//!
//! The registry is a plain single-threaded service object: mutation takes `&mut self`,
//! composition takes `&self`, and nothing is cached across `generate` calls.

mod compose;
mod composed;
mod config;
mod context;
mod contribution;
mod error;
mod model;
mod registry;

pub use compose::{Composer, SectionSet, join_menu_path, split_menu_path};
pub use composed::{ComposedEntry, ComposedEntryKind, ComposedMenu, ComposedSection};
pub use config::{ConfigError, ToolMenusConfig};
pub use context::{CommandBinding, CommandList, CommandMap, Context};
pub use contribution::{Contribution, ContributionKind, DynamicEntries, DynamicSection, Extender};
pub use error::{ConfigurationError, ContributionError, RegistryError};
pub use model::{
	Attribute, CheckState, Entry, EntryKind, InsertPosition, InsertRelation, Menu, MenuDef,
	MenuKind, OwnerToken, Section, WidgetHandle,
};
pub use registry::{MenuBuilder, MenuCustomization, SectionBuilder, ToolMenus};

// Only the integration tests install a subscriber.
#[cfg(test)]
use tracing_subscriber as _;
