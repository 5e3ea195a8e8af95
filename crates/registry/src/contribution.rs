//! Contributions evaluated at composition time.
//!
//! # Role
//!
//! A contribution is a value, not a captured delegate: it carries its name, the owner that
//! added it, and an `Arc` to the callback. The registry removes contributions by owner
//! without ever holding a reference back into the contributor.
//!
//! # Invariants
//!
//! - Callbacks are re-run on every `generate`; their results are never cached.
//! - A failing callback (error or contained panic) drops only its own output.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::compose::SectionSet;
use crate::context::Context;
use crate::error::ContributionError;
use crate::model::{Entry, InsertPosition, OwnerToken, Section};

/// Computes a whole section from the composition context.
pub trait DynamicSection {
	fn construct(&self, cx: &Context<'_>) -> Result<Section, ContributionError>;
}

impl<F> DynamicSection for F
where
	F: Fn(&Context<'_>) -> Result<Section, ContributionError>,
{
	fn construct(&self, cx: &Context<'_>) -> Result<Section, ContributionError> {
		self(cx)
	}
}

/// Mutates the already-assembled sections of a menu.
pub trait Extender {
	fn extend(&self, cx: &Context<'_>, sections: &mut SectionSet) -> Result<(), ContributionError>;
}

impl<F> Extender for F
where
	F: Fn(&Context<'_>, &mut SectionSet) -> Result<(), ContributionError>,
{
	fn extend(&self, cx: &Context<'_>, sections: &mut SectionSet) -> Result<(), ContributionError> {
		self(cx, sections)
	}
}

/// Produces entries for the section it is attached to.
pub trait DynamicEntries {
	fn construct(&self, cx: &Context<'_>, out: &mut Vec<Entry>) -> Result<(), ContributionError>;
}

impl<F> DynamicEntries for F
where
	F: Fn(&Context<'_>, &mut Vec<Entry>) -> Result<(), ContributionError>,
{
	fn construct(&self, cx: &Context<'_>, out: &mut Vec<Entry>) -> Result<(), ContributionError> {
		self(cx, out)
	}
}

/// Menu-level contribution variants.
#[derive(Clone)]
pub enum ContributionKind {
	DynamicSection {
		construct: Arc<dyn DynamicSection>,
		/// Where the produced section goes when it is new to the menu.
		insert_position: InsertPosition,
	},
	Extender(Arc<dyn Extender>),
}

impl ContributionKind {
	pub(crate) fn tag(&self) -> &'static str {
		match self {
			Self::DynamicSection { .. } => "dynamic_section",
			Self::Extender(_) => "extender",
		}
	}
}

impl fmt::Debug for ContributionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DynamicSection {
				insert_position, ..
			} => f
				.debug_struct("DynamicSection")
				.field("insert_position", insert_position)
				.finish_non_exhaustive(),
			Self::Extender(_) => f.write_str("Extender(..)"),
		}
	}
}

/// A named, owned contribution attached to a menu.
///
/// Names are unique per menu and kind; re-adding a name replaces the earlier value.
#[derive(Debug, Clone)]
pub struct Contribution {
	pub(crate) name: String,
	pub(crate) owner: Option<OwnerToken>,
	pub(crate) kind: ContributionKind,
}

impl Contribution {
	pub(crate) fn new(name: impl Into<String>, owner: Option<OwnerToken>, kind: ContributionKind) -> Self {
		Self {
			name: name.into(),
			owner,
			kind,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn owner(&self) -> Option<&OwnerToken> {
		self.owner.as_ref()
	}

	pub fn kind(&self) -> &ContributionKind {
		&self.kind
	}

	pub fn is_extender(&self) -> bool {
		matches!(self.kind, ContributionKind::Extender(_))
	}
}

/// Section-level entry constructor.
#[derive(Clone)]
pub(crate) struct EntryConstructor {
	pub(crate) name: String,
	pub(crate) owner: Option<OwnerToken>,
	/// Applied to produced entries that did not pick a position themselves.
	pub(crate) insert_position: InsertPosition,
	pub(crate) construct: Arc<dyn DynamicEntries>,
	pub(crate) registered: bool,
}

impl EntryConstructor {
	pub(crate) fn new(name: impl Into<String>, construct: Arc<dyn DynamicEntries>) -> Self {
		Self {
			name: name.into(),
			owner: None,
			insert_position: InsertPosition::default(),
			construct,
			registered: false,
		}
	}
}

impl fmt::Debug for EntryConstructor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntryConstructor")
			.field("name", &self.name)
			.field("owner", &self.owner)
			.field("insert_position", &self.insert_position)
			.finish_non_exhaustive()
	}
}

/// Runs `f`, turning a panic into [`ContributionError::Panicked`] when `isolate` is set.
pub(crate) fn isolate<T>(
	isolate: bool,
	f: impl FnOnce() -> Result<T, ContributionError>,
) -> Result<T, ContributionError> {
	if !isolate {
		return f();
	}
	panic::catch_unwind(AssertUnwindSafe(f))
		.unwrap_or_else(|payload| Err(ContributionError::Panicked(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}
