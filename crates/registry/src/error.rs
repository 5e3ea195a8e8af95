//! Error types for registry operations and menu contributions.

use std::fmt;

/// Invalid menu configuration. Fatal to the operation that attempted it, never to the
/// registry as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
	/// A menu named itself as its parent.
	#[error("menu {menu:?} cannot be its own parent")]
	SelfParent { menu: String },
	/// Linking `menu` to `parent` would close a loop in the parent chain.
	#[error("parent {parent:?} of menu {menu:?} would create a cycle: {}", chain.join(" -> "))]
	CyclicParent {
		menu: String,
		parent: String,
		/// The chain walked from `parent` back to `menu`.
		chain: Vec<String>,
	},
	/// A section with the same name already exists with a different static shape.
	#[error("section {section:?} in menu {menu:?} conflicts with existing definition: {reason}")]
	ConflictingSection {
		menu: String,
		section: String,
		reason: String,
	},
	/// The operation needs a menu that does not exist.
	#[error("menu {menu:?} does not exist")]
	UnknownMenu { menu: String },
}

/// Generic registry error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("configuration error: {0}")]
	Configuration(#[from] ConfigurationError),

	/// [`crate::ToolMenus::pop_owner`] was called out of order.
	#[error("owner stack mismatch: expected {expected:?}, found {found:?}")]
	OwnerMismatch {
		expected: String,
		found: Option<String>,
	},
}

/// Failure reported by a dynamic section, extender or dynamic entry constructor.
///
/// The composer logs it and drops that single contribution; composition continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContributionError {
	/// The callback returned an error.
	#[error("{0}")]
	Failed(String),
	/// The callback panicked and the panic was contained.
	#[error("panicked: {0}")]
	Panicked(String),
}

impl ContributionError {
	/// Builds a [`ContributionError::Failed`] from any displayable message.
	pub fn msg(message: impl fmt::Display) -> Self {
		Self::Failed(message.to_string())
	}
}
