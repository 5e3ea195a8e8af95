//! The [`ToolMenus`] service object.
//!
//! # Role
//!
//! Owns every menu definition plus the registry-wide state that composition consults:
//! substitutions, customizations and configuration. Constructed once by the host and
//! passed to every caller; there is no global instance.
//!
//! # Invariants
//!
//! - The first registration of a name fixes its base shape; later registrations are no-ops.
//! - Parent links never form a cycle. Both [`ToolMenus::register`] and
//!   [`ToolMenus::set_parent`] check before mutating anything.
//! - Everything added while an owner is active carries that owner, so
//!   [`ToolMenus::unregister_owner`] can find it without the contributor's help.

mod builder;
mod customization;


use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap, FxHashSet as HashSet};

pub use builder::{MenuBuilder, SectionBuilder};
pub use customization::MenuCustomization;

use crate::compose::Composer;
use crate::composed::ComposedMenu;
use crate::config::ToolMenusConfig;
use crate::context::Context;
use crate::error::{ConfigurationError, RegistryError};
use crate::model::{Entry, Menu, MenuDef, OwnerToken, Section};

/// Registry of named menus.
#[derive(Debug, Default)]
pub struct ToolMenus {
	pub(crate) menus: IndexMap<String, Menu, FxBuildHasher>,
	owners: Vec<OwnerToken>,
	pub(crate) substitutions: HashMap<String, String>,
	pub(crate) customizations: HashMap<String, MenuCustomization>,
	pub(crate) config: ToolMenusConfig,
}

impl ToolMenus {
	pub fn new(config: ToolMenusConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn config(&self) -> &ToolMenusConfig {
		&self.config
	}

	/// Registers `name` with base shape `def`.
	///
	/// An already registered menu is returned unchanged. A menu that so far only exists
	/// through [`ToolMenus::extend`] adopts `def` and keeps its extensions.
	///
	/// # Errors
	///
	/// Returns [`ConfigurationError::CyclicParent`] or [`ConfigurationError::SelfParent`] if
	/// `def.parent` would close a loop, and [`ConfigurationError::ConflictingSection`] if a
	/// base section clashes with an extension section of the same name. The registry is
	/// left untouched in every error case.
	pub fn register(&mut self, name: impl Into<String>, def: MenuDef) -> Result<MenuBuilder<'_>, RegistryError> {
		let name = name.into();
		let owner = self.current_owner().cloned();

		if let Some(index) = self.menus.get_index_of(&name)
			&& self.menus[index].registered
		{
			if self.config.warn_on_duplicate_register {
				tracing::warn!(menu = %name, "menu already registered");
			}
			return Ok(MenuBuilder::new(&mut self.menus[index], owner, false));
		}

		if let Some(parent) = def.parent.as_deref() {
			self.check_parent(&name, parent)?;
		}

		let mut menu = self
			.menus
			.get(&name)
			.cloned()
			.unwrap_or_else(|| Menu::placeholder(name.clone()));
		menu.adopt(def, owner.clone())?;
		tracing::debug!(menu = %name, owner = owner.as_ref().map(OwnerToken::as_str), "registered menu");

		let (index, _) = self.menus.insert_full(name, menu);
		Ok(MenuBuilder::new(&mut self.menus[index], owner, true))
	}

	/// Finds `name`, creating an unregistered placeholder if it does not exist yet.
	pub fn extend(&mut self, name: impl Into<String>) -> MenuBuilder<'_> {
		let name = name.into();
		let owner = self.current_owner().cloned();
		let menu = self
			.menus
			.entry(name)
			.or_insert_with_key(|name| Menu::placeholder(name.clone()));
		MenuBuilder::new(menu, owner, false)
	}

	pub fn find(&self, name: &str) -> Option<&Menu> {
		self.menus.get(name)
	}

	pub fn is_registered(&self, name: &str) -> bool {
		self.menus.get(name).is_some_and(Menu::is_registered)
	}

	/// Menu names in creation order.
	pub fn menu_names(&self) -> impl Iterator<Item = &str> {
		self.menus.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.menus.len()
	}

	pub fn is_empty(&self) -> bool {
		self.menus.is_empty()
	}

	/// Re-links `name` to `parent` (or detaches it).
	pub fn set_parent(&mut self, name: &str, parent: Option<&str>) -> Result<(), RegistryError> {
		if !self.menus.contains_key(name) {
			return Err(ConfigurationError::UnknownMenu { menu: name.to_owned() }.into());
		}
		if let Some(parent) = parent {
			self.check_parent(name, parent)?;
		}
		if let Some(menu) = self.menus.get_mut(name) {
			menu.parent = parent.map(str::to_owned);
		}
		Ok(())
	}

	/// Rejects a `name -> parent` link that would make the chain loop.
	fn check_parent(&self, name: &str, parent: &str) -> Result<(), ConfigurationError> {
		if name == parent {
			return Err(ConfigurationError::SelfParent { menu: name.to_owned() });
		}

		let mut chain = vec![parent.to_owned()];
		let mut seen = HashSet::default();
		let mut current = self.menus.get(parent).and_then(Menu::parent);
		while let Some(next) = current {
			chain.push(next.to_owned());
			if next == name {
				return Err(ConfigurationError::CyclicParent {
					menu: name.to_owned(),
					parent: parent.to_owned(),
					chain,
				});
			}
			if !seen.insert(next) {
				break;
			}
			current = self.menus.get(next).and_then(Menu::parent);
		}
		Ok(())
	}

	/// Removes a whole menu. Menus that name it as parent keep the dangling link.
	pub fn remove_menu(&mut self, name: &str) -> Option<Menu> {
		self.menus.shift_remove(name)
	}

	pub fn remove_section(&mut self, menu: &str, section: &str) -> Option<Section> {
		self.menus.get_mut(menu)?.remove_section(section)
	}

	pub fn remove_entry(&mut self, menu: &str, section: &str, entry: &str) -> Option<Entry> {
		self.menus.get_mut(menu)?.find_section_mut(section)?.remove_entry(entry)
	}

	/// Makes `owner` the active owner until the matching [`ToolMenus::pop_owner`].
	pub fn push_owner(&mut self, owner: impl Into<OwnerToken>) {
		self.owners.push(owner.into());
	}

	/// Pops `owner`, which must be the innermost active owner.
	pub fn pop_owner(&mut self, owner: &OwnerToken) -> Result<(), RegistryError> {
		match self.owners.last() {
			Some(top) if top == owner => {
				self.owners.pop();
				Ok(())
			}
			top => Err(RegistryError::OwnerMismatch {
				expected: owner.to_string(),
				found: top.map(ToString::to_string),
			}),
		}
	}

	pub fn current_owner(&self) -> Option<&OwnerToken> {
		self.owners.last()
	}

	/// Runs `f` with `owner` active. The owner stack is restored afterwards even if `f`
	/// leaves owners pushed.
	pub fn with_owner<R>(&mut self, owner: impl Into<OwnerToken>, f: impl FnOnce(&mut Self) -> R) -> R {
		let depth = self.owners.len();
		self.owners.push(owner.into());
		let result = f(self);
		self.owners.truncate(depth);
		result
	}

	/// Removes every section, entry and contribution stamped with `owner`, in every menu.
	///
	/// Returns the number of items removed. Menus themselves stay registered.
	pub fn unregister_owner(&mut self, owner: &OwnerToken) -> usize {
		let removed: usize = self.menus.values_mut().map(|menu| menu.remove_owned(owner)).sum();
		tracing::debug!(%owner, removed, "unregistered owner");
		removed
	}

	/// Composes `replacement` wherever `original` is requested, including as a parent.
	pub fn add_substitution(&mut self, original: impl Into<String>, replacement: impl Into<String>) {
		self.substitutions.insert(original.into(), replacement.into());
	}

	pub fn remove_substitution(&mut self, original: &str) -> Option<String> {
		self.substitutions.remove(original)
	}

	/// Runtime customization of `name`, created on first use.
	pub fn customize(&mut self, name: impl Into<String>) -> &mut MenuCustomization {
		self.customizations.entry(name.into()).or_default()
	}

	pub fn customization(&self, name: &str) -> Option<&MenuCustomization> {
		self.customizations.get(name)
	}

	pub fn remove_customization(&mut self, name: &str) -> Option<MenuCustomization> {
		self.customizations.remove(name)
	}

	/// Drops every menu, substitution, customization and active owner.
	pub fn shutdown(&mut self) {
		tracing::debug!(menus = self.menus.len(), "shutting down menu registry");
		self.menus.clear();
		self.owners.clear();
		self.substitutions.clear();
		self.customizations.clear();
	}

	pub fn composer(&self) -> Composer<'_> {
		Composer::new(self)
	}

	/// Shorthand for [`Composer::generate`].
	pub fn generate(&self, name: &str, cx: &Context<'_>) -> ComposedMenu {
		self.composer().generate(name, cx)
	}

	/// Shorthand for [`Composer::generate_submenu`].
	pub fn generate_submenu(&self, parent: &ComposedMenu, entry: &str, cx: &Context<'_>) -> ComposedMenu {
		self.composer().generate_submenu(parent, entry, cx)
	}
}
