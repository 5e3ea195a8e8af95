//! Menu composition.
//!
//! # Role
//!
//! Turns a menu name plus a [`Context`] into a [`ComposedMenu`]. Composition reads the
//! registry and never writes to it; every call re-runs every contribution.
//!
//! # Pipeline
//!
//! 1. Collect the parent chain (substitutions applied, cycles truncated).
//! 2. Merge static sections root first, running section entry constructors as each
//!    section is merged.
//! 3. Run dynamic sections, then extenders, then constructors added by extenders.
//! 4. Apply section sorters, then customizations (skipped for editing contexts).
//! 5. Evaluate attributes, drop invisible items, collapse menu bars.

mod assemble;
mod evaluate;
mod hierarchy;
mod placement;
mod section_set;

#[cfg(test)]
mod tests;

pub use section_set::SectionSet;

use crate::composed::{ComposedEntry, ComposedMenu};
use crate::context::Context;
use crate::registry::{MenuCustomization, ToolMenus};

/// Read-only composition view over a [`ToolMenus`] registry.
#[derive(Clone, Copy)]
pub struct Composer<'r> {
	registry: &'r ToolMenus,
}

impl<'r> Composer<'r> {
	pub(crate) fn new(registry: &'r ToolMenus) -> Self {
		Self { registry }
	}

	/// Composes `name` against `cx`. A missing menu yields an empty [`ComposedMenu`].
	pub fn generate(&self, name: &str, cx: &Context<'_>) -> ComposedMenu {
		let chain = hierarchy::collect(self.registry, name);
		let Some(leaf) = chain.last() else {
			return ComposedMenu::empty(name);
		};
		let kind = leaf.kind;

		let assembler = assemble::Assembler {
			menu: name,
			config: &self.registry.config,
			cx,
		};
		let mut set = assembler.assemble(&chain);

		if !cx.is_editing() {
			let mut customization = MenuCustomization::default();
			for level in &chain {
				if let Some(layer) = self.registry.customizations.get(&level.name) {
					customization.merge(layer);
				}
			}
			customization.apply(&mut set);
		}

		let composed = evaluate::evaluate(name, kind, set, cx, &self.registry.config);
		tracing::trace!(
			menu = name,
			depth = chain.len(),
			sections = composed.sections.len(),
			"composed menu"
		);
		composed
	}

	/// Composes the submenu opened by entry `entry` of an already composed `parent`.
	///
	/// An implicit submenu path (`"<parent>.<entry>"`) that was never registered falls back
	/// to the same entry name under each of the parent's ancestors, nearest first.
	pub fn generate_submenu(&self, parent: &ComposedMenu, entry: &str, cx: &Context<'_>) -> ComposedMenu {
		let implicit = join_menu_path(&parent.name, entry);
		let Some(target) = parent.find_entry(entry).and_then(ComposedEntry::submenu) else {
			tracing::warn!(menu = %parent.name, entry, "entry is not a submenu");
			return ComposedMenu::empty(implicit);
		};

		if hierarchy::exists(self.registry, target) {
			return self.generate(target, cx);
		}

		if target == implicit {
			let ancestors = hierarchy::collect(self.registry, &parent.name);
			for ancestor in ancestors.iter().rev().skip(1) {
				let candidate = join_menu_path(&ancestor.name, entry);
				if hierarchy::exists(self.registry, &candidate) {
					tracing::debug!(menu = %implicit, inherited = %candidate, "using inherited submenu");
					return self.generate(&candidate, cx);
				}
			}
		}

		tracing::warn!(menu = %parent.name, entry, submenu = target, "submenu not found");
		ComposedMenu::empty(target)
	}

	/// Names in the resolved parent chain of `name`, root first.
	pub fn hierarchy(&self, name: &str) -> Vec<&'r str> {
		hierarchy::collect(self.registry, name)
			.into_iter()
			.map(|menu| menu.name.as_str())
			.collect()
	}
}

/// Joins a parent menu name and a child name into a submenu path.
pub fn join_menu_path(parent: &str, child: &str) -> String {
	if parent.is_empty() {
		child.to_owned()
	} else {
		format!("{parent}.{child}")
	}
}

/// Splits `"Parent.Child"` into its parent path and last segment.
pub fn split_menu_path(name: &str) -> Option<(&str, &str)> {
	name.rsplit_once('.')
}
