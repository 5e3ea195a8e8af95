use rustc_hash::FxHashSet as HashSet;

use crate::model::Menu;
use crate::registry::ToolMenus;

/// Resolves `name` and its parent chain, root first.
///
/// Substitutions apply at most once per name so a replacement may extend the menu it
/// replaces. A missing ancestor or a loop truncates the chain at that link; a missing leaf
/// yields an empty chain.
pub(crate) fn collect<'r>(registry: &'r ToolMenus, name: &str) -> Vec<&'r Menu> {
	let mut chain: Vec<&'r Menu> = Vec::new();
	let mut visited = HashSet::default();
	let mut substituted = HashSet::default();
	let mut current = Some(substitute(registry, name, &mut substituted));

	while let Some(menu_name) = current {
		if !visited.insert(menu_name.clone()) {
			tracing::warn!(menu = name, repeated = %menu_name, "cycle in menu parent chain, truncated");
			break;
		}
		let Some(menu) = registry.menus.get(&menu_name) else {
			if chain.is_empty() {
				tracing::warn!(menu = name, "menu not found");
			} else {
				tracing::warn!(menu = name, parent = %menu_name, "parent menu not found, chain truncated");
			}
			break;
		};
		chain.push(menu);
		current = menu
			.parent
			.as_deref()
			.map(|parent| substitute(registry, parent, &mut substituted));
	}

	chain.reverse();
	tracing::debug!(
		menu = name,
		depth = chain.len(),
		"collected menu hierarchy"
	);
	chain
}

/// Whether `name` (after substitution) names a menu.
pub(crate) fn exists(registry: &ToolMenus, name: &str) -> bool {
	let name = registry.substitutions.get(name).map_or(name, String::as_str);
	registry.menus.contains_key(name)
}

fn substitute(registry: &ToolMenus, name: &str, used: &mut HashSet<String>) -> String {
	match registry.substitutions.get(name) {
		Some(replacement) if used.insert(name.to_owned()) => replacement.clone(),
		_ => name.to_owned(),
	}
}
