use crate::compose::{SectionSet, join_menu_path};
use crate::composed::{ComposedEntry, ComposedEntryKind, ComposedMenu, ComposedSection};
use crate::config::ToolMenusConfig;
use crate::context::Context;
use crate::contribution::isolate;
use crate::model::{CheckState, Entry, EntryKind, MenuKind, Section};

/// Evaluates every lazy attribute and drops what is invisible.
pub(crate) fn evaluate(
	name: &str,
	kind: MenuKind,
	set: SectionSet,
	cx: &Context<'_>,
	config: &ToolMenusConfig,
) -> ComposedMenu {
	let mut sections: Vec<ComposedSection> = set
		.into_sections()
		.into_iter()
		.filter_map(|section| evaluate_section(name, section, cx, config))
		.collect();

	if kind == MenuKind::MenuBar {
		let entries = sections.drain(..).flat_map(|section| section.entries).collect();
		sections.push(ComposedSection {
			name: String::new(),
			label: None,
			entries,
		});
	}

	ComposedMenu {
		name: name.to_owned(),
		kind,
		sections,
	}
}

fn evaluate_section(
	menu: &str,
	section: Section,
	cx: &Context<'_>,
	config: &ToolMenusConfig,
) -> Option<ComposedSection> {
	let header = isolate(config.isolate_panics, || {
		let visible = section.visibility.as_ref().is_none_or(|visible| visible.get(cx));
		Ok(visible.then(|| section.label.as_ref().map(|label| label.get(cx))))
	});
	let label = match header {
		Ok(Some(label)) => label,
		Ok(None) => return None,
		Err(error) => {
			tracing::error!(menu, section = %section.name, %error, "section attributes failed, section dropped");
			return None;
		}
	};

	let entries: Vec<ComposedEntry> = section
		.entries
		.iter()
		.filter_map(|entry| {
			match isolate(config.isolate_panics, || Ok(evaluate_entry(menu, entry, cx, config))) {
				Ok(composed) => composed,
				Err(error) => {
					tracing::error!(
						menu,
						section = %section.name,
						entry = %entry.name,
						%error,
						"entry attributes failed, entry dropped"
					);
					None
				}
			}
		})
		.collect();

	if entries.is_empty() && config.prune_empty_sections {
		return None;
	}

	Some(ComposedSection {
		label,
		name: section.name,
		entries,
	})
}

fn evaluate_entry(
	menu: &str,
	entry: &Entry,
	cx: &Context<'_>,
	config: &ToolMenusConfig,
) -> Option<ComposedEntry> {
	if !entry.visibility.get(cx) {
		return None;
	}

	let mut enabled = entry.enabled.get(cx);
	let mut checked = entry.checked.as_ref().map(|checked| checked.get(cx));

	let kind = match &entry.kind {
		EntryKind::Action { command } => {
			if let (Some(command), Some(commands)) = (command.as_deref(), cx.commands()) {
				if !commands.is_mapped(command) {
					if config.hide_unmapped_commands {
						tracing::debug!(menu, entry = %entry.name, command, "dropping unmapped command entry");
						return None;
					}
					enabled = false;
				} else {
					if !commands.is_visible(command) {
						return None;
					}
					enabled &= commands.can_execute(command);
					if checked.is_none() {
						checked = Some(commands.checked_state(command)).filter(|state| *state != CheckState::Unchecked);
					}
				}
			}
			ComposedEntryKind::Action {
				command: command.clone(),
			}
		}
		EntryKind::Separator => ComposedEntryKind::Separator,
		EntryKind::Widget { handle } => ComposedEntryKind::Widget { handle: *handle },
		EntryKind::SubmenuReference { menu: target } => ComposedEntryKind::Submenu {
			menu: target.clone().unwrap_or_else(|| join_menu_path(menu, &entry.name)),
		},
	};

	Some(ComposedEntry {
		name: entry.name.clone(),
		kind,
		label: entry.label.as_ref().map(|label| label.get(cx)),
		tooltip: entry.tooltip.as_ref().map(|tooltip| tooltip.get(cx)),
		checked,
		enabled,
	})
}
