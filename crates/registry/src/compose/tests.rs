use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::{SectionSet, join_menu_path, split_menu_path};
use crate::composed::ComposedEntryKind;
use crate::config::ToolMenusConfig;
use crate::context::{CommandBinding, CommandMap, Context};
use crate::error::ContributionError;
use crate::model::{Attribute, CheckState, Entry, InsertPosition, MenuDef, MenuKind, OwnerToken, Section};
use crate::registry::ToolMenus;

struct Selection(usize);

fn section(name: &str, entries: &[&str]) -> Section {
	Section::new(name).with_entries(entries.iter().map(|e| Entry::action(*e, *e)))
}

fn registry() -> ToolMenus {
	let mut menus = ToolMenus::default();
	menus
		.register("Parent", MenuDef::new().with_section(section("S", &["P1", "P2"])))
		.unwrap();
	menus
		.register(
			"Child",
			MenuDef::new()
				.with_parent("Parent")
				.with_section(section("S", &["C1"]))
				.with_section(section("Own", &["O1"])),
		)
		.unwrap();
	menus
}

#[test]
fn inherited_entries_come_first() {
	let menus = registry();
	let menu = menus.generate("Child", &Context::new());

	assert_eq!(menu.section_names(), ["S", "Own"]);
	assert_eq!(menu.entry_names("S"), ["P1", "P2", "C1"]);
	assert_eq!(menus.composer().hierarchy("Child"), ["Parent", "Child"]);
}

#[test]
fn missing_menu_composes_empty() {
	let menus = ToolMenus::default();
	let menu = menus.generate("Nowhere", &Context::new());
	assert_eq!(menu.name, "Nowhere");
	assert!(menu.sections.is_empty());
}

#[test]
fn missing_ancestor_truncates_chain() {
	let mut menus = ToolMenus::default();
	menus
		.register(
			"Orphan",
			MenuDef::new()
				.with_parent("Gone")
				.with_section(section("S", &["A"])),
		)
		.unwrap();
	let menu = menus.generate("Orphan", &Context::new());
	assert_eq!(menu.entry_names("S"), ["A"]);
}

#[test]
fn substitution_cycle_is_truncated() {
	let mut menus = registry();
	// Parent -> Child via substitution, Child -> Parent via its parent link.
	menus.add_substitution("Parent", "Child");
	let menu = menus.generate("Child", &Context::new());
	assert_eq!(menu.entry_names("S"), ["C1"]);
}

#[test]
fn substitution_replacement_may_extend_original() {
	let mut menus = registry();
	menus
		.register(
			"Replacement",
			MenuDef::new()
				.with_parent("Parent")
				.with_section(section("S", &["R1"])),
		)
		.unwrap();
	menus.add_substitution("Parent", "Replacement");

	let menu = menus.generate("Parent", &Context::new());
	assert_eq!(menu.entry_names("S"), ["P1", "P2", "R1"]);

	let child = menus.generate("Child", &Context::new());
	assert_eq!(child.entry_names("S"), ["P1", "P2", "R1", "C1"]);
}

#[test]
fn registered_entries_precede_extensions_at_same_level() {
	let mut menus = ToolMenus::default();
	menus
		.extend("Main")
		.section("S")
		.add_entry(Entry::action("Early", "Early"));
	menus
		.register("Main", MenuDef::new().with_section(section("S", &["Base"])))
		.unwrap();

	let menu = menus.generate("Main", &Context::new());
	assert_eq!(menu.entry_names("S"), ["Base", "Early"]);
}

#[rstest]
#[case::before(InsertPosition::before("Y"), &["X", "Y", "Z"])]
#[case::after(InsertPosition::after("Y"), &["Y", "X", "Z"])]
#[case::unresolved(InsertPosition::before("W"), &["Y", "Z", "X"])]
fn entry_insert_positions(#[case] position: InsertPosition, #[case] expected: &[&str]) {
	let mut menus = ToolMenus::default();
	menus
		.register("Main", MenuDef::new().with_section(section("S", &["Y", "Z"])))
		.unwrap();
	menus
		.extend("Main")
		.section("S")
		.add_entry(Entry::action("X", "X").with_insert_position(position));

	let menu = menus.generate("Main", &Context::new());
	assert_eq!(menu.entry_names("S"), expected);
}

#[test]
fn section_insert_positions() {
	let mut menus = ToolMenus::default();
	menus
		.register(
			"Main",
			MenuDef::new()
				.with_section(section("File", &["Open"]))
				.with_section(section("Help", &["About"]).with_insert_position(InsertPosition::last())),
		)
		.unwrap();
	let mut main = menus.extend("Main");
	main.add_section(section("Edit", &["Undo"]).with_insert_position(InsertPosition::after("File")))
		.unwrap();
	main.add_section(section("View", &["Zoom"])).unwrap();
	main.add_section(section("Top", &["Pin"]).with_insert_position(InsertPosition::first()))
		.unwrap();

	let menu = menus.generate("Main", &Context::new());
	assert_eq!(menu.section_names(), ["Top", "File", "Edit", "View", "Help"]);
}

#[test]
fn dynamic_section_reads_context() {
	let mut menus = registry();
	menus.extend("Child").add_dynamic_section("Selection", |cx: &Context<'_>| {
		let count = cx.find::<Selection>().map_or(0, |s| s.0);
		Ok(Section::new("Selection")
			.with_label(format!("{count} selected"))
			.with_entries((0..count).map(|i| Entry::action(format!("Item{i}"), "item"))))
	});

	let selection = Selection(2);
	let menu = menus.generate("Child", &Context::new().with_object(&selection));
	let dynamic = menu.find_section("Selection").unwrap();
	assert_eq!(dynamic.label.as_deref(), Some("2 selected"));
	assert_eq!(dynamic.entry_names(), ["Item0", "Item1"]);

	let empty = menus.generate("Child", &Context::new());
	assert!(empty.find_section("Selection").is_none());
}

#[test]
fn dynamic_section_merges_into_existing_by_name() {
	let mut menus = registry();
	menus.extend("Child").add_dynamic_section("More", |_: &Context<'_>| {
		Ok(section("S", &["D1"]))
	});
	let menu = menus.generate("Child", &Context::new());
	assert_eq!(menu.entry_names("S"), ["P1", "P2", "C1", "D1"]);
}

#[test]
fn merged_dynamic_section_takes_its_position() {
	let mut menus = registry();
	menus.extend("Child").add_dynamic_section("Front", |_: &Context<'_>| {
		Ok(section("Own", &["D1"]).with_insert_position(InsertPosition::first()))
	});
	let menu = menus.generate("Child", &Context::new());
	assert_eq!(menu.section_names(), ["Own", "S"]);
	assert_eq!(menu.entry_names("Own"), ["O1", "D1"]);
}

#[test]
fn failing_contributions_are_isolated() {
	let mut menus = registry();
	let mut child = menus.extend("Child");
	child.add_dynamic_section("Broken", |_: &Context<'_>| -> Result<Section, ContributionError> {
		Err(ContributionError::msg("no selection"))
	});
	child.add_dynamic_section("Panics", |_: &Context<'_>| -> Result<Section, ContributionError> {
		panic!("callback bug")
	});
	child.add_extender("HalfDone", |_: &Context<'_>, sections: &mut SectionSet| {
		sections.remove_section("Own");
		Err(ContributionError::msg("gave up"))
	});
	child.add_extender("Works", |_: &Context<'_>, sections: &mut SectionSet| {
		sections.insert_entry("S", Entry::action("E1", "E1"));
		Ok(())
	});

	let menu = menus.generate("Child", &Context::new());
	assert_eq!(menu.section_names(), ["S", "Own"]);
	assert_eq!(menu.entry_names("S"), ["P1", "P2", "C1", "E1"]);
}

#[test]
fn panicking_attributes_drop_only_their_item() {
	let mut menus = registry();
	menus.extend("Child").section("Own").add_entry(
		Entry::action("Boom", "Boom").with_label(Attribute::<String>::dynamic(|_: &Context<'_>| panic!("label bug"))),
	);
	menus
		.extend("Child")
		.add_section(
			Section::new("Flaky")
				.with_visibility(Attribute::<bool>::dynamic(|_: &Context<'_>| panic!("visibility bug")))
				.with_entry(Entry::action("F1", "F1")),
		)
		.unwrap();

	let menu = menus.generate("Child", &Context::new());
	assert_eq!(menu.section_names(), ["S", "Own"]);
	assert_eq!(menu.entry_names("Own"), ["O1"]);
	assert_eq!(menu.entry_names("S"), ["P1", "P2", "C1"]);
}

#[test]
fn extenders_run_after_dynamic_sections() {
	let mut menus = registry();
	let mut child = menus.extend("Child");
	child.add_extender("Reorder", |_: &Context<'_>, sections: &mut SectionSet| {
		if let Some(mut dynamic) = sections.remove_section("Dyn") {
			dynamic.insert_position = InsertPosition::first();
			sections.add_section(dynamic);
		}
		Ok(())
	});
	child.add_dynamic_section("Dyn", |_: &Context<'_>| Ok(section("Dyn", &["D"])));

	let menu = menus.generate("Child", &Context::new());
	assert_eq!(menu.section_names(), ["Dyn", "S", "Own"]);
}

#[test]
fn disabled_extenders_are_skipped_for_descendants() {
	let mut menus = registry();
	menus.extend("Parent").set_extenders_enabled(false);
	menus
		.extend("Child")
		.add_extender("Add", |_: &Context<'_>, sections: &mut SectionSet| {
			sections.insert_entry("S", Entry::action("Ext", "Ext"));
			Ok(())
		});

	let menu = menus.generate("Child", &Context::new());
	assert!(menu.find_entry("Ext").is_none());
}

#[test]
fn dynamic_entries_expand_with_section() {
	let mut menus = ToolMenus::default();
	menus
		.register("Main", MenuDef::new().with_section(section("Recent", &["Clear"])))
		.unwrap();
	menus.extend("Main").section("Recent").add_dynamic_entries_at(
		"Files",
		InsertPosition::first(),
		|cx: &Context<'_>, out: &mut Vec<Entry>| {
			let count = cx.find::<Selection>().map_or(1, |s| s.0);
			out.extend((0..count).map(|i| Entry::action(format!("File{i}"), "file")));
			Ok(())
		},
	);

	let selection = Selection(2);
	let menu = menus.generate("Main", &Context::new().with_object(&selection));
	assert_eq!(menu.entry_names("Recent"), ["File0", "File1", "Clear"]);
}

#[test]
fn invisible_items_are_dropped() {
	let mut menus = ToolMenus::default();
	let shown = Rc::new(Cell::new(false));
	let flag = Rc::clone(&shown);
	menus
		.register(
			"Main",
			MenuDef::new()
				.with_section(
					section("S", &["Always"]).with_entry(
						Entry::action("Sometimes", "Sometimes")
							.with_visibility(Attribute::dynamic(move |_| flag.get())),
					),
				)
				.with_section(section("Hidden", &["X"]).with_visibility(false)),
		)
		.unwrap();

	let cx = Context::new();
	assert_eq!(menus.generate("Main", &cx).section_names(), ["S"]);
	assert_eq!(menus.generate("Main", &cx).entry_names("S"), ["Always"]);
	shown.set(true);
	assert_eq!(menus.generate("Main", &cx).entry_names("S"), ["Always", "Sometimes"]);
}

#[rstest]
#[case::pruned(true, &["Full"])]
#[case::kept(false, &["Full", "Empty"])]
fn empty_sections(#[case] prune: bool, #[case] expected: &[&str]) {
	let mut menus = ToolMenus::new(ToolMenusConfig {
		prune_empty_sections: prune,
		..ToolMenusConfig::default()
	});
	menus
		.register(
			"Main",
			MenuDef::new()
				.with_section(section("Full", &["A"]))
				.with_section(Section::new("Empty")),
		)
		.unwrap();
	assert_eq!(menus.generate("Main", &Context::new()).section_names(), expected);
}

#[test]
fn command_entries_consult_command_list() {
	let mut menus = ToolMenus::default();
	menus
		.register(
			"Main",
			MenuDef::new().with_section(
				Section::new("S")
					.with_entry(Entry::command("Save", "file.save").with_label("Save"))
					.with_entry(Entry::command("Grid", "view.grid"))
					.with_entry(Entry::command("Ghost", "unmapped")),
			),
		)
		.unwrap();

	let mut commands = CommandMap::new();
	commands.map("file.save", CommandBinding::new(|| {}).with_can_execute(|| false));
	commands.map(
		"view.grid",
		CommandBinding::new(|| {}).with_checked(|| CheckState::Checked),
	);

	let menu = menus.generate("Main", &Context::new().with_commands(&commands));
	assert_eq!(menu.entry_names("S"), ["Save", "Grid"]);
	let save = menu.find_entry("Save").unwrap();
	assert!(!save.enabled);
	assert_eq!(
		save.kind,
		ComposedEntryKind::Action {
			command: Some("file.save".into())
		}
	);
	assert_eq!(menu.find_entry("Grid").unwrap().checked, Some(CheckState::Checked));

	// Without a command list nothing can be checked against.
	let plain = menus.generate("Main", &Context::new());
	assert_eq!(plain.entry_names("S"), ["Save", "Grid", "Ghost"]);
}

#[test]
fn submenus_resolve_by_path() {
	let mut menus = ToolMenus::default();
	menus
		.register(
			"Main",
			MenuDef::new().with_section(
				Section::new("S")
					.with_entry(Entry::submenu("Recent", "Recent"))
					.with_entry(Entry::submenu("Tools", "Tools").with_submenu_name("Shared.Tools")),
			),
		)
		.unwrap();
	menus
		.register("Main.Recent", MenuDef::new().with_section(section("R", &["One"])))
		.unwrap();
	menus
		.register("Shared.Tools", MenuDef::new().with_section(section("T", &["Hammer"])))
		.unwrap();

	let cx = Context::new();
	let main = menus.generate("Main", &cx);
	assert_eq!(main.find_entry("Recent").and_then(|e| e.submenu()), Some("Main.Recent"));

	let recent = menus.generate_submenu(&main, "Recent", &cx);
	assert_eq!(recent.entry_names("R"), ["One"]);
	let tools = menus.generate_submenu(&main, "Tools", &cx);
	assert_eq!(tools.entry_names("T"), ["Hammer"]);
	assert!(menus.generate_submenu(&main, "Missing", &cx).is_empty());
}

#[test]
fn submenu_falls_back_to_ancestor_path() {
	let mut menus = registry();
	menus
		.extend("Parent")
		.section("S")
		.add_entry(Entry::submenu("More", "More"));
	menus
		.register("Parent.More", MenuDef::new().with_section(section("M", &["Inherited"])))
		.unwrap();

	let cx = Context::new();
	let child = menus.generate("Child", &cx);
	assert_eq!(child.find_entry("More").and_then(|e| e.submenu()), Some("Child.More"));
	let more = menus.generate_submenu(&child, "More", &cx);
	assert_eq!(more.entry_names("M"), ["Inherited"]);
}

#[test]
fn menubar_collapses_sections() {
	let mut menus = ToolMenus::default();
	menus
		.register(
			"Bar",
			MenuDef::new()
				.with_kind(MenuKind::MenuBar)
				.with_section(section("A", &["File", "Edit"]))
				.with_section(section("B", &["Help"])),
		)
		.unwrap();
	let menu = menus.generate("Bar", &Context::new());
	assert_eq!(menu.kind, MenuKind::MenuBar);
	assert_eq!(menu.section_names(), [""]);
	assert_eq!(menu.entry_names(""), ["File", "Edit", "Help"]);
}

#[test]
fn sorter_orders_section() {
	let mut menus = ToolMenus::default();
	menus
		.register("Main", MenuDef::new().with_section(section("S", &["b", "c", "a"])))
		.unwrap();
	menus
		.extend("Main")
		.section("S")
		.set_sorter(|a, b, _| a.name.cmp(&b.name));
	assert_eq!(menus.generate("Main", &Context::new()).entry_names("S"), ["a", "b", "c"]);
}

#[test]
fn panicking_sorter_keeps_assembled_order() {
	let mut menus = ToolMenus::default();
	menus
		.register("Main", MenuDef::new().with_section(section("S", &["b", "c", "a"])))
		.unwrap();
	menus
		.extend("Main")
		.section("S")
		.set_sorter(|_, _, _| panic!("sorter bug"));
	assert_eq!(menus.generate("Main", &Context::new()).entry_names("S"), ["b", "c", "a"]);
}

#[test]
fn customizations_apply_unless_editing() {
	let mut menus = registry();
	menus.customize("Parent").hide_entry("P2");
	menus
		.customize("Child")
		.set_section_order(["Own"])
		.set_entry_order("S", ["C1"]);

	let menu = menus.generate("Child", &Context::new());
	assert_eq!(menu.section_names(), ["Own", "S"]);
	assert_eq!(menu.entry_names("S"), ["C1", "P1"]);

	let editing = menus.generate("Child", &Context::new().editing(true));
	assert_eq!(editing.section_names(), ["S", "Own"]);
	assert_eq!(editing.entry_names("S"), ["P1", "P2", "C1"]);
}

#[test]
fn cleanup_removes_contributions_from_output() {
	let mut menus = registry();
	let plugin = OwnerToken::new("plugin");
	menus.with_owner(plugin.clone(), |menus| {
		menus
			.extend("Parent")
			.section("S")
			.add_entry(Entry::action("Plugin", "Plugin"));
		menus
			.extend("Child")
			.add_dynamic_section("PluginDyn", |_: &Context<'_>| Ok(section("PluginDyn", &["D"])));
	});

	assert!(menus.generate("Child", &Context::new()).find_entry("Plugin").is_some());
	menus.unregister_owner(&plugin);

	let menu = menus.generate("Child", &Context::new());
	assert!(menu.find_entry("Plugin").is_none());
	assert!(menu.find_section("PluginDyn").is_none());
}

#[test]
fn generation_is_repeatable() {
	let mut menus = registry();
	menus.extend("Child").add_dynamic_section("Dyn", |cx: &Context<'_>| {
		Ok(section("Dyn", if cx.contains::<Selection>() { &["Sel"] } else { &["None"] }))
	});
	let selection = Selection(1);
	let cx = Context::new().with_object(&selection);
	assert_eq!(menus.generate("Child", &cx), menus.generate("Child", &cx));
}

#[test]
fn menu_paths() {
	assert_eq!(join_menu_path("Main", "File"), "Main.File");
	assert_eq!(join_menu_path("", "File"), "File");
	assert_eq!(split_menu_path("Main.File.Recent"), Some(("Main.File", "Recent")));
	assert_eq!(split_menu_path("Main"), None);
}
