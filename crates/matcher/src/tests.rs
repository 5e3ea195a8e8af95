use pretty_assertions::assert_eq;
use rstest::rstest;
use toolmenus_registry::{ComposedEntry, ComposedEntryKind, ComposedMenu, ComposedSection};

use super::*;

fn item(name: &str) -> ComposedEntry {
	let separator = name.starts_with("sep");
	ComposedEntry {
		name: name.to_owned(),
		kind: if separator {
			ComposedEntryKind::Separator
		} else {
			ComposedEntryKind::Action { command: None }
		},
		label: (!separator).then(|| name.to_owned()),
		tooltip: None,
		checked: None,
		enabled: true,
	}
}

fn composed(sections: Vec<(&str, Vec<&str>)>) -> ComposedMenu {
	ComposedMenu {
		name: "Main".to_owned(),
		sections: sections
			.into_iter()
			.map(|(name, entries)| ComposedSection {
				name: name.to_owned(),
				label: Some(format!("{name} Label")),
				entries: entries.into_iter().map(item).collect(),
			})
			.collect(),
		..ComposedMenu::default()
	}
}

fn single(entries: &[&str]) -> ComposedMenu {
	composed(vec![("S", entries.to_vec())])
}

fn kinds(report: &MatchReport) -> Vec<&FailureKind> {
	report.failures().iter().map(|f| &f.kind).collect()
}

fn abc() -> MenuPattern {
	menu("Main", [section("S", [entry("A"), entry("B"), entry("C")])])
}

#[rstest]
#[case::same_order(&["A", "B", "C"], true)]
#[case::swapped(&["A", "C", "B"], false)]
#[case::extra(&["A", "B", "C", "D"], false)]
#[case::short(&["A", "B"], false)]
fn exact_requires_same_items_in_order(#[case] actual: &[&str], #[case] expected: bool) {
	assert_eq!(matches(&abc(), &single(actual), &MatchRules::exact()), expected);
}

#[test]
fn exact_reports_order_mismatch() {
	let report = match_menu(&abc(), &single(&["A", "C", "B"]), &MatchRules::exact());
	let failure = &report.failures()[0];
	assert_eq!(failure.kind, FailureKind::OrderMismatch);
	assert_eq!(failure.tier, Tier::Entry);
	assert_eq!(failure.path, ["S"]);
}

#[test]
fn partial_ignores_order_and_extras() {
	assert!(matches(&abc(), &single(&["C", "X", "B", "A"]), &MatchRules::partial()));
}

#[rstest]
#[case::present("B", true)]
#[case::absent("D", false)]
fn partial_subset(#[case] name: &str, #[case] expected: bool) {
	let pattern = menu("Main", [section("S", [entry(name)])]);
	assert_eq!(matches(&pattern, &single(&["A", "B", "C"]), &MatchRules::partial()), expected);
}

#[test]
fn ordered_allows_gaps() {
	let pattern = menu("Main", [section("S", [entry("A"), entry("C")])]);
	assert!(matches(&pattern, &single(&["A", "B", "C"]), &MatchRules::ordered()));
	assert!(!matches(&pattern, &single(&["C", "B", "A"]), &MatchRules::ordered()));
}

#[rstest]
#[case::glob_first(&["A", "B"])]
#[case::name_last(&["B", "A"])]
fn overlapping_selectors_find_an_assignment(#[case] actual: &[&str]) {
	let pattern = menu("Main", [section("S", [labeled("*"), entry("A")])]);
	let report = match_menu(&pattern, &single(actual), &MatchRules::partial());
	assert!(report.is_match(), "{report}");
}

#[test]
fn overlapping_selectors_still_need_enough_items() {
	let pattern = menu("Main", [section("S", [labeled("*"), entry("A")])]);
	let report = match_menu(&pattern, &single(&["A"]), &MatchRules::partial());
	assert_eq!(kinds(&report), [&FailureKind::Missing]);
}

#[test]
fn optional_entry_leaves_room_for_later_anchor() {
	let pattern = menu("Main", [section("S", [entry("A").optional(), entry("B")])]);
	let report = match_menu(&pattern, &single(&["A", "B", "A"]), &MatchRules::ordered());
	assert!(report.is_match(), "{report}");
}

#[test]
fn one_or_more_stops_before_next_anchor() {
	let pattern = menu("Main", [section("S", [labeled("*").one_or_more(), entry("A")])]);
	assert!(matches(&pattern, &single(&["A", "B", "A"]), &MatchRules::ordered()));
	assert!(matches(&pattern, &single(&["B", "C", "A"]), &MatchRules::exact()));
	assert!(!matches(&pattern, &single(&["A"]), &MatchRules::ordered()));
}

#[rstest]
#[case::none(&["A"])]
#[case::one(&["A", "B"])]
#[case::many(&["A", "B", "C", "D"])]
fn any_wildcard_absorbs_rest(#[case] actual: &[&str]) {
	let pattern = menu("Main", [section("S", [entry("A"), any()])]);
	assert!(matches(&pattern, &single(actual), &MatchRules::exact()));
}

#[rstest]
#[case::none(&["A"], false)]
#[case::one(&["A", "B"], true)]
#[case::two(&["A", "B", "C"], false)]
fn exactly_one_wildcard_counts_remainder(#[case] actual: &[&str], #[case] expected: bool) {
	let pattern = menu("Main", [section("S", [entry("A"), any().occurs(Occurrence::ExactlyOne)])]);
	assert_eq!(matches(&pattern, &single(actual), &MatchRules::exact()), expected);
}

#[rstest]
#[case::none(&["A"], false)]
#[case::many(&["A", "B", "C"], true)]
fn one_or_more_wildcard(#[case] actual: &[&str], #[case] expected: bool) {
	let pattern = menu("Main", [section("S", [entry("A"), any().one_or_more()])]);
	assert_eq!(matches(&pattern, &single(actual), &MatchRules::exact()), expected);
}

#[test]
fn exactly_zero_wildcard_rejects_leftovers() {
	let pattern = menu("Main", [section("S", [entry("A"), any().absent()])]);
	assert!(matches(&pattern, &single(&["A"]), &MatchRules::partial()));
	let report = match_menu(&pattern, &single(&["A", "B"]), &MatchRules::partial());
	assert_eq!(
		kinds(&report),
		[&FailureKind::Occurrence {
			occurrence: Occurrence::ExactlyZero,
			found: 1
		}]
	);
}

#[test]
fn separators_match_by_kind() {
	let pattern = menu("Main", [section("S", [entry("A"), separator(), entry("B")])]);
	assert!(matches(&pattern, &single(&["A", "sep_1", "B"]), &MatchRules::exact()));
	assert!(!matches(&pattern, &single(&["A", "X", "B"]), &MatchRules::exact()));
}

#[test]
fn every_requires_all_remaining() {
	let pattern = menu("Main", [section("S", [separator().every()])]);
	assert!(matches(&pattern, &single(&["sep_1", "sep_2"]), &MatchRules::exact()));
	let report = match_menu(&pattern, &single(&["sep_1", "A"]), &MatchRules::partial());
	assert_eq!(
		report.failures()[0].kind,
		FailureKind::Occurrence {
			occurrence: Occurrence::All,
			found: 1
		}
	);
}

#[test]
fn absent_entry_fails_when_present() {
	let pattern = menu("Main", [section("S", [entry("Delete").absent()])]);
	assert!(matches(&pattern, &single(&["A"]), &MatchRules::partial()));
	assert!(!matches(&pattern, &single(&["A", "Delete"]), &MatchRules::partial()));
}

#[test]
fn label_globs() {
	let actual = single(&["Cut", "Copy", "Paste"]);
	let pattern = menu("Main", [section("S", [labeled("C*").one_or_more(), entry("Paste")])]);
	assert!(matches(&pattern, &actual, &MatchRules::exact()));

	let sections = any_menu([labeled_section("S *", [])]);
	assert!(matches(&sections, &actual, &MatchRules::partial()));
}

#[test]
fn invalid_glob_is_reported() {
	let pattern = menu("Main", [section("S", [labeled("[")])]);
	let report = match_menu(&pattern, &single(&["A"]), &MatchRules::partial());
	assert!(matches!(report.failures()[0].kind, FailureKind::InvalidPattern(_)));
}

#[test]
fn menu_name_is_checked() {
	let report = match_menu(&menu("Other", []), &single(&["A"]), &MatchRules::partial());
	assert_eq!(kinds(&report), [&FailureKind::NameMismatch]);
	assert!(matches(&any_menu([]), &single(&["A"]), &MatchRules::partial()));
}

#[test]
fn loose_tier_needs_one_match() {
	let mut rules = MatchRules::partial();
	rules.entries.actual_has_all_expected_items = false;

	let pattern = menu("Main", [section("S", [entry("A"), entry("D")])]);
	assert!(matches(&pattern, &single(&["A", "B"]), &rules));

	let none = menu("Main", [section("S", [entry("D"), entry("E")])]);
	let report = match_menu(&none, &single(&["A", "B"]), &rules);
	assert_eq!(kinds(&report), [&FailureKind::NoneMatched]);
}

#[test]
fn childless_pattern_under_strict_rules() {
	let pattern = menu("Main", [section("S", [])]);
	assert!(matches(&pattern, &single(&["A"]), &MatchRules::partial()));
	assert!(matches(&pattern, &single(&[]), &MatchRules::exact()));

	let report = match_menu(&pattern, &single(&["A"]), &MatchRules::exact());
	assert_eq!(kinds(&report), [&FailureKind::Unexpected]);
	assert_eq!(report.failures()[0].path, ["S"]);
}

#[test]
fn section_tier_order() {
	let actual = composed(vec![("A", vec!["x"]), ("B", vec!["y"])]);
	let pattern = menu("Main", [section("B", []), section("A", [])]);
	assert!(matches(&pattern, &actual, &MatchRules::partial()));

	let report = match_menu(&pattern, &actual, &MatchRules::ordered());
	assert_eq!(report.failures()[0].tier, Tier::Section);
	assert_eq!(report.failures()[0].kind, FailureKind::OrderMismatch);
}

#[test]
fn entries_are_checked_inside_their_section() {
	let actual = composed(vec![("A", vec!["x"]), ("B", vec!["y"])]);
	let pattern = menu("Main", [section("A", [entry("y")])]);
	let report = match_menu(&pattern, &actual, &MatchRules::partial());
	assert_eq!(kinds(&report), [&FailureKind::Missing]);
	assert_eq!(report.failures()[0].path, ["A"]);
}

#[test]
fn missing_entry_suggests_nearest() {
	let pattern = menu("Main", [section("S", [entry("Cpy")])]);
	let report = match_menu(&pattern, &single(&["Cut", "Copy", "Paste"]), &MatchRules::partial());
	let failure = &report.failures()[0];
	assert_eq!(failure.kind, FailureKind::Missing);
	assert_eq!(failure.candidates.first().map(String::as_str), Some("Copy"));
	assert!(failure.to_string().contains("nearest: Copy"));
}

#[test]
fn report_converts_to_error() {
	let ok = match_menu(&abc(), &single(&["A", "B", "C"]), &MatchRules::exact());
	assert!(ok.into_result().is_ok());

	let err = match_menu(&abc(), &single(&["A", "B"]), &MatchRules::exact())
		.into_result()
		.unwrap_err();
	assert_eq!(err.report().failures().len(), 1);
	assert!(err.to_string().contains("missing"));
}

#[test]
fn every_failure_is_collected() {
	let pattern = menu("Main", [section("S", [entry("X"), entry("Y")]), section("T", [])]);
	let report = match_menu(&pattern, &single(&["A"]), &MatchRules::partial());
	assert_eq!(report.failures().len(), 3);
	assert_eq!(report.failures()[0].tier, Tier::Section);
	assert_eq!(report.failures()[1].path, ["S"]);
}
