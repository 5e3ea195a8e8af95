//! Tier matching.
//!
//! # Algorithm
//!
//! Per tier, named and label patterns are resolved first against the actual items. In
//! ordered mode each pattern searches only after the previous match (earliest available
//! wins), so order is checked without requiring contiguity. Unordered mode assigns one item
//! to every required pattern by maximum bipartite matching, so overlapping selectors never
//! produce a false mismatch. `All` and `ExactlyZero` patterns then inspect what is left,
//! wildcards check the remainder by count, and the coverage rules of the tier decide which
//! leftovers and misses are failures.

use globset::{Glob, GlobMatcher};
use toolmenus_registry::{ComposedEntry, ComposedMenu, ComposedSection};

use crate::pattern::{MenuPattern, Occurrence, PatternNode, Selector};
use crate::report::{FailureKind, MatchFailure, MatchReport, Tier};
use crate::rules::{MatchRules, TierRules};

/// Compares `expected` against `actual` and collects every failure.
pub fn match_menu(expected: &MenuPattern, actual: &ComposedMenu, rules: &MatchRules) -> MatchReport {
	let mut report = MatchReport::default();

	if let Some(name) = &expected.name
		&& *name != actual.name
	{
		report.push(MatchFailure {
			tier: Tier::Menu,
			path: Vec::new(),
			expected: format!("{name:?}"),
			kind: FailureKind::NameMismatch,
			candidates: vec![actual.name.clone()],
		});
	}

	let assigned = {
		let mut tier = TierMatch {
			tier: Tier::Section,
			path: &[],
			rules: &rules.sections,
			report: &mut report,
		};
		tier.run(&expected.sections, &actual.sections)
	};

	for (pattern, section) in assigned {
		let pattern = &expected.sections[pattern];
		let section = &actual.sections[section];
		let path = [section.name.clone()];
		let mut tier = TierMatch {
			tier: Tier::Entry,
			path: &path,
			rules: &rules.entries,
			report: &mut report,
		};
		tier.run(&pattern.entries, &section.entries);
	}

	tracing::trace!(menu = %actual.name, failures = report.failures().len(), "matched menu");
	report
}

/// Whether `actual` matches `expected` under `rules`.
pub fn matches(expected: &MenuPattern, actual: &ComposedMenu, rules: &MatchRules) -> bool {
	match_menu(expected, actual, rules).is_match()
}

/// An actual item as seen by a selector.
trait Candidate {
	fn name(&self) -> &str;
	fn label(&self) -> Option<&str>;
	fn is_separator(&self) -> bool;
}

impl Candidate for ComposedSection {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn is_separator(&self) -> bool {
		false
	}
}

impl Candidate for ComposedEntry {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn is_separator(&self) -> bool {
		ComposedEntry::is_separator(self)
	}
}

enum Compiled {
	Name(String),
	Label(GlobMatcher),
	Separator,
	Wildcard,
}

impl Compiled {
	fn new(selector: &Selector) -> Result<Self, globset::Error> {
		Ok(match selector {
			Selector::Name(name) => Self::Name(name.clone()),
			Selector::Label(glob) => Self::Label(Glob::new(glob)?.compile_matcher()),
			Selector::Separator => Self::Separator,
			Selector::Wildcard => Self::Wildcard,
		})
	}

	fn accepts(&self, item: &impl Candidate) -> bool {
		match self {
			Self::Name(name) => item.name() == name,
			Self::Label(glob) => item.label().is_some_and(|label| glob.is_match(label)),
			Self::Separator => item.is_separator(),
			Self::Wildcard => true,
		}
	}
}

struct TierMatch<'a> {
	tier: Tier,
	path: &'a [String],
	rules: &'a TierRules,
	report: &'a mut MatchReport,
}

/// A non-wildcard pattern with its compiled selector.
struct Expected<'p, P> {
	index: usize,
	pattern: &'p P,
	selector: Compiled,
}

impl<P: PatternNode> Expected<'_, P> {
	/// Needs at least one item of its own.
	fn is_required(&self) -> bool {
		matches!(self.pattern.occurrence(), Occurrence::ExactlyOne | Occurrence::OneOrMore)
	}

	fn is_multi(&self) -> bool {
		matches!(self.pattern.occurrence(), Occurrence::OneOrMore | Occurrence::Any)
	}
}

#[derive(Default)]
struct Progress {
	consumed: Vec<bool>,
	assigned: Vec<(usize, usize)>,
	soft_misses: usize,
	any_matched: bool,
}

impl Progress {
	/// Unconsumed items at or after `from` that `selector` accepts, in actual order.
	fn hits<A: Candidate>(&self, selector: &Compiled, actual: &[A], from: usize) -> Vec<usize> {
		(from..actual.len())
			.filter(|&i| !self.consumed[i] && selector.accepts(&actual[i]))
			.collect()
	}

	fn take(&mut self, pattern: usize, items: &[usize]) {
		for &i in items {
			self.consumed[i] = true;
			self.assigned.push((pattern, i));
		}
		self.any_matched |= !items.is_empty();
	}
}

impl TierMatch<'_> {
	/// Matches one tier. Returns `(expected index, actual index)` for every item consumed by
	/// a non-wildcard pattern, ordered by expected index.
	fn run<P: PatternNode, A: Candidate>(&mut self, expected: &[P], actual: &[A]) -> Vec<(usize, usize)> {
		if expected.is_empty() {
			if !self.rules.match_children_if_any_expected {
				for item in actual {
					self.fail(format!("{:?}", item.name()), FailureKind::Unexpected, Vec::new());
				}
			}
			return Vec::new();
		}

		let mut patterns = Vec::new();
		let mut wildcards = Vec::new();
		for (index, pattern) in expected.iter().enumerate() {
			match Compiled::new(pattern.selector()) {
				Ok(Compiled::Wildcard) => wildcards.push(pattern.occurrence()),
				Ok(selector) => patterns.push(Expected { index, pattern, selector }),
				Err(error) => {
					self.fail(pattern.selector().to_string(), FailureKind::InvalidPattern(error.to_string()), Vec::new());
				}
			}
		}

		let mut progress = Progress {
			consumed: vec![false; actual.len()],
			..Progress::default()
		};
		if self.rules.actual_has_expected_order {
			self.match_ordered(&patterns, actual, &mut progress);
		} else {
			self.match_unordered(&patterns, actual, &mut progress);
		}
		for current in &patterns {
			match current.pattern.occurrence() {
				Occurrence::All => self.take_every(current, actual, &mut progress),
				Occurrence::ExactlyZero => {
					let found = progress.hits(&current.selector, actual, 0).len();
					if found > 0 {
						self.fail_occurrence(current.pattern, found, actual);
					}
				}
				_ => {}
			}
		}

		if progress.soft_misses > 0 && !progress.any_matched {
			self.fail(
				format!("{} expected item(s)", progress.soft_misses),
				FailureKind::NoneMatched,
				actual.iter().take(3).map(|item| item.name().to_owned()).collect(),
			);
		}

		let remaining = progress.consumed.iter().filter(|c| !**c).count();
		if !wildcards.is_empty() && self.check_wildcards(&wildcards, remaining) {
			progress.consumed.iter_mut().for_each(|c| *c = true);
		}

		if self.rules.expected_has_all_actual_items {
			for (item, _) in actual.iter().zip(&progress.consumed).filter(|(_, c)| !**c) {
				self.fail(format!("{:?}", item.name()), FailureKind::Unexpected, Vec::new());
			}
		}

		progress.assigned.sort_unstable();
		progress.assigned
	}

	/// Walks expected and actual in lock-step. Each required pattern takes the earliest hit
	/// after the previous match. A multi pattern stops before the earliest hit of the next
	/// required pattern, so it never starves a later anchor.
	fn match_ordered<P: PatternNode, A: Candidate>(
		&mut self,
		patterns: &[Expected<'_, P>],
		actual: &[A],
		progress: &mut Progress,
	) {
		let mut cursor = 0;
		for (position, current) in patterns.iter().enumerate() {
			let occurrence = current.pattern.occurrence();
			let hits = progress.hits(&current.selector, actual, cursor);
			let taken: Vec<usize> = match occurrence {
				Occurrence::ExactlyOne => hits.into_iter().take(1).collect(),
				Occurrence::OneOrMore | Occurrence::Any => {
					let keep_first = usize::from(occurrence == Occurrence::OneOrMore);
					let floor = match hits.first() {
						Some(&first) if keep_first == 1 => first + 1,
						_ => cursor,
					};
					let limit = patterns[position + 1..]
						.iter()
						.find(|next| next.is_required())
						.and_then(|next| progress.hits(&next.selector, actual, floor).first().copied())
						.unwrap_or(actual.len());
					hits.iter()
						.enumerate()
						.filter(|&(n, &i)| n < keep_first || i < limit)
						.map(|(_, &i)| i)
						.collect()
				}
				Occurrence::All | Occurrence::ExactlyZero => continue,
			};

			if let Some(&last) = taken.last() {
				cursor = last + 1;
				progress.take(current.index, &taken);
			} else if occurrence != Occurrence::Any {
				let earlier = (0..cursor).any(|i| !progress.consumed[i] && current.selector.accepts(&actual[i]));
				self.miss(current, actual, progress, earlier);
			}
		}
	}

	/// Assigns one item to every required pattern by maximum bipartite matching over the
	/// could-match relation, then lets multi patterns absorb their other hits.
	fn match_unordered<P: PatternNode, A: Candidate>(
		&mut self,
		patterns: &[Expected<'_, P>],
		actual: &[A],
		progress: &mut Progress,
	) {
		let required: Vec<&Expected<'_, P>> = patterns.iter().filter(|current| current.is_required()).collect();
		let edges: Vec<Vec<usize>> = required
			.iter()
			.map(|current| progress.hits(&current.selector, actual, 0))
			.collect();
		let cover = cover(&edges, actual.len());

		for (current, item) in required.iter().zip(&cover) {
			if let Some(item) = item {
				progress.take(current.index, &[*item]);
			}
		}
		for (current, _) in required.iter().zip(&cover).filter(|(_, item)| item.is_none()) {
			self.miss(current, actual, progress, false);
		}
		for current in patterns.iter().filter(|current| current.is_multi()) {
			let extra = progress.hits(&current.selector, actual, 0);
			progress.take(current.index, &extra);
		}
	}

	fn take_every<P: PatternNode, A: Candidate>(
		&mut self,
		current: &Expected<'_, P>,
		actual: &[A],
		progress: &mut Progress,
	) {
		let remaining: Vec<usize> = (0..actual.len()).filter(|&i| !progress.consumed[i]).collect();
		let found = remaining
			.iter()
			.filter(|&&i| current.selector.accepts(&actual[i]))
			.count();
		if found < remaining.len() {
			self.fail_occurrence(current.pattern, found, actual);
		} else if remaining.is_empty() {
			self.miss(current, actual, progress, false);
		} else {
			progress.take(current.index, &remaining);
		}
	}

	/// Records a required pattern without a match.
	fn miss<P: PatternNode, A: Candidate>(
		&mut self,
		current: &Expected<'_, P>,
		actual: &[A],
		progress: &mut Progress,
		earlier: bool,
	) {
		let selector = current.pattern.selector();
		if earlier {
			self.fail(selector.to_string(), FailureKind::OrderMismatch, Vec::new());
		} else if self.rules.actual_has_all_expected_items {
			let candidates = nearest(selector, actual, &progress.consumed);
			self.fail(selector.to_string(), FailureKind::Missing, candidates);
		} else {
			progress.soft_misses += 1;
		}
	}

	/// Applies the counting rule for wildcards. Returns whether the remaining items are
	/// absorbed.
	fn check_wildcards(&mut self, wildcards: &[Occurrence], remaining: usize) -> bool {
		let count = |wanted: &[Occurrence]| wildcards.iter().filter(|o| wanted.contains(o)).count();
		let ones = count(&[Occurrence::ExactlyOne]);
		let mores = count(&[Occurrence::OneOrMore]);
		let absorbers = count(&[Occurrence::Any, Occurrence::All]);
		let zeros = count(&[Occurrence::ExactlyZero]);

		if zeros > 0 && remaining > 0 {
			self.fail_wildcard(Occurrence::ExactlyZero, remaining);
			return false;
		}
		if mores == 0 && absorbers == 0 {
			if ones > 0 && remaining != ones {
				self.fail_wildcard(Occurrence::ExactlyOne, remaining);
				return false;
			}
		} else if remaining < ones + mores {
			let occurrence = if mores > 0 { Occurrence::OneOrMore } else { Occurrence::ExactlyOne };
			self.fail_wildcard(occurrence, remaining);
			return false;
		}
		ones + mores + absorbers > 0
	}

	fn fail_wildcard(&mut self, occurrence: Occurrence, found: usize) {
		self.fail(Selector::Wildcard.to_string(), FailureKind::Occurrence { occurrence, found }, Vec::new());
	}

	fn fail_occurrence<P: PatternNode, A: Candidate>(&mut self, pattern: &P, found: usize, actual: &[A]) {
		let candidates = nearest(pattern.selector(), actual, &vec![false; actual.len()]);
		self.fail(
			pattern.selector().to_string(),
			FailureKind::Occurrence {
				occurrence: pattern.occurrence(),
				found,
			},
			candidates,
		);
	}

	fn fail(&mut self, expected: String, kind: FailureKind, candidates: Vec<String>) {
		self.report.push(MatchFailure {
			tier: self.tier,
			path: self.path.to_vec(),
			expected,
			kind,
			candidates,
		});
	}
}

/// Maximum bipartite matching by augmenting paths. `edges[slot]` lists the items a slot may
/// take; the result holds the item given to each slot.
fn cover(edges: &[Vec<usize>], items: usize) -> Vec<Option<usize>> {
	let mut owner: Vec<Option<usize>> = vec![None; items];
	for slot in 0..edges.len() {
		let mut seen = vec![false; items];
		augment(slot, edges, &mut owner, &mut seen);
	}

	let mut assigned = vec![None; edges.len()];
	for (item, slot) in owner.into_iter().enumerate() {
		if let Some(slot) = slot {
			assigned[slot] = Some(item);
		}
	}
	assigned
}

fn augment(slot: usize, edges: &[Vec<usize>], owner: &mut [Option<usize>], seen: &mut [bool]) -> bool {
	for &item in &edges[slot] {
		if seen[item] {
			continue;
		}
		seen[item] = true;
		let free = match owner[item] {
			None => true,
			Some(other) => augment(other, edges, owner, seen),
		};
		if free {
			owner[item] = Some(slot);
			return true;
		}
	}
	false
}

/// Up to three unconsumed actual names closest to the selector's text.
fn nearest<A: Candidate>(selector: &Selector, actual: &[A], consumed: &[bool]) -> Vec<String> {
	let (needle, by_label) = match selector {
		Selector::Name(name) => (name.as_str(), false),
		Selector::Label(glob) => (glob.as_str(), true),
		Selector::Separator | Selector::Wildcard => return Vec::new(),
	};

	let mut scored: Vec<(f64, &str)> = actual
		.iter()
		.zip(consumed)
		.filter(|(_, c)| !**c)
		.filter_map(|(item, _)| {
			let text = if by_label { item.label()? } else { item.name() };
			Some((strsim::jaro_winkler(needle, text), text))
		})
		.collect();
	scored.sort_by(|a, b| b.0.total_cmp(&a.0));
	scored.into_iter().take(3).map(|(_, text)| text.to_owned()).collect()
}
