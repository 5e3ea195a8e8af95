//! Section assembly: static sections, contributions and sorters.
//!
//! # Invariants
//!
//! - Levels are merged root first, so inherited entries precede the leaf's own.
//! - Within one level, items added while the menu was registered precede extension items.
//! - Every callback runs inside [`isolate`]; a failure drops that callback's output only.
//!   A failing sorter leaves its section in assembled order.
//! - Extenders mutate a scratch copy that is committed only on success.

use std::mem;

use crate::compose::SectionSet;
use crate::compose::placement;
use crate::config::ToolMenusConfig;
use crate::context::Context;
use crate::contribution::{ContributionKind, EntryConstructor, isolate};
use crate::error::ContributionError;
use crate::model::{Entry, Menu, OwnerToken, Section};

pub(crate) struct Assembler<'a, 'cx> {
	pub(crate) menu: &'a str,
	pub(crate) config: &'a ToolMenusConfig,
	pub(crate) cx: &'a Context<'cx>,
}

impl Assembler<'_, '_> {
	pub(crate) fn assemble(&self, hierarchy: &[&Menu]) -> SectionSet {
		let mut set = SectionSet::new(self.menu);

		for level in hierarchy {
			let batch = registered_first(level.sections.iter().cloned(), |s| s.registered)
				.map(|mut section| {
					self.expand(&mut section);
					section
				})
				.collect();
			set.merge(batch);
		}

		for level in hierarchy {
			for contribution in &level.contributions {
				let ContributionKind::DynamicSection {
					construct,
					insert_position,
				} = &contribution.kind
				else {
					continue;
				};
				let result = isolate(self.config.isolate_panics, || construct.construct(self.cx));
				match result {
					Ok(mut section) => {
						if section.insert_position.is_default() {
							section.insert_position = insert_position.clone();
						}
						self.expand(&mut section);
						set.merge(vec![section]);
					}
					Err(error) => self.report("dynamic_section", &contribution.name, contribution.owner.as_ref(), &error),
				}
			}
		}

		if hierarchy.iter().all(|level| level.extenders_enabled) {
			for level in hierarchy {
				for contribution in &level.contributions {
					let ContributionKind::Extender(extender) = &contribution.kind else {
						continue;
					};
					let mut scratch = set.clone();
					let result = isolate(self.config.isolate_panics, || extender.extend(self.cx, &mut scratch));
					match result {
						Ok(()) => set = scratch,
						Err(error) => self.report("extender", &contribution.name, contribution.owner.as_ref(), &error),
					}
				}
			}
		} else {
			tracing::debug!(menu = self.menu, "extenders disabled for menu");
		}

		for section in set.iter_mut() {
			if !section.has_constructors() {
				continue;
			}
			let mut late = section.header();
			late.constructors = mem::take(&mut section.constructors);
			self.expand(&mut late);
			let unresolved = placement::place_all(&mut section.entries, late.entries);
			for entry in unresolved {
				tracing::warn!(menu = self.menu, section = %section.name, %entry, "entry anchor not found, appended");
			}
		}

		for section in set.iter_mut() {
			let Some(sorter) = section.sorter.clone() else {
				continue;
			};
			let mut sorted = section.entries.clone();
			let result = isolate(self.config.isolate_panics, || {
				sorted.sort_by(|a, b| sorter(a, b, self.cx));
				Ok(())
			});
			match result {
				Ok(()) => section.entries = sorted,
				Err(error) => {
					tracing::error!(menu = self.menu, section = %section.name, %error, "section sorter failed, order kept");
				}
			}
		}

		set
	}

	/// Runs the section's entry constructors and appends their output to its entries.
	fn expand(&self, section: &mut Section) {
		let statics = mem::take(&mut section.entries);
		let constructors = mem::take(&mut section.constructors);
		let (registered, extension): (Vec<Entry>, Vec<Entry>) = statics.into_iter().partition(|e| e.registered);
		let (registered_ctors, extension_ctors): (Vec<EntryConstructor>, Vec<EntryConstructor>) =
			constructors.into_iter().partition(|c| c.registered);

		section.entries = registered;
		for constructor in &registered_ctors {
			self.construct_into(&section.name, constructor, &mut section.entries);
		}
		section.entries.extend(extension);
		for constructor in &extension_ctors {
			self.construct_into(&section.name, constructor, &mut section.entries);
		}
	}

	fn construct_into(&self, section: &str, constructor: &EntryConstructor, out: &mut Vec<Entry>) {
		let mut produced = Vec::new();
		let result = isolate(self.config.isolate_panics, || {
			constructor.construct.construct(self.cx, &mut produced)
		});
		if let Err(error) = result {
			tracing::error!(
				menu = self.menu,
				section,
				contribution = %constructor.name,
				owner = constructor.owner.as_ref().map(OwnerToken::as_str),
				%error,
				"dynamic entries failed"
			);
			return;
		}

		out.extend(produced.into_iter().map(|mut entry| {
			if entry.insert_position.is_default() {
				entry.insert_position = constructor.insert_position.clone();
			}
			if entry.owner.is_none() {
				entry.owner = constructor.owner.clone();
			}
			entry.registered = constructor.registered;
			entry
		}));
	}

	fn report(&self, kind: &'static str, name: &str, owner: Option<&OwnerToken>, error: &ContributionError) {
		tracing::error!(
			menu = self.menu,
			kind,
			contribution = name,
			owner = owner.map(OwnerToken::as_str),
			%error,
			"menu contribution failed"
		);
	}
}

fn registered_first<T>(items: impl Iterator<Item = T>, registered: impl Fn(&T) -> bool) -> impl Iterator<Item = T> {
	let (head, tail): (Vec<T>, Vec<T>) = items.partition(|item| registered(item));
	head.into_iter().chain(tail)
}
