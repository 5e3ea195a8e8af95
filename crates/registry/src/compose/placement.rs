//! Relative placement of sections and entries.
//!
//! # Invariants
//!
//! - `First` items stay ahead of everything placed later except earlier `First` items.
//! - `Default` items land ahead of the trailing run of `Last` items.
//! - Several items placed `After` the same anchor keep the order they arrived in.
//! - An anchored item waits until its anchor has been placed. Items whose anchor never
//!   appears are appended as `Default` and reported back to the caller.

use crate::model::{InsertPosition, InsertRelation, Placeable};

/// Places every item of `incoming` into `placed`.
///
/// Runs in passes so that an anchor introduced later in the same batch still resolves.
/// Returns the names of items whose anchor could not be found.
pub(crate) fn place_all<T: Placeable>(placed: &mut Vec<T>, incoming: Vec<T>) -> Vec<String> {
	let mut pending = incoming;

	while let Some(ready) = pending
		.iter()
		.position(|item| anchor_index(placed, item.place_position()).is_some())
	{
		let item = pending.remove(ready);
		place_one(placed, item);
	}

	let unresolved = pending.iter().map(|item| item.place_name().to_owned()).collect();
	for item in pending {
		let index = default_index(placed);
		insert_or_replace(placed, item, index);
	}
	unresolved
}

/// Places a single item, replacing a same-named one.
///
/// A replacement with a default position keeps the old slot; anything else is removed
/// and placed again.
pub(crate) fn place_one<T: Placeable>(placed: &mut Vec<T>, item: T) -> bool {
	if let Some(existing) = find_named(placed, item.place_name()) {
		if item.place_position().is_default() {
			placed[existing] = item;
			return true;
		}
		placed.remove(existing);
	}

	match anchor_index(placed, item.place_position()) {
		Some(index) => {
			placed.insert(index, item);
			true
		}
		None => {
			let index = default_index(placed);
			placed.insert(index, item);
			false
		}
	}
}

fn insert_or_replace<T: Placeable>(placed: &mut Vec<T>, item: T, index: usize) {
	match find_named(placed, item.place_name()) {
		Some(existing) => placed[existing] = item,
		None => placed.insert(index, item),
	}
}

fn find_named<T: Placeable>(placed: &[T], name: &str) -> Option<usize> {
	if name.is_empty() {
		return None;
	}
	placed.iter().position(|p| p.place_name() == name)
}

/// Index at which an item with `position` goes, or `None` while its anchor is missing.
fn anchor_index<T: Placeable>(placed: &[T], position: &InsertPosition) -> Option<usize> {
	match (position.relation, position.anchor()) {
		(InsertRelation::First, _) => Some(
			placed
				.iter()
				.take_while(|p| p.place_position().relation == InsertRelation::First)
				.count(),
		),
		(InsertRelation::Last, _) => Some(placed.len()),
		(InsertRelation::Default, _) | (InsertRelation::Before | InsertRelation::After, None) => {
			Some(default_index(placed))
		}
		(InsertRelation::Before, Some(anchor)) => find_named(placed, anchor),
		(InsertRelation::After, Some(anchor)) => {
			let at = find_named(placed, anchor)?;
			let run = placed[at + 1..]
				.iter()
				.take_while(|p| p.place_position() == position)
				.count();
			Some(at + 1 + run)
		}
	}
}

fn default_index<T: Placeable>(placed: &[T]) -> usize {
	let trailing_last = placed
		.iter()
		.rev()
		.take_while(|p| p.place_position().relation == InsertRelation::Last)
		.count();
	placed.len() - trailing_last
}
