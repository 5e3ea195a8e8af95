//! Runtime state handed to every composition.
//!
//! A [`Context`] borrows caller-owned objects for the duration of one
//! [`generate`](crate::ToolMenus::generate) call. Contributions look objects up by type; the
//! registry never stores a context or anything borrowed from it.

use std::any::{Any, TypeId};
use std::fmt;

use rustc_hash::FxHashMap as HashMap;

use crate::model::CheckState;

/// Command surface used by action entries bound to a command id.
pub trait CommandList {
	/// Whether `command` has a binding in this list.
	fn is_mapped(&self, command: &str) -> bool;

	fn can_execute(&self, command: &str) -> bool {
		self.is_mapped(command)
	}

	fn is_visible(&self, _command: &str) -> bool {
		true
	}

	fn checked_state(&self, _command: &str) -> CheckState {
		CheckState::Unchecked
	}

	/// Runs the command. Returns false when it is unmapped or cannot execute.
	fn execute(&self, command: &str) -> bool;
}

/// Ordered, type-keyed bag of borrowed context objects plus an optional command list.
#[derive(Clone, Default)]
pub struct Context<'a> {
	objects: Vec<&'a (dyn Any + 'static)>,
	commands: Option<&'a dyn CommandList>,
	editing: bool,
}

impl<'a> Context<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_object<T: Any>(mut self, object: &'a T) -> Self {
		self.add_object(object);
		self
	}

	pub fn add_object<T: Any>(&mut self, object: &'a T) {
		self.objects.push(object);
	}

	/// Returns the first object of type `T`, in insertion order.
	pub fn find<T: Any>(&self) -> Option<&'a T> {
		self.objects
			.iter()
			.copied()
			.find_map(|object| object.downcast_ref::<T>())
	}

	/// Returns every object of type `T`, in insertion order.
	pub fn find_all<T: Any>(&self) -> impl Iterator<Item = &'a T> + '_ {
		self.objects
			.iter()
			.copied()
			.filter_map(|object| object.downcast_ref::<T>())
	}

	pub fn contains<T: Any>(&self) -> bool {
		let wanted = TypeId::of::<T>();
		self.objects.iter().any(|object| (**object).type_id() == wanted)
	}

	pub fn len(&self) -> usize {
		self.objects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.is_empty()
	}

	pub fn with_commands(mut self, commands: &'a dyn CommandList) -> Self {
		self.commands = Some(commands);
		self
	}

	pub fn commands(&self) -> Option<&'a dyn CommandList> {
		self.commands
	}

	/// Runs `command` through the command list, if any.
	pub fn execute(&self, command: &str) -> bool {
		let Some(commands) = self.commands else {
			return false;
		};
		commands.is_mapped(command) && commands.can_execute(command) && commands.execute(command)
	}

	/// Marks the context as belonging to a menu editor; customizations are not applied.
	pub fn editing(mut self, editing: bool) -> Self {
		self.editing = editing;
		self
	}

	pub fn is_editing(&self) -> bool {
		self.editing
	}
}

impl fmt::Debug for Context<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("objects", &self.objects.len())
			.field("commands", &self.commands.is_some())
			.field("editing", &self.editing)
			.finish()
	}
}

/// A command binding held by [`CommandMap`].
pub struct CommandBinding {
	execute: Box<dyn Fn()>,
	can_execute: Option<Box<dyn Fn() -> bool>>,
	is_visible: Option<Box<dyn Fn() -> bool>>,
	checked: Option<Box<dyn Fn() -> CheckState>>,
}

impl CommandBinding {
	pub fn new(execute: impl Fn() + 'static) -> Self {
		Self {
			execute: Box::new(execute),
			can_execute: None,
			is_visible: None,
			checked: None,
		}
	}

	pub fn with_can_execute(mut self, can_execute: impl Fn() -> bool + 'static) -> Self {
		self.can_execute = Some(Box::new(can_execute));
		self
	}

	pub fn with_visible(mut self, is_visible: impl Fn() -> bool + 'static) -> Self {
		self.is_visible = Some(Box::new(is_visible));
		self
	}

	pub fn with_checked(mut self, checked: impl Fn() -> CheckState + 'static) -> Self {
		self.checked = Some(Box::new(checked));
		self
	}
}

impl fmt::Debug for CommandBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandBinding")
			.field("can_execute", &self.can_execute.is_some())
			.field("is_visible", &self.is_visible.is_some())
			.field("checked", &self.checked.is_some())
			.finish_non_exhaustive()
	}
}

/// [`CommandList`] backed by a map from command id to closures.
#[derive(Debug, Default)]
pub struct CommandMap {
	bindings: HashMap<String, CommandBinding>,
}

impl CommandMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn map(&mut self, command: impl Into<String>, binding: CommandBinding) -> &mut Self {
		self.bindings.insert(command.into(), binding);
		self
	}

	pub fn unmap(&mut self, command: &str) -> bool {
		self.bindings.remove(command).is_some()
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}

impl CommandList for CommandMap {
	fn is_mapped(&self, command: &str) -> bool {
		self.bindings.contains_key(command)
	}

	fn can_execute(&self, command: &str) -> bool {
		self.bindings
			.get(command)
			.is_some_and(|binding| binding.can_execute.as_ref().is_none_or(|f| f()))
	}

	fn is_visible(&self, command: &str) -> bool {
		self.bindings
			.get(command)
			.is_some_and(|binding| binding.is_visible.as_ref().is_none_or(|f| f()))
	}

	fn checked_state(&self, command: &str) -> CheckState {
		self.bindings
			.get(command)
			.and_then(|binding| binding.checked.as_ref())
			.map_or(CheckState::Unchecked, |f| f())
	}

	fn execute(&self, command: &str) -> bool {
		match self.bindings.get(command) {
			Some(binding) if binding.can_execute.as_ref().is_none_or(|f| f()) => {
				(binding.execute)();
				true
			}
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::*;

	struct Selection(Vec<&'static str>);
	struct Viewport {
		realtime: bool,
	}

	#[test]
	fn find_returns_first_object_of_type() {
		let first = Selection(vec!["a"]);
		let second = Selection(vec!["b", "c"]);
		let viewport = Viewport { realtime: true };
		let cx = Context::new()
			.with_object(&first)
			.with_object(&viewport)
			.with_object(&second);

		assert_eq!(cx.find::<Selection>().map(|s| s.0.len()), Some(1));
		assert_eq!(cx.find_all::<Selection>().count(), 2);
		assert!(cx.find::<Viewport>().is_some_and(|v| v.realtime));
		assert!(cx.contains::<Viewport>());
		assert!(!cx.contains::<String>());
		assert_eq!(cx.len(), 3);
	}

	#[test]
	fn execute_routes_through_command_map() {
		let hits = Rc::new(Cell::new(0));
		let enabled = Rc::new(Cell::new(true));

		let mut commands = CommandMap::new();
		let counter = Rc::clone(&hits);
		let gate = Rc::clone(&enabled);
		commands.map(
			"save",
			CommandBinding::new(move || counter.set(counter.get() + 1))
				.with_can_execute(move || gate.get()),
		);

		let cx = Context::new().with_commands(&commands);
		assert!(cx.execute("save"));
		assert!(!cx.execute("missing"));

		enabled.set(false);
		assert!(!cx.execute("save"));
		assert_eq!(hits.get(), 1);
	}

	#[test]
	fn execute_without_commands_is_a_noop() {
		assert!(!Context::new().execute("save"));
	}

	#[test]
	fn checked_state_defaults_to_unchecked() {
		let mut commands = CommandMap::new();
		commands.map("wrap", CommandBinding::new(|| {}));
		commands.map(
			"grid",
			CommandBinding::new(|| {}).with_checked(|| CheckState::Checked),
		);

		assert_eq!(commands.checked_state("wrap"), CheckState::Unchecked);
		assert_eq!(commands.checked_state("grid"), CheckState::Checked);
		assert_eq!(commands.checked_state("nope"), CheckState::Unchecked);
	}
}
