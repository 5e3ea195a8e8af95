use std::fmt;
use std::sync::Arc;

use crate::context::Context;

/// A value that is either fixed at registration time or computed from the [`Context`] at
/// composition time.
pub enum Attribute<T> {
	Static(T),
	Dynamic(Arc<dyn Fn(&Context<'_>) -> T>),
}

impl<T: Clone> Attribute<T> {
	/// Wraps a function of the composition context.
	pub fn dynamic(f: impl Fn(&Context<'_>) -> T + 'static) -> Self {
		Self::Dynamic(Arc::new(f))
	}

	/// Evaluates the attribute against `cx`.
	pub fn get(&self, cx: &Context<'_>) -> T {
		match self {
			Self::Static(value) => value.clone(),
			Self::Dynamic(f) => f(cx),
		}
	}

	/// Returns the fixed value, if this attribute is not lazy.
	pub fn as_static(&self) -> Option<&T> {
		match self {
			Self::Static(value) => Some(value),
			Self::Dynamic(_) => None,
		}
	}

	pub fn is_dynamic(&self) -> bool {
		matches!(self, Self::Dynamic(_))
	}
}

impl<T: Clone> Clone for Attribute<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Static(value) => Self::Static(value.clone()),
			Self::Dynamic(f) => Self::Dynamic(Arc::clone(f)),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Attribute<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
			Self::Dynamic(_) => f.write_str("Dynamic(..)"),
		}
	}
}

impl<T> From<T> for Attribute<T> {
	fn from(value: T) -> Self {
		Self::Static(value)
	}
}

impl From<&str> for Attribute<String> {
	fn from(value: &str) -> Self {
		Self::Static(value.to_owned())
	}
}
