use std::fmt;
use std::sync::Arc;

/// Names the caller that contributed a section, entry or callback.
///
/// Cheap to clone. Two tokens are equal when their names are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerToken(Arc<str>);

impl OwnerToken {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for OwnerToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "OwnerToken({:?})", &*self.0)
	}
}

impl fmt::Display for OwnerToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for OwnerToken {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for OwnerToken {
	fn from(name: String) -> Self {
		Self(Arc::from(name))
	}
}
