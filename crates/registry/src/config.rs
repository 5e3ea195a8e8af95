//! Engine configuration.
//!
//! Loaded from TOML; every field is optional and falls back to [`ToolMenusConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Knobs that change how the registry reports problems and shapes composed output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolMenusConfig {
	/// Log a warning when `register` hits a menu that is already registered.
	pub warn_on_duplicate_register: bool,
	/// Drop sections that end up with no visible entries.
	pub prune_empty_sections: bool,
	/// Contain panics raised by contribution callbacks.
	pub isolate_panics: bool,
	/// Drop command-bound actions the context's command list does not map.
	pub hide_unmapped_commands: bool,
}

impl Default for ToolMenusConfig {
	fn default() -> Self {
		Self {
			warn_on_duplicate_register: true,
			prune_empty_sections: true,
			isolate_panics: true,
			hide_unmapped_commands: true,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid toolmenus config: {0}")]
	Parse(#[from] toml::de::Error),
}

impl ToolMenusConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&input)
	}
}
