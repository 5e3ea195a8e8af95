use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

/// Matching rules for one tier (sections or entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierRules {
	/// Every expected item must be found. When false, one match is enough.
	pub actual_has_all_expected_items: bool,
	/// Matched items must appear in expected order (gaps allowed).
	pub actual_has_expected_order: bool,
	/// Every actual item must be accounted for by some expected item.
	pub expected_has_all_actual_items: bool,
	/// With no expected children, skip the children entirely. When false, a parent without
	/// expected children only matches a parent without actual children.
	pub match_children_if_any_expected: bool,
}

impl Default for TierRules {
	fn default() -> Self {
		Self {
			actual_has_all_expected_items: true,
			actual_has_expected_order: false,
			expected_has_all_actual_items: false,
			match_children_if_any_expected: true,
		}
	}
}

impl TierRules {
	pub const fn strict() -> Self {
		Self {
			actual_has_all_expected_items: true,
			actual_has_expected_order: true,
			expected_has_all_actual_items: true,
			match_children_if_any_expected: false,
		}
	}
}

/// Per-tier rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchRules {
	pub sections: TierRules,
	pub entries: TierRules,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid match rules: {0}")]
pub struct RulesError(#[from] toml::de::Error);

impl MatchRules {
	/// Subset, unordered matching on both tiers.
	pub fn partial() -> Self {
		Self::default()
	}

	/// Same items, same order, nothing extra, on both tiers.
	pub fn exact() -> Self {
		Self {
			sections: TierRules::strict(),
			entries: TierRules::strict(),
		}
	}

	/// Subset matching that also checks relative order.
	pub fn ordered() -> Self {
		let tier = TierRules {
			actual_has_expected_order: true,
			..TierRules::default()
		};
		Self {
			sections: tier,
			entries: tier,
		}
	}

	/// Parses one rule set:
	///
	/// ```toml
	/// [sections]
	/// actual_has_expected_order = true
	///
	/// [entries]
	/// expected_has_all_actual_items = true
	/// ```
	pub fn from_toml_str(input: &str) -> Result<Self, RulesError> {
		Ok(toml::from_str(input)?)
	}

	/// Parses a table of named rule sets, one TOML table per preset.
	pub fn presets_from_toml_str(input: &str) -> Result<HashMap<String, Self>, RulesError> {
		Ok(toml::from_str(input)?)
	}
}
