//! Runtime configuration for the taxonomy datasets.
//!
//! The host page may embed a `<script id="taxonomy-config">` JSON element;
//! every field is optional and falls back to the product-taxonomy layout.

use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::taxonomy::DatasetKey;

/// Element id of the optional embedded configuration.
pub const CONFIG_ELEMENT_ID: &str = "taxonomy-config";

/// Placeholder substituted with the partition id or attribute file name.
const KEY_PLACEHOLDER: &str = "{key}";

/// Layout of the partition files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetFormat {
	/// Manifest is a partition list; partitions are flat category arrays.
	#[default]
	ProductTaxonomy,
	/// Manifest maps state names to slugs; partitions are nested
	/// district/taluka/village files.
	Locations,
}

/// Where each dataset file is found (element ids or file names).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
	pub manifest: String,
	/// Pattern containing `{key}`, replaced by the partition id.
	pub partition: String,
	/// Pattern containing `{key}`, replaced by the attribute file name.
	pub attribute_file: String,
	pub category_attribute_map: String,
	pub attribute_index: String,
}

impl Default for DatasetPaths {
	fn default() -> Self {
		Self {
			manifest: "taxonomy-verticals".into(),
			partition: "taxonomy-categories-{key}".into(),
			attribute_file: "taxonomy-attributes-{key}".into(),
			category_attribute_map: "taxonomy-category-attributes-map".into(),
			attribute_index: "taxonomy-attribute-index".into(),
		}
	}
}

impl DatasetPaths {
	/// Concrete location of `key`.
	pub fn resolve(&self, key: &DatasetKey) -> String {
		match key {
			DatasetKey::Manifest => self.manifest.clone(),
			DatasetKey::Partition(id) => self.partition.replace(KEY_PLACEHOLDER, id),
			DatasetKey::AttributeFile(file) => self.attribute_file.replace(KEY_PLACEHOLDER, file),
			DatasetKey::CategoryAttributeMap => self.category_attribute_map.clone(),
			DatasetKey::AttributeIndex => self.attribute_index.clone(),
		}
	}
}

/// Search behavior.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
	/// Quiet period after the last keystroke before a search runs.
	pub debounce_ms: u64,
	/// Queries shorter than this (in characters) never search.
	pub min_query_len: usize,
	/// Result cap used when the caller gives none.
	pub default_limit: usize,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			debounce_ms: 300,
			min_query_len: 2,
			default_limit: 10,
		}
	}
}

/// Complete configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
	pub format: DatasetFormat,
	/// Separator between id segments; the first segment is the partition id.
	pub id_separator: char,
	pub paths: DatasetPaths,
	pub search: SearchConfig,
}

impl Default for TaxonomyConfig {
	fn default() -> Self {
		Self {
			format: DatasetFormat::ProductTaxonomy,
			id_separator: '-',
			paths: DatasetPaths::default(),
			search: SearchConfig::default(),
		}
	}
}

impl TaxonomyConfig {
	/// Preset for the state/district/taluka/village datasets.
	///
	/// State slugs contain `-`, so location ids use `:` between segments.
	pub fn locations() -> Self {
		Self {
			format: DatasetFormat::Locations,
			id_separator: ':',
			paths: DatasetPaths {
				manifest: "locations-index".into(),
				partition: "locations-{key}".into(),
				..DatasetPaths::default()
			},
			search: SearchConfig::default(),
		}
	}

	/// Parse configuration JSON, keeping defaults for absent fields.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Load from the page's configuration element, falling back to defaults.
	pub fn load() -> Self {
		let Some(text) = read_config_element() else {
			log::info!("taxonomy: #{CONFIG_ELEMENT_ID} not found, using default configuration");
			return Self::default();
		};

		Self::from_json(&text).unwrap_or_else(|e| {
			log::warn!("taxonomy: invalid #{CONFIG_ELEMENT_ID}: {e}, using default configuration");
			Self::default()
		})
	}
}

fn read_config_element() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config = TaxonomyConfig::from_json(r#"{"search": {"debounce_ms": 150}}"#).unwrap();
		assert_eq!(config.search.debounce_ms, 150);
		assert_eq!(config.search.min_query_len, 2);
		assert_eq!(config.search.default_limit, 10);
		assert_eq!(config.id_separator, '-');
		assert_eq!(config.format, DatasetFormat::ProductTaxonomy);
	}

	#[test]
	fn reads_locations_format() {
		let config =
			TaxonomyConfig::from_json(r#"{"format": "locations", "id_separator": ":"}"#).unwrap();
		assert_eq!(config.format, DatasetFormat::Locations);
		assert_eq!(config.id_separator, ':');
	}

	#[test]
	fn paths_substitute_keys() {
		let paths = DatasetPaths::default();
		assert_eq!(
			paths.resolve(&DatasetKey::Partition("el".into())),
			"taxonomy-categories-el"
		);
		assert_eq!(
			paths.resolve(&DatasetKey::AttributeFile("apparel-attributes.json".into())),
			"taxonomy-attributes-apparel-attributes.json"
		);
		assert_eq!(paths.resolve(&DatasetKey::AttributeIndex), "taxonomy-attribute-index");
	}

	#[test]
	fn location_preset_points_at_location_files() {
		let config = TaxonomyConfig::locations();
		assert_eq!(
			config.paths.resolve(&DatasetKey::Partition("goa".into())),
			"locations-goa"
		);
		assert_eq!(config.paths.resolve(&DatasetKey::Manifest), "locations-index");
	}
}
