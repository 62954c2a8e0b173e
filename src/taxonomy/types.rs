//! Dataset records and navigator outputs.
//!
//! Everything here mirrors the static JSON files shipped with the frontend
//! build. Category nodes reference children by id only, which keeps each
//! partition file small enough to load on demand.

use serde::{Deserialize, Serialize};

/// A node in a partition's category tree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
	/// Globally unique id. The segment before the first separator names the
	/// partition the node lives in (e.g. `"el"` for `"el-12-4"`).
	pub id: String,
	/// Short display name.
	pub name: String,
	/// Fully qualified display path, e.g. `"Electronics > Computers > Laptops"`.
	pub full_name: String,
	/// Depth from the partition root (root is 0).
	pub level: u32,
	/// Parent id; `None` only at the partition root.
	#[serde(default)]
	pub parent_id: Option<String>,
	/// Ordered child ids.
	#[serde(default)]
	pub children: Vec<String>,
}

impl Category {
	/// Whether the node has any children listed.
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}
}

/// A top-level, independently loadable subtree (product vertical or state).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Partition {
	/// Short id or slug, also the id of the partition's root category.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Icon hint for the UI (emoji or icon name).
	#[serde(default)]
	pub icon: String,
	/// Number of categories in the partition, as recorded in the manifest.
	#[serde(default)]
	pub count: usize,
}

/// One step of a root-to-node path.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BreadcrumbEntry {
	pub id: String,
	pub name: String,
}

impl From<&Category> for BreadcrumbEntry {
	fn from(category: &Category) -> Self {
		Self {
			id: category.id.clone(),
			name: category.name.clone(),
		}
	}
}

impl From<&Partition> for BreadcrumbEntry {
	fn from(partition: &Partition) -> Self {
		Self {
			id: partition.id.clone(),
			name: partition.name.clone(),
		}
	}
}

/// How a form should collect a value for an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeInputType {
	Text,
	Textarea,
	Select,
	MultiSelect,
	Number,
	Boolean,
	Color,
}

/// A permitted value of an attribute.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttributeValue {
	pub name: String,
	#[serde(default)]
	pub handle: String,
}

/// A product attribute definition, stored in one of the attribute files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttributeDefinition {
	pub id: String,
	pub name: String,
	/// Stable cross-reference key used by the category map and the index.
	pub handle: String,
	#[serde(default)]
	pub description: String,
	/// Permitted values, in display order.
	#[serde(default)]
	pub values: Vec<AttributeValue>,
	#[serde(default)]
	pub input_type: Option<AttributeInputType>,
	#[serde(default)]
	pub required: bool,
}

/// Where an attribute definition lives: which file, and its id there.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttributeLocator {
	pub file: String,
	pub id: String,
}

/// On-disk shape of an attribute definition file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AttributeFile {
	#[serde(default)]
	pub attributes: Vec<AttributeDefinition>,
}

/// A category resolved together with its position in the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
	pub category: Category,
	pub has_children: bool,
	/// Root-to-node path, inclusive of the node itself.
	pub breadcrumb: Vec<BreadcrumbEntry>,
	/// Only populated by [`Taxonomy::category_with_attributes`](super::Taxonomy::category_with_attributes).
	pub attributes: Vec<AttributeDefinition>,
}

/// The navigator's current output.
///
/// Replaced wholesale on every pick, never edited in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Selection {
	pub id: String,
	pub name: String,
	/// Full display path, e.g. `"Electronics > Computers > Laptops"`.
	pub path: String,
	pub partition_id: String,
	pub partition_name: String,
}

impl Selection {
	pub(crate) fn of_category(category: &Category, partition: &Partition) -> Self {
		Self {
			id: category.id.clone(),
			name: category.name.clone(),
			path: category.full_name.clone(),
			partition_id: partition.id.clone(),
			partition_name: partition.name.clone(),
		}
	}

	/// A partition without subcategories is itself a valid pick.
	pub(crate) fn of_partition(partition: &Partition) -> Self {
		Self {
			id: partition.id.clone(),
			name: partition.name.clone(),
			path: partition.name.clone(),
			partition_id: partition.id.clone(),
			partition_name: partition.name.clone(),
		}
	}
}
