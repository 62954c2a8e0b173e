//! Category attribute resolution.
//!
//! Attribute definitions are split across several files so that a form only
//! pulls the files its category needs. Two small maps mediate the lookup:
//! category id to handle list, and handle to `{file, id}` locator.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use futures::future::join_all;
use log::debug;

use super::store::DatasetStore;
use super::types::AttributeDefinition;

/// Definitions of one attribute file, addressable by handle.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
	definitions: Vec<AttributeDefinition>,
	by_handle: HashMap<String, usize>,
}

impl AttributeTable {
	/// Index `definitions` by handle; a repeated handle keeps its first definition.
	pub fn new(definitions: Vec<AttributeDefinition>) -> Self {
		let mut by_handle = HashMap::with_capacity(definitions.len());
		for (pos, definition) in definitions.iter().enumerate() {
			by_handle.entry(definition.handle.clone()).or_insert(pos);
		}
		Self {
			definitions,
			by_handle,
		}
	}

	pub fn get(&self, handle: &str) -> Option<&AttributeDefinition> {
		self.by_handle.get(handle).map(|&pos| &self.definitions[pos])
	}

	/// Definitions in file order.
	pub fn definitions(&self) -> &[AttributeDefinition] {
		&self.definitions
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

/// Resolves the attribute definitions that apply to a category.
#[derive(Clone)]
pub struct AttributeResolver {
	store: Rc<DatasetStore>,
}

impl AttributeResolver {
	pub fn new(store: Rc<DatasetStore>) -> Self {
		Self { store }
	}

	/// Definitions for `category_id`, in the order the category map lists them.
	///
	/// Only the files holding the needed handles are loaded, in parallel.
	/// Handles without an index entry, or missing from their file, are skipped.
	pub async fn attributes_for(&self, category_id: &str) -> Vec<AttributeDefinition> {
		let category_map = self.store.load_category_attribute_map().await;
		let Some(handles) = category_map.get(category_id).filter(|h| !h.is_empty()) else {
			return Vec::new();
		};

		let index = self.store.load_attribute_index().await;

		let mut files: Vec<&str> = Vec::new();
		for handle in handles {
			match index.get(handle) {
				Some(locator) if !files.contains(&locator.file.as_str()) => {
					files.push(&locator.file)
				}
				Some(_) => {}
				None => debug!("taxonomy: attribute '{handle}' of '{category_id}' is not indexed"),
			}
		}

		let loaded = join_all(files.iter().map(|file| self.store.load_attribute_file(file))).await;
		let tables: HashMap<&str, Rc<AttributeTable>> = files.into_iter().zip(loaded).collect();

		handles
			.iter()
			.filter_map(|handle| {
				let locator = index.get(handle)?;
				let definition = tables.get(locator.file.as_str())?.get(handle);
				if definition.is_none() {
					debug!(
						"taxonomy: attribute '{handle}' missing from '{}'",
						locator.file
					);
				}
				definition.cloned()
			})
			.collect()
	}

	/// Every definition in every indexed file.
	///
	/// Loads all attribute files. Meant for administrative screens, not for
	/// interactive paths. Files are visited in name order, definitions in file
	/// order.
	pub async fn all_attributes(&self) -> Vec<AttributeDefinition> {
		let index = self.store.load_attribute_index().await;
		let files: BTreeSet<&str> = index.values().map(|locator| locator.file.as_str()).collect();

		join_all(files.into_iter().map(|file| self.store.load_attribute_file(file)))
			.await
			.iter()
			.flat_map(|table| table.definitions().iter().cloned())
			.collect()
	}
}
