//! Public query surface over the datasets.
//!
//! Unresolvable ids never fail: they produce an empty list or `None`, which
//! the UI treats the same as an empty subtree.

use std::rc::Rc;

use futures::future::join_all;

use super::attributes::AttributeResolver;
use super::source::DatasetSource;
use super::store::DatasetStore;
use super::types::{AttributeDefinition, Category, CategoryDetail, Partition};
use crate::config::TaxonomyConfig;

/// Read-only taxonomy queries backed by a shared [`DatasetStore`].
pub struct Taxonomy {
	config: TaxonomyConfig,
	store: Rc<DatasetStore>,
	attributes: AttributeResolver,
}

impl Taxonomy {
	/// Taxonomy over a fresh store reading from `source`.
	pub fn new(source: Rc<dyn DatasetSource>, config: TaxonomyConfig) -> Self {
		let store = Rc::new(DatasetStore::new(source, &config));
		Self::with_store(store, config)
	}

	/// Taxonomy sharing an existing store.
	pub fn with_store(store: Rc<DatasetStore>, config: TaxonomyConfig) -> Self {
		Self {
			attributes: AttributeResolver::new(store.clone()),
			config,
			store,
		}
	}

	pub fn config(&self) -> &TaxonomyConfig {
		&self.config
	}

	pub fn store(&self) -> &Rc<DatasetStore> {
		&self.store
	}

	/// Partition id encoded in a category id (its first segment).
	pub fn partition_of<'a>(&self, category_id: &'a str) -> &'a str {
		category_id
			.split(self.config.id_separator)
			.next()
			.unwrap_or(category_id)
	}

	/// Every partition, in manifest order.
	pub async fn list_partitions(&self) -> Rc<Vec<Partition>> {
		self.store.load_manifest().await
	}

	/// Manifest entry for `partition_id`.
	pub async fn partition(&self, partition_id: &str) -> Option<Partition> {
		self.list_partitions()
			.await
			.iter()
			.find(|p| p.id == partition_id)
			.cloned()
	}

	/// Manifest entry whose display name matches `name`, ignoring case.
	pub async fn find_partition_by_name(&self, name: &str) -> Option<Partition> {
		let wanted = name.trim().to_lowercase();
		self.list_partitions()
			.await
			.iter()
			.find(|p| p.name.to_lowercase() == wanted)
			.cloned()
	}

	/// Direct children of `parent_id` (a partition id or a category id).
	pub async fn get_children(&self, parent_id: &str) -> Vec<Category> {
		let index = self.store.load_partition(self.partition_of(parent_id)).await;
		index.children_of(parent_id).into_iter().cloned().collect()
	}

	/// A category with its root-to-node breadcrumb.
	pub async fn get_category(&self, category_id: &str) -> Option<CategoryDetail> {
		let index = self.store.load_partition(self.partition_of(category_id)).await;
		let category = index.get(category_id)?;
		Some(CategoryDetail {
			has_children: category.has_children(),
			breadcrumb: index.breadcrumb(category_id),
			category: category.clone(),
			attributes: Vec::new(),
		})
	}

	/// [`get_category`](Self::get_category) with its attribute definitions filled in.
	pub async fn category_with_attributes(&self, category_id: &str) -> Option<CategoryDetail> {
		let mut detail = self.get_category(category_id).await?;
		detail.attributes = self.attributes.attributes_for(category_id).await;
		Some(detail)
	}

	/// Case-insensitive name substring search across every partition.
	///
	/// Queries shorter than the configured minimum return nothing without
	/// loading any data. The first search loads all partitions in parallel;
	/// later ones reuse them. Results follow manifest order, then file order,
	/// and stop at `limit` (configured default when `None`).
	pub async fn search(&self, query: &str, limit: Option<usize>) -> Vec<Category> {
		let limit = limit.unwrap_or(self.config.search.default_limit);
		if limit == 0 || query.chars().count() < self.config.search.min_query_len {
			return Vec::new();
		}

		let needle = query.to_lowercase();
		let partitions = self.list_partitions().await;
		let indices = join_all(partitions.iter().map(|p| self.store.load_partition(&p.id))).await;

		let mut results = Vec::new();
		for category in indices.iter().flat_map(|index| index.categories()) {
			if category.name.to_lowercase().contains(&needle) {
				results.push(category.clone());
				if results.len() >= limit {
					break;
				}
			}
		}
		results
	}

	/// Attribute definitions applicable to `category_id`, in mapped order.
	pub async fn get_attributes_for_category(&self, category_id: &str) -> Vec<AttributeDefinition> {
		self.attributes.attributes_for(category_id).await
	}

	/// Every attribute definition. Loads all attribute files; use sparingly.
	pub async fn get_all_attributes(&self) -> Vec<AttributeDefinition> {
		self.attributes.all_attributes().await
	}
}
