//! Process-lifetime cache of decoded dataset files.
//!
//! Each key is fetched at most once. Concurrent callers asking for the same key
//! before the first fetch completes await the same shared future. Entries are
//! never evicted: dataset files are immutable for the lifetime of a deployment.
//!
//! Loads soft-fail. An unregistered key, a fetch error or a decode error is
//! logged and cached as the empty value, so callers only ever see data.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use log::{debug, warn};
use serde::de::DeserializeOwned;

use super::attributes::AttributeTable;
use super::error::{LoadError, Result};
use super::index::PartitionIndex;
use super::location::{self, LocationHierarchy};
use super::source::{DatasetKey, DatasetSource};
use super::types::{AttributeFile, AttributeLocator, Category, Partition};
use crate::config::{DatasetFormat, TaxonomyConfig};

/// Category id to ordered attribute handles.
pub type CategoryAttributeMap = HashMap<String, Vec<String>>;

/// Attribute handle to the file holding its definition.
pub type AttributeIndex = HashMap<String, AttributeLocator>;

type SharedLoad<V> = Shared<LocalBoxFuture<'static, V>>;

/// Memoized in-flight or completed loads for one kind of dataset.
struct LoadCache<V: Clone> {
	entries: RefCell<HashMap<DatasetKey, SharedLoad<V>>>,
}

impl<V: Clone + 'static> LoadCache<V> {
	fn new() -> Self {
		Self {
			entries: RefCell::new(HashMap::new()),
		}
	}

	/// Existing load for `key`, or a new one started by `start`.
	fn get_or_start(
		&self,
		key: &DatasetKey,
		start: impl FnOnce() -> LocalBoxFuture<'static, V>,
	) -> SharedLoad<V> {
		if let Some(existing) = self.entries.borrow().get(key) {
			return existing.clone();
		}
		let load = start().shared();
		self.entries.borrow_mut().insert(key.clone(), load.clone());
		load
	}

	fn is_ready(&self, key: &DatasetKey) -> bool {
		self.entries
			.borrow()
			.get(key)
			.is_some_and(|load| load.peek().is_some())
	}
}

/// Lazily loaded, deduplicated view of every dataset file.
///
/// Meant to be created once by the application root and shared (`Rc`) with
/// the navigator, search and attribute components.
pub struct DatasetStore {
	source: Rc<dyn DatasetSource>,
	format: DatasetFormat,
	id_separator: char,
	manifest: LoadCache<Rc<Vec<Partition>>>,
	partitions: LoadCache<Rc<PartitionIndex>>,
	attribute_files: LoadCache<Rc<AttributeTable>>,
	category_attributes: LoadCache<Rc<CategoryAttributeMap>>,
	attribute_index: LoadCache<Rc<AttributeIndex>>,
}

impl DatasetStore {
	pub fn new(source: Rc<dyn DatasetSource>, config: &TaxonomyConfig) -> Self {
		Self {
			source,
			format: config.format,
			id_separator: config.id_separator,
			manifest: LoadCache::new(),
			partitions: LoadCache::new(),
			attribute_files: LoadCache::new(),
			category_attributes: LoadCache::new(),
			attribute_index: LoadCache::new(),
		}
	}

	/// All partitions, in manifest order.
	pub async fn load_manifest(&self) -> Rc<Vec<Partition>> {
		let key = DatasetKey::Manifest;
		let format = self.format;
		self.manifest
			.get_or_start(&key, || {
				self.fetch_decoded(
					key.clone(),
					move |key, text| {
						let partitions = match format {
							DatasetFormat::ProductTaxonomy => decode::<Vec<Partition>>(key, text)?,
							DatasetFormat::Locations => location::partitions_from_state_index(
								decode::<BTreeMap<String, String>>(key, text)?,
							),
						};
						debug!("taxonomy: loaded {key} ({} partitions)", partitions.len());
						Ok(Rc::new(partitions))
					},
					|| Rc::new(Vec::new()),
				)
			})
			.await
	}

	/// Indexed categories of one partition; empty when it does not exist.
	pub async fn load_partition(&self, partition_id: &str) -> Rc<PartitionIndex> {
		let key = DatasetKey::Partition(partition_id.to_string());
		let (format, separator) = (self.format, self.id_separator);
		let id = partition_id.to_string();
		let fallback_id = id.clone();
		self.partitions
			.get_or_start(&key, || {
				self.fetch_decoded(
					key.clone(),
					move |key, text| {
						let categories = match format {
							DatasetFormat::ProductTaxonomy => decode::<Vec<Category>>(key, text)?,
							DatasetFormat::Locations => location::flatten_state(
								&id,
								&decode::<LocationHierarchy>(key, text)?,
								separator,
							),
						};
						debug!("taxonomy: loaded {key} ({} categories)", categories.len());
						Ok(Rc::new(PartitionIndex::build(id, categories)))
					},
					move || Rc::new(PartitionIndex::empty(fallback_id)),
				)
			})
			.await
	}

	/// Definitions in one attribute file, keyed by handle.
	pub async fn load_attribute_file(&self, file: &str) -> Rc<AttributeTable> {
		let key = DatasetKey::AttributeFile(file.to_string());
		self.attribute_files
			.get_or_start(&key, || {
				self.fetch_decoded(
					key.clone(),
					|key, text| {
						let file = decode::<AttributeFile>(key, text)?;
						debug!("taxonomy: loaded {key} ({} attributes)", file.attributes.len());
						Ok(Rc::new(AttributeTable::new(file.attributes)))
					},
					|| Rc::new(AttributeTable::default()),
				)
			})
			.await
	}

	pub async fn load_category_attribute_map(&self) -> Rc<CategoryAttributeMap> {
		let key = DatasetKey::CategoryAttributeMap;
		self.category_attributes
			.get_or_start(&key, || {
				self.fetch_decoded(
					key.clone(),
					|key, text| Ok(Rc::new(decode::<CategoryAttributeMap>(key, text)?)),
					|| Rc::new(CategoryAttributeMap::new()),
				)
			})
			.await
	}

	pub async fn load_attribute_index(&self) -> Rc<AttributeIndex> {
		let key = DatasetKey::AttributeIndex;
		self.attribute_index
			.get_or_start(&key, || {
				self.fetch_decoded(
					key.clone(),
					|key, text| Ok(Rc::new(decode::<AttributeIndex>(key, text)?)),
					|| Rc::new(AttributeIndex::new()),
				)
			})
			.await
	}

	/// Whether the partition's load has already completed.
	pub fn is_partition_loaded(&self, partition_id: &str) -> bool {
		self.partitions
			.is_ready(&DatasetKey::Partition(partition_id.to_string()))
	}

	/// Whether the attribute file's load has already completed.
	pub fn is_attribute_file_loaded(&self, file: &str) -> bool {
		self.attribute_files
			.is_ready(&DatasetKey::AttributeFile(file.to_string()))
	}

	fn fetch_decoded<V: 'static>(
		&self,
		key: DatasetKey,
		decode: impl FnOnce(&DatasetKey, &str) -> Result<V> + 'static,
		fallback: impl FnOnce() -> V + 'static,
	) -> LocalBoxFuture<'static, V> {
		let fetch = self.source.fetch(&key);
		async move {
			let decoded = match fetch.await {
				Ok(text) => decode(&key, &text),
				Err(e) => Err(e),
			};
			decoded.unwrap_or_else(|e| {
				report_failure(&e);
				fallback()
			})
		}
		.boxed_local()
	}
}

fn decode<T: DeserializeOwned>(key: &DatasetKey, text: &str) -> Result<T> {
	serde_json::from_str(text).map_err(|source| LoadError::Malformed {
		key: key.clone(),
		source,
	})
}

fn report_failure(error: &LoadError) {
	if error.is_not_found() {
		debug!("taxonomy: {error}, treating as empty");
	} else {
		warn!("taxonomy: {error}, treating as empty");
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::{LocalPool, block_on};
	use futures::task::LocalSpawnExt;

	use super::*;
	use crate::taxonomy::source::StaticSource;
	use crate::taxonomy::testing::{self, CountingSource, GatedSource};

	fn store(source: Rc<dyn DatasetSource>) -> DatasetStore {
		DatasetStore::new(source, &TaxonomyConfig::default())
	}

	#[test]
	fn loads_partition_once() {
		let source = CountingSource::new(testing::fixture_source());
		let store = store(Rc::new(source.clone()));
		let key = DatasetKey::Partition("el".into());

		let first = block_on(store.load_partition("el"));
		for _ in 0..4 {
			let again = block_on(store.load_partition("el"));
			assert!(Rc::ptr_eq(&first, &again));
		}
		assert_eq!(source.fetches(&key), 1);
		assert!(store.is_partition_loaded("el"));
		assert!(!store.is_partition_loaded("fa"));
	}

	#[test]
	fn concurrent_loads_share_one_fetch() {
		let gated = GatedSource::new(testing::fixture_source());
		let store = Rc::new(store(Rc::new(gated.clone())));
		let results = Rc::new(RefCell::new(Vec::new()));

		let mut pool = LocalPool::new();
		for _ in 0..3 {
			let (store, results) = (store.clone(), results.clone());
			pool.spawner()
				.spawn_local(async move {
					let index = store.load_partition("el").await;
					results.borrow_mut().push(index);
				})
				.unwrap();
		}
		pool.run_until_stalled();
		assert!(results.borrow().is_empty());
		assert_eq!(gated.pending(), 1);

		gated.release(&DatasetKey::Partition("el".into()));
		pool.run_until_stalled();

		let results = results.borrow();
		assert_eq!(results.len(), 3);
		assert_eq!(results[0].len(), results[2].len());
		assert!(Rc::ptr_eq(&results[0], &results[1]));
		assert_eq!(gated.fetches(), 1);
	}

	#[test]
	fn unknown_partition_is_empty() {
		let store = store(Rc::new(testing::fixture_source()));
		let index = block_on(store.load_partition("zz"));
		assert!(index.is_empty());
		assert_eq!(index.partition_id(), "zz");
	}

	#[test]
	fn malformed_file_is_empty_and_cached() {
		let source = CountingSource::new(
			StaticSource::new().with_text(DatasetKey::Partition("el".into()), "{not json"),
		);
		let store = store(Rc::new(source.clone()));
		assert!(block_on(store.load_partition("el")).is_empty());
		assert!(block_on(store.load_partition("el")).is_empty());
		assert_eq!(source.fetches(&DatasetKey::Partition("el".into())), 1);
	}

	#[test]
	fn loads_attribute_datasets() {
		let store = store(Rc::new(testing::fixture_source()));
		let map = block_on(store.load_category_attribute_map());
		assert_eq!(map["el-1-1"][0], "color");
		let index = block_on(store.load_attribute_index());
		assert_eq!(index["screen-size"].file, "electronics-attributes.json");
		let table = block_on(store.load_attribute_file("common-attributes.json"));
		assert_eq!(table.get("color").unwrap().name, "Color");
		assert!(store.is_attribute_file_loaded("common-attributes.json"));
		assert!(block_on(store.load_attribute_file("missing.json")).is_empty());
	}

	#[test]
	fn manifest_lists_partitions_in_order() {
		let store = store(Rc::new(testing::fixture_source()));
		let ids: Vec<_> = block_on(store.load_manifest())
			.iter()
			.map(|p| p.id.clone())
			.collect();
		assert_eq!(ids, vec!["el", "fa", "gc"]);
	}
}
