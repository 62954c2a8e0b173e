//! Fixture datasets and instrumented sources for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use serde_json::json;

use super::error::Result;
use super::source::{DatasetKey, DatasetSource, StaticSource};
use super::types::Category;

/// Category with `full_name == name` and a level derived from the id.
pub fn category(id: &str, name: &str, parent: Option<&str>, children: &[&str]) -> Category {
	Category {
		id: id.to_string(),
		name: name.to_string(),
		full_name: name.to_string(),
		level: id.matches('-').count() as u32,
		parent_id: parent.map(str::to_string),
		children: children.iter().map(|c| c.to_string()).collect(),
	}
}

/// Category whose name and level come from its display path.
fn node(id: &str, path: &[&str], parent: Option<&str>, children: &[&str]) -> Category {
	Category {
		full_name: path.join(" > "),
		level: path.len() as u32 - 1,
		..category(id, path[path.len() - 1], parent, children)
	}
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
	serde_json::to_string(value).unwrap()
}

/// Three partitions (`el`, `fa`, and the childless `gc`) plus attribute files.
pub fn fixture_source() -> StaticSource {
	const EL: &str = "Electronics";
	const FA: &str = "Apparel & Accessories";

	let electronics = vec![
		node("el", &[EL], None, &["el-1", "el-2"]),
		node("el-1", &[EL, "Computers"], Some("el"), &["el-1-1", "el-1-2"]),
		node("el-1-1", &[EL, "Computers", "Laptops"], Some("el-1"), &[]),
		node("el-1-2", &[EL, "Computers", "Desktops"], Some("el-1"), &[]),
		node("el-2", &[EL, "Audio"], Some("el"), &[]),
	];
	let apparel = vec![
		node("fa", &[FA], None, &["fa-1", "fa-2"]),
		node("fa-1", &[FA, "Clothing"], Some("fa"), &[]),
		node("fa-2", &[FA, "Bags"], Some("fa"), &["fa-2-1"]),
		node("fa-2-1", &[FA, "Bags", "Laptop Bags"], Some("fa-2"), &[]),
	];
	let gift_cards = vec![node("gc", &["Gift Cards"], None, &[])];

	let manifest = json!([
		{"id": "el", "name": EL, "icon": "laptop", "count": 5},
		{"id": "fa", "name": FA, "icon": "shirt", "count": 4},
		{"id": "gc", "name": "Gift Cards"},
	]);
	let category_map = json!({
		"el-1-1": ["screen-size", "unindexed", "color", "ghost"],
		"el-1": [],
		"fa-1": ["size", "color"],
	});
	let attribute_index = json!({
		"color": {"file": "common-attributes.json", "id": "1"},
		"material": {"file": "common-attributes.json", "id": "2"},
		"ghost": {"file": "common-attributes.json", "id": "9"},
		"screen-size": {"file": "electronics-attributes.json", "id": "3"},
		"size": {"file": "apparel-attributes.json", "id": "4"},
	});
	let attribute = |id: &str, name: &str, handle: &str, values: &[&str]| {
		json!({
			"id": id,
			"name": name,
			"handle": handle,
			"description": format!("{name} of the product"),
			"values": values
				.iter()
				.map(|v| json!({"name": v, "handle": format!("{handle}__{}", v.to_lowercase())}))
				.collect::<Vec<_>>(),
		})
	};

	StaticSource::new()
		.with_text(DatasetKey::Manifest, manifest.to_string())
		.with_text(DatasetKey::Partition("el".into()), to_json(&electronics))
		.with_text(DatasetKey::Partition("fa".into()), to_json(&apparel))
		.with_text(DatasetKey::Partition("gc".into()), to_json(&gift_cards))
		.with_text(DatasetKey::CategoryAttributeMap, category_map.to_string())
		.with_text(DatasetKey::AttributeIndex, attribute_index.to_string())
		.with_text(
			DatasetKey::AttributeFile("common-attributes.json".into()),
			json!({"attributes": [
				attribute("1", "Color", "color", &["Red", "Blue"]),
				attribute("2", "Material", "material", &["Cotton"]),
			]})
			.to_string(),
		)
		.with_text(
			DatasetKey::AttributeFile("electronics-attributes.json".into()),
			json!({"attributes": [attribute("3", "Screen size", "screen-size", &["13in", "15in"])]})
				.to_string(),
		)
		.with_text(
			DatasetKey::AttributeFile("apparel-attributes.json".into()),
			json!({"attributes": [attribute("4", "Size", "size", &["S", "M", "L"])]}).to_string(),
		)
}

/// Wraps a source and counts fetches per key.
#[derive(Clone)]
pub struct CountingSource {
	inner: Rc<dyn DatasetSource>,
	counts: Rc<RefCell<HashMap<DatasetKey, usize>>>,
}

impl CountingSource {
	pub fn new(inner: impl DatasetSource + 'static) -> Self {
		Self {
			inner: Rc::new(inner),
			counts: Rc::default(),
		}
	}

	pub fn fetches(&self, key: &DatasetKey) -> usize {
		self.counts.borrow().get(key).copied().unwrap_or(0)
	}

	pub fn total_fetches(&self) -> usize {
		self.counts.borrow().values().sum()
	}
}

impl DatasetSource for CountingSource {
	fn fetch(&self, key: &DatasetKey) -> LocalBoxFuture<'static, Result<String>> {
		*self.counts.borrow_mut().entry(key.clone()).or_insert(0) += 1;
		self.inner.fetch(key)
	}
}

/// Holds every fetch until the test releases its key, so tests decide the
/// order in which loads complete. Keys marked open pass straight through.
#[derive(Clone)]
pub struct GatedSource {
	inner: Rc<dyn DatasetSource>,
	open: Rc<RefCell<HashSet<DatasetKey>>>,
	waiting: Rc<RefCell<Vec<(DatasetKey, oneshot::Sender<()>)>>>,
	fetches: Rc<Cell<usize>>,
}

impl GatedSource {
	pub fn new(inner: impl DatasetSource + 'static) -> Self {
		Self {
			inner: Rc::new(inner),
			open: Rc::default(),
			waiting: Rc::default(),
			fetches: Rc::default(),
		}
	}

	/// Let fetches of `key` complete immediately from now on.
	pub fn open(&self, key: &DatasetKey) {
		self.open.borrow_mut().insert(key.clone());
	}

	/// Complete every fetch of `key` that is currently held.
	pub fn release(&self, key: &DatasetKey) {
		let mut waiting = self.waiting.borrow_mut();
		let (released, held): (Vec<_>, Vec<_>) = waiting.drain(..).partition(|(k, _)| k == key);
		*waiting = held;
		drop(waiting);
		for (_, gate) in released {
			let _ = gate.send(());
		}
	}

	/// Number of fetches currently held.
	pub fn pending(&self) -> usize {
		self.waiting.borrow().len()
	}

	pub fn fetches(&self) -> usize {
		self.fetches.get()
	}
}

impl DatasetSource for GatedSource {
	fn fetch(&self, key: &DatasetKey) -> LocalBoxFuture<'static, Result<String>> {
		self.fetches.set(self.fetches.get() + 1);
		let inner = self.inner.fetch(key);
		if self.open.borrow().contains(key) {
			return inner;
		}

		let (gate, opened) = oneshot::channel();
		self.waiting.borrow_mut().push((key.clone(), gate));
		async move {
			let _ = opened.await;
			inner.await
		}
		.boxed_local()
	}
}
