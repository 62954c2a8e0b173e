//! Where raw dataset text comes from.
//!
//! A [`DatasetSource`] turns a [`DatasetKey`] into the JSON text of one
//! static file. Decoding and caching happen in the store; sources only fetch.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use super::error::{LoadError, Result};
use crate::config::DatasetPaths;

/// Identifies one static dataset file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKey {
	/// Top-level list of partitions.
	Manifest,
	/// Category file of one partition, by partition id.
	Partition(String),
	/// Attribute definition file, by file name.
	AttributeFile(String),
	/// Category id to attribute handle list map.
	CategoryAttributeMap,
	/// Attribute handle to file locator index.
	AttributeIndex,
}

impl fmt::Display for DatasetKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DatasetKey::Manifest => write!(f, "partition manifest"),
			DatasetKey::Partition(id) => write!(f, "partition '{id}'"),
			DatasetKey::AttributeFile(file) => write!(f, "attribute file '{file}'"),
			DatasetKey::CategoryAttributeMap => write!(f, "category attribute map"),
			DatasetKey::AttributeIndex => write!(f, "attribute index"),
		}
	}
}

/// Asynchronous provider of raw dataset text.
///
/// Futures are `'static` and not `Send`: sources run on the browser event loop
/// and may hold `Rc` state.
pub trait DatasetSource {
	/// Fetch the raw JSON text for `key`.
	///
	/// Returns [`LoadError::NotFound`] when nothing is registered for the key.
	fn fetch(&self, key: &DatasetKey) -> LocalBoxFuture<'static, Result<String>>;
}

type Loader = Rc<dyn Fn() -> Result<String>>;

/// Registry of loader functions keyed by dataset.
///
/// Loaders run on demand, once per store cache fill. Useful for datasets
/// compiled into the binary (`include_str!`) and for tests.
#[derive(Clone, Default)]
pub struct StaticSource {
	loaders: HashMap<DatasetKey, Loader>,
}

impl StaticSource {
	/// An empty registry; every fetch reports `NotFound`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a loader function for `key`, replacing any previous one.
	pub fn with_loader(mut self, key: DatasetKey, loader: impl Fn() -> Result<String> + 'static) -> Self {
		self.loaders.insert(key, Rc::new(loader));
		self
	}

	/// Register fixed JSON text for `key`.
	pub fn with_text(self, key: DatasetKey, text: impl Into<String>) -> Self {
		let text = text.into();
		self.with_loader(key, move || Ok(text.clone()))
	}
}

impl DatasetSource for StaticSource {
	fn fetch(&self, key: &DatasetKey) -> LocalBoxFuture<'static, Result<String>> {
		let result = match self.loaders.get(key) {
			Some(loader) => loader(),
			None => Err(LoadError::NotFound(key.clone())),
		};
		future::ready(result).boxed_local()
	}
}

/// Reads datasets embedded in the host page as
/// `<script type="application/json" id="...">` elements.
///
/// Element ids come from [`DatasetPaths`]. The page ships the text eagerly but
/// nothing is parsed until a key is first requested.
#[derive(Clone, Debug)]
pub struct DomSource {
	paths: DatasetPaths,
}

impl DomSource {
	/// Source resolving element ids through `paths`.
	pub fn new(paths: DatasetPaths) -> Self {
		Self { paths }
	}
}

impl DatasetSource for DomSource {
	fn fetch(&self, key: &DatasetKey) -> LocalBoxFuture<'static, Result<String>> {
		let element_id = self.paths.resolve(key);
		debug!("taxonomy: reading {key} from #{element_id}");
		future::ready(read_script_text(key, &element_id)).boxed_local()
	}
}

fn read_script_text(key: &DatasetKey, element_id: &str) -> Result<String> {
	let not_found = || LoadError::NotFound(key.clone());
	let window: Window = web_sys::window().ok_or_else(not_found)?;
	let document = window.document().ok_or_else(not_found)?;
	let element = document.get_element_by_id(element_id).ok_or_else(not_found)?;
	let script: HtmlScriptElement = element.dyn_into().map_err(|_| LoadError::Unavailable {
		key: key.clone(),
		message: format!("#{element_id} is not a script element"),
	})?;
	script.text().map_err(|e| LoadError::Unavailable {
		key: key.clone(),
		message: format!("{e:?}"),
	})
}
