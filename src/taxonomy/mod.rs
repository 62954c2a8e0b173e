//! Lazy-loading taxonomy and location hierarchy resolver.
//!
//! Large static hierarchies (tens of thousands of product categories, or
//! Indian state/district/taluka/village trees) are split into one file per
//! top-level partition. This module loads only the partitions an interaction
//! needs and answers tree queries over them:
//!
//! - [`DatasetStore`]: fetch-once, shared-in-flight cache of decoded files
//! - [`PartitionIndex`]: id lookup and parent/child traversal per partition
//! - [`Taxonomy`]: the query surface (children, category, search, attributes)
//! - [`Navigator`]: a drill-down session with breadcrumb and selection
//! - [`SearchEngine`]: a debounced search-as-you-type session
//! - [`AttributeResolver`]: category attribute definitions from split files
//!
//! Everything is single-threaded (`Rc`/`RefCell`) and asynchronous, matching
//! the browser event loop.
//!
//! # Example
//!
//! ```ignore
//! let source = StaticSource::new()
//!     .with_text(DatasetKey::Manifest, include_str!("verticals.json"))
//!     .with_loader(DatasetKey::Partition("el".into()), || Ok(read_el()?));
//! let taxonomy = Rc::new(Taxonomy::new(Rc::new(source), TaxonomyConfig::default()));
//!
//! let navigator = Navigator::new(taxonomy.clone());
//! navigator.select_partition("el").await;
//! let hits = taxonomy.search("lap", None).await;
//! ```

mod attributes;
mod error;
mod index;
pub mod location;
mod navigator;
mod query;
mod search;
mod source;
mod store;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use attributes::{AttributeResolver, AttributeTable};
pub use error::LoadError;
pub use index::{IndexReport, PartitionIndex};
pub use navigator::{Navigator, NavigatorPhase, NavigatorState};
pub use query::Taxonomy;
pub use search::{SearchEngine, SearchOutcome, SearchState};
pub use source::{DatasetKey, DatasetSource, DomSource, StaticSource};
pub use store::{AttributeIndex, CategoryAttributeMap, DatasetStore};
pub use types::{
	AttributeDefinition, AttributeFile, AttributeInputType, AttributeLocator, AttributeValue,
	BreadcrumbEntry, Category, CategoryDetail, Partition, Selection,
};
