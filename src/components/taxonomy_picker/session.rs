//! Navigation and search state behind one picker instance.

use std::future::Future;
use std::rc::Rc;

use crate::taxonomy::{
	Category, Navigator, NavigatorState, SearchEngine, SearchOutcome, SearchState, Taxonomy,
};

/// A picker's drill-down session paired with its search box.
///
/// The component keeps one of these per mounted picker and copies its
/// snapshots into signals after every transition.
pub struct PickerSession {
	navigator: Navigator,
	search: SearchEngine,
}

impl PickerSession {
	pub fn new(taxonomy: Rc<Taxonomy>) -> Self {
		Self {
			navigator: Navigator::new(taxonomy.clone()),
			search: SearchEngine::new(taxonomy),
		}
	}

	pub fn navigator(&self) -> &Navigator {
		&self.navigator
	}

	pub fn search(&self) -> &SearchEngine {
		&self.search
	}

	pub fn navigator_state(&self) -> NavigatorState {
		self.navigator.snapshot()
	}

	pub fn search_state(&self) -> SearchState {
		self.search.snapshot()
	}

	/// Feed one keystroke's query to the search box.
	pub async fn type_query(&self, query: &str, delay: impl Future<Output = ()>) -> SearchOutcome {
		self.search.handle_query(query, delay).await
	}

	/// Leave search mode and jump the drill-down to `category`.
	pub async fn pick_search_result(&self, category: &Category) -> bool {
		self.search.clear();
		self.navigator.select_search_result(category).await
	}

	/// Drop the selection, the drill-down and any search in flight.
	pub fn reset(&self) {
		self.search.clear();
		self.navigator.reset();
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;
	use futures::future;

	use super::*;
	use crate::config::TaxonomyConfig;
	use crate::taxonomy::NavigatorPhase;
	use crate::taxonomy::testing;

	fn session() -> PickerSession {
		let taxonomy = Taxonomy::new(Rc::new(testing::fixture_source()), TaxonomyConfig::default());
		PickerSession::new(Rc::new(taxonomy))
	}

	#[test]
	fn picking_a_result_leaves_search_mode() {
		let session = session();
		let results = match block_on(session.type_query("laptop bags", future::ready(()))) {
			SearchOutcome::Completed(results) => results,
			other => panic!("expected results, got {other:?}"),
		};
		assert_eq!(results.len(), 1);

		assert!(block_on(session.pick_search_result(&results[0])));
		assert_eq!(session.search_state(), SearchState::default());

		let state = session.navigator_state();
		assert_eq!(state.phase(), NavigatorPhase::LeafSelected);
		let selection = state.selection.unwrap();
		assert_eq!(selection.id, "fa-2-1");
		assert_eq!(selection.path, "Apparel & Accessories > Bags > Laptop Bags");
	}

	#[test]
	fn reset_clears_both_halves() {
		let session = session();
		block_on(session.navigator().select_partition("el"));
		block_on(session.type_query("audio", future::ready(())));

		session.reset();
		assert_eq!(session.navigator_state(), NavigatorState::default());
		assert_eq!(session.search_state(), SearchState::default());
	}
}
