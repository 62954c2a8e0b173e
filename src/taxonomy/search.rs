//! Debounced search session for a search-as-you-type box.
//!
//! Each keystroke calls [`SearchEngine::handle_query`] with a delay future.
//! The call only searches if no newer keystroke arrived during the delay, and
//! only publishes results if no newer keystroke arrived during the search.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use log::debug;

use super::query::Taxonomy;
use super::types::Category;

/// What happened to one query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
	/// Query too short to search; results were cleared.
	Suppressed,
	/// A newer query arrived first; nothing was published.
	Superseded,
	/// Results were published.
	Completed(Vec<Category>),
}

/// Observable state of a search box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
	pub query: String,
	pub results: Vec<Category>,
	/// A search is scheduled or running for `query`.
	pub searching: bool,
}

/// One search box's session.
pub struct SearchEngine {
	taxonomy: Rc<Taxonomy>,
	state: RefCell<SearchState>,
	sequence: Cell<u64>,
	limit: usize,
}

impl SearchEngine {
	/// Session returning up to the configured default number of results.
	pub fn new(taxonomy: Rc<Taxonomy>) -> Self {
		let limit = taxonomy.config().search.default_limit;
		Self::with_limit(taxonomy, limit)
	}

	pub fn with_limit(taxonomy: Rc<Taxonomy>, limit: usize) -> Self {
		Self {
			taxonomy,
			state: RefCell::new(SearchState::default()),
			sequence: Cell::new(0),
			limit,
		}
	}

	/// Quiet period to wait after a keystroke before searching.
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.taxonomy.config().search.debounce_ms)
	}

	pub fn snapshot(&self) -> SearchState {
		self.state.borrow().clone()
	}

	pub fn results(&self) -> Vec<Category> {
		self.state.borrow().results.clone()
	}

	pub fn is_searching(&self) -> bool {
		self.state.borrow().searching
	}

	/// Whether the current query is long enough to search.
	pub fn is_search_mode(&self) -> bool {
		self.is_searchable(&self.state.borrow().query)
	}

	fn is_searchable(&self, query: &str) -> bool {
		query.chars().count() >= self.taxonomy.config().search.min_query_len
	}

	fn begin(&self) -> u64 {
		let ticket = self.sequence.get() + 1;
		self.sequence.set(ticket);
		ticket
	}

	fn is_current(&self, ticket: u64) -> bool {
		self.sequence.get() == ticket
	}

	/// Record a new query and, after `delay`, search for it.
	///
	/// `delay` is normally a timer of [`debounce`](Self::debounce) length; it
	/// is dropped unpolled for queries too short to search.
	pub async fn handle_query(&self, query: &str, delay: impl Future<Output = ()>) -> SearchOutcome {
		let ticket = self.begin();

		{
			let mut state = self.state.borrow_mut();
			state.query = query.to_string();
			if !self.is_searchable(query) {
				state.results.clear();
				state.searching = false;
				return SearchOutcome::Suppressed;
			}
			state.searching = true;
		}

		delay.await;
		if !self.is_current(ticket) {
			return SearchOutcome::Superseded;
		}

		let results = self.taxonomy.search(query, Some(self.limit)).await;
		if !self.is_current(ticket) {
			debug!("taxonomy: dropping stale results for '{query}'");
			return SearchOutcome::Superseded;
		}

		let mut state = self.state.borrow_mut();
		state.results = results.clone();
		state.searching = false;
		SearchOutcome::Completed(results)
	}

	/// Forget the query and results, discarding any pending search.
	pub fn clear(&self) {
		self.begin();
		*self.state.borrow_mut() = SearchState::default();
	}
}
