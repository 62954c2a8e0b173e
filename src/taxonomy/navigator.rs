//! Stateful drill-down session over one taxonomy.
//!
//! A navigator tracks the chosen partition, one option list per visible depth
//! (`levels`), the breadcrumb and the current [`Selection`]. Methods take
//! `&self` so the UI can start a new transition while an earlier one is still
//! loading.
//!
//! Every transition takes a ticket from a monotonic counter when it is called,
//! and claims the session with that ticket once it knows it will change
//! anything. A claim fails if a later ticket has already claimed, and a
//! suspended transition only writes state if its claim is still the latest
//! when it resumes. Calls that turn out to be no-ops never claim, so they
//! leave loads in flight untouched. A slow load that finishes after the user
//! has moved on is dropped; the underlying fetch still completes and stays
//! cached.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use super::query::Taxonomy;
use super::types::{BreadcrumbEntry, Category, Partition, Selection};

/// Coarse position of a session in the drill-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigatorPhase {
	/// No partition chosen.
	Empty,
	/// Partition chosen, its root children listed, nothing picked.
	PartitionSelected,
	/// Breadcrumb of the given length with a level listed per entry.
	AtDepth(usize),
	/// The current pick has nothing further to drill into.
	LeafSelected,
}

/// Snapshot of a navigation session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigatorState {
	pub partition: Option<Partition>,
	/// `levels[0]` holds the partition root's children, `levels[i]` the
	/// children of `breadcrumb[i]`.
	pub levels: Vec<Vec<Category>>,
	pub breadcrumb: Vec<BreadcrumbEntry>,
	pub selection: Option<Selection>,
	pub loading: bool,
}

impl NavigatorState {
	pub fn phase(&self) -> NavigatorPhase {
		if self.partition.is_none() {
			NavigatorPhase::Empty
		} else if self.selection.is_some()
			&& !self.loading
			&& self.levels.len() < self.breadcrumb.len()
		{
			NavigatorPhase::LeafSelected
		} else if self.breadcrumb.len() <= 1 {
			NavigatorPhase::PartitionSelected
		} else {
			NavigatorPhase::AtDepth(self.breadcrumb.len())
		}
	}
}

/// One UI session's navigation state machine.
pub struct Navigator {
	taxonomy: Rc<Taxonomy>,
	state: RefCell<NavigatorState>,
	issued: Cell<u64>,
	claimed: Cell<u64>,
}

impl Navigator {
	pub fn new(taxonomy: Rc<Taxonomy>) -> Self {
		Self {
			taxonomy,
			state: RefCell::new(NavigatorState::default()),
			issued: Cell::new(0),
			claimed: Cell::new(0),
		}
	}

	pub fn taxonomy(&self) -> &Rc<Taxonomy> {
		&self.taxonomy
	}

	/// Copy of the current state for rendering.
	pub fn snapshot(&self) -> NavigatorState {
		self.state.borrow().clone()
	}

	/// Read the current state without cloning it.
	pub fn with_state<R>(&self, f: impl FnOnce(&NavigatorState) -> R) -> R {
		f(&self.state.borrow())
	}

	pub fn phase(&self) -> NavigatorPhase {
		self.state.borrow().phase()
	}

	pub fn selection(&self) -> Option<Selection> {
		self.state.borrow().selection.clone()
	}

	pub fn is_loading(&self) -> bool {
		self.state.borrow().loading
	}

	fn issue(&self) -> u64 {
		let ticket = self.issued.get() + 1;
		self.issued.set(ticket);
		ticket
	}

	/// Take over the session for `ticket` unless a later transition already has.
	fn claim(&self, ticket: u64) -> bool {
		if self.claimed.get() > ticket {
			return false;
		}
		self.claimed.set(ticket);
		true
	}

	/// Issue and claim at once, invalidating every transition still in flight.
	fn begin(&self) -> u64 {
		let ticket = self.issue();
		self.claimed.set(ticket);
		ticket
	}

	fn is_current(&self, ticket: u64) -> bool {
		self.claimed.get() == ticket
	}

	/// Choose a partition and list its root children.
	///
	/// A partition without children becomes the selection itself. Returns
	/// `false` when the partition is unknown (state untouched) or when a later
	/// transition superseded this one.
	pub async fn select_partition(&self, partition_id: &str) -> bool {
		let ticket = self.issue();

		let Some(partition) = self.taxonomy.partition(partition_id).await else {
			debug!("taxonomy: unknown partition '{partition_id}'");
			return false;
		};
		if !self.claim(ticket) {
			return false;
		}

		*self.state.borrow_mut() = NavigatorState {
			breadcrumb: vec![BreadcrumbEntry::from(&partition)],
			partition: Some(partition.clone()),
			loading: true,
			..NavigatorState::default()
		};

		let children = self.taxonomy.get_children(&partition.id).await;
		if !self.is_current(ticket) {
			debug!("taxonomy: dropping stale children of '{}'", partition.id);
			return false;
		}

		let mut state = self.state.borrow_mut();
		if children.is_empty() {
			state.selection = Some(Selection::of_partition(&partition));
		} else {
			state.levels = vec![children];
		}
		state.loading = false;
		true
	}

	/// Pick `category` from `levels[level_index]`.
	///
	/// Deeper levels and breadcrumb entries are discarded, the category becomes
	/// the selection right away, and its children (if any) are loaded as the
	/// next level. Returns `false` if no partition is chosen or the load was
	/// superseded.
	pub async fn select_node(&self, category: &Category, level_index: usize) -> bool {
		let Some(partition) = self.state.borrow().partition.clone() else {
			return false;
		};
		let ticket = self.begin();

		{
			let mut state = self.state.borrow_mut();
			let depth = (level_index + 1).min(state.breadcrumb.len());
			state.breadcrumb.truncate(depth);
			state.breadcrumb.push(BreadcrumbEntry::from(category));
			state.levels.truncate(level_index + 1);
			state.selection = Some(Selection::of_category(category, &partition));
			state.loading = category.has_children();
		}

		if !category.has_children() {
			return true;
		}

		let children = self.taxonomy.get_children(&category.id).await;
		if !self.is_current(ticket) {
			debug!("taxonomy: dropping stale children of '{}'", category.id);
			return false;
		}

		let mut state = self.state.borrow_mut();
		if !children.is_empty() {
			state.levels.push(children);
		}
		state.loading = false;
		true
	}

	/// Jump back to breadcrumb entry `index`.
	///
	/// Index 0 re-selects the partition. Deeper indices cut the breadcrumb and
	/// levels back to that entry and clear the selection without fetching.
	pub async fn navigate_to(&self, index: usize) -> bool {
		if index == 0 {
			let partition_id = self.state.borrow().partition.as_ref().map(|p| p.id.clone());
			return match partition_id {
				Some(id) => self.select_partition(&id).await,
				None => false,
			};
		}

		if index >= self.state.borrow().breadcrumb.len() {
			return false;
		}
		self.begin();
		let mut state = self.state.borrow_mut();
		state.breadcrumb.truncate(index + 1);
		state.levels.truncate(index + 1);
		state.selection = None;
		state.loading = false;
		true
	}

	/// Rebuild the whole session from a known category id.
	///
	/// Partition, breadcrumb, selection and every level along the path are
	/// restored. Unknown ids leave the state unchanged and return `false`.
	pub async fn set_from_id(&self, category_id: &str) -> bool {
		let ticket = self.issue();

		let Some(detail) = self.taxonomy.get_category(category_id).await else {
			debug!("taxonomy: nothing to restore for '{category_id}'");
			return false;
		};
		let partition_id = self.taxonomy.partition_of(category_id);
		let partition = self
			.taxonomy
			.partition(partition_id)
			.await
			.unwrap_or_else(|| Partition {
				id: partition_id.to_string(),
				name: detail.breadcrumb.first().map(|e| e.name.clone()).unwrap_or_default(),
				icon: String::new(),
				count: 0,
			});

		let mut levels = Vec::with_capacity(detail.breadcrumb.len());
		for entry in &detail.breadcrumb {
			let children = self.taxonomy.get_children(&entry.id).await;
			if children.is_empty() {
				break;
			}
			levels.push(children);
		}

		if !self.claim(ticket) {
			debug!("taxonomy: dropping stale restore of '{category_id}'");
			return false;
		}

		let selection = if detail.category.id == partition.id {
			Selection::of_partition(&partition)
		} else {
			Selection::of_category(&detail.category, &partition)
		};
		*self.state.borrow_mut() = NavigatorState {
			partition: Some(partition),
			levels,
			breadcrumb: detail.breadcrumb,
			selection: Some(selection),
			loading: false,
		};
		true
	}

	/// Pick a search hit: same as restoring from its id.
	pub async fn select_search_result(&self, category: &Category) -> bool {
		self.set_from_id(&category.id).await
	}

	/// Clear everything back to [`NavigatorPhase::Empty`].
	pub fn reset(&self) {
		self.begin();
		*self.state.borrow_mut() = NavigatorState::default();
	}
}
