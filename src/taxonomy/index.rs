//! Id-keyed lookup over one partition's flat category list.
//!
//! Built once per partition when the store first loads it. File order is kept
//! because search results are reported in that order.

use std::collections::{HashMap, HashSet};

use log::warn;

use super::types::{BreadcrumbEntry, Category};

/// Data problems found while indexing a partition.
///
/// Source files are generated and expected to be clean; anything recorded
/// here is repaired as far as possible and logged, never raised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
	/// Ids seen more than once. The first occurrence is kept.
	pub duplicate_ids: Vec<String>,
	/// Nodes whose `parent_id` does not resolve inside the partition.
	pub unresolved_parents: Vec<String>,
	/// Child ids listed by some node but absent from the partition.
	pub dangling_children: Vec<String>,
	/// `(parent, child)` pairs where the child points at a different parent.
	pub mismatched_children: Vec<(String, String)>,
}

impl IndexReport {
	/// True when the partition passed every check.
	pub fn is_clean(&self) -> bool {
		self.duplicate_ids.is_empty()
			&& self.unresolved_parents.is_empty()
			&& self.dangling_children.is_empty()
			&& self.mismatched_children.is_empty()
	}
}

/// O(1) id lookup plus parent/child traversal for one partition.
#[derive(Clone, Debug, Default)]
pub struct PartitionIndex {
	partition_id: String,
	categories: Vec<Category>,
	positions: HashMap<String, usize>,
	report: IndexReport,
}

impl PartitionIndex {
	/// Index `categories`, validating links and logging anything suspicious.
	pub fn build(partition_id: impl Into<String>, categories: Vec<Category>) -> Self {
		let partition_id = partition_id.into();
		let mut report = IndexReport::default();
		let mut positions = HashMap::with_capacity(categories.len());
		let mut kept = Vec::with_capacity(categories.len());

		for category in categories {
			if positions.contains_key(&category.id) {
				report.duplicate_ids.push(category.id);
				continue;
			}
			positions.insert(category.id.clone(), kept.len());
			kept.push(category);
		}

		for category in &kept {
			if let Some(parent) = &category.parent_id {
				if !positions.contains_key(parent) {
					report.unresolved_parents.push(category.id.clone());
				}
			}
			for child_id in &category.children {
				match positions.get(child_id) {
					None => report.dangling_children.push(child_id.clone()),
					Some(&pos) if kept[pos].parent_id.as_deref() != Some(category.id.as_str()) => {
						report
							.mismatched_children
							.push((category.id.clone(), child_id.clone()));
					}
					Some(_) => {}
				}
			}
		}

		if !report.is_clean() {
			warn!(
				"taxonomy: partition '{}' has data issues: {} duplicate ids, {} unresolved parents, {} dangling children, {} mismatched children",
				partition_id,
				report.duplicate_ids.len(),
				report.unresolved_parents.len(),
				report.dangling_children.len(),
				report.mismatched_children.len(),
			);
		}

		Self {
			partition_id,
			categories: kept,
			positions,
			report,
		}
	}

	/// Index with no categories, standing in for a missing partition.
	pub fn empty(partition_id: impl Into<String>) -> Self {
		Self {
			partition_id: partition_id.into(),
			..Self::default()
		}
	}

	pub fn partition_id(&self) -> &str {
		&self.partition_id
	}

	pub fn len(&self) -> usize {
		self.categories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}

	/// Categories in file order, duplicates removed.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	pub fn report(&self) -> &IndexReport {
		&self.report
	}

	pub fn get(&self, id: &str) -> Option<&Category> {
		self.positions.get(id).map(|&pos| &self.categories[pos])
	}

	/// Direct children of `id` in listed order. Unknown ids have none.
	pub fn children_of(&self, id: &str) -> Vec<&Category> {
		self.get(id)
			.map(|parent| {
				parent
					.children
					.iter()
					.filter_map(|child_id| self.get(child_id))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Root-to-node path ending at `id`, or empty when `id` is unknown.
	///
	/// The walk stops at the first unresolvable or already visited parent.
	pub fn breadcrumb(&self, id: &str) -> Vec<BreadcrumbEntry> {
		let mut trail = Vec::new();
		let mut visited = HashSet::new();
		let mut current = self.get(id);

		while let Some(category) = current {
			if !visited.insert(category.id.as_str()) {
				warn!(
					"taxonomy: parent cycle at '{}' in partition '{}'",
					category.id, self.partition_id
				);
				break;
			}
			trail.push(BreadcrumbEntry::from(category));
			current = category.parent_id.as_deref().and_then(|parent| self.get(parent));
		}

		trail.reverse();
		trail
	}
}
