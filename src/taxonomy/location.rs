//! Indian administrative locations as navigable partitions.
//!
//! Each state ships as one nested file (`districts -> talukas -> villages`).
//! Flattening it into [`Category`] records lets the same index, navigator and
//! search code serve both product categories and locations.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::types::{Category, Partition};

/// Separator used in location `full_name` paths.
const PATH_SEPARATOR: &str = " > ";

/// One state's hierarchy as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LocationHierarchy {
	pub name: String,
	#[serde(default)]
	pub districts: Vec<District>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct District {
	pub name: String,
	#[serde(default)]
	pub talukas: Vec<Taluka>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Taluka {
	pub name: String,
	/// Village names only, to keep state files small.
	#[serde(default)]
	pub villages: Vec<String>,
}

/// Title-case every word: first word character upper, the rest lower.
///
/// Leading punctuation of a word is left untouched, so `"(NORTH)"` becomes
/// `"(North)"`.
pub fn to_title_case(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut word_started = false;
	for ch in text.chars() {
		if ch.is_whitespace() {
			word_started = false;
			out.push(ch);
		} else if !word_started && ch.is_alphanumeric() {
			word_started = true;
			out.extend(ch.to_uppercase());
		} else if word_started {
			out.extend(ch.to_lowercase());
		} else {
			out.push(ch);
		}
	}
	out
}

/// File slug of a state name: lowercase, spaces to `-`, other symbols dropped.
///
/// `"Andaman & Nicobar Islands"` becomes `"andaman--nicobar-islands"`.
pub fn state_slug(name: &str) -> String {
	name.trim()
		.chars()
		.filter_map(|ch| match ch {
			' ' => Some('-'),
			'-' => Some('-'),
			c if c.is_alphanumeric() => Some(c.to_ascii_lowercase()),
			_ => None,
		})
		.collect()
}

/// Partitions from the `{"State Name": "state-slug"}` index, in name order.
///
/// A blank slug is derived from the state name with [`state_slug`].
pub fn partitions_from_state_index(index: BTreeMap<String, String>) -> Vec<Partition> {
	index
		.into_iter()
		.map(|(name, slug)| Partition {
			id: if slug.trim().is_empty() { state_slug(&name) } else { slug },
			name: to_title_case(&name),
			icon: String::new(),
			count: 0,
		})
		.collect()
}

/// Flatten one state into categories rooted at a node whose id is `slug`.
///
/// Child ids append 1-based positions: `goa:1` is the first district,
/// `goa:1:2` its second taluka, `goa:1:2:3` that taluka's third village.
pub fn flatten_state(slug: &str, state: &LocationHierarchy, separator: char) -> Vec<Category> {
	let child_id = |parent: &str, pos: usize| format!("{parent}{separator}{}", pos + 1);
	let child_ids = |parent: &str, count: usize| -> Vec<String> {
		(0..count).map(|i| child_id(parent, i)).collect()
	};
	let state_name = to_title_case(&state.name);

	let mut categories = vec![Category {
		id: slug.to_string(),
		name: state_name.clone(),
		full_name: state_name.clone(),
		level: 0,
		parent_id: None,
		children: child_ids(slug, state.districts.len()),
	}];

	for (d, district) in state.districts.iter().enumerate() {
		let district_id = child_id(slug, d);
		let district_path = format!("{state_name}{PATH_SEPARATOR}{}", district.name);
		categories.push(Category {
			id: district_id.clone(),
			name: district.name.clone(),
			full_name: district_path.clone(),
			level: 1,
			parent_id: Some(slug.to_string()),
			children: child_ids(&district_id, district.talukas.len()),
		});

		for (t, taluka) in district.talukas.iter().enumerate() {
			let taluka_id = child_id(&district_id, t);
			let taluka_path = format!("{district_path}{PATH_SEPARATOR}{}", taluka.name);
			categories.push(Category {
				id: taluka_id.clone(),
				name: taluka.name.clone(),
				full_name: taluka_path.clone(),
				level: 2,
				parent_id: Some(district_id.clone()),
				children: child_ids(&taluka_id, taluka.villages.len()),
			});

			for (v, village) in taluka.villages.iter().enumerate() {
				categories.push(Category {
					id: child_id(&taluka_id, v),
					name: village.clone(),
					full_name: format!("{taluka_path}{PATH_SEPARATOR}{village}"),
					level: 3,
					parent_id: Some(taluka_id.clone()),
					children: Vec::new(),
				});
			}
		}
	}

	categories
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::taxonomy::index::PartitionIndex;

	fn goa() -> LocationHierarchy {
		serde_json::from_str(
			r#"{
				"name": "Goa",
				"districts": [
					{"name": "North Goa", "talukas": [
						{"name": "Bardez", "villages": ["Aldona", "Anjuna"]},
						{"name": "Pernem", "villages": ["Arambol"]}
					]},
					{"name": "South Goa", "talukas": []}
				]
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn title_cases_words() {
		assert_eq!(to_title_case("ANDHRA pradesh"), "Andhra Pradesh");
		assert_eq!(to_title_case("jammu & kashmir"), "Jammu & Kashmir");
		assert_eq!(to_title_case("(NORTH) goa"), "(North) Goa");
	}

	#[test]
	fn slugs_match_state_file_names() {
		assert_eq!(state_slug("Andaman & Nicobar Islands"), "andaman--nicobar-islands");
		assert_eq!(state_slug("Nct Of Delhi"), "nct-of-delhi");
		assert_eq!(state_slug("Goa"), "goa");
	}

	#[test]
	fn state_index_becomes_sorted_partitions() {
		let index = BTreeMap::from([
			("Kerala".to_string(), "kerala".to_string()),
			("Goa".to_string(), "goa".to_string()),
			("ANDAMAN & NICOBAR ISLANDS".to_string(), String::new()),
		]);
		let partitions = partitions_from_state_index(index);
		let ids: Vec<_> = partitions.iter().map(|p| p.id.as_str()).collect();
		assert_eq!(ids, vec!["andaman--nicobar-islands", "goa", "kerala"]);
		assert_eq!(partitions[0].name, "Andaman & Nicobar Islands");
	}

	#[test]
	fn flattened_state_forms_consistent_tree() {
		let categories = flatten_state("goa", &goa(), ':');
		assert_eq!(categories.len(), 1 + 2 + 2 + 3);

		let index = PartitionIndex::build("goa", categories);
		assert!(index.report().is_clean());

		let districts: Vec<_> = index.children_of("goa").iter().map(|c| c.name.clone()).collect();
		assert_eq!(districts, vec!["North Goa", "South Goa"]);

		let village = index.get("goa:1:1:2").unwrap();
		assert_eq!(village.name, "Anjuna");
		assert_eq!(village.level, 3);
		assert_eq!(village.full_name, "Goa > North Goa > Bardez > Anjuna");

		let trail: Vec<_> = index
			.breadcrumb("goa:1:2:1")
			.into_iter()
			.map(|e| e.name)
			.collect();
		assert_eq!(trail, vec!["Goa", "North Goa", "Pernem", "Arambol"]);
		assert!(index.children_of("goa:2").is_empty());
	}
}
