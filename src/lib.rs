//! taxonomy-navigator: lazy-loading hierarchy navigation for Leptos frontends.
//!
//! This crate resolves large partitioned hierarchies (product taxonomies and
//! Indian location trees) on demand and exposes them through a drill-down
//! navigator, debounced search and a ready-made picker component.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;
pub mod config;
pub mod taxonomy;

pub use components::taxonomy_picker::TaxonomyPicker;
pub use config::TaxonomyConfig;
pub use taxonomy::{DomSource, Selection, Taxonomy};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("taxonomy-navigator: logging initialized");
}

/// Main application component.
/// Reads configuration and datasets from the DOM and renders the picker.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = TaxonomyConfig::load();
	let source = Rc::new(DomSource::new(config.paths.clone()));
	let taxonomy = Rc::new(Taxonomy::new(source, config));

	let selected = RwSignal::new(None::<Selection>);
	let on_select = Callback::new(move |selection: Selection| {
		info!("taxonomy-navigator: selected {} ({})", selection.path, selection.id);
		selected.set(Some(selection));
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Category Picker" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="taxonomy-app">
			<h1>"Choose a category"</h1>
			<TaxonomyPicker taxonomy=taxonomy on_select=on_select />
			<p class="subtitle">
				{move || selected.get().map(|s| format!("Selected: {} ({})", s.path, s.id))}
			</p>
		</main>
	}
}
