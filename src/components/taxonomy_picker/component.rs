//! Leptos component driving a [`PickerSession`].
//!
//! Session methods run on `spawn_local`; each one finishes by copying the
//! session's snapshots into signals, which is all the view reads. Handlers
//! only capture `Copy` handles, so the same closures serve every option.

use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use super::session::PickerSession;
use super::timer::sleep;
use crate::taxonomy::{Category, NavigatorState, Partition, SearchState, Selection, Taxonomy};

/// Drill-down category picker with a search box.
///
/// `initial` restores the picker to a known category id on mount. Every new
/// selection (from drilling down or from a search hit) is passed to
/// `on_select`.
#[component]
pub fn TaxonomyPicker(
	taxonomy: Rc<Taxonomy>,
	#[prop(optional, into)] initial: Option<String>,
	#[prop(optional)] on_select: Option<Callback<Selection>>,
	#[prop(default = "Search categories")] placeholder: &'static str,
) -> impl IntoView {
	let min_query_len = taxonomy.config().search.min_query_len;
	let session = StoredValue::new_local(Rc::new(PickerSession::new(taxonomy.clone())));
	let partitions = RwSignal::new(Vec::<Partition>::new());
	let nav_state = RwSignal::new(NavigatorState::default());
	let search_state = RwSignal::new(SearchState::default());

	let sync = move |session: &PickerSession| {
		nav_state.set(session.navigator_state());
		search_state.set(session.search_state());
	};

	spawn_local(async move {
		let listed = taxonomy.list_partitions().await;
		info!("taxonomy-picker: {} partitions available", listed.len());
		partitions.set(listed.to_vec());
	});

	if let Some(id) = initial {
		let session = session.get_value();
		spawn_local(async move {
			session.navigator().set_from_id(&id).await;
			sync(&session);
		});
	}

	Effect::new(move |previous: Option<Option<Selection>>| {
		let current = nav_state.with(|s| s.selection.clone());
		if let (Some(callback), Some(selection)) = (on_select, current.as_ref()) {
			if previous.flatten().as_ref() != Some(selection) {
				callback.run(selection.clone());
			}
		}
		current
	});

	let select_partition = move |id: String| {
		let session = session.get_value();
		spawn_local(async move {
			session.navigator().select_partition(&id).await;
			sync(&session);
		});
	};

	let select_node = move |category: Category, level_index: usize| {
		let session = session.get_value();
		spawn_local(async move {
			session.navigator().select_node(&category, level_index).await;
			sync(&session);
		});
	};

	let navigate_to = move |index: usize| {
		let session = session.get_value();
		spawn_local(async move {
			session.navigator().navigate_to(index).await;
			sync(&session);
		});
	};

	let pick_result = move |category: Category| {
		let session = session.get_value();
		spawn_local(async move {
			session.pick_search_result(&category).await;
			sync(&session);
		});
	};

	let on_input = move |event: ev::Event| {
		let query = event_target_value(&event);
		let session = session.get_value();
		search_state.update(|s| s.query = query.clone());
		spawn_local(async move {
			let delay = sleep(session.search().debounce());
			session.type_query(&query, delay).await;
			sync(&session);
		});
	};

	let clear = move |_: ev::MouseEvent| {
		let session = session.get_value();
		session.reset();
		sync(&session);
	};

	let search_mode =
		move || search_state.with(|s| s.query.chars().count() >= min_query_len);

	let search_results = move || {
		let state = search_state.get();
		if state.searching && state.results.is_empty() {
			return view! { <p class="taxonomy-status">"Searching…"</p> }.into_any();
		}
		if state.results.is_empty() {
			return view! { <p class="taxonomy-status">"No matching categories"</p> }.into_any();
		}
		view! {
			<ul class="taxonomy-results">
				{state
					.results
					.into_iter()
					.map(move |category| {
						let label = category.full_name.clone();
						view! {
							<li class="taxonomy-result" on:click=move |_| pick_result(category.clone())>
								{label}
							</li>
						}
					})
					.collect_view()}
			</ul>
		}
		.into_any()
	};

	let partition_list = move || {
		view! {
			<ul class="taxonomy-partitions">
				{partitions
					.get()
					.into_iter()
					.map(move |partition| {
						let id = partition.id.clone();
						view! {
							<li class="taxonomy-partition" on:click=move |_| select_partition(id.clone())>
								<span class="taxonomy-icon">{partition.icon}</span>
								{partition.name}
							</li>
						}
					})
					.collect_view()}
			</ul>
		}
		.into_any()
	};

	let level_lists = move || {
		let state = nav_state.get();
		let chosen: Vec<Option<String>> = (0..state.levels.len())
			.map(|i| state.breadcrumb.get(i + 1).map(|e| e.id.clone()))
			.collect();
		view! {
			<div class="taxonomy-levels">
				{state
					.levels
					.into_iter()
					.zip(chosen)
					.enumerate()
					.map(move |(level_index, (options, chosen))| {
						view! {
							<ul class="taxonomy-level">
								{options
									.into_iter()
									.map(move |category| {
										let class = if chosen.as_deref() == Some(category.id.as_str()) {
											"taxonomy-option chosen"
										} else {
											"taxonomy-option"
										};
										let name = category.name.clone();
										let more = category.has_children().then_some(" ›");
										view! {
											<li class=class on:click=move |_| select_node(category.clone(), level_index)>
												{name}
												{more}
											</li>
										}
									})
									.collect_view()}
							</ul>
						}
					})
					.collect_view()}
			</div>
		}
		.into_any()
	};

	let breadcrumb = move || {
		nav_state
			.get()
			.breadcrumb
			.into_iter()
			.enumerate()
			.map(move |(index, entry)| {
				view! {
					<button class="taxonomy-crumb" on:click=move |_| navigate_to(index)>
						{entry.name}
					</button>
				}
			})
			.collect_view()
	};

	view! {
		<div class="taxonomy-picker">
			<div class="taxonomy-toolbar">
				<input
					type="search"
					class="taxonomy-search"
					placeholder=placeholder
					prop:value=move || search_state.with(|s| s.query.clone())
					on:input=on_input
				/>
				<button class="taxonomy-clear" on:click=clear>"Clear"</button>
			</div>
			<nav class="taxonomy-breadcrumb">{breadcrumb}</nav>
			{move || nav_state.with(|s| s.loading).then(|| view! { <p class="taxonomy-status">"Loading…"</p> })}
			{move || {
				if search_mode() {
					search_results()
				} else if nav_state.with(|s| s.partition.is_none()) {
					partition_list()
				} else {
					level_lists()
				}
			}}
			<p class="taxonomy-selection">
				{move || nav_state.with(|s| s.selection.as_ref().map(|sel| sel.path.clone()))}
			</p>
		</div>
	}
}
