//! Side panel: isolate toggle, threshold sliders and the node checklist.
//!
//! Controls only go through the [`FilterState`] setters; the page resolves
//! visibility from the committed state.

use std::sync::Arc;

use leptos::prelude::*;
use web_sys::MouseEvent;

use super::scale::SliderScale;
use crate::graph::{FilterState, GraphStore, Metric, NodeId, Range};

/// Checklist entry for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRow {
	pub id: NodeId,
	pub label: String,
}

/// Checklist entries ordered by label, case-insensitively, then by id.
pub fn node_rows(store: &GraphStore) -> Vec<NodeRow> {
	let mut rows: Vec<NodeRow> = store
		.nodes()
		.map(|n| NodeRow {
			id: n.id.clone(),
			label: n.label.clone(),
		})
		.collect();
	rows.sort_by_cached_key(|row| (row.label.to_lowercase(), row.id.clone()));
	rows
}

/// Whether a row stays listed for the search box contents. Blank queries
/// list everything.
pub fn matches_search(label: &str, query: &str) -> bool {
	let query = query.trim().to_lowercase();
	query.is_empty() || label.to_lowercase().contains(&query)
}

#[component]
pub fn FilterPanel(store: Arc<GraphStore>, filter: RwSignal<FilterState>) -> impl IntoView {
	let ranges = filter.with_untracked(|f| *f.ranges());
	let search = RwSignal::new(String::new());

	let sliders = Metric::ALL
		.into_iter()
		.map(|metric| view! { <ThresholdSlider metric range=ranges.get(metric) filter /> })
		.collect_view();

	let rows = node_rows(&store)
		.into_iter()
		.map(|row| view! { <NodeCheckbox row filter search /> })
		.collect_view();

	view! {
		<aside class="filter-panel">
			<section class="panel-section">
				<label class="toggle">
					<input
						type="checkbox"
						prop:checked=move || filter.with(|f| f.show_isolates())
						on:change=move |ev| {
							let show = event_target_checked(&ev);
							filter.update(|f| f.set_show_isolates(show));
						}
					/>
					"Show isolated nodes"
				</label>
			</section>

			<section class="panel-section">{sliders}</section>

			<section class="panel-section node-section">
				<input
					type="search"
					class="node-search"
					placeholder="Search nodes"
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
				<div class="bulk-buttons">
					<button on:click=move |_: MouseEvent| filter.update(FilterState::select_all)>
						"All"
					</button>
					<button on:click=move |_: MouseEvent| filter.update(FilterState::select_none)>
						"None"
					</button>
					<button on:click=move |_: MouseEvent| filter.update(FilterState::invert_selection)>
						"Invert"
					</button>
				</div>
				<ul class="node-list">{rows}</ul>
			</section>
		</aside>
	}
}

/// Range input for one metric. Dragging previews the number; releasing
/// commits the threshold.
#[component]
fn ThresholdSlider(metric: Metric, range: Range, filter: RwSignal<FilterState>) -> impl IntoView {
	let scale = SliderScale::for_metric(metric, range);
	let preview = RwSignal::new(filter.with_untracked(|f| f.threshold(metric)));

	view! {
		<div class="slider">
			<label class="slider-label">
				{metric.label()}
				" ≥ "
				<span class="slider-value">{move || scale.format(preview.get())}</span>
			</label>
			<input
				type="range"
				min=scale.min.to_string()
				max=scale.max.to_string()
				step=scale.step.to_string()
				prop:value=move || filter.with(|f| f.threshold(metric)).to_string()
				on:input=move |ev| preview.set(scale.parse(&event_target_value(&ev)))
				on:change=move |ev| {
					let value = scale.parse(&event_target_value(&ev));
					filter.update(|f| f.set_threshold(metric, value));
					preview.set(filter.with_untracked(|f| f.threshold(metric)));
				}
			/>
			<small class="slider-hint">{scale.hint()}</small>
		</div>
	}
}

#[component]
fn NodeCheckbox(row: NodeRow, filter: RwSignal<FilterState>, search: RwSignal<String>) -> impl IntoView {
	let NodeRow { id, label } = row;
	let listed = {
		let label = label.clone();
		move || search.with(|q| matches_search(&label, q))
	};
	let checked_id = id.clone();

	view! {
		<li class="node-item" style:display=move || if listed() { "flex" } else { "none" }>
			<label>
				<input
					type="checkbox"
					prop:checked=move || filter.with(|f| f.is_manually_visible(&checked_id))
					on:change=move |ev| {
						let visible = event_target_checked(&ev);
						filter.update(|f| {
							f.set_manual_visible(&id, visible);
						});
					}
				/>
				<span class="node-label">{label}</span>
			</label>
		</li>
	}
}
