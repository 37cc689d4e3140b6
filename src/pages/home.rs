use std::sync::Arc;

use leptos::prelude::*;
use log::error;
use web_sys::MouseEvent;

use crate::components::controls::FilterPanel;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::tooltip::{NodeTooltip, PointerPos};
use crate::config::ExplorerConfig;
use crate::graph::{Dataset, FilterState, LoadedGraph, NodeId, RenderPlan, Summary, resolve};

const DATASET: &str = include_str!("../../assets/dataset.b64");

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = ExplorerConfig::bundled();

	match Dataset::from_base64(DATASET).map(Dataset::build) {
		Ok(loaded) => view! { <Explorer loaded config /> }.into_any(),
		Err(err) => {
			error!("dataset failed to load: {err}");
			view! {
				<div class="load-error">
					<h1>"Could not load the network"</h1>
					<p>{err.to_string()}</p>
				</div>
			}
			.into_any()
		}
	}
}

/// Filter panel, graph canvas and tooltip over one loaded graph.
#[component]
fn Explorer(loaded: LoadedGraph, config: ExplorerConfig) -> impl IntoView {
	let LoadedGraph {
		store,
		ranges,
		totals,
	} = loaded;
	let store = Arc::new(store);

	let filter = RwSignal::new(FilterState::new(&store, ranges));
	let hovered = RwSignal::new(None::<NodeId>);
	let pointer = RwSignal::new(PointerPos::default());

	let visibility = Memo::new({
		let store = store.clone();
		move |_| filter.with(|f| resolve(&store, f))
	});
	let plan = Memo::new({
		let store = store.clone();
		let style = config.style.clone();
		move |_| {
			visibility.with(|vis| {
				hovered.with(|h| RenderPlan::build(&store, vis, h.as_deref(), &style))
			})
		}
	});
	let summary = Memo::new(move |_| visibility.with(|vis| Summary::new(vis, totals)));

	let area_ref = NodeRef::<leptos::html::Main>::new();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(area) = area_ref.get() else {
			return;
		};
		let rect = area.get_bounding_client_rect();
		pointer.set(PointerPos {
			x: ev.client_x() as f64 - rect.left(),
			y: ev.client_y() as f64 - rect.top(),
			width: rect.width(),
			height: rect.height(),
		});
	};

	view! {
		<div class="explorer">
			<header class="topbar">
				<h1>"Network Explorer"</h1>
				<span class="stats">{move || summary.get().to_string()}</span>
			</header>
			<div class="explorer-body">
				<FilterPanel store=store.clone() filter />
				<main class="graph-area" node_ref=area_ref on:mousemove=on_mousemove>
					<ForceGraphCanvas store=store.clone() plan hovered config />
					<NodeTooltip store plan pointer />
				</main>
			</div>
		</div>
	}
}
