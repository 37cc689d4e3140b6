//! Current filtering intent: manual node inclusion, four thresholds and the
//! isolate toggle.
//!
//! Mutators only record state. Resolving visibility is the caller's job,
//! usually once per committed control change rather than on every slider
//! tick.

use std::collections::HashMap;

use super::store::{GraphStore, NodeId};

/// Inclusive bounds of one filterable metric.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Range {
	/// Lowest value; thresholds never go below it.
	pub min: f64,
	/// Highest value; used for control bounds only.
	pub max: f64,
}

impl Range {
	/// A range from explicit bounds.
	pub fn new(min: f64, max: f64) -> Self {
		Range { min, max }
	}

	/// Tightest range covering `values`, ignoring non-finite ones. Empty
	/// input gives `0..0`.
	pub fn observed(values: impl IntoIterator<Item = f64>) -> Self {
		values
			.into_iter()
			.filter(|v| v.is_finite())
			.fold(None, |acc: Option<Range>, v| {
				Some(match acc {
					Some(r) => Range::new(r.min.min(v), r.max.max(v)),
					None => Range::new(v, v),
				})
			})
			.unwrap_or_default()
	}

	/// Coerces a threshold: NaN and anything below `min` become `min`.
	/// Values above `max` pass through.
	pub fn clamp_threshold(&self, value: f64) -> f64 {
		if value.is_nan() || value < self.min {
			self.min
		} else {
			value
		}
	}
}

/// The four thresholded metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
	/// Edge weight.
	EdgeWeight,
	/// Node degree.
	Degree,
	/// Node weighted degree.
	WeightedDegree,
	/// Node betweenness.
	Betweenness,
}

impl Metric {
	/// All metrics in control-panel order.
	pub const ALL: [Metric; 4] = [
		Metric::EdgeWeight,
		Metric::Degree,
		Metric::WeightedDegree,
		Metric::Betweenness,
	];

	/// Human-readable name.
	pub fn label(self) -> &'static str {
		match self {
			Metric::EdgeWeight => "Edge weight",
			Metric::Degree => "Degree",
			Metric::WeightedDegree => "Weighted degree",
			Metric::Betweenness => "Betweenness",
		}
	}
}

/// Value ranges for every metric, used for defaults, clamping and control
/// bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetricRanges {
	/// Edge weight range.
	pub edge_weight: Range,
	/// Degree range.
	pub degree: Range,
	/// Weighted degree range.
	pub weighted_degree: Range,
	/// Betweenness range.
	pub betweenness: Range,
}

impl MetricRanges {
	/// Ranges observed in the store's own data.
	pub fn observed(store: &GraphStore) -> Self {
		MetricRanges {
			edge_weight: Range::observed(store.edges().map(|e| e.weight)),
			degree: Range::observed(store.nodes().map(|n| n.metrics.degree as f64)),
			weighted_degree: Range::observed(store.nodes().map(|n| n.metrics.weighted_degree)),
			betweenness: Range::observed(store.nodes().map(|n| n.metrics.betweenness)),
		}
	}

	/// Range of one metric.
	pub fn get(&self, metric: Metric) -> Range {
		match metric {
			Metric::EdgeWeight => self.edge_weight,
			Metric::Degree => self.degree,
			Metric::WeightedDegree => self.weighted_degree,
			Metric::Betweenness => self.betweenness,
		}
	}

	/// Mutable range of one metric.
	pub fn get_mut(&mut self, metric: Metric) -> &mut Range {
		match metric {
			Metric::EdgeWeight => &mut self.edge_weight,
			Metric::Degree => &mut self.degree,
			Metric::WeightedDegree => &mut self.weighted_degree,
			Metric::Betweenness => &mut self.betweenness,
		}
	}
}

/// Filter parameters for one session.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterState {
	manual: HashMap<NodeId, bool>,
	ranges: MetricRanges,
	edge_weight: f64,
	degree: f64,
	weighted_degree: f64,
	betweenness: f64,
	show_isolates: bool,
}

impl FilterState {
	/// Everything selected, every threshold at its range minimum, isolates
	/// shown.
	pub fn new(store: &GraphStore, ranges: MetricRanges) -> Self {
		FilterState {
			manual: store.nodes().map(|n| (n.id.clone(), true)).collect(),
			ranges,
			edge_weight: ranges.edge_weight.min,
			degree: ranges.degree.min,
			weighted_degree: ranges.weighted_degree.min,
			betweenness: ranges.betweenness.min,
			show_isolates: true,
		}
	}

	/// Ranges the thresholds are clamped against.
	pub fn ranges(&self) -> &MetricRanges {
		&self.ranges
	}

	/// Sets a node's manual inclusion. Returns `false` for ids the state does
	/// not know, leaving it unchanged.
	pub fn set_manual_visible(&mut self, id: &str, visible: bool) -> bool {
		match self.manual.get_mut(id) {
			Some(flag) => {
				*flag = visible;
				true
			}
			None => false,
		}
	}

	/// Manual inclusion of a node. Unknown ids read as included.
	pub fn is_manually_visible(&self, id: &str) -> bool {
		self.manual.get(id).copied().unwrap_or(true)
	}

	/// Number of manually included nodes.
	pub fn selected_count(&self) -> usize {
		self.manual.values().filter(|v| **v).count()
	}

	/// Includes every node.
	pub fn select_all(&mut self) {
		self.manual.values_mut().for_each(|v| *v = true);
	}

	/// Excludes every node.
	pub fn select_none(&mut self) {
		self.manual.values_mut().for_each(|v| *v = false);
	}

	/// Flips every node's inclusion.
	pub fn invert_selection(&mut self) {
		self.manual.values_mut().for_each(|v| *v = !*v);
	}

	/// Sets the threshold of `metric`, clamped to its range minimum.
	pub fn set_threshold(&mut self, metric: Metric, value: f64) {
		let value = self.ranges.get(metric).clamp_threshold(value);
		*self.threshold_mut(metric) = value;
	}

	/// Current threshold of `metric`.
	pub fn threshold(&self, metric: Metric) -> f64 {
		match metric {
			Metric::EdgeWeight => self.edge_weight,
			Metric::Degree => self.degree,
			Metric::WeightedDegree => self.weighted_degree,
			Metric::Betweenness => self.betweenness,
		}
	}

	fn threshold_mut(&mut self, metric: Metric) -> &mut f64 {
		match metric {
			Metric::EdgeWeight => &mut self.edge_weight,
			Metric::Degree => &mut self.degree,
			Metric::WeightedDegree => &mut self.weighted_degree,
			Metric::Betweenness => &mut self.betweenness,
		}
	}

	/// Minimum weight for an edge to be shown.
	pub fn set_edge_weight_threshold(&mut self, value: f64) {
		self.set_threshold(Metric::EdgeWeight, value);
	}

	/// Minimum degree for a node to be shown.
	pub fn set_degree_threshold(&mut self, value: f64) {
		self.set_threshold(Metric::Degree, value);
	}

	/// Minimum weighted degree for a node to be shown.
	pub fn set_weighted_degree_threshold(&mut self, value: f64) {
		self.set_threshold(Metric::WeightedDegree, value);
	}

	/// Minimum betweenness for a node to be shown.
	pub fn set_betweenness_threshold(&mut self, value: f64) {
		self.set_threshold(Metric::Betweenness, value);
	}

	/// Whether nodes left without visible edges stay visible.
	pub fn set_show_isolates(&mut self, show: bool) {
		self.show_isolates = show;
	}

	/// See [`FilterState::set_show_isolates`].
	pub fn show_isolates(&self) -> bool {
		self.show_isolates
	}

	/// Current edge-weight threshold.
	pub fn edge_weight_threshold(&self) -> f64 {
		self.edge_weight
	}

	/// Current degree threshold.
	pub fn degree_threshold(&self) -> f64 {
		self.degree
	}

	/// Current weighted-degree threshold.
	pub fn weighted_degree_threshold(&self) -> f64 {
		self.weighted_degree
	}

	/// Current betweenness threshold.
	pub fn betweenness_threshold(&self) -> f64 {
		self.betweenness
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::store::{EdgeRecord, GraphKind, NodeRecord};

	fn store() -> GraphStore {
		let nodes = ["a", "b", "c"].map(|id| NodeRecord {
			id: id.into(),
			..Default::default()
		});
		let edges = [("a", "b", 0.5), ("b", "c", 0.9)].map(|(s, t, w)| EdgeRecord {
			source: s.into(),
			target: t.into(),
			weight: Some(w),
			..Default::default()
		});
		GraphStore::load(GraphKind::Undirected, nodes, edges)
	}

	#[test]
	fn defaults_sit_at_range_minimums() {
		let store = store();
		let ranges = MetricRanges::observed(&store);
		let filter = FilterState::new(&store, ranges);
		assert_eq!(ranges.edge_weight, Range::new(0.5, 0.9));
		assert_eq!(ranges.degree, Range::new(1.0, 2.0));
		assert_eq!(filter.edge_weight_threshold(), 0.5);
		assert_eq!(filter.degree_threshold(), 1.0);
		assert!(filter.show_isolates());
		assert_eq!(filter.selected_count(), 3);
	}

	#[test]
	fn thresholds_clamp_low_but_not_high() {
		let store = store();
		let mut filter = FilterState::new(&store, MetricRanges::observed(&store));
		filter.set_edge_weight_threshold(-5.0);
		assert_eq!(filter.edge_weight_threshold(), 0.5);
		filter.set_edge_weight_threshold(f64::NAN);
		assert_eq!(filter.edge_weight_threshold(), 0.5);
		filter.set_degree_threshold(99.0);
		assert_eq!(filter.degree_threshold(), 99.0);
		filter.set_betweenness_threshold(f64::NEG_INFINITY);
		assert_eq!(filter.betweenness_threshold(), 0.0);
	}

	#[test]
	fn bulk_selection_operations() {
		let store = store();
		let mut filter = FilterState::new(&store, MetricRanges::observed(&store));
		filter.select_none();
		assert_eq!(filter.selected_count(), 0);
		assert!(filter.set_manual_visible("b", true));
		filter.invert_selection();
		assert!(filter.is_manually_visible("a"));
		assert!(!filter.is_manually_visible("b"));
		filter.select_all();
		assert_eq!(filter.selected_count(), 3);
	}

	#[test]
	fn unknown_ids_are_ignored() {
		let store = store();
		let mut filter = FilterState::new(&store, MetricRanges::observed(&store));
		let before = filter.clone();
		assert!(!filter.set_manual_visible("zzz", false));
		assert_eq!(filter, before);
	}

	#[test]
	fn observed_range_of_nothing_is_zero() {
		assert_eq!(Range::observed(std::iter::empty()), Range::new(0.0, 0.0));
		assert_eq!(Range::observed([f64::NAN, 2.0, 1.0]), Range::new(1.0, 2.0));
	}
}
