//! Dataset ingestion.
//!
//! Two JSON layouts are accepted:
//!
//! - the compact bundle (`n`, `e`, `r`, `m`, `s`) with positional node and
//!   edge tuples, shipped base64-encoded with the app;
//! - the document layout written by the GEXF converter (`meta`, `nodes`,
//!   `edges`, `stats`), where metrics and positions live in each node's
//!   attributes.
//!
//! Values are read leniently: anything that is not a usable number becomes
//! `None` and falls back in [`GraphStore::load`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::attrs::{AttrBag, AttrValue, bag_from_json};
use super::filter::{Metric, MetricRanges, Range};
use super::store::{EdgeRecord, GraphKind, GraphStore, NodeRecord};
use super::view::Totals;
use crate::error::LoadError;

/// Attribute keys read as betweenness, in order of preference. Both
/// spellings occur in source data.
const BETWEENNESS_KEYS: &[&str] = &["betweenness", "betweeness"];
const WEIGHTED_DEGREE_KEYS: &[&str] = &["weightedDegree", "weighted degree", "weighted_degree"];

/// A decoded dataset, not yet validated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
	/// Directedness.
	pub kind: GraphKind,
	/// Node records.
	pub nodes: Vec<NodeRecord>,
	/// Edge records.
	pub edges: Vec<EdgeRecord>,
	/// Range hints for control bounds, per metric.
	pub range_hints: Vec<(Metric, Range)>,
	/// Declared totals for the status line.
	pub totals: Option<Totals>,
}

/// A validated graph with everything the explorer needs to start.
#[derive(Clone, Debug)]
pub struct LoadedGraph {
	/// The store.
	pub store: GraphStore,
	/// Threshold ranges: hints where given, observed otherwise.
	pub ranges: MetricRanges,
	/// Status-line totals: declared where given, stored counts otherwise.
	pub totals: Totals,
}

impl Dataset {
	/// Decodes a base64-wrapped JSON dataset. Whitespace in the blob is
	/// ignored.
	pub fn from_base64(encoded: &str) -> Result<Self, LoadError> {
		let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
		let bytes = STANDARD.decode(cleaned)?;
		let value: Value = serde_json::from_slice(&bytes)?;
		Self::from_value(value)
	}

	/// Decodes a JSON dataset in either layout.
	pub fn from_json(text: &str) -> Result<Self, LoadError> {
		Self::from_value(serde_json::from_str(text)?)
	}

	fn from_value(value: Value) -> Result<Self, LoadError> {
		let has = |a: &str, b: &str| value.get(a).is_some() && value.get(b).is_some();
		if has("n", "e") {
			Ok(serde_json::from_value::<CompactBundle>(value)?.into())
		} else if has("nodes", "edges") {
			Ok(serde_json::from_value::<DocumentBundle>(value)?.into())
		} else {
			Err(LoadError::UnsupportedLayout)
		}
	}

	/// Builds the store and settles ranges and totals. Hints only widen the
	/// observed ranges, so thresholds can always reach every loaded value.
	pub fn build(self) -> LoadedGraph {
		let store = GraphStore::load(self.kind, self.nodes, self.edges);
		let mut ranges = MetricRanges::observed(&store);
		for (metric, hint) in self.range_hints {
			let range = ranges.get_mut(metric);
			*range = Range::new(range.min.min(hint.min), range.max.max(hint.max));
		}
		let totals = self.totals.unwrap_or_else(|| Totals::of(&store));
		LoadedGraph {
			store,
			ranges,
			totals,
		}
	}
}

fn number(value: Option<&Value>) -> Option<f64> {
	let n = match value? {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	n.filter(|n| n.is_finite())
}

fn text(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

fn count(value: &Value) -> Option<usize> {
	number(Some(value))
		.filter(|n| *n >= 0.0)
		.map(|n| n.round() as usize)
}

fn totals(nodes: &Value, edges: &Value) -> Option<Totals> {
	Some(Totals {
		nodes: count(nodes)?,
		edges: count(edges)?,
	})
}

fn take_number(attrs: &mut Map<String, Value>, keys: &[&str]) -> Option<f64> {
	let mut found = None;
	for key in keys {
		if let Some(v) = attrs.remove(*key) {
			found = found.or(number(Some(&v)));
		}
	}
	found
}

fn bag_number(bag: &AttrBag, keys: &[&str]) -> Option<f64> {
	keys.iter()
		.find_map(|k| bag.get(*k).and_then(AttrValue::as_number))
}

fn range_hint(pair: Option<[Value; 2]>) -> Option<Range> {
	let [lo, hi] = pair?;
	let (min, max) = (number(Some(&lo))?, number(Some(&hi))?);
	(min <= max).then(|| Range::new(min, max))
}

#[derive(Deserialize)]
struct CompactBundle {
	n: Vec<Vec<Value>>,
	e: Vec<Vec<Value>>,
	#[serde(default)]
	r: CompactRanges,
	#[serde(default)]
	m: CompactMeta,
	#[serde(default)]
	s: Option<CompactTotals>,
}

#[derive(Default, Deserialize)]
struct CompactRanges {
	w: Option<[Value; 2]>,
	deg: Option<[Value; 2]>,
	wd: Option<[Value; 2]>,
	bt: Option<[Value; 2]>,
}

#[derive(Default, Deserialize)]
struct CompactMeta {
	#[serde(default)]
	t: Option<String>,
}

#[derive(Deserialize)]
struct CompactTotals {
	#[serde(default)]
	n: Value,
	#[serde(default)]
	e: Value,
}

impl From<CompactBundle> for Dataset {
	// nodes: [id, label, x, y, size, color, degree, weightedDegree, betweenness, attrs]
	// edges: [source, target, weight]
	fn from(bundle: CompactBundle) -> Self {
		let nodes = bundle
			.n
			.iter()
			.filter_map(|row| {
				let id = text(row.first())?;
				let attrs = row
					.get(9)
					.and_then(Value::as_object)
					.map(bag_from_json)
					.unwrap_or_default();
				let position = number(row.get(2)).zip(number(row.get(3)));
				Some(NodeRecord {
					label: text(row.get(1)),
					position: Some(position.unwrap_or((0.0, 0.0))),
					size: number(row.get(4)),
					color: text(row.get(5)),
					degree: number(row.get(6)),
					weighted_degree: number(row.get(7)),
					betweenness: number(row.get(8))
						.or_else(|| bag_number(&attrs, BETWEENNESS_KEYS))
						.or_else(|| bag_number(&attrs, &["b0"])),
					attrs,
					id,
				})
			})
			.collect();

		let edges = bundle
			.e
			.iter()
			.filter_map(|row| {
				Some(EdgeRecord {
					source: text(row.first())?,
					target: text(row.get(1))?,
					weight: number(row.get(2)),
					..Default::default()
				})
			})
			.collect();

		let r = bundle.r;
		let range_hints = [
			(Metric::EdgeWeight, r.w),
			(Metric::Degree, r.deg),
			(Metric::WeightedDegree, r.wd),
			(Metric::Betweenness, r.bt),
		]
		.into_iter()
		.filter_map(|(metric, pair)| range_hint(pair).map(|range| (metric, range)))
		.collect();

		Dataset {
			kind: bundle.m.t.as_deref().map(GraphKind::parse).unwrap_or_default(),
			nodes,
			edges,
			range_hints,
			totals: bundle.s.and_then(|s| totals(&s.n, &s.e)),
		}
	}
}

#[derive(Deserialize)]
struct DocumentBundle {
	#[serde(default)]
	meta: DocumentMeta,
	nodes: Vec<DocumentNode>,
	edges: Vec<DocumentEdge>,
	#[serde(default)]
	stats: Option<DocumentTotals>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentMeta {
	#[serde(default)]
	default_edge_type: Option<String>,
}

#[derive(Deserialize)]
struct DocumentNode {
	#[serde(default)]
	id: Value,
	#[serde(default)]
	label: Value,
	#[serde(default)]
	attributes: Map<String, Value>,
}

#[derive(Deserialize)]
struct DocumentEdge {
	#[serde(default)]
	id: Value,
	#[serde(default)]
	source: Value,
	#[serde(default)]
	target: Value,
	#[serde(default)]
	weight: Value,
	#[serde(default)]
	attributes: Map<String, Value>,
}

#[derive(Deserialize)]
struct DocumentTotals {
	#[serde(default)]
	nodes: Value,
	#[serde(default)]
	edges: Value,
}

impl From<DocumentBundle> for Dataset {
	fn from(doc: DocumentBundle) -> Self {
		let nodes = doc
			.nodes
			.into_iter()
			.filter_map(|node| {
				let id = text(Some(&node.id))?;
				let mut attrs = node.attributes;
				let x = take_number(&mut attrs, &["x"]);
				let y = take_number(&mut attrs, &["y"]);
				Some(NodeRecord {
					label: text(Some(&node.label)),
					position: x.zip(y),
					size: take_number(&mut attrs, &["size"]),
					color: attrs.remove("color").and_then(|c| text(Some(&c))),
					degree: take_number(&mut attrs, &["degree"]),
					weighted_degree: take_number(&mut attrs, WEIGHTED_DEGREE_KEYS),
					betweenness: take_number(&mut attrs, BETWEENNESS_KEYS),
					attrs: bag_from_json(&attrs),
					id,
				})
			})
			.collect();

		let edges = doc
			.edges
			.into_iter()
			.filter_map(|edge| {
				Some(EdgeRecord {
					id: text(Some(&edge.id)),
					source: text(Some(&edge.source))?,
					target: text(Some(&edge.target))?,
					weight: number(Some(&edge.weight)),
					attrs: bag_from_json(&edge.attributes),
					..Default::default()
				})
			})
			.collect();

		Dataset {
			kind: doc
				.meta
				.default_edge_type
				.as_deref()
				.map(GraphKind::parse)
				.unwrap_or_default(),
			nodes,
			edges,
			range_hints: Vec::new(),
			totals: doc.stats.and_then(|s| totals(&s.nodes, &s.edges)),
		}
	}
}
