//! Attribute bags carried on nodes and edges.
//!
//! Source data attaches arbitrary key/value pairs to entities. Values are kept
//! as [`AttrValue`] and listed for display through a fixed label table: known
//! keys come first in table order, unknown keys follow sorted by key.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Open attribute bag, keyed by the source attribute name.
pub type AttrBag = BTreeMap<String, AttrValue>;

/// A single attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
	/// Numeric value.
	Number(f64),
	/// Free text.
	Text(String),
	/// Boolean flag.
	Bool(bool),
}

impl AttrValue {
	/// Converts a loosely typed JSON value. `null`, arrays and objects carry no
	/// displayable scalar and are skipped.
	pub fn from_json(value: &Value) -> Option<Self> {
		match value {
			Value::Number(n) => n.as_f64().map(AttrValue::Number),
			Value::String(s) => Some(AttrValue::Text(s.clone())),
			Value::Bool(b) => Some(AttrValue::Bool(*b)),
			Value::Null | Value::Array(_) | Value::Object(_) => None,
		}
	}

	/// Numeric view of the value; numeric text is accepted.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			AttrValue::Number(n) if n.is_finite() => Some(*n),
			AttrValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
			_ => None,
		}
	}

	fn is_blank(&self) -> bool {
		matches!(self, AttrValue::Text(s) if s.is_empty())
	}
}

impl fmt::Display for AttrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttrValue::Number(n) => f.write_str(&format_number(*n, 6)),
			AttrValue::Text(s) => f.write_str(s),
			AttrValue::Bool(b) => write!(f, "{b}"),
		}
	}
}

/// Builds a bag from a JSON object, dropping values with no scalar form.
pub fn bag_from_json(map: &serde_json::Map<String, Value>) -> AttrBag {
	map.iter()
		.filter_map(|(k, v)| AttrValue::from_json(v).map(|v| (k.clone(), v)))
		.collect()
}

const KNOWN_KEYS: &[(&str, &str)] = &[
	("cl", "Cluster label"),
	("ci", "Cluster index"),
	("cui", "Cluster universal index"),
	("p", "Period"),
	("cat", "Category"),
	("lv", "Level"),
	("iso", "Community orphan"),
	("nw", "Node weight"),
	("indeg", "In-degree"),
	("outdeg", "Out-degree"),
	("b0", "Betweenness (source)"),
];

/// Human readable label for an attribute key. Unknown keys label themselves.
pub fn display_label(key: &str) -> &str {
	KNOWN_KEYS
		.iter()
		.find(|(k, _)| *k == key)
		.map(|(_, label)| *label)
		.unwrap_or(key)
}

/// `(label, value)` rows for a bag, known keys first, then the rest by key.
/// Empty text values are skipped.
pub fn display_rows(bag: &AttrBag) -> Vec<(String, String)> {
	let known = KNOWN_KEYS
		.iter()
		.filter_map(|(key, _)| bag.get_key_value(*key));
	let rest = bag
		.iter()
		.filter(|(key, _)| !KNOWN_KEYS.iter().any(|(k, _)| k == key));

	known
		.chain(rest)
		.filter(|(_, value)| !value.is_blank())
		.map(|(key, value)| (display_label(key).to_string(), value.to_string()))
		.collect()
}

/// Fixed-precision formatting with trailing zeros trimmed. Non-finite values
/// render as `-`.
pub fn format_number(value: f64, digits: usize) -> String {
	if !value.is_finite() {
		return "-".into();
	}
	let text = format!("{value:.digits$}");
	if !text.contains('.') {
		return text;
	}
	let trimmed = text.trim_end_matches('0').trim_end_matches('.');
	if trimmed == "-0" { "0".into() } else { trimmed.into() }
}

/// Rounded integer formatting. Non-finite values render as `-`.
pub fn format_int(value: f64) -> String {
	if value.is_finite() {
		format!("{}", value.round() as i64)
	} else {
		"-".into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn known_keys_precede_unknown_sorted_keys() {
		let mut bag = AttrBag::new();
		bag.insert("zeta".into(), AttrValue::Text("z".into()));
		bag.insert("alpha".into(), AttrValue::Bool(true));
		bag.insert("lv".into(), AttrValue::Text("low".into()));
		bag.insert("cl".into(), AttrValue::Text("networks".into()));

		let labels: Vec<_> = display_rows(&bag).into_iter().map(|(l, _)| l).collect();
		assert_eq!(labels, ["Cluster label", "Level", "alpha", "zeta"]);
	}

	#[test]
	fn blank_text_is_not_listed() {
		let mut bag = AttrBag::new();
		bag.insert("cat".into(), AttrValue::Text(String::new()));
		bag.insert("nw".into(), AttrValue::Number(4.0));
		assert_eq!(display_rows(&bag), vec![("Node weight".into(), "4".into())]);
	}

	#[test]
	fn json_scalars_convert_and_null_is_dropped() {
		let value = json!({ "a": 1.5, "b": "x", "c": false, "d": null, "e": [1] });
		let bag = bag_from_json(value.as_object().unwrap());
		assert_eq!(bag.len(), 3);
		assert_eq!(bag["a"], AttrValue::Number(1.5));
		assert_eq!(bag["c"], AttrValue::Bool(false));
	}

	#[test]
	fn numbers_trim_trailing_zeros() {
		assert_eq!(format_number(0.25, 4), "0.25");
		assert_eq!(format_number(3.0, 3), "3");
		assert_eq!(format_number(0.17761332, 6), "0.177613");
		assert_eq!(format_number(-0.0000001, 3), "0");
		assert_eq!(format_number(f64::NAN, 3), "-");
		assert_eq!(format_int(6.6), "7");
	}

	#[test]
	fn numeric_text_reads_as_number() {
		assert_eq!(AttrValue::Text(" 2.5 ".into()).as_number(), Some(2.5));
		assert_eq!(AttrValue::Text("n/a".into()).as_number(), None);
		assert_eq!(AttrValue::Bool(true).as_number(), None);
	}
}
