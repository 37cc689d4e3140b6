//! Slider bounds and number formatting for the threshold controls.

use crate::graph::attrs::{format_int, format_number};
use crate::graph::{Metric, Range};

const STEPS: f64 = 200.0;
const MIN_STEP: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderScale {
	pub min: f64,
	pub max: f64,
	pub step: f64,
	/// Decimal places shown; `None` for integer metrics.
	digits: Option<usize>,
}

impl SliderScale {
	pub fn for_metric(metric: Metric, range: Range) -> Self {
		let max = range.max.max(range.min);
		let digits = match metric {
			Metric::EdgeWeight => Some(4),
			Metric::Degree => None,
			Metric::WeightedDegree => Some(3),
			Metric::Betweenness => Some(6),
		};
		let step = match digits {
			None => 1.0,
			Some(_) => ((max - range.min) / STEPS).max(MIN_STEP),
		};
		SliderScale {
			min: range.min,
			max,
			step,
			digits,
		}
	}

	pub fn format(&self, value: f64) -> String {
		match self.digits {
			Some(digits) => format_number(value, digits),
			None => format_int(value),
		}
	}

	/// Reads a control value; unparsable input falls back to the minimum.
	pub fn parse(&self, raw: &str) -> f64 {
		raw.trim()
			.parse::<f64>()
			.ok()
			.filter(|v| v.is_finite())
			.unwrap_or(self.min)
	}

	pub fn hint(&self) -> String {
		format!("Range: {} – {}", self.format(self.min), self.format(self.max))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn continuous_metrics_split_range_into_steps() {
		let scale = SliderScale::for_metric(Metric::EdgeWeight, Range::new(0.2, 1.0));
		assert!((scale.step - 0.004).abs() < 1e-12);
		assert_eq!(scale.format(0.25099), "0.251");
		assert_eq!(scale.hint(), "Range: 0.2 – 1");
	}

	#[test]
	fn degenerate_ranges_keep_a_positive_step() {
		let scale = SliderScale::for_metric(Metric::Betweenness, Range::new(0.0, 0.0));
		assert_eq!(scale.step, MIN_STEP);
	}

	#[test]
	fn degree_is_integral() {
		let scale = SliderScale::for_metric(Metric::Degree, Range::new(0.0, 20.0));
		assert_eq!(scale.step, 1.0);
		assert_eq!(scale.format(3.0), "3");
	}

	#[test]
	fn parse_falls_back_to_min() {
		let scale = SliderScale::for_metric(Metric::WeightedDegree, Range::new(0.5, 8.0));
		assert_eq!(scale.parse("2.25"), 2.25);
		assert_eq!(scale.parse(""), 0.5);
		assert_eq!(scale.parse("NaN"), 0.5);
	}
}
