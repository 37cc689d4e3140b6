//! Explorer settings: styling and layout.
//!
//! Settings ship as `assets/explorer.json`; every field is optional and falls
//! back to the values below.

use log::warn;
use serde::Deserialize;

const BUNDLED: &str = include_str!("../assets/explorer.json");

/// All explorer settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	/// Drawing and hover styling.
	pub style: StyleConfig,
	/// Force layout and camera geometry.
	pub layout: LayoutConfig,
}

impl ExplorerConfig {
	/// Parses settings from JSON.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// The bundled settings, or defaults if they do not parse.
	pub fn bundled() -> Self {
		Self::from_json(BUNDLED).unwrap_or_else(|err| {
			warn!("bundled explorer config rejected, using defaults: {err}");
			Self::default()
		})
	}
}

/// Hover emphasis and canvas colors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
	/// Canvas background.
	pub background: String,
	/// Label text color.
	pub label_color: String,
	/// Label font family.
	pub label_font: String,
	/// Node labels are drawn only at or above this on-screen size.
	pub label_min_size: f64,
	/// Size factor for visible nodes other than the hovered one.
	pub dim_scale: f64,
	/// Floor for dimmed node sizes.
	pub min_node_size: f64,
	/// Color of visible edges not touching the hovered node.
	pub muted_edge_color: String,
	/// Width of visible edges not touching the hovered node.
	pub muted_edge_size: f64,
	/// Color of edges touching the hovered node.
	pub emphasis_edge_color: String,
	/// Width of edges touching the hovered node.
	pub emphasis_edge_size: f64,
}

impl Default for StyleConfig {
	fn default() -> Self {
		StyleConfig {
			background: "#1a1a2e".into(),
			label_color: "#e9eef5".into(),
			label_font: "system-ui, -apple-system, Segoe UI, Roboto, Arial".into(),
			label_min_size: 6.0,
			dim_scale: 0.75,
			min_node_size: 1.0,
			muted_edge_color: "rgba(255,255,255,0.07)".into(),
			muted_edge_size: 0.5,
			emphasis_edge_color: "rgba(255,255,255,0.25)".into(),
			emphasis_edge_size: 1.2,
		}
	}
}

/// Force simulation parameters and world/screen geometry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Repulsion between nodes.
	pub force_charge: f32,
	/// Spring pull along edges.
	pub force_spring: f32,
	/// Force cap per step.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Velocity damping per step.
	pub damping_factor: f32,
	/// World units per dataset position unit.
	pub position_scale: f64,
	/// Radius of the circle unpositioned nodes start on.
	pub seed_radius: f64,
	/// Pointer distance, in world units, that still hits a node.
	pub hit_radius: f64,
	/// Zoom bounds.
	pub min_zoom: f64,
	/// Zoom bounds.
	pub max_zoom: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		LayoutConfig {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			position_scale: 40.0,
			seed_radius: 100.0,
			hit_radius: 12.0,
			min_zoom: 0.1,
			max_zoom: 10.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_config_keeps_defaults() {
		let config = ExplorerConfig::from_json(r#"{"style": {"dim_scale": 0.5}}"#).unwrap();
		assert_eq!(config.style.dim_scale, 0.5);
		assert_eq!(config.style.min_node_size, 1.0);
		assert_eq!(config.layout, LayoutConfig::default());
	}

	#[test]
	fn bundled_config_parses() {
		assert!(ExplorerConfig::from_json(BUNDLED).is_ok());
	}

	#[test]
	fn wrong_types_are_rejected() {
		assert!(ExplorerConfig::from_json(r#"{"layout": {"hit_radius": "far"}}"#).is_err());
	}
}
