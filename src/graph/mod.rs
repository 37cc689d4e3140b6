//! Graph state and visibility filtering.
//!
//! [`GraphStore`] holds the loaded graph, [`FilterState`] the user's filter
//! choices, [`resolve`] turns the pair into a [`Visibility`], and
//! [`RenderPlan`] turns that into per-entity drawing directives.

pub mod attrs;
pub mod dataset;
pub mod filter;
pub mod resolve;
pub mod store;
pub mod view;

pub use attrs::{AttrBag, AttrValue};
pub use dataset::{Dataset, LoadedGraph};
pub use filter::{FilterState, Metric, MetricRanges, Range};
pub use resolve::{Visibility, base_visible, resolve};
pub use store::{Edge, EdgeId, GraphKind, GraphStore, Node, NodeId, NodeMetrics};
pub use view::{RenderPlan, Summary, Totals};
