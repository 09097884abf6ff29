//! Network graph model and the radial layout used to draw it.

pub mod layout;
pub mod model;

pub use layout::{hit_test, radial_layout, short_label, LayoutParams, PlacedNode};
pub use model::{GraphEdge, GraphNode, NetworkGraph, CENTER_KIND};
