//! Radial graph layout and hit-testing.
//!
//! The layout is a pure function from graph to node positions so it can
//! be tested without a drawing surface. It only supports the single-hub
//! topology the network view produces: the center node sits in the
//! middle and peripheral node `i` of `n` sits at angle `i/n * 2π` on a
//! circle whose radius is proportional to the smaller canvas dimension.

use super::model::NetworkGraph;

/// Canvas dimensions and tuning knobs for the radial layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    /// Circle radius as a fraction of `min(width, height)`.
    pub radius_ratio: f64,
    /// Drawn radius of a peripheral node.
    pub node_radius: f64,
    /// Drawn radius of the center node.
    pub center_radius: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 360.0,
            radius_ratio: 0.33,
            node_radius: 14.0,
            center_radius: 20.0,
        }
    }
}

/// A node with its computed position and drawn radius.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub is_center: bool,
}

/// Extra margin around a node accepted by [`hit_test`].
pub const HIT_TOLERANCE: f64 = 4.0;

/// Longest label drawn before truncation.
pub const LABEL_LIMIT: usize = 12;

/// Places the center node in the middle of the canvas and the remaining
/// nodes evenly on a circle around it. Returns an empty layout for an
/// empty graph. The center node is always first in the result.
pub fn radial_layout(graph: &NetworkGraph, params: &LayoutParams) -> Vec<PlacedNode> {
    let Some(center) = graph.center() else {
        return Vec::new();
    };
    let cx = params.width / 2.0;
    let cy = params.height / 2.0;
    let radius = params.width.min(params.height) * params.radius_ratio;

    let mut placed = vec![PlacedNode {
        id: center.id.clone(),
        label: center.label.clone(),
        x: cx,
        y: cy,
        radius: params.center_radius,
        is_center: true,
    }];

    let others: Vec<_> = graph.nodes.iter().filter(|n| n.id != center.id).collect();
    let count = others.len().max(1) as f64;
    for (i, node) in others.iter().enumerate() {
        let angle = (i as f64 / count) * std::f64::consts::TAU;
        placed.push(PlacedNode {
            id: node.id.clone(),
            label: node.label.clone(),
            x: cx + radius * angle.cos(),
            y: cy + radius * angle.sin(),
            radius: params.node_radius,
            is_center: false,
        });
    }
    placed
}

/// Finds the node under the pointer, if any.
///
/// A node is hit when the Euclidean distance from the pointer to its
/// center is within its drawn radius plus [`HIT_TOLERANCE`]. The first
/// matching node in layout order wins.
pub fn hit_test(layout: &[PlacedNode], x: f64, y: f64) -> Option<&PlacedNode> {
    layout
        .iter()
        .find(|p| (x - p.x).hypot(y - p.y) <= p.radius + HIT_TOLERANCE)
}

/// Truncates a node label for drawing, appending an ellipsis when the
/// label exceeds [`LABEL_LIMIT`] characters.
pub fn short_label(label: &str) -> String {
    if label.chars().count() > LABEL_LIMIT {
        let mut short: String = label.chars().take(LABEL_LIMIT).collect();
        short.push('…');
        short
    } else {
        label.to_string()
    }
}
