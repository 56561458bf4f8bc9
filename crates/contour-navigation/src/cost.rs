//! Edge costs, the distance heuristic, and slope feasibility.

use crate::config::SearchConfig;
use crate::map::{GridCoordinate, SampledCell};
use nalgebra::Vector3;
use tracing::trace;

/// Costs attached to a candidate once its edge has been accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCost {
    /// Accumulated cost from the start, including this edge.
    pub g_cost: f32,
    /// Heuristic estimate from the candidate to the goal.
    pub h_cost: f32,
    /// `g_cost + h_cost`.
    pub f_cost: f32,
    /// Inclination of the edge in degrees.
    pub slope_degrees: f32,
}

/// Angle in degrees between a 3D displacement and its horizontal projection.
///
/// A zero-length displacement is flat (0°) and a purely vertical one is 90°.
pub fn slope_angle_degrees(from: &SampledCell, to: &SampledCell) -> f32 {
    let displacement: Vector3<f32> = to.point() - from.point();
    let horizontal = displacement.xy().norm();
    let vertical = displacement.z.abs();

    if vertical == 0.0 {
        return 0.0;
    }
    if horizontal == 0.0 {
        return 90.0;
    }
    vertical.atan2(horizontal).to_degrees()
}

/// Scores edges between cached cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    resolution: f32,
    length_cost_weight: f32,
    angle_cost_weight: f32,
    max_angle_threshold: f32,
}

impl CostModel {
    /// Creates a model for a grid of the given resolution.
    pub fn new(resolution: i32, config: &SearchConfig) -> Self {
        Self {
            resolution: resolution as f32,
            length_cost_weight: config.length_cost_weight,
            angle_cost_weight: config.angle_cost_weight,
            max_angle_threshold: config.max_angle_threshold,
        }
    }

    /// Horizontal distance to the goal in cells, scaled by the length weight.
    pub fn heuristic(&self, from: &GridCoordinate, goal: &GridCoordinate) -> f32 {
        from.distance_to(goal) / self.resolution * self.length_cost_weight
    }

    /// Whether an edge of this inclination may be traversed.
    pub fn is_traversable(&self, slope_degrees: f32) -> bool {
        slope_degrees <= self.max_angle_threshold
    }

    /// Scores the edge `from -> to`.
    ///
    /// # Arguments
    /// * `from` - The expanded cell
    /// * `from_g` - Accumulated cost at `from`
    /// * `to` - The candidate cell
    /// * `goal` - The destination cell, for the heuristic
    ///
    /// # Returns
    /// * `Option<EdgeCost>` - `None` when the edge is steeper than the threshold
    pub fn evaluate(
        &self,
        from: &SampledCell,
        from_g: f32,
        to: &SampledCell,
        goal: &GridCoordinate,
    ) -> Option<EdgeCost> {
        let slope_degrees = slope_angle_degrees(from, to);
        if !self.is_traversable(slope_degrees) {
            trace!(
                "Edge {} -> {} rejected: slope {:.2} exceeds {:.2} degrees",
                from.coordinate, to.coordinate, slope_degrees, self.max_angle_threshold
            );
            return None;
        }

        let mut step =
            from.coordinate.distance_to(&to.coordinate) / self.resolution * self.length_cost_weight;
        if self.angle_cost_weight > 0.0 && self.max_angle_threshold > 0.0 {
            step += slope_degrees / self.max_angle_threshold * self.angle_cost_weight;
        }

        let g_cost = from_g + step;
        let h_cost = self.heuristic(&to.coordinate, goal);
        Some(EdgeCost {
            g_cost,
            h_cost,
            f_cost: g_cost + h_cost,
            slope_degrees,
        })
    }
}
