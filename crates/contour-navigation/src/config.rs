//! Tunables for grid construction and path search.

use crate::error::NavigationError;
use crate::mask::NeighborMask;
use contour_terrain::SampleRange;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings used when sampling a surface into a [`TerrainGrid`](crate::map::TerrainGrid).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GridConfig {
    /// Cell edge length in world units.
    pub resolution: i32,
    /// Highest surface height searched by the probe.
    pub sample_max_height: f32,
    /// Deepest surface height searched by the probe (below zero).
    pub sample_max_depth: f32,
    /// Sample cells across the rayon thread pool.
    pub parallel: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 1000,
            sample_max_height: 10000.0,
            sample_max_depth: 5000.0,
            parallel: true,
        }
    }
}

impl GridConfig {
    /// Checks the resolution and the probe window.
    pub fn validate(&self) -> Result<(), NavigationError> {
        if self.resolution <= 0 {
            return Err(NavigationError::InvalidResolution(self.resolution));
        }
        self.sample_range()?;
        Ok(())
    }

    /// Vertical window handed to the height probe.
    pub fn sample_range(&self) -> Result<SampleRange, NavigationError> {
        Ok(SampleRange::from_limits(
            self.sample_max_height,
            self.sample_max_depth,
        )?)
    }
}

/// Settings used by the A* search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SearchConfig {
    /// Offsets tried from every expanded cell.
    pub neighbor_mask: NeighborMask,
    /// Scale applied to the horizontal length term (and the heuristic).
    pub length_cost_weight: f32,
    /// Scale of the optional slope penalty. `0.0` keeps slope a pure feasibility gate.
    pub angle_cost_weight: f32,
    /// Steepest traversable edge, in degrees from horizontal.
    pub max_angle_threshold: f32,
    /// Upper bound on node expansions per query.
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            neighbor_mask: NeighborMask::default(),
            length_cost_weight: 1.0,
            angle_cost_weight: 0.0,
            max_angle_threshold: 15.0,
            max_expansions: None,
        }
    }
}

impl SearchConfig {
    /// Checks weights, threshold, mask and budget.
    pub fn validate(&self) -> Result<(), NavigationError> {
        if self.neighbor_mask.is_empty() {
            return Err(NavigationError::InvalidNeighborMask(
                "Mask must contain at least one offset",
            ));
        }
        if !self.length_cost_weight.is_finite() || self.length_cost_weight <= 0.0 {
            return Err(NavigationError::InvalidCostWeight {
                name: "length_cost_weight",
                value: self.length_cost_weight,
            });
        }
        if !self.angle_cost_weight.is_finite() || self.angle_cost_weight < 0.0 {
            return Err(NavigationError::InvalidCostWeight {
                name: "angle_cost_weight",
                value: self.angle_cost_weight,
            });
        }
        if !(0.0..=90.0).contains(&self.max_angle_threshold) {
            return Err(NavigationError::InvalidAngleThreshold(
                self.max_angle_threshold,
            ));
        }
        if self.max_expansions == Some(0) {
            return Err(NavigationError::InvalidExpansionBudget(
                "max_expansions must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Complete planner configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PlannerConfig {
    /// Grid construction settings.
    pub grid: GridConfig,
    /// Search settings.
    pub search: SearchConfig,
}

impl PlannerConfig {
    /// Validates both sections.
    pub fn validate(&self) -> Result<(), NavigationError> {
        self.grid.validate()?;
        self.search.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.resolution, 1000);
        assert_eq!(config.search.max_angle_threshold, 15.0);
        assert_eq!(config.search.neighbor_mask.len(), 8);
    }

    #[test]
    fn test_grid_config_validation() {
        let mut grid = GridConfig {
            resolution: 0,
            ..GridConfig::default()
        };
        assert_eq!(grid.validate(), Err(NavigationError::InvalidResolution(0)));

        grid.resolution = 100;
        grid.sample_max_height = -10.0;
        grid.sample_max_depth = -20.0;
        assert!(matches!(
            grid.validate(),
            Err(NavigationError::Terrain(_))
        ));
    }

    #[test]
    fn test_search_config_validation() {
        let base = SearchConfig::default();

        let bad_length = SearchConfig {
            length_cost_weight: 0.0,
            ..base.clone()
        };
        assert!(matches!(
            bad_length.validate(),
            Err(NavigationError::InvalidCostWeight {
                name: "length_cost_weight",
                ..
            })
        ));

        let bad_angle_weight = SearchConfig {
            angle_cost_weight: -1.0,
            ..base.clone()
        };
        assert!(bad_angle_weight.validate().is_err());

        let bad_threshold = SearchConfig {
            max_angle_threshold: 91.0,
            ..base.clone()
        };
        assert_eq!(
            bad_threshold.validate(),
            Err(NavigationError::InvalidAngleThreshold(91.0))
        );

        let bad_budget = SearchConfig {
            max_expansions: Some(0),
            ..base
        };
        assert!(matches!(
            bad_budget.validate(),
            Err(NavigationError::InvalidExpansionBudget(_))
        ));
    }
}
