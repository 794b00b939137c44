use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::errors::{TrafficError, TrafficResult};

/// Axis-aligned rectangle on a map, in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarBounds {
    min: DVec2,
    max: DVec2,
}

impl PlanarBounds {
    /// Build bounds from two opposite corners. Corners must be finite and
    /// `min` must not exceed `max` on either axis.
    pub fn new(min: DVec2, max: DVec2) -> TrafficResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(TrafficError::invalid_argument(
                "bounds",
                "corners must be finite",
            ));
        }
        if min.x > max.x || min.y > max.y {
            return Err(TrafficError::invalid_argument(
                "bounds",
                format!("min {min} exceeds max {max}"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> DVec2 {
        self.min
    }

    pub fn max(&self) -> DVec2 {
        self.max
    }

    /// Whether a disc of `radius` around the planar part of `position`
    /// touches these bounds. The z component carries heading and is ignored.
    pub fn touches_disc(&self, position: DVec3, radius: f64) -> bool {
        let center = position.truncate();
        let nearest = center.clamp(self.min, self.max);
        nearest.distance_squared(center) <= radius * radius
    }

    /// Whether the box `[min, max]` grown by `margin` on every side overlaps
    /// these bounds.
    pub fn touches_box(&self, min: DVec2, max: DVec2, margin: f64) -> bool {
        let min = min - DVec2::splat(margin);
        let max = max + DVec2::splat(margin);
        min.cmple(self.max).all() && self.min.cmple(max).all()
    }
}
