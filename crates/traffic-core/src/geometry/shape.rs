//! Convex footprints an agent occupies while moving.
//!
//! # Examples
//!
//! ```
//! use traffic_core::ConvexShape;
//!
//! let shape = ConvexShape::rectangle(3.0, 4.0).unwrap();
//! assert!((shape.characteristic_length() - 2.5).abs() < 1e-12);
//! assert!(ConvexShape::circle(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{TrafficError, TrafficResult};

/// A convex footprint centred on the agent's reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvexShape {
    /// Axis-aligned rectangle in the agent frame.
    Box { width: f64, height: f64 },
    Circle { radius: f64 },
}

impl ConvexShape {
    /// Rectangle footprint. Both sides must be finite and strictly positive.
    pub fn rectangle(width: f64, height: f64) -> TrafficResult<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        Ok(Self::Box { width, height })
    }

    /// Circular footprint. The radius must be finite and strictly positive.
    pub fn circle(radius: f64) -> TrafficResult<Self> {
        check_dimension("radius", radius)?;
        Ok(Self::Circle { radius })
    }

    /// Radius of the smallest circle, centred on the reference point, that
    /// encloses the footprint.
    pub fn characteristic_length(&self) -> f64 {
        match *self {
            Self::Box { width, height } => 0.5 * width.hypot(height),
            Self::Circle { radius } => radius,
        }
    }

    /// Short name of the shape kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Circle { .. } => "circle",
        }
    }
}

fn check_dimension(field: &str, value: f64) -> TrafficResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TrafficError::invalid_argument(
            field,
            format!("must be finite and greater than zero, got {value}"),
        ))
    }
}
