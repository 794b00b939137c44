//! Planar footprints used by profiles and region queries.

pub mod bounds;
pub mod shape;

pub use bounds::PlanarBounds;
pub use shape::ConvexShape;
