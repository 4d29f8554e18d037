//! # Motion Module
//!
//! Time-based movement along piecewise-linear routes in world space.
//!
//! This module contains:
//! - The distance-indexed [`Path`] built from consecutive waypoints
//! - The [`RouteTracer`] that turns elapsed time into a position on that path
//! - The [`Heading`] an entity faces while walking a segment

pub mod path;
pub mod tracer;

pub use path::*;
pub use tracer::*;

use serde::{Deserialize, Serialize};

/// A point in world space. Interpreted only geometrically.
pub type Waypoint = glam::Vec3;

/// Facing direction while walking a segment of the isometric floor.
///
/// The floor lies in the XZ plane; headings are named after how they appear
/// on screen from the isometric camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Heading for moving from `from` to `to`.
    ///
    /// Depth (z) takes precedence over x. Returns `None` when neither changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilewalk::{Heading, Waypoint};
    ///
    /// let from = Waypoint::new(0.0, 0.0, 0.0);
    /// assert_eq!(Heading::between(from, Waypoint::new(0.0, 0.0, 50.0)), Some(Heading::Up));
    /// assert_eq!(Heading::between(from, Waypoint::new(50.0, 0.0, 0.0)), Some(Heading::Left));
    /// assert_eq!(Heading::between(from, from), None);
    /// ```
    pub fn between(from: Waypoint, to: Waypoint) -> Option<Heading> {
        if from.z < to.z {
            Some(Heading::Up)
        } else if from.z > to.z {
            Some(Heading::Down)
        } else if from.x < to.x {
            Some(Heading::Left)
        } else if from.x > to.x {
            Some(Heading::Right)
        } else {
            None
        }
    }
}
