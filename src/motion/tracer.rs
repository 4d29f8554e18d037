//! # Route Tracer
//!
//! Samples the position of an entity travelling a [`Path`] at constant speed.

use crate::config::DEFAULT_VELOCITY;
use crate::{Heading, Path, TilewalkError, TilewalkResult, Waypoint};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Lifecycle of a [`RouteTracer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceState {
    /// No route has been set
    Idle,
    /// Travelling, the destination has not been reached yet
    Playing,
    /// The travelled distance has reached the route's total length
    Finished,
}

/// Moves along a route at a fixed velocity as time is fed in.
///
/// Call [`update`](Self::update) once per tick, then read
/// [`position`](Self::position) for that tick.
///
/// # Examples
///
/// ```
/// use tilewalk::{RouteTracer, TraceState, Waypoint};
///
/// let mut tracer = RouteTracer::with_velocity(10.0);
/// tracer
///     .set_route(&[Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(100.0, 0.0, 0.0)])
///     .unwrap();
///
/// tracer.update(2.5);
/// assert_eq!(tracer.position().unwrap(), Waypoint::new(25.0, 0.0, 0.0));
/// assert_eq!(tracer.state(), TraceState::Playing);
/// ```
#[derive(Debug, Clone)]
pub struct RouteTracer {
    path: Option<Path>,
    /// Units per second
    velocity: f32,
    elapsed_seconds: f32,
}

impl Default for RouteTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTracer {
    /// Creates an idle tracer moving at the default velocity.
    pub fn new() -> Self {
        Self::with_velocity(DEFAULT_VELOCITY)
    }

    /// Creates an idle tracer moving at `velocity` units per second.
    ///
    /// Non-positive or non-finite velocities fall back to the default.
    pub fn with_velocity(velocity: f32) -> Self {
        let velocity = if velocity.is_finite() && velocity > 0.0 {
            velocity
        } else {
            warn!("Ignoring invalid velocity {}, using {}", velocity, DEFAULT_VELOCITY);
            DEFAULT_VELOCITY
        };

        Self {
            path: None,
            velocity,
            elapsed_seconds: 0.0,
        }
    }

    /// Replaces the current route and restarts from its first waypoint.
    ///
    /// # Errors
    ///
    /// Returns [`TilewalkError::InvalidRoute`] for fewer than two waypoints;
    /// the previous route is kept in that case.
    pub fn set_route(&mut self, waypoints: &[Waypoint]) -> TilewalkResult<()> {
        let path = Path::new(waypoints)?;
        debug!(
            "Route set: {} segments, {:.2} units, {:.2}s at {} units/s",
            path.segment_count(),
            path.total_length(),
            path.total_length() / self.velocity,
            self.velocity
        );

        self.path = Some(path);
        self.reset();
        Ok(())
    }

    /// Advances elapsed time. Negative or non-finite deltas are ignored.
    pub fn update(&mut self, delta_seconds: f32) {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            warn!("Ignoring invalid time delta {}", delta_seconds);
            return;
        }
        self.elapsed_seconds += delta_seconds;
    }

    /// Restarts the current route from the beginning.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0.0;
    }

    /// Current position on the route.
    ///
    /// # Errors
    ///
    /// Returns [`TilewalkError::NoActiveRoute`] before any route is set.
    pub fn position(&self) -> TilewalkResult<Waypoint> {
        let path = self.active_path()?;
        Ok(path.point_at(self.travelled_distance()))
    }

    /// Facing direction on the active segment.
    ///
    /// Once finished, this is the heading of the final segment.
    pub fn heading(&self) -> TilewalkResult<Option<Heading>> {
        let path = self.active_path()?;
        Ok(path.segment_at(self.travelled_distance()).heading())
    }

    /// True while a route is set and its end has not been reached.
    pub fn is_playing(&self) -> bool {
        self.state() == TraceState::Playing
    }

    pub fn state(&self) -> TraceState {
        match &self.path {
            None => TraceState::Idle,
            Some(path) if self.travelled_distance() >= path.total_length() => TraceState::Finished,
            Some(_) => TraceState::Playing,
        }
    }

    /// Travelled distance as a fraction of the route length, within `[0, 1]`.
    pub fn progress(&self) -> f32 {
        match &self.path {
            None => 0.0,
            Some(path) if path.total_length() <= 0.0 => 1.0,
            Some(path) => (self.travelled_distance() / path.total_length()).clamp(0.0, 1.0),
        }
    }

    /// Distance covered since the route was set, without clamping.
    pub fn travelled_distance(&self) -> f32 {
        self.velocity * self.elapsed_seconds
    }

    pub fn total_distance(&self) -> Option<f32> {
        self.path.as_ref().map(Path::total_length)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed_seconds
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    fn active_path(&self) -> TilewalkResult<&Path> {
        self.path.as_ref().ok_or(TilewalkError::NoActiveRoute)
    }
}
