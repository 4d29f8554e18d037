//! # Paths
//!
//! Piecewise-linear paths with a cumulative distance index.

use crate::{Heading, TilewalkError, TilewalkResult, Waypoint};

/// A straight piece of a path between two consecutive waypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    start: Waypoint,
    end: Waypoint,
    length: f32,
    /// Distance along the whole path at which this segment begins
    start_distance: f32,
}

impl PathSegment {
    fn new(start: Waypoint, end: Waypoint, start_distance: f32) -> Self {
        Self {
            start,
            end,
            length: start.distance(end),
            start_distance,
        }
    }

    pub fn start(&self) -> Waypoint {
        self.start
    }

    pub fn end(&self) -> Waypoint {
        self.end
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn start_distance(&self) -> f32 {
        self.start_distance
    }

    pub fn end_distance(&self) -> f32 {
        self.start_distance + self.length
    }

    /// Linear interpolation between the endpoints, `fraction` in `[0, 1]`.
    pub fn point_at(&self, fraction: f32) -> Waypoint {
        self.start.lerp(self.end, fraction)
    }

    pub fn heading(&self) -> Option<Heading> {
        Heading::between(self.start, self.end)
    }
}

/// An immutable path through two or more waypoints.
///
/// Segments are stored in travel order together with their starting distance,
/// so locating the segment under a travelled distance is a binary search.
///
/// # Examples
///
/// ```
/// use tilewalk::{Path, Waypoint};
///
/// let path = Path::new(&[
///     Waypoint::new(0.0, 0.0, 0.0),
///     Waypoint::new(30.0, 0.0, 0.0),
///     Waypoint::new(30.0, 0.0, 40.0),
/// ])
/// .unwrap();
///
/// assert_eq!(path.total_length(), 70.0);
/// assert_eq!(path.point_at(50.0), Waypoint::new(30.0, 0.0, 20.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
    total_length: f32,
}

impl Path {
    /// Builds a path from consecutive waypoint pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TilewalkError::InvalidRoute`] for fewer than two waypoints.
    pub fn new(waypoints: &[Waypoint]) -> TilewalkResult<Self> {
        if waypoints.len() < 2 {
            return Err(TilewalkError::InvalidRoute {
                waypoints: waypoints.len(),
            });
        }

        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        let mut total_length = 0.0;

        for pair in waypoints.windows(2) {
            let segment = PathSegment::new(pair[0], pair[1], total_length);
            total_length += segment.length;
            segments.push(segment);
        }

        Ok(Self {
            segments,
            total_length,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Sum of all segment lengths.
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// First waypoint of the path.
    pub fn start(&self) -> Waypoint {
        self.segments[0].start
    }

    /// Last waypoint of the path.
    pub fn end(&self) -> Waypoint {
        self.segments[self.segments.len() - 1].end
    }

    /// Index of the segment under `distance`.
    ///
    /// This is the last segment whose start distance is strictly below
    /// `distance`, or the first segment at distance zero and below. On an
    /// interior boundary the earlier segment is returned.
    pub fn segment_index_at(&self, distance: f32) -> usize {
        self.segments
            .partition_point(|segment| segment.start_distance < distance)
            .saturating_sub(1)
    }

    pub fn segment_at(&self, distance: f32) -> &PathSegment {
        &self.segments[self.segment_index_at(distance)]
    }

    /// Position after travelling `distance` from the start.
    ///
    /// Distances at or beyond the total length are pinned to the last waypoint.
    pub fn point_at(&self, distance: f32) -> Waypoint {
        if distance >= self.total_length {
            return self.end();
        }
        if distance <= 0.0 {
            return self.start();
        }

        let segment = self.segment_at(distance);
        if segment.length <= 0.0 {
            return segment.start;
        }

        let fraction = (distance - segment.start_distance) / segment.length;
        segment.point_at(fraction.clamp(0.0, 1.0))
    }
}
