//! # Tilewalk
//!
//! Route finding and route tracing for an isometric tile game.
//!
//! ## Architecture Overview
//!
//! The crate is split into two leaf components and one thin pipeline on top:
//!
//! - **Grid**: integer cell coordinates and the A* [`RouteFinder`] over a bounded,
//!   8-connected grid
//! - **Motion**: world-space [`Waypoint`]s, the distance-indexed [`Path`] and the
//!   time-driven [`RouteTracer`] that samples positions along it
//! - **Travel**: the caller side, owning one finder and one tracer and converting
//!   grid cells to world positions each time a move is requested
//!
//! Nothing here renders or owns scene objects. The game loop asks for a route,
//! ticks the tracer once per frame and reads back the position to draw.

pub mod grid;
pub mod motion;
pub mod travel;

pub use grid::*;
pub use motion::*;
pub use travel::*;

/// Core error type for route finding and tracing.
#[derive(thiserror::Error, Debug)]
pub enum TilewalkError {
    /// The goal cannot be reached from the start on the configured grid
    #[error("No route from {start} to {goal}")]
    RouteNotFound {
        start: GridCoordinate,
        goal: GridCoordinate,
    },

    /// A route needs at least two waypoints
    #[error("Invalid route: {waypoints} waypoint(s) given, at least 2 required")]
    InvalidRoute { waypoints: usize },

    /// The tracer was queried before any route was set
    #[error("No active route")]
    NoActiveRoute,

    /// The travel pipeline was used out of order
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type used throughout the Tilewalk codebase.
pub type TilewalkResult<T> = Result<T, TilewalkError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration constants.
pub mod config {
    /// Default map width in cells (cells 0..=width are valid)
    pub const DEFAULT_MAP_WIDTH: u32 = 5;

    /// Default map height in cells (cells 0..=height are valid)
    pub const DEFAULT_MAP_HEIGHT: u32 = 5;

    /// Default travel speed in world units per second
    pub const DEFAULT_VELOCITY: f32 = 30.0;

    /// Default edge length of one floor tile in world units
    pub const DEFAULT_CELL_SIZE: f32 = 50.0;

    /// Default floor tile thickness in world units
    pub const DEFAULT_TILE_THICKNESS: f32 = 5.0;

    /// Default simulation tick for the command line driver, in seconds
    pub const DEFAULT_TICK_SECONDS: f32 = 1.0 / 60.0;
}
