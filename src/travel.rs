//! # Travel Module
//!
//! The caller side of route finding and tracing.
//!
//! A [`Traveller`] explicitly owns one [`RouteFinder`] and one [`RouteTracer`].
//! When asked to move it finds a grid route, converts every cell to a world
//! position with its [`WorldTransform`] and hands the waypoints to the tracer.
//! The game loop then calls [`Traveller::tick`] once per frame.

use crate::config::{
    DEFAULT_CELL_SIZE, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_TILE_THICKNESS,
    DEFAULT_VELOCITY,
};
use crate::{
    GridCoordinate, Heading, RouteFinder, RouteTracer, TilewalkError, TilewalkResult, Waypoint,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Configuration for a travelling entity and the floor it walks on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    /// Largest valid x cell index
    pub map_width: u32,
    /// Largest valid y cell index
    pub map_height: u32,
    /// Edge length of one floor tile in world units
    pub cell_size: f32,
    /// Thickness of a floor tile in world units
    pub tile_thickness: f32,
    /// Travel speed in world units per second
    pub velocity: f32,
}

impl TravelConfig {
    /// Creates the default configuration: the 6x6 tile prototype floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilewalk::TravelConfig;
    ///
    /// let config = TravelConfig::new();
    /// assert!(config.validate().is_ok());
    /// assert_eq!(config.cell_size, 50.0);
    /// ```
    pub fn new() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            tile_thickness: DEFAULT_TILE_THICKNESS,
            velocity: DEFAULT_VELOCITY,
        }
    }

    /// Creates a configuration with unit cells and speed, handy for tests.
    pub fn for_testing() -> Self {
        Self {
            map_width: 10,
            map_height: 10,
            cell_size: 1.0,
            tile_thickness: 0.0,
            velocity: 1.0,
        }
    }

    /// Checks that all values are usable.
    pub fn validate(&self) -> TilewalkResult<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(TilewalkError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if !(self.tile_thickness.is_finite() && self.tile_thickness >= 0.0) {
            return Err(TilewalkError::InvalidConfig(format!(
                "tile_thickness must not be negative, got {}",
                self.tile_thickness
            )));
        }
        if !(self.velocity.is_finite() && self.velocity > 0.0) {
            return Err(TilewalkError::InvalidConfig(format!(
                "velocity must be positive, got {}",
                self.velocity
            )));
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> TilewalkResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: TravelConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!("Loaded travel config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn world_transform(&self) -> WorldTransform {
        WorldTransform::new(self.cell_size, self.tile_thickness)
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps grid cells onto the isometric floor in world space.
///
/// The floor is the XZ plane; grid y becomes world z. The returned point is the
/// centre of a cell-sized cube resting on top of the floor tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    cell_size: f32,
    vertical_offset: f32,
}

impl WorldTransform {
    pub fn new(cell_size: f32, tile_thickness: f32) -> Self {
        Self {
            cell_size,
            vertical_offset: tile_thickness / 2.0 + cell_size / 2.0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    /// World position of an entity standing on `cell`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilewalk::{GridCoordinate, Waypoint, WorldTransform};
    ///
    /// let transform = WorldTransform::new(50.0, 5.0);
    /// assert_eq!(
    ///     transform.to_world(GridCoordinate::new(2, 3)),
    ///     Waypoint::new(100.0, 27.5, 150.0)
    /// );
    /// ```
    pub fn to_world(&self, cell: GridCoordinate) -> Waypoint {
        Waypoint::new(
            cell.x as f32 * self.cell_size,
            self.vertical_offset,
            cell.y as f32 * self.cell_size,
        )
    }

    /// Converts a whole grid route to waypoints.
    pub fn route_to_world(&self, route: &[GridCoordinate]) -> Vec<Waypoint> {
        route.iter().map(|cell| self.to_world(*cell)).collect()
    }

    /// The cell whose centre is nearest to a world position.
    pub fn to_grid(&self, position: Waypoint) -> GridCoordinate {
        GridCoordinate::new(
            (position.x / self.cell_size).round() as i32,
            (position.z / self.cell_size).round() as i32,
        )
    }
}

/// An entity that walks the grid, one route at a time.
///
/// # Examples
///
/// ```
/// use tilewalk::{GridCoordinate, TravelConfig, Traveller};
///
/// let mut traveller =
///     Traveller::new(TravelConfig::for_testing(), GridCoordinate::origin()).unwrap();
/// traveller.travel_to(GridCoordinate::new(3, 0)).unwrap();
///
/// while traveller.is_moving() {
///     traveller.tick(0.5).unwrap();
/// }
/// assert_eq!(traveller.cell(), GridCoordinate::new(3, 0));
/// ```
#[derive(Debug, Clone)]
pub struct Traveller {
    finder: RouteFinder,
    tracer: RouteTracer,
    transform: WorldTransform,
    /// Cell the entity rests on, or departed from while moving
    cell: GridCoordinate,
    /// Grid route currently being walked
    route: Vec<GridCoordinate>,
}

impl Traveller {
    /// Creates a resting traveller on `cell`.
    pub fn new(config: TravelConfig, cell: GridCoordinate) -> TilewalkResult<Self> {
        config.validate()?;
        let finder = RouteFinder::new(config.map_width, config.map_height);
        if !finder.contains(cell) {
            return Err(TilewalkError::InvalidState(format!(
                "starting cell {} is outside the {}x{} grid",
                cell, config.map_width, config.map_height
            )));
        }

        Ok(Self {
            finder,
            tracer: RouteTracer::with_velocity(config.velocity),
            transform: config.world_transform(),
            cell,
            route: Vec::new(),
        })
    }

    /// Starts walking towards `goal` and returns the grid route taken.
    ///
    /// # Errors
    ///
    /// Fails with [`TilewalkError::InvalidState`] while a previous route is
    /// still being walked, and with [`TilewalkError::RouteNotFound`] when the
    /// goal is unreachable. A finished route is committed before searching, so
    /// after a failed request the traveller rests on that route's goal;
    /// otherwise it is left unchanged.
    pub fn travel_to(&mut self, goal: GridCoordinate) -> TilewalkResult<&[GridCoordinate]> {
        if self.tracer.is_playing() {
            return Err(TilewalkError::InvalidState(format!(
                "still travelling from {} to {}",
                self.cell,
                self.destination()
            )));
        }
        self.settle();

        let route = self.finder.find(self.cell, goal)?;
        let mut waypoints = self.transform.route_to_world(&route);
        if waypoints.len() == 1 {
            // Already there: a zero-length route that finishes immediately
            waypoints.push(waypoints[0]);
        }
        self.tracer.set_route(&waypoints)?;

        info!("Travelling {} -> {} over {} cells", self.cell, goal, route.len());
        self.route = route;
        Ok(&self.route)
    }

    /// Advances time and returns the current world position.
    pub fn tick(&mut self, delta_seconds: f32) -> TilewalkResult<Waypoint> {
        self.tracer.update(delta_seconds);
        let position = self.position()?;
        if !self.tracer.is_playing() {
            self.settle();
        }
        Ok(position)
    }

    /// Current world position, the resting position when no route is active.
    pub fn position(&self) -> TilewalkResult<Waypoint> {
        if self.route.is_empty() {
            return Ok(self.transform.to_world(self.cell));
        }
        self.tracer.position()
    }

    /// Facing direction while walking, `None` at rest.
    pub fn heading(&self) -> TilewalkResult<Option<Heading>> {
        if !self.tracer.is_playing() {
            return Ok(None);
        }
        self.tracer.heading()
    }

    pub fn is_moving(&self) -> bool {
        self.tracer.is_playing()
    }

    /// Cell the traveller rests on, or departed from while moving.
    pub fn cell(&self) -> GridCoordinate {
        self.cell
    }

    /// Final cell of the active route, or the resting cell.
    pub fn destination(&self) -> GridCoordinate {
        self.route.last().copied().unwrap_or(self.cell)
    }

    pub fn route(&self) -> &[GridCoordinate] {
        &self.route
    }

    pub fn finder(&self) -> &RouteFinder {
        &self.finder
    }

    pub fn tracer(&self) -> &RouteTracer {
        &self.tracer
    }

    pub fn transform(&self) -> &WorldTransform {
        &self.transform
    }

    /// Commits a finished route: its goal becomes the resting cell.
    fn settle(&mut self) {
        if let Some(&goal) = self.route.last() {
            debug!("Arrived at {}", goal);
            self.cell = goal;
            self.route.clear();
        }
    }
}
