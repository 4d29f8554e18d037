//! # Route Finder
//!
//! A* search over an 8-connected, obstacle free grid with inclusive bounds.

use crate::{GridCoordinate, TilewalkError, TilewalkResult};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Finds routes between cells of a fixed-size grid.
///
/// Cells with `0 <= x <= map_width` and `0 <= y <= map_height` are walkable.
/// Each `find` call is independent; the finder keeps no state between searches.
///
/// # Examples
///
/// ```
/// use tilewalk::{GridCoordinate, RouteFinder};
///
/// let finder = RouteFinder::new(10, 10);
/// let route = finder
///     .find(GridCoordinate::new(0, 0), GridCoordinate::new(10, 7))
///     .unwrap();
///
/// assert_eq!(route.first(), Some(&GridCoordinate::new(0, 0)));
/// assert_eq!(route.last(), Some(&GridCoordinate::new(10, 7)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteFinder {
    map_width: u32,
    map_height: u32,
}

impl RouteFinder {
    /// Creates a finder for a grid spanning `0..=map_width` by `0..=map_height`.
    pub fn new(map_width: u32, map_height: u32) -> Self {
        Self {
            map_width,
            map_height,
        }
    }

    pub fn map_width(&self) -> u32 {
        self.map_width
    }

    pub fn map_height(&self) -> u32 {
        self.map_height
    }

    /// Whether the cell lies inside the grid bounds (boundary cells included).
    pub fn contains(&self, cell: GridCoordinate) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && i64::from(cell.x) <= i64::from(self.map_width)
            && i64::from(cell.y) <= i64::from(self.map_height)
    }

    /// Computes a shortest 8-connected route from `start` to `goal`.
    ///
    /// The returned route starts with `start` and ends with `goal`. Searching
    /// from a cell to itself yields a single-element route.
    ///
    /// # Errors
    ///
    /// Returns [`TilewalkError::RouteNotFound`] when the goal cannot be reached,
    /// which on an open grid means one of the endpoints lies outside it.
    pub fn find(
        &self,
        start: GridCoordinate,
        goal: GridCoordinate,
    ) -> TilewalkResult<Vec<GridCoordinate>> {
        // The goal is only ever entered as an in-bounds neighbor
        if start != goal && !self.contains(goal) {
            debug!("Goal {} lies outside the {}x{} grid", goal, self.map_width, self.map_height);
            return Err(TilewalkError::RouteNotFound { start, goal });
        }

        let mut arena = SearchArena::default();
        let mut open_set = BinaryHeap::new();

        let start_node = arena.discover(start, goal);
        arena.nodes[start_node].g_score = 0.0;
        open_set.push(OpenEntry::for_node(start_node, &arena.nodes[start_node]));

        let mut expanded = 0usize;

        while let Some(entry) = open_set.pop() {
            let current = &arena.nodes[entry.node];

            // Superseded by a cheaper entry for the same cell
            if current.closed || entry.g_score > current.g_score {
                continue;
            }

            if current.coordinate == goal {
                let route = arena.reconstruct(entry.node);
                debug!(
                    "Route {} -> {} found: {} cells, {} expanded",
                    start,
                    goal,
                    route.len(),
                    expanded
                );
                return Ok(route);
            }

            let current_cell = current.coordinate;
            let current_g = current.g_score;
            arena.nodes[entry.node].closed = true;
            expanded += 1;

            for neighbor in current_cell.adjacent_coordinates() {
                if !self.contains(neighbor) {
                    continue;
                }

                let tentative_g_score = current_g + current_cell.euclidean_distance(neighbor);
                let neighbor_node = arena.discover(neighbor, goal);
                let node = &mut arena.nodes[neighbor_node];

                if tentative_g_score < node.g_score {
                    node.parent = Some(entry.node);
                    node.g_score = tentative_g_score;
                    node.closed = false;
                    open_set.push(OpenEntry::for_node(neighbor_node, node));
                }
            }
        }

        trace!("Open set exhausted after {} expansions", expanded);
        debug!("No route from {} to {}", start, goal);
        Err(TilewalkError::RouteNotFound { start, goal })
    }
}

/// Total step cost of a route: the sum of straight-line distances between
/// consecutive cells.
pub fn route_cost(route: &[GridCoordinate]) -> f64 {
    route
        .windows(2)
        .map(|pair| pair[0].euclidean_distance(pair[1]))
        .sum()
}

/// Straight-line distance to the goal, admissible for unit and diagonal steps.
fn heuristic(cell: GridCoordinate, goal: GridCoordinate) -> f64 {
    cell.euclidean_distance(goal)
}

/// Search state for one discovered cell.
#[derive(Debug, Clone)]
struct SearchNode {
    coordinate: GridCoordinate,
    g_score: f64,
    h_score: f64,
    parent: Option<usize>,
    closed: bool,
}

impl SearchNode {
    fn f_score(&self) -> f64 {
        self.g_score + self.h_score
    }
}

/// Nodes of a single search, addressed by index; one node per coordinate.
#[derive(Debug, Default)]
struct SearchArena {
    nodes: Vec<SearchNode>,
    index: HashMap<GridCoordinate, usize>,
}

impl SearchArena {
    /// Returns the node for `cell`, creating it on first sight.
    fn discover(&mut self, cell: GridCoordinate, goal: GridCoordinate) -> usize {
        if let Some(&existing) = self.index.get(&cell) {
            return existing;
        }

        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            coordinate: cell,
            g_score: f64::INFINITY,
            h_score: heuristic(cell, goal),
            parent: None,
            closed: false,
        });
        self.index.insert(cell, id);
        id
    }

    /// Walks predecessor links back from `node` and returns start-to-node order.
    fn reconstruct(&self, node: usize) -> Vec<GridCoordinate> {
        let mut route = Vec::new();
        let mut current = Some(node);

        while let Some(id) = current {
            let node = &self.nodes[id];
            route.push(node.coordinate);
            current = node.parent;
        }

        route.reverse();
        route
    }
}

/// Open set entry for the A* frontier.
#[derive(Debug, Clone)]
struct OpenEntry {
    node: usize,
    f_score: f64,
    g_score: f64,
}

impl OpenEntry {
    fn for_node(id: usize, node: &SearchNode) -> Self {
        Self {
            node: id,
            f_score: node.f_score(),
            g_score: node.g_score,
        }
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap; on equal f,
        // the entry further along (larger g) wins
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| self.g_score.total_cmp(&other.g_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid_route(finder: &RouteFinder, route: &[GridCoordinate]) {
        for cell in route {
            assert!(finder.contains(*cell), "{} is outside the grid", cell);
        }
        for pair in route.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {} is not a step", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_contains_includes_boundary() {
        let finder = RouteFinder::new(10, 10);
        assert!(finder.contains(GridCoordinate::new(0, 0)));
        assert!(finder.contains(GridCoordinate::new(10, 10)));
        assert!(!finder.contains(GridCoordinate::new(11, 10)));
        assert!(!finder.contains(GridCoordinate::new(-1, 0)));
    }

    #[test]
    fn test_find_same_cell() {
        let finder = RouteFinder::new(10, 10);
        let cell = GridCoordinate::new(4, 4);
        assert_eq!(finder.find(cell, cell).unwrap(), vec![cell]);
    }

    #[test]
    fn test_find_straight_line() {
        let finder = RouteFinder::new(10, 10);
        let route = finder
            .find(GridCoordinate::new(1, 1), GridCoordinate::new(8, 1))
            .unwrap();

        let expected: Vec<_> = (1..=8).map(|x| GridCoordinate::new(x, 1)).collect();
        assert_eq!(route, expected);
    }

    #[test]
    fn test_find_pure_diagonal() {
        let finder = RouteFinder::new(5, 5);
        let route = finder
            .find(GridCoordinate::new(0, 0), GridCoordinate::new(5, 5))
            .unwrap();

        let expected: Vec<_> = (0..=5).map(|i| GridCoordinate::new(i, i)).collect();
        assert_eq!(route, expected);
    }

    #[test]
    fn test_find_ten_by_ten_example() {
        let finder = RouteFinder::new(10, 10);
        let start = GridCoordinate::new(0, 0);
        let goal = GridCoordinate::new(10, 7);
        let route = finder.find(start, goal).unwrap();

        assert_eq!(route.first(), Some(&start));
        assert_eq!(route.last(), Some(&goal));
        assert_valid_route(&finder, &route);

        let steps = route.len() - 1;
        assert!(steps >= 10 && steps <= 17);
        // 7 diagonal steps and 3 straight ones
        let optimal = 7.0 * 2f64.sqrt() + 3.0;
        assert!((route_cost(&route) - optimal).abs() < 1e-9);

        // Never steps backwards on either axis
        for pair in route.windows(2) {
            assert!(pair[1].x >= pair[0].x);
            assert!(pair[1].y >= pair[0].y);
        }
    }

    #[test]
    fn test_find_reverse_direction() {
        let finder = RouteFinder::new(6, 6);
        let start = GridCoordinate::new(6, 5);
        let goal = GridCoordinate::new(0, 2);
        let route = finder.find(start, goal).unwrap();

        assert_eq!(route.first(), Some(&start));
        assert_eq!(route.last(), Some(&goal));
        assert_eq!(route.len(), 7);
        assert_valid_route(&finder, &route);
    }

    #[test]
    fn test_goal_outside_grid_fails() {
        let finder = RouteFinder::new(10, 10);
        let result = finder.find(GridCoordinate::new(0, 0), GridCoordinate::new(11, 3));
        assert!(matches!(
            result,
            Err(TilewalkError::RouteNotFound { goal, .. }) if goal == GridCoordinate::new(11, 3)
        ));
    }

    #[test]
    fn test_detached_start_fails() {
        let finder = RouteFinder::new(3, 3);
        let result = finder.find(GridCoordinate::new(-5, -5), GridCoordinate::new(1, 1));
        assert!(matches!(result, Err(TilewalkError::RouteNotFound { .. })));
    }

    #[test]
    fn test_start_at_integer_limits_fails() {
        let finder = RouteFinder::new(10, 10);

        let result = finder.find(GridCoordinate::new(i32::MIN, 0), GridCoordinate::new(5, 0));
        assert!(matches!(result, Err(TilewalkError::RouteNotFound { .. })));

        let result = finder.find(GridCoordinate::new(i32::MAX, 0), GridCoordinate::new(0, 0));
        assert!(matches!(result, Err(TilewalkError::RouteNotFound { .. })));
    }

    #[test]
    fn test_find_on_widest_grid_edge() {
        let finder = RouteFinder::new(u32::MAX, 0);
        let start = GridCoordinate::new(i32::MAX, 0);
        let goal = GridCoordinate::new(i32::MAX - 2, 0);

        assert!(finder.contains(start));
        let route = finder.find(start, goal).unwrap();
        assert_eq!(route, vec![start, GridCoordinate::new(i32::MAX - 1, 0), goal]);
    }

    #[test]
    fn test_start_just_outside_grid_steps_in() {
        let finder = RouteFinder::new(3, 3);
        let start = GridCoordinate::new(-1, 0);
        let route = finder.find(start, GridCoordinate::new(2, 0)).unwrap();

        assert_eq!(route[0], start);
        assert!(route[1..].iter().all(|cell| finder.contains(*cell)));
        assert_eq!(route.len(), 4);
    }

    #[test]
    fn test_single_cell_grid() {
        let finder = RouteFinder::new(0, 0);
        let origin = GridCoordinate::origin();
        assert_eq!(finder.find(origin, origin).unwrap(), vec![origin]);
        assert!(finder.find(origin, GridCoordinate::new(1, 0)).is_err());
    }

    #[test]
    fn test_route_cost() {
        let route = vec![
            GridCoordinate::new(0, 0),
            GridCoordinate::new(1, 1),
            GridCoordinate::new(2, 1),
        ];
        assert!((route_cost(&route) - (2f64.sqrt() + 1.0)).abs() < 1e-12);
        assert_eq!(route_cost(&route[..1]), 0.0);
    }

    #[test]
    fn test_open_entry_ordering() {
        let low = OpenEntry {
            node: 0,
            f_score: 1.0,
            g_score: 0.0,
        };
        let high = OpenEntry {
            node: 1,
            f_score: 2.0,
            g_score: 0.0,
        };
        let deeper = OpenEntry {
            node: 2,
            f_score: 1.0,
            g_score: 0.5,
        };

        let mut heap = BinaryHeap::from(vec![high, low, deeper]);
        assert_eq!(heap.pop().map(|e| e.node), Some(2));
        assert_eq!(heap.pop().map(|e| e.node), Some(0));
        assert_eq!(heap.pop().map(|e| e.node), Some(1));
    }
}
