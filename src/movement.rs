//! Movement planning: terrain-cost reachability and replay pathfinding
//!
//! `reachable` drives range highlighting and move validation; it is the
//! terrain-aware search. `shortest_path` is A* over unit-cost edges, used
//! only to decompose a committed move into single-hex replay steps.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};

use crate::config::GridConfig;
use crate::hex::{neighbors, HexCoord};
use crate::terrain::TerrainGrid;

/// Frontier node for the reachability search, ordered by remaining points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RangeNode {
    coord: HexCoord,
    remaining: i32,
}

impl Ord for RangeNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: expand the cheapest-path-so-far frontier first
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| (self.coord.col, self.coord.row).cmp(&(other.coord.col, other.coord.row)))
    }
}

impl PartialOrd for RangeNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All coordinates reachable with the given action points
///
/// Returns coord -> maximum remaining points after arriving. Entering a hex
/// costs `terrain.entry_cost` (climb surcharge + baseline). Hexes occupied
/// by live units are neither entered nor reported. The start coordinate is
/// included with the full budget. Empty when `action_points <= 0`.
pub fn reachable(
    grid: &GridConfig,
    terrain: &TerrainGrid,
    occupied: &AHashSet<HexCoord>,
    start: HexCoord,
    action_points: i32,
) -> AHashMap<HexCoord, i32> {
    let mut best: AHashMap<HexCoord, i32> = AHashMap::new();
    if action_points <= 0 || !grid.contains(start) {
        return best;
    }

    let mut frontier = BinaryHeap::new();
    best.insert(start, action_points);
    frontier.push(RangeNode {
        coord: start,
        remaining: action_points,
    });

    while let Some(node) = frontier.pop() {
        if best.get(&node.coord).copied() != Some(node.remaining) {
            continue; // stale entry
        }
        for next in neighbors(grid, node.coord) {
            if occupied.contains(&next) {
                continue;
            }
            let left = node.remaining - terrain.entry_cost(node.coord, next);
            if left < 0 {
                continue;
            }
            let known = best.get(&next).copied().unwrap_or(i32::MIN);
            if left > known {
                best.insert(next, left);
                frontier.push(RangeNode {
                    coord: next,
                    remaining: left,
                });
            }
        }
    }

    best
}

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    coord: HexCoord,
    f_cost: u32, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.f_cost.cmp(&self.f_cost)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path over unit-cost edges, heuristic = hex distance
///
/// Returns the ordered coordinates from the first step to `end`, excluding
/// `start`. Empty when `start == end`, either endpoint is off-grid, or no
/// path exists.
pub fn shortest_path(grid: &GridConfig, start: HexCoord, end: HexCoord) -> Vec<HexCoord> {
    if start == end || !grid.contains(start) || !grid.contains(end) {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut g_scores: AHashMap<HexCoord, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.distance(&end),
    });

    while let Some(current) = open_set.pop() {
        if current.coord == end {
            return reconstruct_path(&came_from, start, current.coord);
        }

        let current_g = *g_scores.get(&current.coord).unwrap_or(&u32::MAX);

        for neighbor in neighbors(grid, current.coord) {
            let tentative_g = current_g + 1;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.distance(&end),
                });
            }
        }
    }

    Vec::new() // no path
}

/// Walk the came_from chain back to (but not including) the start
fn reconstruct_path(
    came_from: &AHashMap<HexCoord, HexCoord>,
    start: HexCoord,
    mut current: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridConfig {
        GridConfig::new(10, 10, 24.0, 0.0, 0.0)
    }

    #[test]
    fn test_reachable_zero_points_empty() {
        let g = grid();
        let t = TerrainGrid::flat(10, 10);
        let result = reachable(&g, &t, &AHashSet::new(), HexCoord::new(2, 3), 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_reachable_flat_matches_hex_distance() {
        let g = grid();
        let t = TerrainGrid::flat(10, 10);
        let start = HexCoord::new(2, 3);
        let result = reachable(&g, &t, &AHashSet::new(), start, 2);

        for col in 0..10 {
            for row in 0..10 {
                let c = HexCoord::new(col, row);
                let d = start.distance(&c);
                if d <= 2 {
                    assert_eq!(result.get(&c).copied(), Some(2 - d as i32), "{c:?}");
                } else {
                    assert!(!result.contains_key(&c), "{c:?} should be out of range");
                }
            }
        }
    }

    #[test]
    fn test_reachable_monotone_in_points_on_flat() {
        let g = grid();
        let t = TerrainGrid::flat(10, 10);
        let start = HexCoord::new(4, 4);
        let small = reachable(&g, &t, &AHashSet::new(), start, 2);
        let large = reachable(&g, &t, &AHashSet::new(), start, 3);
        for coord in small.keys() {
            assert!(large.contains_key(coord));
        }
    }

    #[test]
    fn test_reachable_climb_shortens_range() {
        let g = grid();
        let mut heights = vec![vec![0; 10]; 10];
        for row in &mut heights {
            row[3] = 2; // ridge along col 3
        }
        let t = TerrainGrid::new(heights);
        let result = reachable(&g, &t, &AHashSet::new(), HexCoord::new(2, 4), 2);
        // Entering the ridge costs 3, more than the budget allows past it.
        assert!(!result.contains_key(&HexCoord::new(3, 4)));
        assert!(result.contains_key(&HexCoord::new(1, 4)));
    }

    #[test]
    fn test_reachable_keeps_cheapest_path() {
        let g = grid();
        let mut heights = vec![vec![0; 10]; 10];
        heights[4][3] = 1; // bump on the direct approach
        let t = TerrainGrid::new(heights);
        let result = reachable(&g, &t, &AHashSet::new(), HexCoord::new(2, 4), 4);
        // A detour around the bump leaves more points than climbing it.
        let remaining = result.get(&HexCoord::new(4, 4)).copied().unwrap();
        assert_eq!(remaining, 2);
    }

    #[test]
    fn test_reachable_excludes_occupied() {
        let g = grid();
        let t = TerrainGrid::flat(10, 10);
        let mut occupied = AHashSet::new();
        occupied.insert(HexCoord::new(3, 3));
        let result = reachable(&g, &t, &occupied, HexCoord::new(2, 3), 3);
        assert!(!result.contains_key(&HexCoord::new(3, 3)));
    }

    #[test]
    fn test_shortest_path_same_coord_empty() {
        let g = grid();
        let c = HexCoord::new(5, 5);
        assert!(shortest_path(&g, c, c).is_empty());
    }

    #[test]
    fn test_shortest_path_excludes_start_ends_at_goal() {
        let g = grid();
        let start = HexCoord::new(0, 0);
        let end = HexCoord::new(4, 2);
        let path = shortest_path(&g, start, end);
        assert_ne!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
    }

    #[test]
    fn test_shortest_path_length_is_hex_distance() {
        let g = grid();
        let start = HexCoord::new(1, 1);
        for col in 0..10 {
            for row in 0..10 {
                let end = HexCoord::new(col, row);
                if end == start {
                    continue;
                }
                let path = shortest_path(&g, start, end);
                assert_eq!(path.len() as u32, start.distance(&end), "to {end:?}");
            }
        }
    }

    #[test]
    fn test_shortest_path_steps_are_adjacent() {
        let g = grid();
        let start = HexCoord::new(0, 9);
        let path = shortest_path(&g, start, HexCoord::new(9, 0));
        let mut prev = start;
        for c in path {
            assert_eq!(prev.distance(&c), 1);
            prev = c;
        }
    }

    #[test]
    fn test_shortest_path_off_grid_empty() {
        let g = grid();
        assert!(shortest_path(&g, HexCoord::new(0, 0), HexCoord::new(20, 0)).is_empty());
    }
}
