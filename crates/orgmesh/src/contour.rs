//! Boundary tracing around missing regions of the grid.
//!
//! The walk is a Moore-neighbour trace over valid cells: it keeps a
//! "backtrack" neighbour that lies in the hole and sweeps the 8-neighbourhood
//! clockwise from it until it meets the next valid cell. With the backtrack
//! pointing into the hole the trace hugs it tightly, so a single missing
//! sample is surrounded by its four edge neighbours.
//!
//! Out-of-grid neighbours count as background and are never visited. Only
//! frontier cells (valid cells with an in-grid invalid 4-neighbour) end up in
//! the contour; stretches where the walk follows the grid border are dropped.

use std::collections::VecDeque;

use glam::UVec2;
use orgmesh_core::{OrgMeshError, OrganizedGrid, Result};

use crate::index_map::IndexMap;

/// The 8-neighbourhood, clockwise on screen (y down), starting north.
const DIRECTIONS: [(i64, i64); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Indices into [`DIRECTIONS`] of the 4-neighbourhood: N, E, S, W.
const EDGE_DIRECTIONS: [usize; 4] = [0, 2, 4, 6];

const SOUTH: usize = 4;

fn direction_of(dx: i64, dy: i64) -> Option<usize> {
    DIRECTIONS.iter().position(|&d| d == (dx, dy))
}

/// An ordered boundary walk, as grid cell indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    cells: Vec<usize>,
    closed: bool,
}

impl Contour {
    /// Returns the cells in walk order.
    #[must_use]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Returns true if the walk returned to its start cell.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the contour has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Consumes the contour and returns its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<usize> {
        self.cells
    }
}

impl AsRef<[usize]> for Contour {
    fn as_ref(&self) -> &[usize] {
        &self.cells
    }
}

/// A 4-connected region of invalid cells that does not touch the grid border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hole {
    /// Frontier cell directly above the region's first cell in scan order.
    pub seed: usize,
    /// Number of invalid cells in the region.
    pub size: usize,
    /// True if the region rings valid cells off from the rest of the grid.
    /// Its traced loop then runs around those cells as well.
    pub surrounds_valid: bool,
}

/// Read-only view of the index map with grid geometry.
struct Field<'a> {
    grid: &'a OrganizedGrid,
    map: &'a IndexMap,
}

impl Field<'_> {
    fn index(&self, x: i64, y: i64) -> usize {
        self.grid.to_index(x as usize, y as usize)
    }

    fn is_valid(&self, x: i64, y: i64) -> bool {
        self.grid.in_bounds(x, y) && self.map.is_valid(self.index(x, y))
    }

    fn is_hole(&self, x: i64, y: i64) -> bool {
        self.grid.in_bounds(x, y) && !self.map.is_valid(self.index(x, y))
    }

    /// First 4-neighbour (N, E, S, W) of `(x, y)` that lies in a hole.
    fn hole_direction(&self, x: i64, y: i64) -> Option<usize> {
        EDGE_DIRECTIONS.into_iter().find(|&d| {
            let (dx, dy) = DIRECTIONS[d];
            self.is_hole(x + dx, y + dy)
        })
    }

    fn is_frontier(&self, x: i64, y: i64) -> bool {
        self.is_valid(x, y) && self.hole_direction(x, y).is_some()
    }

    fn check_bounds(&self, cell: UVec2) -> Result<(i64, i64)> {
        let (x, y) = (i64::from(cell.x), i64::from(cell.y));
        if self.grid.in_bounds(x, y) {
            Ok((x, y))
        } else {
            Err(OrgMeshError::CellOutOfBounds {
                x: cell.x as usize,
                y: cell.y as usize,
                width: self.grid.width(),
                height: self.grid.height(),
            })
        }
    }

    fn check_frontier(&self, (x, y): (i64, i64)) -> Result<()> {
        if self.is_frontier(x, y) {
            Ok(())
        } else {
            Err(OrgMeshError::NotOnFrontier {
                x: x as usize,
                y: y as usize,
            })
        }
    }

    /// Walks from `start` with the backtrack neighbour in direction `back`
    /// until it reaches `end`, or until it is about to repeat its first move
    /// when `end == start`.
    fn walk(
        &self,
        start: (i64, i64),
        back: usize,
        end: (i64, i64),
        step_limit: usize,
    ) -> Result<Contour> {
        let mut raw = vec![start];
        let mut current = start;
        let mut back = back;
        let mut first_move = None;

        for step in 0..step_limit {
            let next = (1..8).find_map(|k| {
                let d = (back + k) % 8;
                let cell = (current.0 + DIRECTIONS[d].0, current.1 + DIRECTIONS[d].1);
                if !self.is_valid(cell.0, cell.1) {
                    return None;
                }
                // The neighbour swept just before `cell` is background.
                let prev = DIRECTIONS[(back + k - 1) % 8];
                let backtrack = (current.0 + prev.0, current.1 + prev.1);
                direction_of(backtrack.0 - cell.0, backtrack.1 - cell.1).map(|b| (cell, b))
            });
            let Some((cell, next_back)) = next else {
                return Err(OrgMeshError::ContourStalled {
                    x: current.0 as usize,
                    y: current.1 as usize,
                });
            };

            if current == start {
                match first_move {
                    None => first_move = Some(cell),
                    Some(first) if first == cell => {
                        if end != start {
                            return Err(OrgMeshError::EndNotReached {
                                x: end.0 as usize,
                                y: end.1 as usize,
                            });
                        }
                        log::trace!("contour from {start:?} closed after {step} steps");
                        return Ok(self.finish(raw, true));
                    }
                    Some(_) => {}
                }
            }

            raw.push(cell);
            if end != start && cell == end {
                log::trace!("contour from {start:?} reached {end:?} after {} steps", step + 1);
                return Ok(self.finish(raw, false));
            }

            current = cell;
            back = next_back;
        }

        Err(OrgMeshError::ContourStepLimit { limit: step_limit })
    }

    /// Keeps frontier cells, drops consecutive repeats and, for closed
    /// walks, the trailing return to the start.
    fn finish(&self, raw: Vec<(i64, i64)>, closed: bool) -> Contour {
        let mut cells: Vec<usize> = Vec::with_capacity(raw.len());
        for (x, y) in raw {
            if !self.is_frontier(x, y) {
                continue;
            }
            let index = self.index(x, y);
            if cells.last() != Some(&index) {
                cells.push(index);
            }
        }
        if closed && cells.len() > 1 && cells.first() == cells.last() {
            cells.pop();
        }
        Contour { cells, closed }
    }
}

/// Traces the boundary between valid and missing cells from `start` to `end`.
///
/// Both cells must be frontier cells. Passing the same cell twice traces the
/// closed loop around the hole bordering `start`; its first missing
/// 4-neighbour (in N, E, S, W order) picks the hole.
///
/// # Errors
///
/// Fails if either cell is outside the grid or not on a hole boundary, if the
/// walk cannot move, if it loops without reaching `end`, or if it takes more
/// than `step_limit` steps.
pub fn trace(
    grid: &OrganizedGrid,
    map: &IndexMap,
    start: UVec2,
    end: UVec2,
    step_limit: usize,
) -> Result<Contour> {
    let field = Field { grid, map };
    let start = field.check_bounds(start)?;
    let end = field.check_bounds(end)?;
    field.check_frontier(start)?;
    field.check_frontier(end)?;

    let back = field
        .hole_direction(start.0, start.1)
        .ok_or(OrgMeshError::NotOnFrontier {
            x: start.0 as usize,
            y: start.1 as usize,
        })?;
    field.walk(start, back, end, step_limit)
}

/// Traces the closed loop around `hole`, starting at its seed.
pub fn trace_hole(
    grid: &OrganizedGrid,
    map: &IndexMap,
    hole: &Hole,
    step_limit: usize,
) -> Result<Contour> {
    let field = Field { grid, map };
    let (x, y) = grid.to_cell(hole.seed);
    let seed = (x as i64, y as i64);
    field.check_frontier(seed)?;
    field.walk(seed, SOUTH, seed, step_limit)
}

/// Finds every 4-connected region of missing cells that does not touch the
/// grid border, in scan order of their first cell.
#[must_use]
pub fn find_holes(grid: &OrganizedGrid, map: &IndexMap) -> Vec<Hole> {
    let field = Field { grid, map };
    let mut visited = vec![false; map.len()];
    let mut in_region = vec![false; map.len()];
    let mut holes = Vec::new();
    let mut queue = VecDeque::new();

    for first in 0..map.len() {
        if visited[first] || map.is_valid(first) {
            continue;
        }

        visited[first] = true;
        queue.push_back(first);
        let mut region = Vec::new();
        let mut touches_border = false;

        while let Some(cell) = queue.pop_front() {
            region.push(cell);
            let (x, y) = grid.to_cell(cell);
            for d in EDGE_DIRECTIONS {
                let (nx, ny) = (x as i64 + DIRECTIONS[d].0, y as i64 + DIRECTIONS[d].1);
                if !grid.in_bounds(nx, ny) {
                    touches_border = true;
                    continue;
                }
                let neighbour = field.index(nx, ny);
                if !visited[neighbour] && !map.is_valid(neighbour) {
                    visited[neighbour] = true;
                    queue.push_back(neighbour);
                }
            }
        }

        if !touches_border {
            // The cell above the first cell in scan order is valid: it is in
            // the grid and an invalid cell there would belong to this region.
            holes.push(Hole {
                seed: first - grid.width(),
                size: region.len(),
                surrounds_valid: encloses_cells(grid, &region, &mut in_region),
            });
        }
    }

    log::debug!("found {} interior holes", holes.len());
    holes
}

/// Returns true if `region` cuts some cells off from the rest of the grid.
///
/// Floods the region's bounding box, grown by one cell, from its rim through
/// 8-connected cells outside the region. Any box cell neither in the region
/// nor reached is enclosed. `in_region` must be all false on entry and is
/// left that way.
fn encloses_cells(grid: &OrganizedGrid, region: &[usize], in_region: &mut [bool]) -> bool {
    let Some(&first) = region.first() else {
        return false;
    };
    let (fx, fy) = grid.to_cell(first);
    let (mut x0, mut y0, mut x1, mut y1) = (fx, fy, fx, fy);
    for &cell in region {
        in_region[cell] = true;
        let (x, y) = grid.to_cell(cell);
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }
    // The region does not touch the border, so the grown box stays in the grid.
    let (x0, y0, x1, y1) = (x0 - 1, y0 - 1, x1 + 1, y1 + 1);
    let box_width = x1 - x0 + 1;
    let box_len = box_width * (y1 - y0 + 1);
    let local = |x: usize, y: usize| (y - y0) * box_width + (x - x0);

    let mut reached = vec![false; box_len];
    let mut queue = VecDeque::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            if x == x0 || x == x1 || y == y0 || y == y1 {
                reached[local(x, y)] = true;
                queue.push_back((x, y));
            }
        }
    }

    let mut reached_count = queue.len();
    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in DIRECTIONS {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx < x0 as i64 || ny < y0 as i64 || nx > x1 as i64 || ny > y1 as i64 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if reached[local(nx, ny)] || in_region[grid.to_index(nx, ny)] {
                continue;
            }
            reached[local(nx, ny)] = true;
            reached_count += 1;
            queue.push_back((nx, ny));
        }
    }

    for &cell in region {
        in_region[cell] = false;
    }
    reached_count + region.len() < box_len
}
