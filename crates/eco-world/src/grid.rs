//! Toroidal multi-occupancy grid.

use eco_core::{AgentId, Error, Position, Result};
use std::collections::HashMap;

/// A 2D toroidal grid where every cell holds any number of agents.
///
/// The grid only knows agent ids. `locations` mirrors `cells` so removal and
/// relocation never scan the lattice.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Vec<AgentId>>,
    locations: HashMap<AgentId, Position>,
}

impl SpatialGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            cells: vec![Vec::new(); size],
            locations: HashMap::new(),
        }
    }

    /// Put an agent into the cell at `pos` (wrapped).
    pub fn place(&mut self, id: AgentId, pos: Position) -> Result<Position> {
        if let Some(&position) = self.locations.get(&id) {
            return Err(Error::AlreadyPlaced { id, position });
        }

        let wrapped = self.wrap(pos);
        let index = self.pos_to_index(wrapped);
        self.cells[index].push(id);
        self.locations.insert(id, wrapped);
        Ok(wrapped)
    }

    /// Take an agent off the grid, returning the cell it occupied.
    ///
    /// Fails with `NotFound` when the id is unknown, or when its recorded cell
    /// does not hold it. Nothing is changed in either case.
    pub fn remove(&mut self, id: AgentId) -> Result<Position> {
        let position = *self.locations.get(&id).ok_or(Error::NotFound(id))?;
        let index = self.pos_to_index(position);
        let cell = &mut self.cells[index];
        let slot = cell
            .iter()
            .position(|&occupant| occupant == id)
            .ok_or(Error::NotFound(id))?;
        cell.remove(slot);
        self.locations.remove(&id);
        Ok(position)
    }

    /// Relocate an agent to `new_pos` (wrapped), returning where it ended up.
    pub fn move_agent(&mut self, id: AgentId, new_pos: Position) -> Result<Position> {
        let current = *self.locations.get(&id).ok_or(Error::NotFound(id))?;
        let target = self.wrap(new_pos);
        if current == target {
            return Ok(target);
        }

        self.remove(id)?;
        self.place(id, target)
    }

    /// Agents in the cell at `pos`, in insertion order.
    pub fn contents_of(&self, pos: Position) -> &[AgentId] {
        let index = self.pos_to_index(self.wrap(pos));
        &self.cells[index]
    }

    pub fn locate(&self, id: AgentId) -> Option<Position> {
        self.locations.get(&id).copied()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Number of agents on the grid
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Moore neighborhood of `pos` with wraparound.
    ///
    /// Cells are listed row by row from the top-left corner. On grids smaller
    /// than the neighborhood the same cell can be reached through several
    /// offsets; it is reported once.
    pub fn neighborhood(&self, pos: Position, radius: i32, include_center: bool) -> Vec<Position> {
        let center = self.wrap(pos);
        let mut cells = Vec::new();

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 && !include_center {
                    continue;
                }

                let cell = center.add(dx, dy).wrap(self.width, self.height);
                if !include_center && cell == center {
                    continue;
                }
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }

        cells
    }

    pub fn wrap(&self, pos: Position) -> Position {
        pos.wrap(self.width, self.height)
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    /// Iterator over all occupied cells with their contents
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Position, &[AgentId])> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(i, cell)| (self.index_to_pos(i), cell.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = SpatialGrid::new(10, 10);
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 10);
        assert_eq!(grid.cells.len(), 100);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_place_wraps_and_rejects_duplicates() {
        let mut grid = SpatialGrid::new(10, 10);
        let placed = grid.place(AgentId(1), Position::new(-1, 10)).unwrap();
        assert_eq!(placed, Position::new(9, 0));
        assert_eq!(grid.contents_of(Position::new(9, 0)), &[AgentId(1)]);

        let err = grid.place(AgentId(1), Position::new(3, 3)).unwrap_err();
        assert!(matches!(
            err,
            Error::AlreadyPlaced { id: AgentId(1), position } if position == Position::new(9, 0)
        ));
        assert!(grid.contents_of(Position::new(3, 3)).is_empty());
    }

    #[test]
    fn test_multi_occupancy() {
        let mut grid = SpatialGrid::new(4, 4);
        let cell = Position::new(2, 2);
        for i in 0..3 {
            grid.place(AgentId(i), cell).unwrap();
        }
        assert_eq!(grid.contents_of(cell), &[AgentId(0), AgentId(1), AgentId(2)]);

        grid.remove(AgentId(1)).unwrap();
        assert_eq!(grid.contents_of(cell), &[AgentId(0), AgentId(2)]);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_remove_missing_agent() {
        let mut grid = SpatialGrid::new(4, 4);
        grid.place(AgentId(5), Position::new(0, 0)).unwrap();
        assert_eq!(grid.remove(AgentId(5)).unwrap(), Position::new(0, 0));
        assert!(matches!(grid.remove(AgentId(5)), Err(Error::NotFound(AgentId(5)))));
    }

    #[test]
    fn test_remove_detects_stale_location() {
        let mut grid = SpatialGrid::new(4, 4);
        grid.place(AgentId(3), Position::new(1, 1)).unwrap();
        let index = grid.pos_to_index(Position::new(1, 1));
        grid.cells[index].clear();

        assert!(matches!(grid.remove(AgentId(3)), Err(Error::NotFound(AgentId(3)))));
        assert_eq!(grid.locate(AgentId(3)), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_index_math_on_wide_grid() {
        let grid = SpatialGrid::new(40_000, 2);
        let corner = Position::new(39_999, 1);
        let index = grid.pos_to_index(corner);
        assert_eq!(index, 79_999);
        assert_eq!(grid.index_to_pos(index), corner);
    }

    #[test]
    fn test_move_agent() {
        let mut grid = SpatialGrid::new(5, 5);
        grid.place(AgentId(1), Position::new(4, 4)).unwrap();
        grid.place(AgentId(2), Position::new(4, 4)).unwrap();

        let moved = grid.move_agent(AgentId(1), Position::new(5, 5)).unwrap();
        assert_eq!(moved, Position::new(0, 0));
        assert_eq!(grid.locate(AgentId(1)), Some(Position::new(0, 0)));
        assert_eq!(grid.contents_of(Position::new(4, 4)), &[AgentId(2)]);
        assert_eq!(grid.contents_of(Position::new(0, 0)), &[AgentId(1)]);

        // Moving onto the same cell keeps cell order intact
        grid.move_agent(AgentId(2), Position::new(4, 4)).unwrap();
        assert_eq!(grid.contents_of(Position::new(4, 4)), &[AgentId(2)]);

        assert!(matches!(
            grid.move_agent(AgentId(9), Position::new(1, 1)),
            Err(Error::NotFound(AgentId(9)))
        ));
    }

    #[test]
    fn test_neighbors() {
        let grid = SpatialGrid::new(10, 10);
        let pos = Position::new(5, 5);
        let neighbors = grid.neighborhood(pos, 1, false);

        // Should have 8 neighbors
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&pos));

        let with_center = grid.neighborhood(pos, 1, true);
        assert_eq!(with_center.len(), 9);
        assert!(with_center.contains(&pos));

        assert_eq!(grid.neighborhood(pos, 2, false).len(), 24);
    }

    #[test]
    fn test_neighbors_wrap_at_corner() {
        let grid = SpatialGrid::new(10, 10);
        let neighbors = grid.neighborhood(Position::new(0, 0), 1, false);
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.contains(&Position::new(9, 9)));
        assert!(neighbors.contains(&Position::new(1, 9)));
        assert!(neighbors.contains(&Position::new(9, 1)));
    }

    #[test]
    fn test_neighbors_on_tiny_grids() {
        let single = SpatialGrid::new(1, 1);
        assert!(single.neighborhood(Position::new(0, 0), 1, false).is_empty());
        assert_eq!(
            single.neighborhood(Position::new(0, 0), 1, true),
            vec![Position::new(0, 0)]
        );

        let two = SpatialGrid::new(2, 2);
        assert_eq!(two.neighborhood(Position::new(0, 0), 1, false).len(), 3);
    }

    #[test]
    fn test_occupied_cells() {
        let mut grid = SpatialGrid::new(3, 3);
        grid.place(AgentId(0), Position::new(1, 2)).unwrap();
        grid.place(AgentId(1), Position::new(1, 2)).unwrap();
        grid.place(AgentId(2), Position::new(0, 0)).unwrap();

        let occupied: Vec<_> = grid.occupied_cells().collect();
        assert_eq!(occupied.len(), 2);
        assert_eq!(occupied[0], (Position::new(0, 0), &[AgentId(2)][..]));
        assert_eq!(occupied[1].0, Position::new(1, 2));
    }
}
