use std::fmt;

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Wall,
    Crate,
    Goal,
}

impl Tile {
    /// Empty and goal cells can be walked onto or receive a pushed crate.
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Goal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub usize, pub usize);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Tile storage for a level whose rows may differ in length.
///
/// Cells are stored row-major in a `width * height` buffer, but only the
/// first `row_lens[y]` cells of row `y` belong to the level. Everything past
/// the end of a row is outside the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
    row_lens: Vec<usize>,
}

impl Grid {
    /// A rectangular grid of the given size filled with empty tiles.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_row_lens(vec![width; height])
    }

    /// A grid with one row per entry, each filled with empty tiles.
    pub fn with_row_lens(row_lens: Vec<usize>) -> Self {
        let width = row_lens.iter().copied().max().unwrap_or(0);
        let height = row_lens.len();
        Grid {
            tiles: vec![Tile::Empty; width * height],
            width,
            height,
            row_lens,
        }
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_len(&self, y: usize) -> usize {
        self.row_lens.get(y).copied().unwrap_or(0)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.1 < self.height && pos.0 < self.row_lens[pos.1]
    }

    /// Returns `None` for positions outside the grid, including cells past
    /// the end of a short row.
    pub fn get(&self, pos: Position) -> Option<Tile> {
        if self.contains(pos) {
            Some(self.tiles[pos.1 * self.width + pos.0])
        } else {
            None
        }
    }

    /// Writes a tile. The position must be in bounds.
    pub(crate) fn set(&mut self, pos: Position, tile: Tile) {
        debug_assert!(self.contains(pos), "position {} out of bounds", pos);
        self.tiles[pos.1 * self.width + pos.0] = tile;
    }

    /// Step from `pos` in the given direction.
    /// Returns `None` if the new position would leave the grid.
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = pos.0.checked_add_signed(dx)?;
        let y = pos.1.checked_add_signed(dy)?;
        let next = Position(x, y);
        self.contains(next).then_some(next)
    }

    /// Iterate over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &tile)| (Position(x, y), tile))
        })
    }

    /// Each row, cut to its own length.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles
            .chunks(self.width.max(1))
            .zip(&self.row_lens)
            .map(|(row, &len)| &row[..len])
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.iter().filter(|&(_, t)| t == tile).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.iter().all(|(_, tile)| tile == Tile::Empty));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.get(Position(2, 1)), Some(Tile::Empty));
        assert_eq!(grid.get(Position(3, 0)), None);
        assert_eq!(grid.get(Position(0, 2)), None);
    }

    #[test]
    fn test_neighbor_stops_at_border() {
        let grid = Grid::new(3, 3);
        let corner = Position(0, 0);
        assert_eq!(grid.neighbor(corner, Direction::Left), None);
        assert_eq!(grid.neighbor(corner, Direction::Up), None);
        assert_eq!(grid.neighbor(corner, Direction::Right), Some(Position(1, 0)));
        assert_eq!(grid.neighbor(corner, Direction::Down), Some(Position(0, 1)));

        let far = Position(2, 2);
        assert_eq!(grid.neighbor(far, Direction::Right), None);
        assert_eq!(grid.neighbor(far, Direction::Down), None);
    }

    #[test]
    fn test_set_and_iter_order() {
        let mut grid = Grid::new(2, 2);
        grid.set(Position(1, 0), Tile::Wall);
        grid.set(Position(0, 1), Tile::Crate);

        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(
            cells,
            vec![
                (Position(0, 0), Tile::Empty),
                (Position(1, 0), Tile::Wall),
                (Position(0, 1), Tile::Crate),
                (Position(1, 1), Tile::Empty),
            ]
        );
        assert_eq!(grid.count(Tile::Crate), 1);
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn test_short_rows_end_the_grid() {
        let mut grid = Grid::with_row_lens(vec![4, 2, 3]);
        grid.set(Position(1, 1), Tile::Wall);

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.row_len(1), 2);
        assert_eq!(grid.get(Position(1, 1)), Some(Tile::Wall));
        assert_eq!(grid.get(Position(2, 1)), None);
        assert_eq!(grid.get(Position(3, 2)), None);
        assert_eq!(grid.neighbor(Position(1, 1), Direction::Right), None);
        assert_eq!(grid.neighbor(Position(0, 1), Direction::Right), Some(Position(1, 1)));
        assert_eq!(grid.neighbor(Position(3, 0), Direction::Down), None);

        let lens: Vec<usize> = grid.rows().map(|row| row.len()).collect();
        assert_eq!(lens, vec![4, 2, 3]);
        assert_eq!(grid.iter().count(), 9);
        assert_eq!(grid.count(Tile::Empty), 8);
    }

    #[test]
    fn test_passable() {
        assert!(Tile::Empty.is_passable());
        assert!(Tile::Goal.is_passable());
        assert!(!Tile::Wall.is_passable());
        assert!(!Tile::Crate.is_passable());
    }
}
