// THEORY:
// The `Grid` is the foundation every other module stands on. Color images,
// temperature fields, relative fields and leak masks are all the same shape of
// data: a rectangle of cells addressed by (row, column). Keeping one generic
// container means the whole pipeline speaks a single coordinate language.
//
// Key architectural principles:
// 1.  **Flat, Owned Storage**: Cells live in one row-major `Vec<T>`. The grid owns
//     it outright, so `clone()` is a fully independent deep copy and no two
//     inspections can ever alias the same buffer.
// 2.  **Rectangular Invariant**: Every row has exactly `cols` cells. The only
//     constructor that can see ragged input (`from_rows`) rejects it up front.
// 3.  **Explicit Bounds**: `get` answers `None` and `set` returns an error for
//     coordinates outside the grid. Indexing with `grid[coord]` panics, the same
//     contract as slice indexing.
// 4.  **Row-Major Order**: Every traversal (`coords`, `to_coords_list`,
//     `index_of`, ...) walks row by row, left to right. Downstream grouping
//     relies on that order to make discovery deterministic.

use crate::error::{InspectionError, Result};
use std::ops::{Index, IndexMut};

/// A (row, column) address on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Moves `steps` cells along the direction `(d_row, d_col)`. Returns `None`
    /// when the walk would leave the non-negative quadrant.
    pub fn offset(&self, d_row: isize, d_col: isize, steps: usize) -> Option<Coord> {
        let steps = steps as isize;
        let row = self.row as isize + d_row * steps;
        let col = self.col as isize + d_col * steps;
        if row < 0 || col < 0 {
            return None;
        }
        Some(Coord::new(row as usize, col as usize))
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord::new(row, col)
    }
}

/// A rectangular, row-major 2-D container.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from nested rows. Fails on empty input or ragged rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if row_count == 0 || cols == 0 {
            return Err(InspectionError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(row_count * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(InspectionError::RaggedRows {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    /// Builds a grid by evaluating `f` exactly once per coordinate.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(Coord) -> T,
    {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(Coord::new(row, col)));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn exists(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    #[inline]
    fn flat_index(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    pub fn get(&self, coord: Coord) -> Option<&T> {
        if self.exists(coord) {
            Some(&self.cells[self.flat_index(coord)])
        } else {
            None
        }
    }

    pub fn set(&mut self, coord: Coord, value: T) -> Result<()> {
        if !self.exists(coord) {
            return Err(InspectionError::OutOfBounds {
                row: coord.row,
                col: coord.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let index = self.flat_index(coord);
        self.cells[index] = value;
        Ok(())
    }

    /// Replaces every cell with `f(coord)`, in place.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(Coord) -> T,
    {
        let cols = self.cols;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            *cell = f(Coord::new(i / cols, i % cols));
        }
    }

    /// Builds a new grid of the same shape from each cell and its coordinate.
    pub fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(Coord, &T) -> U,
    {
        Grid::from_fn(self.rows, self.cols, |coord| f(coord, &self[coord]))
    }

    /// All coordinates, row-major.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<T> {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| Coord::new(i / cols, i % cols))
    }

    /// All values, row-major.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Row-major coordinates whose cell satisfies `predicate`.
    pub fn to_coords_list<P>(&self, mut predicate: P) -> Vec<Coord>
    where
        P: FnMut(Coord, &T) -> bool,
    {
        self.coords()
            .filter(|&coord| predicate(coord, &self[coord]))
            .collect()
    }

    /// Row-major values whose cell satisfies `predicate`.
    pub fn to_values_list<P>(&self, mut predicate: P) -> Vec<T>
    where
        T: Clone,
        P: FnMut(Coord, &T) -> bool,
    {
        self.coords()
            .filter(|&coord| predicate(coord, &self[coord]))
            .map(|coord| self[coord].clone())
            .collect()
    }

    /// First row-major coordinate satisfying `predicate`.
    pub fn index_of<P>(&self, mut predicate: P) -> Option<Coord>
    where
        P: FnMut(Coord, &T) -> bool,
    {
        self.coords().find(|&coord| predicate(coord, &self[coord]))
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.cells.iter().any(|cell| cell == value)
    }

    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.cells.iter().filter(|&cell| cell == value).count()
    }
}

impl<T: Clone> Grid<T> {
    pub fn from_value(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }
}

impl<T> Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, coord: Coord) -> &T {
        assert!(
            self.exists(coord),
            "coordinate ({}, {}) outside {}x{} grid",
            coord.row,
            coord.col,
            self.rows,
            self.cols
        );
        &self.cells[self.flat_index(coord)]
    }
}

impl<T> IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, coord: Coord) -> &mut T {
        assert!(
            self.exists(coord),
            "coordinate ({}, {}) outside {}x{} grid",
            coord.row,
            coord.col,
            self.rows,
            self.cols
        );
        let index = self.flat_index(coord);
        &mut self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid<i32> {
        Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap()
    }

    #[test]
    fn from_rows_keeps_shape_and_order() {
        let grid = sample();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid[Coord::new(1, 0)], 4);
        assert_eq!(grid.values().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn from_rows_rejects_empty_and_ragged_input() {
        assert!(matches!(
            Grid::<i32>::from_rows(vec![]),
            Err(InspectionError::EmptyGrid)
        ));
        assert!(matches!(
            Grid::<i32>::from_rows(vec![vec![]]),
            Err(InspectionError::EmptyGrid)
        ));
        assert!(matches!(
            Grid::from_rows(vec![vec![1, 2], vec![3]]),
            Err(InspectionError::RaggedRows { row: 1, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn from_fn_visits_every_coordinate_once() {
        let mut calls = 0;
        let grid = Grid::from_fn(3, 4, |c| {
            calls += 1;
            c.row * 10 + c.col
        });
        assert_eq!(calls, 12);
        assert_eq!(grid[Coord::new(2, 3)], 23);
    }

    #[test]
    fn clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.set(Coord::new(0, 0), 99).unwrap();
        assert_eq!(original[Coord::new(0, 0)], 1);
        assert_eq!(copy[Coord::new(0, 0)], 99);
    }

    #[test]
    fn get_and_set_enforce_bounds() {
        let mut grid = sample();
        assert_eq!(grid.get(Coord::new(1, 2)), Some(&6));
        assert_eq!(grid.get(Coord::new(2, 0)), None);
        assert!(matches!(
            grid.set(Coord::new(0, 3), 1),
            Err(InspectionError::OutOfBounds { row: 0, col: 3, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "outside 2x3 grid")]
    fn index_out_of_range_panics() {
        let grid = sample();
        let _ = grid[Coord::new(5, 5)];
    }

    #[test]
    fn apply_rewrites_in_place() {
        let mut grid = Grid::from_value(2, 2, 0usize);
        grid.apply(|c| c.row + c.col);
        assert_eq!(grid.values().copied().collect::<Vec<_>>(), vec![0, 1, 1, 2]);
    }

    #[test]
    fn lists_are_row_major_and_filtered() {
        let grid = sample();
        let even = grid.to_coords_list(|_, v| v % 2 == 0);
        assert_eq!(
            even,
            vec![Coord::new(0, 1), Coord::new(1, 0), Coord::new(1, 2)]
        );
        assert_eq!(grid.to_values_list(|c, _| c.col == 0), vec![1, 4]);
        assert_eq!(grid.to_coords_list(|_, _| true).len(), grid.len());
    }

    #[test]
    fn queries() {
        let grid = Grid::from_rows(vec![vec![7, 1], vec![7, 7]]).unwrap();
        assert!(grid.contains(&1));
        assert!(!grid.contains(&2));
        assert_eq!(grid.count(&7), 3);
        assert_eq!(grid.index_of(|_, v| *v == 1), Some(Coord::new(0, 1)));
        assert_eq!(grid.index_of(|_, v| *v == 5), None);
    }

    #[test]
    fn offset_stays_in_quadrant() {
        let c = Coord::new(2, 3);
        assert_eq!(c.offset(-1, 1, 2), Some(Coord::new(0, 5)));
        assert_eq!(c.offset(-1, 0, 3), None);
    }
}
