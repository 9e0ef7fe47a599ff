//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or filled with
//! a piece kind. Cells live in one flat row-major vector sized once at
//! construction; line clears shift rows in place, so the dimensions never
//! change.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind};

/// The game board, flat row-major storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x as i32, y as i32).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x as i32, y as i32) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map_or(false, |row| row.iter().all(|cell| cell.is_some()))
    }

    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        (0..self.height as usize).filter_map(move |y| self.row(y))
    }

    /// Whether `shape` anchored at (x, y) hits a wall, the floor or a filled
    /// cell.
    ///
    /// Cells above the board (`y < 0`) only check the side walls, so pieces
    /// can hang over the top edge without colliding.
    pub fn collides(&self, shape: &Shape, x: i16, y: i16) -> bool {
        shape.filled().any(|(r, c)| {
            let bx = x as i32 + c as i32;
            let by = y as i32 + r as i32;

            if bx < 0 || bx >= self.width as i32 || by >= self.height as i32 {
                return true;
            }
            by >= 0 && matches!(self.index(bx, by).map(|i| self.cells[i]), Some(Some(_)))
        })
    }

    /// Write the filled cells of `shape` at (x, y) into the grid.
    ///
    /// Cells that fall outside the board are dropped. Returns how many cells
    /// were written.
    pub fn lock(&mut self, shape: &Shape, x: i16, y: i16, kind: PieceKind) -> usize {
        let mut written = 0;
        for (r, c) in shape.filled() {
            if let Some(idx) = self.index(x as i32 + c as i32, y as i32 + r as i32) {
                self.cells[idx] = Some(kind);
                written += 1;
            }
        }
        written
    }

    /// Remove row `y`, shift every row above it down by one and empty the top
    /// row.
    fn remove_row(&mut self, y: usize) {
        let width = self.width as usize;

        // copy_within handles overlapping ranges safely
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        for cell in &mut self.cells[..width] {
            *cell = None;
        }
    }

    /// Clear every full row and return how many were cleared.
    ///
    /// Scans bottom to top. After a row is removed the rows above shift down,
    /// so the same index is examined again before moving up.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height as usize;

        while y > 0 {
            if self.is_row_full(y - 1) {
                self.remove_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Overwrite this board with `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Board) {
        self.width = other.width;
        self.height = other.height;
        self.cells.clear();
        self.cells.extend_from_slice(&other.cells);
    }

    /// Build a board from text rows: `.` is empty, any other character is a
    /// filled cell (the piece letter when it names a kind, `I` otherwise).
    ///
    /// Returns `None` for ragged input.
    pub fn from_pattern(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut board = Self::new(width as u16, height as u16);

        for (y, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return None;
            }
            for (x, ch) in line.chars().enumerate() {
                if ch != '.' {
                    let kind = PieceKind::from_str(&ch.to_string()).unwrap_or(PieceKind::I);
                    board.cells[y * width + x] = Some(kind);
                }
            }
        }

        Some(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::BOARD_WIDTH, crate::types::BOARD_HEIGHT)
    }
}
