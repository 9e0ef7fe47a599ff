//! Pieces module - tetromino shapes and naive clockwise rotation
//!
//! A shape is a small occupancy matrix (at most 4x4). Rotation turns the
//! matrix 90° clockwise in place of its bounding box; there are no wall kicks
//! and no rotation offsets, so the anchor never moves.

use crate::types::PieceKind;

/// Largest edge of any shape matrix.
pub const MAX_SHAPE_DIM: usize = 4;

/// Occupancy matrix of a piece in one rotation state.
///
/// Row 0 is the top row. Every row and every column of the bounding box
/// holds at least one filled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

const fn from_bits<const R: usize, const C: usize>(bits: [[u8; C]; R]) -> Shape {
    let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
    let mut r = 0;
    while r < R {
        let mut c = 0;
        while c < C {
            cells[r][c] = bits[r][c] != 0;
            c += 1;
        }
        r += 1;
    }
    Shape {
        rows: R as u8,
        cols: C as u8,
        cells,
    }
}

const I_SHAPE: Shape = from_bits([[1, 1, 1, 1]]);
const O_SHAPE: Shape = from_bits([[1, 1], [1, 1]]);
const T_SHAPE: Shape = from_bits([[0, 1, 0], [1, 1, 1]]);
const S_SHAPE: Shape = from_bits([[0, 1, 1], [1, 1, 0]]);
const Z_SHAPE: Shape = from_bits([[1, 1, 0], [0, 1, 1]]);
const J_SHAPE: Shape = from_bits([[1, 0, 0], [1, 1, 1]]);
const L_SHAPE: Shape = from_bits([[0, 0, 1], [1, 1, 1]]);

/// Spawn orientation of a piece kind.
pub fn canonical_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::Z => Z_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
    }
}

impl Shape {
    /// Build a shape from text rows, `#` marking filled cells.
    ///
    /// Returns `None` for empty, ragged or oversized patterns, and for
    /// patterns with a blank row or column.
    ///
    /// ```
    /// use blockfall_core::pieces::{canonical_shape, Shape};
    /// use blockfall_types::PieceKind;
    ///
    /// let t = Shape::from_pattern(&[".#.", "###"]).unwrap();
    /// assert_eq!(t, canonical_shape(PieceKind::T));
    /// assert!(Shape::from_pattern(&["#.", "#"]).is_none());
    /// ```
    pub fn from_pattern(pattern: &[&str]) -> Option<Self> {
        let rows = pattern.len();
        let cols = pattern.first()?.chars().count();
        if rows == 0 || cols == 0 || rows > MAX_SHAPE_DIM || cols > MAX_SHAPE_DIM {
            return None;
        }

        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (r, line) in pattern.iter().enumerate() {
            if line.chars().count() != cols {
                return None;
            }
            for (c, ch) in line.chars().enumerate() {
                cells[r][c] = ch == '#';
            }
        }

        let shape = Self {
            rows: rows as u8,
            cols: cols as u8,
            cells,
        };
        let rows_ok = (0..rows).all(|r| (0..cols).any(|c| shape.cells[r][c]));
        let cols_ok = (0..cols).all(|c| (0..rows).any(|r| shape.cells[r][c]));
        (rows_ok && cols_ok).then_some(shape)
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row][col]
    }

    /// Filled cells as `(row, col)`, row-major.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows()).flat_map(move |r| {
            (0..self.cols())
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (r, c))
        })
    }

    /// 90° clockwise rotation: `new[c][rows - 1 - r] = old[r][c]`.
    pub fn rotated_cw(&self) -> Self {
        let rows = self.rows();
        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (r, c) in self.filled() {
            cells[c][rows - 1 - r] = true;
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

/// A falling piece: kind, current rotation matrix and board anchor.
///
/// The anchor is the board position of the shape's top-left corner and may
/// sit outside the board while a move is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i16,
    pub y: i16,
}

impl Piece {
    /// A piece in its canonical orientation, centered over a board of the
    /// given width at the top row.
    pub fn spawn(kind: PieceKind, board_width: u16) -> Self {
        let shape = canonical_shape(kind);
        let x = (board_width / 2) as i16 - (shape.cols() / 2) as i16;
        Self {
            kind,
            shape,
            x,
            y: 0,
        }
    }

    /// Board coordinates of the filled cells.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.shape
            .filled()
            .map(move |(r, c)| (self.x + c as i16, self.y + r as i16))
    }

    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same anchor, shape turned clockwise.
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }
}
