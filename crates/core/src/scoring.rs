//! Scoring module - classic line-clear scoring and level progression
//!
//! - Clearing `n` lines at once is worth `LINE_SCORES[n - 1] * level`.
//! - Every successful manual soft-drop step is worth a fixed amount.
//! - Level is `total_lines / 10 + 1` and only ever grows.

use crate::types::{LINES_PER_LEVEL, LINE_SCORES};

/// Points for clearing `lines` rows at once at `level` (1-based).
///
/// Only 1 to 4 lines have a table entry; anything else returns `None`.
pub fn line_clear_points(lines: u32, level: u32) -> Option<u32> {
    let idx = (lines as usize).checked_sub(1)?;
    LINE_SCORES
        .get(idx)
        .map(|base| base.saturating_mul(level))
}

/// Drop score: `points_per_cell` for every cell travelled by a soft drop.
pub fn calculate_drop_score(cells: u32, points_per_cell: u32) -> u32 {
    cells.saturating_mul(points_per_cell)
}

/// Level management
/// Level starts at 1 and increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_line_scores() {
        assert_eq!(line_clear_points(1, 1), Some(100));
        assert_eq!(line_clear_points(2, 1), Some(300));
        assert_eq!(line_clear_points(3, 1), Some(500));
        assert_eq!(line_clear_points(4, 1), Some(800));

        assert_eq!(line_clear_points(1, 3), Some(300));
        assert_eq!(line_clear_points(4, 5), Some(4000));
    }

    #[test]
    fn test_line_count_outside_table() {
        assert_eq!(line_clear_points(0, 1), None);
        assert_eq!(line_clear_points(5, 1), None);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(10, 1), 10);
        assert_eq!(calculate_drop_score(3, 2), 6);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(29), 3);
        assert_eq!(calculate_level(100), 11);
    }
}
