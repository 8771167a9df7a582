// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid layout — row-major placement of a stream of page images into a table
// with a fixed column count.
//
// The engine owns only a cursor. Rows live in the output document; the engine
// asks for a row to exist right before it addresses it, so rows the document
// already has (pre-sized tables) are reused and no trailing empty row is ever
// created by the engine itself.

use pagegrid_core::config::SizingPolicy;
use pagegrid_core::error::{PageGridError, Result};
use pagegrid_core::types::{GridCell, PlacementSize};
use tracing::trace;

/// A table whose row count can grow on demand.
pub trait GrowableGrid {
    /// Number of columns in every row.
    fn column_count(&self) -> usize;

    /// Number of rows that currently exist.
    fn row_count(&self) -> usize;

    /// Make sure rows `0..=index` exist. Idempotent.
    fn ensure_row(&mut self, index: usize);
}

/// Placement cursor. Invariant: `column < columns` and `columns >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutCursor {
    row: usize,
    column: usize,
    columns: usize,
}

impl LayoutCursor {
    pub fn new(columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(PageGridError::Config(
                "column count must be at least 1".into(),
            ));
        }
        Ok(Self {
            row: 0,
            column: 0,
            columns,
        })
    }

    /// The cell the next image will occupy.
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.row, self.column)
    }

    /// Step to the next cell, wrapping to column 0 of the next row.
    fn advance(&mut self) {
        self.column += 1;
        if self.column == self.columns {
            self.column = 0;
            self.row += 1;
        }
    }
}

/// Where one image went and how large it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub cell: GridCell,
    pub size: PlacementSize,
}

/// Assigns consecutive images to consecutive cells, row by row.
#[derive(Debug, Clone)]
pub struct GridLayoutEngine {
    cursor: LayoutCursor,
    sizing: SizingPolicy,
}

impl GridLayoutEngine {
    pub fn new(columns: usize, sizing: SizingPolicy) -> Result<Self> {
        Ok(Self {
            cursor: LayoutCursor::new(columns)?,
            sizing,
        })
    }

    /// Build an engine whose column count is taken from `grid`'s table shape.
    pub fn for_grid<G: GrowableGrid + ?Sized>(grid: &G, sizing: SizingPolicy) -> Result<Self> {
        Self::new(grid.column_count(), sizing)
    }

    /// Claim the next cell, growing `grid` so the cell's row exists.
    pub fn place<G: GrowableGrid + ?Sized>(&mut self, grid: &mut G) -> Placement {
        let cell = self.cursor.cell();
        if cell.row >= grid.row_count() {
            grid.ensure_row(cell.row);
        }

        let placement = Placement {
            cell,
            size: self.sizing.size_for_row(cell.row),
        };
        trace!(row = cell.row, column = cell.column, "Cell assigned");

        self.cursor.advance();
        placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bare row counter standing in for an output document.
    struct Rows {
        columns: usize,
        rows: usize,
        ensure_calls: usize,
    }

    impl Rows {
        fn new(columns: usize, rows: usize) -> Self {
            Self {
                columns,
                rows,
                ensure_calls: 0,
            }
        }
    }

    impl GrowableGrid for Rows {
        fn column_count(&self) -> usize {
            self.columns
        }

        fn row_count(&self) -> usize {
            self.rows
        }

        fn ensure_row(&mut self, index: usize) {
            self.ensure_calls += 1;
            self.rows = self.rows.max(index + 1);
        }
    }

    #[test]
    fn row_major_placement_for_all_small_shapes() {
        for columns in 1..=5 {
            for count in 0..=20 {
                let mut grid = Rows::new(columns, 0);
                let mut engine =
                    GridLayoutEngine::for_grid(&grid, SizingPolicy::Legacy).expect("engine");

                for i in 0..count {
                    let placement = engine.place(&mut grid);
                    assert_eq!(placement.cell, GridCell::new(i / columns, i % columns));
                    assert!(placement.cell.row < grid.row_count());
                }

                assert_eq!(
                    engine.cursor.cell(),
                    GridCell::new(count / columns, count % columns)
                );
                assert_eq!(grid.row_count(), count.div_ceil(columns));
            }
        }
    }

    #[test]
    fn pre_existing_rows_are_reused() {
        for presized in 0..=6 {
            for count in 0..=12usize {
                let mut grid = Rows::new(3, presized);
                let mut engine = GridLayoutEngine::new(3, SizingPolicy::Legacy).expect("engine");
                for _ in 0..count {
                    engine.place(&mut grid);
                }
                assert_eq!(grid.row_count(), presized.max(count.div_ceil(3)));
            }
        }
    }

    #[test]
    fn rows_are_grown_only_when_addressed() {
        let mut grid = Rows::new(3, 0);
        let mut engine = GridLayoutEngine::new(3, SizingPolicy::Legacy).expect("engine");

        for _ in 0..3 {
            engine.place(&mut grid);
        }
        // Row 0 is full but row 1 has not been addressed yet.
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.ensure_calls, 1);
        assert_eq!(engine.cursor.cell(), GridCell::new(1, 0));

        engine.place(&mut grid);
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn legacy_sizing_switches_after_first_row() {
        let mut grid = Rows::new(3, 0);
        let mut engine = GridLayoutEngine::new(3, SizingPolicy::Legacy).expect("engine");
        let sizes: Vec<_> = (0..5).map(|_| engine.place(&mut grid).size).collect();

        assert_eq!(&sizes[..3], &[PlacementSize::FIRST_ROW; 3]);
        assert_eq!(&sizes[3..], &[PlacementSize::LATER_ROWS; 2]);
    }

    #[test]
    fn uniform_sizing_never_switches() {
        let mut grid = Rows::new(2, 0);
        let mut engine = GridLayoutEngine::new(2, SizingPolicy::Uniform).expect("engine");
        for _ in 0..6 {
            assert_eq!(engine.place(&mut grid).size, PlacementSize::LATER_ROWS);
        }
    }

    #[test]
    fn zero_columns_is_rejected() {
        assert!(GridLayoutEngine::new(0, SizingPolicy::Legacy).is_err());
    }
}
