// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion settings and fixed rendering constants.

use serde::{Deserialize, Serialize};

use crate::error::{PageGridError, Result};
use crate::types::PlacementSize;

/// Resolution every page is rendered at.
pub const RENDER_DPI: u32 = 300;

/// Native resolution of PDF user space (1 unit = 1/72 inch).
pub const NATIVE_DPI: u32 = 72;

/// DOCX drawing unit.
pub const EMU_PER_INCH: u32 = 914_400;

/// Column count of the output table.
pub const DEFAULT_COLUMNS: usize = 3;

/// Zoom applied to the page's native coordinate space (300/72).
pub fn render_zoom() -> f32 {
    RENDER_DPI as f32 / NATIVE_DPI as f32
}

/// How the display size of an embedded image is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizingPolicy {
    /// 1.7in x 1.2in in the first row, 2.0in x 1.5in in every later row.
    #[default]
    Legacy,
    /// 2.0in x 1.5in everywhere.
    Uniform,
}

impl SizingPolicy {
    /// Display size for an image placed in `row`.
    pub fn size_for_row(&self, row: usize) -> PlacementSize {
        match self {
            Self::Legacy if row == 0 => PlacementSize::FIRST_ROW,
            Self::Legacy | Self::Uniform => PlacementSize::LATER_ROWS,
        }
    }
}

/// Settings for one batch conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Number of table columns (must be at least 1).
    pub columns: usize,
    /// Image sizing policy.
    pub sizing: SizingPolicy,
    /// Pre-create one table row per input file before any page is known.
    pub presize_rows: bool,
    /// Count pages of every input before converting so progress totals are exact.
    pub count_pages_up_front: bool,
}

impl ConvertConfig {
    /// Reject settings the layout engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(PageGridError::Config(
                "column count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            sizing: SizingPolicy::default(),
            presize_rows: false,
            count_pages_up_front: true,
        }
    }
}
