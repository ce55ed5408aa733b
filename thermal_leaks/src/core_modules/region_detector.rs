// THEORY:
// The `RegionDetector` is the engine of the leak analysis. It takes a relative
// temperature field (every cell already expressed as deviation from the scene
// mean) and turns it into a short list of classified rectangles.
//
// Algorithm steps:
// 1.  **Classify**: A cell is "too hot" when its deviation is at least
//     `leak_offset`, "too cold" when it is at most `-leak_offset`. Because the
//     offset is strictly positive the two classes can never overlap. Every other
//     cell is ignored.
// 2.  **Group (gap-tolerant)**: Each class is partitioned independently into
//     maximal connected groups. Two cells of the same class are neighbors when
//     one can be reached from the other by walking 1 to 9 steps along any of the
//     8 compass or diagonal directions. That lets up to 8 unclassified cells sit
//     between two members of the same leak, which is what keeps a streaky
//     thermal bridge from fragmenting into dozens of tiny boxes.
//     Seeds are picked in row-major order and each group is grown with a queue
//     frontier and a visited grid, so every cell is enqueued at most once.
// 3.  **Bound & Label**: Each group becomes a `LeakRegion` with its enclosing box.
//     Hot ids run `0..hot_count` and cold ids continue from `hot_count`; the id
//     alone decides the classification.
// 4.  **Composite**: The compositor paints hot cells red and cold cells blue on
//     top of the supplied view and emits the boolean mask.
//
// The detector is a stateless utility: one call, one field, fresh outputs.

use crate::core_modules::baseline::RelativeField;
use crate::core_modules::color_image::ColorImage;
use crate::core_modules::compositor::{self, CellClass, LeakMask};
use crate::core_modules::grid::{Coord, Grid};
use crate::core_modules::leak_region::{BoundingBox, LEAK_CONFIDENCE, LeakKind, LeakRegion};
use crate::error::{InspectionError, Result};

pub mod region_detector {
    use super::*;
    use std::collections::VecDeque;

    /// Default deviation from the scene mean that counts as a leak.
    pub const DEFAULT_LEAK_OFFSET: f64 = 5.0;

    /// Longest straight-line hop between two members of one group.
    pub const MAX_RAY_STEPS: usize = 9;

    const DIRECTIONS: [(isize, isize); 8] = [
        (0, 1),
        (0, -1),
        (1, 0),
        (-1, 0),
        (1, 1),
        (-1, -1),
        (1, -1),
        (-1, 1),
    ];

    /// Everything one detection pass produces.
    #[derive(Debug, Clone)]
    pub struct LeakDetection {
        /// Hot groups in discovery order, then cold groups.
        pub regions: Vec<LeakRegion>,
        /// Number of hot groups; also the first cold group id.
        pub hot_group_count: usize,
        pub mask: LeakMask,
        pub visualization: ColorImage,
    }

    pub fn validate_leak_offset(leak_offset: f64) -> Result<()> {
        if !leak_offset.is_finite() || leak_offset <= 0.0 {
            return Err(InspectionError::InvalidConfig(format!(
                "leak offset must be a positive finite number, got {leak_offset}"
            )));
        }
        Ok(())
    }

    /// Step 1: thresholds every cell of a relative field.
    pub fn classify(relative: &Grid<f64>, leak_offset: f64) -> Grid<CellClass> {
        relative.map(|_, &deviation| {
            if deviation >= leak_offset {
                CellClass::Hot
            } else if deviation <= -leak_offset {
                CellClass::Cold
            } else {
                CellClass::Normal
            }
        })
    }

    /// Step 2: partitions all cells of class `target` into gap-tolerant groups.
    /// Groups come out ordered by their first row-major member.
    pub fn group_cells(classes: &Grid<CellClass>, target: CellClass) -> Vec<Vec<Coord>> {
        let mut visited = Grid::from_value(classes.rows(), classes.cols(), false);
        let mut groups = Vec::new();

        for seed in classes.to_coords_list(|_, &class| class == target) {
            if visited[seed] {
                continue;
            }

            visited[seed] = true;
            let mut members = Vec::new();
            let mut frontier = VecDeque::from([seed]);

            while let Some(current) = frontier.pop_front() {
                members.push(current);

                for steps in 1..=MAX_RAY_STEPS {
                    for &(d_row, d_col) in &DIRECTIONS {
                        let Some(next) = current.offset(d_row, d_col, steps) else {
                            continue;
                        };
                        // `get` is None off the grid, so `visited` is only indexed in bounds.
                        if classes.get(next) == Some(&target) && !visited[next] {
                            visited[next] = true;
                            frontier.push_back(next);
                        }
                    }
                }
            }

            groups.push(members);
        }

        groups
    }

    /// Runs classification, grouping, bounding and compositing over one field.
    ///
    /// `view` is the image the markers are painted on and must have the field's
    /// shape. A field with no cell past the offset yields no regions and an
    /// unmodified copy of `view`.
    pub fn find_leaks(
        relative: &RelativeField,
        view: &ColorImage,
        leak_offset: f64,
    ) -> Result<LeakDetection> {
        validate_leak_offset(leak_offset)?;

        let field = relative.grid();
        if field.is_empty() {
            return Err(InspectionError::EmptyGrid);
        }
        if field.shape() != view.grid().shape() {
            return Err(InspectionError::DimensionMismatch {
                field_rows: field.rows(),
                field_cols: field.cols(),
                image_rows: view.height(),
                image_cols: view.width(),
            });
        }

        // --- 1. Classify ---
        let classes = classify(field, leak_offset);

        // --- 2. Group each class independently ---
        let hot_groups = group_cells(&classes, CellClass::Hot);
        let cold_groups = group_cells(&classes, CellClass::Cold);
        let hot_group_count = hot_groups.len();

        // --- 3. Bound & label ---
        let regions: Vec<LeakRegion> = hot_groups
            .iter()
            .chain(cold_groups.iter())
            .enumerate()
            .filter_map(|(id, members)| {
                let bounding_box = BoundingBox::enclosing(members)?;
                let kind = if id < hot_group_count {
                    LeakKind::Hot
                } else {
                    LeakKind::Cold
                };
                Some(LeakRegion {
                    id,
                    kind,
                    confidence: LEAK_CONFIDENCE,
                    bounding_box,
                    cell_count: members.len(),
                })
            })
            .collect();

        // --- 4. Composite ---
        let mask = LeakMask::from_classes(&classes);
        let visualization = compositor::composite(view, &classes)?;

        tracing::debug!(
            hot_regions = hot_group_count,
            cold_regions = cold_groups.len(),
            leak_cells = mask.leak_cell_count(),
            leak_offset,
            "grouped leak cells"
        );

        Ok(LeakDetection {
            regions,
            hot_group_count,
            mask,
            visualization,
        })
    }
}
