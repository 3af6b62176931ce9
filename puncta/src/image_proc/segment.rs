//! Connected-component extraction and size filtering.
//!
//! Components are maximal 8-connected regions of signal pixels. Labeling is a
//! stack-based flood fill in row-major scan order, so component ids follow
//! first-pixel-encountered order and results are reproducible. Per-component
//! area and bounding box are accumulated during the fill in a single pass.

use ndarray::{Array2, ArrayView2};

use crate::error::DetectError;

/// Pixel label in a labeled mask.
///
/// The background is an explicit sentinel rather than a reserved numeric id,
/// so component ids form their own contiguous space starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// No-signal pixel.
    Background,
    /// Signal pixel belonging to the component with this id.
    Object(u32),
}

/// Bounding box of a detected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Left edge (minimum x)
    pub x_min: usize,
    /// Top edge (minimum y)
    pub y_min: usize,
    /// Width of the box
    pub width: usize,
    /// Height of the box
    pub height: usize,
}

impl BoundingBox {
    /// One past the right edge.
    pub fn x_max(&self) -> usize {
        self.x_min + self.width
    }

    /// One past the bottom edge.
    pub fn y_max(&self) -> usize {
        self.y_min + self.height
    }
}

/// A connected region of signal pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Component id in discovery order.
    pub id: u32,
    /// Tight bounding box around the region.
    pub bbox: BoundingBox,
    /// Number of signal pixels in the region.
    pub area: usize,
}

impl Component {
    /// Bounding-box center with integer truncation, as `(x, y)`.
    ///
    /// Deliberately the box center, not the pixel-mass centroid, for
    /// output compatibility with the original counting tool.
    pub fn centroid(&self) -> (usize, usize) {
        (
            self.bbox.x_min + self.bbox.width / 2,
            self.bbox.y_min + self.bbox.height / 2,
        )
    }
}

/// 8-connectivity neighbor offsets.
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Label 8-connected components of a binary mask.
///
/// # Returns
/// Labeled mask of the same dimensions plus one [`Component`] per region,
/// ordered by ascending id (row-major first-pixel discovery order).
pub fn label_components(mask: ArrayView2<bool>) -> (Array2<Label>, Vec<Component>) {
    let (rows, cols) = mask.dim();
    let mut labels = Array2::from_elem((rows, cols), Label::Background);
    let mut components = Vec::new();

    for i in 0..rows {
        for j in 0..cols {
            if !mask[[i, j]] || labels[[i, j]] != Label::Background {
                continue;
            }

            let id = components.len() as u32;
            let mut area = 0usize;
            let mut x_min = j;
            let mut x_max = j;
            let mut y_min = i;
            let mut y_max = i;

            let mut stack = vec![(i, j)];
            while let Some((y, x)) = stack.pop() {
                if !mask[[y, x]] || labels[[y, x]] != Label::Background {
                    continue;
                }

                labels[[y, x]] = Label::Object(id);
                area += 1;
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);

                for &(dy, dx) in &NEIGHBORS {
                    let ny = y as isize + dy;
                    let nx = x as isize + dx;
                    if ny >= 0 && ny < rows as isize && nx >= 0 && nx < cols as isize {
                        let ny = ny as usize;
                        let nx = nx as usize;
                        if mask[[ny, nx]] && labels[[ny, nx]] == Label::Background {
                            stack.push((ny, nx));
                        }
                    }
                }
            }

            components.push(Component {
                id,
                bbox: BoundingBox {
                    x_min,
                    y_min,
                    width: x_max - x_min + 1,
                    height: y_max - y_min + 1,
                },
                area,
            });
        }
    }

    (labels, components)
}

/// Retain components with at least `min_area` signal pixels.
///
/// # Arguments
/// * `components` - Components in discovery order
/// * `min_area` - Minimum pixel area, >= 1
///
/// # Returns
/// * Surviving components, discovery order preserved
/// * `Err(DetectError::InvalidParameter)` if `min_area` is zero
pub fn filter_components(
    components: Vec<Component>,
    min_area: usize,
) -> Result<Vec<Component>, DetectError> {
    if min_area < 1 {
        return Err(DetectError::InvalidParameter(
            "minimum component area must be >= 1".to_string(),
        ));
    }

    Ok(components
        .into_iter()
        .filter(|component| component.area >= min_area)
        .collect())
}
