//! Column width allocation.
//!
//! A requested width is interpreted by magnitude:
//!
//! | Request        | Meaning |
//! |----------------|---------|
//! | `> 1.0`        | Fixed width in pixels |
//! | `(0.0, 1.0]`   | Proportional weight relative to other weighted columns |
//! | `<= 0.0`       | Proportional with the default weight `0.1` |
//!
//! Fixed columns are paid first; whatever remains of the available space is
//! split across the weighted columns in proportion to their weights, with a
//! floor per column so narrow viewports never collapse columns to nothing.
//! A user override (from a prior manual resize) wins outright: the column is
//! fixed at the override and contributes weight 0 to the remaining pool.

/// Minimum pixel width a weighted column can be allocated.
pub const MIN_COLUMN_WIDTH: f32 = 30.0;

/// Default weight for non-positive width requests.
const DEFAULT_WEIGHT: f32 = 0.1;

/// Allocate pixel widths for a set of columns.
///
/// Pure function of its inputs. `min_widths` and `overrides` may be shorter
/// than `requested`; missing entries mean "no minimum" / "no override".
///
/// # Example
///
/// ```
/// use trellis::adapter::allocate_widths;
///
/// let widths = allocate_widths(500.0, &[120.0, 0.5, 0.25], &[], &[]);
/// assert_eq!(widths[0], 120.0);
/// // Remaining 380 px split 2:1 between the weighted columns.
/// assert!((widths[1] - 253.33).abs() < 0.5);
/// assert!((widths[2] - 126.67).abs() < 0.5);
/// ```
pub fn allocate_widths(
    available: f32,
    requested: &[f32],
    min_widths: &[Option<f32>],
    overrides: &[Option<f32>],
) -> Vec<f32> {
    let count = requested.len();
    let mut widths = vec![0.0f32; count];
    let mut weights = vec![0.0f32; count];

    // First pass: pin fixed and overridden columns, collect weights.
    let mut fixed_total = 0.0f32;
    let mut weight_total = 0.0f32;
    for (i, &request) in requested.iter().enumerate() {
        if let Some(user) = overrides.get(i).copied().flatten() {
            widths[i] = user;
            fixed_total += user;
        } else if request > 1.0 {
            widths[i] = request;
            fixed_total += request;
        } else {
            let weight = if request <= 0.0 { DEFAULT_WEIGHT } else { request };
            weights[i] = weight;
            weight_total += weight;
        }
    }

    // Second pass: split the remaining space across weighted columns.
    let remaining = (available - fixed_total).max(0.0);
    for i in 0..count {
        if weights[i] > 0.0 {
            let floor = min_widths
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(MIN_COLUMN_WIDTH);
            let share = remaining * weights[i] / weight_total;
            widths[i] = share.max(floor);
        }
    }

    widths
}
