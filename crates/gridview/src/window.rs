//! Virtual scrolling window.
//!
//! With fixed-height rows, the rows worth rendering follow from the scroll
//! offset alone:
//!
//! ```text
//! start        = max(0, floor(scroll / item_height) - buffer)
//! visible      = ceil(viewport / item_height) + 2 * buffer
//! end          = min(total, start + visible)
//! offset_y     = start * item_height
//! total_height = total * item_height
//! ```

/// Inputs to the windowing math.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowParams {
    pub scroll_top: f64,
    pub item_height: f64,
    pub buffer: usize,
    pub viewport_height: f64,
}

/// The slice of rows to render and where to place it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualWindow {
    /// First rendered index, inclusive.
    pub start: usize,
    /// Last rendered index, exclusive.
    pub end: usize,
    /// Vertical translation of the rendered slice.
    pub offset_y: f64,
    /// Height of the full scrollable area.
    pub total_height: f64,
}

impl VirtualWindow {
    /// A window covering all `total` rows with no translation.
    pub fn identity(total: usize) -> Self {
        VirtualWindow {
            start: 0,
            end: total,
            offset_y: 0.0,
            total_height: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Computes the render window for `total` rows.
///
/// Out-of-range scroll offsets never fail: a negative offset acts as 0 and
/// an offset past the end yields an empty window at `total`. A non-positive
/// or non-finite item height falls back to [`VirtualWindow::identity`].
pub fn compute_window(total: usize, params: &WindowParams) -> VirtualWindow {
    let height = params.item_height;
    if !(height.is_finite() && height > 0.0) {
        return VirtualWindow::identity(total);
    }
    let scroll = params.scroll_top.max(0.0);
    let first_visible = (scroll / height).floor() as usize;
    let start = first_visible.saturating_sub(params.buffer).min(total);
    let in_view = (params.viewport_height.max(0.0) / height).ceil() as usize;
    let visible = in_view.saturating_add(params.buffer.saturating_mul(2));
    let end = start.saturating_add(visible).min(total);
    VirtualWindow {
        start,
        end,
        offset_y: start as f64 * height,
        total_height: total as f64 * height,
    }
}

/// Scroll offset that places row `index` at the top of the viewport.
pub fn scroll_offset_for(index: usize, item_height: f64) -> f64 {
    if item_height.is_finite() && item_height > 0.0 {
        index as f64 * item_height
    } else {
        0.0
    }
}
