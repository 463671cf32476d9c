//! Editor/output split with a draggable handle.

use crate::config::DEFAULT_MIN_PANEL_WIDTH;

#[derive(Debug, Clone, PartialEq)]
pub struct SplitLayout {
    min_width: f64,
    /// None until the user drags; the host keeps its default split meanwhile.
    editor_width: Option<f64>,
    resizing: bool,
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PANEL_WIDTH)
    }
}

impl SplitLayout {
    pub fn new(min_width: f64) -> Self {
        Self {
            min_width,
            editor_width: None,
            resizing: false,
        }
    }

    pub fn editor_width(&self) -> Option<f64> {
        self.editor_width
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    /// Pointer pressed on the handle.
    pub fn begin_drag(&mut self) {
        self.resizing = true;
    }

    /// Pointer moved. Returns the new editor width, or None when no drag is in progress.
    pub fn drag_to(
        &mut self,
        pointer_x: f64,
        container_left: f64,
        container_width: f64,
        handle_width: f64,
    ) -> Option<f64> {
        if !self.resizing {
            return None;
        }
        let width = clamp_editor_width(
            pointer_x - container_left,
            container_width,
            handle_width,
            self.min_width,
        );
        self.editor_width = Some(width);
        Some(width)
    }

    /// Pointer released. True if a drag ended, so the host should refresh the editor.
    pub fn end_drag(&mut self) -> bool {
        std::mem::replace(&mut self.resizing, false)
    }
}

/// Both panels keep `min_width`; the output-side bound is applied last.
pub fn clamp_editor_width(offset: f64, container_width: f64, handle_width: f64, min_width: f64) -> f64 {
    let max = container_width - min_width - handle_width;
    let mut width = offset;
    if width < min_width {
        width = min_width;
    }
    if width > max {
        width = max;
    }
    width
}
