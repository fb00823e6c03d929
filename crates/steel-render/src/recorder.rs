//! Surface that records the display list instead of drawing it.

use crate::ops::{DrawOp, build_ops};
use steel_core::geometry::WheelFrame;
use steel_core::surface::{SurfaceError, SurfaceResult, WheelSurface};

/// Keeps the most recent frame and its display list.
///
/// Used headless: in tests and by the native command-line shell.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    frames_presented: usize,
    last_frame: Option<WheelFrame>,
    ops: Vec<DrawOp>,
    released: bool,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }

    pub fn last_frame(&self) -> Option<&WheelFrame> {
        self.last_frame.as_ref()
    }

    /// Display list of the last frame.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text of every label in the last frame, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl WheelSurface for SceneRecorder {
    fn present(&mut self, frame: &WheelFrame) -> SurfaceResult<()> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        self.ops = build_ops(frame);
        self.last_frame = Some(frame.clone());
        self.frames_presented += 1;
        Ok(())
    }

    fn release(&mut self) {
        log::debug!("Recorder released after {} frames", self.frames_presented);
        self.released = true;
        self.ops.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steel_core::{Roster, layout_frame};

    #[test]
    fn test_records_last_frame() {
        let mut recorder = SceneRecorder::new();
        let roster: Roster = ["Ann", "Bo", "Cy"].into_iter().collect();
        recorder.present(&layout_frame(&roster, 230.0, 0.0)).unwrap();
        recorder.present(&layout_frame(&roster, 230.0, 1.0)).unwrap();

        assert_eq!(recorder.frames_presented(), 2);
        assert_eq!(recorder.last_frame().map(|f| f.rotation), Some(1.0));
        assert_eq!(recorder.texts(), ["Ann", "Bo", "Cy"]);
    }

    #[test]
    fn test_present_after_release_fails() {
        let mut recorder = SceneRecorder::new();
        recorder.release();
        let result = recorder.present(&layout_frame(&Roster::new(), 230.0, 0.0));
        assert!(matches!(result, Err(SurfaceError::Released)));
        assert!(recorder.is_released());
    }
}
