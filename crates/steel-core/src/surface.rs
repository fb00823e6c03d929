//! Drawing surface abstraction.

use crate::geometry::WheelFrame;
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface unavailable: {0}")]
    Unavailable(String),
    #[error("Draw failed: {0}")]
    DrawFailed(String),
    #[error("Surface already released")]
    Released,
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Something a [`WheelFrame`] can be drawn onto.
///
/// Implementations can target a 2D canvas, a GPU scene or a plain
/// recording used in tests.
pub trait WheelSurface {
    /// Replace the surface contents with `frame`.
    fn present(&mut self, frame: &WheelFrame) -> SurfaceResult<()>;

    /// Give up any underlying resources. Called once on teardown.
    fn release(&mut self) {}
}

impl<S: WheelSurface + ?Sized> WheelSurface for Box<S> {
    fn present(&mut self, frame: &WheelFrame) -> SurfaceResult<()> {
        (**self).present(frame)
    }

    fn release(&mut self) {
        (**self).release()
    }
}
