//! Steel Render Library
//!
//! Drawing backends for the Steel wheel. Every backend consumes the same
//! flattened display list built from a [`steel_core::WheelFrame`].
//! The optional Vello backend renders on the GPU.

mod ops;
mod recorder;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use ops::{DrawOp, build_ops, font_css};
pub use recorder::SceneRecorder;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
