//! Steel Core Library
//!
//! Platform-agnostic core for the Steel name-picker wheel: roster handling,
//! wheel geometry, the spin engine and the per-board session state.

pub mod board;
pub mod geometry;
pub mod palette;
pub mod roster;
pub mod scheduler;
pub mod session;
pub mod spin;
pub mod storage;
pub mod surface;
pub mod wheel;

pub use board::{BoardId, BoardIdError};
pub use geometry::{Label, TextAlign, WheelFrame, layout_frame};
pub use roster::Roster;
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use session::{BoardData, BoardSession, SessionStatus};
pub use spin::{SpinPlan, ease_out_cubic, normalize_rotation, winner_index};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use surface::{SurfaceError, SurfaceResult, WheelSurface};
pub use wheel::{FrameStatus, SpinStart, Wheel, WheelConfig, WheelError, WheelState};
