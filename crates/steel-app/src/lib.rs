//! Steel Application
//!
//! The overlay shell around the wheel: per-board session handling, quick
//! filter selection, keyboard shortcuts, and the native and WASM hosts.

mod config;
mod filter;
mod overlay;
mod shortcuts;

pub use config::{AppConfig, ConfigError};
pub use filter::{FilterButton, FilterOutcome, FilterPlan, plan_filter};
pub use overlay::{Overlay, OverlayError, Winner};
pub use shortcuts::{Action, Modifiers, Shortcut, ShortcutRegistry};

#[cfg(not(target_arch = "wasm32"))]
mod native;

#[cfg(not(target_arch = "wasm32"))]
pub use native::{CliArgs, NativeError, run_native};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::SteelWheel;
