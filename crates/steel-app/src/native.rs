//! Native shell: runs the picker headless against an in-memory board.

use crate::config::{AppConfig, ConfigError};
use crate::filter::{FilterButton, plan_filter};
use crate::overlay::{Overlay, OverlayError};
use crate::shortcuts::ShortcutRegistry;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use steel_core::{
    BoardId, BoardIdError, FileStorage, ManualScheduler, MemoryStorage, SpinStart, Storage, StorageError,
};
use steel_render::SceneRecorder;
use thiserror::Error;

/// Errors from the native shell.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid board URL: {0}")]
    Board(#[from] BoardIdError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// Command line arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub url: Option<String>,
    /// Keep boards as JSON files in this directory instead of in memory.
    pub store: Option<PathBuf>,
    /// Keep boards as JSON files in the per-user data directory.
    pub persist: bool,
    /// Spin once instead of until every name is drawn.
    pub once: bool,
    /// Start a new round before spinning.
    pub reset: bool,
    pub show_shortcuts: bool,
    pub names: Vec<String>,
}

impl CliArgs {
    pub const USAGE: &'static str =
        "usage: steel [--config FILE] [--seed N] [--url BOARD_URL] [--store DIR | --persist] [--once] [--reset] [--shortcuts] [NAME...]";

    /// Parse arguments (without the program name).
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, NativeError> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(Self::value(&mut args, &arg)?)),
                "--seed" => {
                    let value = Self::value(&mut args, &arg)?;
                    let seed = value
                        .parse()
                        .map_err(|_| NativeError::Usage(format!("--seed expects a number, got {:?}", value)))?;
                    parsed.seed = Some(seed);
                }
                "--url" => parsed.url = Some(Self::value(&mut args, &arg)?),
                "--store" => parsed.store = Some(PathBuf::from(Self::value(&mut args, &arg)?)),
                "--persist" => parsed.persist = true,
                "--once" => parsed.once = true,
                "--reset" => parsed.reset = true,
                "--shortcuts" => parsed.show_shortcuts = true,
                flag if flag.starts_with("--") => {
                    return Err(NativeError::Usage(format!("unknown option {}\n{}", flag, Self::USAGE)));
                }
                _ => parsed.names.push(arg),
            }
        }
        if parsed.persist && parsed.store.is_some() {
            return Err(NativeError::Usage(format!("--store and --persist are exclusive\n{}", Self::USAGE)));
        }
        Ok(parsed)
    }

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, NativeError> {
        args.next()
            .ok_or_else(|| NativeError::Usage(format!("{} needs a value\n{}", flag, Self::USAGE)))
    }
}

/// Spin through the names left on the board, printing each pick.
pub async fn run_native(args: CliArgs) -> Result<(), NativeError> {
    if args.show_shortcuts {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.wheel.seed = Some(seed);
    }

    let url = args.url.clone().unwrap_or_else(|| config.page_url.clone());
    let board = BoardId::from_url(&url)?;
    log::info!("{}: board {} from {}", config.title, board, url);

    match &args.store {
        Some(dir) => run_board(Rc::new(FileStorage::new(dir.clone())?), board, &config, &args).await,
        None if args.persist => {
            let storage = FileStorage::default_location()?;
            log::info!("Boards stored in {}", storage.base_path().display());
            run_board(Rc::new(storage), board, &config, &args).await
        }
        None => run_board(Rc::new(MemoryStorage::new()), board, &config, &args).await,
    }
}

async fn run_board<St: Storage>(
    storage: Rc<St>,
    board: BoardId,
    config: &AppConfig,
    args: &CliArgs,
) -> Result<(), NativeError> {
    let scheduler = ManualScheduler::new();
    let mut overlay = Overlay::new(board, storage, config.wheel.clone());
    overlay.show(SceneRecorder::new(), scheduler.clone()).await?;

    if !args.names.is_empty() {
        overlay.replace_names(&args.names.join("\n")).await?;
    }
    if args.reset {
        overlay.reset().await?;
    }

    // Stand-in for the board's quick filter bar.
    let mut buttons: Vec<FilterButton> = overlay
        .session()
        .names()
        .iter()
        .map(|name| FilterButton::new(name.clone(), false))
        .collect();
    overlay.on_winner(move |winner| {
        let plan = plan_filter(&buttons, &winner.label);
        for i in plan.deselect {
            buttons[i].pressed = false;
        }
        if let Some(i) = plan.select {
            buttons[i].pressed = true;
        }
        println!("{}", plan.outcome);
    });

    let interval = Duration::from_millis(config.frame_interval_ms.max(1));
    while overlay.status().can_spin() {
        if overlay.spin() == SpinStart::Ignored {
            break;
        }
        while overlay.is_spinning() {
            std::thread::sleep(interval);
            for handle in scheduler.advance(interval) {
                overlay.on_frame(handle)?;
            }
        }
        for winner in overlay.pump().await? {
            log::debug!("Picked {} at index {}", winner.label, winner.index);
        }
        println!("  [{}]", overlay.status());
        if args.once {
            break;
        }
    }

    println!("{}", overlay.status());
    overlay.hide();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs, NativeError> {
        CliArgs::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--seed", "9", "Ann", "--url", "https://x/boards/3", "Bo"]).unwrap();
        assert_eq!(parsed.seed, Some(9));
        assert_eq!(parsed.url.as_deref(), Some("https://x/boards/3"));
        assert_eq!(parsed.names, vec!["Ann", "Bo"]);
        assert!(!parsed.show_shortcuts);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(args(&["--seed"]), Err(NativeError::Usage(_))));
        assert!(matches!(args(&["--seed", "x"]), Err(NativeError::Usage(_))));
        assert!(matches!(args(&["--bogus"]), Err(NativeError::Usage(_))));
        assert!(matches!(args(&["--persist", "--store", "/tmp/b"]), Err(NativeError::Usage(_))));
    }

    #[test]
    fn test_parse_persist() {
        let parsed = args(&["--persist", "Ann"]).unwrap();
        assert!(parsed.persist);
        assert_eq!(parsed.store, None);
        assert_eq!(parsed.names, vec!["Ann"]);
        assert!(!args(&["Ann"]).unwrap().persist);
    }

    fn fast_config(dir: &std::path::Path) -> PathBuf {
        let mut json = serde_json::to_value(AppConfig {
            frame_interval_ms: 1,
            ..AppConfig::default()
        })
        .unwrap();
        json["wheel"]["spin_duration_ms"] = serde_json::json!(50);
        let path = dir.join("config.json");
        std::fs::write(&path, json.to_string()).unwrap();
        path
    }

    #[test]
    fn test_run_to_exhaustion() {
        let dir = tempfile::tempdir().unwrap();
        let mut parsed = args(&["--seed", "1", "Ann", "Bo"]).unwrap();
        parsed.config = Some(fast_config(dir.path()));

        pollster::block_on(run_native(parsed)).unwrap();
    }

    #[test]
    fn test_stored_board_keeps_round() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let store = dir.path().join("boards");
        let run = |extra: &[&str]| {
            let mut parsed = args(&["--once", "--url", "https://jira.local/boards/8"]).unwrap();
            parsed.config = Some(config.clone());
            parsed.store = Some(store.clone());
            parsed.names = extra.iter().map(|s| s.to_string()).collect();
            pollster::block_on(run_native(parsed)).unwrap();
        };

        run(&["Ann", "Bo", "Cy"]);
        run(&[]);

        let json = std::fs::read_to_string(store.join("board-8.json")).unwrap();
        let data = steel_core::BoardData::from_json(&json).unwrap();
        assert_eq!(data.names.len(), 3);
        assert_eq!(data.active_names.map(|a| a.len()), Some(1));
        assert!(data.last_winner.is_some());
    }
}
