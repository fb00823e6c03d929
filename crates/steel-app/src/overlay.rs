//! Board overlay: ties the stored session for one board to a live wheel.

use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, channel};
use steel_core::{
    BoardId, BoardSession, FrameHandle, FrameScheduler, FrameStatus, SessionStatus, SpinStart,
    Storage, StorageError, Wheel, WheelConfig, WheelError, WheelSurface,
};
use thiserror::Error;

/// Overlay errors.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Wheel error: {0}")]
    Wheel(#[from] WheelError),
}

/// A name picked by the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub label: String,
    pub index: usize,
}

type WinnerHook = Box<dyn FnMut(&Winner)>;

/// The picker overlay for one board.
///
/// The wheel only exists while the overlay is shown. Its spin callback
/// posts to a channel; [`Overlay::pump`] applies the results, so the wheel
/// is never borrowed while the session is saved.
pub struct Overlay<St: Storage, S: WheelSurface, F: FrameScheduler> {
    board: BoardId,
    storage: Rc<St>,
    config: WheelConfig,
    session: BoardSession,
    wheel: Option<Wheel<S, F>>,
    winners_tx: Sender<Winner>,
    winners_rx: Receiver<Winner>,
    on_winner: Option<WinnerHook>,
}

impl<St: Storage, S: WheelSurface, F: FrameScheduler> Overlay<St, S, F> {
    pub fn new(board: BoardId, storage: Rc<St>, config: WheelConfig) -> Self {
        let (winners_tx, winners_rx) = channel();
        Self {
            board,
            storage,
            config,
            session: BoardSession::default(),
            wheel: None,
            winners_tx,
            winners_rx,
            on_winner: None,
        }
    }

    /// Run `hook` for every recorded winner (e.g. to press its quick filter).
    pub fn on_winner(&mut self, hook: impl FnMut(&Winner) + 'static) {
        self.on_winner = Some(Box::new(hook));
    }

    pub fn board(&self) -> &BoardId {
        &self.board
    }

    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    pub fn wheel(&self) -> Option<&Wheel<S, F>> {
        self.wheel.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.wheel.is_some()
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.as_ref().is_some_and(|w| w.is_spinning())
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn last_winner(&self) -> Option<&str> {
        self.session.last_winner()
    }

    /// Load the board and open the wheel on its active names.
    ///
    /// Returns `false` if the overlay was already shown.
    pub async fn show(&mut self, surface: S, scheduler: F) -> Result<bool, OverlayError> {
        if self.is_visible() {
            return Ok(false);
        }

        self.session = self.load_session().await;

        let tx = self.winners_tx.clone();
        let wheel = Wheel::new(
            self.session.active_roster(),
            self.config.clone(),
            surface,
            scheduler,
            move |label, index| {
                let winner = Winner {
                    label: label.to_string(),
                    index,
                };
                if tx.send(winner).is_err() {
                    log::warn!("Winner {:?} dropped: overlay is gone", label);
                }
            },
        )?;
        self.wheel = Some(wheel);
        log::info!("Overlay shown for {} ({})", self.board, self.session.status());
        Ok(true)
    }

    /// Close the wheel. A running spin is abandoned without a winner.
    ///
    /// Returns `false` if the overlay was already hidden.
    pub fn hide(&mut self) -> bool {
        match self.wheel.take() {
            Some(wheel) => {
                wheel.destroy();
                log::info!("Overlay hidden for {}", self.board);
                true
            }
            None => false,
        }
    }

    /// Show or hide. `open` supplies the surface and scheduler when showing.
    ///
    /// Returns whether the overlay is now visible.
    pub async fn toggle(&mut self, open: impl FnOnce() -> (S, F)) -> Result<bool, OverlayError> {
        if self.hide() {
            return Ok(false);
        }
        let (surface, scheduler) = open();
        self.show(surface, scheduler).await?;
        Ok(true)
    }

    /// Spin the wheel if the board has names left to draw.
    pub fn spin(&mut self) -> SpinStart {
        if !self.session.status().can_spin() {
            return SpinStart::Ignored;
        }
        match self.wheel.as_mut() {
            Some(wheel) => wheel.spin(),
            None => SpinStart::Ignored,
        }
    }

    /// Forward a fired animation frame to the wheel.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<FrameStatus, OverlayError> {
        match self.wheel.as_mut() {
            Some(wheel) => Ok(wheel.on_frame(handle)?),
            None => Ok(FrameStatus::Stale),
        }
    }

    /// Apply winners reported since the last call.
    ///
    /// Each winner leaves the draw, the board is saved and the wheel is
    /// narrowed to the remaining names.
    pub async fn pump(&mut self) -> Result<Vec<Winner>, OverlayError> {
        let winners: Vec<Winner> = self.winners_rx.try_iter().collect();
        for winner in &winners {
            self.session.record_winner(&winner.label);
            self.persist().await;
            self.refresh_wheel()?;
            if let Some(hook) = self.on_winner.as_mut() {
                hook(winner);
            }
        }
        Ok(winners)
    }

    /// Flip a name in or out of the draw. `None` if the name is unknown.
    pub async fn toggle_name(&mut self, name: &str) -> Result<Option<bool>, OverlayError> {
        let Some(active) = self.session.toggle_name(name) else {
            return Ok(None);
        };
        self.persist().await;
        self.refresh_wheel()?;
        Ok(Some(active))
    }

    /// Start a new round with every name back in.
    pub async fn reset(&mut self) -> Result<(), OverlayError> {
        self.session.reset();
        self.persist().await;
        self.refresh_wheel()
    }

    /// Save an edited name list (one name per line).
    ///
    /// Returns whether the roster changed, which also starts a new round.
    pub async fn replace_names(&mut self, text: &str) -> Result<bool, OverlayError> {
        let changed = self.session.replace_names(text);
        self.persist().await;
        self.refresh_wheel()?;
        Ok(changed)
    }

    async fn load_session(&self) -> BoardSession {
        match self.storage.load(&self.board).await {
            Ok(data) => {
                let (session, repaired) = BoardSession::from_data(data);
                if repaired {
                    log::debug!("Board {} had no active names, starting a new round", self.board);
                    if let Err(e) = self.storage.save(&self.board, &session.to_data()).await {
                        log::error!("Failed to save board {}: {}", self.board, e);
                    }
                }
                session
            }
            Err(StorageError::NotFound(_)) => BoardSession::default(),
            Err(e) => {
                log::error!("Failed to load board {}: {}", self.board, e);
                BoardSession::default()
            }
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.storage.save(&self.board, &self.session.to_data()).await {
            log::error!("Failed to save board {}: {}", self.board, e);
        }
    }

    fn refresh_wheel(&mut self) -> Result<(), OverlayError> {
        if let Some(wheel) = self.wheel.as_mut() {
            wheel.set_roster(self.session.active_roster())?;
        }
        Ok(())
    }
}
