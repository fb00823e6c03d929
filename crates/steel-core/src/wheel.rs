//! The spinning wheel widget.

use crate::geometry::{WheelFrame, layout_frame};
use crate::roster::Roster;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::spin::{DEFAULT_SPIN_DURATION, DEFAULT_TURNS, SpinPlan, winner_index};
use crate::surface::{SurfaceError, WheelSurface};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;
use thiserror::Error;

/// Wheel errors.
#[derive(Debug, Error)]
pub enum WheelError {
    #[error("Render failed: {0}")]
    Render(#[from] SurfaceError),
    #[error("Invalid wheel config: {0}")]
    InvalidConfig(String),
}

/// Tunable wheel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Canvas width and height in pixels.
    pub size: u32,
    /// Spin animation length in milliseconds.
    pub spin_duration_ms: u64,
    /// Fewest full turns per spin.
    pub min_turns: f64,
    /// Upper bound (exclusive) of full turns per spin.
    pub max_turns: f64,
    /// Fixed RNG seed for reproducible spins.
    pub seed: Option<u64>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            size: 230,
            spin_duration_ms: DEFAULT_SPIN_DURATION.as_millis() as u64,
            min_turns: DEFAULT_TURNS.start,
            max_turns: DEFAULT_TURNS.end,
            seed: None,
        }
    }
}

impl WheelConfig {
    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that `0 <= min_turns <= max_turns`, both finite.
    pub fn validate(&self) -> Result<(), WheelError> {
        let (min, max) = (self.min_turns, self.max_turns);
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
            return Err(WheelError::InvalidConfig(format!(
                "turn range {}..{} must satisfy 0 <= min_turns <= max_turns",
                min, max
            )));
        }
        Ok(())
    }

    /// Turn range for a spin, or the default range if this one is invalid.
    pub fn turns(&self) -> Range<f64> {
        match self.validate() {
            Ok(()) => self.min_turns..self.max_turns,
            Err(e) => {
                log::warn!("{}, using {:?}", e, DEFAULT_TURNS);
                DEFAULT_TURNS
            }
        }
    }
}

/// Rotation and the in-flight spin, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelState {
    /// Accumulated rotation in radians. Never wraps.
    pub rotation: f64,
    /// Present while spinning.
    pub spin: Option<SpinPlan>,
}

impl WheelState {
    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }
}

/// What a call to [`Wheel::spin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStart {
    /// Already spinning or nothing to pick from.
    Ignored,
    /// Only one name: it was reported right away.
    Resolved,
    /// Animation started; the winner arrives on a later frame.
    Started,
}

/// What a call to [`Wheel::on_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStatus {
    /// The handle was not the one the wheel is waiting for.
    Stale,
    /// No spin in progress.
    Idle,
    /// Drew an intermediate frame at `progress` in `[0, 1)`.
    Animating { progress: f64 },
    /// Spin finished on the segment at `index`.
    Finished { index: usize },
}

type SpinCallback = Box<dyn FnMut(&str, usize)>;

/// A spinnable wheel of names.
///
/// Owns its drawing surface and a scheduler handle. Dropping the wheel (or
/// calling [`Wheel::destroy`]) cancels any pending frame and releases the
/// surface, so an interrupted spin never reports a winner.
pub struct Wheel<S: WheelSurface, F: FrameScheduler> {
    roster: Roster,
    /// Roster handed to `set_roster` mid-spin, applied once the spin ends.
    queued_roster: Option<Roster>,
    config: WheelConfig,
    state: WheelState,
    pending_frame: Option<FrameHandle>,
    surface: S,
    scheduler: F,
    rng: StdRng,
    on_spin_end: SpinCallback,
    released: bool,
}

impl<S: WheelSurface, F: FrameScheduler> Wheel<S, F> {
    /// Create a wheel and draw its first frame.
    pub fn new(
        roster: impl Into<Roster>,
        config: WheelConfig,
        surface: S,
        scheduler: F,
        on_spin_end: impl FnMut(&str, usize) + 'static,
    ) -> Result<Self, WheelError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut wheel = Self {
            roster: roster.into(),
            queued_roster: None,
            config,
            state: WheelState::default(),
            pending_frame: None,
            surface,
            scheduler,
            rng,
            on_spin_end: Box::new(on_spin_end),
            released: false,
        };
        wheel.render()?;
        log::debug!("Wheel created with {} names", wheel.roster.len());
        Ok(wheel)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    pub fn rotation(&self) -> f64 {
        self.state.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Geometry of the current frame.
    pub fn frame(&self) -> WheelFrame {
        layout_frame(&self.roster, self.config.size as f64, self.state.rotation)
    }

    /// Replace the names and redraw at the current rotation.
    ///
    /// While a spin is running the new roster is held back until the spin
    /// has reported its winner, so the winner always indexes the roster the
    /// spin started with.
    pub fn set_roster(&mut self, roster: impl Into<Roster>) -> Result<(), WheelError> {
        let roster = roster.into();
        if self.is_spinning() {
            log::debug!("Deferring roster update ({} names) until spin ends", roster.len());
            self.queued_roster = Some(roster);
            return Ok(());
        }
        self.roster = roster;
        self.render()
    }

    /// Start a spin.
    ///
    /// Ignored while spinning or when the roster is empty. A single name is
    /// reported immediately without animating, as is any spin the scheduler
    /// cannot animate.
    pub fn spin(&mut self) -> SpinStart {
        if self.is_spinning() || self.roster.is_empty() {
            return SpinStart::Ignored;
        }

        if self.roster.len() == 1 {
            if let Some(name) = self.roster.get(0) {
                (self.on_spin_end)(name, 0);
            }
            return SpinStart::Resolved;
        }

        let plan = SpinPlan::draw(
            &mut self.rng,
            self.scheduler.now(),
            self.state.rotation,
            self.config.turns(),
            self.config.spin_duration(),
        );
        log::debug!(
            "Spin started: {:.3} -> {:.3} rad over {:?}",
            plan.start_angle,
            plan.target_angle,
            plan.duration
        );
        self.state.spin = Some(plan);
        match self.scheduler.request_frame() {
            Some(handle) => {
                self.pending_frame = Some(handle);
                SpinStart::Started
            }
            None => {
                log::warn!("No animation frame available, finishing spin at once");
                if let Err(e) = self.finish_spin(plan) {
                    log::error!("Failed to draw finished spin: {}", e);
                }
                SpinStart::Resolved
            }
        }
    }

    /// Advance the animation for a fired frame.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<FrameStatus, WheelError> {
        if self.pending_frame != Some(handle) {
            log::trace!("Ignoring stale frame {:?}", handle);
            return Ok(FrameStatus::Stale);
        }
        self.pending_frame = None;

        let Some(plan) = self.state.spin else {
            return Ok(FrameStatus::Idle);
        };

        let now = self.scheduler.now();
        if !plan.is_complete(now) {
            if let Some(next) = self.scheduler.request_frame() {
                self.pending_frame = Some(next);
                self.state.rotation = plan.rotation_at(now);
                self.render()?;
                return Ok(FrameStatus::Animating {
                    progress: plan.progress(now),
                });
            }
            log::warn!("No animation frame available, finishing spin at once");
        }

        let index = self.finish_spin(plan)?;
        Ok(FrameStatus::Finished { index })
    }

    /// Snap to the target, report the winner and apply any queued roster.
    ///
    /// The winner is reported even if drawing fails.
    fn finish_spin(&mut self, plan: SpinPlan) -> Result<usize, WheelError> {
        self.state.rotation = plan.target_angle;
        self.state.spin = None;
        let rendered = self.render();

        let index = winner_index(self.state.rotation, self.roster.len()).unwrap_or_default();
        if let Some(name) = self.roster.get(index) {
            log::info!("Wheel stopped on {:?} (index {})", name, index);
            (self.on_spin_end)(name, index);
        }

        if let Some(roster) = self.queued_roster.take() {
            self.roster = roster;
            self.render()?;
        }
        rendered?;
        Ok(index)
    }

    /// Tear the wheel down. Equivalent to dropping it.
    pub fn destroy(self) {
        log::debug!("Wheel destroyed (spinning: {})", self.is_spinning());
    }

    fn render(&mut self) -> Result<(), WheelError> {
        let frame = self.frame();
        self.surface.present(&frame)?;
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.state.spin = None;
        if !self.released {
            self.surface.release();
            self.released = true;
        }
    }
}

impl<S: WheelSurface, F: FrameScheduler> Drop for Wheel<S, F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::surface::SurfaceResult;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TICK: Duration = Duration::from_millis(16);

    #[derive(Default)]
    struct CountingSurface {
        frames: Rc<RefCell<Vec<WheelFrame>>>,
        released: Rc<RefCell<bool>>,
    }

    impl WheelSurface for CountingSurface {
        fn present(&mut self, frame: &WheelFrame) -> SurfaceResult<()> {
            self.frames.borrow_mut().push(frame.clone());
            Ok(())
        }

        fn release(&mut self) {
            *self.released.borrow_mut() = true;
        }
    }

    type Results = Rc<RefCell<Vec<(String, usize)>>>;

    fn make_wheel(names: &[&str], seed: u64) -> (Wheel<CountingSurface, ManualScheduler>, ManualScheduler, Results) {
        let scheduler = ManualScheduler::new();
        let results: Results = Rc::default();
        let sink = results.clone();
        let wheel = Wheel::new(
            Roster::from(names),
            WheelConfig::default().with_seed(seed),
            CountingSurface::default(),
            scheduler.clone(),
            move |name: &str, index| sink.borrow_mut().push((name.to_string(), index)),
        )
        .unwrap();
        (wheel, scheduler, results)
    }

    /// Deliver frames until the wheel stops asking for them.
    fn run_to_end(wheel: &mut Wheel<CountingSurface, ManualScheduler>, scheduler: &ManualScheduler) -> Vec<FrameStatus> {
        let mut statuses = Vec::new();
        for _ in 0..10_000 {
            let fired = scheduler.advance(TICK);
            if fired.is_empty() {
                break;
            }
            for handle in fired {
                statuses.push(wheel.on_frame(handle).unwrap());
            }
        }
        statuses
    }

    #[test]
    fn test_initial_render() {
        let (wheel, _, _) = make_wheel(&["A", "B"], 1);
        assert_eq!(wheel.surface().frames.borrow().len(), 1);
    }

    #[test]
    fn test_single_name_resolves_synchronously() {
        let (mut wheel, scheduler, results) = make_wheel(&["Solo"], 1);
        assert_eq!(wheel.spin(), SpinStart::Resolved);
        assert!(!wheel.is_spinning());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(*results.borrow(), vec![("Solo".to_string(), 0)]);
    }

    #[test]
    fn test_empty_roster_spin_is_noop() {
        let (mut wheel, scheduler, results) = make_wheel(&[], 1);
        assert_eq!(wheel.spin(), SpinStart::Ignored);
        assert_eq!(scheduler.pending(), 0);
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_set_empty_roster_then_spin_is_noop() {
        let (mut wheel, scheduler, results) = make_wheel(&["A", "B", "C"], 1);
        wheel.set_roster(Roster::new()).unwrap();
        assert_eq!(wheel.spin(), SpinStart::Ignored);
        assert!(run_to_end(&mut wheel, &scheduler).is_empty());
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_spin_reports_valid_winner() {
        let names = ["Ana", "Ben", "Cy", "Dee", "Eve"];
        for seed in 0..20 {
            let (mut wheel, scheduler, results) = make_wheel(&names, seed);
            assert_eq!(wheel.spin(), SpinStart::Started);
            assert!(wheel.is_spinning());
            let statuses = run_to_end(&mut wheel, &scheduler);
            assert!(!wheel.is_spinning());

            let results = results.borrow();
            assert_eq!(results.len(), 1);
            let (label, index) = &results[0];
            assert!(*index < names.len());
            assert_eq!(names[*index], label);
            assert_eq!(statuses.last(), Some(&FrameStatus::Finished { index: *index }));
            assert_eq!(Some(*index), winner_index(wheel.rotation(), names.len()));
        }
    }

    #[test]
    fn test_spin_runs_for_configured_duration() {
        let (mut wheel, scheduler, _) = make_wheel(&["A", "B"], 3);
        wheel.spin();
        let statuses = run_to_end(&mut wheel, &scheduler);
        // 4.5s at 16ms per tick needs 282 ticks to reach progress 1.
        assert_eq!(statuses.len(), 282);
        assert!(matches!(statuses[0], FrameStatus::Animating { .. }));
    }

    #[test]
    fn test_rotation_lands_exactly_on_target() {
        let (mut wheel, scheduler, _) = make_wheel(&["A", "B", "C"], 9);
        wheel.spin();
        let target = wheel.state().spin.map(|p| p.target_angle).unwrap();
        run_to_end(&mut wheel, &scheduler);
        assert_eq!(wheel.rotation(), target);
    }

    #[test]
    fn test_rotation_never_decreases_across_spins() {
        let (mut wheel, scheduler, results) = make_wheel(&["A", "B", "C", "D"], 42);
        let mut last = wheel.rotation();
        for _ in 0..5 {
            wheel.spin();
            for _ in 0..400 {
                for handle in scheduler.advance(TICK) {
                    wheel.on_frame(handle).unwrap();
                }
                assert!(wheel.rotation() >= last);
                last = wheel.rotation();
            }
        }
        assert_eq!(results.borrow().len(), 5);
    }

    #[test]
    fn test_spin_while_spinning_is_ignored() {
        let (mut wheel, scheduler, results) = make_wheel(&["A", "B"], 5);
        assert_eq!(wheel.spin(), SpinStart::Started);
        let plan = wheel.state().spin;
        assert_eq!(wheel.spin(), SpinStart::Ignored);
        assert_eq!(wheel.state().spin, plan);
        assert_eq!(scheduler.pending(), 1);
        run_to_end(&mut wheel, &scheduler);
        assert_eq!(results.borrow().len(), 1);
    }

    #[test]
    fn test_destroy_mid_spin_suppresses_callback() {
        let (mut wheel, scheduler, results) = make_wheel(&["A", "B", "C"], 11);
        let released = wheel.surface().released.clone();
        wheel.spin();
        for handle in scheduler.advance(TICK) {
            wheel.on_frame(handle).unwrap();
        }
        wheel.destroy();

        assert!(*released.borrow());
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.advance(Duration::from_secs(10)).is_empty());
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_stale_frame_ignored() {
        let (mut wheel, scheduler, _) = make_wheel(&["A", "B"], 2);
        wheel.spin();
        let fired = scheduler.advance(TICK);
        wheel.on_frame(fired[0]).unwrap();
        assert_eq!(wheel.on_frame(fired[0]).unwrap(), FrameStatus::Stale);
    }

    #[test]
    fn test_roster_change_deferred_while_spinning() {
        let (mut wheel, scheduler, results) = make_wheel(&["A", "B", "C"], 8);
        wheel.spin();
        wheel.set_roster(Roster::from(&["X"][..])).unwrap();
        assert_eq!(wheel.roster().len(), 3);

        run_to_end(&mut wheel, &scheduler);
        let (label, index) = results.borrow()[0].clone();
        assert_eq!(["A", "B", "C"][index], label);
        assert_eq!(wheel.roster().as_slice(), &["X"]);
        let frames = wheel.surface().frames.borrow();
        assert_eq!(frames.last().map(|f| f.segments.len()), Some(1));
    }

    #[test]
    fn test_set_roster_rerenders_at_current_rotation() {
        let (mut wheel, scheduler, _) = make_wheel(&["A", "B"], 4);
        wheel.spin();
        run_to_end(&mut wheel, &scheduler);
        let rotation = wheel.rotation();
        wheel.set_roster(Roster::from(&["A", "B", "C"][..])).unwrap();
        let frames = wheel.surface().frames.borrow();
        let last = frames.last().unwrap();
        assert_eq!(last.rotation, rotation);
        assert_eq!(last.segments.len(), 3);
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config: WheelConfig = serde_json::from_str(r#"{"size": 300, "seed": 7}"#).unwrap();
        assert_eq!(config.size, 300);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.spin_duration(), DEFAULT_SPIN_DURATION);
    }

    #[test]
    fn test_negative_turn_range_rejected() {
        let config = WheelConfig {
            min_turns: -5.0,
            max_turns: -3.0,
            ..WheelConfig::default()
        };
        assert!(matches!(config.validate(), Err(WheelError::InvalidConfig(_))));
        assert_eq!(config.turns(), DEFAULT_TURNS);
        assert!(WheelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_turn_range_still_moves_forward() {
        let scheduler = ManualScheduler::new();
        let config = WheelConfig {
            min_turns: -5.0,
            max_turns: -3.0,
            ..WheelConfig::default().with_seed(3)
        };
        let mut wheel = Wheel::new(
            Roster::from(&["Ann", "Bo", "Cy"][..]),
            config,
            CountingSurface::default(),
            scheduler.clone(),
            |_: &str, _| {},
        )
        .unwrap();

        let mut last = wheel.rotation();
        for _ in 0..3 {
            wheel.spin();
            run_to_end(&mut wheel, &scheduler);
            assert!(wheel.rotation() >= last + 3.0 * std::f64::consts::TAU);
            last = wheel.rotation();
        }
    }

    /// A host that cannot schedule frames.
    struct NoFrames;

    impl FrameScheduler for NoFrames {
        fn now(&self) -> Duration {
            Duration::ZERO
        }

        fn request_frame(&mut self) -> Option<FrameHandle> {
            None
        }

        fn cancel_frame(&mut self, _handle: FrameHandle) {}
    }

    #[test]
    fn test_spin_without_frames_finishes_at_once() {
        let results: Results = Rc::default();
        let sink = results.clone();
        let mut wheel = Wheel::new(
            Roster::from(&["Ann", "Bo", "Cy"][..]),
            WheelConfig::default().with_seed(5),
            CountingSurface::default(),
            NoFrames,
            move |name: &str, index| sink.borrow_mut().push((name.to_string(), index)),
        )
        .unwrap();

        assert_eq!(wheel.spin(), SpinStart::Resolved);
        assert!(!wheel.is_spinning());
        assert_eq!(results.borrow().len(), 1);

        // The next spin is not blocked.
        assert_eq!(wheel.spin(), SpinStart::Resolved);
        assert_eq!(results.borrow().len(), 2);
        let (name, index) = results.borrow()[1].clone();
        assert_eq!(wheel.roster().get(index), Some(name.as_str()));
    }
}
