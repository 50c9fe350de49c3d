use plumbfield_input::Action;
use plumbfield_kernel::Simulation;

use crate::{
    DriverState, Outcome, Progress, ResultStore, SessionConfig, SessionError, SimulationDriver,
    SoundSystem,
};

/// Track name that means "no music".
pub const NO_MUSIC: &str = "none";

/// Where a finished session hands control next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    /// Show the result screen for this outcome.
    ShowResult(Outcome),
    /// Go straight back to wherever the level was started from.
    Return(Outcome),
}

impl SessionExit {
    /// The finished run, whichever way the session exits.
    pub fn outcome(&self) -> &Outcome {
        match self {
            SessionExit::ShowResult(o) | SessionExit::Return(o) => o,
        }
    }
}

/// Runs one level: forwards frames and player actions to the driver, records
/// the result once and manages music around the session.
pub struct SessionController<W, R, S> {
    driver: SimulationDriver<W>,
    /// Initial world, cloned on restart.
    pristine: W,
    music: String,
    show_result_screen: bool,
    store: R,
    sound: S,
    persisted: bool,
}

impl<W, R, S> SessionController<W, R, S>
where
    W: Simulation + Clone,
    R: ResultStore,
    S: SoundSystem,
{
    /// Fails if `config` does not validate.
    pub fn new(
        world: W,
        music: impl Into<String>,
        config: &SessionConfig,
        store: R,
        sound: S,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            driver: SimulationDriver::new(world.clone(), config),
            pristine: world,
            music: music.into(),
            show_result_screen: config.show_result_screen,
            store,
            sound,
            persisted: false,
        })
    }

    /// Start the level music, or silence for `NO_MUSIC`.
    pub fn on_startup(&mut self) {
        tracing::info!(level = self.driver.world().level_id(), music = %self.music, "session started");
        if self.music == NO_MUSIC {
            self.sound.stop_music();
        } else {
            self.sound.play_music(&self.music);
        }
    }

    /// Stop the music when leaving the session.
    pub fn on_shutdown(&mut self) {
        tracing::info!(level = self.driver.world().level_id(), "session stopped");
        self.sound.stop_music();
    }

    /// Deliver one frame. Returns where to go next once the level is over.
    ///
    /// The outcome goes to the result store on the first finished frame only.
    pub fn update(&mut self, frame_delta: f32) -> Result<Option<SessionExit>, SessionError> {
        let outcome = match self.driver.advance(frame_delta)? {
            Progress::Continuing { .. } => return Ok(None),
            Progress::Finished(outcome) => outcome,
        };
        if !self.persisted {
            self.store.persist(&outcome)?;
            self.persisted = true;
        }
        Ok(Some(if self.show_result_screen {
            SessionExit::ShowResult(outcome)
        } else {
            SessionExit::Return(outcome)
        }))
    }

    /// Apply one player action.
    pub fn handle(&mut self, action: Action) {
        tracing::debug!(%action, "session action");
        match action {
            Action::TogglePause => self.driver.toggle_pause(),
            Action::SetPause(paused) => self.driver.set_paused(paused),
            Action::ToggleFastForward => self.driver.toggle_fast_forward(),
            Action::SetFastForward(on) => self.driver.set_fast_forward(on),
            Action::Abort => self.driver.request_finish(),
            Action::Restart => self.restart(),
            Action::Armageddon => self.driver.armageddon(),
        }
    }

    /// Start the level over from its initial world. Nothing is recorded for
    /// the abandoned run.
    pub fn restart(&mut self) {
        tracing::info!(level = self.pristine.level_id(), "session restarted");
        self.driver.reset(self.pristine.clone());
        self.persisted = false;
    }

    /// Lifecycle state of the underlying driver.
    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    pub fn driver(&self) -> &SimulationDriver<W> {
        &self.driver
    }

    /// The world currently being played.
    pub fn world(&self) -> &W {
        self.driver.world()
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }
}
