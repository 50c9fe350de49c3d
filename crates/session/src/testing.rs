use plumbfield_kernel::{Simulation, Tally, WorldStepFailure};

/// A world whose behaviour is fixed up front: it completes or fails at a
/// chosen tick and reports a chosen tally.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWorld {
    pub ticks: u64,
    pub complete_at: Option<u64>,
    pub fail_at: Option<u64>,
    pub final_tally: Tally,
    pub finish_requested: bool,
    pub armageddon: bool,
}

impl ScriptedWorld {
    pub fn endless() -> Self {
        Self::default()
    }

    pub fn completing_at(tick: u64, saved: u32, killed: u32, total: u32, required: u32) -> Self {
        Self {
            complete_at: Some(tick),
            final_tally: Tally {
                saved,
                killed,
                total,
                required,
                time_limit: None,
                ticks: 0,
            },
            ..Self::default()
        }
    }

    pub fn failing_at(tick: u64) -> Self {
        Self {
            fail_at: Some(tick),
            ..Self::default()
        }
    }
}

impl Simulation for ScriptedWorld {
    fn step(&mut self) -> Result<(), WorldStepFailure> {
        self.ticks += 1;
        if self.fail_at == Some(self.ticks) {
            return Err(WorldStepFailure::InvariantViolated {
                tick: self.ticks,
                detail: "scripted".into(),
            });
        }
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.finish_requested || self.complete_at.is_some_and(|t| self.ticks >= t)
    }

    fn tally(&self) -> Tally {
        Tally {
            ticks: self.ticks,
            ..self.final_tally.clone()
        }
    }

    fn level_id(&self) -> &str {
        "scripted"
    }

    fn request_finish(&mut self) {
        self.finish_requested = true;
    }

    fn armageddon(&mut self) {
        self.armageddon = true;
    }
}
