use serde::{Deserialize, Serialize};

/// Run lifecycle: `MainMenu → Loading → Playing → GameOver → Loading → …`.
/// No physics ticks are processed outside `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    MainMenu,
    Loading,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseError {
    pub from: RunPhase,
    pub to: RunPhase,
}

impl std::fmt::Display for PhaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid phase transition: {:?} -> {:?}", self.from, self.to)
    }
}

impl std::error::Error for PhaseError {}

impl RunPhase {
    /// Enter `Loading` for a fresh run. Valid from the menu or after a game
    /// over; a restart while already loading is rejected.
    pub fn begin_loading(self) -> Result<RunPhase, PhaseError> {
        match self {
            RunPhase::MainMenu | RunPhase::GameOver => Ok(RunPhase::Loading),
            from => Err(PhaseError {
                from,
                to: RunPhase::Loading,
            }),
        }
    }

    /// Enter `Playing` once the initial world is in place.
    pub fn begin_playing(self) -> Result<RunPhase, PhaseError> {
        match self {
            RunPhase::Loading => Ok(RunPhase::Playing),
            from => Err(PhaseError {
                from,
                to: RunPhase::Playing,
            }),
        }
    }

    /// Terminal transition on player death or falling out of the world.
    pub fn end_run(self) -> Result<RunPhase, PhaseError> {
        match self {
            RunPhase::Playing => Ok(RunPhase::GameOver),
            from => Err(PhaseError {
                from,
                to: RunPhase::GameOver,
            }),
        }
    }

    pub fn is_simulating(self) -> bool {
        self == RunPhase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle() {
        let phase = RunPhase::MainMenu;
        let phase = phase.begin_loading().unwrap();
        let phase = phase.begin_playing().unwrap();
        assert!(phase.is_simulating());
        let phase = phase.end_run().unwrap();
        assert_eq!(phase, RunPhase::GameOver);
        // Restart re-enters Loading.
        assert_eq!(phase.begin_loading().unwrap(), RunPhase::Loading);
    }

    #[test]
    fn restart_while_loading_rejected() {
        let err = RunPhase::Loading.begin_loading().unwrap_err();
        assert_eq!(err.from, RunPhase::Loading);
        assert_eq!(err.to, RunPhase::Loading);
    }

    #[test]
    fn cannot_play_from_menu() {
        assert!(RunPhase::MainMenu.begin_playing().is_err());
    }

    #[test]
    fn cannot_die_outside_playing() {
        assert!(RunPhase::Loading.end_run().is_err());
        assert!(RunPhase::GameOver.end_run().is_err());
    }
}
