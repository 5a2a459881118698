//! Game phase transitions
//!
//! Menu -> Playing <-> Paused, Playing -> GameOver -> Playing | Menu.
//! Anything else is refused and leaves the state untouched.

use thiserror::Error;

use super::state::{GameEvent, GamePhase, GameState, ParticleTint};
use crate::tuning::Tuning;

/// A transition that is not valid from the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} while {from:?}")]
pub struct PhaseError {
    pub action: &'static str,
    pub from: GamePhase,
}

fn require(
    state: &GameState,
    action: &'static str,
    allowed: &[GamePhase],
) -> Result<(), PhaseError> {
    if allowed.contains(&state.phase) {
        Ok(())
    } else {
        Err(PhaseError {
            action,
            from: state.phase,
        })
    }
}

/// Start a fresh run from the menu or the crash screen
pub fn start(state: &mut GameState, tuning: &Tuning) -> Result<(), PhaseError> {
    require(state, "start", &[GamePhase::Menu, GamePhase::GameOver])?;
    state.reset_run(tuning);
    state.set_phase(GamePhase::Playing);
    state.events.push(GameEvent::ScoreChanged(0));
    Ok(())
}

/// Freeze the simulation under the pause overlay
pub fn pause(state: &mut GameState) -> Result<(), PhaseError> {
    require(state, "pause", &[GamePhase::Playing])?;
    state.set_phase(GamePhase::Paused);
    Ok(())
}

/// Continue a paused run
pub fn resume(state: &mut GameState) -> Result<(), PhaseError> {
    require(state, "resume", &[GamePhase::Paused])?;
    state.set_phase(GamePhase::Playing);
    Ok(())
}

/// Leave the crash screen for the title screen (no reset; the next start
/// resets)
pub fn main_menu(state: &mut GameState) -> Result<(), PhaseError> {
    require(state, "return to menu", &[GamePhase::GameOver])?;
    state.set_phase(GamePhase::Menu);
    Ok(())
}

/// End the run: capture the final score and blow up the player's car
pub fn crash(state: &mut GameState, tuning: &Tuning) -> Result<(), PhaseError> {
    require(state, "crash", &[GamePhase::Playing])?;
    let final_score = state.display_score();
    state.final_score = final_score;
    state.set_phase(GamePhase::GameOver);
    state.events.push(GameEvent::Crashed { final_score });
    let center = state.player.rect.center();
    state.burst(center, ParticleTint::Player, tuning);
    log::info!("Crashed with score {}", final_score);
    Ok(())
}
