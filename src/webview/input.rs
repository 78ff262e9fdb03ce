//! OS-level keyboard simulation.
//!
//! The confirmation key press happens outside the script sandbox because
//! synthetic in-script key events are not treated as user-trusted by the
//! browser engine.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input failed: {0}")]
    Failed(String),
}

/// Press Enter as a hardware-level key event.
pub fn press_enter() -> Result<(), InputError> {
    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| InputError::Failed(e.to_string()))?;
    enigo
        .key(Key::Return, Direction::Click)
        .map_err(|e| InputError::Failed(e.to_string()))
}
