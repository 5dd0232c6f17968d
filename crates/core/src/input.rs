//! Keyboard binding table
//!
//! Maps key presses captured while the annotation surface has focus onto
//! editing commands. Shortcuts and toolbar buttons resolve to the same
//! [`Command`] values, so there is a single logic path for every state
//! transition.

use crate::session::Command;

/// Keys the annotation surface reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Z,
    Y,
}

/// Modifier state at the time of the key press
///
/// `command` is Ctrl on Linux/Windows and Cmd on macOS; the surface is
/// expected to fold the platform difference before calling in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub command: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        command: false,
        shift: false,
    };
    pub const COMMAND: Modifiers = Modifiers {
        command: true,
        shift: false,
    };
    pub const COMMAND_SHIFT: Modifiers = Modifiers {
        command: true,
        shift: true,
    };
}

/// Resolve a key press to a command, if it is bound
///
/// Bindings: Delete/Backspace remove the selection, mod+Z undoes,
/// mod+Shift+Z and mod+Y redo. Everything else is unbound.
pub fn command_for_key(key: Key, modifiers: Modifiers) -> Option<Command> {
    match (key, modifiers.command, modifiers.shift) {
        (Key::Delete | Key::Backspace, false, _) => Some(Command::DeleteSelected),
        (Key::Z, true, false) => Some(Command::Undo),
        (Key::Z, true, true) => Some(Command::Redo),
        (Key::Y, true, _) => Some(Command::Redo),
        _ => None,
    }
}
