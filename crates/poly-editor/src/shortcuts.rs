//! Keyboard shortcut mapping.
//!
//! Maps released keys to semantic `ShortcutAction`s. Bindings sit on the
//! left hand: Q W E on the top row, A S D below, Space for the sample.

use crate::mode::Mode;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SwitchMode(Mode),
    /// Add the preset sample polygon to the collection.
    SpawnSample,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key to an action. `key` is matched case-insensitively;
    /// Space may be given as `" "` or `"Space"`. Returns `None` if the key
    /// has no binding.
    pub fn resolve(key: &str) -> Option<ShortcutAction> {
        let action = match key {
            "q" | "Q" => ShortcutAction::SwitchMode(Mode::Free),
            "w" | "W" => ShortcutAction::SwitchMode(Mode::CreateVertex),
            "e" | "E" => ShortcutAction::SwitchMode(Mode::CreatePolygon),
            "a" | "A" => ShortcutAction::SwitchMode(Mode::SetPerpendicular),
            "s" | "S" => ShortcutAction::SwitchMode(Mode::SetEqualLength),
            "d" | "D" => ShortcutAction::SwitchMode(Mode::Delete),
            " " | "Space" | "space" => ShortcutAction::SpawnSample,
            _ => return None,
        };
        Some(action)
    }
}
