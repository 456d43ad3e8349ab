//! Input abstraction layer.
//!
//! Normalizes the host's mouse and keyboard events into one `InputEvent`
//! enum consumed by the editor. Coordinates are already in canvas space.

use poly_core::Point2d;

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown { x: f64, y: f64 },

    /// Pointer moved. `ctrl` is the state of the Control modifier.
    PointerMove { x: f64, y: f64, ctrl: bool },

    /// Primary button released.
    PointerUp { x: f64, y: f64 },

    /// Primary button double-clicked.
    DoubleClick { x: f64, y: f64 },

    /// Key released, e.g. `"q"` or `" "`.
    Key { key: String },
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key { key: key.into() }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point2d> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y }
            | Self::DoubleClick { x, y } => Some(Point2d::new(*x, *y)),
            Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_carry_position() {
        let ev = InputEvent::PointerMove {
            x: 3.0,
            y: 4.0,
            ctrl: true,
        };
        assert_eq!(ev.position(), Some(Point2d::new(3.0, 4.0)));
        assert_eq!(InputEvent::key("q").position(), None);
    }
}
