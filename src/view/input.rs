//! Host-neutral pointer and keyboard input.
//!
//! Positions are in container (screen) pixels; editors convert them through their
//! [`ViewTransform`](crate::ViewTransform) before touching model geometry.

use crate::foundation::core::Point;

/// Pointer button that triggered an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary (usually left) button.
    #[default]
    Primary,
    /// Middle button or wheel click.
    Middle,
    /// Secondary (usually right) button.
    Secondary,
}

/// Modifier keys held during an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Alt / Option.
    pub alt: bool,
    /// Shift.
    pub shift: bool,
    /// Ctrl / Cmd.
    pub command: bool,
}

/// A pointer-down/move/up event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position relative to the editor's container, in screen pixels.
    pub pos: Point,
    /// Button responsible for the event.
    pub button: PointerButton,
    /// Modifier state.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary-button event with no modifiers.
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    /// Same event with Alt held.
    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    /// Same event with a different button.
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Alt-drag, middle-drag and right-drag pan the view instead of editing.
    pub fn starts_pan(&self) -> bool {
        self.modifiers.alt || matches!(self.button, PointerButton::Middle | PointerButton::Secondary)
    }
}

/// Keys the editors react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Cancel the in-progress lasso.
    Escape,
    /// Undo shortcut.
    Undo,
    /// Redo shortcut.
    Redo,
}
