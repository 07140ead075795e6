//! Input events delivered by the host.
//!
//! The host hands over one [`RawInput`] per window message. The registry
//! wraps it once into an [`InputEvent`], whose `process` flag any component
//! along the routing path may clear to stop propagation.

#![allow(missing_docs)]

use ember_shared::Vec2;
use serde::{Deserialize, Serialize};

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Shift key.
    Shift,
    /// Control key.
    Control,
    /// Alt key.
    Alt,
    /// Caps lock.
    CapsLock,
    /// Space bar.
    Space,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Alphabetic keys.
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    /// More alphabetic keys.
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    /// Number keys.
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    /// Function keys.
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
}

impl Key {
    /// Short label for drawing a binding.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Num0 => "0".to_string(),
            Self::Num1 => "1".to_string(),
            Self::Num2 => "2".to_string(),
            Self::Num3 => "3".to_string(),
            Self::Num4 => "4".to_string(),
            Self::Num5 => "5".to_string(),
            Self::Num6 => "6".to_string(),
            Self::Num7 => "7".to_string(),
            Self::Num8 => "8".to_string(),
            Self::Num9 => "9".to_string(),
            other => format!("{other:?}"),
        }
    }
}

/// Kind of window message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    MouseMove,
    /// Translated character input.
    Char,
}

/// One window message as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawInput {
    /// Cursor position at the time of the message.
    pub cursor: Vec2,
    pub kind: MessageKind,
    /// Set for mouse button messages.
    pub button: Option<MouseButton>,
    /// Set for key messages.
    pub key: Option<Key>,
    /// Set for character messages.
    pub character: Option<char>,
}

impl RawInput {
    fn new(kind: MessageKind, cursor: Vec2) -> Self {
        Self {
            cursor,
            kind,
            button: None,
            key: None,
            character: None,
        }
    }

    #[must_use]
    pub fn mouse_down(button: MouseButton, cursor: Vec2) -> Self {
        Self {
            button: Some(button),
            ..Self::new(MessageKind::MouseDown, cursor)
        }
    }

    #[must_use]
    pub fn mouse_up(button: MouseButton, cursor: Vec2) -> Self {
        Self {
            button: Some(button),
            ..Self::new(MessageKind::MouseUp, cursor)
        }
    }

    #[must_use]
    pub fn mouse_move(cursor: Vec2) -> Self {
        Self::new(MessageKind::MouseMove, cursor)
    }

    #[must_use]
    pub fn key_down(key: Key, cursor: Vec2) -> Self {
        Self {
            key: Some(key),
            ..Self::new(MessageKind::KeyDown, cursor)
        }
    }

    #[must_use]
    pub fn key_up(key: Key, cursor: Vec2) -> Self {
        Self {
            key: Some(key),
            ..Self::new(MessageKind::KeyUp, cursor)
        }
    }

    #[must_use]
    pub fn character(character: char, cursor: Vec2) -> Self {
        Self {
            character: Some(character),
            ..Self::new(MessageKind::Char, cursor)
        }
    }
}

/// A routed input event.
#[derive(Debug, Clone, Copy)]
pub struct InputEvent {
    raw: RawInput,
    process: bool,
}

impl InputEvent {
    /// Wraps a raw message; propagation starts enabled.
    #[must_use]
    pub fn new(raw: RawInput) -> Self {
        Self { raw, process: true }
    }

    #[must_use]
    pub fn raw(&self) -> &RawInput {
        &self.raw
    }

    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.raw.cursor
    }

    #[must_use]
    pub fn kind(&self) -> MessageKind {
        self.raw.kind
    }

    #[must_use]
    pub fn key(&self) -> Option<Key> {
        self.raw.key
    }

    #[must_use]
    pub fn character(&self) -> Option<char> {
        self.raw.character
    }

    /// True for a press of `button`.
    #[must_use]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.raw.kind == MessageKind::MouseDown && self.raw.button == Some(button)
    }

    /// True for a release of `button`.
    #[must_use]
    pub fn is_button_up(&self, button: MouseButton) -> bool {
        self.raw.kind == MessageKind::MouseUp && self.raw.button == Some(button)
    }

    /// True if the event was a left-button press.
    #[must_use]
    pub fn is_left_down(&self) -> bool {
        self.is_button_down(MouseButton::Left)
    }

    /// Stops further propagation of this event.
    pub fn stop(&mut self) {
        self.process = false;
    }

    /// False once any component has stopped the event.
    #[must_use]
    pub fn should_process(&self) -> bool {
        self.process
    }
}
