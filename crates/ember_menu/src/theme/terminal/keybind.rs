//! Key binding row.
//!
//! Left-click on the binding arms capture and the next released key becomes
//! the binding (Escape cancels). Right-click flips between toggle and press
//! mode. Reacting to the bound key itself happens tree-wide in
//! [`MenuTree::process_hotkeys`], so bindings work with the overlay hidden.

use super::{control, draw_row, label_width, pressed_in, row, text_at, text_width, GAP, PADDING};
use crate::input::{InputEvent, Key, MessageKind, MouseButton};
use crate::render::UIRenderer;
use crate::style::Palette;
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};
use crate::value::{KeyBind, KeyBindMode, KeyBindValue};

const CAPTURE_PROMPT: &str = "[ ... ]";
/// Widest label a binding can produce, e.g. `[CapsLock|P]`.
const WIDEST: &str = "[CapsLock|P]";

pub(crate) struct KeyBindDrawable {
    id: ComponentId,
    palette: Palette,
    capturing: bool,
}

fn describe(bind: KeyBind) -> String {
    let mode = match bind.mode {
        KeyBindMode::Toggle => 'T',
        KeyBindMode::Press => 'P',
    };
    format!("[{}|{mode}]", bind.key.label())
}

impl KeyBindDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self {
            id,
            palette,
            capturing: false,
        }
    }

    fn capture(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        match event.kind() {
            MessageKind::KeyDown | MessageKind::Char => event.stop(),
            MessageKind::KeyUp => {
                if let Some(key) = event.key() {
                    if key != Key::Escape {
                        let _ = tree.modify::<KeyBindValue, _>(self.id, |v| v.set_key(key));
                    }
                    self.capturing = false;
                }
                event.stop();
            }
            MessageKind::MouseDown => {
                self.capturing = false;
                if row(tree, self.id).is_some_and(|rect| rect.contains(event.cursor())) {
                    event.stop();
                }
            }
            MessageKind::MouseUp | MessageKind::MouseMove => {}
        }
    }
}

impl Drawable for KeyBindDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let Ok(value) = tree.typed::<KeyBindValue>(self.id) else {
            return;
        };
        let bind = value.get();
        let Some(rect) = draw_row(out, &self.palette, tree, self.id, self.capturing) else {
            return;
        };
        let (text, color) = if self.capturing {
            (CAPTURE_PROMPT.to_string(), self.palette.warning)
        } else if bind.active {
            (describe(bind), self.palette.primary)
        } else {
            (describe(bind), self.palette.text_muted)
        };
        let slot = control(rect, text_width(WIDEST));
        text_at(out, &text, slot.right() - text_width(&text), rect, color);
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        label_width(tree, self.id) + GAP + text_width(WIDEST) + PADDING
    }

    fn on_input(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        if self.capturing {
            self.capture(tree, event);
            return;
        }
        let Some(rect) = row(tree, self.id) else {
            return;
        };
        if pressed_in(event, rect) {
            self.capturing = true;
            event.stop();
        } else if event.is_button_down(MouseButton::Right) && rect.contains(event.cursor()) {
            let _ = tree.modify::<KeyBindValue, _>(self.id, |v| {
                let next = match v.get().mode {
                    KeyBindMode::Toggle => KeyBindMode::Press,
                    KeyBindMode::Press => KeyBindMode::Toggle,
                };
                v.set_mode(next)
            });
            event.stop();
        }
    }

    fn dispose(&mut self) {
        self.capturing = false;
    }
}

#[cfg(test)]
mod tests {
    use ember_shared::Vec2;

    use super::*;
    use crate::input::RawInput;
    use crate::theme::terminal::testing::{click, single};
    use crate::tree::Item;

    fn key(kind: MessageKind, key: Key) -> InputEvent {
        let raw = match kind {
            MessageKind::KeyDown => RawInput::key_down(key, Vec2::ZERO),
            _ => RawInput::key_up(key, Vec2::ZERO),
        };
        InputEvent::new(raw)
    }

    #[test]
    fn test_capture_rebinds_on_release() {
        let (mut tree, id) = single(Item::new("hold", "Hold", KeyBindValue::default()));
        let mut drawable = KeyBindDrawable::new(id, Palette::TERMINAL);

        drawable.on_input(&mut tree, &mut click(10.0, 10.0));
        assert!(drawable.capturing);

        let mut down = key(MessageKind::KeyDown, Key::F6);
        drawable.on_input(&mut tree, &mut down);
        assert!(!down.should_process());
        assert_eq!(tree.typed::<KeyBindValue>(id).expect("bind").get().key, Key::Space);

        drawable.on_input(&mut tree, &mut key(MessageKind::KeyUp, Key::F6));
        assert!(!drawable.capturing);
        assert_eq!(tree.typed::<KeyBindValue>(id).expect("bind").get().key, Key::F6);
    }

    #[test]
    fn test_escape_cancels_capture() {
        let (mut tree, id) = single(Item::new("hold", "Hold", KeyBindValue::default()));
        let mut drawable = KeyBindDrawable::new(id, Palette::TERMINAL);

        drawable.on_input(&mut tree, &mut click(10.0, 10.0));
        drawable.on_input(&mut tree, &mut key(MessageKind::KeyUp, Key::Escape));
        assert!(!drawable.capturing);
        assert_eq!(tree.typed::<KeyBindValue>(id).expect("bind").get().key, Key::Space);
    }

    #[test]
    fn test_right_click_flips_mode() {
        let (mut tree, id) = single(Item::new("hold", "Hold", KeyBindValue::default()));
        let mut drawable = KeyBindDrawable::new(id, Palette::TERMINAL);

        let mut event = InputEvent::new(RawInput::mouse_down(
            MouseButton::Right,
            Vec2::new(10.0, 10.0),
        ));
        drawable.on_input(&mut tree, &mut event);
        assert!(!event.should_process());
        assert_eq!(
            tree.typed::<KeyBindValue>(id).expect("bind").get().mode,
            KeyBindMode::Toggle
        );
    }
}
