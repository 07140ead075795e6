//! Free-text row.

use super::{control, draw_row, label_width, row, text_at, text_width, GAP, PADDING};
use crate::input::{InputEvent, Key, MessageKind, MouseButton};
use crate::render::UIRenderer;
use crate::style::Palette;
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};
use crate::value::TextValue;

const FIELD_CHARS: usize = 16;

pub(crate) struct TextDrawable {
    id: ComponentId,
    palette: Palette,
    focused: bool,
}

impl TextDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self {
            id,
            palette,
            focused: false,
        }
    }

    fn field_width() -> f32 {
        text_width(&"m".repeat(FIELD_CHARS + 1)) + PADDING * 2.0
    }

    fn edit(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        match event.kind() {
            MessageKind::Char => {
                if let Some(c) = event.character() {
                    let _ = tree.modify::<TextValue, _>(self.id, |text| text.push(c));
                }
                event.stop();
            }
            MessageKind::KeyDown => {
                match event.key() {
                    Some(Key::Backspace) => {
                        let _ = tree.modify::<TextValue, _>(self.id, TextValue::backspace);
                    }
                    Some(Key::Enter | Key::Escape) => self.focused = false,
                    _ => {}
                }
                event.stop();
            }
            MessageKind::KeyUp => event.stop(),
            MessageKind::MouseDown => {
                let inside = row(tree, self.id).is_some_and(|rect| rect.contains(event.cursor()));
                if inside {
                    event.stop();
                } else {
                    self.focused = false;
                }
            }
            MessageKind::MouseUp | MessageKind::MouseMove => {}
        }
    }
}

impl Drawable for TextDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let Ok(value) = tree.typed::<TextValue>(self.id) else {
            return;
        };
        let Some(rect) = draw_row(out, &self.palette, tree, self.id, self.focused) else {
            return;
        };
        let field = control(rect, Self::field_width());
        let border = if self.focused {
            self.palette.warning
        } else {
            self.palette.border
        };
        out.outline(field, border);

        // Show the tail when the text overflows the field.
        let text = value.get();
        let shown: String = {
            let count = text.chars().count();
            text.chars().skip(count.saturating_sub(FIELD_CHARS)).collect()
        };
        let shown = if self.focused { shown + "_" } else { shown };
        text_at(out, &shown, field.x + PADDING, field, self.palette.text);
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        label_width(tree, self.id) + GAP + Self::field_width() + PADDING
    }

    fn on_input(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        if self.focused {
            self.edit(tree, event);
            return;
        }
        let Some(rect) = row(tree, self.id) else {
            return;
        };
        if event.is_button_down(MouseButton::Left) && rect.contains(event.cursor()) {
            self.focused = true;
            event.stop();
        }
    }

    fn dispose(&mut self) {
        self.focused = false;
    }
}

#[cfg(test)]
mod tests {
    use ember_shared::Vec2;

    use super::*;
    use crate::input::RawInput;
    use crate::theme::terminal::testing::{click, single};
    use crate::tree::Item;

    #[test]
    fn test_typing_edits_and_enter_unfocuses() {
        let (mut tree, id) = single(Item::new("tag", "Tag", TextValue::new("ab")));
        let mut drawable = TextDrawable::new(id, Palette::TERMINAL);

        // Not focused: characters pass through.
        let mut ignored = InputEvent::new(RawInput::character('x', Vec2::ZERO));
        drawable.on_input(&mut tree, &mut ignored);
        assert!(ignored.should_process());

        drawable.on_input(&mut tree, &mut click(10.0, 10.0));
        drawable.on_input(&mut tree, &mut InputEvent::new(RawInput::character('c', Vec2::ZERO)));
        drawable.on_input(
            &mut tree,
            &mut InputEvent::new(RawInput::key_down(Key::Backspace, Vec2::ZERO)),
        );
        drawable.on_input(&mut tree, &mut InputEvent::new(RawInput::character('d', Vec2::ZERO)));
        assert_eq!(tree.typed::<TextValue>(id).expect("text").get(), "abd");

        drawable.on_input(
            &mut tree,
            &mut InputEvent::new(RawInput::key_down(Key::Enter, Vec2::ZERO)),
        );
        assert!(!drawable.focused);
    }

    #[test]
    fn test_click_outside_unfocuses() {
        let (mut tree, id) = single(Item::new("tag", "Tag", TextValue::new("")));
        let mut drawable = TextDrawable::new(id, Palette::TERMINAL);
        drawable.on_input(&mut tree, &mut click(10.0, 10.0));

        let mut away = click(900.0, 900.0);
        drawable.on_input(&mut tree, &mut away);
        assert!(away.should_process());
        assert!(!drawable.focused);
    }
}
