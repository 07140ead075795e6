//! On/off checkbox row.

use super::{control, draw_row, label_width, pressed_in, row, text_at, GAP, PADDING};
use crate::input::InputEvent;
use crate::render::UIRenderer;
use crate::style::Palette;
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};
use crate::value::BoolValue;

const BOX: f32 = 14.0;

pub(crate) struct ToggleDrawable {
    id: ComponentId,
    palette: Palette,
}

impl ToggleDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self { id, palette }
    }
}

impl Drawable for ToggleDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let Ok(value) = tree.typed::<BoolValue>(self.id) else {
            return;
        };
        let on = value.get();
        let Some(rect) = draw_row(out, &self.palette, tree, self.id, false) else {
            return;
        };
        let check = control(rect, BOX);
        out.outline(check, self.palette.primary);
        if on {
            out.fill(check.shrink(3.0), self.palette.primary);
        }
        let state = if on { "on" } else { "off" };
        text_at(out, state, check.x - GAP * 2.0, rect, self.palette.text_muted);
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        label_width(tree, self.id) + GAP * 3.0 + BOX + PADDING
    }

    fn on_input(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        let Some(rect) = row(tree, self.id) else {
            return;
        };
        if pressed_in(event, rect) {
            // Cannot fail: the drawable is only built for bool items.
            let _ = tree.modify::<BoolValue, _>(self.id, BoolValue::toggle);
            event.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::terminal::testing::{click, single};
    use crate::tree::Item;

    #[test]
    fn test_click_flips_and_stops() {
        let (mut tree, id) = single(Item::new("flag", "Flag", BoolValue::new(false)));
        let mut drawable = ToggleDrawable::new(id, Palette::TERMINAL);

        let mut event = click(50.0, 10.0);
        drawable.on_input(&mut tree, &mut event);
        assert!(!event.should_process());
        assert!(tree.typed::<BoolValue>(id).expect("bool").get());

        let mut miss = click(50.0, 100.0);
        drawable.on_input(&mut tree, &mut miss);
        assert!(miss.should_process());
        assert!(tree.typed::<BoolValue>(id).expect("bool").get());
    }
}
