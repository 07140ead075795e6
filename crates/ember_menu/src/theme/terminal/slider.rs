//! Slider and slider-with-switch rows.
//!
//! ```text
//! Idle ──left-down in track──▶ Dragging ──left-up anywhere──▶ Idle
//!                                 │  ▲
//!                                 └──┘ mouse-move: recompute, fire on change
//! ```

use ember_shared::Vec2;

use super::{
    control, draw_row, label_width, pressed_in, ratio_at, row, text_at, text_width, GAP, PADDING,
};
use crate::input::{InputEvent, MessageKind, MouseButton};
use crate::layout::Rect;
use crate::render::UIRenderer;
use crate::style::Palette;
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};
use crate::value::{SliderButtonValue, SliderValue, Value};

const TRACK: f32 = 110.0;
const TRACK_THICKNESS: f32 = 6.0;
const BUTTON: f32 = 14.0;
/// Room for the numeric readout.
const READOUT_CHARS: &str = "-0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging,
}

pub(crate) struct SliderDrawable {
    id: ComponentId,
    palette: Palette,
    state: DragState,
}

/// Regions of one slider row.
struct Regions {
    /// Full-height hit area of the track.
    track: Rect,
    /// Drawn bar.
    bar: Rect,
    readout_x: f32,
    button: Option<Rect>,
}

impl SliderDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self {
            id,
            palette,
            state: DragState::Idle,
        }
    }

    /// Slider part plus the switch state, if this is a slider-button.
    fn read(tree: &MenuTree, id: ComponentId) -> Option<(SliderValue, Option<bool>)> {
        match tree.item_value(id)? {
            Value::Slider(slider) => Some((*slider, None)),
            Value::SliderButton(value) => Some((value.slider, Some(value.enabled()))),
            _ => None,
        }
    }

    fn regions(rect: Rect, with_button: bool) -> Regions {
        let button = with_button.then(|| control(rect, BUTTON));
        let right = button.map_or(rect.right() - PADDING, |b| b.x - GAP);
        let readout = text_width(READOUT_CHARS);
        let track_x = right - readout - PADDING - TRACK;
        let track = Rect::new(track_x, rect.y, TRACK, rect.height);
        let bar = Rect::new(
            track_x,
            rect.y + (rect.height - TRACK_THICKNESS) / 2.0,
            TRACK,
            TRACK_THICKNESS,
        );
        Regions {
            track,
            bar,
            readout_x: right - readout,
            button,
        }
    }

    /// Sets the slider from the cursor. True if the discretized value moved.
    fn drag_to(&self, tree: &mut MenuTree, track: Rect, cursor: Vec2) -> bool {
        let Some((slider, button)) = Self::read(tree, self.id) else {
            return false;
        };
        let target = slider.value_at(ratio_at(track, cursor));
        let changed = if button.is_some() {
            tree.modify::<SliderButtonValue, _>(self.id, |v| v.slider.set(target))
        } else {
            tree.modify::<SliderValue, _>(self.id, |v| v.set(target))
        };
        changed.unwrap_or(false)
    }
}

impl Drawable for SliderDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let Some((slider, button)) = Self::read(tree, self.id) else {
            return;
        };
        let active = self.state == DragState::Dragging;
        let Some(rect) = draw_row(out, &self.palette, tree, self.id, active) else {
            return;
        };
        let regions = Self::regions(rect, button.is_some());

        let muted = button == Some(false);
        let accent = if muted {
            self.palette.text_muted
        } else {
            self.palette.primary
        };
        out.fill(regions.bar, self.palette.border);
        let mut filled = regions.bar;
        filled.width *= slider.ratio();
        out.fill(filled, accent);
        text_at(
            out,
            &slider.get().to_string(),
            regions.readout_x,
            rect,
            self.palette.text,
        );

        if let (Some(switch), Some(enabled)) = (regions.button, button) {
            out.outline(switch, self.palette.secondary);
            if enabled {
                out.fill(switch.shrink(3.0), self.palette.secondary);
            }
        }
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        let button = match Self::read(tree, self.id) {
            Some((_, Some(_))) => BUTTON + GAP,
            _ => 0.0,
        };
        label_width(tree, self.id) + GAP + TRACK + PADDING + text_width(READOUT_CHARS) + button + PADDING
    }

    fn on_input(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        let Some(rect) = row(tree, self.id) else {
            return;
        };
        let Some((_, button)) = Self::read(tree, self.id) else {
            return;
        };
        let regions = Self::regions(rect, button.is_some());

        match self.state {
            DragState::Idle => {
                if let Some(button_rect) = regions.button {
                    if pressed_in(event, button_rect) {
                        let _ = tree.modify::<SliderButtonValue, _>(self.id, |v| {
                            let enabled = v.enabled();
                            v.set_enabled(!enabled)
                        });
                        event.stop();
                        return;
                    }
                }
                if pressed_in(event, regions.track) {
                    self.state = DragState::Dragging;
                    self.drag_to(tree, regions.track, event.cursor());
                    event.stop();
                }
            }
            DragState::Dragging => {
                if event.is_button_up(MouseButton::Left) {
                    self.state = DragState::Idle;
                    event.stop();
                } else if event.kind() == MessageKind::MouseMove {
                    self.drag_to(tree, regions.track, event.cursor());
                    event.stop();
                }
            }
        }
    }

    fn dispose(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::theme::terminal::testing::{click, hover, release, single};
    use crate::tree::Item;

    fn track_of(tree: &MenuTree, id: ComponentId, with_button: bool) -> Rect {
        let rect = row(tree, id).expect("row");
        SliderDrawable::regions(rect, with_button).track
    }

    #[test]
    fn test_drag_clamps_and_fires_only_on_change() {
        let (mut tree, id) = single(Item::new("fov", "FOV", SliderValue::new(50, 0, 100)));
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        tree.subscribe(id, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("subscribe");

        let track = track_of(&tree, id, false);
        let mut drawable = SliderDrawable::new(id, Palette::TERMINAL);

        // Press at the left end.
        let mut event = click(track.x, 10.0);
        drawable.on_input(&mut tree, &mut event);
        assert!(!event.should_process());
        assert_eq!(tree.typed::<SliderValue>(id).expect("slider").get(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Same spot again: no change, no notification.
        drawable.on_input(&mut tree, &mut hover(track.x, 10.0));
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Way past the right end clamps to max.
        drawable.on_input(&mut tree, &mut hover(track.right() + 500.0, 10.0));
        assert_eq!(tree.typed::<SliderValue>(id).expect("slider").get(), 100);
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        // Release anywhere ends the drag.
        let mut up = release(900.0, 900.0);
        drawable.on_input(&mut tree, &mut up);
        assert!(!up.should_process());
        drawable.on_input(&mut tree, &mut hover(track.x, 10.0));
        assert_eq!(tree.typed::<SliderValue>(id).expect("slider").get(), 100);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let (mut tree, id) = single(Item::new("fov", "FOV", SliderValue::new(50, 0, 100)));
        let track = track_of(&tree, id, false);
        let mut drawable = SliderDrawable::new(id, Palette::TERMINAL);

        let mut event = hover(track.x, 10.0);
        drawable.on_input(&mut tree, &mut event);
        assert!(event.should_process());
        assert_eq!(tree.typed::<SliderValue>(id).expect("slider").get(), 50);
    }

    #[test]
    fn test_button_region_flips_switch_only() {
        let (mut tree, id) = single(Item::new(
            "smooth",
            "Smooth",
            SliderButtonValue::new(3, 0, 10, false),
        ));
        let rect = row(&tree, id).expect("row");
        let button = SliderDrawable::regions(rect, true).button.expect("button");
        let mut drawable = SliderDrawable::new(id, Palette::TERMINAL);

        drawable.on_input(&mut tree, &mut click(button.x + 2.0, button.y + 2.0));
        let value = tree.typed::<SliderButtonValue>(id).expect("slider button");
        assert!(value.enabled());
        assert_eq!(value.slider.get(), 3);
    }
}
