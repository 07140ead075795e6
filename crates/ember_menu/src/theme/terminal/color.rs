//! Color swatch row with a channel editor popup.
//!
//! Clicking the row opens four channel sliders (r, g, b, a) below it. Each
//! channel drags like a slider, quantized to 8 bits. A click outside the
//! popup closes it.

use super::{
    control, draw_row, label_width, pressed_in, ratio_at, row, GAP, PADDING, ROW_HEIGHT,
    TOLERANCE,
};
use crate::input::{InputEvent, MessageKind, MouseButton};
use crate::layout::Rect;
use crate::render::{RenderCommand, UIRenderer};
use crate::style::{Color, Palette};
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};
use crate::value::ColorValue;

const SWATCH: f32 = 36.0;
const PANEL_WIDTH: f32 = 200.0;
const CHANNEL_LABEL: f32 = 18.0;
const CHANNEL_READOUT: f32 = 32.0;
const CHANNELS: [(&str, Color); 4] = [
    ("r", Color::rgba(1.0, 0.3, 0.3, 1.0)),
    ("g", Color::rgba(0.3, 1.0, 0.3, 1.0)),
    ("b", Color::rgba(0.3, 0.5, 1.0, 1.0)),
    ("a", Color::rgba(0.8, 0.8, 0.8, 1.0)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerState {
    Closed,
    Open { dragging: Option<usize> },
}

pub(crate) struct ColorDrawable {
    id: ComponentId,
    palette: Palette,
    state: PickerState,
}

fn quantize(ratio: f32) -> f32 {
    (ratio.clamp(0.0, 1.0) * 255.0).round() / 255.0
}

impl ColorDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self {
            id,
            palette,
            state: PickerState::Closed,
        }
    }

    fn panel(rect: Rect) -> Rect {
        Rect::new(
            rect.x,
            rect.bottom(),
            rect.width.max(PANEL_WIDTH),
            ROW_HEIGHT * 4.0,
        )
    }

    /// Full-height hit area of a channel's track.
    fn track(panel: Rect, channel: usize) -> Rect {
        #[allow(clippy::cast_precision_loss)]
        let y = panel.y + channel as f32 * ROW_HEIGHT;
        let x = panel.x + PADDING + CHANNEL_LABEL;
        Rect::new(
            x,
            y,
            panel.width - PADDING * 2.0 - CHANNEL_LABEL - CHANNEL_READOUT,
            ROW_HEIGHT,
        )
    }

    fn set_channel(&self, tree: &mut MenuTree, channel: usize, track: Rect, event: &InputEvent) {
        let value = quantize(ratio_at(track, event.cursor()));
        let _ = tree.modify::<ColorValue, _>(self.id, |color| color.set_channel(channel, value));
    }
}

impl Drawable for ColorDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let Ok(value) = tree.typed::<ColorValue>(self.id) else {
            return;
        };
        let color = value.get();
        let open = matches!(self.state, PickerState::Open { .. });
        let Some(rect) = draw_row(out, &self.palette, tree, self.id, open) else {
            return;
        };
        let swatch = control(rect, SWATCH);
        out.fill(swatch, color);
        out.outline(swatch, self.palette.border);

        if !open {
            return;
        }
        let panel = Self::panel(rect);
        out.push_overlay(RenderCommand::Rect {
            bounds: panel,
            color: self.palette.surface,
        });
        for (channel, (name, tint)) in CHANNELS.iter().enumerate() {
            let track = Self::track(panel, channel);
            let bar = Rect::new(track.x, track.y + track.height / 2.0 - 3.0, track.width, 6.0);
            let amount = color.channel(channel);
            let text_y = track.y + (track.height - super::FONT_SIZE) / 2.0;
            out.push_overlay(RenderCommand::Text {
                text: (*name).to_string(),
                x: panel.x + PADDING,
                y: text_y,
                color: *tint,
                font_size: super::FONT_SIZE,
            });
            out.push_overlay(RenderCommand::Rect {
                bounds: bar,
                color: self.palette.border,
            });
            out.push_overlay(RenderCommand::Rect {
                bounds: Rect::new(bar.x, bar.y, bar.width * amount, bar.height),
                color: *tint,
            });
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let byte = (amount * 255.0).round() as u8;
            out.push_overlay(RenderCommand::Text {
                text: byte.to_string(),
                x: track.right() + PADDING,
                y: text_y,
                color: self.palette.text,
                font_size: super::FONT_SIZE,
            });
        }
        out.push_overlay(RenderCommand::RectOutline {
            bounds: panel,
            color: self.palette.border,
            width: 1.0,
        });
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        label_width(tree, self.id) + GAP + SWATCH + PADDING
    }

    fn on_input(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        let Some(rect) = row(tree, self.id) else {
            return;
        };
        let panel = Self::panel(rect);

        match self.state {
            PickerState::Closed => {
                if pressed_in(event, rect) {
                    self.state = PickerState::Open { dragging: None };
                    event.stop();
                }
            }
            PickerState::Open {
                dragging: Some(channel),
            } => {
                let track = Self::track(panel, channel);
                if event.is_button_up(MouseButton::Left) {
                    self.state = PickerState::Open { dragging: None };
                    event.stop();
                } else if event.kind() == MessageKind::MouseMove {
                    self.set_channel(tree, channel, track, event);
                    event.stop();
                }
            }
            PickerState::Open { dragging: None } => {
                if !event.is_button_down(MouseButton::Left) {
                    return;
                }
                let cursor = event.cursor();
                if rect.contains(cursor) {
                    self.state = PickerState::Closed;
                    event.stop();
                } else if let Some(channel) =
                    (0..CHANNELS.len()).find(|&c| Self::track(panel, c).contains(cursor))
                {
                    self.state = PickerState::Open {
                        dragging: Some(channel),
                    };
                    self.set_channel(tree, channel, Self::track(panel, channel), event);
                    event.stop();
                } else if panel.union(&rect).expand(TOLERANCE).contains(cursor) {
                    event.stop();
                } else {
                    self.state = PickerState::Closed;
                }
            }
        }
    }

    fn dispose(&mut self) {
        self.state = PickerState::Closed;
    }
}
