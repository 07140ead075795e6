//! Built-in dark terminal skin.
//!
//! Monospace metrics: every glyph is [`CHAR_WIDTH`] wide, so widths are a
//! pure function of the text.
//!
//! ```text
//! ┌──────────────────────┐┌──────────────────────────────┐
//! │ Combat             > ││ Enabled                  [x] │
//! └──────────────────────┘│ FOV          ▓▓▓▓▓░░░░░   95 │
//!                         │ Bone              [ head  v] │
//!                         └──────────────────────────────┘
//! ```

mod color;
mod keybind;
mod list;
mod menu;
mod separator;
mod slider;
mod text;
mod toggle;

use ember_shared::Vec2;

use super::{Drawable, Theme};
use crate::input::{InputEvent, MouseButton};
use crate::layout::Rect;
use crate::render::UIRenderer;
use crate::style::{Color, Palette};
use crate::tree::{ComponentId, ComponentKind, MenuTree};
use crate::value::ValueTag;

/// Row height.
pub(crate) const ROW_HEIGHT: f32 = 26.0;
/// Glyph advance.
pub(crate) const CHAR_WIDTH: f32 = 7.0;
/// Font size.
pub(crate) const FONT_SIZE: f32 = 13.0;
/// Inner padding.
pub(crate) const PADDING: f32 = 6.0;
/// Slack around popups before a click counts as outside.
pub(crate) const TOLERANCE: f32 = 8.0;
/// Gap between a label and its control.
pub(crate) const GAP: f32 = 12.0;

/// The built-in skin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalTheme {
    palette: Palette,
}

impl TerminalTheme {
    /// Registered name.
    pub const NAME: &'static str = "terminal";

    /// Skin with a custom palette.
    #[must_use]
    pub const fn with_palette(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Theme for TerminalTheme {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn row_height(&self) -> f32 {
        ROW_HEIGHT
    }

    fn build(&self, kind: ComponentKind, id: ComponentId) -> Option<Box<dyn Drawable>> {
        let palette = self.palette;
        let drawable: Box<dyn Drawable> = match kind {
            ComponentKind::Menu => Box::new(menu::MenuDrawable::new(id, palette)),
            ComponentKind::Item(tag) => match tag {
                ValueTag::Bool => Box::new(toggle::ToggleDrawable::new(id, palette)),
                ValueTag::Slider | ValueTag::SliderButton => {
                    Box::new(slider::SliderDrawable::new(id, palette))
                }
                ValueTag::List => Box::new(list::ListDrawable::new(id, palette)),
                ValueTag::Color => Box::new(color::ColorDrawable::new(id, palette)),
                ValueTag::KeyBind => Box::new(keybind::KeyBindDrawable::new(id, palette)),
                ValueTag::Text => Box::new(text::TextDrawable::new(id, palette)),
                ValueTag::Separator => Box::new(separator::SeparatorDrawable::new(id, palette)),
            },
        };
        Some(drawable)
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Rendered width of `text`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * CHAR_WIDTH
}

/// Row rect recorded at the last draw.
pub(crate) fn row(tree: &MenuTree, id: ComponentId) -> Option<Rect> {
    let base = tree.base(id)?;
    Some(Rect::at(base.position(), base.width(), ROW_HEIGHT))
}

/// Width of the display-name label with padding on both sides.
pub(crate) fn label_width(tree: &MenuTree, id: ComponentId) -> f32 {
    tree.base(id)
        .map_or(0.0, |base| text_width(base.display_name()) + PADDING * 2.0)
}

/// Row background plus the display-name label.
pub(crate) fn draw_row(
    out: &mut UIRenderer,
    palette: &Palette,
    tree: &MenuTree,
    id: ComponentId,
    active: bool,
) -> Option<Rect> {
    let rect = row(tree, id)?;
    let fill = if active {
        palette.surface_active
    } else {
        palette.surface
    };
    out.fill(rect, fill);
    out.outline(rect, palette.border);
    if let Some(base) = tree.base(id) {
        text_at(out, base.display_name(), rect.x + PADDING, rect, palette.text);
    }
    Some(rect)
}

/// Text vertically centered in `rect`, starting at `x`.
pub(crate) fn text_at(out: &mut UIRenderer, text: &str, x: f32, rect: Rect, color: Color) {
    let y = rect.y + (rect.height - FONT_SIZE) / 2.0;
    out.text(text, x, y, color, FONT_SIZE);
}

/// Control slot of `width` at the right end of a row, inset vertically.
pub(crate) fn control(rect: Rect, width: f32) -> Rect {
    let (_, right) = rect.split_right(width + PADDING);
    Rect::new(right.x, right.y + 4.0, width, right.height - 8.0)
}

/// Position along `track` as a ratio, unclamped.
pub(crate) fn ratio_at(track: Rect, cursor: Vec2) -> f32 {
    if track.width <= 0.0 {
        return 0.0;
    }
    (cursor.x - track.x) / track.width
}

/// Left press inside `rect`.
pub(crate) fn pressed_in(event: &InputEvent, rect: Rect) -> bool {
    event.is_button_down(MouseButton::Left) && rect.contains(event.cursor())
}
