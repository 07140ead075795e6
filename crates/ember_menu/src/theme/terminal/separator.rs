//! Divider row.

use super::{label_width, row, text_at, text_width, PADDING};
use crate::render::{RenderCommand, UIRenderer};
use crate::style::Palette;
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};

const MIN_WIDTH: f32 = 60.0;

pub(crate) struct SeparatorDrawable {
    id: ComponentId,
    palette: Palette,
}

impl SeparatorDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self { id, palette }
    }
}

impl Drawable for SeparatorDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let (Some(rect), Some(base)) = (row(tree, self.id), tree.base(self.id)) else {
            return;
        };
        out.fill(rect, self.palette.surface);
        let mid = rect.y + rect.height / 2.0;
        let title = base.display_name();
        if title.is_empty() {
            out.push(RenderCommand::Line {
                from: (rect.x + PADDING, mid),
                to: (rect.right() - PADDING, mid),
                color: self.palette.border,
                width: 1.0,
            });
            return;
        }
        let text_x = rect.x + (rect.width - text_width(title)) / 2.0;
        out.push(RenderCommand::Line {
            from: (rect.x + PADDING, mid),
            to: (text_x - PADDING, mid),
            color: self.palette.border,
            width: 1.0,
        });
        out.push(RenderCommand::Line {
            from: (text_x + text_width(title) + PADDING, mid),
            to: (rect.right() - PADDING, mid),
            color: self.palette.border,
            width: 1.0,
        });
        text_at(out, title, text_x, rect, self.palette.text_muted);
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        (label_width(tree, self.id) + PADDING * 4.0).max(MIN_WIDTH)
    }
}
