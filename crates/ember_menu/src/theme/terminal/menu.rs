//! Menu header row.
//!
//! Expanding and collapsing is handled by the tree; the header only draws.

use super::{draw_row, label_width, row, text_at, text_width, GAP, PADDING};
use crate::render::UIRenderer;
use crate::style::Palette;
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};

const ARROW: &str = ">";

pub(crate) struct MenuDrawable {
    id: ComponentId,
    palette: Palette,
}

impl MenuDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self { id, palette }
    }
}

impl Drawable for MenuDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let toggled = tree.is_toggled(self.id);
        if draw_row(out, &self.palette, tree, self.id, toggled).is_none() {
            return;
        }
        if tree.children(self.id).is_empty() {
            return;
        }
        let Some(rect) = row(tree, self.id) else {
            return;
        };
        let color = if toggled {
            self.palette.primary
        } else {
            self.palette.text_muted
        };
        text_at(
            out,
            ARROW,
            rect.right() - PADDING - text_width(ARROW),
            rect,
            color,
        );
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        label_width(tree, self.id) + GAP + text_width(ARROW) + PADDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderCommand;
    use crate::tree::{Item, Menu, StorageRoot};
    use crate::value::BoolValue;
    use ember_shared::Vec2;

    #[test]
    fn test_arrow_only_with_children() {
        let mut tree = MenuTree::new(StorageRoot::new("unused", "tests"));
        let root = tree.add_root(Menu::new("root", "Root")).expect("root");
        tree.place(root, Vec2::ZERO, 0, 120.0);
        let drawable = MenuDrawable::new(root, Palette::TERMINAL);

        let arrows = |out: &UIRenderer| {
            out.commands()
                .iter()
                .filter(|c| matches!(c, RenderCommand::Text { text, .. } if text == ARROW))
                .count()
        };

        let mut out = UIRenderer::new();
        drawable.draw(&tree, &mut out);
        assert_eq!(arrows(&out), 0);

        tree.add(root, Item::of::<BoolValue>("flag", "Flag")).expect("item");
        let mut out = UIRenderer::new();
        drawable.draw(&tree, &mut out);
        assert_eq!(arrows(&out), 1);
    }
}
