//! Drawing and input routing through the tree.
//!
//! Both walk the same shape: a menu handles its own header, then (when
//! expanded) visits its visible children in display order. Children are laid
//! out as a column to the right of the header, one row each, all as wide as
//! the widest child.

use ember_shared::Vec2;
use tracing::error;

use super::{ComponentId, MenuTree};
use crate::input::{InputEvent, MessageKind};
use crate::layout::Rect;
use crate::render::UIRenderer;
use crate::theme::ThemeContext;
use crate::value::{KeyBindValue, ValueTag};

impl MenuTree {
    /// Records the layout a component was drawn with.
    pub(crate) fn place(&mut self, id: ComponentId, position: Vec2, index: usize, width: f32) {
        if let Some(base) = self.base_mut(id) {
            base.position = position;
            base.index = index;
            base.width = width;
        }
    }

    /// Widest drawable among `ids`.
    fn column_width(&self, ctx: &mut ThemeContext, ids: &[ComponentId]) -> f32 {
        ids.iter()
            .filter_map(|&id| ctx.drawable(self, id).map(|drawable| drawable.width(self)))
            .fold(0.0, f32::max)
    }

    /// Draws a visible component at `position` and, for an expanded menu,
    /// its children.
    pub fn draw(
        &mut self,
        ctx: &mut ThemeContext,
        id: ComponentId,
        position: Vec2,
        index: usize,
        width: f32,
        out: &mut UIRenderer,
    ) {
        if !self.is_visible(id) {
            return;
        }
        let is_menu = self.is_menu(id);
        if !is_menu && self.slot(id).is_none() {
            error!(item = %self.name_of(id), "Item has no value, skipping draw");
            return;
        }

        self.place(id, position, index, width);
        if let Some(drawable) = ctx.drawable(self, id) {
            drawable.draw(self, out);
        }

        if !is_menu || !self.is_toggled(id) {
            return;
        }
        let children: Vec<ComponentId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_visible(child))
            .collect();
        let column = self.column_width(ctx, &children);
        let row_height = ctx.row_height();
        let x = position.x + width;
        for (i, child) in children.into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = position.y + i as f32 * row_height;
            self.draw(ctx, child, Vec2::new(x, y), i, column, out);
        }
    }

    /// Draws every root as a column starting at `anchor`.
    pub fn draw_roots(&mut self, ctx: &mut ThemeContext, anchor: Vec2, out: &mut UIRenderer) {
        let roots = self.roots.clone();
        let width = self.column_width(ctx, &roots);
        let row_height = ctx.row_height();
        for (i, root) in roots.into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = anchor.y + i as f32 * row_height;
            self.draw(ctx, root, Vec2::new(anchor.x, y), i, width, out);
        }
    }

    /// Routes an event into a component.
    ///
    /// Menus hit-test their header: a left press on the header of a menu
    /// with children flips it (closing expanded siblings) and stops the
    /// event. Otherwise an expanded menu forwards the event to each visible
    /// child until one stops it. Items hand the event to their drawable.
    pub fn route(&mut self, ctx: &mut ThemeContext, id: ComponentId, event: &mut InputEvent) {
        if !event.should_process() || !self.is_visible(id) {
            return;
        }
        if !self.is_menu(id) {
            self.route_item(ctx, id, event);
            return;
        }

        let Some(base) = self.base(id) else {
            return;
        };
        let header = Rect::at(base.position(), base.width(), ctx.row_height());
        let toggled = base.is_toggled();
        if event.is_left_down()
            && header.contains(event.cursor())
            && !self.children(id).is_empty()
        {
            self.set_toggled(id, !toggled);
            event.stop();
            return;
        }
        if !toggled {
            return;
        }

        let children = self.children(id).to_vec();
        for child in children {
            if !event.should_process() {
                break;
            }
            if self.is_visible(child) {
                self.route(ctx, child, event);
            }
        }
    }

    fn route_item(&mut self, ctx: &mut ThemeContext, id: ComponentId, event: &mut InputEvent) {
        if self.slot(id).is_none() {
            error!(item = %self.name_of(id), "Item has no value, skipping input");
            return;
        }
        if let Some(drawable) = ctx.drawable(self, id) {
            drawable.on_input(self, event);
        }
    }

    /// Routes an event to every root in registration order.
    ///
    /// Nothing is forwarded while the overlay is hidden.
    pub fn route_roots(&mut self, ctx: &mut ThemeContext, event: &mut InputEvent, overlay_visible: bool) {
        if !overlay_visible {
            return;
        }
        let roots = self.roots.clone();
        for root in roots {
            if !event.should_process() {
                break;
            }
            self.route(ctx, root, event);
        }
    }

    /// Feeds a key message to every key binding in the tree.
    ///
    /// Runs regardless of visibility. Returns how many bindings changed.
    pub fn process_hotkeys(&mut self, event: &InputEvent) -> usize {
        let down = match event.kind() {
            MessageKind::KeyDown => true,
            MessageKind::KeyUp => false,
            _ => return 0,
        };
        let Some(key) = event.key() else {
            return 0;
        };
        self.items_of(ValueTag::KeyBind)
            .into_iter()
            .filter(|&id| {
                self.modify::<KeyBindValue, _>(id, |bind| bind.on_key(key, down))
                    .unwrap_or(false)
            })
            .count()
    }
}
