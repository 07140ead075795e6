//! Dropdown row.
//!
//! ```text
//! Collapsed ──click header──▶ Expanded { hovered }
//!     ▲                          │ move: hovered = option under cursor
//!     ├──click option i: commit──┤
//!     ├──click header────────────┤
//!     └──click outside bounds────┘ (past the tolerance margin, no change)
//! ```

use super::{
    control, draw_row, label_width, pressed_in, row, text_at, text_width, GAP, PADDING, ROW_HEIGHT,
    TOLERANCE,
};
use crate::input::{InputEvent, MessageKind, MouseButton};
use crate::layout::Rect;
use crate::render::{RenderCommand, UIRenderer};
use crate::style::Palette;
use crate::theme::Drawable;
use crate::tree::{ComponentId, MenuTree};
use crate::value::ListValue;

const ARROW: &str = "v";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropState {
    Collapsed,
    Expanded { hovered: Option<usize> },
}

pub(crate) struct ListDrawable {
    id: ComponentId,
    palette: Palette,
    state: DropState,
}

impl ListDrawable {
    pub(crate) const fn new(id: ComponentId, palette: Palette) -> Self {
        Self {
            id,
            palette,
            state: DropState::Collapsed,
        }
    }

    fn box_width(list: &ListValue) -> f32 {
        let widest = list
            .items()
            .iter()
            .map(|item| text_width(item))
            .fold(0.0, f32::max);
        widest + text_width(ARROW) + PADDING * 3.0
    }

    /// The value box and the option rows below it.
    fn geometry(rect: Rect, list: &ListValue) -> (Rect, Vec<Rect>) {
        let header = control(rect, Self::box_width(list));
        let options = (0..list.items().len())
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let y = rect.bottom() + i as f32 * ROW_HEIGHT;
                Rect::new(header.x, y, header.width, ROW_HEIGHT)
            })
            .collect();
        (header, options)
    }

    /// Header plus every option.
    fn bounds(header: Rect, options: &[Rect]) -> Rect {
        options.iter().fold(header, |acc, option| acc.union(option))
    }
}

impl Drawable for ListDrawable {
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer) {
        let Ok(list) = tree.typed::<ListValue>(self.id) else {
            return;
        };
        let expanded = matches!(self.state, DropState::Expanded { .. });
        let Some(rect) = draw_row(out, &self.palette, tree, self.id, expanded) else {
            return;
        };
        let (header, options) = Self::geometry(rect, list);

        out.outline(header, self.palette.primary);
        text_at(
            out,
            list.selected().unwrap_or("-"),
            header.x + PADDING,
            header,
            self.palette.text,
        );
        text_at(
            out,
            ARROW,
            header.right() - PADDING - text_width(ARROW),
            header,
            self.palette.primary,
        );

        let DropState::Expanded { hovered } = self.state else {
            return;
        };
        // Options overlap the rows below, so they go on top.
        for (i, (label, option)) in list.items().iter().zip(&options).enumerate() {
            let fill = if hovered == Some(i) {
                self.palette.surface_active
            } else {
                self.palette.surface
            };
            out.push_overlay(RenderCommand::Rect {
                bounds: *option,
                color: fill,
            });
            let color = if i == list.index() {
                self.palette.primary
            } else {
                self.palette.text
            };
            out.push_overlay(RenderCommand::Text {
                text: label.clone(),
                x: option.x + PADDING,
                y: option.y + (option.height - super::FONT_SIZE) / 2.0,
                color,
                font_size: super::FONT_SIZE,
            });
        }
        out.push_overlay(RenderCommand::RectOutline {
            bounds: Self::bounds(header, &options),
            color: self.palette.border,
            width: 1.0,
        });
    }

    fn width(&self, tree: &MenuTree) -> f32 {
        let boxed = tree
            .typed::<ListValue>(self.id)
            .map_or(0.0, Self::box_width);
        label_width(tree, self.id) + GAP + boxed + PADDING
    }

    fn on_input(&mut self, tree: &mut MenuTree, event: &mut InputEvent) {
        let Some(rect) = row(tree, self.id) else {
            return;
        };
        let Ok(list) = tree.typed::<ListValue>(self.id) else {
            return;
        };
        let (header, options) = Self::geometry(rect, list);

        match self.state {
            DropState::Collapsed => {
                if pressed_in(event, rect) {
                    self.state = DropState::Expanded { hovered: None };
                    event.stop();
                }
            }
            DropState::Expanded { .. } => {
                let cursor = event.cursor();
                let under = options.iter().position(|option| option.contains(cursor));

                if event.kind() == MessageKind::MouseMove {
                    self.state = DropState::Expanded { hovered: under };
                    return;
                }
                if !event.is_button_down(MouseButton::Left) {
                    return;
                }

                if let Some(index) = under {
                    let _ = tree.modify::<ListValue, _>(self.id, |list| list.select(index));
                    self.state = DropState::Collapsed;
                    event.stop();
                } else if rect.contains(cursor) {
                    self.state = DropState::Collapsed;
                    event.stop();
                } else if Self::bounds(header, &options)
                    .union(&rect)
                    .expand(TOLERANCE)
                    .contains(cursor)
                {
                    // Near miss: keep the dropdown open.
                    event.stop();
                } else {
                    self.state = DropState::Collapsed;
                }
            }
        }
    }

    fn dispose(&mut self) {
        self.state = DropState::Collapsed;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::theme::terminal::testing::{click, hover, single};
    use crate::tree::Item;

    fn setup() -> (MenuTree, ComponentId, ListDrawable, Arc<AtomicUsize>) {
        let (mut tree, id) = single(Item::new(
            "bone",
            "Bone",
            ListValue::new(["head", "neck", "chest"], 0),
        ));
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        tree.subscribe(id, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("subscribe");
        (tree, id, ListDrawable::new(id, Palette::TERMINAL), fired)
    }

    fn options(tree: &MenuTree, id: ComponentId) -> Vec<Rect> {
        let rect = row(tree, id).expect("row");
        let list = tree.typed::<ListValue>(id).expect("list");
        ListDrawable::geometry(rect, list).1
    }

    #[test]
    fn test_pick_option_commits_once() {
        let (mut tree, id, mut drawable, fired) = setup();
        drawable.on_input(&mut tree, &mut click(10.0, 10.0));
        assert!(matches!(drawable.state, DropState::Expanded { .. }));

        let chest = options(&tree, id)[2];
        drawable.on_input(&mut tree, &mut hover(chest.x + 1.0, chest.y + 1.0));
        assert_eq!(drawable.state, DropState::Expanded { hovered: Some(2) });

        let mut pick = click(chest.x + 1.0, chest.y + 1.0);
        drawable.on_input(&mut tree, &mut pick);
        assert!(!pick.should_process());
        assert_eq!(drawable.state, DropState::Collapsed);
        assert_eq!(tree.typed::<ListValue>(id).expect("list").index(), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pick_current_option_does_not_fire() {
        let (mut tree, id, mut drawable, fired) = setup();
        drawable.on_input(&mut tree, &mut click(10.0, 10.0));
        let head = options(&tree, id)[0];
        drawable.on_input(&mut tree, &mut click(head.x + 1.0, head.y + 1.0));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(drawable.state, DropState::Collapsed);
    }

    #[test]
    fn test_click_outside_collapses_without_change() {
        let (mut tree, id, mut drawable, fired) = setup();
        drawable.on_input(&mut tree, &mut click(10.0, 10.0));

        let mut away = click(900.0, 900.0);
        drawable.on_input(&mut tree, &mut away);
        assert!(away.should_process());
        assert_eq!(drawable.state, DropState::Collapsed);
        assert_eq!(tree.typed::<ListValue>(id).expect("list").index(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_near_miss_within_tolerance_stays_open() {
        let (mut tree, id, mut drawable, _) = setup();
        drawable.on_input(&mut tree, &mut click(10.0, 10.0));

        let last = options(&tree, id)[2];
        let mut near = click(last.x + 1.0, last.bottom() + TOLERANCE / 2.0);
        drawable.on_input(&mut tree, &mut near);
        assert!(!near.should_process());
        assert!(matches!(drawable.state, DropState::Expanded { .. }));
    }
}
