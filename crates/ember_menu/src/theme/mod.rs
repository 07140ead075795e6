//! Skins.
//!
//! A [`Theme`] is a factory that builds one [`Drawable`] per component. The
//! drawable renders that component into a [`UIRenderer`] and runs its input
//! state machine (dropdown open, slider drag, key capture). Drawables are
//! cached per component in a [`ThemeContext`], which is passed explicitly
//! to every draw and route call.

mod terminal;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::error::{MenuError, MenuResult};
use crate::input::InputEvent;
use crate::render::UIRenderer;
use crate::tree::{ComponentId, ComponentKind, MenuTree};

pub use terminal::TerminalTheme;

/// Renders and handles input for one component.
///
/// A drawable is bound to the component id it was built for.
pub trait Drawable: Send {
    /// Pushes the component's render commands.
    ///
    /// Reads layout (position, width) recorded by the tree; never mutates
    /// component state.
    fn draw(&self, tree: &MenuTree, out: &mut UIRenderer);

    /// Width the component wants for its row.
    fn width(&self, tree: &MenuTree) -> f32;

    /// Hit-testing and widget state machines.
    fn on_input(&mut self, _tree: &mut MenuTree, _event: &mut InputEvent) {}

    /// Drops transient state (open dropdowns, capture, focus).
    fn dispose(&mut self) {}
}

/// Factory of drawables plus skin metrics.
pub trait Theme: Send {
    /// Registered name.
    fn name(&self) -> &str;

    /// Height of one row.
    fn row_height(&self) -> f32;

    /// Builds the drawable for a component, or `None` if this skin does not
    /// handle the kind.
    fn build(&self, kind: ComponentKind, id: ComponentId) -> Option<Box<dyn Drawable>>;
}

/// Stand-in for kinds a theme does not draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDrawable;

impl NullDrawable {
    /// Width reported for every component.
    pub const NOMINAL_WIDTH: f32 = 100.0;
}

impl Drawable for NullDrawable {
    fn draw(&self, _tree: &MenuTree, _out: &mut UIRenderer) {}

    fn width(&self, _tree: &MenuTree) -> f32 {
        Self::NOMINAL_WIDTH
    }
}

/// Theme that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTheme;

impl NullTheme {
    /// Registered name.
    pub const NAME: &'static str = "null";
}

impl Theme for NullTheme {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn row_height(&self) -> f32 {
        20.0
    }

    fn build(&self, _kind: ComponentKind, _id: ComponentId) -> Option<Box<dyn Drawable>> {
        None
    }
}

/// The active theme and the per-component drawable cache.
pub struct ThemeContext {
    theme: Box<dyn Theme>,
    drawables: HashMap<ComponentId, (ComponentKind, Box<dyn Drawable>)>,
}

impl ThemeContext {
    /// Creates a context using `theme`.
    #[must_use]
    pub fn new(theme: Box<dyn Theme>) -> Self {
        Self {
            theme,
            drawables: HashMap::with_capacity(64),
        }
    }

    /// The active theme.
    #[must_use]
    pub fn theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    /// Row height of the active theme.
    #[must_use]
    pub fn row_height(&self) -> f32 {
        self.theme.row_height()
    }

    /// Drawable for `id`, built on first use.
    ///
    /// Rebuilt if the component's kind changed since (an item's value was
    /// replaced with another kind). `None` for stale ids.
    pub fn drawable(&mut self, tree: &MenuTree, id: ComponentId) -> Option<&mut dyn Drawable> {
        let kind = tree.kind(id)?;
        let stale = self
            .drawables
            .get(&id)
            .is_some_and(|(cached, _)| *cached != kind);
        if stale {
            if let Some((_, mut old)) = self.drawables.remove(&id) {
                old.dispose();
            }
        }

        let theme = &self.theme;
        let (_, drawable) = self.drawables.entry(id).or_insert_with(|| {
            let drawable = theme
                .build(kind, id)
                .unwrap_or_else(|| Box::new(NullDrawable));
            (kind, drawable)
        });
        Some(drawable.as_mut())
    }

    /// Swaps the active theme, disposing every cached drawable.
    ///
    /// Returns the previous theme.
    pub fn replace_theme(&mut self, theme: Box<dyn Theme>) -> Box<dyn Theme> {
        for (_, (_, mut drawable)) in self.drawables.drain() {
            drawable.dispose();
        }
        info!(from = self.theme.name(), to = theme.name(), "Switching theme");
        std::mem::replace(&mut self.theme, theme)
    }

    /// Disposes drawables whose component no longer exists.
    pub fn prune(&mut self, tree: &MenuTree) -> usize {
        let dead: Vec<ComponentId> = self
            .drawables
            .keys()
            .copied()
            .filter(|&id| !tree.contains(id))
            .collect();
        for id in &dead {
            if let Some((_, mut drawable)) = self.drawables.remove(id) {
                drawable.dispose();
            }
        }
        if !dead.is_empty() {
            debug!(count = dead.len(), "Pruned drawables");
        }
        dead.len()
    }

    /// Disposes the drawables of components that are no longer visible.
    ///
    /// A hidden widget never sees the mouse-up or outside click that would
    /// end its drag, dropdown, capture or focus.
    pub fn reset_transient(&mut self, tree: &MenuTree) {
        for (id, (_, drawable)) in &mut self.drawables {
            if !tree.is_visible(*id) {
                drawable.dispose();
            }
        }
    }

    /// Disposes every cached drawable, keeping the cache.
    pub fn dispose_all(&mut self) {
        for (_, drawable) in self.drawables.values_mut() {
            drawable.dispose();
        }
    }

    /// Number of cached drawables.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.drawables.len()
    }
}

type ThemeConstructor = fn() -> Box<dyn Theme>;

/// Theme constructors by name.
pub struct ThemeRegistry {
    constructors: BTreeMap<String, ThemeConstructor>,
}

impl ThemeRegistry {
    /// Registry with the built-in `terminal` and `null` skins.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            constructors: BTreeMap::new(),
        };
        registry.register(TerminalTheme::NAME, || Box::new(TerminalTheme::default()));
        registry.register(NullTheme::NAME, || Box::new(NullTheme));
        registry
    }

    /// Adds or replaces a theme constructor.
    pub fn register(&mut self, name: impl Into<String>, constructor: ThemeConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    /// Builds the theme registered under `name`.
    ///
    /// # Errors
    ///
    /// [`MenuError::UnknownTheme`] if nothing is registered under `name`.
    pub fn create(&self, name: &str) -> MenuResult<Box<dyn Theme>> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| MenuError::UnknownTheme(name.to_string()))
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
