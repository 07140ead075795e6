//! The root registry: the host-facing face of the menu.
//!
//! The host forwards three callbacks (`on_input`, `on_draw`, `on_unload`);
//! scripts register root menus and attach components through the registry
//! so saved values are restored as components appear.
//!
//! Overlay visibility is `forced_open || latched_open`. The momentary key
//! sets `forced_open` while held; each press of the latch key flips
//! `latched_open`.

use std::sync::OnceLock;

use ember_core::{Housekeeper, SnapshotBuffer};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::config::MenuConfig;
use crate::error::MenuResult;
use crate::input::{InputEvent, MessageKind, RawInput};
use crate::render::{UIBatch, UIRenderer};
use crate::theme::{ThemeContext, ThemeRegistry};
use crate::tree::{Component, ComponentId, Item, Menu, MenuTree};
use crate::value::ListValue;

/// Name of the built-in settings root menu.
pub const SETTINGS_MENU: &str = "ember.settings";
/// Name of the theme list inside the settings menu.
pub const THEME_ITEM: &str = "theme";

/// Owner of the tree, the active theme and the overlay trigger state.
pub struct RootRegistry {
    tree: MenuTree,
    ctx: ThemeContext,
    themes: ThemeRegistry,
    config: MenuConfig,
    forced_open: bool,
    latched_open: bool,
    settings: ComponentId,
    renderer: UIRenderer,
}

impl RootRegistry {
    /// Registry with the built-in themes.
    ///
    /// # Errors
    ///
    /// [`crate::MenuError::UnknownTheme`] if the configured theme does not
    /// exist.
    pub fn new(config: MenuConfig) -> MenuResult<Self> {
        Self::with_themes(config, ThemeRegistry::new())
    }

    /// Registry choosing among `themes`.
    ///
    /// Creates and loads the settings menu; a theme saved there wins over
    /// the configured one.
    ///
    /// # Errors
    ///
    /// [`crate::MenuError::UnknownTheme`] if the configured theme is not in
    /// `themes`.
    pub fn with_themes(config: MenuConfig, themes: ThemeRegistry) -> MenuResult<Self> {
        let configured = themes.create(&config.theme)?;

        let mut tree = MenuTree::new(config.storage());
        let settings = tree.add_root(Menu::new(SETTINGS_MENU, "Settings"))?;
        let names = themes.names();
        let index = names
            .iter()
            .position(|name| *name == config.theme)
            .unwrap_or(0);
        tree.add(settings, Item::new(THEME_ITEM, "Theme", ListValue::new(names, index)))?;
        if let Err(e) = tree.load(settings) {
            warn!(error = %e, "Failed to load settings menu");
        }

        let saved = tree
            .value::<ListValue>(settings, THEME_ITEM)?
            .selected()
            .map(str::to_string);
        let theme = match saved {
            Some(name) if name != config.theme => match themes.create(&name) {
                Ok(theme) => theme,
                Err(e) => {
                    warn!(error = %e, "Saved theme unavailable, using configured theme");
                    configured
                }
            },
            _ => configured,
        };
        info!(theme = theme.name(), root = %config.config_root.display(), "Menu registry ready");

        Ok(Self {
            tree,
            ctx: ThemeContext::new(theme),
            themes,
            config,
            forced_open: false,
            latched_open: false,
            settings,
            renderer: UIRenderer::new(),
        })
    }

    /// The component tree.
    #[must_use]
    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// Mutable component tree.
    pub fn tree_mut(&mut self) -> &mut MenuTree {
        &mut self.tree
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Theme context (active theme plus drawable cache).
    #[must_use]
    pub fn theme_context(&self) -> &ThemeContext {
        &self.ctx
    }

    /// The built-in settings menu.
    #[must_use]
    pub const fn settings(&self) -> ComponentId {
        self.settings
    }

    /// Registers a root menu and loads whatever is already below it.
    ///
    /// Load failures are logged, never returned.
    ///
    /// # Errors
    ///
    /// [`crate::MenuError::DuplicateName`] if a root with that name exists.
    pub fn add(&mut self, menu: Menu) -> MenuResult<ComponentId> {
        let id = self.tree.add_root(menu)?;
        self.restore(id);
        info!(menu = %self.tree.name_of(id), "Registered root menu");
        Ok(id)
    }

    /// Attaches a component and restores its saved value.
    ///
    /// # Errors
    ///
    /// Same as [`MenuTree::add`].
    pub fn add_component(
        &mut self,
        parent: ComponentId,
        component: impl Into<Component>,
    ) -> MenuResult<ComponentId> {
        let id = self.tree.add(parent, component)?;
        self.restore(id);
        Ok(id)
    }

    fn restore(&mut self, id: ComponentId) {
        if let Err(e) = self.tree.load(id) {
            warn!(component = %self.tree.name_of(id), error = %e, "Failed to load");
        }
    }

    /// Unregisters a root menu without saving it.
    pub fn remove(&mut self, root: ComponentId) -> bool {
        let removed = self.tree.remove_root(root);
        if removed {
            self.ctx.prune(&self.tree);
        }
        removed
    }

    /// Detaches a component (and its subtree) without saving it.
    ///
    /// Returns the removed id, if `name` was a child of `parent`.
    pub fn remove_component(&mut self, parent: ComponentId, name: &str) -> Option<ComponentId> {
        let removed = self.tree.remove(parent, name)?;
        self.ctx.prune(&self.tree);
        Some(removed)
    }

    /// Whether the overlay is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.forced_open || self.latched_open
    }

    fn update_triggers(&mut self, event: &InputEvent) {
        let Some(key) = event.key() else {
            return;
        };
        match event.kind() {
            MessageKind::KeyDown if key == self.config.open_key => self.forced_open = true,
            MessageKind::KeyUp if key == self.config.open_key => self.forced_open = false,
            MessageKind::KeyDown if key == self.config.latch_key => {
                self.latched_open = !self.latched_open;
                debug!(latched = self.latched_open, "Overlay latch flipped");
            }
            _ => {}
        }
    }

    /// Host input callback.
    ///
    /// Updates the trigger keys, routes the event to every root in
    /// registration order while it is still processing, then feeds key
    /// bindings. Routing uses the visibility from before this event, so
    /// releasing the momentary key still reaches the open overlay.
    ///
    /// Widgets left mid-interaction by this event (a menu collapsed under
    /// them, or the overlay hidden) are disposed afterwards.
    ///
    /// Returns the event so the host can tell whether the menu consumed it.
    pub fn on_input(&mut self, raw: RawInput) -> InputEvent {
        let mut event = InputEvent::new(raw);
        let visible = self.is_visible();
        self.update_triggers(&event);

        self.tree.route_roots(&mut self.ctx, &mut event, visible);
        if event.should_process() {
            self.tree.process_hotkeys(&event);
        }

        if visible && !self.is_visible() {
            debug!("Overlay hidden, dropping widget state");
            self.ctx.dispose_all();
        } else if visible {
            self.ctx.reset_transient(&self.tree);
        }
        event
    }

    /// Host draw callback. Returns the frame's batches, bottom first.
    pub fn on_draw(&mut self) -> &[UIBatch] {
        self.renderer.begin_frame();
        if self.is_visible() {
            self.tree
                .draw_roots(&mut self.ctx, self.config.anchor, &mut self.renderer);
        }
        self.renderer.end_frame()
    }

    /// Host unload callback: best-effort save of every root.
    ///
    /// Returns the number of files written.
    pub fn on_unload(&mut self) -> usize {
        let mut written = 0;
        for root in self.tree.roots().to_vec() {
            match self.tree.save(root) {
                Ok(count) => written += count,
                Err(e) => error!(menu = %self.tree.name_of(root), error = %e, "Failed to save menu"),
            }
        }
        info!(written, "Menu state saved");
        written
    }

    /// Applies the theme selected in the settings menu.
    ///
    /// Theme changes take effect only here, never mid-frame.
    ///
    /// # Errors
    ///
    /// [`crate::MenuError::UnknownTheme`] if the selection names no
    /// registered theme; the active theme is kept.
    pub fn reinitialize(&mut self) -> MenuResult<()> {
        let selected = self
            .tree
            .value::<ListValue>(self.settings, THEME_ITEM)?
            .selected()
            .map(str::to_string);
        let Some(name) = selected else {
            return Ok(());
        };
        if name != self.ctx.theme().name() {
            let theme = self.themes.create(&name)?;
            self.ctx.replace_theme(theme);
        }
        self.ctx.prune(&self.tree);
        Ok(())
    }

    /// Starts the housekeeping thread at the configured interval.
    ///
    /// # Errors
    ///
    /// The OS error if the thread cannot be spawned.
    pub fn spawn_housekeeper<T, F>(
        &self,
        buffer: SnapshotBuffer<T>,
        source: F,
    ) -> std::io::Result<Housekeeper>
    where
        T: Send + Sync + 'static,
        F: FnMut() -> Vec<T> + Send + 'static,
    {
        Housekeeper::spawn(buffer, self.config.snapshot_interval(), source)
    }
}

static GLOBAL: OnceLock<Mutex<RootRegistry>> = OnceLock::new();

/// Installs the process-wide registry.
///
/// Returns the registry back if one is already installed.
///
/// # Errors
///
/// The rejected registry, if `install` was already called.
pub fn install(registry: RootRegistry) -> Result<(), RootRegistry> {
    GLOBAL
        .set(Mutex::new(registry))
        .map_err(|rejected| rejected.into_inner())
}

/// Locks the process-wide registry, if installed.
#[must_use]
pub fn global() -> Option<MutexGuard<'static, RootRegistry>> {
    GLOBAL.get().map(|registry| registry.lock())
}

#[cfg(test)]
mod tests {
    use ember_shared::Vec2;

    use super::*;
    use crate::input::{Key, MouseButton};
    use crate::theme::{NullTheme, TerminalTheme};
    use crate::value::{BoolValue, SliderValue};

    fn config(dir: &std::path::Path) -> MenuConfig {
        MenuConfig {
            config_root: dir.to_path_buf(),
            ..MenuConfig::default()
        }
    }

    #[test]
    fn test_trigger_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");
        assert!(!registry.is_visible());

        registry.on_input(RawInput::key_down(Key::Shift, Vec2::ZERO));
        assert!(registry.is_visible());
        registry.on_input(RawInput::key_up(Key::Shift, Vec2::ZERO));
        assert!(!registry.is_visible());

        registry.on_input(RawInput::key_down(Key::F8, Vec2::ZERO));
        registry.on_input(RawInput::key_up(Key::F8, Vec2::ZERO));
        assert!(registry.is_visible());
        registry.on_input(RawInput::key_down(Key::F8, Vec2::ZERO));
        assert!(!registry.is_visible());
    }

    #[test]
    fn test_draw_only_when_visible() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");

        let hidden: usize = registry.on_draw().iter().map(|b| b.commands.len()).sum();
        assert_eq!(hidden, 0);

        registry.on_input(RawInput::key_down(Key::F8, Vec2::ZERO));
        let shown: usize = registry.on_draw().iter().map(|b| b.commands.len()).sum();
        assert!(shown > 0);
    }

    #[test]
    fn test_hidden_overlay_ignores_clicks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");
        registry.on_input(RawInput::key_down(Key::F8, Vec2::ZERO));
        registry.on_draw();
        registry.on_input(RawInput::key_down(Key::F8, Vec2::ZERO));

        let anchor = registry.config().anchor;
        let event = registry.on_input(RawInput::mouse_down(
            MouseButton::Left,
            Vec2::new(anchor.x + 2.0, anchor.y + 2.0),
        ));
        assert!(event.should_process());
        assert!(!registry.tree().is_toggled(registry.settings()));
    }

    #[test]
    fn test_values_survive_unload_and_restart() {
        let dir = tempfile::tempdir().expect("tempdir");

        let mut first = RootRegistry::new(config(dir.path())).expect("registry");
        let menu = first.add(Menu::new("visuals", "Visuals")).expect("menu");
        first
            .add_component(menu, Item::new("boxes", "Boxes", BoolValue::new(false)))
            .expect("item");
        first
            .tree_mut()
            .value_mut::<BoolValue>(menu, "boxes")
            .expect("bool")
            .set(true);
        assert_eq!(first.on_unload(), 2);

        let mut second = RootRegistry::new(config(dir.path())).expect("registry");
        let menu = second.add(Menu::new("visuals", "Visuals")).expect("menu");
        second
            .add_component(menu, Item::new("boxes", "Boxes", BoolValue::new(false)))
            .expect("item");
        assert!(second.tree().value::<BoolValue>(menu, "boxes").expect("bool").get());
    }

    #[test]
    fn test_hiding_overlay_ends_slider_drag() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");
        let menu = registry.add(Menu::new("aim", "Aim")).expect("menu");
        let slider = registry
            .add_component(menu, Item::new("fov", "FOV", SliderValue::new(50, 0, 100)))
            .expect("slider");
        registry.tree_mut().set_toggled(menu, true);

        registry.on_input(RawInput::key_down(Key::Shift, Vec2::ZERO));
        registry.on_draw();
        let base = registry.tree().base(slider).expect("slider");
        let right = base.position().x + base.width();
        let y = base.position().y + 10.0;

        // Press near the right end of the track, then let go of the open key
        // and release the mouse while nothing is routed.
        let press = Vec2::new(right - 60.0, y);
        let pressed = registry.on_input(RawInput::mouse_down(MouseButton::Left, press));
        assert!(!pressed.should_process());
        let value = registry.tree().value::<SliderValue>(menu, "fov").expect("fov").get();
        registry.on_input(RawInput::key_up(Key::Shift, Vec2::ZERO));
        registry.on_input(RawInput::mouse_up(MouseButton::Left, press));

        registry.on_input(RawInput::key_down(Key::Shift, Vec2::ZERO));
        let hover = registry.on_input(RawInput::mouse_move(Vec2::new(right - 400.0, y)));
        assert!(hover.should_process());
        assert_eq!(
            registry.tree().value::<SliderValue>(menu, "fov").expect("fov").get(),
            value
        );
    }

    #[test]
    fn test_collapsing_menu_closes_open_dropdown() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");
        let menu = registry.add(Menu::new("aim", "Aim")).expect("menu");
        let list = registry
            .add_component(
                menu,
                Item::new("bone", "Bone", ListValue::new(["head", "neck", "chest"], 0)),
            )
            .expect("list");
        registry.on_input(RawInput::key_down(Key::F8, Vec2::ZERO));
        registry.on_draw();

        let header = registry.tree().base(menu).expect("menu").position();
        let header = Vec2::new(header.x + 2.0, header.y + 2.0);
        let toggle = |registry: &mut RootRegistry| {
            registry.on_input(RawInput::mouse_down(MouseButton::Left, header));
        };
        toggle(&mut registry);
        registry.on_draw();

        let base = registry.tree().base(list).expect("list");
        let (right, top) = (base.position().x + base.width(), base.position().y);
        let expand = Vec2::new(right - 8.0, top + 10.0);
        registry.on_input(RawInput::mouse_down(MouseButton::Left, expand));

        // Collapse and reopen the menu; the dropdown must come back closed.
        toggle(&mut registry);
        toggle(&mut registry);
        registry.on_draw();
        let pick = registry.on_input(RawInput::mouse_down(
            MouseButton::Left,
            Vec2::new(right - 8.0, top + 26.0 * 2.0 + 13.0),
        ));
        assert!(pick.should_process());
        assert_eq!(
            registry.tree().value::<ListValue>(menu, "bone").expect("bone").index(),
            0
        );
    }

    #[test]
    fn test_remove_component_prunes_drawables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");
        let menu = registry.add(Menu::new("aim", "Aim")).expect("menu");
        registry
            .add_component(menu, Item::new("on", "On", BoolValue::new(true)))
            .expect("item");
        registry.tree_mut().set_toggled(menu, true);
        registry.on_input(RawInput::key_down(Key::F8, Vec2::ZERO));
        registry.on_draw();
        let cached = registry.theme_context().cached();

        assert!(registry.remove_component(menu, "on").is_some());
        assert_eq!(registry.theme_context().cached(), cached - 1);
        assert!(registry.remove_component(menu, "on").is_none());
    }

    #[test]
    fn test_duplicate_root_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");
        registry.add(Menu::new("a", "A")).expect("first");
        assert!(registry.add(Menu::new("a", "A")).is_err());
    }

    #[test]
    fn test_theme_applies_on_reinitialize_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = RootRegistry::new(config(dir.path())).expect("registry");
        assert_eq!(registry.theme_context().theme().name(), TerminalTheme::NAME);

        let settings = registry.settings();
        registry
            .tree_mut()
            .value_mut::<ListValue>(settings, THEME_ITEM)
            .expect("theme list")
            .select_label(NullTheme::NAME);
        assert_eq!(registry.theme_context().theme().name(), TerminalTheme::NAME);

        registry.reinitialize().expect("reinitialize");
        assert_eq!(registry.theme_context().theme().name(), NullTheme::NAME);

        // The choice is persisted and picked up by the next registry.
        registry.on_unload();
        let next = RootRegistry::new(config(dir.path())).expect("registry");
        assert_eq!(next.theme_context().theme().name(), NullTheme::NAME);
    }

    #[test]
    fn test_unknown_configured_theme() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = MenuConfig {
            theme: "neon".to_string(),
            ..config(dir.path())
        };
        assert!(RootRegistry::new(config).is_err());
    }
}
