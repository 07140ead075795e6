//! Save-file paths and the save/load cascades.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use super::{ComponentBase, ComponentId, ComponentKind, MenuTree, NodeKind};
use crate::error::{MenuError, MenuResult};
use crate::value::{SavedValue, SCHEMA_VERSION};

/// Extension of item save files.
pub const SAVE_EXTENSION: &str = "toml";

/// Base directory plus the default owner identity.
///
/// A root menu resolves to `<root>/<identity>/<name+unique>`, where the
/// identity is the menu's owner if it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    root: PathBuf,
    identity: String,
}

impl StorageRoot {
    /// Creates a storage root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, identity: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            identity: identity.into(),
        }
    }

    /// Base directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Default owner identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// Makes `name+unique` safe as one path segment.
fn segment(base: &ComponentBase) -> String {
    let raw = format!("{}{}", base.name, base.unique_string);
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => format!("_{cleaned}"),
        _ => cleaned,
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> MenuError + '_ {
    move |source| MenuError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl MenuTree {
    fn slot_error(&self, id: ComponentId) -> MenuError {
        match self.kind(id) {
            None => MenuError::UnknownComponent(id),
            Some(ComponentKind::Menu) => MenuError::NotAnItem(self.name_of(id)),
            Some(ComponentKind::Item(_)) => MenuError::MissingValue(self.name_of(id)),
        }
    }

    /// Save location of a component: a directory for menus, a `.toml` file
    /// for items. `None` for stale ids.
    #[must_use]
    pub fn path(&self, id: ComponentId) -> Option<PathBuf> {
        let mut segments = Vec::new();
        let mut root = id;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let base = self.base(current)?;
            segments.push(segment(base));
            root = current;
            cursor = base.parent;
        }

        let identity = self.owner_of(root).unwrap_or(&self.storage.identity);
        let mut path = self.storage.root.join(identity);
        let last = segments.len().saturating_sub(1);
        for (i, seg) in segments.iter().rev().enumerate() {
            if i == last && !self.is_menu(id) {
                path.push(format!("{seg}.{SAVE_EXTENSION}"));
            } else {
                path.push(seg);
            }
        }
        Some(path)
    }

    /// Writes one item's value to its save file.
    ///
    /// Returns `false` if the kind is display-only and nothing was written.
    ///
    /// # Errors
    ///
    /// Filesystem and encoding failures, or a menu/empty item id.
    pub fn save_item(&self, id: ComponentId) -> MenuResult<bool> {
        let slot = self.slot(id).ok_or_else(|| self.slot_error(id))?;
        let Some(record) = slot.value().to_record() else {
            return Ok(false);
        };
        let path = self.path(id).ok_or(MenuError::UnknownComponent(id))?;

        let text = toml::to_string(&SavedValue::current(record)).map_err(|e| {
            MenuError::Serialize {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }
        // Write-then-rename so a crash never leaves a half-written file.
        let staging = path.with_extension(format!("{SAVE_EXTENSION}.tmp"));
        fs::write(&staging, text).map_err(io_error(&staging))?;
        fs::rename(&staging, &path).map_err(io_error(&path))?;
        Ok(true)
    }

    /// Applies an item's save file onto its live value.
    ///
    /// Returns `false` if there is no file (defaults stay) or the kind is
    /// display-only. Subscribers are kept and not notified.
    ///
    /// # Errors
    ///
    /// Unreadable or corrupt file, a newer schema version, or a record of
    /// another kind.
    pub fn load_item(&mut self, id: ComponentId) -> MenuResult<bool> {
        match self.item_value(id) {
            Some(value) if !value.is_serializable() => return Ok(false),
            Some(_) => {}
            None => return Err(self.slot_error(id)),
        }
        let path = self.path(id).ok_or(MenuError::UnknownComponent(id))?;

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(io_error(&path)(e)),
        };
        let saved: SavedValue = toml::from_str(&text).map_err(|e| MenuError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        if saved.version > SCHEMA_VERSION {
            return Err(MenuError::UnsupportedVersion {
                path,
                found: saved.version,
                supported: SCHEMA_VERSION,
            });
        }

        let Some(NodeKind::Item(item)) = self.nodes.get_mut(&id).map(|n| &mut n.kind) else {
            return Err(MenuError::UnknownComponent(id));
        };
        let Some(slot) = item.slot.as_mut() else {
            return Err(MenuError::UnknownComponent(id));
        };
        slot.value_mut()
            .apply_record(&saved.value)
            .map_err(|mismatch| MenuError::Parse {
                path,
                message: format!(
                    "record is a {} value, item holds a {} value",
                    mismatch.found, mismatch.expected
                ),
            })?;
        Ok(true)
    }

    /// Saves every item at or below `id`.
    ///
    /// Failures are logged per item and do not stop the cascade. Returns the
    /// number of files written.
    ///
    /// # Errors
    ///
    /// [`MenuError::UnknownComponent`] for a stale id.
    pub fn save(&self, id: ComponentId) -> MenuResult<usize> {
        if !self.contains(id) {
            return Err(MenuError::UnknownComponent(id));
        }
        let mut written = 0;
        for item in self.depth_first(id) {
            if self.is_menu(item) {
                continue;
            }
            match self.save_item(item) {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => error!(item = %self.name_of(item), error = %e, "Failed to save item"),
            }
        }
        debug!(menu = %self.name_of(id), written, "Saved menu");
        Ok(written)
    }

    /// Loads every item at or below `id`.
    ///
    /// A corrupt or unreadable file is logged and that item keeps its
    /// default. Returns the number of files applied.
    ///
    /// # Errors
    ///
    /// [`MenuError::UnknownComponent`] for a stale id.
    pub fn load(&mut self, id: ComponentId) -> MenuResult<usize> {
        if !self.contains(id) {
            return Err(MenuError::UnknownComponent(id));
        }
        let mut applied = 0;
        for item in self.depth_first(id) {
            if self.is_menu(item) {
                continue;
            }
            match self.load_item(item) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(e) => warn!(item = %self.name_of(item), error = %e, "Keeping default value"),
            }
        }
        debug!(menu = %self.name_of(id), applied, "Loaded menu");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::style::Color;
    use crate::tree::{Item, Menu};
    use crate::value::{
        BoolValue, ColorValue, KeyBind, KeyBindMode, KeyBindValue, ListValue, SeparatorValue,
        SliderButtonValue, SliderValue, TextValue, Value,
    };

    fn populate(tree: &mut MenuTree) -> ComponentId {
        let root = tree.add_root(Menu::new("combat", "Combat")).expect("root");
        let sub = tree.add(root, Menu::new("aim", "Aim").with_unique("#2")).expect("sub");
        tree.add(root, Item::new("enabled", "Enabled", BoolValue::new(false))).expect("bool");
        tree.add(root, Item::new("line", "", SeparatorValue)).expect("separator");
        tree.add(sub, Item::new("fov", "FOV", SliderValue::new(10, 0, 180))).expect("slider");
        tree.add(sub, Item::new("smooth", "Smooth", SliderButtonValue::new(1, 0, 10, false)))
            .expect("slider button");
        tree.add(sub, Item::new("bone", "Bone", ListValue::new(["head", "neck", "chest"], 0)))
            .expect("list");
        tree.add(sub, Item::new("tint", "Tint", ColorValue::new(Color::WHITE))).expect("color");
        tree.add(sub, Item::new("hold", "Hold", KeyBindValue::default())).expect("keybind");
        tree.add(sub, Item::new("tag", "Tag", TextValue::new("")))
            .expect("text");
        root
    }

    fn mutate(tree: &mut MenuTree, root: ComponentId) {
        let sub = tree.child(root, "aim").expect("sub");
        tree.value_mut::<BoolValue>(root, "enabled").expect("bool").set(true);
        tree.value_mut::<SliderValue>(sub, "fov").expect("slider").set(95);
        let smooth = tree.value_mut::<SliderButtonValue>(sub, "smooth").expect("sb");
        smooth.slider.set(7);
        smooth.set_enabled(true);
        tree.value_mut::<ListValue>(sub, "bone").expect("list").select(2);
        tree.value_mut::<ColorValue>(sub, "tint")
            .expect("color")
            .set(Color::rgba(0.25, 0.5, 0.75, 0.5));
        tree.value_mut::<KeyBindValue>(sub, "hold")
            .expect("keybind")
            .set(KeyBind {
                key: Key::F4,
                mode: KeyBindMode::Toggle,
                active: true,
            });
        tree.value_mut::<TextValue>(sub, "tag").expect("text").set("hello");
    }

    fn values(tree: &MenuTree, root: ComponentId) -> Vec<Option<Value>> {
        tree.depth_first(root)
            .into_iter()
            .map(|id| tree.item_value(id).cloned())
            .collect()
    }

    #[test]
    fn test_path_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut tree = MenuTree::new(StorageRoot::new(dir.path(), "script"));
        let root = populate(&mut tree);
        let sub = tree.child(root, "aim").expect("sub");
        let fov = tree.child(sub, "fov").expect("fov");

        assert_eq!(tree.path(root), Some(dir.path().join("script").join("combat")));
        assert_eq!(
            tree.path(fov),
            Some(dir.path().join("script").join("combat").join("aim#2").join("fov.toml"))
        );
    }

    #[test]
    fn test_owner_identity_overrides_default() {
        let mut tree = MenuTree::new(StorageRoot::new("cfg", "default"));
        let root = tree
            .add_root(Menu::new("m", "M").owned_by("other"))
            .expect("root");
        assert_eq!(tree.path(root), Some(PathBuf::from("cfg/other/m")));
    }

    #[test]
    fn test_round_trip_every_kind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = StorageRoot::new(dir.path(), "script");

        let mut before = MenuTree::new(storage.clone());
        let root = populate(&mut before);
        mutate(&mut before, root);
        assert_eq!(before.save(root).expect("save"), 7);

        let mut after = MenuTree::new(storage);
        let root_after = populate(&mut after);
        assert_eq!(after.load(root_after).expect("load"), 7);

        assert_eq!(values(&before, root), values(&after, root_after));
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut tree = MenuTree::new(StorageRoot::new(dir.path(), "script"));
        let root = populate(&mut tree);
        let expected = values(&tree, root);

        assert_eq!(tree.load(root).expect("load"), 0);
        assert_eq!(values(&tree, root), expected);
    }

    #[test]
    fn test_corrupt_file_keeps_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut tree = MenuTree::new(StorageRoot::new(dir.path(), "script"));
        let root = populate(&mut tree);
        let item = tree.child(root, "enabled").expect("item");
        let path = tree.path(item).expect("path");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "version = [[[ not toml").expect("write");

        assert!(matches!(tree.load_item(item), Err(MenuError::Parse { .. })));
        tree.load(root).expect("cascade continues");
        assert!(!tree.value::<BoolValue>(root, "enabled").expect("bool").get());
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut tree = MenuTree::new(StorageRoot::new(dir.path(), "script"));
        let root = populate(&mut tree);
        let item = tree.child(root, "enabled").expect("item");
        let path = tree.path(item).expect("path");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "version = 9\n[value]\nkind = \"bool\"\nvalue = true\n").expect("write");

        assert!(matches!(
            tree.load_item(item),
            Err(MenuError::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn test_separator_not_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut tree = MenuTree::new(StorageRoot::new(dir.path(), "script"));
        let root = populate(&mut tree);
        let line = tree.child(root, "line").expect("separator");

        assert!(!tree.save_item(line).expect("skip"));
        assert!(!tree.path(line).expect("path").exists());
    }

    #[test]
    fn test_load_keeps_subscribers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = StorageRoot::new(dir.path(), "script");
        let mut tree = MenuTree::new(storage);
        let root = populate(&mut tree);
        let item = tree.child(root, "enabled").expect("item");
        tree.subscribe(item, |_| {}).expect("subscribe");
        tree.value_mut::<BoolValue>(root, "enabled").expect("bool").set(true);
        tree.save(root).expect("save");
        tree.value_mut::<BoolValue>(root, "enabled").expect("bool").set(false);

        tree.load(root).expect("load");
        assert!(tree.value::<BoolValue>(root, "enabled").expect("bool").get());
        assert_eq!(tree.slot(item).map(crate::value::ValueSlot::listener_count), Some(1));
    }
}
