//! The menu component tree.
//!
//! Components live in an arena keyed by [`ComponentId`]. Menus own their
//! children through the arena; the parent link is a plain id, so the tree
//! has no reference cycles.
//!
//! ```text
//! roots ──▶ Menu ──▶ Item<Bool>
//!             │  └─▶ Item<Slider>
//!             └────▶ Menu ──▶ Item<KeyBind>
//! ```

mod component;
mod persist;
mod routing;

use std::collections::HashMap;

use ember_shared::Vec2;

use crate::error::{MenuError, MenuResult};
use crate::value::{
    ChangeListener, Value, ValueChanged, ValueFactory, ValueKind, ValueSlot, ValueTag,
};

pub use component::{Component, Item, Menu};
pub use persist::{StorageRoot, SAVE_EXTENSION};

use component::InitialValue;

/// Placeholder used in errors about root-level siblings.
const ROOT_NAME: &str = "<root>";

/// Unique identifier for a component.
///
/// Ids are never reused within a tree, so a stale id simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What kind of component an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// A menu.
    Menu,
    /// An item holding a value of this kind.
    Item(ValueTag),
}

/// State shared by menus and items.
#[derive(Debug, Clone)]
pub struct ComponentBase {
    name: String,
    display_name: String,
    unique_string: String,
    parent: Option<ComponentId>,
    visible: bool,
    toggled: bool,
    position: Vec2,
    width: f32,
    index: usize,
}

impl ComponentBase {
    fn new(name: String, display_name: String, unique_string: String) -> Self {
        Self {
            name,
            display_name,
            unique_string,
            parent: None,
            visible: false,
            toggled: false,
            position: Vec2::ZERO,
            width: 0.0,
            index: 0,
        }
    }

    /// Stable identifier, unique among siblings.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown to the user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Path disambiguator.
    #[must_use]
    pub fn unique_string(&self) -> &str {
        &self.unique_string
    }

    /// Owning menu, `None` for roots.
    #[must_use]
    pub const fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Eligible to be drawn and receive input.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Children expanded (menus only).
    #[must_use]
    pub const fn is_toggled(&self) -> bool {
        self.toggled
    }

    /// Top-left corner recorded at the last draw.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Row width assigned by the parent at the last draw.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Row index within the parent column at the last draw.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

pub(crate) struct MenuNode {
    children: HashMap<String, ComponentId>,
    /// Display order.
    order: Vec<ComponentId>,
    /// Owning script identity (roots).
    owner: Option<String>,
    listeners: Vec<ChangeListener>,
}

pub(crate) struct ItemNode {
    tag: ValueTag,
    slot: Option<ValueSlot>,
}

pub(crate) enum NodeKind {
    Menu(MenuNode),
    Item(ItemNode),
}

pub(crate) struct Node {
    base: ComponentBase,
    kind: NodeKind,
}

/// Arena of all components plus the ordered list of roots.
pub struct MenuTree {
    nodes: HashMap<ComponentId, Node>,
    roots: Vec<ComponentId>,
    next_id: u32,
    factory: ValueFactory,
    storage: StorageRoot,
}

impl MenuTree {
    /// Creates an empty tree saving under `storage`.
    #[must_use]
    pub fn new(storage: StorageRoot) -> Self {
        Self {
            nodes: HashMap::with_capacity(128),
            roots: Vec::with_capacity(8),
            next_id: 1,
            factory: ValueFactory::new(),
            storage,
        }
    }

    /// Default-value registry used by [`Item::of`].
    pub fn factory_mut(&mut self) -> &mut ValueFactory {
        &mut self.factory
    }

    /// Where save files go.
    #[must_use]
    pub fn storage(&self) -> &StorageRoot {
        &self.storage
    }

    fn next_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        id
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Registers a top-level menu.
    ///
    /// # Errors
    ///
    /// [`MenuError::DuplicateName`] if a root with the same name exists.
    pub fn add_root(&mut self, menu: Menu) -> MenuResult<ComponentId> {
        let clash = self
            .roots
            .iter()
            .any(|id| self.nodes.get(id).is_some_and(|n| n.base.name == menu.name));
        if clash {
            return Err(MenuError::DuplicateName {
                parent: ROOT_NAME.to_string(),
                name: menu.name,
            });
        }

        let id = self.next_id();
        let mut node = Self::menu_node(menu);
        node.base.visible = true;
        self.nodes.insert(id, node);
        self.roots.push(id);
        Ok(id)
    }

    /// Attaches `component` under the menu `parent`.
    ///
    /// A child added to an expanded menu is visible immediately.
    ///
    /// # Errors
    ///
    /// [`MenuError::DuplicateName`] if `parent` already has a child with the
    /// same name (the menu is left unchanged), [`MenuError::NotAMenu`] if
    /// `parent` is an item, [`MenuError::UnknownComponent`] for a stale id.
    pub fn add(
        &mut self,
        parent: ComponentId,
        component: impl Into<Component>,
    ) -> MenuResult<ComponentId> {
        let component = component.into();
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or(MenuError::UnknownComponent(parent))?;
        let NodeKind::Menu(menu) = &parent_node.kind else {
            return Err(MenuError::NotAMenu(parent_node.base.name.clone()));
        };
        if menu.children.contains_key(component.name()) {
            return Err(MenuError::DuplicateName {
                parent: parent_node.base.name.clone(),
                name: component.name().to_string(),
            });
        }
        let visible = parent_node.base.visible && parent_node.base.toggled;

        let id = self.next_id();
        let mut node = match component {
            Component::Menu(menu) => Self::menu_node(menu),
            Component::Item(item) => {
                let value = match item.initial {
                    InitialValue::Given(value) => value,
                    InitialValue::Default(tag) => self.factory.create(tag),
                };
                Node {
                    base: ComponentBase::new(item.name, item.display_name, item.unique_string),
                    kind: NodeKind::Item(ItemNode {
                        tag: value.tag(),
                        slot: Some(ValueSlot::new(value, id)),
                    }),
                }
            }
        };
        node.base.parent = Some(parent);
        node.base.visible = visible;
        let name = node.base.name.clone();
        self.nodes.insert(id, node);

        if let Some(NodeKind::Menu(menu)) = self.nodes.get_mut(&parent).map(|n| &mut n.kind) {
            menu.children.insert(name, id);
            menu.order.push(id);
        }
        Ok(id)
    }

    fn menu_node(menu: Menu) -> Node {
        Node {
            base: ComponentBase::new(menu.name, menu.display_name, menu.unique_string),
            kind: NodeKind::Menu(MenuNode {
                children: HashMap::new(),
                order: Vec::new(),
                owner: menu.owner,
                listeners: Vec::new(),
            }),
        }
    }

    /// Detaches the child `name` of `parent` together with its subtree.
    ///
    /// Returns the removed id; `None` (and no change) if there is no such
    /// child.
    pub fn remove(&mut self, parent: ComponentId, name: &str) -> Option<ComponentId> {
        let Some(NodeKind::Menu(menu)) = self.nodes.get_mut(&parent).map(|n| &mut n.kind) else {
            return None;
        };
        let id = menu.children.remove(name)?;
        menu.order.retain(|&child| child != id);
        self.drop_subtree(id);
        Some(id)
    }

    /// Removes a root menu and its subtree.
    pub fn remove_root(&mut self, id: ComponentId) -> bool {
        let before = self.roots.len();
        self.roots.retain(|&root| root != id);
        if self.roots.len() == before {
            return false;
        }
        self.drop_subtree(id);
        true
    }

    fn drop_subtree(&mut self, id: ComponentId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(Node {
                kind: NodeKind::Menu(menu),
                ..
            }) = self.nodes.remove(&current)
            {
                stack.extend(menu.order);
            }
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Child of `parent` named `name`. Never fails.
    #[must_use]
    pub fn child(&self, parent: ComponentId, name: &str) -> Option<ComponentId> {
        match &self.nodes.get(&parent)?.kind {
            NodeKind::Menu(menu) => menu.children.get(name).copied(),
            NodeKind::Item(_) => None,
        }
    }

    /// Resolves a chain of names starting at a root name.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<ComponentId> {
        let (first, rest) = path.split_first()?;
        let mut current = self
            .roots
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.base.name == *first))?;
        for name in rest {
            current = self.child(current, name)?;
        }
        Some(current)
    }

    /// Whether `id` refers to a live component.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Shared state of a component.
    #[must_use]
    pub fn base(&self, id: ComponentId) -> Option<&ComponentBase> {
        self.nodes.get(&id).map(|n| &n.base)
    }

    pub(crate) fn base_mut(&mut self, id: ComponentId) -> Option<&mut ComponentBase> {
        self.nodes.get_mut(&id).map(|n| &mut n.base)
    }

    /// Kind of a component.
    #[must_use]
    pub fn kind(&self, id: ComponentId) -> Option<ComponentKind> {
        self.nodes.get(&id).map(|n| match &n.kind {
            NodeKind::Menu(_) => ComponentKind::Menu,
            NodeKind::Item(item) => ComponentKind::Item(item.tag),
        })
    }

    /// Whether `id` is a menu.
    #[must_use]
    pub fn is_menu(&self, id: ComponentId) -> bool {
        matches!(self.kind(id), Some(ComponentKind::Menu))
    }

    /// Whether `id` is visible.
    #[must_use]
    pub fn is_visible(&self, id: ComponentId) -> bool {
        self.base(id).is_some_and(ComponentBase::is_visible)
    }

    /// Whether `id` is expanded.
    #[must_use]
    pub fn is_toggled(&self, id: ComponentId) -> bool {
        self.base(id).is_some_and(ComponentBase::is_toggled)
    }

    /// Children of a menu in display order; empty for items.
    #[must_use]
    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        match self.nodes.get(&id).map(|n| &n.kind) {
            Some(NodeKind::Menu(menu)) => &menu.order,
            _ => &[],
        }
    }

    /// Root menus in registration order.
    #[must_use]
    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    /// `start` and all its descendants, depth-first, display order.
    #[must_use]
    pub fn depth_first(&self, start: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        if !self.contains(start) {
            return out;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            // Reverse so children come out left-to-right.
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Name for diagnostics; `<unknown>` for stale ids.
    #[must_use]
    pub fn name_of(&self, id: ComponentId) -> String {
        self.base(id)
            .map_or_else(|| "<unknown>".to_string(), |b| b.name.clone())
    }

    /// Changes the presentation name.
    pub fn set_display_name(&mut self, id: ComponentId, display_name: impl Into<String>) {
        if let Some(base) = self.base_mut(id) {
            base.display_name = display_name.into();
        }
    }

    // =========================================================================
    // Toggle / visibility cascade
    // =========================================================================

    /// Expands or collapses a menu.
    ///
    /// Collapsing hides every descendant and clears every descendant's own
    /// `toggled`. Expanding shows the direct children, re-shows the children
    /// of sub-menus that are themselves still expanded, and collapses every
    /// expanded sibling menu (roots among roots, sub-menus among the
    /// parent's children).
    pub fn set_toggled(&mut self, id: ComponentId, toggled: bool) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.base.toggled = toggled;
        self.cascade(id, toggled);

        if toggled {
            for sibling in self.sibling_menus(id) {
                if self.is_toggled(sibling) {
                    self.set_toggled(sibling, false);
                }
            }
        }
    }

    fn cascade(&mut self, id: ComponentId, toggled: bool) {
        let mut stack = vec![id];
        while let Some(menu) = stack.pop() {
            let children = self.children(menu).to_vec();
            for child in children {
                let Some(node) = self.nodes.get_mut(&child) else {
                    continue;
                };
                node.base.visible = toggled;
                if !toggled {
                    node.base.toggled = false;
                }
                let is_menu = matches!(node.kind, NodeKind::Menu(_));
                if is_menu && (!toggled || node.base.toggled) {
                    stack.push(child);
                }
            }
        }
    }

    /// Menus sharing a parent with `id` (or all other roots, for a root).
    #[must_use]
    pub fn sibling_menus(&self, id: ComponentId) -> Vec<ComponentId> {
        let peers = match self.base(id).and_then(ComponentBase::parent) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        };
        peers
            .iter()
            .copied()
            .filter(|&peer| peer != id && self.is_menu(peer))
            .collect()
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn item_node(&self, id: ComponentId) -> MenuResult<(&ComponentBase, &ItemNode)> {
        let node = self.nodes.get(&id).ok_or(MenuError::UnknownComponent(id))?;
        match &node.kind {
            NodeKind::Item(item) => Ok((&node.base, item)),
            NodeKind::Menu(_) => Err(MenuError::NotAnItem(node.base.name.clone())),
        }
    }

    fn item_node_mut(&mut self, id: ComponentId) -> MenuResult<(&ComponentBase, &mut ItemNode)> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(MenuError::UnknownComponent(id))?;
        match &mut node.kind {
            NodeKind::Item(item) => Ok((&node.base, item)),
            NodeKind::Menu(_) => Err(MenuError::NotAnItem(node.base.name.clone())),
        }
    }

    /// Value slot of an item; `None` for menus, stale ids and empty slots.
    #[must_use]
    pub fn slot(&self, id: ComponentId) -> Option<&ValueSlot> {
        self.item_node(id).ok()?.1.slot.as_ref()
    }

    /// Value of an item; `None` for menus, stale ids and empty slots.
    #[must_use]
    pub fn item_value(&self, id: ComponentId) -> Option<&Value> {
        self.slot(id).map(ValueSlot::value)
    }

    /// Typed value of the child `name` of `menu`.
    ///
    /// # Errors
    ///
    /// [`MenuError::NotFound`] if there is no such child,
    /// [`MenuError::WrongKind`] if it holds another kind of value.
    pub fn value<T: ValueKind>(&self, menu: ComponentId, name: &str) -> MenuResult<&T> {
        let id = self.child(menu, name).ok_or_else(|| MenuError::NotFound {
            parent: self.name_of(menu),
            name: name.to_string(),
        })?;
        self.typed(id)
    }

    /// Mutable typed value of the child `name` of `menu`.
    ///
    /// Changes made through the reference do not notify subscribers; use
    /// [`MenuTree::modify`] for that.
    ///
    /// # Errors
    ///
    /// Same as [`MenuTree::value`].
    pub fn value_mut<T: ValueKind>(&mut self, menu: ComponentId, name: &str) -> MenuResult<&mut T> {
        let id = self.child(menu, name).ok_or_else(|| MenuError::NotFound {
            parent: self.name_of(menu),
            name: name.to_string(),
        })?;
        self.typed_mut(id)
    }

    /// Typed value of an item.
    ///
    /// # Errors
    ///
    /// [`MenuError::WrongKind`], [`MenuError::NotAnItem`],
    /// [`MenuError::MissingValue`] or [`MenuError::UnknownComponent`].
    pub fn typed<T: ValueKind>(&self, id: ComponentId) -> MenuResult<&T> {
        let (base, item) = self.item_node(id)?;
        let slot = item
            .slot
            .as_ref()
            .ok_or_else(|| MenuError::MissingValue(base.name.clone()))?;
        T::from_value(slot.value()).ok_or_else(|| MenuError::WrongKind {
            name: base.name.clone(),
            expected: T::TAG,
            actual: slot.value().tag(),
        })
    }

    /// Mutable typed value of an item. Does not notify.
    ///
    /// # Errors
    ///
    /// Same as [`MenuTree::typed`].
    pub fn typed_mut<T: ValueKind>(&mut self, id: ComponentId) -> MenuResult<&mut T> {
        let (base, item) = self.item_node_mut(id)?;
        let Some(slot) = item.slot.as_mut() else {
            return Err(MenuError::MissingValue(base.name.clone()));
        };
        let actual = slot.value().tag();
        T::from_value_mut(slot.value_mut()).ok_or_else(|| MenuError::WrongKind {
            name: base.name.clone(),
            expected: T::TAG,
            actual,
        })
    }

    /// Mutates an item's value and notifies subscribers if `f` reports a
    /// change.
    ///
    /// # Errors
    ///
    /// Same as [`MenuTree::typed`]; `f` is not called on error.
    pub fn modify<T, F>(&mut self, id: ComponentId, f: F) -> MenuResult<bool>
    where
        T: ValueKind,
        F: FnOnce(&mut T) -> bool,
    {
        let changed = f(self.typed_mut::<T>(id)?);
        if changed {
            self.notify_changed(id);
        }
        Ok(changed)
    }

    /// Replaces an item's value, keeping its subscribers, and notifies.
    ///
    /// Returns the previous value (`None` if the slot was empty).
    ///
    /// # Errors
    ///
    /// [`MenuError::NotAnItem`] or [`MenuError::UnknownComponent`].
    pub fn set_value(&mut self, id: ComponentId, value: impl Into<Value>) -> MenuResult<Option<Value>> {
        let value = value.into();
        let (_, item) = self.item_node_mut(id)?;
        item.tag = value.tag();
        let previous = match item.slot.as_mut() {
            Some(slot) => Some(slot.replace(value)),
            None => {
                item.slot = Some(ValueSlot::new(value, id));
                None
            }
        };
        self.notify_changed(id);
        Ok(previous)
    }

    /// Detaches an item's value, leaving the slot empty.
    ///
    /// An empty item is skipped (with an error log) when drawn, routed,
    /// saved or loaded.
    ///
    /// # Errors
    ///
    /// [`MenuError::NotAnItem`] or [`MenuError::UnknownComponent`].
    pub fn take_value(&mut self, id: ComponentId) -> MenuResult<Option<Value>> {
        let (_, item) = self.item_node_mut(id)?;
        Ok(item.slot.take().map(|mut slot| slot.replace(Value::default_for(item.tag))))
    }

    /// Restores an item's value to its kind default from the factory.
    ///
    /// # Errors
    ///
    /// [`MenuError::NotAnItem`] or [`MenuError::UnknownComponent`].
    pub fn reset(&mut self, id: ComponentId) -> MenuResult<bool> {
        let tag = match self.kind(id) {
            Some(ComponentKind::Item(tag)) => tag,
            Some(ComponentKind::Menu) => return Err(MenuError::NotAnItem(self.name_of(id))),
            None => return Err(MenuError::UnknownComponent(id)),
        };
        let fresh = self.factory.create(tag);
        if self.item_value(id) == Some(&fresh) {
            return Ok(false);
        }
        self.set_value(id, fresh)?;
        Ok(true)
    }

    /// Subscribes to changes of one item.
    ///
    /// # Errors
    ///
    /// [`MenuError::NotAnItem`], [`MenuError::MissingValue`] or
    /// [`MenuError::UnknownComponent`].
    pub fn subscribe<F>(&mut self, id: ComponentId, listener: F) -> MenuResult<()>
    where
        F: FnMut(&ValueChanged) + Send + 'static,
    {
        let (base, item) = self.item_node_mut(id)?;
        let Some(slot) = item.slot.as_mut() else {
            return Err(MenuError::MissingValue(base.name.clone()));
        };
        slot.subscribe(Box::new(listener));
        Ok(())
    }

    /// Subscribes to changes of any item below `menu`.
    ///
    /// # Errors
    ///
    /// [`MenuError::NotAMenu`] or [`MenuError::UnknownComponent`].
    pub fn on_value_changed<F>(&mut self, menu: ComponentId, listener: F) -> MenuResult<()>
    where
        F: FnMut(&ValueChanged) + Send + 'static,
    {
        let node = self
            .nodes
            .get_mut(&menu)
            .ok_or(MenuError::UnknownComponent(menu))?;
        match &mut node.kind {
            NodeKind::Menu(menu) => {
                menu.listeners.push(Box::new(listener));
                Ok(())
            }
            NodeKind::Item(_) => Err(MenuError::NotAMenu(node.base.name.clone())),
        }
    }

    /// Fires the item's subscribers, then every ancestor menu's.
    pub(crate) fn notify_changed(&mut self, id: ComponentId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let parent = node.base.parent;
        let NodeKind::Item(item) = &mut node.kind else {
            return;
        };
        let Some(slot) = item.slot.as_mut() else {
            return;
        };
        let event = ValueChanged {
            item: id,
            name: node.base.name.clone(),
            value: slot.value().clone(),
        };
        slot.notify(&event);

        let mut cursor = parent;
        while let Some(menu_id) = cursor {
            let Some(node) = self.nodes.get_mut(&menu_id) else {
                break;
            };
            if let NodeKind::Menu(menu) = &mut node.kind {
                for listener in &mut menu.listeners {
                    listener(&event);
                }
            }
            cursor = node.base.parent;
        }
    }

    pub(crate) fn owner_of(&self, root: ComponentId) -> Option<&str> {
        match &self.nodes.get(&root)?.kind {
            NodeKind::Menu(menu) => menu.owner.as_deref(),
            NodeKind::Item(_) => None,
        }
    }

    /// Ids of every item holding a value of `tag`.
    pub(crate) fn items_of(&self, tag: ValueTag) -> Vec<ComponentId> {
        let mut ids: Vec<ComponentId> = self
            .nodes
            .iter()
            .filter(|(_, node)| matches!(&node.kind, NodeKind::Item(item) if item.tag == tag))
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
