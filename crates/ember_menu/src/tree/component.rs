//! Detached component descriptions, attached with [`super::MenuTree::add`].

use crate::value::{Value, ValueKind, ValueTag};

/// A menu that is not yet part of a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub(crate) name: String,
    pub(crate) display_name: String,
    pub(crate) unique_string: String,
    pub(crate) owner: Option<String>,
}

impl Menu {
    /// Creates a menu description.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            unique_string: String::new(),
            owner: None,
        }
    }

    /// Disambiguates same-named menus of different owners in save paths.
    #[must_use]
    pub fn with_unique(mut self, unique_string: impl Into<String>) -> Self {
        self.unique_string = unique_string.into();
        self
    }

    /// Owning script identity; only meaningful for root menus.
    #[must_use]
    pub fn owned_by(mut self, identity: impl Into<String>) -> Self {
        self.owner = Some(identity.into());
        self
    }

    /// Stable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Where an item's initial value comes from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InitialValue {
    /// Supplied by the script.
    Given(Value),
    /// Built by the tree's [`crate::value::ValueFactory`].
    Default(ValueTag),
}

/// An item that is not yet part of a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub(crate) name: String,
    pub(crate) display_name: String,
    pub(crate) unique_string: String,
    pub(crate) initial: InitialValue,
}

impl Item {
    /// Creates an item holding `value`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            unique_string: String::new(),
            initial: InitialValue::Given(value.into()),
        }
    }

    /// Creates an item whose value is built by the tree's default factory.
    #[must_use]
    pub fn of<T: ValueKind>(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            unique_string: String::new(),
            initial: InitialValue::Default(T::TAG),
        }
    }

    /// Disambiguates same-named items in save paths.
    #[must_use]
    pub fn with_unique(mut self, unique_string: impl Into<String>) -> Self {
        self.unique_string = unique_string.into();
        self
    }

    /// Stable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Either kind of detached component.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// A sub-menu.
    Menu(Menu),
    /// A leaf item.
    Item(Item),
}

impl Component {
    /// Stable name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Menu(menu) => menu.name(),
            Self::Item(item) => item.name(),
        }
    }
}

impl From<Menu> for Component {
    fn from(menu: Menu) -> Self {
        Self::Menu(menu)
    }
}

impl From<Item> for Component {
    fn from(item: Item) -> Self {
        Self::Item(item)
    }
}
