//! Leaf values held by menu items.
//!
//! A [`Value`] is the datum; a [`ValueSlot`] wraps it with the owning item's
//! id and the change subscribers. Loading a save file rewrites the datum in
//! place, so subscribers survive.

mod factory;
mod kinds;
mod record;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::ComponentId;

pub use factory::ValueFactory;
pub use kinds::{
    BoolValue, ColorValue, KeyBind, KeyBindMode, KeyBindValue, ListValue, SeparatorValue,
    SliderButtonValue, SliderValue, TextValue,
};
pub use record::{RecordMismatch, SavedValue, ValueRecord, SCHEMA_VERSION};

/// Discriminant of a value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTag {
    /// [`BoolValue`]
    Bool,
    /// [`SliderValue`]
    Slider,
    /// [`SliderButtonValue`]
    SliderButton,
    /// [`ListValue`]
    List,
    /// [`ColorValue`]
    Color,
    /// [`KeyBindValue`]
    KeyBind,
    /// [`TextValue`]
    Text,
    /// [`SeparatorValue`]
    Separator,
}

impl ValueTag {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Bool,
        Self::Slider,
        Self::SliderButton,
        Self::List,
        Self::Color,
        Self::KeyBind,
        Self::Text,
        Self::Separator,
    ];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Slider => "slider",
            Self::SliderButton => "slider_button",
            Self::List => "list",
            Self::Color => "color",
            Self::KeyBind => "key_bind",
            Self::Text => "text",
            Self::Separator => "separator",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The datum of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// On/off switch.
    Bool(BoolValue),
    /// Integer range.
    Slider(SliderValue),
    /// Integer range with a switch.
    SliderButton(SliderButtonValue),
    /// Enumerated choice.
    List(ListValue),
    /// RGBA color.
    Color(ColorValue),
    /// Key binding.
    KeyBind(KeyBindValue),
    /// Free text.
    Text(TextValue),
    /// Display-only divider.
    Separator(SeparatorValue),
}

impl Value {
    /// Kind of this value.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        match self {
            Self::Bool(_) => ValueTag::Bool,
            Self::Slider(_) => ValueTag::Slider,
            Self::SliderButton(_) => ValueTag::SliderButton,
            Self::List(_) => ValueTag::List,
            Self::Color(_) => ValueTag::Color,
            Self::KeyBind(_) => ValueTag::KeyBind,
            Self::Text(_) => ValueTag::Text,
            Self::Separator(_) => ValueTag::Separator,
        }
    }

    /// Whether this kind is written to disk on save.
    #[must_use]
    pub const fn is_serializable(&self) -> bool {
        !matches!(self, Self::Separator(_))
    }

    /// Built-in default for a kind.
    #[must_use]
    pub fn default_for(tag: ValueTag) -> Self {
        match tag {
            ValueTag::Bool => BoolValue::default().into(),
            ValueTag::Slider => SliderValue::default().into(),
            ValueTag::SliderButton => SliderButtonValue::default().into(),
            ValueTag::List => ListValue::default().into(),
            ValueTag::Color => ColorValue::default().into(),
            ValueTag::KeyBind => KeyBindValue::default().into(),
            ValueTag::Text => TextValue::default().into(),
            ValueTag::Separator => SeparatorValue.into(),
        }
    }
}

/// Typed view of a [`Value`] variant.
pub trait ValueKind: Into<Value> + 'static {
    /// Tag of the variant.
    const TAG: ValueTag;

    /// Borrows the variant, if `value` is one.
    fn from_value(value: &Value) -> Option<&Self>;

    /// Mutably borrows the variant, if `value` is one.
    fn from_value_mut(value: &mut Value) -> Option<&mut Self>;
}

macro_rules! value_kind {
    ($ty:ty, $variant:ident) => {
        impl ValueKind for $ty {
            const TAG: ValueTag = ValueTag::$variant;

            fn from_value(value: &Value) -> Option<&Self> {
                match value {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut Value) -> Option<&mut Self> {
                match value {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(inner: $ty) -> Self {
                Value::$variant(inner)
            }
        }
    };
}

value_kind!(BoolValue, Bool);
value_kind!(SliderValue, Slider);
value_kind!(SliderButtonValue, SliderButton);
value_kind!(ListValue, List);
value_kind!(ColorValue, Color);
value_kind!(KeyBindValue, KeyBind);
value_kind!(TextValue, Text);
value_kind!(SeparatorValue, Separator);

/// Notification payload for a value change.
#[derive(Debug, Clone)]
pub struct ValueChanged {
    /// Item whose value changed.
    pub item: ComponentId,
    /// Item name.
    pub name: String,
    /// The value after the change.
    pub value: Value,
}

/// Change subscriber.
pub type ChangeListener = Box<dyn FnMut(&ValueChanged) + Send>;

/// A value together with its owner and subscribers.
pub struct ValueSlot {
    value: Value,
    owner: ComponentId,
    listeners: Vec<ChangeListener>,
}

impl ValueSlot {
    /// Wraps `value` for the item `owner`.
    #[must_use]
    pub fn new(value: Value, owner: ComponentId) -> Self {
        Self {
            value,
            owner,
            listeners: Vec::new(),
        }
    }

    /// The datum.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable datum. Changes made through here do not notify.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Swaps the datum, keeping subscribers. Returns the old datum.
    pub fn replace(&mut self, value: Value) -> Value {
        std::mem::replace(&mut self.value, value)
    }

    /// Owning item.
    #[must_use]
    pub const fn owner(&self) -> ComponentId {
        self.owner
    }

    /// Adds a change subscriber.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    /// Number of subscribers.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Calls every subscriber with `event`.
    pub fn notify(&mut self, event: &ValueChanged) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for ValueSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSlot")
            .field("value", &self.value)
            .field("owner", &self.owner)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_views() {
        let mut value: Value = SliderValue::new(3, 0, 10).into();
        assert_eq!(value.tag(), ValueTag::Slider);
        assert!(BoolValue::from_value(&value).is_none());

        if let Some(slider) = SliderValue::from_value_mut(&mut value) {
            assert!(slider.set(7));
        }
        assert_eq!(SliderValue::from_value(&value).map(SliderValue::get), Some(7));
    }

    #[test]
    fn test_defaults_cover_every_tag() {
        for tag in ValueTag::ALL {
            assert_eq!(Value::default_for(tag).tag(), tag);
        }
        assert!(!Value::default_for(ValueTag::Separator).is_serializable());
    }
}
