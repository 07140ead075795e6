//! The concrete value kinds an item can hold.
//!
//! Every mutator returns `true` when the stored state actually changed; the
//! tree fires change notifications off that flag.

use serde::{Deserialize, Serialize};

use crate::input::Key;
use crate::style::Color;

/// On/off switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolValue {
    value: bool,
}

impl BoolValue {
    /// Creates a switch.
    #[must_use]
    pub const fn new(value: bool) -> Self {
        Self { value }
    }

    /// Current state.
    #[must_use]
    pub const fn get(&self) -> bool {
        self.value
    }

    /// Sets the state.
    pub fn set(&mut self, value: bool) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Flips the state. Always a change.
    pub fn toggle(&mut self) -> bool {
        self.value = !self.value;
        true
    }
}

/// Integer constrained to an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderValue {
    value: i32,
    min: i32,
    max: i32,
}

impl SliderValue {
    /// Creates a slider. Bounds are swapped if reversed; `value` is clamped.
    #[must_use]
    pub fn new(value: i32, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.value
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Sets the value, clamped to the range.
    pub fn set(&mut self, value: i32) -> bool {
        let value = value.clamp(self.min, self.max);
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Position of the value within the range, 0-1.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        let span = i64::from(self.max) - i64::from(self.min);
        if span == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = (i64::from(self.value) - i64::from(self.min)) as f32 / span as f32;
        ratio
    }

    /// Discretizes a 0-1 position to a value in range. Out-of-range ratios
    /// clamp to the bounds.
    #[must_use]
    pub fn value_at(&self, ratio: f32) -> i32 {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let span = i64::from(self.max) - i64::from(self.min);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let offset = (span as f64 * f64::from(ratio)).round() as i64;
        let value = (i64::from(self.min) + offset).clamp(i64::from(self.min), i64::from(self.max));
        // Clamped to [min, max], both of which are i32.
        i32::try_from(value).unwrap_or(self.min)
    }
}

impl Default for SliderValue {
    fn default() -> Self {
        Self::new(0, 0, 100)
    }
}

/// Slider with an independent on/off switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliderButtonValue {
    /// The slider part.
    pub slider: SliderValue,
    enabled: bool,
}

impl SliderButtonValue {
    /// Creates a slider with a switch.
    #[must_use]
    pub fn new(value: i32, min: i32, max: i32, enabled: bool) -> Self {
        Self {
            slider: SliderValue::new(value, min, max),
            enabled,
        }
    }

    /// Switch state.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the switch state.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }
}

/// One choice out of a list of labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValue {
    items: Vec<String>,
    index: usize,
}

impl ListValue {
    /// Creates a list. An out-of-range `index` falls back to 0.
    #[must_use]
    pub fn new<I, S>(items: I, index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let index = if index < items.len() { index } else { 0 };
        Self { items, index }
    }

    /// Labels in display order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Selected index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Selected label, if the list is not empty.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.items.get(self.index).map(String::as_str)
    }

    /// Selects by index; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    /// Selects by label.
    pub fn select_label(&mut self, label: &str) -> bool {
        match self.items.iter().position(|item| item == label) {
            Some(index) => self.select(index),
            None => false,
        }
    }
}

impl Default for ListValue {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), 0)
    }
}

/// RGBA color choice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorValue {
    color: Color,
}

impl ColorValue {
    /// Creates a color value.
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self { color }
    }

    /// Current color.
    #[must_use]
    pub const fn get(&self) -> Color {
        self.color
    }

    /// Replaces the color.
    pub fn set(&mut self, color: Color) -> bool {
        let changed = self.color != color;
        self.color = color;
        changed
    }

    /// Replaces one channel (0 = r .. 3 = a).
    pub fn set_channel(&mut self, index: usize, value: f32) -> bool {
        self.set(self.color.with_channel(index, value))
    }
}

/// How a key binding reacts to its key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyBindMode {
    /// Each release flips `active`.
    #[default]
    Toggle,
    /// `active` while the key is held.
    Press,
}

/// Key binding state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBind {
    /// Bound key.
    pub key: Key,
    /// Reaction mode.
    pub mode: KeyBindMode,
    /// Whether the binding is currently active.
    pub active: bool,
}

impl KeyBind {
    /// Creates an inactive binding.
    #[must_use]
    pub const fn new(key: Key, mode: KeyBindMode) -> Self {
        Self {
            key,
            mode,
            active: false,
        }
    }
}

/// Key binding value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindValue {
    bind: KeyBind,
}

impl KeyBindValue {
    /// Creates a binding value.
    #[must_use]
    pub const fn new(bind: KeyBind) -> Self {
        Self { bind }
    }

    /// Current binding.
    #[must_use]
    pub const fn get(&self) -> KeyBind {
        self.bind
    }

    /// Whether the binding is active.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.bind.active
    }

    /// Rebinds to another key. Deactivates the binding.
    pub fn set_key(&mut self, key: Key) -> bool {
        if self.bind.key == key {
            return false;
        }
        self.bind = KeyBind::new(key, self.bind.mode);
        true
    }

    /// Switches mode. Deactivates the binding.
    pub fn set_mode(&mut self, mode: KeyBindMode) -> bool {
        if self.bind.mode == mode {
            return false;
        }
        self.bind = KeyBind::new(self.bind.key, mode);
        true
    }

    /// Sets the active flag.
    pub fn set_active(&mut self, active: bool) -> bool {
        let changed = self.bind.active != active;
        self.bind.active = active;
        changed
    }

    /// Replaces the whole binding.
    pub fn set(&mut self, bind: KeyBind) -> bool {
        let changed = self.bind != bind;
        self.bind = bind;
        changed
    }

    /// Reacts to a key message for the bound key.
    pub fn on_key(&mut self, key: Key, down: bool) -> bool {
        if key != self.bind.key {
            return false;
        }
        match self.bind.mode {
            KeyBindMode::Press => self.set_active(down),
            KeyBindMode::Toggle if !down => self.set_active(!self.bind.active),
            KeyBindMode::Toggle => false,
        }
    }
}

impl Default for KeyBindValue {
    fn default() -> Self {
        Self::new(KeyBind::new(Key::Space, KeyBindMode::Press))
    }
}

/// Free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextValue {
    text: String,
}

impl TextValue {
    /// Longest text accepted from typing.
    pub const MAX_LEN: usize = 64;

    /// Creates a text value.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Current text.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Replaces the text.
    pub fn set(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        let changed = self.text != text;
        self.text = text;
        changed
    }

    /// Appends a typed character. Control characters are ignored.
    pub fn push(&mut self, character: char) -> bool {
        if character.is_control() || self.text.chars().count() >= Self::MAX_LEN {
            return false;
        }
        self.text.push(character);
        true
    }

    /// Deletes the last character.
    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }
}

/// Display-only divider. Holds no state and is never saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeparatorValue;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_clamps_and_discretizes() {
        let mut slider = SliderValue::new(150, 0, 100);
        assert_eq!(slider.get(), 100);

        assert!(slider.set(-5));
        assert_eq!(slider.get(), 0);
        assert!(!slider.set(-10));

        assert_eq!(slider.value_at(0.5), 50);
        assert_eq!(slider.value_at(-3.0), 0);
        assert_eq!(slider.value_at(7.0), 100);
        assert_eq!(slider.value_at(0.004), 0);
        assert_eq!(slider.value_at(0.006), 1);
    }

    #[test]
    fn test_slider_reversed_bounds() {
        let slider = SliderValue::new(5, 10, -10);
        assert_eq!((slider.min(), slider.max()), (-10, 10));
        assert!((slider.ratio() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_list_select() {
        let mut list = ListValue::new(["low", "mid", "high"], 1);
        assert_eq!(list.selected(), Some("mid"));
        assert!(!list.select(1));
        assert!(!list.select(3));
        assert!(list.select_label("high"));
        assert_eq!(list.index(), 2);

        let fallback = ListValue::new(["a"], 9);
        assert_eq!(fallback.index(), 0);
    }

    #[test]
    fn test_keybind_modes() {
        let mut toggle = KeyBindValue::new(KeyBind::new(Key::T, KeyBindMode::Toggle));
        assert!(!toggle.on_key(Key::T, true));
        assert!(toggle.on_key(Key::T, false));
        assert!(toggle.active());
        assert!(!toggle.on_key(Key::X, false));

        let mut press = KeyBindValue::new(KeyBind::new(Key::Space, KeyBindMode::Press));
        assert!(press.on_key(Key::Space, true));
        assert!(press.active());
        assert!(press.on_key(Key::Space, false));
        assert!(!press.active());
    }

    #[test]
    fn test_text_editing() {
        let mut text = TextValue::new("ab");
        assert!(text.push('c'));
        assert!(!text.push('\n'));
        assert!(text.backspace());
        assert_eq!(text.get(), "ab");
        assert!(!TextValue::default().backspace());
    }
}
