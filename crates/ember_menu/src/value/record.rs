//! On-disk schema for item values.
//!
//! One file per item:
//!
//! ```toml
//! version = 1
//!
//! [value]
//! kind = "slider"
//! value = 40
//! ```
//!
//! New optional fields get `#[serde(default)]` and unknown fields are
//! ignored, so older files keep loading after a field is added. Bumping
//! [`SCHEMA_VERSION`] is reserved for breaking changes.

use serde::{Deserialize, Serialize};

use super::kinds::{KeyBind, KeyBindMode};
use super::{Value, ValueTag};
use crate::input::Key;
use crate::style::Color;

/// Newest schema version this build writes and reads.
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level document of a save file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedValue {
    /// Schema version the file was written with.
    pub version: u32,
    /// The value record.
    pub value: ValueRecord,
}

impl SavedValue {
    /// Wraps a record with the current schema version.
    #[must_use]
    pub const fn current(value: ValueRecord) -> Self {
        Self {
            version: SCHEMA_VERSION,
            value,
        }
    }
}

fn full_alpha() -> f32 {
    1.0
}

/// Persisted fields of one value, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueRecord {
    /// See [`super::BoolValue`].
    Bool {
        /// Switch state.
        value: bool,
    },
    /// See [`super::SliderValue`]. Bounds come from code, not the file.
    Slider {
        /// Slider value.
        value: i32,
    },
    /// See [`super::SliderButtonValue`].
    SliderButton {
        /// Slider value.
        value: i32,
        /// Switch state.
        #[serde(default)]
        enabled: bool,
    },
    /// See [`super::ListValue`].
    List {
        /// Selected index.
        index: usize,
        /// Selected label; preferred over `index` when the label still exists.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// See [`super::ColorValue`].
    Color {
        /// Red.
        r: f32,
        /// Green.
        g: f32,
        /// Blue.
        b: f32,
        /// Alpha.
        #[serde(default = "full_alpha")]
        a: f32,
    },
    /// See [`super::KeyBindValue`].
    KeyBind {
        /// Bound key.
        key: Key,
        /// Reaction mode.
        #[serde(default)]
        mode: KeyBindMode,
        /// Active flag.
        #[serde(default)]
        active: bool,
    },
    /// See [`super::TextValue`].
    Text {
        /// The text.
        text: String,
    },
}

impl ValueRecord {
    /// Kind this record restores.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        match self {
            Self::Bool { .. } => ValueTag::Bool,
            Self::Slider { .. } => ValueTag::Slider,
            Self::SliderButton { .. } => ValueTag::SliderButton,
            Self::List { .. } => ValueTag::List,
            Self::Color { .. } => ValueTag::Color,
            Self::KeyBind { .. } => ValueTag::KeyBind,
            Self::Text { .. } => ValueTag::Text,
        }
    }
}

/// A record was applied to a value of another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMismatch {
    /// Kind of the live value.
    pub expected: ValueTag,
    /// Kind found in the record.
    pub found: ValueTag,
}

impl Value {
    /// Extracts the persisted fields, or `None` for display-only kinds.
    #[must_use]
    pub fn to_record(&self) -> Option<ValueRecord> {
        let record = match self {
            Self::Bool(v) => ValueRecord::Bool { value: v.get() },
            Self::Slider(v) => ValueRecord::Slider { value: v.get() },
            Self::SliderButton(v) => ValueRecord::SliderButton {
                value: v.slider.get(),
                enabled: v.enabled(),
            },
            Self::List(v) => ValueRecord::List {
                index: v.index(),
                label: v.selected().map(str::to_string),
            },
            Self::Color(v) => {
                let c = v.get();
                ValueRecord::Color {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                    a: c.a,
                }
            }
            Self::KeyBind(v) => {
                let bind = v.get();
                ValueRecord::KeyBind {
                    key: bind.key,
                    mode: bind.mode,
                    active: bind.active,
                }
            }
            Self::Text(v) => ValueRecord::Text {
                text: v.get().to_string(),
            },
            Self::Separator(_) => return None,
        };
        Some(record)
    }

    /// Writes a record's fields into this value in place.
    ///
    /// Code-defined shape (slider bounds, list labels) is kept; only the
    /// user's choice is restored, clamped to that shape.
    ///
    /// # Errors
    ///
    /// Returns [`RecordMismatch`] if the record is for another kind.
    pub fn apply_record(&mut self, record: &ValueRecord) -> Result<(), RecordMismatch> {
        match (self, record) {
            (Self::Bool(v), ValueRecord::Bool { value }) => {
                v.set(*value);
            }
            (Self::Slider(v), ValueRecord::Slider { value }) => {
                v.set(*value);
            }
            (Self::SliderButton(v), ValueRecord::SliderButton { value, enabled }) => {
                v.slider.set(*value);
                v.set_enabled(*enabled);
            }
            (Self::List(v), ValueRecord::List { index, label }) => {
                let by_label = label
                    .as_deref()
                    .and_then(|label| v.items().iter().position(|item| item == label));
                v.select(by_label.unwrap_or(*index));
            }
            (Self::Color(v), ValueRecord::Color { r, g, b, a }) => {
                v.set(Color::rgba(*r, *g, *b, *a));
            }
            (Self::KeyBind(v), ValueRecord::KeyBind { key, mode, active }) => {
                v.set(KeyBind {
                    key: *key,
                    mode: *mode,
                    active: *active,
                });
            }
            (Self::Text(v), ValueRecord::Text { text }) => {
                v.set(text.clone());
            }
            (live, record) => {
                return Err(RecordMismatch {
                    expected: live.tag(),
                    found: record.tag(),
                })
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ListValue, SliderValue, TextValue};

    #[test]
    fn test_slider_record_clamped_to_live_bounds() {
        let mut live: Value = SliderValue::new(5, 0, 10).into();
        live.apply_record(&ValueRecord::Slider { value: 99 })
            .expect("same kind");
        assert_eq!(live, SliderValue::new(10, 0, 10).into());
    }

    #[test]
    fn test_list_prefers_label_over_index() {
        let mut live: Value = ListValue::new(["b", "a", "c"], 0).into();
        let record = ValueRecord::List {
            index: 0,
            label: Some("c".to_string()),
        };
        live.apply_record(&record).expect("same kind");
        assert_eq!(live, ListValue::new(["b", "a", "c"], 2).into());
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut live: Value = TextValue::new("x").into();
        let err = live
            .apply_record(&ValueRecord::Bool { value: true })
            .expect_err("different kind");
        assert_eq!(err.expected, ValueTag::Text);
        assert_eq!(err.found, ValueTag::Bool);
    }

    #[test]
    fn test_document_format_is_stable() {
        let doc = SavedValue::current(ValueRecord::Slider { value: 40 });
        let text = toml::to_string(&doc).expect("serialize");
        assert!(text.contains("version = 1"));
        assert!(text.contains("kind = \"slider\""));

        let parsed: SavedValue = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let text = "version = 1\n[value]\nkind = \"key_bind\"\nkey = \"F5\"\nfuture_field = 3\n";
        let parsed: SavedValue = toml::from_str(text).expect("parse");
        assert_eq!(
            parsed.value,
            ValueRecord::KeyBind {
                key: Key::F5,
                mode: KeyBindMode::Toggle,
                active: false,
            }
        );
    }
}
