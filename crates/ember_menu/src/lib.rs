//! # EMBER Menu System
//!
//! Retained-mode configuration overlay for game-client scripts:
//! - Named component tree (menus own menus and items)
//! - Typed leaf values with change subscribers
//! - Swappable skins that never own component state
//! - One save file per leaf value, restored on the next run
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      MENU PIPELINE                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  Host Input → RootRegistry → MenuTree → Drawable.on_input │
//! │  Host Draw  → RootRegistry → MenuTree → Drawable.draw     │
//! │       ↓             ↓            ↓             ↓          │
//! │   Triggers     ThemeContext   Layout     RenderCommands   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use ember_menu::{Item, Menu, MenuConfig, RootRegistry};
//! use ember_menu::value::{BoolValue, SliderValue};
//!
//! # fn main() -> ember_menu::MenuResult<()> {
//! let mut registry = RootRegistry::new(MenuConfig::default())?;
//! let combat = registry.add(Menu::new("combat", "Combat"))?;
//! registry.add_component(combat, Item::new("enabled", "Enabled", BoolValue::new(false)))?;
//! registry.add_component(combat, Item::new("fov", "FOV", SliderValue::new(90, 10, 180)))?;
//!
//! let fov = registry.tree().value::<SliderValue>(combat, "fov")?.get();
//! assert_eq!(fov, 90);
//! registry.on_unload();
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod registry;
pub mod render;
pub mod style;
pub mod theme;
pub mod tree;
pub mod value;

pub use config::MenuConfig;
pub use error::{MenuError, MenuResult};
pub use input::{InputEvent, Key, MessageKind, MouseButton, RawInput};
pub use layout::Rect;
pub use registry::RootRegistry;
pub use render::{RenderCommand, UIBatch, UIRenderer};
pub use style::{Color, Palette};
pub use theme::{Drawable, Theme, ThemeContext, ThemeRegistry};
pub use tree::{Component, ComponentId, ComponentKind, Item, Menu, MenuTree};
pub use value::{Value, ValueKind, ValueTag};
