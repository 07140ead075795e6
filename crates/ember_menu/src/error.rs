//! # Menu Error Types
//!
//! Structural errors (duplicate names, missing children, wrong value kinds)
//! are script-author mistakes and are returned to the caller. Persistence
//! errors are caught per component by the load/save cascades and logged.

use std::path::PathBuf;

use thiserror::Error;

use crate::tree::ComponentId;
use crate::value::ValueTag;

/// Errors that can occur in the menu system.
#[derive(Error, Debug)]
pub enum MenuError {
    /// A sibling with the same name is already attached.
    #[error("component `{name}` already exists in menu `{parent}`")]
    DuplicateName {
        /// Name of the menu that rejected the child.
        parent: String,
        /// The clashing name.
        name: String,
    },

    /// No child with that name exists.
    #[error("component `{name}` not found in menu `{parent}`")]
    NotFound {
        /// Name of the menu that was searched.
        parent: String,
        /// The missing name.
        name: String,
    },

    /// The item holds a different kind of value than requested.
    #[error("component `{name}` holds a {actual} value, not a {expected} value")]
    WrongKind {
        /// Item name.
        name: String,
        /// Requested kind.
        expected: ValueTag,
        /// Kind actually held.
        actual: ValueTag,
    },

    /// A menu operation was attempted on an item.
    #[error("component `{0}` is not a menu")]
    NotAMenu(String),

    /// A value operation was attempted on a menu.
    #[error("component `{0}` is not an item")]
    NotAnItem(String),

    /// The id does not refer to a live component.
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),

    /// The item's value slot is empty.
    #[error("item `{0}` has no value")]
    MissingValue(String),

    /// Filesystem failure while reading or writing a save file.
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A save file exists but cannot be understood.
    #[error("corrupt save file {}: {message}", path.display())]
    Parse {
        /// File involved.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A value could not be encoded.
    #[error("cannot serialize {}: {message}", path.display())]
    Serialize {
        /// Destination file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A save file was written by a newer schema.
    #[error("save file {} has schema version {found}, newest supported is {supported}", path.display())]
    UnsupportedVersion {
        /// File involved.
        path: PathBuf,
        /// Version found in the file.
        found: u32,
        /// Newest version this build reads.
        supported: u32,
    },

    /// No theme is registered under that name.
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),

    /// Menu configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for menu operations.
pub type MenuResult<T> = Result<T, MenuError>;
