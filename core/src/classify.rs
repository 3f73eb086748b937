//! Structural classification of untagged tree documents.
//!
//! Tree documents (JSON or YAML) carry no type tags: whether an entry is a
//! command, a namespace or an option list follows from its shape alone. These
//! predicates encode that shape contract and are used when a document is
//! turned into a tagged [`Node`](crate::Node).
//!
//! # Examples
//!
//! ```
//! use command_tree_core::classify::{is_command, is_namespace, is_option_list};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "options": [{ "long": "verbose" }],
//!     "workspace": {
//!         "list": { "description": "List available workspaces" }
//!     }
//! });
//!
//! assert!(is_command(&doc));
//! assert!(is_namespace(&doc));
//! assert!(is_option_list(&doc["options"]));
//! assert!(is_namespace(&doc["workspace"]));
//! assert!(!is_command(&doc["workspace"]));
//! ```

use serde_json::Value;

/// Keys that mark an entry as invokable. They are never child keys.
pub const COMMAND_MARKERS: [&str; 6] = [
    "handler",
    "options",
    "requiredArgs",
    "optionalArgs",
    "alias",
    "description",
];

/// Combined classification of one document value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shape {
    /// Exposes at least one command marker.
    pub command: bool,
    /// Has at least one child that is a command.
    pub namespace: bool,
    /// Is an ordered sequence.
    pub option_list: bool,
}

/// Returns `true` if `key` is reserved for command attributes.
pub fn is_reserved_key(key: &str) -> bool {
    COMMAND_MARKERS.contains(&key)
}

/// An object exposing at least one of the command markers.
pub fn is_command(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| COMMAND_MARKERS.iter().any(|marker| map.contains_key(*marker)))
}

/// An object with at least one value that is itself a command.
///
/// Reserved keys are skipped so that e.g. an `options` list never counts.
pub fn is_namespace(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        map.iter()
            .any(|(key, child)| !is_reserved_key(key) && is_command(child))
    })
}

/// An ordered sequence, as used by the reserved `options` key.
pub fn is_option_list(value: &Value) -> bool {
    value.is_array()
}

/// Classifies a value on all three axes at once.
pub fn classify(value: &Value) -> Shape {
    Shape {
        command: is_command(value),
        namespace: is_namespace(value),
        option_list: is_option_list(value),
    }
}
