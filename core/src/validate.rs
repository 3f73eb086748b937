//! Tree validation.
//!
//! Catches structural problems that resolution would otherwise silently
//! paper over: options without a name, malformed flag names, duplicate flags
//! in one command, empty keys, and aliases that shadow or repeat sibling
//! keys.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = Node::command(CommandSpec::new().with_option(OptionDecl::boolean(Some("h"), Some("help"))))
//!     .with_child("install", Node::command(CommandSpec::new().with_alias("i")));
//! assert!(validate_tree(&tree).is_empty());
//!
//! // Invalid: alias shadows a sibling key
//! let bad = tree.with_child("i", Node::command(CommandSpec::new()));
//! assert!(!validate_tree(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandSpec, Node};

/// Tree validation errors.
///
/// Paths are the space-separated keys from the root (`<root>` for the root).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An option has neither a short nor a long name.
    #[error("option at '{0}' must define short or long form")]
    MissingOptionName(String),
    /// A short name is not exactly one character, or carries dashes.
    #[error("invalid short option '{name}' at '{path}'")]
    InvalidShortOption {
        /// Command path.
        path: String,
        /// Offending name.
        name: String,
    },
    /// A long name is a single character, or carries dashes.
    #[error("invalid long option '{name}' at '{path}'")]
    InvalidLongOption {
        /// Command path.
        path: String,
        /// Offending name.
        name: String,
    },
    /// Two options of one command share a name.
    #[error("duplicate option '{name}' at '{path}'")]
    DuplicateOption {
        /// Command path.
        path: String,
        /// Repeated name.
        name: String,
    },
    /// The same argument name appears twice in a command's arguments.
    #[error("duplicate argument '{name}' at '{path}'")]
    DuplicateArgument {
        /// Command path.
        path: String,
        /// Repeated name.
        name: String,
    },
    /// A child key is empty or whitespace-only.
    #[error("empty key under '{0}'")]
    EmptyKey(String),
    /// An alias equals a sibling key or another sibling's alias.
    #[error("alias '{alias}' at '{path}' collides with a sibling")]
    AliasCollision {
        /// Path of the aliased command.
        path: String,
        /// Colliding alias.
        alias: String,
    },
}

/// Validates a tree.
///
/// Stops at the first problem found, returning at most one error.
pub fn validate_tree(tree: &Node) -> Vec<ValidationError> {
    let mut path = Vec::new();
    validate_node(tree, &mut path)
}

fn validate_node(node: &Node, path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(spec) = &node.command {
        errors.extend(validate_command(spec, &display_path(path)));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors.extend(validate_children(node, path));
    errors
}

fn validate_children(node: &Node, path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let keys: HashSet<&str> = node.children.iter().map(|(key, _)| key.as_str()).collect();
    let mut aliases: HashSet<&str> = HashSet::new();

    for (key, child) in &node.children {
        if key.trim().is_empty() {
            errors.push(ValidationError::EmptyKey(display_path(path)));
            return errors;
        }

        path.push(key.clone());

        if let Some(alias) = child.command.as_ref().and_then(|spec| spec.alias.as_deref()) {
            if keys.contains(alias) || !aliases.insert(alias) {
                errors.push(ValidationError::AliasCollision {
                    path: display_path(path),
                    alias: alias.to_string(),
                });
                return errors;
            }
        }

        errors.extend(validate_node(child, path));
        path.pop();
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_command(spec: &CommandSpec, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut args = HashSet::new();
    for name in spec.required_args.iter().chain(&spec.optional_args) {
        if !args.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateArgument {
                path: path.to_string(),
                name: name.clone(),
            });
            return errors;
        }
    }

    let mut seen = HashSet::new();
    for option in &spec.options {
        if option.short.is_none() && option.long.is_none() {
            errors.push(ValidationError::MissingOptionName(path.to_string()));
            return errors;
        }

        if let Some(short) = &option.short {
            if short.chars().count() != 1 || short == "-" {
                errors.push(ValidationError::InvalidShortOption {
                    path: path.to_string(),
                    name: short.clone(),
                });
                return errors;
            }
            if !seen.insert(short.as_str()) {
                errors.push(ValidationError::DuplicateOption {
                    path: path.to_string(),
                    name: short.clone(),
                });
                return errors;
            }
        }

        if let Some(long) = &option.long {
            if long.chars().count() < 2 || long.starts_with('-') {
                errors.push(ValidationError::InvalidLongOption {
                    path: path.to_string(),
                    name: long.clone(),
                });
                return errors;
            }
            if !seen.insert(long.as_str()) {
                errors.push(ValidationError::DuplicateOption {
                    path: path.to_string(),
                    name: long.clone(),
                });
                return errors;
            }
        }
    }

    errors
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(" ")
    }
}
