//! Command tree resolution and usage rendering.
//!
//! This crate resolves a flat list of command-line tokens against a
//! statically declared, arbitrarily nested command tree:
//!
//! - [`Node`]: a tree node with an optional command facet
//!   ([`CommandSpec`]) and ordered children.
//! - [`OptionSchema`]: a node's flag names grouped by [`OptionType`], the
//!   input of a [`FlagParser`].
//! - [`Resolver`]: walks tokens through namespaces, commands and aliases and
//!   produces an [`Invocation`] with fixed-arity positional arguments and
//!   parsed flags.
//! - [`Registry`]: maps handler locations to callables and dispatches
//!   invocations.
//! - [`render_help`]: aligned usage text for a tree.
//!
//! Trees are usually loaded from JSON or YAML documents ([`load_tree`]) and
//! checked with [`validate_tree`].
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = Node::from_yaml_str(r#"
//! options:
//!   - short: h
//!     long: help
//! handler: true
//! install:
//!   alias: i
//!   requiredArgs: app
//!   description: Install the given app
//! workspace:
//!   list:
//!     description: List available workspaces
//! "#)
//! .unwrap();
//! assert!(validate_tree(&tree).is_empty());
//!
//! let resolver = Resolver::new(&tree);
//! let found = resolver.resolve(&["i", "cool-app"]).unwrap();
//! assert_eq!(found.path, ["install"]);
//! assert_eq!(found.arg("app"), Some("cool-app"));
//!
//! let found = resolver.resolve(&["workspace", "list"]).unwrap();
//! assert_eq!(found.path, ["workspace", "list"]);
//!
//! assert!(matches!(
//!     resolver.resolve(&["workspace", "foo"]),
//!     Err(ResolveError::CommandNotFound { .. })
//! ));
//! ```

pub mod classify;
mod error;
mod flags;
mod help;
mod invoke;
mod loader;
mod resolve;
mod schema;
mod types;
mod validate;

pub use error::{HandlerError, InvokeError, LoadError, ResolveError, Result};
pub use flags::{FlagParser, FlagValue, Flags, LenientParser, ParsedArgs};
pub use help::render_help;
pub use invoke::{HandlerFn, Registry};
pub use loader::load_tree;
pub use resolve::{Invocation, Resolver};
pub use schema::OptionSchema;
pub use types::*;
pub use validate::{ValidationError, validate_tree};
