//! Option schemas handed to the flag parser.
//!
//! The parser needs to know, for every flag name, how to coerce its value.
//! [`OptionSchema::for_node`] groups a node's flag names by declared
//! [`OptionType`], keeping declaration order inside each group.
//!
//! # Example
//!
//! ```
//! use command_tree_core::{CommandSpec, Node, OptionDecl, OptionSchema, OptionType};
//!
//! let root = Node::command(
//!     CommandSpec::new()
//!         .with_option(OptionDecl::boolean(None, Some("verbose")))
//!         .with_option(OptionDecl::boolean(Some("h"), Some("help")))
//!         .with_option(OptionDecl::with_value(Some("n"), None, OptionType::Number)),
//! );
//!
//! let schema = OptionSchema::for_node(&root);
//! assert_eq!(schema.names(OptionType::Boolean), ["verbose", "h", "help"]);
//! assert_eq!(schema.names(OptionType::Number), ["n"]);
//! assert!(schema.names(OptionType::String).is_empty());
//! assert_eq!(schema.alias_of("h"), Some("help"));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Node, OptionDecl, OptionType};

/// Flag names grouped by value type, plus short/long alias pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionSchema {
    /// Flag names per type, in declaration order. Duplicates are kept.
    pub by_type: BTreeMap<OptionType, Vec<String>>,
    /// `(short, long)` pairs naming the same flag.
    pub aliases: Vec<(String, String)>,
}

impl OptionSchema {
    /// Builds the schema for a list of option declarations.
    pub fn from_options(options: &[OptionDecl]) -> Self {
        let mut schema = Self::default();
        for option in options {
            schema
                .by_type
                .entry(option.kind)
                .or_default()
                .extend(option.names().map(String::from));
            if let (Some(short), Some(long)) = (&option.short, &option.long) {
                schema.aliases.push((short.clone(), long.clone()));
            }
        }
        schema
    }

    /// Builds the schema for the options declared directly on `node`.
    ///
    /// Options of ancestors and siblings are not included.
    pub fn for_node(node: &Node) -> Self {
        Self::from_options(node.options())
    }

    /// Combines two schemas, keeping `self`'s names first.
    pub fn merged(&self, other: &Self) -> Self {
        let mut schema = self.clone();
        for (kind, names) in &other.by_type {
            schema.by_type.entry(*kind).or_default().extend(names.iter().cloned());
        }
        schema.aliases.extend(other.aliases.iter().cloned());
        schema
    }

    /// Names declared with type `kind`.
    pub fn names(&self, kind: OptionType) -> &[String] {
        self.by_type.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Declared type of `name`, if it is declared at all.
    pub fn type_of(&self, name: &str) -> Option<OptionType> {
        self.by_type
            .iter()
            .find(|(_, names)| names.iter().any(|n| n == name))
            .map(|(kind, _)| *kind)
    }

    /// The other name of the flag called `name`, if it has both forms.
    pub fn alias_of(&self, name: &str) -> Option<&str> {
        self.aliases.iter().find_map(|(short, long)| {
            if short == name {
                Some(long.as_str())
            } else if long == name {
                Some(short.as_str())
            } else {
                None
            }
        })
    }

    /// Returns `true` if no flag is declared.
    pub fn is_empty(&self) -> bool {
        self.by_type.values().all(Vec::is_empty)
    }
}
