//! Flag parsing against an [`OptionSchema`].
//!
//! The resolver only depends on the [`FlagParser`] contract: raw tokens and a
//! schema in, a flag map and the leftover positional tokens out.
//! [`LenientParser`] is the bundled implementation. It accepts undeclared
//! flags, because the resolver parses the whole token stream against a single
//! node's schema while tokens for other levels are still present.
//!
//! # Example
//!
//! ```
//! use command_tree_core::{FlagParser, FlagValue, LenientParser, OptionDecl, OptionSchema, OptionType};
//!
//! let schema = OptionSchema::from_options(&[
//!     OptionDecl::boolean(Some("a"), Some("all")),
//!     OptionDecl::with_value(Some("d"), Some("depth"), OptionType::Number),
//! ]);
//! let tokens: Vec<String> = ["list", "-a", "--depth", "3", "query"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let parsed = LenientParser.parse(&tokens, &schema);
//! assert_eq!(parsed.positionals, ["list", "query"]);
//! assert_eq!(parsed.flags["all"], FlagValue::Bool(true));
//! assert_eq!(parsed.flags["d"], FlagValue::Number(3.0));
//! ```

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::slice::Iter;

use serde::Serialize;
use tracing::trace;

use crate::{OptionSchema, OptionType};

/// A parsed flag value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Switch state.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Raw string value.
    String(String),
}

/// Flag values keyed by flag name (both short and long names are present).
pub type Flags = BTreeMap<String, FlagValue>;

/// Output of a [`FlagParser`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    /// Parsed flags.
    pub flags: Flags,
    /// Tokens that were not consumed as flags or flag values, in order.
    pub positionals: Vec<String>,
}

/// Splits raw tokens into flags and positionals according to a schema.
pub trait FlagParser {
    /// Parses `tokens` using `schema` to coerce flag values.
    fn parse(&self, tokens: &[String], schema: &OptionSchema) -> ParsedArgs;
}

/// Tolerant `--long`/`-s` parser.
///
/// - `--` ends flag parsing.
/// - `--name=value`, `--name value` (non-boolean), `--name`, `--no-name`.
/// - `-abc` clusters; a non-boolean short flag takes the rest of the cluster
///   or the next token as its value.
/// - Undeclared flags take the next non-flag token as their value, or `true`.
/// - Declared booleans default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientParser;

impl FlagParser for LenientParser {
    fn parse(&self, tokens: &[String], schema: &OptionSchema) -> ParsedArgs {
        let mut parsed = ParsedArgs::default();
        for name in schema.names(OptionType::Boolean) {
            parsed.flags.insert(name.clone(), FlagValue::Bool(false));
        }

        let mut iter = tokens.iter().peekable();
        while let Some(token) = iter.next() {
            if token == "--" {
                parsed.positionals.extend(iter.by_ref().cloned());
                break;
            }

            if let Some(body) = token.strip_prefix("--") {
                if let Some((name, raw)) = body.split_once('=') {
                    let value = coerce(schema, name, raw);
                    set_flag(&mut parsed.flags, schema, name, value);
                } else if let Some(name) = body.strip_prefix("no-") {
                    set_flag(&mut parsed.flags, schema, name, FlagValue::Bool(false));
                } else {
                    let value = take_value(schema, body, &mut iter);
                    set_flag(&mut parsed.flags, schema, body, value);
                }
                continue;
            }

            if let Some(cluster) = token.strip_prefix('-') {
                if !cluster.is_empty() && cluster.parse::<f64>().is_err() {
                    parse_cluster(schema, cluster, &mut iter, &mut parsed.flags);
                    continue;
                }
            }

            parsed.positionals.push(token.clone());
        }

        parsed
    }
}

fn parse_cluster(
    schema: &OptionSchema,
    cluster: &str,
    iter: &mut Peekable<Iter<'_, String>>,
    flags: &mut Flags,
) {
    let mut chars = cluster.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        let name = ch.to_string();
        let rest = &cluster[index + ch.len_utf8()..];

        if chars.peek().is_none() {
            let value = take_value(schema, &name, iter);
            set_flag(flags, schema, &name, value);
            break;
        }

        if let Some(raw) = rest.strip_prefix('=') {
            let value = coerce(schema, &name, raw);
            set_flag(flags, schema, &name, value);
            break;
        }

        if matches!(
            schema.type_of(&name),
            Some(OptionType::String | OptionType::Number)
        ) {
            let value = coerce(schema, &name, rest);
            set_flag(flags, schema, &name, value);
            break;
        }

        set_flag(flags, schema, &name, FlagValue::Bool(true));
    }
}

/// Resolves the value of a flag written without `=`.
fn take_value(
    schema: &OptionSchema,
    name: &str,
    iter: &mut Peekable<Iter<'_, String>>,
) -> FlagValue {
    let kind = schema.type_of(name);
    if kind == Some(OptionType::Boolean) {
        return FlagValue::Bool(true);
    }

    if let Some(next) = iter.next_if(|next| !looks_like_flag(next)) {
        return coerce(schema, name, next);
    }

    match kind {
        Some(OptionType::String) => FlagValue::String(String::new()),
        _ => FlagValue::Bool(true),
    }
}

fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token.parse::<f64>().is_err()
}

fn coerce(schema: &OptionSchema, name: &str, raw: &str) -> FlagValue {
    match schema.type_of(name) {
        Some(OptionType::Boolean) => FlagValue::Bool(raw != "false"),
        Some(OptionType::Number) => raw
            .parse::<f64>()
            .map(FlagValue::Number)
            .unwrap_or_else(|_| FlagValue::String(raw.to_string())),
        Some(OptionType::String) | None => FlagValue::String(raw.to_string()),
    }
}

fn set_flag(flags: &mut Flags, schema: &OptionSchema, name: &str, value: FlagValue) {
    if schema.type_of(name).is_none() {
        trace!(flag = name, "Undeclared flag");
    }
    if let Some(alias) = schema.alias_of(name) {
        flags.insert(alias.to_string(), value.clone());
    }
    flags.insert(name.to_string(), value);
}
