//! Building trees from JSON and YAML documents.
//!
//! A document is a nested mapping. Reserved keys (see
//! [`COMMAND_MARKERS`](crate::classify::COMMAND_MARKERS)) describe the node
//! itself; every other key is a child. Classification happens here, once,
//! using the structural predicates in [`classify`](crate::classify).
//!
//! # Example YAML
//!
//! ```yaml
//! options:
//!   - short: h
//!     long: help
//!     type: boolean
//!     description: show help information
//! handler: true
//! install:
//!   alias: i
//!   requiredArgs: app
//!   description: Install the given app
//! workspace:
//!   list:
//!     description: List available workspaces
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use crate::classify::{self, is_reserved_key};
use crate::error::{LoadError, Result};
use crate::{CommandSpec, Handler, Node, OptionDecl};

impl Node {
    /// Builds a node from an untagged document value.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidNode`] if an entry is not a mapping or a
    /// reserved key holds a value of the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::{Handler, Node};
    /// use serde_json::json;
    ///
    /// let tree = Node::from_value(&json!({
    ///     "handler": "root",
    ///     "login": { "requiredArgs": "store", "optionalArgs": ["email"] }
    /// }))
    /// .unwrap();
    ///
    /// let login = tree.child("login").unwrap().command.as_ref().unwrap();
    /// assert_eq!(login.required_args, ["store"]);
    /// assert_eq!(login.optional_args, ["email"]);
    /// assert_eq!(tree.command.as_ref().unwrap().handler, Some(Handler::Location("root".into())));
    /// ```
    pub fn from_value(value: &Value) -> Result<Self> {
        build_node(value, &mut Vec::new())
    }

    /// Parses a JSON document into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::JsonError`] on malformed JSON, or any error of
    /// [`from_value`](Self::from_value).
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    /// Parses a YAML document into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::YamlError`] on malformed YAML, or any error of
    /// [`from_value`](Self::from_value).
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(raw)?;
        Self::from_value(&value)
    }
}

/// Loads a tree from a `.json`, `.yaml` or `.yml` file.
///
/// # Errors
///
/// Returns [`LoadError::IoError`] if the file cannot be read,
/// [`LoadError::UnsupportedFormat`] for other extensions, or a parse error.
pub fn load_tree(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let raw = std::fs::read_to_string(path)?;

    match extension.as_str() {
        "json" => Node::from_json_str(&raw),
        "yaml" | "yml" => Node::from_yaml_str(&raw),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

fn build_node(value: &Value, path: &mut Vec<String>) -> Result<Node> {
    let Some(map) = value.as_object() else {
        return Err(invalid(path, "expected a mapping"));
    };

    let shape = classify::classify(value);
    let command = if shape.command {
        Some(build_command(map, path)?)
    } else {
        None
    };

    let mut children = Vec::new();
    for (key, child) in map.iter().filter(|(key, _)| !is_reserved_key(key)) {
        path.push(key.clone());
        let node = build_node(child, path)?;
        path.pop();
        children.push((key.clone(), node));
    }

    Ok(Node { command, children })
}

fn build_command(map: &Map<String, Value>, path: &[String]) -> Result<CommandSpec> {
    let options = match map.get("options") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) if classify::is_option_list(value) => {
            serde_json::from_value::<Vec<OptionDecl>>(value.clone())
                .map_err(|err| invalid(path, &format!("invalid options: {err}")))?
        }
        Some(_) => return Err(invalid(path, "options must be a list")),
    };

    Ok(CommandSpec {
        required_args: arg_names(map.get("requiredArgs"), path, "requiredArgs")?,
        optional_args: arg_names(map.get("optionalArgs"), path, "optionalArgs")?,
        alias: text(map.get("alias"), path, "alias")?,
        description: text(map.get("description"), path, "description")?,
        options,
        handler: handler(map.get("handler"), path)?,
    })
}

/// Accepts a single name or a list of names.
fn arg_names(value: Option<&Value>, path: &[String], field: &str) -> Result<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(name)) => Ok(vec![name.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(String::from)
                    .ok_or_else(|| invalid(path, &format!("{field} entries must be strings")))
            })
            .collect(),
        Some(_) => Err(invalid(
            path,
            &format!("{field} must be a string or a list of strings"),
        )),
    }
}

fn text(value: Option<&Value>, path: &[String], field: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(invalid(path, &format!("{field} must be a string"))),
    }
}

fn handler(value: Option<&Value>, path: &[String]) -> Result<Option<Handler>> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some(Handler::Derived)),
        Some(Value::String(location)) => Ok(Some(Handler::Location(location.clone()))),
        Some(_) => Err(invalid(path, "handler must be a location string or `true`")),
    }
}

fn invalid(path: &[String], reason: &str) -> LoadError {
    LoadError::InvalidNode {
        path: path.join("."),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use crate::OptionType;

    use super::*;

    const YAML_TREE: &str = r#"
options:
  - long: verbose
    description: show all logs
handler: true
list:
  alias: ls
  optionalArgs: query
  options:
    - short: a
      long: all
workspace:
  delete:
    requiredArgs: [name]
    options:
      - short: a
        long: account
        type: string
"#;

    #[test]
    fn test_yaml_and_json_agree() {
        let from_yaml = Node::from_yaml_str(YAML_TREE).unwrap();
        let from_json = Node::from_value(&json!({
            "options": [{ "long": "verbose", "description": "show all logs" }],
            "handler": true,
            "list": {
                "alias": "ls",
                "optionalArgs": "query",
                "options": [{ "short": "a", "long": "all" }]
            },
            "workspace": {
                "delete": {
                    "requiredArgs": ["name"],
                    "options": [{ "short": "a", "long": "account", "type": "string" }]
                }
            }
        }))
        .unwrap();
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_children_keep_declaration_order() {
        let tree = Node::from_yaml_str(YAML_TREE).unwrap();
        let keys: Vec<&str> = tree.children.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["list", "workspace"]);

        let delete = tree.descendant(&["workspace", "delete"]).unwrap();
        assert_eq!(delete.options()[0].kind, OptionType::String);
        assert!(!tree.child("workspace").unwrap().is_command());
    }

    #[test]
    fn test_marker_free_entries_are_not_commands() {
        let tree = Node::from_value(&json!({ "group": {} })).unwrap();
        assert!(!tree.is_command());
        assert!(!tree.child("group").unwrap().is_command());
    }

    #[test]
    fn test_rejects_scalar_child() {
        let err = Node::from_value(&json!({ "handler": true, "version": "1.0" })).unwrap_err();
        assert!(matches!(err, LoadError::InvalidNode { ref path, .. } if path == "version"));
    }

    #[test]
    fn test_rejects_malformed_reserved_values() {
        let err = Node::from_value(&json!({ "ns": { "cmd": { "requiredArgs": 3 } } })).unwrap_err();
        assert!(matches!(err, LoadError::InvalidNode { ref path, .. } if path == "ns.cmd"));

        let err = Node::from_value(&json!({ "options": { "long": "x" } })).unwrap_err();
        assert!(matches!(err, LoadError::InvalidNode { ref reason, .. } if reason == "options must be a list"));

        let err = Node::from_value(&json!({ "handler": 1 })).unwrap_err();
        assert!(matches!(err, LoadError::InvalidNode { .. }));
    }

    #[test]
    fn test_load_tree_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("tree.yml");
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(YAML_TREE.as_bytes())
            .unwrap();
        assert!(load_tree(&yaml_path).unwrap().child("list").is_some());

        let toml_path = dir.path().join("tree.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(
            load_tree(&toml_path),
            Err(LoadError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            load_tree(dir.path().join("missing.json")),
            Err(LoadError::IoError(_))
        ));
    }
}
