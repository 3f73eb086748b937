//! Command tree type definitions.
//!
//! A tree is a [`Node`] whose children are themselves nodes, keyed by the
//! token that selects them. Each node has two independent facets:
//!
//! - a **command** facet ([`CommandSpec`]) when it can be invoked, and
//! - a **namespace** facet when at least one child is invokable.
//!
//! Both facets are decided once, when the node is built, rather than being
//! re-derived from shape on every traversal step.

use serde::{Deserialize, Serialize};

/// Value type of an option, used to group flag names for the flag parser.
///
/// # Examples
///
/// ```
/// use command_tree_core::OptionType;
///
/// assert_eq!(OptionType::default(), OptionType::Boolean);
/// let parsed: OptionType = serde_json::from_str("\"number\"").unwrap();
/// assert_eq!(parsed, OptionType::Number);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Switch without a value (the default).
    #[default]
    Boolean,
    /// Free-form string value.
    String,
    /// Numeric value.
    Number,
}

/// A flag declared on a command.
///
/// `short` is a single character and `long` a multi-character name, both
/// without leading dashes. Either may be missing, not both; the two names are
/// aliases of the same flag.
///
/// # Examples
///
/// ```
/// use command_tree_core::{OptionDecl, OptionType};
///
/// let help = OptionDecl::boolean(Some("h"), Some("help"))
///     .with_description("show help information");
/// assert_eq!(help.names().collect::<Vec<_>>(), vec!["h", "help"]);
///
/// let account = OptionDecl::with_value(Some("a"), Some("account"), OptionType::String);
/// assert_eq!(account.kind, OptionType::String);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Single-character name (e.g. `"h"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Multi-character name (e.g. `"help"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// How the flag value is coerced.
    #[serde(rename = "type", default)]
    pub kind: OptionType,
    /// Description shown in help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionDecl {
    /// Creates a boolean option.
    pub fn boolean(short: Option<&str>, long: Option<&str>) -> Self {
        Self::with_value(short, long, OptionType::Boolean)
    }

    /// Creates an option of the given type.
    pub fn with_value(short: Option<&str>, long: Option<&str>, kind: OptionType) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            kind,
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns the declared names, short first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }
}

/// Where the callable for a command comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Explicit registry location, e.g. `"handlers/login"`.
    Location(String),
    /// Location derived from the command's position in the tree.
    Derived,
}

/// The invocable facet of a node.
///
/// # Examples
///
/// ```
/// use command_tree_core::{CommandSpec, Handler};
///
/// let login = CommandSpec::new()
///     .with_required(&["store"])
///     .with_optional(&["email"])
///     .with_description("Login with your account")
///     .with_handler(Handler::Location("auth/login".into()));
///
/// assert_eq!(login.arity(), 2);
/// assert_eq!(login.required_args, vec!["store"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// Names of required positional arguments, in order.
    pub required_args: Vec<String>,
    /// Names of optional positional arguments, filled after the required ones.
    pub optional_args: Vec<String>,
    /// Alternate lookup key.
    pub alias: Option<String>,
    /// One-line description for help output.
    pub description: Option<String>,
    /// Options local to this command.
    pub options: Vec<OptionDecl>,
    /// Callable reference; `None` behaves like [`Handler::Derived`].
    pub handler: Option<Handler>,
}

impl CommandSpec {
    /// Creates an empty command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends required argument names.
    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required_args
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    /// Appends optional argument names.
    pub fn with_optional(mut self, names: &[&str]) -> Self {
        self.optional_args
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    /// Sets the alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionDecl) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the handler reference.
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Total number of positional slots (required + optional).
    pub fn arity(&self) -> usize {
        self.required_args.len() + self.optional_args.len()
    }
}

/// A node of the command tree.
///
/// Children keep their declaration order, which is also the order used by
/// the help renderer.
///
/// # Examples
///
/// ```
/// use command_tree_core::{CommandSpec, Node};
///
/// let tree = Node::command(CommandSpec::new())
///     .with_child("install", Node::command(CommandSpec::new().with_alias("i")))
///     .with_child(
///         "workspace",
///         Node::namespace().with_child("list", Node::command(CommandSpec::new())),
///     );
///
/// assert!(tree.is_command());
/// assert!(tree.is_namespace());
/// assert!(tree.child("workspace").unwrap().is_namespace());
/// assert!(!tree.child("workspace").unwrap().is_command());
/// assert_eq!(tree.find_next("i").unwrap().0, "install");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Command facet, present when the node can be invoked.
    pub command: Option<CommandSpec>,
    /// Child nodes keyed by the token that selects them.
    pub children: Vec<(String, Node)>,
}

impl Node {
    /// Creates a node with only a namespace facet (and no children yet).
    pub fn namespace() -> Self {
        Self::default()
    }

    /// Creates an invokable node.
    pub fn command(spec: CommandSpec) -> Self {
        Self {
            command: Some(spec),
            children: Vec::new(),
        }
    }

    /// Adds a child node.
    pub fn with_child(mut self, key: &str, child: Node) -> Self {
        self.children.push((key.to_string(), child));
        self
    }

    /// Returns `true` if the node can be invoked.
    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    /// Returns `true` if at least one child can be invoked.
    pub fn is_namespace(&self) -> bool {
        self.children.iter().any(|(_, child)| child.is_command())
    }

    /// Looks up a child by its key.
    pub fn child(&self, key: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, child)| child)
    }

    /// Looks up a child whose alias is `alias`, returning its canonical key.
    pub fn child_by_alias(&self, alias: &str) -> Option<(&str, &Node)> {
        self.children
            .iter()
            .find(|(_, child)| {
                child
                    .command
                    .as_ref()
                    .and_then(|spec| spec.alias.as_deref())
                    == Some(alias)
            })
            .map(|(key, child)| (key.as_str(), child))
    }

    /// Resolves a token to a child, by key first and alias second.
    pub fn find_next(&self, token: &str) -> Option<(&str, &Node)> {
        self.children
            .iter()
            .find(|(key, _)| key == token)
            .map(|(key, child)| (key.as_str(), child))
            .or_else(|| self.child_by_alias(token))
    }

    /// Follows a path of canonical keys from this node.
    pub fn descendant<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, key| node.child(key.as_ref()))
    }

    /// Options declared directly on this node (empty for pure namespaces).
    pub fn options(&self) -> &[OptionDecl] {
        self.command
            .as_ref()
            .map(|spec| spec.options.as_slice())
            .unwrap_or_default()
    }

    /// Direct children that are invokable.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children
            .iter()
            .filter(|(_, child)| child.is_command())
            .map(|(key, child)| (key.as_str(), child))
    }
}
