//! Token resolution against a command tree.
//!
//! [`Resolver::resolve`] turns raw command-line tokens into an
//! [`Invocation`]: the matched command, its positional arguments at fixed
//! arity, and its parsed flags.
//!
//! Resolution runs in a single pass:
//!
//! 1. The raw tokens are parsed once against the root's options to strip
//!    flags; the leftover positionals drive the tree walk.
//! 2. The walk follows namespaces first, then commands (by key, then alias),
//!    and otherwise falls back to the current node as the command.
//! 3. The raw tokens are parsed again against the selected command's own
//!    options to produce its flags, and against the root and command options
//!    together to produce its positional arguments.
//!
//! The resolution path is threaded through the walk as a local accumulator;
//! the tree is only ever borrowed, so one tree can serve concurrent
//! resolutions.
//!
//! # Example
//!
//! ```
//! use command_tree_core::{CommandSpec, Node, Resolver, ResolveError};
//!
//! let tree = Node::command(CommandSpec::new())
//!     .with_child(
//!         "login",
//!         Node::command(CommandSpec::new().with_required(&["store"]).with_optional(&["email"])),
//!     );
//! let resolver = Resolver::new(&tree);
//!
//! let found = resolver.resolve(&["login", "bestever", "me@there.com", "extra"]).unwrap();
//! assert_eq!(found.path, ["login"]);
//! assert_eq!(found.args, [Some("bestever".to_string()), Some("me@there.com".to_string())]);
//!
//! let err = resolver.resolve(&["login"]).unwrap_err();
//! assert!(matches!(err, ResolveError::MissingRequiredArgs { .. }));
//! ```

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ResolveError;
use crate::flags::{FlagParser, Flags, LenientParser};
use crate::{CommandSpec, Node, OptionSchema};

/// A fully bound command invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation<'t> {
    /// The matched node.
    #[serde(skip)]
    pub command: &'t Node,
    /// The command facet of [`command`](Self::command).
    #[serde(skip)]
    pub spec: &'t CommandSpec,
    /// The node at which the walk stopped: the matched command's parent, or
    /// the command itself when it was selected by fallback.
    #[serde(skip)]
    pub node: &'t Node,
    /// Canonical keys from the root to the matched command.
    pub path: Vec<String>,
    /// Positional arguments, exactly `required + optional` long. `None`
    /// marks an optional argument that was not supplied.
    pub args: Vec<Option<String>>,
    /// Flags parsed against the matched command's options.
    pub flags: Flags,
}

impl Invocation<'_> {
    /// Positional values followed by the flags object, as handed to a handler.
    pub fn arguments(&self) -> Vec<Value> {
        let flags = serde_json::to_value(&self.flags).unwrap_or(Value::Null);
        self.args
            .iter()
            .map(|arg| arg.clone().map_or(Value::Null, Value::String))
            .chain(std::iter::once(flags))
            .collect()
    }

    /// Returns the positional value bound to the argument called `name`.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.spec
            .required_args
            .iter()
            .chain(&self.spec.optional_args)
            .position(|arg| arg == name)
            .and_then(|index| self.args.get(index))
            .and_then(|value| value.as_deref())
    }
}

/// Command chosen by the tree walk, before flags are parsed.
struct Selection<'t> {
    command: &'t Node,
    spec: &'t CommandSpec,
    node: &'t Node,
}

/// Resolves token lists against a borrowed tree.
#[derive(Debug, Clone)]
pub struct Resolver<'t, P = LenientParser> {
    tree: &'t Node,
    parser: P,
}

impl<'t> Resolver<'t, LenientParser> {
    /// Creates a resolver using the bundled [`LenientParser`].
    pub fn new(tree: &'t Node) -> Self {
        Self::with_parser(tree, LenientParser)
    }
}

impl<'t, P: FlagParser> Resolver<'t, P> {
    /// Creates a resolver using a custom flag parser.
    pub fn with_parser(tree: &'t Node, parser: P) -> Self {
        Self { tree, parser }
    }

    /// Resolves `raw` tokens to an invocation.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CommandNotFound`] when no invokable node
    /// matches, and [`ResolveError::MissingRequiredArgs`] when the matched
    /// command gets fewer positional tokens than it requires.
    pub fn resolve<S: AsRef<str>>(&self, raw: &[S]) -> Result<Invocation<'t>, ResolveError> {
        let raw: Vec<String> = raw.iter().map(|s| s.as_ref().to_string()).collect();
        let root_schema = OptionSchema::for_node(self.tree);
        let navigation = self.parser.parse(&raw, &root_schema).positionals;
        debug!(tokens = ?navigation, "Resolving command");

        let mut path = Vec::new();
        let Some(selection) = self.walk(self.tree, &navigation, &mut path) else {
            debug!(tokens = ?navigation, "No command matched");
            return Err(ResolveError::CommandNotFound { tokens: navigation });
        };

        // Positionals come from a parse that knows the command's options; the
        // first `path.len()` of them are the keys the walk consumed.
        let command_schema = OptionSchema::for_node(selection.command);
        let flags = self.parser.parse(&raw, &command_schema).flags;
        let positionals = self
            .parser
            .parse(&raw, &root_schema.merged(&command_schema))
            .positionals;
        let candidates = positionals.get(path.len()..).unwrap_or_default();

        if selection.spec.required_args.len() > candidates.len() {
            return Err(ResolveError::MissingRequiredArgs {
                command: path,
                required: selection.spec.required_args.clone(),
            });
        }

        let args = (0..selection.spec.arity())
            .map(|index| candidates.get(index).cloned())
            .collect();

        debug!(path = ?path, "Resolved command");
        Ok(Invocation {
            command: selection.command,
            spec: selection.spec,
            node: selection.node,
            path,
            args,
            flags,
        })
    }

    fn walk(
        &self,
        node: &'t Node,
        tokens: &[String],
        path: &mut Vec<String>,
    ) -> Option<Selection<'t>> {
        if let Some((head, tail)) = tokens.split_first() {
            if let Some((key, next)) = node.find_next(head) {
                if next.is_namespace() {
                    debug!(key, "Following namespace");
                    path.push(key.to_string());
                    return self.walk(next, tail, path);
                }
                if let Some(spec) = &next.command {
                    debug!(key, "Matched command");
                    path.push(key.to_string());
                    return Some(Selection {
                        command: next,
                        spec,
                        node,
                    });
                }
            }
        }

        node.command.as_ref().map(|spec| Selection {
            command: node,
            spec,
            node,
        })
    }
}
