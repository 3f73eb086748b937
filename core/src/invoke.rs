//! Handler registry and dispatch.
//!
//! Handlers are plain closures registered at startup under a location
//! string. A command either names its location explicitly
//! ([`Handler::Location`]) or has it derived from its resolution path joined
//! to the registry root.
//!
//! # Example
//!
//! ```
//! use command_tree_core::{CommandSpec, Handler, Node, Registry, Resolver};
//!
//! let tree = Node::command(CommandSpec::new()).with_child(
//!     "install",
//!     Node::command(CommandSpec::new().with_required(&["app"]).with_handler(Handler::Derived)),
//! );
//!
//! let registry = Registry::new("commands").with_handler(
//!     "commands/install",
//!     |installed: &mut Vec<String>, invocation| {
//!         installed.push(invocation.arg("app").unwrap_or_default().to_string());
//!         Ok(())
//!     },
//! );
//!
//! let mut installed = Vec::new();
//! let invocation = Resolver::new(&tree).resolve(&["install", "cool-app"]).unwrap();
//! registry.invoke(&mut installed, &invocation).unwrap();
//! assert_eq!(installed, ["cool-app"]);
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{HandlerError, InvokeError};
use crate::{Handler, Invocation};

/// A registered command callable.
///
/// Receives the caller's context and the bound invocation.
pub type HandlerFn<C> =
    Box<dyn Fn(&mut C, &Invocation<'_>) -> Result<(), HandlerError> + Send + Sync>;

/// Location-keyed collection of handlers.
pub struct Registry<C> {
    root: String,
    handlers: HashMap<String, HandlerFn<C>>,
}

impl<C> Registry<C> {
    /// Creates an empty registry whose derived locations start at `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler under `location`, replacing any previous one.
    pub fn register<F>(&mut self, location: impl Into<String>, handler: F)
    where
        F: Fn(&mut C, &Invocation<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(location.into(), Box::new(handler));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_handler<F>(mut self, location: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut C, &Invocation<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.register(location, handler);
        self
    }

    /// Root prepended to derived locations.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns `true` if a handler is registered under `location`.
    pub fn contains(&self, location: &str) -> bool {
        self.handlers.contains_key(location)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Location the invocation's handler is looked up under.
    pub fn location_for(&self, invocation: &Invocation<'_>) -> String {
        match &invocation.spec.handler {
            Some(Handler::Location(location)) => location.clone(),
            Some(Handler::Derived) | None => self.derived_location(&invocation.path),
        }
    }

    fn derived_location(&self, path: &[String]) -> String {
        let root = self.root.trim_end_matches('/');
        match (root.is_empty(), path.is_empty()) {
            (_, true) => root.to_string(),
            (true, false) => path.join("/"),
            (false, false) => format!("{root}/{}", path.join("/")),
        }
    }

    /// Runs the invocation's handler once with `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::HandlerNotFound`] if no handler is registered
    /// for the location, or [`InvokeError::Handler`] wrapping whatever the
    /// handler returned.
    pub fn invoke(&self, ctx: &mut C, invocation: &Invocation<'_>) -> Result<(), InvokeError> {
        let location = self.location_for(invocation);
        let handler = self
            .handlers
            .get(&location)
            .ok_or_else(|| InvokeError::HandlerNotFound {
                location: location.clone(),
            })?;
        debug!(location = %location, path = ?invocation.path, "Invoking handler");
        handler(ctx, invocation).map_err(InvokeError::Handler)
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locations: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        locations.sort_unstable();
        f.debug_struct("Registry")
            .field("root", &self.root)
            .field("handlers", &locations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::{CommandSpec, Node, Resolver};

    use super::*;

    fn tree() -> Node {
        Node::command(CommandSpec::new().with_handler(Handler::Derived))
            .with_child(
                "login",
                Node::command(
                    CommandSpec::new()
                        .with_required(&["store"])
                        .with_handler(Handler::Location("auth/login".into())),
                ),
            )
            .with_child(
                "workspace",
                Node::namespace().with_child(
                    "list",
                    Node::command(CommandSpec::new().with_description("List workspaces")),
                ),
            )
    }

    #[test]
    fn test_explicit_location_wins() {
        let tree = tree();
        let registry: Registry<()> = Registry::new("cmd");
        let invocation = Resolver::new(&tree).resolve(&["login", "store"]).unwrap();
        assert_eq!(registry.location_for(&invocation), "auth/login");
    }

    #[test]
    fn test_derived_location_joins_path() {
        let tree = tree();
        let resolver = Resolver::new(&tree);

        let registry: Registry<()> = Registry::new("cmd/");
        let nested = resolver.resolve(&["workspace", "list"]).unwrap();
        assert_eq!(registry.location_for(&nested), "cmd/workspace/list");
        let root = resolver.resolve::<&str>(&[]).unwrap();
        assert_eq!(registry.location_for(&root), "cmd");

        let bare: Registry<()> = Registry::new("");
        assert_eq!(bare.location_for(&nested), "workspace/list");
    }

    #[test]
    fn test_missing_handler_is_reported() {
        let tree = tree();
        let registry: Registry<()> = Registry::new("cmd");
        let invocation = Resolver::new(&tree).resolve(&["workspace", "list"]).unwrap();
        let err = registry.invoke(&mut (), &invocation).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::HandlerNotFound { ref location } if location == "cmd/workspace/list"
        ));
    }

    #[test]
    fn test_handler_runs_once_with_context() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = Registry::new("cmd").with_handler(
            "auth/login",
            move |seen: &mut Vec<Vec<serde_json::Value>>, invocation| {
                counter.fetch_add(1, Ordering::SeqCst);
                seen.push(invocation.arguments());
                Ok(())
            },
        );

        let tree = tree();
        let invocation = Resolver::new(&tree).resolve(&["login", "bestever"]).unwrap();
        let mut seen = Vec::new();
        registry.invoke(&mut seen, &invocation).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            seen,
            vec![vec![serde_json::json!("bestever"), serde_json::json!({})]]
        );
    }

    #[test]
    fn test_handler_error_passes_through() {
        let registry: Registry<()> = Registry::new("cmd")
            .with_handler("auth/login", |_, _| Err("store unreachable".into()));

        let tree = tree();
        let invocation = Resolver::new(&tree).resolve(&["login", "x"]).unwrap();
        let err = registry.invoke(&mut (), &invocation).unwrap_err();
        assert!(matches!(err, InvokeError::Handler(_)));
        assert_eq!(err.to_string(), "store unreachable");
    }

    #[test]
    fn test_debug_lists_locations() {
        let registry: Registry<()> = Registry::new("cmd")
            .with_handler("b", |_, _| Ok(()))
            .with_handler("a", |_, _| Ok(()));
        assert_eq!(
            format!("{registry:?}"),
            r#"Registry { root: "cmd", handlers: ["a", "b"] }"#
        );
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
    }
}
