//! Usage text rendering.
//!
//! Root-level commands form the first group; every root child that is a
//! namespace forms its own group, listing the namespace's own line (if it is
//! invokable) followed by its direct commands. Namespaces are expanded one
//! level only.

use crate::{CommandSpec, Node, OptionDecl};

struct UsageLine<'t> {
    usage: String,
    description: &'t str,
}

impl<'t> UsageLine<'t> {
    fn new(prefix: Option<&str>, key: &str, spec: &'t CommandSpec) -> Self {
        let mut usage = String::new();
        if let Some(prefix) = prefix {
            usage.push_str(prefix);
            usage.push(' ');
        }
        usage.push_str(key);
        usage.push(' ');
        if !spec.required_args.is_empty() {
            usage.push_str(&format!("<{}> ", spec.required_args.join("> <")));
        }
        if !spec.optional_args.is_empty() {
            usage.push_str(&format!("[{}]", spec.optional_args.join("] [")));
        }

        Self {
            usage,
            description: spec.description.as_deref().unwrap_or_default(),
        }
    }
}

/// Renders the usage text for `tree`, headed by `program`.
///
/// # Examples
///
/// ```
/// use command_tree_core::{render_help, CommandSpec, Node, OptionDecl};
///
/// let tree = Node::command(
///     CommandSpec::new().with_option(
///         OptionDecl::boolean(Some("h"), Some("help")).with_description("show help"),
///     ),
/// )
/// .with_child(
///     "install",
///     Node::command(CommandSpec::new().with_required(&["app"]).with_description("Install an app")),
/// );
///
/// let help = render_help(&tree, "apps");
/// assert!(help.contains("  Usage: apps <command> [options]"));
/// assert!(help.contains("    install <app>   Install an app"));
/// assert!(help.contains("    -h, --help  show help"));
/// ```
pub fn render_help(tree: &Node, program: &str) -> String {
    let groups: Vec<String> = command_groups(tree)
        .iter()
        .filter(|lines| !lines.is_empty())
        .map(|lines| format_group(lines))
        .collect();
    let options: Vec<String> = tree.options().iter().map(format_option).collect();

    format!(
        "\n  Usage: {program} <command> [options]\n\n  Commands:\n\n{}\n\n  Options:\n\n{}\n",
        groups.join("\n\n"),
        options.join("\n")
    )
}

fn command_groups(tree: &Node) -> Vec<Vec<UsageLine<'_>>> {
    let mut root = Vec::new();
    let mut namespaces = Vec::new();

    for (key, child) in &tree.children {
        if child.is_namespace() {
            let mut lines = Vec::new();
            if let Some(spec) = &child.command {
                lines.push(UsageLine::new(None, key, spec));
            }
            lines.extend(child.commands().filter_map(|(name, command)| {
                command
                    .command
                    .as_ref()
                    .map(|spec| UsageLine::new(Some(key), name, spec))
            }));
            namespaces.push(lines);
        } else if let Some(spec) = &child.command {
            root.push(UsageLine::new(None, key, spec));
        }
    }

    std::iter::once(root).chain(namespaces).collect()
}

fn format_group(lines: &[UsageLine<'_>]) -> String {
    let width = lines.iter().map(|line| line.usage.chars().count()).max().unwrap_or(0) + 2;
    lines
        .iter()
        .map(|line| format!("    {:<width$}{}", line.usage, line.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_option(option: &OptionDecl) -> String {
    let flags = match (&option.short, &option.long) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("--{long}"),
        (None, None) => String::new(),
    };
    format!(
        "    {flags}  {}",
        option.description.as_deref().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use crate::OptionType;

    use super::*;

    #[test]
    fn test_full_layout() {
        let tree = Node::command(
            CommandSpec::new()
                .with_option(
                    OptionDecl::boolean(None, Some("verbose")).with_description("show all logs"),
                )
                .with_option(
                    OptionDecl::boolean(Some("h"), Some("help"))
                        .with_description("show help information"),
                ),
        )
        .with_child(
            "login",
            Node::command(
                CommandSpec::new()
                    .with_required(&["store"])
                    .with_optional(&["email"])
                    .with_description("Login with your account"),
            ),
        )
        .with_child(
            "logout",
            Node::command(CommandSpec::new().with_description("Logout from current account")),
        )
        .with_child(
            "workspace",
            Node::namespace()
                .with_child(
                    "new",
                    Node::command(
                        CommandSpec::new()
                            .with_required(&["name"])
                            .with_description("Create a new workspace"),
                    ),
                )
                .with_child(
                    "list",
                    Node::command(
                        CommandSpec::new().with_description("List available workspaces"),
                    ),
                ),
        );

        let expected = "
  Usage: findhelp <command> [options]

  Commands:

    login <store> [email]  Login with your account
    logout                 Logout from current account

    workspace new <name>   Create a new workspace
    workspace list         List available workspaces

  Options:

    --verbose  show all logs
    -h, --help  show help information
";
        assert_eq!(render_help(&tree, "findhelp"), expected);
    }

    #[test]
    fn test_invokable_namespace_line_comes_first() {
        let tree = Node::command(CommandSpec::new()).with_child(
            "settings",
            Node::command(
                CommandSpec::new()
                    .with_required(&["app"])
                    .with_optional(&["field"])
                    .with_description("Get an app's settings"),
            )
            .with_child(
                "set",
                Node::command(
                    CommandSpec::new()
                        .with_required(&["app", "field", "value"])
                        .with_description("Set an app's settings value"),
                ),
            ),
        );

        let help = render_help(&tree, "apps");
        let own = help.find("    settings <app> [field]").unwrap();
        let nested = help.find("    settings set <app> <field> <value>").unwrap();
        assert!(own < nested);
    }

    #[test]
    fn test_nested_namespaces_expand_one_level() {
        let tree = Node::command(CommandSpec::new()).with_child(
            "cloud",
            Node::namespace()
                .with_child(
                    "status",
                    Node::command(CommandSpec::new().with_description("Show status")),
                )
                .with_child(
                    "region",
                    Node::namespace().with_child(
                        "list",
                        Node::command(CommandSpec::new().with_description("List regions")),
                    ),
                ),
        );

        let help = render_help(&tree, "apps");
        assert!(help.contains("cloud status"));
        assert!(!help.contains("List regions"));
    }

    #[test]
    fn test_non_ascii_usage_keeps_columns_aligned() {
        let tree = Node::command(CommandSpec::new())
            .with_child(
                "café",
                Node::command(
                    CommandSpec::new()
                        .with_required(&["größe"])
                        .with_description("Brew"),
                ),
            )
            .with_child(
                "list",
                Node::command(CommandSpec::new().with_description("List")),
            );

        let help = render_help(&tree, "apps");
        assert!(help.contains("    café <größe>   Brew\n"));
        assert!(help.contains("    list           List\n"));
    }

    #[test]
    fn test_option_without_description() {
        let option = OptionDecl::with_value(Some("a"), None, OptionType::String);
        assert_eq!(format_option(&option), "    -a  ");
    }
}
