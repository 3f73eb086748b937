use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_tree_core::{
    Invocation, Node, Registry, ResolveError, Resolver, load_tree, render_help, validate_tree,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;

use config::Settings;

/// Exit code for tokens that do not resolve to a command.
const EXIT_UNRESOLVED: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "Resolve command-line tokens against a command tree document")]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve tokens (after `--`) and print the bound invocation as JSON.
    Resolve(ResolveArgs),
    /// Print usage text for a tree.
    Help(HelpArgs),
    /// Validate a tree document.
    Check(TreeArgs),
}

#[derive(Debug, Args)]
struct TreeArgs {
    /// Tree document (.json, .yaml or .yml).
    #[arg(long)]
    tree: Option<PathBuf>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// Program name shown when falling back to help output.
    #[arg(long)]
    name: Option<String>,
    /// Root prepended to derived handler locations.
    #[arg(long)]
    handler_root: Option<String>,
    /// Tokens to resolve.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// Program name shown in the usage line.
    #[arg(long)]
    name: Option<String>,
}

/// JSON shape printed by `resolve`.
#[derive(Debug, Serialize)]
struct ResolveOutput<'a, 't> {
    #[serde(flatten)]
    invocation: &'a Invocation<'t>,
    handler: String,
    arguments: Vec<serde_json::Value>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Help(args) => run_help(args),
        Command::Check(args) => run_check(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_resolve(args: ResolveArgs) -> Result<i32, String> {
    let settings = Settings::resolve(
        args.tree.config.as_deref(),
        args.tree.tree,
        args.name,
        args.handler_root,
    )?;
    let tree = load_valid_tree(&settings)?;

    match Resolver::new(&tree).resolve(&args.tokens) {
        Ok(invocation) => {
            let registry: Registry<()> = Registry::new(settings.handler_root);
            let output = ResolveOutput {
                handler: registry.location_for(&invocation),
                arguments: invocation.arguments(),
                invocation: &invocation,
            };
            let raw = serde_json::to_string_pretty(&output)
                .map_err(|err| format!("Failed to serialize invocation: {err}"))?;
            println!("{raw}");
            Ok(0)
        }
        Err(ResolveError::CommandNotFound { tokens }) => {
            if !tokens.is_empty() {
                eprintln!("Command not found: {}", tokens.join(" "));
            }
            print!("{}", render_help(&tree, &settings.program));
            Ok(EXIT_UNRESOLVED)
        }
        Err(ResolveError::MissingRequiredArgs { command, required }) => {
            debug!(command = ?command, "Missing required arguments");
            eprintln!("Missing required arguments: {}", required.join(", "));
            Ok(EXIT_UNRESOLVED)
        }
    }
}

fn run_help(args: HelpArgs) -> Result<i32, String> {
    let settings = Settings::resolve(args.tree.config.as_deref(), args.tree.tree, args.name, None)?;
    let tree = load_valid_tree(&settings)?;
    print!("{}", render_help(&tree, &settings.program));
    Ok(0)
}

fn run_check(args: TreeArgs) -> Result<i32, String> {
    let settings = Settings::resolve(args.config.as_deref(), args.tree, None, None)?;
    let tree = load_valid_tree(&settings)?;
    println!(
        "Validated '{}': {} top-level entr{}.",
        settings.tree.display(),
        tree.children.len(),
        if tree.children.len() == 1 { "y" } else { "ies" }
    );
    Ok(0)
}

fn load_valid_tree(settings: &Settings) -> Result<Node, String> {
    let tree = load_tree(&settings.tree)
        .map_err(|err| format!("Failed to load '{}': {err}", settings.tree.display()))?;

    let errors = validate_tree(&tree);
    if let Some(first) = errors.first() {
        return Err(format!("Invalid tree '{}': {first}", settings.tree.display()));
    }
    Ok(tree)
}
