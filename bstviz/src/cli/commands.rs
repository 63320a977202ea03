//! Command dispatch and implementations

use std::io;

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::application::services::KeySource;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::canvas::Canvas;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::Key;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    // completion needs no settings
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Traverse { source } => cmd_traverse(&container, &source.source()),
        Commands::Tree { source } => cmd_tree(&container, &source.source()),
        Commands::Layout { source } => cmd_layout(&container, &source.source()),
        Commands::Draw {
            source,
            highlight,
            no_color,
        } => cmd_draw(&container, &source.source(), highlight.as_deref(), *no_color),
        Commands::Path { key, source } => cmd_path(&container, &source.source(), *key),
        Commands::Ancestor { a, b, source } => {
            cmd_ancestor(&container, &source.source(), *a, *b)
        }
        Commands::Route { a, b, source } => cmd_route(&container, &source.source(), *a, *b),
        Commands::Config { command } => cmd_config(&container, command, cli.config.as_deref()),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(ctx))]
fn cmd_traverse(ctx: &ServiceContainer, source: &KeySource) -> CliResult<()> {
    let view = ctx.tree_service.build(source)?;
    output::info(&output::format_keys(&view.tree.keys()));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_tree(ctx: &ServiceContainer, source: &KeySource) -> CliResult<()> {
    let view = ctx.tree_service.build(source)?;
    output::info(&view.tree.to_tree_string());
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_layout(ctx: &ServiceContainer, source: &KeySource) -> CliResult<()> {
    let view = ctx.tree_service.build(source)?;
    if view.layout.is_empty() {
        output::warning("tree is empty");
        return Ok(());
    }
    output::header(&format!("{:>8} {:>6} {:>6}", "key", "x", "y"));
    for pos in &view.layout {
        output::info(&format!("{:>8} {:>6} {:>6}", pos.key, pos.x, pos.y));
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_draw(
    ctx: &ServiceContainer,
    source: &KeySource,
    highlight: Option<&[Key]>,
    no_color: bool,
) -> CliResult<()> {
    let view = ctx.tree_service.build(source)?;
    let route = match highlight {
        Some([a, b]) => view.tree.route(*a, *b)?,
        Some(other) => {
            return Err(CliError::InvalidArgs(format!(
                "--highlight takes exactly two keys, got {}",
                other.len()
            )))
        }
        None => Vec::new(),
    };
    debug!("highlighting {} nodes", route.len());

    let canvas = Canvas::render(&view, &ctx.settings.canvas, &route);
    if no_color || !ctx.settings.canvas.color {
        output::info(&canvas.to_plain_string());
    } else {
        output::info(&canvas.to_colored_string());
    }
    if !route.is_empty() {
        output::action("route", &output::format_path(&view.keys_of(&route)));
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_path(ctx: &ServiceContainer, source: &KeySource, key: Key) -> CliResult<()> {
    let view = ctx.tree_service.build(source)?;
    output::info(&output::format_path(&view.path(key)?));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_ancestor(ctx: &ServiceContainer, source: &KeySource, a: Key, b: Key) -> CliResult<()> {
    let view = ctx.tree_service.build(source)?;
    output::info(&view.ancestor(a, b)?);
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_route(ctx: &ServiceContainer, source: &KeySource, a: Key, b: Key) -> CliResult<()> {
    let view = ctx.tree_service.build(source)?;
    output::info(&output::format_path(&view.route(a, b)?));
    Ok(())
}

#[instrument(skip(ctx, local))]
fn cmd_config(
    ctx: &ServiceContainer,
    command: &ConfigCommands,
    local: Option<&std::path::Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&ctx.settings.to_toml()?);
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| ApplicationError::Config {
                message: "cannot determine config directory".to_string(),
            })?;
            if ctx.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            ctx.fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            ctx.fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            info!("wrote config template to {}", path.display());
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::info(&format!("global: {}{}", path.display(), state));
                }
                None => output::info("global: <unavailable>"),
            }
            if let Some(path) = local {
                output::info(&format!("local:  {}", path.display()));
            }
        }
    }
    Ok(())
}
