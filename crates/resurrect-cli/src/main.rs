//! resurrect CLI entry point.

mod args;
mod config;
mod kitty;
mod process_table;
mod store;

use anyhow::{bail, Context};
use clap::Parser;
use resurrect_core::config::Config;
use resurrect_core::naming::{self, FileKind, ScopeKind};
use tracing::info;

use crate::args::{Cli, Commands, KittyCommands, ListItem, NameCommands, RmArgs, SaveArgs};
use crate::process_table::OsProcessTable;
use crate::store::Target;

fn main() {
    // Logs go to stderr so `kitty print` output stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = suggestion(&e) {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Kitty(KittyCommands::Save(args)) => run_save(&config, args),
        Commands::Kitty(KittyCommands::Print(args)) => {
            let script = capture(&config, &args)?;
            print!("{}", script);
            Ok(())
        }
        Commands::Ls(args) => {
            let scope = match args.item {
                ListItem::Workspaces => ScopeKind::Workspace,
                ListItem::Profiles => ScopeKind::Profile,
            };
            let directory = directory_or_default(&config, args.directory.as_deref());
            let directory = store::resolve_directory(directory, scope);
            let artifacts = store::list_artifacts(&directory, scope)?;
            if artifacts.is_empty() && scope == ScopeKind::Profile {
                println!("No profiles found");
            }
            for artifact in artifacts {
                println!("{}", artifact);
            }
            Ok(())
        }
        Commands::Rm(args) => run_remove(&config, args),
        Commands::Name(command) => run_name(command),
    }
}

/// Query kitty and compile its session.
fn capture(config: &Config, args: &args::CaptureArgs) -> anyhow::Result<String> {
    let kitty_config = &config.plugins.kitty;
    let tree = kitty::fetch_tree(kitty_config, args.pid)
        .with_context(|| format!("Failed to query kitty instance {}", args.pid))?;

    let scope = if args.all_windows {
        kitty::Scope::AllWindows
    } else {
        kitty::Scope::FirstWindow
    };
    Ok(kitty::compile_tree(&tree, kitty_config, OsProcessTable, scope))
}

fn run_save(config: &Config, args: SaveArgs) -> anyhow::Result<()> {
    let script = capture(config, &args.capture)?;

    let scope = match &args.profile {
        Some(profile) => {
            info!("Saving kitty {} for profile '{}'", args.capture.pid, profile);
            ScopeKind::Profile
        }
        None => ScopeKind::Workspace,
    };
    let directory = directory_or_default(config, args.directory.as_deref());
    let directory = store::resolve_directory(directory, scope);

    let path = store::write_session_file(&directory, args.capture.pid, &script)?;
    println!("{}", path.display());
    Ok(())
}

fn run_remove(config: &Config, args: RmArgs) -> anyhow::Result<()> {
    let (scope, id) = match (&args.profile, &args.workspace) {
        (Some(profile), _) => (ScopeKind::Profile, profile.as_str()),
        (None, Some(workspace)) => (ScopeKind::Workspace, workspace.as_str()),
        (None, None) => bail!("Either --profile or --workspace must be specified"),
    };

    let target = if args.layout_only {
        Target::LayoutOnly
    } else if args.programs_only {
        Target::ProgramsOnly
    } else {
        Target::Both
    };

    let directory = directory_or_default(config, args.directory.as_deref());
    let directory = store::resolve_directory(directory, scope);
    for path in store::remove_artifacts(&directory, scope, id, target)? {
        println!("Removed {}", path.display());
    }
    Ok(())
}

fn run_name(command: NameCommands) -> anyhow::Result<()> {
    match command {
        NameCommands::Encode { scope, kind, id } => {
            println!("{}", naming::encode(scope_kind(scope), &id, file_kind(kind)));
        }
        NameCommands::Decode { scope, filename } => {
            let name = match scope {
                Some(scope) => naming::decode_in(scope_kind(scope), &filename)?,
                None => naming::decode(&filename)?,
            };
            println!("{}", name);
        }
    }
    Ok(())
}

fn directory_or_default<'a>(config: &'a Config, flag: Option<&'a str>) -> &'a str {
    flag.unwrap_or(&config.directory)
}

fn scope_kind(scope: args::Scope) -> ScopeKind {
    match scope {
        args::Scope::Workspace => ScopeKind::Workspace,
        args::Scope::Profile => ScopeKind::Profile,
    }
}

fn file_kind(kind: args::Kind) -> FileKind {
    match kind {
        args::Kind::Layout => FileKind::Layout,
        args::Kind::Programs => FileKind::Programs,
    }
}

/// Find the first hint-bearing error in the chain.
fn suggestion(err: &anyhow::Error) -> Option<&'static str> {
    use resurrect_core::error::{DecodeError, Error, FilesystemError, TransportError};

    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<Error>() {
            Some(e.suggestion())
        } else if let Some(e) = cause.downcast_ref::<TransportError>() {
            Some(e.suggestion())
        } else if let Some(e) = cause.downcast_ref::<DecodeError>() {
            Some(e.suggestion())
        } else {
            cause.downcast_ref::<FilesystemError>().map(FilesystemError::suggestion)
        }
    })
}

#[cfg(test)]
mod tests {
    use resurrect_core::error::{Error, TransportError};

    use super::*;

    #[test]
    fn test_suggestion_found_through_context() {
        let err = anyhow::Error::from(Error::from(TransportError::Exit {
            status: Some(1),
            stderr: String::new(),
        }))
        .context("Failed to query kitty instance 1");
        assert!(suggestion(&err).unwrap().contains("allow_remote_control"));
    }

    #[test]
    fn test_no_suggestion_for_plain_errors() {
        let err = anyhow::anyhow!("plain");
        assert!(suggestion(&err).is_none());
    }

    #[test]
    fn test_directory_flag_overrides_config() {
        let config = Config::default();
        assert_eq!(directory_or_default(&config, Some("/x")), "/x");
        assert_eq!(
            directory_or_default(&config, None),
            resurrect_core::config::DEFAULT_DIRECTORY
        );
    }
}
