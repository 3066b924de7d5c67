//! CLI argument parsing with clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

const DIRECTORY_HELP: &str = "Artifact directory [default: from config, ~/.i3/i3-resurrect]";

/// Save and restore terminal sessions.
///
/// Captures the tabs, layouts, working directories and foreground programs
/// of a running kitty instance as a kitty session file, and manages the
/// saved workspace and profile artifacts.
#[derive(Debug, Parser)]
#[command(name = "resurrect", version)]
pub struct Cli {
    /// Config file [default: $RESURRECT_CONFIG or <config dir>/resurrect/config.json]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Capture a running kitty instance
    #[command(subcommand)]
    Kitty(KittyCommands),

    /// List saved workspaces or profiles
    #[command(after_help = "\
Examples:
  resurrect ls                          # Saved workspaces
  resurrect ls profiles                 # Saved profiles
  resurrect ls -d /tmp/saves            # Use another directory")]
    Ls(LsArgs),

    /// Remove saved layout or programs
    #[command(after_help = "\
Examples:
  resurrect rm -w 1                     # Remove layout and programs of workspace 1
  resurrect rm -p work --layout-only    # Remove only the layout of profile 'work'")]
    Rm(RmArgs),

    /// Encode or decode artifact filenames
    #[command(subcommand)]
    Name(NameCommands),
}

#[derive(Debug, Subcommand)]
pub enum KittyCommands {
    /// Write the session of a kitty instance to <directory>/kitty-session-<pid>
    #[command(after_help = "\
Examples:
  resurrect kitty save --pid 4242               # Save into the default directory
  resurrect kitty save --pid 4242 -p work       # Save into the 'work' profile directory
  resurrect kitty save --pid 4242 --all-windows # Include every OS window")]
    Save(SaveArgs),

    /// Print the session of a kitty instance to stdout
    Print(CaptureArgs),
}

#[derive(Debug, clap::Args)]
pub struct CaptureArgs {
    /// Pid of the kitty instance
    #[arg(long)]
    pub pid: u32,

    /// Compile every OS window instead of only the first
    #[arg(long)]
    pub all_windows: bool,
}

#[derive(Debug, clap::Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub capture: CaptureArgs,

    #[arg(short, long, help = DIRECTORY_HELP)]
    pub directory: Option<String>,

    /// Save under the profiles directory. The name is not part of the
    /// filename, so saving two profiles for the same pid overwrites one
    /// kitty-session-<pid>
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListItem {
    Workspaces,
    Profiles,
}

#[derive(Debug, clap::Args)]
pub struct LsArgs {
    /// What to list
    #[arg(value_enum, default_value_t = ListItem::Workspaces)]
    pub item: ListItem,

    #[arg(short, long, help = DIRECTORY_HELP)]
    pub directory: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(group = clap::ArgGroup::new("owner").required(true).args(["workspace", "profile"]))]
pub struct RmArgs {
    /// The saved workspace to delete
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// The profile to delete
    #[arg(short, long)]
    pub profile: Option<String>,

    #[arg(short, long, help = DIRECTORY_HELP)]
    pub directory: Option<String>,

    /// Only delete the saved layout
    #[arg(long, conflicts_with = "programs_only")]
    pub layout_only: bool,

    /// Only delete the saved programs
    #[arg(long)]
    pub programs_only: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Scope {
    Workspace,
    Profile,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Kind {
    Layout,
    Programs,
}

#[derive(Debug, Subcommand)]
pub enum NameCommands {
    /// Print the filename for a workspace or profile artifact
    Encode {
        #[arg(long, value_enum)]
        scope: Scope,
        #[arg(long, value_enum)]
        kind: Kind,
        /// Workspace name/number or profile name
        id: String,
    },
    /// Print the scope, id and kind encoded in a filename
    Decode {
        /// Scope to assume instead of inferring it from the prefix
        #[arg(long, value_enum)]
        scope: Option<Scope>,
        filename: String,
    },
}
