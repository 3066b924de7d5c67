//! kitty integration: query a running instance and compile its session.

pub mod client;

use resurrect_core::config::KittyConfig;
use resurrect_core::error::{Error, TransportError};
use resurrect_core::process::ProcessTable;
use resurrect_core::resolver::ProcessResolver;
use resurrect_core::session;
use resurrect_core::tree::ContainerTree;
use tracing::debug;

pub use client::{resolve_listen_socket, KittyClient};

/// Which OS windows of the instance end up in the script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Only the first OS window, as kitty session files describe one window.
    #[default]
    FirstWindow,
    AllWindows,
}

/// Fetch the window tree of the kitty instance running as `pid`.
///
/// Blocks for at most the configured request timeout.
pub fn fetch_tree(config: &KittyConfig, pid: u32) -> Result<ContainerTree, Error> {
    let address = resolve_listen_socket(&config.listen_socket, pid);
    debug!("Querying kitty {} at {}", pid, address);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(TransportError::Io)?;

    runtime.block_on(KittyClient::new(config).query_tree(&address))
}

/// Compile `tree`, resolving subprocesses against `table`.
pub fn compile_tree(
    tree: &ContainerTree,
    config: &KittyConfig,
    table: impl ProcessTable,
    scope: Scope,
) -> String {
    let resolver = ProcessResolver::new(table, &config.subprocesses);
    match scope {
        Scope::FirstWindow => session::compile(tree, &resolver),
        Scope::AllWindows => session::compile_all(tree, &resolver),
    }
}
