//! Client for kitty's remote-control channel.

use std::process::Stdio;
use std::time::Duration;

use resurrect_core::config::KittyConfig;
use resurrect_core::error::{Result, TransportError};
use resurrect_core::tree::ContainerTree;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Placeholder kitty substitutes with its own pid in `listen_on`.
pub const KITTY_PID_PLACEHOLDER: &str = "{kitty_pid}";

/// Resolve the socket address of the kitty instance running as `pid`.
///
/// kitty expands `{kitty_pid}` in `listen_on`; without the placeholder it
/// appends `-<pid>` itself, so both forms are mirrored here.
pub fn resolve_listen_socket(template: &str, pid: u32) -> String {
    if template.contains(KITTY_PID_PLACEHOLDER) {
        template.replace(KITTY_PID_PLACEHOLDER, &pid.to_string())
    } else {
        format!("{}-{}", template, pid)
    }
}

/// Runs remote-control commands against a kitty instance.
pub struct KittyClient {
    command: Vec<String>,
    timeout: Duration,
}

impl KittyClient {
    pub fn new(config: &KittyConfig) -> Self {
        Self {
            command: config.kitty_command.clone(),
            timeout: config.request_timeout(),
        }
    }

    /// Fetch the full window tree, environment variables included.
    pub async fn query_tree(&self, address: &str) -> Result<ContainerTree> {
        let stdout = self
            .run(&["@", "--to", address, "ls", "--all-env-vars"])
            .await?;
        debug!("Received {} bytes from {}", stdout.len(), address);

        let tree = ContainerTree::from_json(&stdout)?;
        debug!(
            "Tree has {} OS windows, {} tabs, {} windows",
            tree.roots().len(),
            tree.tab_count(),
            tree.window_count()
        );
        Ok(tree)
    }

    /// Run one remote-control command and return its stdout.
    ///
    /// The child is killed if it outlives the configured timeout.
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, TransportError> {
        let (program, leading) = self
            .command
            .split_first()
            .ok_or_else(|| TransportError::Spawn {
                program: String::new(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "kitty_command is empty",
                ),
            })?;

        debug!("Running: {} {} {}", program, leading.join(" "), args.join(" "));

        let child = Command::new(program)
            .args(leading)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: program.clone(),
                source,
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| TransportError::Timeout {
                after: self.timeout,
            })?
            .map_err(TransportError::Io)?;

        if !output.status.success() {
            return Err(TransportError::Exit {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output.stdout)
    }
}
