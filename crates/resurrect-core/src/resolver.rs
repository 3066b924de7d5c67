//! Restart commands for foreground subprocesses.
//!
//! When a window's shell is running an allow-listed program (an editor, a
//! pager, `htop`, ...), the saved session relaunches it through the user's
//! shell and drops back into an interactive shell once it exits:
//!
//! ```text
//! /bin/zsh -c 'nvim notes.txt && /bin/zsh'
//! ```

use std::collections::BTreeSet;

use tracing::debug;

use crate::process::{ProcessNode, ProcessTable};
use crate::tree::Window;

/// Anything that can turn a window into a restart command.
///
/// An empty string means "nothing to restart, just open a shell".
pub trait SubprocessResolver {
    fn restart_command(&self, window: &Window) -> String;
}

impl<F> SubprocessResolver for F
where
    F: Fn(&Window) -> String,
{
    fn restart_command(&self, window: &Window) -> String {
        self(window)
    }
}

/// Resolves restart commands from the live process table.
pub struct ProcessResolver<'a, T> {
    table: T,
    allowed: &'a BTreeSet<String>,
}

impl<'a, T: ProcessTable> ProcessResolver<'a, T> {
    pub fn new(table: T, allowed: &'a BTreeSet<String>) -> Self {
        Self { table, allowed }
    }

    /// First allow-listed descendant of `pid`, in table enumeration order.
    ///
    /// A vanished or unreadable process yields `None`.
    pub fn find_subprocess(&self, pid: u32) -> Option<ProcessNode> {
        let descendants = match self.table.descendants(pid) {
            Ok(descendants) => descendants,
            Err(e) => {
                debug!("Skipping subprocess lookup under pid {}: {}", e.pid(), e);
                return None;
            }
        };

        descendants
            .into_iter()
            .find(|node| self.allowed.contains(&node.name))
    }
}

impl<T: ProcessTable> SubprocessResolver for ProcessResolver<'_, T> {
    fn restart_command(&self, window: &Window) -> String {
        let Some(pid) = window.pid else {
            return String::new();
        };
        match self.find_subprocess(pid) {
            Some(node) => {
                debug!(
                    "Window {} runs allow-listed '{}' (pid {})",
                    pid, node.name, node.pid
                );
                restart_command(&node, window.shell())
            }
            None => String::new(),
        }
    }
}

/// Build `<shell> -c '<argv...> && <shell>'` for `node`.
///
/// Each argv element is quoted on its own, then the whole `-c` payload is
/// quoted as one word, so arguments containing spaces or quotes survive.
pub fn restart_command(node: &ProcessNode, shell: &str) -> String {
    let command = if node.argv.is_empty() {
        shell_words::quote(&node.name).into_owned()
    } else {
        shell_words::join(&node.argv)
    };
    let shell = shell_words::quote(shell);
    let script = format!("{} && {}", command, shell);
    format!("{} -c {}", shell, shell_words::quote(&script))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::process::MemoryProcessTable;

    fn node(pid: u32, name: &str, argv: &[&str]) -> ProcessNode {
        ProcessNode {
            pid,
            name: name.to_string(),
            argv: argv.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn window(pid: u32, shell: Option<&str>) -> Window {
        let mut env = BTreeMap::new();
        if let Some(shell) = shell {
            env.insert("SHELL".to_string(), shell.to_string());
        }
        Window {
            pid: Some(pid),
            cwd: "/home/u".to_string(),
            env,
        }
    }

    fn allow(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_command_defaults_to_bash() {
        let allowed = allow(&["vim"]);
        let table = MemoryProcessTable::new()
            .with_root(10)
            .with_child(10, node(11, "vim", &["vim", "notes.txt"]));
        let resolver = ProcessResolver::new(table, &allowed);

        assert_eq!(
            resolver.restart_command(&window(10, None)),
            "bash -c 'vim notes.txt && bash'"
        );
    }

    #[test]
    fn test_uses_window_shell() {
        let allowed = allow(&["htop"]);
        let table = MemoryProcessTable::new()
            .with_root(10)
            .with_child(10, node(11, "htop", &["htop"]));
        let resolver = ProcessResolver::new(table, &allowed);

        assert_eq!(
            resolver.restart_command(&window(10, Some("/usr/bin/zsh"))),
            "/usr/bin/zsh -c 'htop && /usr/bin/zsh'"
        );
    }

    #[test]
    fn test_no_allow_listed_descendant() {
        let allowed = allow(&["vim"]);
        let table = MemoryProcessTable::new()
            .with_root(10)
            .with_child(10, node(11, "cargo", &["cargo", "build"]));
        let resolver = ProcessResolver::new(table, &allowed);

        assert_eq!(resolver.restart_command(&window(10, None)), "");
    }

    #[test]
    fn test_vanished_shell_degrades_to_empty() {
        let allowed = allow(&["vim"]);
        let resolver = ProcessResolver::new(MemoryProcessTable::new(), &allowed);
        assert_eq!(resolver.restart_command(&window(404, None)), "");
    }

    #[test]
    fn test_window_without_pid_has_nothing_to_restart() {
        let allowed = allow(&["vim"]);
        let table = MemoryProcessTable::new()
            .with_root(10)
            .with_child(10, node(11, "vim", &["vim"]));
        let resolver = ProcessResolver::new(table, &allowed);

        let mut pending = window(10, None);
        pending.pid = None;
        assert_eq!(resolver.restart_command(&pending), "");
    }

    #[test]
    fn test_matches_grandchildren() {
        let allowed = allow(&["nvim"]);
        let table = MemoryProcessTable::new()
            .with_root(10)
            .with_child(10, node(11, "sh", &["sh", "-c", "nvim"]))
            .with_child(11, node(12, "nvim", &["nvim"]));
        let resolver = ProcessResolver::new(table, &allowed);

        assert_eq!(resolver.find_subprocess(10).map(|n| n.pid), Some(12));
    }

    #[test]
    fn test_first_match_in_enumeration_order_wins() {
        // The order comes from the table, not from sorting. With a real OS
        // table this choice is not stable; here it is pinned by insertion order.
        let allowed = allow(&["vim", "less"]);
        let table = MemoryProcessTable::new()
            .with_root(10)
            .with_child(10, node(30, "less", &["less", "log"]))
            .with_child(10, node(20, "vim", &["vim"]));
        let resolver = ProcessResolver::new(table, &allowed);

        assert_eq!(resolver.find_subprocess(10).map(|n| n.pid), Some(30));
    }

    #[test]
    fn test_arguments_are_quoted_individually() {
        let cmd = restart_command(
            &node(1, "vim", &["vim", "my notes.txt", "it's"]),
            "bash",
        );
        // The -c payload must split back into the original argv.
        let words = shell_words::split(&cmd).unwrap();
        assert_eq!(words[0], "bash");
        assert_eq!(words[1], "-c");
        assert_eq!(words.len(), 3);
        let inner = shell_words::split(&words[2]).unwrap();
        assert_eq!(inner, vec!["vim", "my notes.txt", "it's", "&&", "bash"]);
    }

    #[test]
    fn test_metacharacters_are_not_interpreted() {
        let cmd = restart_command(&node(1, "less", &["less", "a;rm -rf ~"]), "bash");
        let words = shell_words::split(&cmd).unwrap();
        let inner = shell_words::split(&words[2]).unwrap();
        assert_eq!(inner[1], "a;rm -rf ~");
    }

    #[test]
    fn test_empty_argv_falls_back_to_name() {
        assert_eq!(
            restart_command(&node(1, "top", &[]), "bash"),
            "bash -c 'top && bash'"
        );
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |w: &Window| format!("pid {:?}", w.pid);
        assert_eq!(resolver.restart_command(&window(5, None)), "pid Some(5)");
    }
}
