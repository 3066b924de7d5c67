//! The live OS process table.
//!
//! On Linux descendants are found by scanning `/proc` once, building a
//! parent-to-children map and walking it with a stack from the requested pid.
//! `/proc` lists pids in ascending order and the walk pops the most recently
//! pushed child first, so the resulting order depends on pid allocation and is
//! not meaningful beyond "all descendants".

use resurrect_core::error::ProcessLookupError;
use resurrect_core::process::{ProcessNode, ProcessTable};

/// Process table backed by the running system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcessTable;

#[cfg(target_os = "linux")]
impl ProcessTable for OsProcessTable {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessNode>, ProcessLookupError> {
        use std::collections::HashMap;

        use procfs::process::{all_processes, Process};
        use tracing::debug;

        let lookup = |e: procfs::ProcError| match e {
            procfs::ProcError::NotFound(_) => ProcessLookupError::Vanished { pid },
            other => ProcessLookupError::Inspect {
                pid,
                message: other.to_string(),
            },
        };

        let root_pid = i32::try_from(pid).map_err(|_| ProcessLookupError::Vanished { pid })?;
        Process::new(root_pid)
            .and_then(|root| root.stat())
            .map_err(lookup)?;

        let mut by_parent: HashMap<i32, Vec<(Process, String)>> = HashMap::new();
        for process in all_processes().map_err(lookup)? {
            // Processes exiting mid-scan are simply skipped.
            let Ok(process) = process else { continue };
            let Ok(stat) = process.stat() else { continue };
            by_parent
                .entry(stat.ppid)
                .or_default()
                .push((process, stat.comm));
        }

        let mut found = Vec::new();
        let mut stack = vec![root_pid];
        while let Some(current) = stack.pop() {
            let Some(children) = by_parent.remove(&current) else {
                continue;
            };
            for (process, name) in children {
                let argv = process.cmdline().unwrap_or_else(|e| {
                    debug!("Could not read cmdline of {}: {}", process.pid, e);
                    Vec::new()
                });
                stack.push(process.pid);
                found.push(ProcessNode {
                    pid: process.pid as u32,
                    name: full_name(name, &argv),
                    argv,
                });
            }
        }

        Ok(found)
    }
}

/// Linux truncates `comm` to 15 bytes; recover the full name from argv[0]
/// when it is clearly the same program.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn full_name(comm: String, argv: &[String]) -> String {
    const COMM_LEN: usize = 15;

    if comm.len() < COMM_LEN {
        return comm;
    }
    let base = argv
        .first()
        .and_then(|arg0| std::path::Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned());
    match base {
        Some(base) if base.starts_with(&comm) => base,
        _ => comm,
    }
}

#[cfg(not(target_os = "linux"))]
impl ProcessTable for OsProcessTable {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessNode>, ProcessLookupError> {
        Err(ProcessLookupError::Inspect {
            pid,
            message: "process inspection is only supported on Linux".to_string(),
        })
    }
}


#[cfg(all(test, target_os = "linux"))]
mod tests {
    use std::process::{Command, Stdio};
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_full_name_recovers_truncated_comm() {
        let argv = vec!["/usr/bin/jupyter-notebook".to_string(), "--no-browser".to_string()];
        assert_eq!(full_name("jupyter-noteboo".to_string(), &argv), "jupyter-notebook");
    }

    #[test]
    fn test_full_name_keeps_short_or_unrelated_comm() {
        let argv = vec!["/usr/bin/nvim".to_string()];
        assert_eq!(full_name("nvim".to_string(), &argv), "nvim");
        // Programs that rewrite their title keep their comm.
        let argv = vec!["postgres: writer".to_string()];
        assert_eq!(full_name("postgres-writer".to_string(), &argv), "postgres-writer");
        assert_eq!(full_name("some-long-daemon".to_string(), &[]), "some-long-daemon");
    }

    #[test]
    fn test_vanished_pid() {
        // Pids are capped well below i32::MAX on Linux.
        let err = OsProcessTable.descendants(i32::MAX as u32 - 1).unwrap_err();
        assert!(matches!(err, ProcessLookupError::Vanished { .. }));
    }

    #[test]
    fn test_finds_grandchild_with_argv() {
        // sh -> sleep, where sleep is a grandchild of the test process.
        let mut child = Command::new("sh")
            .args(["-c", "sleep 7.25 & wait"])
            .stdout(Stdio::null())
            .spawn()
            .expect("spawn sh");
        let me = std::process::id();

        let deadline = Instant::now() + Duration::from_secs(5);
        let found = loop {
            let nodes = OsProcessTable.descendants(me).expect("own pid exists");
            if let Some(node) = nodes.into_iter().find(|n| {
                n.name == "sleep" && n.argv.iter().any(|a| a == "7.25")
            }) {
                break Some(node);
            }
            if Instant::now() > deadline {
                break None;
            }
            std::thread::sleep(Duration::from_millis(20));
        };

        let _ = child.kill();
        let _ = child.wait();

        let node = found.expect("sleep grandchild not found");
        assert_eq!(node.argv, vec!["sleep", "7.25"]);
    }
}
