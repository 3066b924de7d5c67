//! Core types and logic for resurrect.
//!
//! This crate turns a snapshot of a running kitty instance into a session
//! script that reopens the same tabs, layouts, working directories and
//! foreground programs. It performs no I/O of its own: the remote-control
//! query and the process table are supplied by the caller.
//!
//! # Modules
//!
//! - [`naming`]: artifact filename encoding and decoding
//! - [`tree`]: the `kitty @ ls` window tree
//! - [`process`]: read-only process table abstraction
//! - [`resolver`]: restart commands for allow-listed subprocesses
//! - [`session`]: tree to session-script compilation
//! - [`config`]: configuration values
//! - [`error`]: error taxonomy with suggestions
//!
//! # Saving a session
//!
//! ```
//! use std::collections::BTreeSet;
//! use resurrect_core::process::MemoryProcessTable;
//! use resurrect_core::resolver::ProcessResolver;
//! use resurrect_core::session::compile;
//! use resurrect_core::tree::ContainerTree;
//!
//! let tree = ContainerTree::from_json(
//!     br#"[{"tabs": [{"layout": "tall", "is_active": true,
//!                      "windows": [{"pid": 1, "cwd": "/home/u"}]}]}]"#,
//! ).unwrap();
//! let allowed = BTreeSet::new();
//! let resolver = ProcessResolver::new(MemoryProcessTable::new(), &allowed);
//!
//! assert_eq!(
//!     compile(&tree, &resolver),
//!     "new_tab\nlayout tall\nfocus\nlaunch --cwd=\"/home/u\"\n",
//! );
//! ```

pub mod config;
pub mod error;
pub mod naming;
pub mod process;
pub mod resolver;
pub mod session;
pub mod tree;
