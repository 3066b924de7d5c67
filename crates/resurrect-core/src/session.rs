//! Compile a container tree into a kitty session script.
//!
//! The output is kitty's session file format, one directive per line:
//!
//! ```text
//! new_tab
//! layout tall
//! focus
//! launch --cwd="/home/u/src" /bin/zsh -c 'nvim && /bin/zsh'
//! launch --cwd="/tmp"
//! ```
//!
//! Compilation is a pure function of the tree and the resolver's answers. It
//! never fails: a window with an empty cwd still produces a `launch` line.

use std::fmt::Write;

use crate::resolver::SubprocessResolver;
use crate::tree::{ContainerTree, OsWindow, Tab, Window};

/// A single line of a session script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    NewTab,
    Layout(String),
    Focus,
    Launch { cwd: String, command: String },
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::NewTab => write!(f, "new_tab"),
            Directive::Layout(layout) => write!(f, "layout {}", layout),
            Directive::Focus => write!(f, "focus"),
            Directive::Launch { cwd, command } if command.is_empty() => {
                write!(f, "launch --cwd=\"{}\"", cwd)
            }
            Directive::Launch { cwd, command } => {
                write!(f, "launch --cwd=\"{}\" {}", cwd, command)
            }
        }
    }
}

/// Compile the first OS window of `tree`.
///
/// kitty sessions describe a single OS window, so additional roots are not
/// part of the script. An empty tree compiles to an empty script.
pub fn compile(tree: &ContainerTree, resolver: &impl SubprocessResolver) -> String {
    tree.first_root()
        .map(|root| render(&directives(root, resolver)))
        .unwrap_or_default()
}

/// Compile every OS window of `tree`, in order, into one script.
pub fn compile_all(tree: &ContainerTree, resolver: &impl SubprocessResolver) -> String {
    let mut all = Vec::new();
    for root in tree.roots() {
        all.extend(directives(root, resolver));
    }
    render(&all)
}

/// Directives for one OS window.
///
/// Only the first active tab is focused; any later tab also claiming to be
/// active is emitted without a `focus`.
pub fn directives(root: &OsWindow, resolver: &impl SubprocessResolver) -> Vec<Directive> {
    let mut out = Vec::new();
    let mut focused = false;

    for tab in &root.tabs {
        tab_directives(tab, !focused && tab.is_active, resolver, &mut out);
        focused |= tab.is_active;
    }

    out
}

fn tab_directives(
    tab: &Tab,
    focus: bool,
    resolver: &impl SubprocessResolver,
    out: &mut Vec<Directive>,
) {
    out.push(Directive::NewTab);
    out.push(Directive::Layout(tab.layout.clone()));
    if focus {
        out.push(Directive::Focus);
    }
    for window in &tab.windows {
        out.push(launch(window, resolver));
    }
}

fn launch(window: &Window, resolver: &impl SubprocessResolver) -> Directive {
    Directive::Launch {
        cwd: window.cwd.clone(),
        command: resolver.restart_command(window),
    }
}

fn render(directives: &[Directive]) -> String {
    let mut script = String::new();
    for directive in directives {
        // Writing to a String cannot fail.
        let _ = writeln!(script, "{}", directive);
    }
    script
}
