//! Dependency tree rendering.
//!
//! Renders each root and its transitive dependencies as an indented
//! `A -> B` tree. Shared (diamond) sub-graphs are expanded once per root;
//! edges whose resolution never completed render as
//! `UNRESOLVED dependency to: <type>`.

use std::collections::HashSet;
use std::io::{self, Write};

use crate::context::ContextState;
use crate::key::Key;

pub(crate) fn render<W: Write>(state: &ContextState, out: &mut W) -> io::Result<()> {
    for root in &state.roots {
        let node = state.canonical(root);
        if !state.objects.contains_key(&node) {
            continue;
        }
        writeln!(out, "{}", print_name(root, &node))?;
        let mut visited = HashSet::new();
        visited.insert(node.clone());
        render_dependencies(state, out, &node, 1, &mut visited)?;
    }
    Ok(())
}

fn render_dependencies<W: Write>(
    state: &ContextState,
    out: &mut W,
    node: &Key,
    depth: usize,
    visited: &mut HashSet<Key>,
) -> io::Result<()> {
    if let Some(edges) = state.edges.get(node) {
        for edge in edges {
            write!(out, "{}-> ", "  ".repeat(depth))?;
            match &edge.resolved {
                None => {
                    writeln!(out, "UNRESOLVED dependency to: {}", edge.declared.display_name())?;
                }
                Some(target) => {
                    writeln!(out, "{}", print_name(&edge.declared, target))?;
                    if visited.insert(target.clone()) {
                        render_dependencies(state, out, target, depth + 1, visited)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_name(declared: &Key, concrete: &Key) -> String {
    if declared == concrete {
        format!("{} ({})", concrete.short_name(), concrete.display_name())
    } else {
        format!("{} ({})", declared.display_name(), concrete.display_name())
    }
}
