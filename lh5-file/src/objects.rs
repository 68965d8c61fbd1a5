use std::path::Path;

use lh5_array::Node;
use lh5_error::{Lh5Result, lh5_bail, lh5_err};

use crate::{RowCount, WriteMode};

/// The ordered top-level objects of one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Objects {
    entries: Vec<(String, Node)>,
}

impl Objects {
    pub(crate) fn new(entries: Vec<(String, Node)>) -> Self {
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &[(String, Node)] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Node)> {
        self.entries
    }

    pub(crate) fn list(&self, recursive: bool) -> Vec<String> {
        let mut names = Vec::new();
        for (name, node) in &self.entries {
            names.push(name.clone());
            if recursive {
                list_descendants(name, node, &mut names);
            }
        }
        names
    }

    /// Look up an object by path and cut the requested row window out of it.
    pub(crate) fn read(
        &self,
        name: &str,
        source: &Path,
        start_row: usize,
        n_rows: RowCount,
    ) -> Lh5Result<Node> {
        let name = name.trim_matches('/');
        let (top, rest) = name.split_once('/').unwrap_or((name, ""));
        let node = self
            .entries
            .iter()
            .find_map(|(n, node)| (n == top).then_some(node))
            .and_then(|node| node.descendant(rest))
            .ok_or_else(|| lh5_err!(NotFound: "{} in {}", name, source.display()))?;
        node.window(start_row, n_rows.bound())
    }

    /// Apply `mode` to this object set. `exists` tells whether the destination already exists.
    pub(crate) fn write(
        &mut self,
        node: &Node,
        name: &str,
        destination: &Path,
        mode: WriteMode,
        exists: bool,
    ) -> Lh5Result<()> {
        let name = name.trim_matches('/');
        if name.is_empty() || name.contains('/') {
            lh5_bail!("'{}' is not a valid top-level object name", name);
        }
        match mode {
            WriteMode::OverwriteFile => self.entries.clear(),
            WriteMode::Append if !exists => {
                lh5_bail!(NotFound: "{} (cannot append)", destination.display())
            }
            WriteMode::WriteSafe | WriteMode::Append => {}
        }
        if self.entries.iter().any(|(n, _)| n == name) {
            lh5_bail!(AlreadyExists: "{} in {}", name, destination.display());
        }
        self.entries.push((name.to_string(), node.clone()));
        Ok(())
    }
}

fn list_descendants(prefix: &str, node: &Node, names: &mut Vec<String>) {
    for (child_name, child) in node.children() {
        let path = format!("{prefix}/{child_name}");
        names.push(path.clone());
        list_descendants(&path, child, names);
    }
}
