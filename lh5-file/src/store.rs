use std::fmt::{Display, Formatter};
use std::path::Path;

use lh5_array::Node;
use lh5_error::Lh5Result;

/// How many rows to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowCount {
    /// At most this many rows.
    Bounded(usize),
    /// Every remaining row.
    Unbounded,
}

impl RowCount {
    /// The bound, if any.
    pub fn bound(&self) -> Option<usize> {
        match self {
            RowCount::Bounded(n) => Some(*n),
            RowCount::Unbounded => None,
        }
    }
}

impl From<Option<usize>> for RowCount {
    fn from(value: Option<usize>) -> Self {
        value.map_or(RowCount::Unbounded, RowCount::Bounded)
    }
}

impl Display for RowCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RowCount::Bounded(n) => write!(f, "{n}"),
            RowCount::Unbounded => write!(f, "all"),
        }
    }
}

/// What a write may do to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Discard everything in the destination, then write.
    OverwriteFile,
    /// Write into the destination, creating it if needed, but never replace an existing object.
    WriteSafe,
    /// Add an object to an existing destination. The object name must be new.
    Append,
}

/// Named-object access to LH5 files.
///
/// Object names are slash-separated paths from the file root. Calls are blocking.
pub trait Store {
    /// Names of the objects in `source`, in storage order.
    ///
    /// Without `recursive` only top-level names are returned; otherwise every descendant
    /// follows its parent (`a`, `a/b`, `a/b/c`, `a/d`, ...).
    fn list(&self, source: &Path, recursive: bool) -> Lh5Result<Vec<String>>;

    /// Read the object `name` from `source`, restricted to `n_rows` rows starting at
    /// `start_row`. The window is clamped to the rows available.
    fn read(&self, name: &str, source: &Path, start_row: usize, n_rows: RowCount)
    -> Lh5Result<Node>;

    /// Write `node` as the top-level object `name` of `destination`.
    fn write(&mut self, node: &Node, name: &str, destination: &Path, mode: WriteMode)
    -> Lh5Result<()>;
}
