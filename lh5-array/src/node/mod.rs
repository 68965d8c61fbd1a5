//! The typed object tree.
//!
//! A [`Node`] is one LH5 object: a scalar, a leaf array, or a composite owning named children.
//! Waveform tables are a variant of their own rather than a flavour of [`Table`], so code
//! matching on [`Node`] handles them explicitly.

mod leaf;
mod scalar;
mod struct_;
mod table;
mod waveform;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use leaf::*;
use lh5_dtype::Kind;
use lh5_error::Lh5Result;
pub use scalar::*;
pub use struct_::*;
pub use table::*;
pub use waveform::*;

/// Object attributes. Keys are unique and their order carries no meaning.
pub type Attributes = BTreeMap<String, String>;

/// A name for a child of a composite node
pub type FieldName = Arc<str>;

/// One object of an LH5 tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A single value.
    Scalar(Scalar),
    /// A row-indexed array.
    Leaf(Leaf),
    /// Heterogeneous named children.
    Struct(Struct),
    /// Named columns sharing one row count.
    Table(Table),
    /// The `t0`, `dt`, `values` triple of sampled waveforms.
    WaveformTable(WaveformTable),
}

impl Node {
    /// The structural kind of the node.
    pub fn kind(&self) -> Kind {
        match self {
            Node::Scalar(_) => Kind::Scalar,
            Node::Leaf(leaf) => leaf.kind().into(),
            Node::Struct(s) if s.is_histogram() => Kind::Histogram,
            Node::Struct(_) => Kind::Struct,
            Node::Table(_) => Kind::Table,
            Node::WaveformTable(_) => Kind::WaveformTable,
        }
    }

    /// The node's attributes.
    pub fn attrs(&self) -> &Attributes {
        match self {
            Node::Scalar(n) => n.attrs(),
            Node::Leaf(n) => n.attrs(),
            Node::Struct(n) => n.attrs(),
            Node::Table(n) => n.attrs(),
            Node::WaveformTable(n) => n.attrs(),
        }
    }

    /// Number of rows, if the node is row-indexed.
    ///
    /// Scalars and structs have no row axis.
    pub fn len(&self) -> Option<usize> {
        match self {
            Node::Scalar(_) | Node::Struct(_) => None,
            Node::Leaf(leaf) => Some(leaf.len()),
            Node::Table(table) => Some(table.len()),
            Node::WaveformTable(wf) => Some(wf.len()),
        }
    }

    /// The named children of a composite node, in order. Leaves and scalars have none.
    pub fn children(&self) -> Vec<(&str, &Node)> {
        match self {
            Node::Scalar(_) | Node::Leaf(_) => Vec::new(),
            Node::Struct(s) => s.fields().iter().map(|(n, c)| (n.as_ref(), c)).collect(),
            Node::Table(t) => t.columns().iter().map(|(n, c)| (n.as_ref(), c)).collect(),
            Node::WaveformTable(wf) => wf.children().into_iter().collect(),
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children()
            .into_iter()
            .find_map(|(n, child)| (n == name).then_some(child))
    }

    /// Find a descendant by slash-separated path relative to this node.
    pub fn descendant(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Restrict every row-indexed part of the node to `n_rows` rows starting at `start`.
    ///
    /// Windows are clamped to the available rows. Scalars are returned unchanged, and struct
    /// fields are windowed individually.
    pub fn window(&self, start: usize, n_rows: Option<usize>) -> Lh5Result<Node> {
        Ok(match self {
            Node::Scalar(_) => self.clone(),
            Node::Leaf(leaf) => Node::Leaf(leaf.with_data(leaf.data().window(start, n_rows)?)?),
            Node::Struct(s) => Node::Struct(Struct::new(
                window_children(s.fields(), start, n_rows)?,
                s.attrs().clone(),
            )),
            Node::Table(t) => Node::Table(Table::try_new(
                window_children(t.columns(), start, n_rows)?,
                t.attrs().clone(),
            )?),
            Node::WaveformTable(wf) => Node::WaveformTable(WaveformTable::try_new(
                wf.t0().window(start, n_rows)?,
                wf.dt().window(start, n_rows)?,
                wf.values().window(start, n_rows)?,
                wf.attrs().clone(),
            )?),
        })
    }
}

fn window_children(
    children: &[(FieldName, Node)],
    start: usize,
    n_rows: Option<usize>,
) -> Lh5Result<Vec<(FieldName, Node)>> {
    children
        .iter()
        .map(|(name, child)| Ok((name.clone(), child.window(start, n_rows)?)))
        .collect()
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<Leaf> for Node {
    fn from(value: Leaf) -> Self {
        Node::Leaf(value)
    }
}

impl From<Struct> for Node {
    fn from(value: Struct) -> Self {
        Node::Struct(value)
    }
}

impl From<Table> for Node {
    fn from(value: Table) -> Self {
        Node::Table(value)
    }
}

impl From<WaveformTable> for Node {
    fn from(value: WaveformTable) -> Self {
        Node::WaveformTable(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RowArray, Values};

    fn array(values: Vec<i64>) -> Node {
        Leaf::array(RowArray::from(Values::from(values)), Attributes::new())
            .unwrap()
            .into()
    }

    fn sample() -> Node {
        let waveform = WaveformTable::try_new(
            array(vec![0, 0, 0, 0]),
            array(vec![16, 16, 16, 16]),
            array(vec![1, 2, 3, 4]),
            Attributes::new(),
        )
        .unwrap();
        let table = Table::try_new(
            vec![
                ("energy".into(), array(vec![10, 11, 12, 13])),
                ("waveform".into(), waveform.into()),
            ],
            Attributes::new(),
        )
        .unwrap();
        Struct::new(
            vec![
                ("raw".into(), table.into()),
                ("flag".into(), Scalar::new(true.into(), Attributes::new()).into()),
            ],
            Attributes::new(),
        )
        .into()
    }

    #[test]
    fn descendant_lookup() {
        let node = sample();
        assert_eq!(node.descendant("raw/waveform/dt").and_then(Node::len), Some(4));
        assert_eq!(
            node.descendant("raw/waveform").map(Node::kind),
            Some(Kind::WaveformTable)
        );
        assert!(node.descendant("raw/missing").is_none());
        assert_eq!(node.descendant(""), Some(&node));
    }

    #[test]
    fn window_applies_to_all_rows() {
        let windowed = sample().window(1, Some(2)).unwrap();
        assert_eq!(windowed.descendant("raw").and_then(Node::len), Some(2));
        assert_eq!(
            windowed.descendant("raw/waveform/values"),
            Some(&array(vec![2, 3]))
        );
        assert_eq!(
            windowed.descendant("flag").map(Node::kind),
            Some(Kind::Scalar)
        );
    }
}
