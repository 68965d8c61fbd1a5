//! Structure-preserving maps over object trees.
//!
//! [`map_node`] applies a [`LeafTransform`] to every leaf array of a tree, pruning the paths a
//! [`PathFilter`] does not admit. The shape of the output follows the input: composites keep
//! their surviving children in order and attributes are carried over, except for a table
//! `datatype` that no longer lists the right columns.

use lh5_array::{Leaf, Node, RowArray, Struct, Table, WaveformTable};
use lh5_dtype::DATATYPE_ATTR;
use lh5_error::{Lh5Result, lh5_err};
use log::debug;

use crate::PathFilter;

/// A per-leaf array transform.
pub trait LeafTransform {
    /// Transform the array of the leaf at `path`.
    fn transform(&self, path: &str, array: RowArray) -> Lh5Result<RowArray>;
}

impl<F> LeafTransform for F
where
    F: Fn(&str, RowArray) -> Lh5Result<RowArray>,
{
    fn transform(&self, path: &str, array: RowArray) -> Lh5Result<RowArray> {
        self(path, array)
    }
}

/// What a mapping pass left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEvents {
    /// Paths pruned from the output, outermost first.
    pub dropped_paths: Vec<String>,
    /// Number of leaves transformed.
    pub leaves_mapped: usize,
}

/// Map `transform` over the leaves of `node`, found at `path`.
///
/// Returns `None` if the filter excludes `node`, or if it is a waveform table that lost any of
/// its children. Composites whose children were all excluded are kept, empty.
///
/// # Errors
///
/// Fails with [`lh5_error::Lh5Error::UnsupportedNodeKind`] on a scalar that is not excluded, and
/// with whatever `transform` or the rebuilt leaf reports.
pub fn map_node<T: LeafTransform + ?Sized>(
    transform: &T,
    node: Node,
    path: &str,
    filter: &PathFilter,
    events: &mut MapEvents,
) -> Lh5Result<Option<Node>> {
    if !filter.is_included(path) {
        debug!("{path} excluded");
        events.dropped_paths.push(path.to_string());
        return Ok(None);
    }

    match node {
        Node::WaveformTable(wf) => {
            let (t0, dt, values, attrs) = wf.into_parts();
            let t0 = map_node(transform, t0, &format!("{path}/t0"), filter, events)?;
            let dt = map_node(transform, dt, &format!("{path}/dt"), filter, events)?;
            let values = map_node(transform, values, &format!("{path}/values"), filter, events)?;
            match (t0, dt, values) {
                (Some(t0), Some(dt), Some(values)) => {
                    Ok(Some(WaveformTable::try_new(t0, dt, values, attrs)?.into()))
                }
                (t0, dt, values) => {
                    debug!(
                        "waveform table {path} dropped (t0={}, dt={}, values={})",
                        t0.is_some(),
                        dt.is_some(),
                        values.is_some()
                    );
                    events.dropped_paths.push(path.to_string());
                    Ok(None)
                }
            }
        }
        Node::Struct(s) => {
            let (fields, attrs) = s.into_parts();
            let (fields, _) = map_children(transform, fields, path, filter, events)?;
            Ok(Some(Struct::new(fields, attrs).into()))
        }
        Node::Table(t) => {
            let (columns, mut attrs) = t.into_parts();
            let (columns, any_dropped) = map_children(transform, columns, path, filter, events)?;
            if any_dropped && attrs.remove(DATATYPE_ATTR).is_some() {
                debug!("{path}: dropped stale {DATATYPE_ATTR} attribute");
            }
            Ok(Some(Table::try_new(columns, attrs)?.into()))
        }
        Node::Leaf(leaf) => {
            let (kind, data, attrs) = leaf.into_parts();
            let data = transform.transform(path, data)?;
            events.leaves_mapped += 1;
            Ok(Some(Leaf::try_new(kind, data, attrs)?.into()))
        }
        Node::Scalar(_) => Err(lh5_err!(UnsupportedNodeKind: path, node.kind())),
    }
}

type Children = Vec<(lh5_array::FieldName, Node)>;

fn map_children<T: LeafTransform + ?Sized>(
    transform: &T,
    children: Children,
    path: &str,
    filter: &PathFilter,
    events: &mut MapEvents,
) -> Lh5Result<(Children, bool)> {
    let n_children = children.len();
    let mut mapped = Vec::with_capacity(n_children);
    for (name, child) in children {
        let child_path = format!("{path}/{name}");
        if let Some(child) = map_node(transform, child, &child_path, filter, events)? {
            mapped.push((name, child));
        }
    }
    let any_dropped = mapped.len() < n_children;
    Ok((mapped, any_dropped))
}
