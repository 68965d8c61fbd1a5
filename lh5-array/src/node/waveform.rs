use lh5_error::{Lh5Result, lh5_bail};

use crate::Node;
use crate::node::Attributes;

/// Sampled waveforms: per row a start time `t0`, a sampling period `dt` and the samples.
///
/// The three children are fixed; a waveform table never exists with only some of them.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformTable {
    t0: Box<Node>,
    dt: Box<Node>,
    values: Box<Node>,
    attrs: Attributes,
}

impl WaveformTable {
    /// The names of the children, in storage order.
    pub const FIELDS: [&'static str; 3] = ["t0", "dt", "values"];

    /// Create a waveform table. All three children must be row-indexed with one row count.
    pub fn try_new(t0: Node, dt: Node, values: Node, attrs: Attributes) -> Lh5Result<Self> {
        let lens = [t0.len(), dt.len(), values.len()];
        let Some(len) = lens[0] else {
            lh5_bail!("waveform t0 must be row-indexed, got {}", t0.kind());
        };
        for (name, child_len) in Self::FIELDS.iter().zip(lens) {
            if child_len != Some(len) {
                lh5_bail!(
                    "waveform {} has {:?} rows, expected {}",
                    name,
                    child_len,
                    len
                );
            }
        }
        Ok(Self {
            t0: Box::new(t0),
            dt: Box::new(dt),
            values: Box::new(values),
            attrs,
        })
    }

    pub fn len(&self) -> usize {
        self.t0.len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn t0(&self) -> &Node {
        &self.t0
    }

    pub fn dt(&self) -> &Node {
        &self.dt
    }

    pub fn values(&self) -> &Node {
        &self.values
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// The children paired with their names.
    pub fn children(&self) -> [(&'static str, &Node); 3] {
        [
            (Self::FIELDS[0], &self.t0),
            (Self::FIELDS[1], &self.dt),
            (Self::FIELDS[2], &self.values),
        ]
    }

    /// Split into `t0`, `dt`, `values` and attributes.
    pub fn into_parts(self) -> (Node, Node, Node, Attributes) {
        (*self.t0, *self.dt, *self.values, self.attrs)
    }
}
