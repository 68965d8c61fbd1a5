//! Row-indexed array views over leaf data.
//!
//! Every leaf object exposes its payload as a [`RowArray`]: an array whose outermost axis is the
//! row axis. Row selection operates on that axis only, whatever the nesting underneath.

mod encoded;
mod flat;
mod jagged;

pub use encoded::*;
pub use flat::*;
pub use jagged::*;

use crate::Values;
use crate::compute::{slice, take};
use lh5_error::Lh5Result;

/// An array with a row axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RowArray {
    /// Rows of a fixed number of elements.
    Flat(FlatArray),
    /// Rows of varying length, delimited by cumulative lengths.
    Jagged(JaggedArray),
    /// Rows of encoded bytes with their decoded sizes.
    Encoded(EncodedArray),
}

impl RowArray {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            RowArray::Flat(a) => a.len(),
            RowArray::Jagged(a) => a.len(),
            RowArray::Encoded(a) => a.len(),
        }
    }

    /// Whether the array has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the structural invariants of the array, e.g. after deserialization.
    pub fn validate(&self) -> Lh5Result<()> {
        match self {
            RowArray::Flat(a) => a.validate(),
            RowArray::Jagged(a) => a.validate(),
            RowArray::Encoded(a) => a.validate(),
        }
    }

    /// Short name of the array layout, used in messages.
    pub fn layout_name(&self) -> &'static str {
        match self {
            RowArray::Flat(_) => "flat",
            RowArray::Jagged(_) => "jagged",
            RowArray::Encoded(_) => "encoded",
        }
    }

    /// The rows in `start..stop`. See [`crate::compute::slice`].
    pub fn slice(&self, start: usize, stop: usize) -> Lh5Result<RowArray> {
        slice(self, start, stop)
    }

    /// The rows at `indices`, in order. See [`crate::compute::take`].
    pub fn take(&self, indices: &[usize]) -> Lh5Result<RowArray> {
        take(self, indices)
    }

    /// Up to `n_rows` rows starting at `start`, clamped to the array.
    ///
    /// Unlike [`RowArray::slice`] this never fails: a window reaching past the end is shortened
    /// and a window starting past the end is empty.
    pub fn window(&self, start: usize, n_rows: Option<usize>) -> Lh5Result<RowArray> {
        let len = self.len();
        let start = start.min(len);
        let stop = n_rows.map_or(len, |n| start.saturating_add(n).min(len));
        self.slice(start, stop)
    }
}

impl From<Values> for RowArray {
    fn from(values: Values) -> Self {
        RowArray::Flat(FlatArray::from(values))
    }
}

impl From<FlatArray> for RowArray {
    fn from(value: FlatArray) -> Self {
        RowArray::Flat(value)
    }
}

impl From<JaggedArray> for RowArray {
    fn from(value: JaggedArray) -> Self {
        RowArray::Jagged(value)
    }
}

impl From<EncodedArray> for RowArray {
    fn from(value: EncodedArray) -> Self {
        RowArray::Encoded(value)
    }
}
