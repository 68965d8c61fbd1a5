use lh5_error::{Lh5Result, lh5_bail, lh5_err};

use crate::RowArray;

/// A vector of vectors: row `i` holds the elements of `flattened` between the end of row `i - 1`
/// and `cumulative_length[i]`.
///
/// The flattened array is itself a [`RowArray`], so rows may nest further jagged levels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JaggedArray {
    cumulative_length: Vec<u64>,
    flattened: Box<RowArray>,
}

impl JaggedArray {
    /// Create a jagged array from cumulative row end offsets and the flattened rows.
    pub fn try_new(cumulative_length: Vec<u64>, flattened: RowArray) -> Lh5Result<Self> {
        let array = Self {
            cumulative_length,
            flattened: Box::new(flattened),
        };
        array.validate()?;
        Ok(array)
    }

    /// Check that the offsets are non-decreasing and end at the flattened length, recursively.
    pub fn validate(&self) -> Lh5Result<()> {
        if self.cumulative_length.windows(2).any(|w| w[0] > w[1]) {
            lh5_bail!("cumulative lengths must be non-decreasing");
        }
        let total = self.cumulative_length.last().copied().unwrap_or(0);
        if total != self.flattened.len() as u64 {
            lh5_bail!(
                "cumulative lengths end at {} but the flattened data has {} rows",
                total,
                self.flattened.len()
            );
        }
        self.flattened.validate()
    }

    /// Build a jagged array from per-row lengths.
    pub fn from_lengths(lengths: &[u64], flattened: RowArray) -> Lh5Result<Self> {
        let cumulative_length = lengths
            .iter()
            .scan(0u64, |acc, &l| {
                *acc += l;
                Some(*acc)
            })
            .collect();
        Self::try_new(cumulative_length, flattened)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.cumulative_length.len()
    }

    /// Whether the array has no rows.
    pub fn is_empty(&self) -> bool {
        self.cumulative_length.is_empty()
    }

    /// Cumulative row end offsets into [`JaggedArray::flattened`].
    pub fn cumulative_length(&self) -> &[u64] {
        &self.cumulative_length
    }

    /// The concatenated rows.
    pub fn flattened(&self) -> &RowArray {
        &self.flattened
    }

    /// Length of every row.
    pub fn lengths(&self) -> Vec<u64> {
        let mut previous = 0;
        self.cumulative_length
            .iter()
            .map(|&end| {
                let len = end - previous;
                previous = end;
                len
            })
            .collect()
    }

    /// Range of flattened elements making up `row`. The row must be in bounds.
    fn element_range(&self, row: usize) -> Lh5Result<std::ops::Range<usize>> {
        let start = if row == 0 {
            0
        } else {
            self.cumulative_length[row - 1]
        };
        let stop = self.cumulative_length[row];
        let start = usize::try_from(start).map_err(|_| lh5_err!("offset overflows usize"))?;
        let stop = usize::try_from(stop).map_err(|_| lh5_err!("offset overflows usize"))?;
        Ok(start..stop)
    }

    pub(crate) fn slice_rows(&self, start: usize, stop: usize) -> Lh5Result<Self> {
        if start == stop {
            return Ok(Self {
                cumulative_length: Vec::new(),
                flattened: Box::new(self.flattened.slice(0, 0)?),
            });
        }
        let first = self.element_range(start)?.start;
        let last = self.element_range(stop - 1)?.end;
        let base = first as u64;
        Ok(Self {
            cumulative_length: self.cumulative_length[start..stop]
                .iter()
                .map(|&end| end - base)
                .collect(),
            flattened: Box::new(self.flattened.slice(first, last)?),
        })
    }

    pub(crate) fn take_rows(&self, indices: &[usize]) -> Lh5Result<Self> {
        let mut cumulative_length = Vec::with_capacity(indices.len());
        let mut elements = Vec::new();
        for &row in indices {
            elements.extend(self.element_range(row)?);
            cumulative_length.push(elements.len() as u64);
        }
        Ok(Self {
            cumulative_length,
            flattened: Box::new(self.flattened.take(&elements)?),
        })
    }
}
