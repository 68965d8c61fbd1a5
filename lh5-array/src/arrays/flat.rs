use lh5_error::{Lh5Result, lh5_bail};

use crate::Values;

/// Rows of `width` elements stored row-major in one buffer.
///
/// A plain one-dimensional array has width 1; an array of equal-sized arrays has one row per
/// inner array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatArray {
    values: Values,
    width: usize,
}

impl FlatArray {
    /// Create a flat array, checking that the buffer holds a whole number of rows.
    pub fn try_new(values: Values, width: usize) -> Lh5Result<Self> {
        let array = Self { values, width };
        array.validate()?;
        Ok(array)
    }

    /// Check that the buffer holds a whole number of non-empty rows.
    pub fn validate(&self) -> Lh5Result<()> {
        if self.width == 0 {
            lh5_bail!("flat array rows must have at least one element");
        }
        if self.values.len() % self.width != 0 {
            lh5_bail!(
                "{} elements cannot be split into rows of width {}",
                self.values.len(),
                self.width
            );
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len() / self.width
    }

    /// Whether the array has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The underlying element buffer.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Consume the array, returning its element buffer.
    pub fn into_values(self) -> Values {
        self.values
    }

    pub(crate) fn slice_rows(&self, start: usize, stop: usize) -> Self {
        Self {
            values: self
                .values
                .slice_unchecked(start * self.width, stop * self.width),
            width: self.width,
        }
    }

    pub(crate) fn take_rows(&self, indices: &[usize]) -> Self {
        let values = if self.width == 1 {
            self.values.take_unchecked(indices)
        } else {
            let elements: Vec<usize> = indices
                .iter()
                .flat_map(|&row| row * self.width..(row + 1) * self.width)
                .collect();
            self.values.take_unchecked(&elements)
        };
        Self {
            values,
            width: self.width,
        }
    }
}

impl From<Values> for FlatArray {
    fn from(values: Values) -> Self {
        Self { values, width: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_buffer() {
        assert!(FlatArray::try_new(Values::from(vec![1.0f32, 2.0, 3.0]), 2).is_err());
        assert!(FlatArray::try_new(Values::from(vec![1.0f32]), 0).is_err());
    }

    #[test]
    fn rows_of_width() {
        let array = FlatArray::try_new(Values::from(vec![0u8, 1, 2, 3, 4, 5]), 3).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(
            array.take_rows(&[1, 1, 0]).values(),
            &Values::from(vec![3u8, 4, 5, 3, 4, 5, 0, 1, 2])
        );
        assert_eq!(array.slice_rows(1, 2).values(), &Values::from(vec![3u8, 4, 5]));
    }
}
