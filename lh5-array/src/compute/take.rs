use lh5_error::{Lh5Result, lh5_bail};

use crate::{EncodedArray, FlatArray, JaggedArray, RowArray};

pub trait TakeFn {
    /// Create a new array by taking the rows at the given `indices`.
    ///
    /// Indices must be in bounds; they are checked by [`take`].
    fn take(&self, indices: &[usize]) -> Lh5Result<RowArray>;
}

impl TakeFn for FlatArray {
    fn take(&self, indices: &[usize]) -> Lh5Result<RowArray> {
        Ok(RowArray::Flat(self.take_rows(indices)))
    }
}

impl TakeFn for JaggedArray {
    fn take(&self, indices: &[usize]) -> Lh5Result<RowArray> {
        self.take_rows(indices).map(RowArray::Jagged)
    }
}

impl TakeFn for EncodedArray {
    fn take(&self, indices: &[usize]) -> Lh5Result<RowArray> {
        self.take_rows(indices).map(RowArray::Encoded)
    }
}

/// Gather the rows of `array` at `indices`.
///
/// Indices may be in any order and may repeat; the result has one row per index.
///
/// # Errors
///
/// Returns [`lh5_error::Lh5Error::OutOfBounds`] if any index is not a row of `array`.
pub fn take(array: &RowArray, indices: &[usize]) -> Lh5Result<RowArray> {
    if let Some(&max) = indices.iter().max() {
        if max >= array.len() {
            lh5_bail!(OutOfBounds: max, 0, array.len());
        }
    }

    match array {
        RowArray::Flat(a) => TakeFn::take(a, indices),
        RowArray::Jagged(a) => TakeFn::take(a, indices),
        RowArray::Encoded(a) => TakeFn::take(a, indices),
    }
}

#[cfg(test)]
mod tests {
    use lh5_error::Lh5Error;

    use super::*;
    use crate::Values;

    #[test]
    fn take_flat() {
        let array = RowArray::from(Values::from(vec![10i16, 11, 12, 13, 14]));
        assert_eq!(
            take(&array, &[0, 2, 3]).unwrap(),
            RowArray::from(Values::from(vec![10i16, 12, 13]))
        );
        assert_eq!(take(&array, &[]).unwrap().len(), 0);
    }

    #[test]
    fn take_equal_sized_rows() {
        let array = RowArray::from(
            FlatArray::try_new(Values::from(vec![1.0f64, 2.0, 3.0, 4.0]), 2).unwrap(),
        );
        let RowArray::Flat(taken) = take(&array, &[1]).unwrap() else {
            panic!("expected flat");
        };
        assert_eq!(taken.values(), &Values::from(vec![3.0f64, 4.0]));
        assert_eq!(taken.width(), 2);
    }

    #[test]
    fn take_out_of_bounds() {
        let array = RowArray::from(Values::from(vec![true, false]));
        assert!(matches!(
            take(&array, &[0, 2]),
            Err(Lh5Error::OutOfBounds(2, 0, 2, _))
        ));
    }
}
