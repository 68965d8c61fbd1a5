use lh5_error::{Lh5Result, lh5_bail};

use crate::{EncodedArray, FlatArray, JaggedArray, RowArray};

/// Limit array to start...stop range
pub trait SliceFn {
    /// Return the rows between `start` (inclusive) and `stop` (exclusive).
    ///
    /// Assumes `start <= stop <= len`; bounds are checked by [`slice`].
    fn slice(&self, start: usize, stop: usize) -> Lh5Result<RowArray>;
}

impl SliceFn for FlatArray {
    fn slice(&self, start: usize, stop: usize) -> Lh5Result<RowArray> {
        Ok(RowArray::Flat(self.slice_rows(start, stop)))
    }
}

impl SliceFn for JaggedArray {
    fn slice(&self, start: usize, stop: usize) -> Lh5Result<RowArray> {
        self.slice_rows(start, stop).map(RowArray::Jagged)
    }
}

impl SliceFn for EncodedArray {
    fn slice(&self, start: usize, stop: usize) -> Lh5Result<RowArray> {
        self.slice_rows(start, stop).map(RowArray::Encoded)
    }
}

/// Return the rows of an array between `start` (inclusive) and `stop` (exclusive).
///
/// # Errors
///
/// Slicing returns an error if you attempt to slice a range that exceeds the bounds of the
/// underlying array.
pub fn slice(array: &RowArray, start: usize, stop: usize) -> Lh5Result<RowArray> {
    if start == 0 && stop == array.len() {
        return Ok(array.clone());
    }

    check_slice_bounds(array, start, stop)?;

    let sliced = match array {
        RowArray::Flat(a) => SliceFn::slice(a, start, stop),
        RowArray::Jagged(a) => SliceFn::slice(a, start, stop),
        RowArray::Encoded(a) => SliceFn::slice(a, start, stop),
    }?;

    debug_assert_eq!(
        sliced.len(),
        stop - start,
        "Slice length mismatch {}",
        array.layout_name()
    );

    Ok(sliced)
}

fn check_slice_bounds(array: &RowArray, start: usize, stop: usize) -> Lh5Result<()> {
    if start > array.len() {
        lh5_bail!(OutOfBounds: start, 0, array.len());
    }
    if stop > array.len() {
        lh5_bail!(OutOfBounds: stop, 0, array.len());
    }
    if start > stop {
        lh5_bail!("start ({start}) must be <= stop ({stop})");
    }
    Ok(())
}
