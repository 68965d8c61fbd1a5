use lh5_error::{Lh5Result, lh5_bail};

use crate::{JaggedArray, RowArray, Values};

/// Decoded length of encoded rows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecodedSize {
    /// All rows decode to the same length.
    Uniform(u64),
    /// Each row has its own decoded length.
    PerRow(Vec<u64>),
}

/// Rows of compressed bytes. Row selection never decodes them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodedArray {
    encoded_data: JaggedArray,
    decoded_size: DecodedSize,
}

impl EncodedArray {
    /// Create an encoded array. The encoded rows must be bytes and a per-row decoded size must
    /// cover every row.
    pub fn try_new(encoded_data: JaggedArray, decoded_size: DecodedSize) -> Lh5Result<Self> {
        let array = Self {
            encoded_data,
            decoded_size,
        };
        array.validate()?;
        Ok(array)
    }

    /// Check that the rows are bytes and that per-row sizes cover every row.
    pub fn validate(&self) -> Lh5Result<()> {
        self.encoded_data.validate()?;
        match self.encoded_data.flattened() {
            RowArray::Flat(flat) if matches!(flat.values(), Values::U8(_)) && flat.width() == 1 => {}
            other => lh5_bail!(
                "encoded rows must be flat u8 bytes, got {} data",
                other.layout_name()
            ),
        }
        if let DecodedSize::PerRow(sizes) = &self.decoded_size {
            if sizes.len() != self.encoded_data.len() {
                lh5_bail!(
                    "{} decoded sizes given for {} encoded rows",
                    sizes.len(),
                    self.encoded_data.len()
                );
            }
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.encoded_data.len()
    }

    /// Whether the array has no rows.
    pub fn is_empty(&self) -> bool {
        self.encoded_data.is_empty()
    }

    /// The encoded bytes of every row.
    pub fn encoded_data(&self) -> &JaggedArray {
        &self.encoded_data
    }

    /// The decoded lengths.
    pub fn decoded_size(&self) -> &DecodedSize {
        &self.decoded_size
    }

    pub(crate) fn slice_rows(&self, start: usize, stop: usize) -> Lh5Result<Self> {
        Ok(Self {
            encoded_data: self.encoded_data.slice_rows(start, stop)?,
            decoded_size: match &self.decoded_size {
                DecodedSize::Uniform(size) => DecodedSize::Uniform(*size),
                DecodedSize::PerRow(sizes) => DecodedSize::PerRow(sizes[start..stop].to_vec()),
            },
        })
    }

    pub(crate) fn take_rows(&self, indices: &[usize]) -> Lh5Result<Self> {
        Ok(Self {
            encoded_data: self.encoded_data.take_rows(indices)?,
            decoded_size: match &self.decoded_size {
                DecodedSize::Uniform(size) => DecodedSize::Uniform(*size),
                DecodedSize::PerRow(sizes) => {
                    DecodedSize::PerRow(indices.iter().map(|&i| sizes[i]).collect())
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(lengths: &[u64]) -> JaggedArray {
        let total = lengths.iter().sum::<u64>() as u8;
        JaggedArray::from_lengths(
            lengths,
            RowArray::from(Values::from((0..total).collect::<Vec<u8>>())),
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_byte_rows() {
        let floats = JaggedArray::from_lengths(&[1], RowArray::from(Values::from(vec![1.0f64])))
            .unwrap();
        assert!(EncodedArray::try_new(floats, DecodedSize::Uniform(4)).is_err());
        assert!(EncodedArray::try_new(bytes(&[1, 2]), DecodedSize::PerRow(vec![3])).is_err());
    }

    #[test]
    fn per_row_sizes_follow_rows() {
        let array =
            EncodedArray::try_new(bytes(&[1, 2, 3]), DecodedSize::PerRow(vec![10, 20, 30]))
                .unwrap();
        let taken = array.take_rows(&[2, 0]).unwrap();
        assert_eq!(taken.decoded_size(), &DecodedSize::PerRow(vec![30, 10]));
        assert_eq!(taken.encoded_data().lengths(), vec![3, 1]);

        let sliced = array.slice_rows(1, 3).unwrap();
        assert_eq!(sliced.decoded_size(), &DecodedSize::PerRow(vec![20, 30]));
    }

    #[test]
    fn uniform_size_is_kept() {
        let array = EncodedArray::try_new(bytes(&[2, 2]), DecodedSize::Uniform(8)).unwrap();
        assert_eq!(
            array.slice_rows(0, 1).unwrap().decoded_size(),
            &DecodedSize::Uniform(8)
        );
    }
}
