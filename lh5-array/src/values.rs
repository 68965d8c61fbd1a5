use std::fmt::{Display, Formatter};

use lh5_error::{Lh5Result, lh5_err};
use num_traits::ToPrimitive;

/// The primitive element type of a [`Values`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PType {
    /// Boolean
    Bool,
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// Unsigned 8-bit integer
    U8,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl PType {
    /// Whether the type is a signed or unsigned integer.
    pub fn is_int(&self) -> bool {
        !matches!(self, PType::Bool | PType::F32 | PType::F64)
    }
}

impl Display for PType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PType::Bool => "bool",
            PType::I8 => "i8",
            PType::I16 => "i16",
            PType::I32 => "i32",
            PType::I64 => "i64",
            PType::U8 => "u8",
            PType::U16 => "u16",
            PType::U32 => "u32",
            PType::U64 => "u64",
            PType::F32 => "f32",
            PType::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

/// A contiguous buffer of primitive elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "data", rename_all = "lowercase")
)]
pub enum Values {
    #[allow(missing_docs)]
    Bool(Vec<bool>),
    #[allow(missing_docs)]
    I8(Vec<i8>),
    #[allow(missing_docs)]
    I16(Vec<i16>),
    #[allow(missing_docs)]
    I32(Vec<i32>),
    #[allow(missing_docs)]
    I64(Vec<i64>),
    #[allow(missing_docs)]
    U8(Vec<u8>),
    #[allow(missing_docs)]
    U16(Vec<u16>),
    #[allow(missing_docs)]
    U32(Vec<u32>),
    #[allow(missing_docs)]
    U64(Vec<u64>),
    #[allow(missing_docs)]
    F32(#[cfg_attr(feature = "serde", serde(with = "crate::float_serde"))] Vec<f32>),
    #[allow(missing_docs)]
    F64(#[cfg_attr(feature = "serde", serde(with = "crate::float_serde"))] Vec<f64>),
}

/// Match on every variant of [`Values`], binding the inner vector.
///
/// The body is instantiated once per variant, so it may only use operations common to all
/// element types. Use `$wrap` to rebuild a [`Values`] of the matched variant.
#[macro_export]
macro_rules! match_each_values {
    ($self:expr, | $vec:ident, $wrap:ident | $body:block) => {{
        use $crate::Values;
        match $self {
            Values::Bool($vec) => {
                let $wrap = Values::Bool;
                $body
            }
            Values::I8($vec) => {
                let $wrap = Values::I8;
                $body
            }
            Values::I16($vec) => {
                let $wrap = Values::I16;
                $body
            }
            Values::I32($vec) => {
                let $wrap = Values::I32;
                $body
            }
            Values::I64($vec) => {
                let $wrap = Values::I64;
                $body
            }
            Values::U8($vec) => {
                let $wrap = Values::U8;
                $body
            }
            Values::U16($vec) => {
                let $wrap = Values::U16;
                $body
            }
            Values::U32($vec) => {
                let $wrap = Values::U32;
                $body
            }
            Values::U64($vec) => {
                let $wrap = Values::U64;
                $body
            }
            Values::F32($vec) => {
                let $wrap = Values::F32;
                $body
            }
            Values::F64($vec) => {
                let $wrap = Values::F64;
                $body
            }
        }
    }};
}

impl Values {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match_each_values!(self, |v, _wrap| { v.len() })
    }

    /// Whether the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type.
    pub fn ptype(&self) -> PType {
        match self {
            Values::Bool(_) => PType::Bool,
            Values::I8(_) => PType::I8,
            Values::I16(_) => PType::I16,
            Values::I32(_) => PType::I32,
            Values::I64(_) => PType::I64,
            Values::U8(_) => PType::U8,
            Values::U16(_) => PType::U16,
            Values::U32(_) => PType::U32,
            Values::U64(_) => PType::U64,
            Values::F32(_) => PType::F32,
            Values::F64(_) => PType::F64,
        }
    }

    /// Copy out the elements in `start..stop`. Bounds are the caller's responsibility.
    pub(crate) fn slice_unchecked(&self, start: usize, stop: usize) -> Values {
        match_each_values!(self, |v, wrap| { wrap(v[start..stop].to_vec()) })
    }

    /// Gather the elements at `indices`. Bounds are the caller's responsibility.
    pub(crate) fn take_unchecked(&self, indices: &[usize]) -> Values {
        match_each_values!(self, |v, wrap| {
            wrap(indices.iter().map(|&i| v[i]).collect())
        })
    }

    /// Convert an integer buffer into signed 64-bit integers.
    pub fn to_i64(&self) -> Lh5Result<Vec<i64>> {
        fn convert<T: ToPrimitive + Copy>(values: &[T]) -> Lh5Result<Vec<i64>> {
            values
                .iter()
                .map(|v| {
                    v.to_i64()
                        .ok_or_else(|| lh5_err!("integer value does not fit into i64"))
                })
                .collect()
        }

        match self {
            Values::I8(v) => convert(v),
            Values::I16(v) => convert(v),
            Values::I32(v) => convert(v),
            Values::I64(v) => Ok(v.clone()),
            Values::U8(v) => convert(v),
            Values::U16(v) => convert(v),
            Values::U32(v) => convert(v),
            Values::U64(v) => convert(v),
            Values::Bool(_) | Values::F32(_) | Values::F64(_) => Err(lh5_err!(
                "expected integer values, got {}",
                self.ptype()
            )),
        }
    }
}

macro_rules! impl_from_vec {
    ($T:ty, $variant:ident) => {
        impl From<Vec<$T>> for Values {
            fn from(value: Vec<$T>) -> Self {
                Values::$variant(value)
            }
        }
    };
}

impl_from_vec!(bool, Bool);
impl_from_vec!(i8, I8);
impl_from_vec!(i16, I16);
impl_from_vec!(i32, I32);
impl_from_vec!(i64, I64);
impl_from_vec!(u8, U8);
impl_from_vec!(u16, U16);
impl_from_vec!(u32, U32);
impl_from_vec!(u64, U64);
impl_from_vec!(f32, F32);
impl_from_vec!(f64, F64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_and_take() {
        let values = Values::from(vec![10i32, 11, 12, 13]);
        assert_eq!(values.slice_unchecked(1, 3), Values::from(vec![11i32, 12]));
        assert_eq!(
            values.take_unchecked(&[3, 0, 3]),
            Values::from(vec![13i32, 10, 13])
        );
        assert_eq!(values.ptype(), PType::I32);
    }

    #[test]
    fn integer_conversion() {
        assert_eq!(
            Values::from(vec![1u16, 2]).to_i64().unwrap(),
            vec![1i64, 2]
        );
        assert!(Values::from(vec![u64::MAX]).to_i64().is_err());
        assert!(Values::from(vec![1.0f64]).to_i64().is_err());
    }
}
