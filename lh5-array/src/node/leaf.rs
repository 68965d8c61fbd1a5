use lh5_dtype::Kind;
use lh5_error::{Lh5Result, lh5_bail};

use crate::node::Attributes;
use crate::{DecodedSize, RowArray};

/// The concrete kind of a leaf array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// A flat n-dimensional array.
    Array,
    /// A fixed-size array.
    FixedSizeArray,
    /// Rows of equal-sized arrays.
    ArrayOfEqualSizedArrays,
    /// Jagged rows.
    VectorOfVectors,
    /// Jagged rows of encoded bytes, each with its own decoded size.
    VectorOfEncodedVectors,
    /// Encoded rows sharing one decoded size.
    ArrayOfEncodedEqualSizedArrays,
}

impl From<LeafKind> for Kind {
    fn from(value: LeafKind) -> Self {
        match value {
            LeafKind::Array => Kind::Array,
            LeafKind::FixedSizeArray => Kind::FixedSizeArray,
            LeafKind::ArrayOfEqualSizedArrays => Kind::ArrayOfEqualSizedArrays,
            LeafKind::VectorOfVectors => Kind::VectorOfVectors,
            LeafKind::VectorOfEncodedVectors => Kind::VectorOfEncodedVectors,
            LeafKind::ArrayOfEncodedEqualSizedArrays => Kind::ArrayOfEncodedEqualSizedArrays,
        }
    }
}

impl TryFrom<Kind> for LeafKind {
    type Error = lh5_error::Lh5Error;

    fn try_from(value: Kind) -> Lh5Result<Self> {
        Ok(match value {
            Kind::Array => LeafKind::Array,
            Kind::FixedSizeArray => LeafKind::FixedSizeArray,
            Kind::ArrayOfEqualSizedArrays => LeafKind::ArrayOfEqualSizedArrays,
            Kind::VectorOfVectors => LeafKind::VectorOfVectors,
            Kind::VectorOfEncodedVectors => LeafKind::VectorOfEncodedVectors,
            Kind::ArrayOfEncodedEqualSizedArrays => LeafKind::ArrayOfEncodedEqualSizedArrays,
            other => lh5_bail!("{} is not a leaf array kind", other),
        })
    }
}

/// A row-indexed array object.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    kind: LeafKind,
    data: RowArray,
    attrs: Attributes,
}

impl Leaf {
    /// Create a leaf, checking that the data layout fits the kind.
    pub fn try_new(kind: LeafKind, data: RowArray, attrs: Attributes) -> Lh5Result<Self> {
        let fits = match (kind, &data) {
            (
                LeafKind::Array | LeafKind::FixedSizeArray | LeafKind::ArrayOfEqualSizedArrays,
                RowArray::Flat(_),
            )
            | (LeafKind::VectorOfVectors, RowArray::Jagged(_)) => true,
            (LeafKind::VectorOfEncodedVectors, RowArray::Encoded(e)) => {
                matches!(e.decoded_size(), DecodedSize::PerRow(_))
            }
            (LeafKind::ArrayOfEncodedEqualSizedArrays, RowArray::Encoded(e)) => {
                matches!(e.decoded_size(), DecodedSize::Uniform(_))
            }
            _ => false,
        };
        if !fits {
            lh5_bail!(
                "{:?} cannot hold {} data",
                kind,
                data.layout_name()
            );
        }
        Ok(Self { kind, data, attrs })
    }

    /// Shorthand for a [`LeafKind::Array`] leaf.
    pub fn array(data: RowArray, attrs: Attributes) -> Lh5Result<Self> {
        Self::try_new(LeafKind::Array, data, attrs)
    }

    /// Shorthand for a [`LeafKind::VectorOfVectors`] leaf.
    pub fn vector_of_vectors(data: RowArray, attrs: Attributes) -> Lh5Result<Self> {
        Self::try_new(LeafKind::VectorOfVectors, data, attrs)
    }

    /// The concrete leaf kind.
    pub fn kind(&self) -> LeafKind {
        self.kind
    }

    /// The array view of the leaf.
    pub fn data(&self) -> &RowArray {
        &self.data
    }

    /// The leaf's attributes.
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the leaf has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Build a leaf of the same kind and attributes holding `data`.
    pub fn with_data(&self, data: RowArray) -> Lh5Result<Self> {
        Self::try_new(self.kind, data, self.attrs.clone())
    }

    /// Split the leaf into its kind, data and attributes.
    pub fn into_parts(self) -> (LeafKind, RowArray, Attributes) {
        (self.kind, self.data, self.attrs)
    }
}
