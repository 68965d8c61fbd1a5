use std::fmt::{Display, Formatter};

/// The structural kind of an LH5 object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// A single value (`real`, `bool`, `complex` or `string`)
    Scalar,
    /// A flat n-dimensional array, one row per outermost index
    Array,
    /// A jagged array of arrays
    VectorOfVectors,
    /// A jagged array whose rows are encoded (compressed) byte strings
    VectorOfEncodedVectors,
    /// Equal-sized arrays whose rows are encoded byte strings sharing one decoded size
    ArrayOfEncodedEqualSizedArrays,
    /// A struct with exactly the fields `binning`, `weights` and `isdensity`
    Histogram,
    /// An ordered collection of heterogeneous named children
    Struct,
    /// An ordered collection of named columns sharing one row count
    Table,
    /// A fixed-size array
    FixedSizeArray,
    /// An array whose rows are arrays of one shared length
    ArrayOfEqualSizedArrays,
    /// A table with exactly the columns `t0`, `dt` and `values`.
    ///
    /// Waveform tables are described as `table{t0,dt,values}`, so [`crate::classify`] never
    /// returns this kind; it is reported by materialized objects only.
    WaveformTable,
}

impl Kind {
    /// Whether objects of this kind own named children.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Kind::Struct | Kind::Histogram | Kind::Table | Kind::WaveformTable
        )
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Scalar => "Scalar",
            Kind::Array => "Array",
            Kind::VectorOfVectors => "VectorOfVectors",
            Kind::VectorOfEncodedVectors => "VectorOfEncodedVectors",
            Kind::ArrayOfEncodedEqualSizedArrays => "ArrayOfEncodedEqualSizedArrays",
            Kind::Histogram => "Histogram",
            Kind::Struct => "Struct",
            Kind::Table => "Table",
            Kind::FixedSizeArray => "FixedSizeArray",
            Kind::ArrayOfEqualSizedArrays => "ArrayOfEqualSizedArrays",
            Kind::WaveformTable => "WaveformTable",
        };
        write!(f, "{name}")
    }
}
