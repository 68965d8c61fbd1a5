use crate::node::Attributes;

/// The value of a scalar object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ScalarValue {
    #[allow(missing_docs)]
    Bool(bool),
    #[allow(missing_docs)]
    Int(i64),
    #[allow(missing_docs)]
    Float(#[cfg_attr(feature = "serde", serde(with = "crate::float_serde::scalar"))] f64),
    #[allow(missing_docs)]
    String(String),
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

/// A single-valued object. Scalars have no row axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    value: ScalarValue,
    attrs: Attributes,
}

impl Scalar {
    pub fn new(value: ScalarValue, attrs: Attributes) -> Self {
        Self { value, attrs }
    }

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }
}
