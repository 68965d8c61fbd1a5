use itertools::Itertools;

use crate::Node;
use crate::node::{Attributes, FieldName};

const HISTOGRAM_FIELDS: [&str; 3] = ["binning", "isdensity", "weights"];

/// An ordered collection of heterogeneous named children.
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    fields: Vec<(FieldName, Node)>,
    attrs: Attributes,
}

impl Struct {
    pub fn new(fields: Vec<(FieldName, Node)>, attrs: Attributes) -> Self {
        Self { fields, attrs }
    }

    pub fn fields(&self) -> &[(FieldName, Node)] {
        &self.fields
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn into_parts(self) -> (Vec<(FieldName, Node)>, Attributes) {
        (self.fields, self.attrs)
    }

    /// A histogram is a struct whose field names are exactly `binning`, `weights` and
    /// `isdensity`, in any order.
    pub fn is_histogram(&self) -> bool {
        self.fields.len() == HISTOGRAM_FIELDS.len()
            && self
                .fields
                .iter()
                .map(|(name, _)| name.as_ref())
                .sorted()
                .eq(HISTOGRAM_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Scalar, ScalarValue};

    fn named(names: &[&str]) -> Struct {
        Struct::new(
            names
                .iter()
                .map(|n| {
                    (
                        FieldName::from(*n),
                        Scalar::new(ScalarValue::Int(0), Attributes::new()).into(),
                    )
                })
                .collect(),
            Attributes::new(),
        )
    }

    #[test]
    fn histogram_detection() {
        assert!(named(&["weights", "isdensity", "binning"]).is_histogram());
        assert!(!named(&["weights", "binning"]).is_histogram());
        assert!(!named(&["weights", "binning", "isdensity", "x"]).is_histogram());
        assert!(!named(&["weights", "binning", "binning"]).is_histogram());
    }
}
