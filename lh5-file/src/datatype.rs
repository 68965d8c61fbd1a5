use itertools::Itertools;
use lh5_array::{FlatArray, Leaf, LeafKind, Node, PType, RowArray, ScalarValue};

/// Build the `datatype` descriptor for `node`, the inverse of [`lh5_dtype::classify`].
///
/// Writers always store a freshly formed descriptor, so a descriptor inherited from a node's
/// source (e.g. a table that has since lost columns) never reaches disk.
pub fn form_datatype(node: &Node) -> String {
    match node {
        Node::Scalar(scalar) => match scalar.value() {
            ScalarValue::Bool(_) => "bool".to_string(),
            ScalarValue::Int(_) | ScalarValue::Float(_) => "real".to_string(),
            ScalarValue::String(_) => "string".to_string(),
        },
        Node::Leaf(leaf) => leaf_datatype(leaf),
        Node::Struct(s) => format!("struct{{{}}}", s.fields().iter().map(|(n, _)| n).join(",")),
        Node::Table(t) => format!("table{{{}}}", t.columns().iter().map(|(n, _)| n).join(",")),
        Node::WaveformTable(_) => "table{t0,dt,values}".to_string(),
    }
}

fn leaf_datatype(leaf: &Leaf) -> String {
    let data = leaf.data();
    match leaf.kind() {
        LeafKind::Array => format!("array<{}>{{{}}}", ndim(data), element(data)),
        LeafKind::FixedSizeArray => format!("fixedsize_array<{}>{{{}}}", ndim(data), element(data)),
        LeafKind::ArrayOfEqualSizedArrays => {
            format!("array_of_equalsized_arrays<1,1>{{{}}}", element(data))
        }
        LeafKind::VectorOfVectors => jagged_datatype(data),
        LeafKind::VectorOfEncodedVectors => {
            format!("array<1>{{encoded_array<1>{{{}}}}}", element(data))
        }
        LeafKind::ArrayOfEncodedEqualSizedArrays => {
            format!("array_of_encoded_equalsized_arrays<1,1>{{{}}}", element(data))
        }
    }
}

fn jagged_datatype(data: &RowArray) -> String {
    match data {
        RowArray::Jagged(jagged) => format!("array<1>{{{}}}", jagged_datatype(jagged.flattened())),
        other => format!("array<1>{{{}}}", element(other)),
    }
}

fn ndim(data: &RowArray) -> usize {
    match data {
        RowArray::Flat(flat) if flat.width() > 1 => 2,
        _ => 1,
    }
}

/// The element name of the innermost values. Encoded rows decode to numbers.
fn element(data: &RowArray) -> &'static str {
    match data {
        RowArray::Flat(flat) => flat_element(flat),
        RowArray::Jagged(jagged) => element(jagged.flattened()),
        RowArray::Encoded(_) => "real",
    }
}

fn flat_element(flat: &FlatArray) -> &'static str {
    match flat.values().ptype() {
        PType::Bool => "bool",
        _ => "real",
    }
}
