use std::sync::LazyLock;

use itertools::Itertools;
use lh5_error::{Lh5Expect, Lh5Result, lh5_bail, lh5_err};
use regex::Regex;

use crate::Kind;

/// The attribute holding an object's descriptor string.
pub const DATATYPE_ATTR: &str = "datatype";

const HISTOGRAM_FIELDS: [&str; 3] = ["binning", "weights", "isdensity"];

/// Ordered classification rules.
///
/// Rules are evaluated top to bottom and the first match wins. The order is significant: later
/// patterns are syntactic supersets of earlier ones (a histogram descriptor is also a valid
/// `struct{...}`, a vector of vectors is also a valid `array<N>{...}`), so rules must not be
/// reordered.
static RULES: LazyLock<Vec<(Regex, Kind)>> = LazyLock::new(|| {
    let histogram = HISTOGRAM_FIELDS
        .iter()
        .permutations(HISTOGRAM_FIELDS.len())
        .map(|fields| fields.into_iter().join(","))
        .join("|");

    [
        (r"^real$|^bool$|^complex$|^string$".to_string(), Kind::Scalar),
        (r"^array<1>\{array<1>\{.+\}\}$".to_string(), Kind::VectorOfVectors),
        (
            r"^array<1>\{encoded_array<1>\{.+\}\}$".to_string(),
            Kind::VectorOfEncodedVectors,
        ),
        (
            r"^array_of_encoded_equalsized_arrays<1,1>\{.+\}$".to_string(),
            Kind::ArrayOfEncodedEqualSizedArrays,
        ),
        (format!(r"^struct\{{(?:{histogram})\}}$"), Kind::Histogram),
        (r"^struct\{.*\}$".to_string(), Kind::Struct),
        (r"^table\{.*\}$".to_string(), Kind::Table),
        (r"^fixedsize_array<\d+>\{.+\}$".to_string(), Kind::FixedSizeArray),
        (
            r"^array_of_equalsized_arrays<1,1>\{.+\}$".to_string(),
            Kind::ArrayOfEqualSizedArrays,
        ),
        (r"^array<\d+>\{.+\}$".to_string(), Kind::Array),
    ]
    .into_iter()
    .map(|(pattern, kind)| {
        let regex = Regex::new(&pattern).lh5_expect("classification rules are valid regexes");
        (regex, kind)
    })
    .collect()
});

static NESTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*)\}$").lh5_expect("nested descriptor regex is valid"));

/// Return the [`Kind`] described by a datatype descriptor.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`lh5_error::Lh5Error::UnknownDatatype`] if the descriptor matches no rule.
pub fn classify(descriptor: &str) -> Lh5Result<Kind> {
    let descriptor = descriptor.trim();
    RULES
        .iter()
        .find(|(regex, _)| regex.is_match(descriptor))
        .map(|(_, kind)| *kind)
        .ok_or_else(|| lh5_err!(UnknownDatatype: "{}", descriptor))
}

/// Return the content of the outermost curly brackets of a descriptor.
///
/// The closing bracket must terminate the descriptor, e.g. `array<1>{array<1>{real}}` yields
/// `array<1>{real}`.
pub fn nested_descriptor(descriptor: &str) -> Lh5Result<&str> {
    let Some(captures) = NESTED.captures(descriptor) else {
        lh5_bail!("datatype '{}' has no nested descriptor", descriptor);
    };
    Ok(captures.get(1).map_or("", |m| m.as_str()))
}

/// Return the ordered field names listed by a `struct{...}` or `table{...}` descriptor.
///
/// An empty field list yields an empty vector.
pub fn struct_fields(descriptor: &str) -> Lh5Result<Vec<&str>> {
    let nested = nested_descriptor(descriptor)?;
    if nested.is_empty() {
        return Ok(Vec::new());
    }
    Ok(nested.split(',').collect())
}
