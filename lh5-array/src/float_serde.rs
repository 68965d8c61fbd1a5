//! Float encoding for self-describing formats.
//!
//! Finite values are plain numbers. NaN and infinities, which JSON cannot hold as numbers, are
//! written as the strings `"nan"`, `"inf"` and `"-inf"` inside arrays, and as
//! `{"float": "nan"}` for scalars so they cannot be mistaken for string scalars.

use num_traits::{Float, NumCast};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Serialize, Deserialize)]
enum NonFinite {
    #[serde(rename = "nan")]
    Nan,
    #[serde(rename = "inf")]
    Inf,
    #[serde(rename = "-inf")]
    NegInf,
}

impl NonFinite {
    fn of<F: Float>(value: F) -> Option<Self> {
        if value.is_nan() {
            Some(NonFinite::Nan)
        } else if value.is_infinite() && value.is_sign_positive() {
            Some(NonFinite::Inf)
        } else if value.is_infinite() {
            Some(NonFinite::NegInf)
        } else {
            None
        }
    }

    fn value<F: Float>(self) -> F {
        match self {
            NonFinite::Nan => F::nan(),
            NonFinite::Inf => F::infinity(),
            NonFinite::NegInf => F::neg_infinity(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ArrayFloat {
    Finite(f64),
    NonFinite(NonFinite),
}

impl ArrayFloat {
    fn new<F: Float + Into<f64>>(value: F) -> Self {
        match NonFinite::of(value) {
            Some(non_finite) => ArrayFloat::NonFinite(non_finite),
            None => ArrayFloat::Finite(value.into()),
        }
    }

    fn into_float<F: Float, E: Error>(self) -> Result<F, E> {
        match self {
            ArrayFloat::Finite(value) => <F as NumCast>::from(value)
                .ok_or_else(|| E::custom(format!("{value} is out of range"))),
            ArrayFloat::NonFinite(non_finite) => Ok(non_finite.value()),
        }
    }
}

pub(crate) fn serialize<F, S>(values: &[F], serializer: S) -> Result<S::Ok, S::Error>
where
    F: Float + Into<f64>,
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|v| ArrayFloat::new(*v)))
}

pub(crate) fn deserialize<'de, F, D>(deserializer: D) -> Result<Vec<F>, D::Error>
where
    F: Float,
    D: Deserializer<'de>,
{
    Vec::<ArrayFloat>::deserialize(deserializer)?
        .into_iter()
        .map(ArrayFloat::into_float)
        .collect()
}

pub(crate) mod scalar {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::NonFinite;

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum ScalarFloat {
        Finite(f64),
        NonFinite { float: NonFinite },
    }

    pub(crate) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        match NonFinite::of(*value) {
            Some(float) => ScalarFloat::NonFinite { float },
            None => ScalarFloat::Finite(*value),
        }
        .serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match ScalarFloat::deserialize(deserializer)? {
            ScalarFloat::Finite(value) => value,
            ScalarFloat::NonFinite { float } => float.value(),
        })
    }
}
