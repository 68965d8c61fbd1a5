#![deny(missing_docs)]

//! The type classification layer for LH5 objects.
//!
//! LH5 objects carry a compact `datatype` descriptor attribute (e.g. `table{t0,dt,values}` or
//! `array<1>{array<1>{real}}`). This crate maps such descriptors onto a structural [`Kind`] so
//! that readers can decide how an object should be materialized. Descriptors are only ever
//! parsed here, never constructed.

pub use datatype::*;
pub use kind::*;

mod datatype;
mod kind;
