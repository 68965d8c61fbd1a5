//! Reading and writing named LH5 objects.
//!
//! The [`Store`] trait is the only surface the truncation engine uses to touch files. Two
//! implementations are provided:
//!
//! 1. [`MemoryStore`], which keeps whole files in memory and is used by tests and embedders.
//! 2. [`JsonStore`], which keeps each file as a JSON document on disk. Objects are stored the way
//!    LH5 stores them: a tree of named objects carrying a `datatype` attribute, from which the
//!    reader decides what each object materializes as.
//!
//! Neither is the HDF5-based LH5 format itself.

mod datatype;
mod json;
mod memory;
mod objects;
mod store;

pub use datatype::form_datatype;
pub use json::*;
pub use memory::*;
pub use store::*;
