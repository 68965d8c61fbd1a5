//! In-memory typed objects for LH5 trees.
//!
//! [`Node`] models the object kinds found in LH5 files; leaf objects expose their payload as a
//! [`RowArray`], on which the [`compute`] kernels select rows.

pub use arrays::*;
pub use node::*;
pub use values::*;

mod arrays;
pub mod compute;
#[cfg(feature = "serde")]
mod float_serde;
mod node;
mod tree;
mod values;
