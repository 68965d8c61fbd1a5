//! Row selection kernels over [`crate::RowArray`].

pub use slice::*;
pub use take::*;

mod slice;
mod take;
