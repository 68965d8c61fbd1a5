//! Row-range truncation of LH5 files.
//!
//! A truncation run copies every top-level object of a file into a new file, keeping only the
//! rows that belong to a range of events. How rows relate to events depends on the
//! [`FileCategory`] of the file:
//!
//! - event-ordered files (`evt`, `tcm`) keep the same slice of every object, see [`DirectSlice`];
//! - hit-ordered files (`raw`, `dsp`, `hit`) keep, per channel, the rows a [`CoincidenceMap`]
//!   assigns to those events, see [`ChannelMapped`].
//!
//! Objects are walked with [`map_node`], which also prunes paths by include and exclude globs
//! ([`PathFilter`]). [`truncate`] is the entry point; [`truncate_store`] runs with a caller-built
//! [`RowSelector`].

pub use category::*;
pub use coincidence::*;
pub use filter::*;
pub use mapper::*;
pub use selector::*;
pub use truncate::*;

mod category;
mod coincidence;
pub mod filter;
pub mod mapper;
pub mod selector;
mod truncate;
