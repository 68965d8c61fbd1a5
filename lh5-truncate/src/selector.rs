//! Row selection strategies.
//!
//! A [`RowSelector`] decides, per top-level object, which window of rows to read, and, per leaf,
//! which of the rows read are kept.

use std::fmt::{Display, Formatter};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::str::FromStr;
use std::sync::LazyLock;

use lh5_array::RowArray;
use lh5_error::{Lh5Error, Lh5Expect, Lh5Result, lh5_bail};
use lh5_file::RowCount;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::CoincidenceMap;

/// Chooses the rows of each object to keep.
///
/// `start_row` and `row_count` describe the window read from the store for a top-level object;
/// `select` then receives each leaf array of that object, already cut to the window.
pub trait RowSelector {
    /// First row to read. Never after any row `select` keeps.
    fn start_row(&self, name: &str) -> usize;

    /// Number of rows to read from `start_row`.
    fn row_count(&self, name: &str) -> RowCount;

    /// Select the wanted rows of the array at `path`.
    fn select(&self, path: &str, array: RowArray) -> Lh5Result<RowArray>;

    /// Whether the selector knows which rows of `name` to keep. Unmapped objects are passed
    /// through whole.
    fn is_mapped(&self, _name: &str) -> bool {
        true
    }
}

/// A half-open range of rows with optional ends, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RowSlice {
    start: Option<usize>,
    stop: Option<usize>,
}

impl RowSlice {
    pub fn new(start: Option<usize>, stop: Option<usize>) -> Self {
        Self { start, stop }
    }

    /// The first `n` rows.
    pub fn length(n: usize) -> Self {
        Self::new(None, Some(n))
    }

    /// Every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    pub fn stop(&self) -> Option<usize> {
        self.stop
    }

    /// The rows this slice selects out of `len` rows. Ends are clamped to `len` and a stop
    /// before the start selects nothing.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let start = self.start.unwrap_or(0).min(len);
        let stop = self.stop.unwrap_or(len).min(len).max(start);
        start..stop
    }
}

impl From<usize> for RowSlice {
    fn from(n: usize) -> Self {
        RowSlice::length(n)
    }
}

impl From<Range<usize>> for RowSlice {
    fn from(range: Range<usize>) -> Self {
        RowSlice::new(Some(range.start), Some(range.end))
    }
}

impl From<RangeFrom<usize>> for RowSlice {
    fn from(range: RangeFrom<usize>) -> Self {
        RowSlice::new(Some(range.start), None)
    }
}

impl From<RangeTo<usize>> for RowSlice {
    fn from(range: RangeTo<usize>) -> Self {
        RowSlice::new(None, Some(range.end))
    }
}

impl From<RangeFull> for RowSlice {
    fn from(_: RangeFull) -> Self {
        RowSlice::all()
    }
}

impl FromStr for RowSlice {
    type Err = Lh5Error;

    /// Parse `N`, `A:B`, `A:`, `:B` or `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn bound(s: &str, whole: &str) -> Lh5Result<Option<usize>> {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse() {
                Ok(n) => Ok(Some(n)),
                Err(e) => lh5_bail!("invalid row slice '{}': {}", whole, e),
            }
        }

        match s.split_once(':') {
            None => match bound(s, s)? {
                Some(n) => Ok(RowSlice::length(n)),
                None => lh5_bail!("invalid row slice '{}': expected a length or A:B", s),
            },
            Some((start, stop)) => Ok(RowSlice::new(bound(start, s)?, bound(stop, s)?)),
        }
    }
}

impl Display for RowSlice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        write!(f, ":")?;
        if let Some(stop) = self.stop {
            write!(f, "{stop}")?;
        }
        Ok(())
    }
}

/// Selection for event-ordered data: the same slice of rows from every object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectSlice {
    slice: RowSlice,
}

impl DirectSlice {
    pub fn new(slice: RowSlice) -> Self {
        Self { slice }
    }

    pub fn slice(&self) -> RowSlice {
        self.slice
    }
}

impl RowSelector for DirectSlice {
    fn start_row(&self, _name: &str) -> usize {
        self.slice.start.unwrap_or(0)
    }

    fn row_count(&self, name: &str) -> RowCount {
        self.slice
            .stop
            .map(|stop| stop.saturating_sub(self.start_row(name)))
            .into()
    }

    /// The array was read from the slice start, so the slice is rebased to row zero.
    fn select(&self, path: &str, array: RowArray) -> Lh5Result<RowArray> {
        array.window(0, self.row_count(path).bound())
    }
}

static CHANNEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ch(\d+)(?:/|$)").lh5_expect("channel path regex is valid")
});

/// The channel key of a path whose first segment is `ch<digits>`.
pub fn channel_key(path: &str) -> Option<i64> {
    CHANNEL
        .captures(path.trim_start_matches('/'))
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Selection for hit-ordered data: each channel keeps the rows its table contributes to the
/// selected events, in event order.
///
/// The rows are looked up in a [`CoincidenceMap`] by the channel key of the object name. Objects
/// without a channel key are passed through whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMapped {
    map: CoincidenceMap,
}

impl ChannelMapped {
    /// Select with `map`, already restricted to the wanted events.
    pub fn new(map: CoincidenceMap) -> Self {
        Self { map }
    }

    pub fn coincidence_map(&self) -> &CoincidenceMap {
        &self.map
    }

    /// Rows of the channel table named by `path`, or `None` if it names no channel.
    pub fn row_indices(&self, path: &str) -> Option<Vec<usize>> {
        channel_key(path).map(|key| self.map.rows_for(key))
    }
}

impl RowSelector for ChannelMapped {
    fn start_row(&self, name: &str) -> usize {
        self.row_indices(name)
            .and_then(|rows| rows.into_iter().min())
            .unwrap_or(0)
    }

    fn row_count(&self, name: &str) -> RowCount {
        match self.row_indices(name) {
            None => RowCount::Unbounded,
            Some(rows) => {
                let span = rows
                    .iter()
                    .min()
                    .zip(rows.iter().max())
                    .map_or(0, |(min, max)| max - min + 1);
                RowCount::Bounded(span)
            }
        }
    }

    fn select(&self, path: &str, array: RowArray) -> Lh5Result<RowArray> {
        let Some(rows) = self.row_indices(path) else {
            debug!("{path} has no channel key, keeping all {} rows", array.len());
            return Ok(array);
        };
        let start = self.start_row(path);
        let indices = rows.into_iter().map(|row| row - start).collect::<Vec<_>>();
        array.take(&indices)
    }

    fn is_mapped(&self, name: &str) -> bool {
        channel_key(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use lh5_array::Values;
    use rstest::rstest;

    use super::*;

    fn rows(n: u32) -> RowArray {
        Values::from((0..n).collect::<Vec<_>>()).into()
    }

    fn channel_mapped() -> ChannelMapped {
        ChannelMapped::new(
            CoincidenceMap::from_hits(vec![1, 2, 1, 1, 2], vec![0, 0, 1, 2, 1]).unwrap(),
        )
    }

    #[rstest]
    #[case("10", RowSlice::length(10))]
    #[case("20:30", RowSlice::new(Some(20), Some(30)))]
    #[case("20:", RowSlice::new(Some(20), None))]
    #[case(":30", RowSlice::length(30))]
    #[case(":", RowSlice::all())]
    #[case(" 5 : 7 ", RowSlice::new(Some(5), Some(7)))]
    fn parses_slices(#[case] s: &str, #[case] expected: RowSlice) {
        assert_eq!(s.parse::<RowSlice>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("-1")]
    #[case("a:b")]
    #[case("1:2:3")]
    fn rejects_slices(#[case] s: &str) {
        assert!(s.parse::<RowSlice>().is_err());
    }

    #[test]
    fn slice_display_round_trips() {
        for slice in [
            RowSlice::new(Some(2), Some(9)),
            RowSlice::new(None, Some(3)),
            RowSlice::all(),
        ] {
            assert_eq!(slice.to_string().parse::<RowSlice>().unwrap(), slice);
        }
    }

    #[rstest]
    #[case(RowSlice::length(10), 100, 0..10)]
    #[case(RowSlice::new(Some(20), Some(30)), 100, 20..30)]
    #[case(RowSlice::new(Some(90), None), 100, 90..100)]
    #[case(RowSlice::new(Some(30), Some(20)), 100, 30..30)]
    #[case(RowSlice::new(Some(200), Some(300)), 100, 100..100)]
    fn resolves_clamped(
        #[case] slice: RowSlice,
        #[case] len: usize,
        #[case] expected: Range<usize>,
    ) {
        assert_eq!(slice.resolve(len), expected);
    }

    #[test]
    fn direct_length() {
        let selector = DirectSlice::new(RowSlice::length(10));
        assert_eq!(selector.start_row("evt"), 0);
        assert_eq!(selector.row_count("evt"), RowCount::Bounded(10));
        let selected = selector.select("evt/energy", rows(100)).unwrap();
        assert_eq!(selected, RowArray::from(Values::from((0..10).collect::<Vec<u32>>())));
    }

    #[test]
    fn direct_range_rebases_after_windowed_read() {
        let selector = DirectSlice::new(RowSlice::new(Some(20), Some(30)));
        assert_eq!(selector.start_row("evt"), 20);
        assert_eq!(selector.row_count("evt"), RowCount::Bounded(10));

        let read = rows(100).window(20, Some(10)).unwrap();
        let selected = selector.select("evt/energy", read).unwrap();
        assert_eq!(selected, RowArray::from(Values::from((20..30).collect::<Vec<u32>>())));
    }

    #[test]
    fn direct_open_end() {
        let selector = DirectSlice::new(RowSlice::new(Some(95), None));
        assert_eq!(selector.row_count("evt"), RowCount::Unbounded);
        let read = rows(100).window(95, None).unwrap();
        assert_eq!(selector.select("evt", read).unwrap().len(), 5);
    }

    #[rstest]
    #[case("ch1", Some(1))]
    #[case("/ch1/energy", Some(1))]
    #[case("ch0042/raw", Some(42))]
    #[case("ch1x", None)]
    #[case("evt", None)]
    #[case("geds/ch1", None)]
    fn extracts_channel_keys(#[case] path: &str, #[case] expected: Option<i64>) {
        assert_eq!(channel_key(path), expected);
    }

    #[test]
    fn channel_rows() {
        let selector = channel_mapped();
        assert_eq!(selector.row_indices("ch1"), Some(vec![0, 1, 2]));
        assert_eq!(selector.start_row("ch1"), 0);
        assert_eq!(selector.row_count("ch1"), RowCount::Bounded(3));
        assert_eq!(selector.row_indices("ch2"), Some(vec![0, 1]));
        assert_eq!(selector.start_row("ch2"), 0);
        assert_eq!(selector.row_count("ch2"), RowCount::Bounded(2));

        let read = rows(3);
        assert_eq!(selector.select("ch1/energy", read.clone()).unwrap(), read);
    }

    #[test]
    fn channel_rows_rebase_to_start() {
        let selector = ChannelMapped::new(
            CoincidenceMap::from_hits(vec![5, 5, 7, 5], vec![4, 6, 0, 5]).unwrap(),
        );
        assert_eq!(selector.start_row("ch5"), 4);
        assert_eq!(selector.row_count("ch5"), RowCount::Bounded(3));

        let read = rows(10).window(4, Some(3)).unwrap();
        let selected = selector.select("ch5/energy", read).unwrap();
        assert_eq!(selected, RowArray::from(Values::from(vec![4u32, 6, 5])));
    }

    #[test]
    fn channel_without_hits_selects_nothing() {
        let selector = channel_mapped();
        assert_eq!(selector.start_row("ch9"), 0);
        assert_eq!(selector.row_count("ch9"), RowCount::Bounded(0));
        let read = rows(10).window(0, Some(0)).unwrap();
        assert!(selector.select("ch9/energy", read).unwrap().is_empty());
    }

    #[test]
    fn unmapped_passes_through() {
        let selector = channel_mapped();
        assert!(!selector.is_mapped("summary"));
        assert_eq!(selector.start_row("summary"), 0);
        assert_eq!(selector.row_count("summary"), RowCount::Unbounded);
        assert_eq!(selector.select("summary/x", rows(7)).unwrap(), rows(7));
    }
}
