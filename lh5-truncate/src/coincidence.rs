use lh5_array::{FlatArray, RowArray};
use lh5_error::{Lh5Result, lh5_bail, lh5_err};
use num_traits::ToPrimitive;

use crate::RowSlice;

/// Per-event hit lists: for every event, which channel table was hit and at which row.
///
/// Hits are stored flat in event order, with `event_ends[i]` the end of event `i`'s hits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoincidenceMap {
    event_ends: Vec<usize>,
    channel_key: Vec<i64>,
    row_in_table: Vec<usize>,
}

impl CoincidenceMap {
    /// Build a map from the channel key and row-in-table arrays of a coincidence file.
    ///
    /// Both arrays must be integer valued with the same shape: either one row per event (flat)
    /// or one variable-length row of hits per event (jagged).
    pub fn try_new(channel_key: &RowArray, row_in_table: &RowArray) -> Lh5Result<Self> {
        let (key_ends, keys) = hits(channel_key, "channel key")?;
        let (row_ends, rows) = hits(row_in_table, "row in table")?;
        if key_ends != row_ends {
            lh5_bail!(
                "channel key and row in table disagree in shape ({} vs {} events, {} vs {} hits)",
                key_ends.len(),
                row_ends.len(),
                keys.len(),
                rows.len()
            );
        }
        let row_in_table = rows
            .into_iter()
            .map(|row| {
                row.to_usize()
                    .ok_or_else(|| lh5_err!("negative row in table {}", row))
            })
            .collect::<Lh5Result<Vec<_>>>()?;
        Ok(Self {
            event_ends: key_ends,
            channel_key: keys,
            row_in_table,
        })
    }

    /// A map with exactly one hit per event.
    pub fn from_hits(channel_key: Vec<i64>, row_in_table: Vec<usize>) -> Lh5Result<Self> {
        if channel_key.len() != row_in_table.len() {
            lh5_bail!(
                "channel key has {} entries, row in table {}",
                channel_key.len(),
                row_in_table.len()
            );
        }
        Ok(Self {
            event_ends: (1..=channel_key.len()).collect(),
            channel_key,
            row_in_table,
        })
    }

    pub fn n_events(&self) -> usize {
        self.event_ends.len()
    }

    pub fn n_hits(&self) -> usize {
        self.channel_key.len()
    }

    /// Keep only the events in `slice`.
    pub fn restrict(&self, slice: &RowSlice) -> Self {
        let events = slice.resolve(self.n_events());
        let hit_start = self.event_start(events.start);
        let hit_stop = self.event_start(events.end);
        Self {
            event_ends: self.event_ends[events]
                .iter()
                .map(|end| end - hit_start)
                .collect(),
            channel_key: self.channel_key[hit_start..hit_stop].to_vec(),
            row_in_table: self.row_in_table[hit_start..hit_stop].to_vec(),
        }
    }

    /// The rows of `channel`'s table hit by the events, in event order.
    pub fn rows_for(&self, channel: i64) -> Vec<usize> {
        self.channel_key
            .iter()
            .zip(&self.row_in_table)
            .filter_map(|(key, row)| (*key == channel).then_some(*row))
            .collect()
    }

    fn event_start(&self, event: usize) -> usize {
        event
            .checked_sub(1)
            .and_then(|prev| self.event_ends.get(prev))
            .copied()
            .unwrap_or(0)
    }
}

/// Split an integer array into event ends and flat hit values.
fn hits(array: &RowArray, what: &str) -> Lh5Result<(Vec<usize>, Vec<i64>)> {
    match array {
        RowArray::Flat(flat) => {
            let ends = (1..=flat.len()).map(|e| e * flat.width()).collect();
            Ok((ends, ints(flat, what)?))
        }
        RowArray::Jagged(jagged) => {
            let RowArray::Flat(flat) = jagged.flattened() else {
                lh5_bail!("{} must be at most one level jagged", what);
            };
            let ends = jagged
                .cumulative_length()
                .iter()
                .map(|end| {
                    end.to_usize()
                        .ok_or_else(|| lh5_err!("{} offset {} overflows", what, end))
                })
                .collect::<Lh5Result<Vec<_>>>()?;
            Ok((ends, ints(flat, what)?))
        }
        RowArray::Encoded(_) => lh5_bail!("{} cannot be an encoded array", what),
    }
}

fn ints(flat: &FlatArray, what: &str) -> Lh5Result<Vec<i64>> {
    if !flat.values().ptype().is_int() {
        lh5_bail!("{} must be integers, got {}", what, flat.values().ptype());
    }
    flat.values().to_i64()
}

#[cfg(test)]
mod tests {
    use lh5_array::{JaggedArray, Values};

    use super::*;

    fn flat_map() -> CoincidenceMap {
        CoincidenceMap::try_new(
            &Values::from(vec![1i32, 2, 1, 1, 2]).into(),
            &Values::from(vec![0u32, 0, 1, 2, 1]).into(),
        )
        .unwrap()
    }

    fn jagged_map() -> CoincidenceMap {
        // events: [(1,0),(2,0)], [(1,1)], [], [(2,1),(1,2)]
        let lengths = [2u64, 1, 0, 2];
        let keys =
            JaggedArray::from_lengths(&lengths, Values::from(vec![1i64, 2, 1, 2, 1]).into())
                .unwrap();
        let rows =
            JaggedArray::from_lengths(&lengths, Values::from(vec![0u64, 0, 1, 1, 2]).into())
                .unwrap();
        CoincidenceMap::try_new(&keys.into(), &rows.into()).unwrap()
    }

    #[test]
    fn rows_per_channel() {
        let map = flat_map();
        assert_eq!(map.n_events(), 5);
        assert_eq!(map.rows_for(1), vec![0, 1, 2]);
        assert_eq!(map.rows_for(2), vec![0, 1]);
        assert!(map.rows_for(3).is_empty());
    }

    #[test]
    fn jagged_events_flatten_in_order() {
        let map = jagged_map();
        assert_eq!(map.n_events(), 4);
        assert_eq!(map.n_hits(), 5);
        assert_eq!(map.rows_for(1), vec![0, 1, 2]);
        assert_eq!(map.rows_for(2), vec![0, 1]);
    }

    #[test]
    fn restrict_to_events() {
        let map = jagged_map();
        let first = map.restrict(&RowSlice::length(2));
        assert_eq!(first.n_events(), 2);
        assert_eq!(first.rows_for(1), vec![0, 1]);
        assert_eq!(first.rows_for(2), vec![0]);

        let tail = map.restrict(&RowSlice::new(Some(2), None));
        assert_eq!(tail.n_events(), 2);
        assert_eq!(tail.rows_for(1), vec![2]);
        assert_eq!(tail.rows_for(2), vec![1]);

        assert_eq!(map.restrict(&RowSlice::new(Some(10), Some(20))).n_hits(), 0);
        assert_eq!(
            flat_map()
                .restrict(&RowSlice::new(Some(1), Some(4)))
                .rows_for(1),
            vec![1, 2]
        );
    }

    #[test]
    fn shapes_must_agree() {
        assert!(
            CoincidenceMap::try_new(
                &Values::from(vec![1i32, 2]).into(),
                &Values::from(vec![0u32, 0, 1]).into(),
            )
            .is_err()
        );
        assert!(
            CoincidenceMap::try_new(
                &Values::from(vec![1.0f32]).into(),
                &Values::from(vec![0u32]).into(),
            )
            .is_err()
        );
        assert!(
            CoincidenceMap::try_new(
                &Values::from(vec![1i32]).into(),
                &Values::from(vec![-1i32]).into(),
            )
            .is_err()
        );
    }
}
