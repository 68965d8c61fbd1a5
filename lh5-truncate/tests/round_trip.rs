use std::path::Path;

use lh5_array::{
    Attributes, DecodedSize, EncodedArray, JaggedArray, Leaf, LeafKind, Node, RowArray, Table,
    Values, WaveformTable,
};
use lh5_dtype::Kind;
use lh5_file::{JsonStore, RowCount, Store, WriteMode};
use lh5_truncate::{ObjectOutcome, TruncateOptions, truncate};

fn array(values: Vec<u32>) -> Node {
    Leaf::array(RowArray::from(Values::from(values)), Attributes::new())
        .unwrap()
        .into()
}

fn waveforms(n: usize) -> Node {
    let bytes = JaggedArray::from_lengths(
        &vec![3u64; n],
        Values::from((0..3 * n).map(|b| u8::try_from(b % 256).unwrap()).collect::<Vec<_>>()).into(),
    )
    .unwrap();
    let values = Leaf::try_new(
        LeafKind::ArrayOfEncodedEqualSizedArrays,
        EncodedArray::try_new(bytes, DecodedSize::Uniform(8))
            .unwrap()
            .into(),
        Attributes::new(),
    )
    .unwrap();
    WaveformTable::try_new(
        array(vec![0; n]),
        array(vec![16; n]),
        values.into(),
        Attributes::new(),
    )
    .unwrap()
    .into()
}

fn channel(rows: u32) -> Node {
    Table::try_new(
        vec![
            ("energy".into(), array((0..rows).collect())),
            ("waveform".into(), waveforms(rows as usize)),
        ],
        Attributes::new(),
    )
    .unwrap()
    .into()
}

fn write_all(store: &mut JsonStore, path: &Path, objects: Vec<(&str, Node)>) {
    for (i, (name, node)) in objects.into_iter().enumerate() {
        let mode = if i == 0 {
            WriteMode::OverwriteFile
        } else {
            WriteMode::Append
        };
        store.write(&node, name, path, mode).unwrap();
    }
}

#[test]
fn hit_ordered_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let tcm = dir.path().join("l200-tier_tcm.lh5");
    let input = dir.path().join("l200-tier_dsp.lh5");
    let output = dir.path().join("l200-tier_dsp.small.lh5");
    let mut store = JsonStore::new();

    // 6 events over channels 1 and 2; channel 2 is hit by events 1, 3 and 5.
    let keys = vec![1, 2, 1, 2, 1, 2];
    let rows = vec![0, 0, 1, 1, 2, 2];
    let tcm_table = Table::try_new(
        vec![
            ("table_key".into(), array(keys)),
            ("row_in_table".into(), array(rows)),
        ],
        Attributes::new(),
    )
    .unwrap();
    write_all(&mut store, &tcm, vec![("hardware_tcm_1", tcm_table.into())]);
    write_all(
        &mut store,
        &input,
        vec![("ch1", channel(5)), ("ch2", channel(4))],
    );

    let options = TruncateOptions::default()
        .with_coincidence_map(&tcm)
        .with_exclude(["ch1/waveform/t0"]);
    let report = truncate(&mut store, &input, &output, 4usize, &options).unwrap();

    // events 0..4 hit ch1 rows 0, 1 and ch2 rows 0, 1
    let ch1 = store.read("ch1", &output, 0, RowCount::Unbounded).unwrap();
    assert_eq!(ch1.len(), Some(2));
    assert!(ch1.child("waveform").is_none());
    let ch2 = store.read("ch2", &output, 0, RowCount::Unbounded).unwrap();
    assert_eq!(ch2.len(), Some(2));
    assert_eq!(ch2.child("waveform").unwrap().kind(), Kind::WaveformTable);
    assert_eq!(
        store
            .read("ch2/waveform/values", &output, 0, RowCount::Unbounded)
            .unwrap()
            .kind(),
        Kind::ArrayOfEncodedEqualSizedArrays
    );

    assert!(matches!(
        report.outcome("ch1"),
        Some(ObjectOutcome::Written { rows_read: Some(2), rows_kept: Some(2), .. })
    ));
    assert_eq!(
        store.list(&output, false).unwrap(),
        store.list(&input, false).unwrap()
    );
}

#[test]
fn event_ordered_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tier_evt.lh5");
    let output = dir.path().join("out.lh5");
    let mut store = JsonStore::new();
    write_all(
        &mut store,
        &input,
        vec![("evt", channel(50)), ("geds", channel(50))],
    );

    let options = TruncateOptions::default().with_include(["evt/energy"]);
    let report = truncate(&mut store, &input, &output, 10usize..15, &options).unwrap();
    assert_eq!(report.written().collect::<Vec<_>>(), vec!["evt"]);
    assert_eq!(report.outcome("geds"), Some(&ObjectOutcome::Skipped));

    let evt = store.read("evt", &output, 0, RowCount::Unbounded).unwrap();
    assert_eq!(evt.len(), Some(5));
    assert_eq!(
        evt.children().into_iter().map(|(n, _)| n).collect::<Vec<_>>(),
        vec!["energy"]
    );
    let Node::Leaf(energy) = store.read("evt/energy", &output, 0, RowCount::Unbounded).unwrap()
    else {
        panic!("evt/energy is not an array");
    };
    assert_eq!(
        energy.data(),
        &RowArray::from(Values::from((10..15).collect::<Vec<u32>>()))
    );
}
