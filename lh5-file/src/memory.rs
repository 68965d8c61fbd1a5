use std::path::{Path, PathBuf};

use lh5_array::Node;
use lh5_error::{Lh5Result, lh5_err};
use rustc_hash::FxHashMap;

use crate::objects::Objects;
use crate::{RowCount, Store, WriteMode};

/// A [`Store`] holding every file in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: FxHashMap<PathBuf, Objects>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a whole file.
    pub fn insert_file<P: Into<PathBuf>>(&mut self, path: P, objects: Vec<(String, Node)>) {
        self.files.insert(path.into(), Objects::new(objects));
    }

    /// Whether a file exists at `path`.
    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// The top-level objects of a file, in storage order.
    pub fn file(&self, path: &Path) -> Option<&[(String, Node)]> {
        self.files.get(path).map(Objects::entries)
    }

    fn objects(&self, path: &Path) -> Lh5Result<&Objects> {
        self.files
            .get(path)
            .ok_or_else(|| lh5_err!(NotFound: "{}", path.display()))
    }
}

impl Store for MemoryStore {
    fn list(&self, source: &Path, recursive: bool) -> Lh5Result<Vec<String>> {
        Ok(self.objects(source)?.list(recursive))
    }

    fn read(
        &self,
        name: &str,
        source: &Path,
        start_row: usize,
        n_rows: RowCount,
    ) -> Lh5Result<Node> {
        self.objects(source)?.read(name, source, start_row, n_rows)
    }

    fn write(
        &mut self,
        node: &Node,
        name: &str,
        destination: &Path,
        mode: WriteMode,
    ) -> Lh5Result<()> {
        let exists = self.files.contains_key(destination);
        let mut objects = self.files.get(destination).cloned().unwrap_or_default();
        objects.write(node, name, destination, mode, exists)?;
        self.files.insert(destination.to_path_buf(), objects);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lh5_array::{Attributes, Leaf, RowArray, Struct, Values};
    use lh5_error::Lh5Error;

    use super::*;

    fn array(values: Vec<u32>) -> Node {
        Leaf::array(RowArray::from(Values::from(values)), Attributes::new())
            .unwrap()
            .into()
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_file(
            "in.lh5",
            vec![
                (
                    "ch1".to_string(),
                    Struct::new(
                        vec![("energy".into(), array(vec![1, 2, 3, 4]))],
                        Attributes::new(),
                    )
                    .into(),
                ),
                ("evt".to_string(), array(vec![5, 6])),
            ],
        );
        store
    }

    #[test]
    fn lists_in_order() {
        let store = store();
        let path = Path::new("in.lh5");
        assert_eq!(store.list(path, false).unwrap(), vec!["ch1", "evt"]);
        assert_eq!(
            store.list(path, true).unwrap(),
            vec!["ch1", "ch1/energy", "evt"]
        );
        assert!(matches!(
            store.list(Path::new("missing.lh5"), false),
            Err(Lh5Error::NotFound(..))
        ));
    }

    #[test]
    fn reads_nested_window() {
        let store = store();
        let node = store
            .read("/ch1/energy", Path::new("in.lh5"), 1, RowCount::Bounded(2))
            .unwrap();
        assert_eq!(node, array(vec![2, 3]));
        assert!(
            store
                .read("ch2", Path::new("in.lh5"), 0, RowCount::Unbounded)
                .is_err()
        );
    }

    #[test]
    fn write_modes() {
        let mut store = store();
        let out = Path::new("out.lh5");

        assert!(matches!(
            store.write(&array(vec![1]), "a", out, WriteMode::Append),
            Err(Lh5Error::NotFound(..))
        ));
        store
            .write(&array(vec![1]), "a", out, WriteMode::WriteSafe)
            .unwrap();
        store
            .write(&array(vec![2]), "b", out, WriteMode::Append)
            .unwrap();
        assert!(matches!(
            store.write(&array(vec![3]), "a", out, WriteMode::WriteSafe),
            Err(Lh5Error::AlreadyExists(..))
        ));
        assert_eq!(store.list(out, false).unwrap(), vec!["a", "b"]);

        store
            .write(&array(vec![4]), "c", out, WriteMode::OverwriteFile)
            .unwrap();
        assert_eq!(store.list(out, false).unwrap(), vec!["c"]);
    }
}
