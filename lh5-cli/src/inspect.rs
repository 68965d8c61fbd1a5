use std::path::Path;

use lh5_file::{JsonStore, RowCount, Store};

pub fn exec_ls(file: &Path, recursive: bool) -> anyhow::Result<()> {
    let store = JsonStore::new();
    for name in store.list(file, recursive)? {
        println!("{name}");
    }
    Ok(())
}

/// Print the object tree of `name`, or of every top-level object.
pub fn exec_show(file: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let store = JsonStore::new();
    let names = match name {
        Some(name) => vec![name.to_string()],
        None => store.list(file, false)?,
    };
    for name in names {
        let node = store.read(&name, file, 0, RowCount::Unbounded)?;
        print!("{}", node.tree_display(&name));
    }
    Ok(())
}
