use std::path::{Path, PathBuf};

use lh5_array::{Node, RowArray};
use lh5_error::{ContextExt, Lh5Result, lh5_bail, lh5_err};
use lh5_file::{RowCount, Store, WriteMode};
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    ChannelMapped, CoincidenceMap, DirectSlice, FileCategory, MapEvents, PathFilter, RowOrdering,
    RowSelector, RowSlice, map_node,
};

/// Name of the channel key array in a coincidence map file.
pub const TCM_TABLE_KEY: &str = "hardware_tcm_1/table_key";
/// Name of the row-in-table array in a coincidence map file.
pub const TCM_ROW_IN_TABLE: &str = "hardware_tcm_1/row_in_table";

/// Options of a truncation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruncateOptions {
    overwrite: bool,
    coincidence_map: Option<PathBuf>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    file_category: Option<FileCategory>,
}

impl TruncateOptions {
    /// Replace the output file instead of refusing to touch existing objects.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The coincidence map file, required for hit-ordered input.
    pub fn with_coincidence_map<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.coincidence_map = Some(path.into());
        self
    }

    /// Keep only paths matching these patterns (and their ancestors).
    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Drop paths matching these patterns.
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Use this category instead of deducing it from the input file name.
    pub fn with_file_category(mut self, category: FileCategory) -> Self {
        self.file_category = Some(category);
        self
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn coincidence_map(&self) -> Option<&Path> {
        self.coincidence_map.as_deref()
    }

    pub fn include(&self) -> Option<&[String]> {
        self.include.as_deref()
    }

    pub fn exclude(&self) -> Option<&[String]> {
        self.exclude.as_deref()
    }

    pub fn file_category(&self) -> Option<FileCategory> {
        self.file_category
    }

    /// Compile the include and exclude patterns.
    pub fn path_filter(&self) -> Lh5Result<PathFilter> {
        PathFilter::try_new(self.include(), self.exclude())
    }
}

/// What happened to one top-level object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ObjectOutcome {
    /// Excluded by name; never read.
    Skipped,
    /// Read, then entirely filtered out.
    Dropped { dropped_paths: Vec<String> },
    /// Written to the output.
    Written {
        /// Rows read from the input, for row-indexed objects.
        rows_read: Option<usize>,
        /// Rows written, for row-indexed objects.
        rows_kept: Option<usize>,
        /// Leaf arrays written.
        leaves_mapped: usize,
        /// Descendant paths filtered out.
        dropped_paths: Vec<String>,
        /// The selector had no mapping for the object and kept every row read.
        unmapped: bool,
    },
}

/// The outcome for one top-level object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ObjectOutcome,
}

/// The result of a truncation run, one entry per top-level object in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruncateReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub category: Option<FileCategory>,
    pub objects: Vec<ObjectReport>,
}

impl TruncateReport {
    /// Names of the objects written, in order.
    pub fn written(&self) -> impl Iterator<Item = &str> {
        self.objects
            .iter()
            .filter(|o| matches!(o.outcome, ObjectOutcome::Written { .. }))
            .map(|o| o.name.as_str())
    }

    /// The outcome for `name`, if it was listed.
    pub fn outcome(&self, name: &str) -> Option<&ObjectOutcome> {
        self.objects
            .iter()
            .find_map(|o| (o.name == name).then_some(&o.outcome))
    }
}

/// Copy every top-level object of `input` to `output`, keeping the rows `selector` picks and the
/// paths `options` admits.
///
/// Objects are processed one at a time in listing order. The first write creates the output
/// (replacing it with `overwrite`), later writes append. A failure stops the run and leaves what
/// was already written.
pub fn truncate_store<S, R>(
    store: &mut S,
    input: &Path,
    output: &Path,
    selector: &R,
    options: &TruncateOptions,
) -> Lh5Result<TruncateReport>
where
    S: Store + ?Sized,
    R: RowSelector + ?Sized,
{
    let filter = options.path_filter()?;
    let names = store.list(input, false)?;
    info!("objects in {}: {}", input.display(), names.join(", "));

    let transform = |path: &str, array: RowArray| selector.select(path, array);
    let mut has_written = false;
    let mut objects = Vec::with_capacity(names.len());

    for name in names {
        if !filter.is_included(&name) {
            debug!("{name} excluded, not reading it");
            objects.push(ObjectReport {
                name,
                outcome: ObjectOutcome::Skipped,
            });
            continue;
        }

        let unmapped = !selector.is_mapped(&name);
        if unmapped {
            warn!("no row mapping known for {name}, keeping every row");
        }
        let (start_row, n_rows) = (selector.start_row(&name), selector.row_count(&name));
        info!(
            "reading {name} from {} with start_row={start_row}, n_rows={n_rows}",
            input.display()
        );
        let node = store.read(&name, input, start_row, n_rows)?;
        let rows_read = node.len();

        let mut events = MapEvents::default();
        let mapped = map_node(&transform, node, &name, &filter, &mut events)
            .context(|| format!("mapping {name}"))?;
        let Some(mapped) = mapped else {
            debug!("{name} mapped to nothing");
            objects.push(ObjectReport {
                name,
                outcome: ObjectOutcome::Dropped {
                    dropped_paths: events.dropped_paths,
                },
            });
            continue;
        };

        let mode = write_mode(has_written, options.overwrite());
        if has_written {
            debug!("appending {name} to {}", output.display());
        } else {
            info!("creating output file {}", output.display());
        }
        store.write(&mapped, &name, output, mode)?;
        has_written = true;

        objects.push(ObjectReport {
            outcome: ObjectOutcome::Written {
                rows_read,
                rows_kept: mapped.len(),
                leaves_mapped: events.leaves_mapped,
                dropped_paths: events.dropped_paths,
                unmapped,
            },
            name,
        });
    }

    Ok(TruncateReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        category: None,
        objects,
    })
}

fn write_mode(has_written: bool, overwrite: bool) -> WriteMode {
    match (has_written, overwrite) {
        (true, _) => WriteMode::Append,
        (false, true) => WriteMode::OverwriteFile,
        (false, false) => WriteMode::WriteSafe,
    }
}

/// Truncate `input` to the events in `rows`, writing the result to `output`.
///
/// Event-ordered files keep the same slice of every object. Hit-ordered files keep, per channel,
/// the rows the coincidence map assigns to the selected events.
///
/// # Errors
///
/// Fails before touching any file if the category cannot be determined, or if hit-ordered input
/// comes without a coincidence map.
pub fn truncate<S: Store + ?Sized>(
    store: &mut S,
    input: &Path,
    output: &Path,
    rows: impl Into<RowSlice>,
    options: &TruncateOptions,
) -> Lh5Result<TruncateReport> {
    let rows = rows.into();
    let category = match options.file_category() {
        Some(category) => category,
        None => FileCategory::infer(input)?,
    };
    let ordering = category.ordering();
    info!(
        "{} is {} data ({category}), keeping events {rows}",
        input.display(),
        match ordering {
            RowOrdering::Event => "event-ordered",
            RowOrdering::Hit => "hit-ordered",
        }
    );

    let mut report = match ordering {
        RowOrdering::Event => {
            truncate_store(store, input, output, &DirectSlice::new(rows), options)?
        }
        RowOrdering::Hit => {
            let Some(tcm) = options.coincidence_map() else {
                lh5_bail!(
                    MissingCoincidenceMap: "a coincidence map file is required for hit-ordered {} files",
                    category
                );
            };
            let map = read_coincidence_map(&*store, tcm)?.restrict(&rows);
            info!(
                "coincidence map {} restricted to {} events, {} hits",
                tcm.display(),
                map.n_events(),
                map.n_hits()
            );
            truncate_store(store, input, output, &ChannelMapped::new(map), options)?
        }
    };
    report.category = Some(category);
    Ok(report)
}

/// Read the channel key and row-in-table arrays of a coincidence map file.
pub fn read_coincidence_map<S: Store + ?Sized>(
    store: &S,
    path: &Path,
) -> Lh5Result<CoincidenceMap> {
    let read_array = |name: &str| -> Lh5Result<RowArray> {
        match store.read(name, path, 0, RowCount::Unbounded)? {
            Node::Leaf(leaf) => Ok(leaf.into_parts().1),
            other => Err(lh5_err!(
                "{} in {} is a {}, expected an array",
                name,
                path.display(),
                other.kind()
            )),
        }
    };
    CoincidenceMap::try_new(&read_array(TCM_TABLE_KEY)?, &read_array(TCM_ROW_IN_TABLE)?)
        .context(|| format!("reading coincidence map {}", path.display()))
}
