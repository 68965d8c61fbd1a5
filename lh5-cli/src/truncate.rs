use std::path::{Path, PathBuf};
use std::time::Instant;

use lh5_file::JsonStore;
use lh5_truncate::{
    FileCategory, ObjectOutcome, RowSlice, TruncateOptions, TruncateReport, truncate,
};

pub struct Flags {
    pub overwrite: bool,
    pub tcm: Option<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub file_type: Option<FileCategory>,
    pub json: bool,
}

impl Flags {
    fn options(self) -> TruncateOptions {
        let mut options = TruncateOptions::default().with_overwrite(self.overwrite);
        if let Some(tcm) = self.tcm {
            options = options.with_coincidence_map(tcm);
        }
        if !self.include.is_empty() {
            options = options.with_include(self.include);
        }
        if !self.exclude.is_empty() {
            options = options.with_exclude(self.exclude);
        }
        if let Some(category) = self.file_type {
            options = options.with_file_category(category);
        }
        options
    }
}

/// Truncate `input` into `output`, keeping the events in `rows`.
pub fn exec_truncate(
    input: &Path,
    output: &Path,
    rows: RowSlice,
    flags: Flags,
) -> anyhow::Result<()> {
    let json = flags.json;
    let options = flags.options();
    let wall_start = Instant::now();

    let mut store = JsonStore::new();
    let report = truncate(&mut store, input, output, rows, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
        eprintln!(
            "Truncated rows {rows} into {} in {:.2}s",
            output.display(),
            wall_start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn print_summary(report: &TruncateReport) {
    if let Some(category) = report.category {
        println!("{} ({category})", report.input.display());
    }
    for object in &report.objects {
        match &object.outcome {
            ObjectOutcome::Skipped => println!("  {:<24} skipped", object.name),
            ObjectOutcome::Dropped { .. } => println!("  {:<24} filtered out", object.name),
            ObjectOutcome::Written {
                rows_read,
                rows_kept,
                leaves_mapped,
                dropped_paths,
                unmapped,
            } => {
                let rows = match (rows_read, rows_kept) {
                    (Some(read), Some(kept)) => format!("{kept}/{read} rows"),
                    _ => "scalar".to_string(),
                };
                let mut line = format!("  {:<24} {rows} in {leaves_mapped} arrays", object.name);
                if !dropped_paths.is_empty() {
                    line.push_str(&format!(", {} paths dropped", dropped_paths.len()));
                }
                if *unmapped {
                    line.push_str(", no channel mapping");
                }
                println!("{line}");
            }
        }
    }
}
