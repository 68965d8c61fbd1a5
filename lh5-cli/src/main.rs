mod inspect;
mod truncate;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use lh5_truncate::{FileCategory, RowSlice};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::inspect::{exec_ls, exec_show};
use crate::truncate::{Flags, exec_truncate};

#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Increase logging verbosity, repeat for more.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging entirely.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Copy the first rows of an LH5 file into a new file.
    Truncate {
        input: PathBuf,
        output: PathBuf,

        /// Rows to keep: a count `N` or an event range `A:B` (either end may be omitted).
        #[arg(short, long)]
        rows: RowSlice,

        /// Replace the output file if it exists.
        #[arg(long)]
        overwrite: bool,

        /// Coincidence map file, required for hit-ordered inputs.
        #[arg(long, value_name = "PATH")]
        tcm: Option<PathBuf>,

        /// Keep only objects matching this glob, repeatable.
        #[arg(long, value_name = "PATTERN")]
        include: Vec<String>,

        /// Drop objects matching this glob, repeatable.
        #[arg(long, value_name = "PATTERN")]
        exclude: Vec<String>,

        /// File category, deduced from a `tier_<category>` file name when omitted.
        #[arg(long, value_name = "CATEGORY")]
        file_type: Option<FileCategory>,

        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the objects of an LH5 file.
    Ls {
        file: PathBuf,

        #[arg(short = 'R', long)]
        recursive: bool,
    },
    /// Print the object tree of an LH5 file, or of one object in it.
    Show { file: PathBuf, name: Option<String> },
}

impl Commands {
    fn file_path(&self) -> &PathBuf {
        match self {
            Commands::Truncate { input, .. } => input,
            Commands::Ls { file, .. } | Commands::Show { file, .. } => file,
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        LevelFilter::Off
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    TermLogger::init(
        filter,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let path = cli.command.file_path();
    if !std::fs::exists(path)? {
        Cli::command()
            .error(
                clap::error::ErrorKind::Io,
                format!("File '{}' does not exist.", path.display()),
            )
            .exit()
    }

    match cli.command {
        Commands::Truncate {
            input,
            output,
            rows,
            overwrite,
            tcm,
            include,
            exclude,
            file_type,
            json,
        } => exec_truncate(
            &input,
            &output,
            rows,
            Flags {
                overwrite,
                tcm,
                include,
                exclude,
                file_type,
                json,
            },
        )?,
        Commands::Ls { file, recursive } => exec_ls(&file, recursive)?,
        Commands::Show { file, name } => exec_show(&file, name.as_deref())?,
    };

    Ok(())
}
