use anyhow::Context;
use clap::{Parser, Subcommand};
use royalbit_tabula::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Typed records to Excel sheets and back. Template-driven Excel reports.")]
#[command(long_about = "Tabula - tagged records ↔ Excel sheets, plus template reports

COMMANDS:
  report   - Fill a template workbook's {{ }} markers from YAML/JSON data
  inspect  - Show a sheet the way the importer reads it

EXAMPLES:
  tabula report template.xlsx --data q1.yaml -o q1.xlsx
  tabula inspect people.xlsx --sheet people --remind

LOGGING:
  RUST_LOG=royalbit_tabula=debug tabula report ...   # or pass -v")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Render a report from a template workbook.

Every cell of every sheet is scanned for markers:

  {{ .Company.Name }}            replaced in place
  {{ range .Items }}{{ .Name }}
  {{ end }}                      one row per non-blank line, later rows move down

Paths start at the data file's root; inside a range '.' is the current item
and '$' is still the root. Formulas and plain values are copied unchanged.

DATA FILES:
  .json is read as JSON, anything else as YAML.")]
    /// Render a template workbook against a data file
    Report {
        /// Template workbook (.xlsx)
        template: PathBuf,

        /// Context data (.yaml, .yml or .json)
        #[arg(short, long)]
        data: PathBuf,

        /// Output workbook (.xlsx)
        #[arg(short, long)]
        output: PathBuf,

        /// Show verbose progress and debug logs
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Print a sheet as the importer sees it.

Row 1 is the title, row 2 the header. Header cells are listed with their
column letters, then every data row below them. With --remind the reminder
row under the header is skipped too.

OPTIONS FILE:
  sheet_name: people
  title: People
  show_remind: true")]
    /// Show header bindings and data rows of a sheet
    Inspect {
        /// Workbook to read (.xlsx)
        file: PathBuf,

        /// Sheet to read (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// A reminder row sits between header and data
        #[arg(short, long)]
        remind: bool,

        /// Options file (YAML) with sheet_name / show_remind
        #[arg(short, long, env = "TABULA_OPTIONS")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "royalbit_tabula=debug" } else { "royalbit_tabula=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            template,
            data,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            cli::report(template.clone(), data, output, verbose)
                .with_context(|| format!("rendering report from {}", template.display()))
        }

        Commands::Inspect {
            file,
            sheet,
            remind,
            config,
        } => {
            init_tracing(false);
            cli::inspect(file.clone(), sheet, remind, config)
                .with_context(|| format!("inspecting {}", file.display()))
        }
    }
}
