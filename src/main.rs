use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ifc_writer::export::{export_guid_manifest, export_step, write_lines};
use ifc_writer::guid::{compress, expand, new_global_id};
use ifc_writer::loader::load_graph_file;
use ifc_writer::step::EncodeOptions;

#[derive(Parser, Debug)]
#[command(name = "ifc-writer")]
#[command(about = "IFC Writer - render entity graphs as STEP records")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON entity graph as STEP records
    Render {
        /// Path to the JSON graph document
        #[arg(required = true)]
        file: PathBuf,

        /// Write records to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Export a CSV GUID manifest (optional output path)
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Write lists with a trailing comma, e.g. (1,2,3,)
        #[arg(long)]
        trailing_comma: bool,
    },

    /// Generate, compress or expand IFC GlobalIds
    Guid {
        #[command(subcommand)]
        action: GuidAction,
    },
}

#[derive(Subcommand, Debug)]
enum GuidAction {
    /// Print new random GlobalIds
    New {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Compress a UUID to its 22-character GlobalId
    Compress { uuid: Uuid },
    /// Expand a 22-character GlobalId to its UUID
    Expand { global_id: String },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match Args::parse().command {
        Command::Render {
            file,
            output,
            manifest,
            trailing_comma,
        } => {
            let mut graph = load_graph_file(&file)?;
            graph.assign_record_numbers()?;
            let options = EncodeOptions { trailing_comma };

            match &output {
                Some(path) => {
                    export_step(&graph, options, path)?;
                    eprintln!("Exported to STEP: {}", path.display());
                }
                None => write_lines(std::io::stdout().lock(), &graph.render_all(options)?)?,
            }

            if let Some(manifest_path) = &manifest {
                export_guid_manifest(&graph, manifest_path)?;
                eprintln!("Exported to CSV: {}", manifest_path.display());
            }
        }
        Command::Guid { action } => match action {
            GuidAction::New { count } => {
                for _ in 0..count {
                    println!("{}", new_global_id()?);
                }
            }
            GuidAction::Compress { uuid } => println!("{}", compress(uuid)?),
            GuidAction::Expand { global_id } => println!("{}", expand(&global_id)?.hyphenated()),
        },
    }

    Ok(())
}
