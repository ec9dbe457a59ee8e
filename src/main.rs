//! Swarm Docs - documentation tooling for the Aprio Swarm System.
//!
//! Renders the Mermaid architecture diagrams, prints the ASCII overview,
//! and draws the performance charts.

mod diagram;
mod display;
mod logging;
mod metrics;
mod plot;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diagram::{ImageFormat, Installer, MermaidCli};
use metrics::PerformanceData;
use plot::ChartFormat;
use std::io;
use std::path::PathBuf;

/// Diagrams, ASCII art and performance charts for the Aprio Swarm System
#[derive(Parser, Debug)]
#[command(name = "swarm-docs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the Mermaid diagrams through the Mermaid CLI
    Diagrams {
        /// Directory for the rendered images
        #[arg(short, long, default_value = "docs/images")]
        output_dir: PathBuf,

        /// Renderer command (e.g. "mmdc" or "npx -p @mermaid-js/mermaid-cli mmdc")
        #[arg(long, default_value = "mmdc")]
        renderer: String,

        /// Mermaid theme
        #[arg(short, long, default_value = "default")]
        theme: String,

        /// Background color
        #[arg(short, long, default_value = "white")]
        background: String,

        /// Image format of the rendered diagrams
        #[arg(short, long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,

        /// Do not try to install the Mermaid CLI when it is missing
        #[arg(long)]
        no_install: bool,
    },

    /// Print the ASCII architecture and task flow diagrams
    Ascii,

    /// Draw the performance charts
    Perf {
        /// Output file for the chart [default: swarm_performance.<format>]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chart format [default: from the output extension, else png]
        #[arg(short, long, value_enum)]
        format: Option<ChartFormat>,

        /// JSON dataset replacing the built-in sample run
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Chart width in pixels
        #[arg(long, default_value_t = plot::DEFAULT_SIZE.0)]
        width: u32,

        /// Chart height in pixels
        #[arg(long, default_value_t = plot::DEFAULT_SIZE.1)]
        height: u32,

        /// Open the saved chart in the system image viewer
        #[arg(long)]
        open: bool,
    },
}

/// Options of the `perf` subcommand
struct PerfOptions {
    output: Option<PathBuf>,
    format: Option<ChartFormat>,
    data: Option<PathBuf>,
    size: (u32, u32),
    open: bool,
}

fn run_perf(opts: PerfOptions) -> Result<PathBuf> {
    let (output, format) = plot::resolve_output(opts.output, opts.format);
    let dataset = match opts.data {
        Some(ref path) => {
            eprintln!("Loading dataset from: {}", path.display());
            PerformanceData::load(path)?
        }
        None => PerformanceData::default(),
    };
    tracing::debug!(task_types = dataset.task_count(), "dataset ready");

    println!("🎨 Creating Aprio Swarm System Visualizations...");
    println!("{}", display::compact_architecture());

    plot::generate_performance_chart(&dataset, &output, opts.size, format)?;
    println!("📊 Performance visualization saved as '{}'", output.display());

    if opts.open {
        if let Err(e) = plot::open_in_viewer(&output) {
            tracing::warn!(error = %e, "could not open chart");
            eprintln!("Warning: could not open {}: {:#}", output.display(), e);
        }
    }

    println!("✨ Visualizations complete!");
    Ok(output)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    match args.command {
        Command::Diagrams {
            output_dir,
            renderer,
            theme,
            background,
            format,
            no_install,
        } => {
            let cli = MermaidCli {
                theme,
                background,
                ..MermaidCli::from_command_line(&renderer)
            };
            let installer = Installer::default();
            let installer = (!no_install).then_some(&installer);

            let report = diagram::generate_diagrams(&cli, installer, &output_dir, format)?;
            tracing::info!(succeeded = report.succeeded, total = report.total, "diagram run finished");
        }
        Command::Ascii => {
            display::write_ascii_report(&mut io::stdout().lock())
                .context("Failed to write to stdout")?;
        }
        Command::Perf {
            output,
            format,
            data,
            width,
            height,
            open,
        } => {
            run_perf(PerfOptions {
                output,
                format,
                data,
                size: (width, height),
                open,
            })?;
        }
    }

    Ok(())
}
