use clap::{Parser, Subcommand};
use color_key::{batch, config, output, scan, store};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "color-key")]
#[command(about = "Batch color-key transparency and shadow keying for sprite assets")]
#[command(long_about = "\
Batch color-key transparency and shadow keying for sprite assets

Every PNG, TGA and BMP under the source directory is rewritten: pixels
near the alpha key become transparent, pixels near the shadow key become
a flat shadow fill, everything else becomes fully opaque. BMP sources
are converted to the configured output format and replaced on disk.

Example run:

  assets/
  ├── color-key.toml      # Optional config (or pass --config)
  ├── hero.png            # Rewritten in place
  ├── tiles.bmp           # Converted to tiles.png, original removed
  └── ui/cursor.tga       # Rewritten in place

Read-only files are processed too: the flag is lifted for the rewrite
and restored afterwards (unless make_readable is set).

Run 'color-key gen-config' for a documented color-key.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding the source images
    #[arg(long, default_value = "assets", global = true)]
    source: PathBuf,

    /// Config file (defaults to <source>/color-key.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recolor every supported image under the source directory
    Process {
        /// Write the full per-item result list as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List what a process run would touch, without writing anything
    Check,
    /// Print a stock color-key.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Process { report } => {
            let cfg = config::KeyConfig::resolve(cli.config.as_deref(), &cli.source)?;
            init_thread_pool(&cfg.processing);

            let entries = scan::scan(&cli.source)?;
            let results = batch::run(&store::FsStore::new(), &entries, &cfg);
            output::print_batch_output(&results, &cli.source);

            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&results)?;
                std::fs::write(&report_path, json)?;
            }
        }
        Command::Check => {
            let cfg = config::KeyConfig::resolve(cli.config.as_deref(), &cli.source)?;
            let entries = scan::scan(&cli.source)?;
            output::print_scan_output(&entries, &cli.source, cfg.output.format);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
