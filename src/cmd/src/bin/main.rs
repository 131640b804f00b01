use clap::Parser;
use clap::Subcommand;
use cmd::command::gen;
use cmd::command::gen::Gen;
use cmd::command::stats;
use cmd::command::stats::Stats;
use cmd::config::Config;
use cmd::error::Result;
use cmd::init_tracing;
use tracing::info;

#[derive(Subcommand, Clone)]
enum Commands {
    /// Generate events into the partitioned output location
    Gen(Gen),
    /// Show per-partition statistics of an output location
    Stats(Stats),
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    match &args.command {
        Commands::Gen(args) => {
            let mut cfg = Config::load(args.config.as_deref())?;
            if let Some(path) = &args.out_path {
                cfg.output.path.clone_from(path);
            }
            init_tracing(args.log_level.unwrap_or(cfg.log.level))?;

            let version = env!("CARGO_PKG_VERSION");
            info!("events-gen v{version}");

            gen::gen(cfg.try_into()?)?;
        }
        Commands::Stats(args) => {
            init_tracing(args.log_level)?;
            stats::stats(args)?;
        }
    }

    Ok(())
}
