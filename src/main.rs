use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, info};
use pipeline_health::{PipelineModel, Report, Result, Snapshot};

#[derive(Parser)]
#[command(name = "pipeline-health")]
#[command(about = "Pipeline topology and health model", long_about = None)]
struct Cli {
    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build health-annotated trees and write them as a JSON report.
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout when omitted).
        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long)]
        pretty: bool,
    },
    /// Validate pipeline topology; fails if any pipeline is misconfigured.
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Snapshot JSON file, or `-` for stdin.
    #[arg(long)]
    snapshot: String,

    /// Only pipelines whose name matches this regex.
    #[arg(long)]
    only: Option<String>,
}

impl InputArgs {
    fn load(&self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::load(&self.snapshot)?;
        if let Some(pattern) = &self.only {
            let before = snapshot.pipelines.len();
            snapshot.retain_matching(pattern)?;
            info!(
                "--only {:?} kept {} of {} pipeline(s)",
                pattern,
                snapshot.pipelines.len(),
                before
            );
        }
        Ok(snapshot)
    }
}

fn init_logger(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli);

    match cli.cmd {
        Commands::Report { input, out, pretty } => {
            let snapshot = input.load()?;
            let output = PipelineModel::from_definitions(&snapshot.pipelines);
            info!(
                "built {} pipeline(s), {} rejected",
                output.snapshots.len(),
                output.errors.len()
            );

            let report = Report::new(snapshot.version, output);
            match out {
                Some(path) => {
                    report.write(&path, pretty)?;
                    info!("wrote {}", path);
                }
                None => println!("{}", report.to_json(pretty)?),
            }
        }
        Commands::Check { input } => {
            let snapshot = input.load()?;
            let output = PipelineModel::from_definitions(&snapshot.pipelines);

            for s in &output.snapshots {
                println!("ok    {} ({} services)", s.name, s.root_node.node_count());
            }
            for e in &output.errors {
                println!("error {}", e);
            }
            if !output.is_complete() {
                anyhow::bail!("{} pipeline(s) misconfigured", output.errors.len());
            }
        }
    }

    Ok(())
}
