//! Binary that generates a Loupekine snark, computes a minimum weight double roman domination
//! labeling of it and writes the labeling to standart out.

use std::error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use loupekine_drdp::{
    cust_error::ProcessingError,
    drdp_instance::DrdpInstance,
    milp::GoodLpBackend,
    snark::{LinkPolicy, Snark, SnarkConfig},
};

/// Minimum weight double roman domination of Loupekine snarks.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Number of blocks `k`.
    #[arg(short = 'k', long, default_value_t = 9)]
    blocks: usize,
    /// Number of linking vertices `z`, at most `k / 3`.
    #[arg(short = 'z', long, default_value_t = 3)]
    linking: usize,
    /// Ring edges between blocks: `random`, `direct` or `crossed`.
    #[arg(short, long, default_value_t = LinkPolicy::Random)]
    policy: LinkPolicy,
    /// Seed for the random link policy.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Also write the generated graph in `.gr` format to this file.
    #[arg(long)]
    export_gr: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> SnarkConfig {
        SnarkConfig {
            blocks: self.blocks,
            linking: self.linking,
            policy: self.policy,
            seed: self.seed,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn error::Error>> {
    let snark = Snark::generate_from_config(&cli.config())?;
    let graph = snark.to_graph()?;
    if let Some(path) = &cli.export_gr {
        graph.export_gr(path)?;
        info!(path = %path.display(), "wrote graph");
    }

    let mut instance = DrdpInstance::build(graph, GoodLpBackend::new());
    let solution = instance.solve()?;
    solution.validate(&instance.graph)?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    solution.write_solution(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}

pub fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(ProcessingError::NotOptimal(_)) = err.downcast_ref::<ProcessingError>() {
                println!("The solver could not find an optimal solution");
            }
            error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}
