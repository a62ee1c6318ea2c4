use clap::Parser;
use tracing_subscriber::EnvFilter;

use setup_hcp::config::Inputs;

#[derive(Parser)]
#[command(name = "setup-hcp")]
#[command(version, about = "Installs the HCP CLI on a CI build agent")]
struct Cli {
    /// Version to install: exact version, range constraint, "latest", or
    /// empty to accept any cached version
    #[arg(long, env = "INPUT_VERSION", default_value = "")]
    version: String,

    /// HCP project id to configure on the installed CLI profile
    #[arg(long, env = "INPUT_PROJECT_ID", default_value = "")]
    project_id: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let inputs = Inputs {
        version: cli.version,
        project_id: cli.project_id,
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(setup_hcp::setup::run(inputs))
}
