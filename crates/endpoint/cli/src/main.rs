use clap::Parser as _;
use slot_store_cli::{abi_json, encode_call, App, Cli, Commands, Config};
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

fn main() -> anyhow::Result<()> {
    let Cli {
        config,
        backend,
        cmd,
    } = Cli::parse();

    let (path, mut config) = match config {
        Some(p) => Config::from_path(p)?,
        None => Config::create_or_read_default()?,
    };

    if let Some(backend) = backend {
        config.backend = backend;
    }

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    tracing::debug!("config loaded from `{}`", path.display());

    let response = match cmd {
        Commands::Abi => abi_json()?,

        Commands::Encode { contract, val } => encode_call(&contract, val)?,

        Commands::Call { contract, val } => App::open(&config)?.call(&contract, val)?,

        Commands::CallRaw { data } => App::open(&config)?.call_raw(&data)?,
    };

    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
