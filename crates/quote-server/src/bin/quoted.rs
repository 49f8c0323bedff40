use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use quote_server::{app, LogFormat, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

fn cli() -> Command {
    let config_args = [
        Arg::new("config")
            .long("config")
            .short('c')
            .value_parser(value_parser!(PathBuf))
            .help("Path to a TOML config file"),
        Arg::new("bind")
            .long("bind")
            .value_parser(value_parser!(SocketAddr))
            .help("Listen address, e.g. 127.0.0.1:8080"),
        Arg::new("log-format")
            .long("log-format")
            .value_parser(value_parser!(LogFormat))
            .help("Log output: pretty or json"),
        Arg::new("vat-rate")
            .long("vat-rate")
            .value_parser(value_parser!(f64))
            .help("VAT rate applied to quote subtotals"),
    ];

    Command::new("quoted")
        .version(quote_server::VERSION)
        .about("Price quote builder service")
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP server")
                .args(config_args.clone()),
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration")
                .args(config_args),
        )
}

/// File values first, then flag overrides
fn load_config(args: &ArgMatches) -> anyhow::Result<ServerConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.get_one::<SocketAddr>("bind") {
        config = config.with_bind(*bind);
    }
    if let Some(format) = args.get_one::<LogFormat>("log-format") {
        config = config.with_log_format(*format);
    }
    if let Some(rate) = args.get_one::<f64>("vat-rate") {
        config = config.with_vat_rate(*rate);
    }
    Ok(config)
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("config", args)) => {
            let config = load_config(args)?;
            print!("{}", config.to_toml_string()?);
        }
        Some(("serve", args)) => serve(load_config(args)?).await?,
        _ => serve(ServerConfig::default()).await?,
    }
    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(config.log_format);
    tracing::info!(
        "Starting quoted {} on {} (VAT {})",
        quote_server::VERSION,
        config.bind,
        config.quote.vat_rate
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    axum::serve(listener, app(&config)).await?;

    Ok(())
}
