//! Console driver for the weather flow.
//!
//! Stands in for the voice pipeline: each stdin line is one turn. A line of
//! the form `/<action> <json-args>` is a structured call, anything else is
//! user text.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use weatherflow::{ActionCall, Config, EngineBuilder, FlowError, FlowInput, Vars};

#[derive(Parser, Debug)]
#[command(name = "weather-bot", about = "Talk to the weather flow from a terminal")]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flow definition (JSON), overrides the config file
    #[arg(short, long)]
    flow: Option<PathBuf>,

    /// Print the flow graph and exit
    #[arg(long)]
    schema: bool,
}

fn parse_line(line: &str) -> Result<FlowInput, FlowError> {
    let Some(call) = line.strip_prefix('/') else {
        return Ok(FlowInput::text(line));
    };

    let (name, args) = call.split_once(char::is_whitespace).unwrap_or((call, ""));
    let arguments = match args.trim() {
        "" => Vars::new(),
        json => serde_json::from_str::<Vars>(json)?,
    };
    Ok(ActionCall::new(name, arguments).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "weatherflow=info,weather_bot=info".into())).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::create(path)?,
        None => Config::default(),
    }
    .with_env();
    if cli.flow.is_some() {
        config.flow = cli.flow.clone();
    }

    let builder = EngineBuilder::from_config(&config)?;
    if cli.schema {
        println!("{}", builder.build_graph()?.schema());
        return Ok(());
    }
    if config.weather.api_key.is_empty() {
        tracing::warn!("no weather api key configured, set OPENWEATHER_API_KEY");
    }

    let mut engine = builder.build()?;
    for message in engine.messages() {
        println!("[{}] {}", message.role.as_ref(), message.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let input = match parse_line(line) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("invalid call arguments: {}", e);
                continue;
            }
        };

        match engine.process(input).await {
            Ok(out) => {
                println!("{}", serde_json::to_string_pretty(&out)?);
                if engine.is_terminated() {
                    break;
                }
            }
            Err(e @ (FlowError::Validation { .. } | FlowError::UnknownAction { .. })) => eprintln!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
