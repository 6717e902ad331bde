use anyhow::Context;
use clap::Parser;
use small_utils::utils::{logger, validation::Validate};
use small_utils::{
    deep_clone_with, format_date, format_date_millis, log_message, parse_instant, CliConfig,
    Command, FixedClock, MessageLogger, PlainValue, StdoutSink, UtilsConfig, UtilsError,
};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 先載入配置，日誌等級取決於配置
    let loaded = load_config(&cli).await;
    let (level, json) = match &loaded {
        Ok(config) => (config.logging.level.clone(), config.logging.json),
        Err(_) => ("info".to_string(), false),
    };
    if json {
        logger::init_json_logger(cli.verbose, &level);
    } else {
        logger::init_cli_logger(cli.verbose, &level);
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli, config).await {
        exit_with(e);
    }
}

async fn load_config(cli: &CliConfig) -> anyhow::Result<UtilsConfig> {
    cli.validate()?;

    let config = match &cli.config {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(UtilsError::from)
                .with_context(|| format!("reading config file {}", path.display()))?;
            UtilsConfig::from_toml_str(&content)?
        }
        None => UtilsConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

async fn run(cli: CliConfig, config: UtilsConfig) -> anyhow::Result<()> {
    let message = cli.command.message().unwrap_or_default();
    match cli.command {
        Command::Date { at, millis } => {
            let date = match (at, millis) {
                (Some(text), _) => format_date(&parse_instant(&text)?)?,
                (None, Some(millis)) => format_date_millis(millis)?,
                (None, None) => format_date(&chrono::Utc::now())?,
            };
            println!("{}", date);
        }
        Command::Log { at, .. } => {
            match at {
                Some(text) => MessageLogger::new(FixedClock::from_rfc3339(&text)?, StdoutSink)
                    .log(&message)?,
                None => log_message(&message)?,
            }
        }
        Command::Clone {
            input,
            policy,
            max_depth,
            pretty,
        } => {
            let options = config.clone_options_with(policy, max_depth)?;
            let text = match &input {
                Some(path) => tokio::fs::read_to_string(path)
                    .await
                    .map_err(UtilsError::from)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buf)
                        .await
                        .map_err(UtilsError::from)
                        .context("reading stdin")?;
                    buf
                }
            };

            let parsed: serde_json::Value =
                serde_json::from_str(&text).map_err(UtilsError::from)?;
            let copy = deep_clone_with(&PlainValue::from_json(&parsed), &options)?;
            let json = copy.to_json(&options)?;
            let output = if pretty {
                serde_json::to_string_pretty(&json)
            } else {
                serde_json::to_string(&json)
            }
            .map_err(UtilsError::from)?;

            tracing::info!("📋 Cloned {} bytes of JSON", text.len());
            println!("{}", output);
        }
    }
    Ok(())
}

fn exit_with(e: anyhow::Error) -> ! {
    let code = e
        .downcast_ref::<UtilsError>()
        .map(|err| err.category().exit_code())
        .unwrap_or(1);

    tracing::error!("❌ {:#}", e);
    eprintln!("❌ {:#}", e);
    std::process::exit(code);
}
