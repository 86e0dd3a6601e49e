use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    evaluate, load_settings, CalcApi, CalcClient, ClientError, EvalFailure, KeyPress, Keypad,
    Locale,
};
use shared::domain::Operator;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "calc", about = "Calculator backed by a remote compute service")]
struct Args {
    /// Overrides `server_url` from settings.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Settings file; defaults to `calc.toml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_enum)]
    locale: Option<LocaleArg>,
    /// Print raw JSON responses.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how many evaluations the service performed today.
    Stats,
    /// Evaluate `a op b` once.
    #[command(allow_negative_numbers = true)]
    Calc { a: f64, op: Operator, b: f64 },
    /// Evaluate a free-form expression on the legacy endpoint.
    Compute { expression: String },
    /// Type a key sequence into the keypad, e.g. `12+3=`.
    /// `C` clears, `<` deletes the last character.
    Keys { sequence: String },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LocaleArg {
    En,
    Ru,
}

impl From<LocaleArg> for Locale {
    fn from(value: LocaleArg) -> Self {
        match value {
            LocaleArg::En => Locale::En,
            LocaleArg::Ru => Locale::Ru,
        }
    }
}

fn parse_key(c: char) -> Option<KeyPress> {
    match c {
        '<' => Some(KeyPress::Delete),
        'C' | 'c' => Some(KeyPress::Clear),
        other => KeyPress::from_char(other),
    }
}

/// Feeds `sequence` into `keypad`, sending each requested evaluation to
/// `api` before the next key is applied.
async fn run_keys<A: CalcApi + ?Sized>(api: &A, keypad: &mut Keypad, sequence: &str) -> Result<()> {
    for c in sequence.chars().filter(|c| !c.is_whitespace()) {
        let key = parse_key(c).ok_or_else(|| anyhow!("unsupported key '{c}'"))?;
        if let Some(request) = keypad.press(key) {
            let outcome = evaluate(api, request).await;
            keypad.finish_evaluation(outcome);
        }
    }
    Ok(())
}

/// Puts the message a calculator user would see on top of the wire error.
fn user_error(locale: Locale, err: ClientError) -> anyhow::Error {
    let message = locale.messages().describe(&EvalFailure::from(&err));
    anyhow::Error::new(err).context(message)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("loading settings")?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(locale) = args.locale {
        settings.locale = locale.into();
    }
    let locale = settings.locale;
    let client = CalcClient::from_settings(&settings)?;
    tracing::debug!(base_url = %client.base_url(), "compute client ready");

    match args.command {
        Command::Stats => {
            let stats = client
                .fetch_stats()
                .await
                .map_err(|err| user_error(locale, err))?;
            if args.json {
                println!("{}", serde_json::to_string(&stats)?);
            } else {
                match stats.date {
                    Some(date) => println!(
                        "{}: {} ({date})",
                        locale.messages().today_count,
                        stats.today_count
                    ),
                    None => println!("{}: {}", locale.messages().today_count, stats.today_count),
                }
            }
        }
        Command::Calc { a, op, b } => {
            if !a.is_finite() || !b.is_finite() {
                bail!(locale.messages().invalid_number);
            }
            let result = client
                .calculate(a, b, op)
                .await
                .map_err(|err| user_error(locale, err))?;
            println!("{}", client_core::keypad::format_number(result));
        }
        Command::Compute { expression } => {
            let response = client
                .compute_expression(&expression)
                .await
                .map_err(|err| user_error(locale, err))?;
            if args.json {
                println!("{}", serde_json::to_string(&response)?);
            } else {
                println!("{}", client_core::keypad::format_number(response.result));
            }
        }
        Command::Keys { sequence } => {
            let mut keypad = Keypad::new(locale.messages());
            run_keys(&client, &mut keypad, &sequence).await?;
            if let Some(message) = keypad.error_message() {
                bail!(message);
            }
            println!("{}", keypad.display());
        }
    }

    Ok(())
}
