use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::{Parser, ValueEnum};
use client_core::{load_settings, ClientSettings, Locale};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::CalculatorApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop calculator backed by a remote compute service")]
struct Args {
    /// Overrides `server_url` from settings.
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file; defaults to `calc.toml` in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    locale: Option<LocaleArg>,
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

fn resolve_settings(args: Args) -> ClientSettings {
    let mut settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("falling back to default settings: {err:#}");
            ClientSettings::default()
        }
    };
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(locale) = args.locale {
        settings.locale = locale.into();
    }
    settings
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = resolve_settings(Args::parse());
    let messages = settings.locale.messages();
    tracing::info!(server_url = %settings.server_url, "starting calculator");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(messages.title)
            .with_inner_size([360.0, 520.0])
            .with_min_inner_size([340.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        messages.title,
        options,
        Box::new(move |_cc| Ok(Box::new(CalculatorApp::new(cmd_tx, ui_rx, messages)))),
    )
}
