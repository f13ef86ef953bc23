use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod catalog;
mod checkout;
mod clipboard;
mod commands;
mod config_store;
mod deriver;
mod error;
mod models;
mod preview;
mod provider;
mod session;
mod settings;
mod studio;
mod toast;
mod traits;
mod view;

use checkout::{PurchaseGate, PurchaseOutcome};
use clipboard::SystemClipboard;
use commands::Command;
use models::COLOR_PALETTE;
use provider::HttpArtifactProvider;
use session::EnvSessionProvider;
use settings::Settings;
use studio::BadgeStudio;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let settings = Settings::from_env();
    info!("Starting badge studio against {}", settings.endpoints.base);

    let provider = Arc::new(HttpArtifactProvider::new(settings.fetch_timeout)?);
    let mut studio = BadgeStudio::new(&settings, provider, Arc::new(SystemClipboard));

    let sessions = Arc::new(EnvSessionProvider::new(
        settings.session_user.clone(),
        settings.endpoints.clone(),
    ));
    let gate = PurchaseGate::new(catalog::style_catalog(&settings.endpoints), sessions);

    // Preview results and toasts arrive on their own schedule, so both are
    // printed from subscriptions as they change
    let mut preview_rx = studio.subscribe_preview();
    let preview_printer = tokio::spawn(async move {
        while preview_rx.changed().await.is_ok() {
            let text = view::render_preview(&preview_rx.borrow_and_update());
            println!("{text}");
        }
    });

    let mut toast_rx = studio.notifications().subscribe();
    let toast_printer = tokio::spawn(async move {
        while toast_rx.changed().await.is_ok() {
            let line = toast_rx.borrow_and_update().as_ref().map(view::render_toast);
            if let Some(line) = line {
                println!("{line}");
            }
        }
    });

    println!("{}", commands::HELP);
    println!("{}", view::EMPTY_RESULT);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        run(command, &mut studio, &gate).await?;
    }

    studio.shutdown();
    preview_printer.abort();
    toast_printer.abort();
    info!("Badge studio closed");
    Ok(())
}

async fn run(command: Command, studio: &mut BadgeStudio, gate: &PurchaseGate) -> Result<()> {
    let edits = command.edits_configuration();

    match command {
        Command::TrackedUrl(url) => {
            studio.set_tracked_url(url);
        }
        Command::Label(label) => {
            studio.set_label(label);
        }
        Command::Color(color) => set_color(studio, color),
        Command::PickPalette(index) => set_color(studio, COLOR_PALETTE[index].to_string()),
        Command::ListPalette => println!("{}", view::render_palette()),
        Command::Style(style) => {
            studio.set_style(style);
        }
        Command::FontSize(size) => {
            studio.set_font_size(size);
        }
        Command::Reset => {
            studio.edit(|store| store.reset());
        }
        Command::Show => {
            println!("{}", view::render_form(&studio.configuration()));
            println!("{}", view::render_result(studio.derived(), &studio.preview_state()));
            if let Some(toast) = studio.notifications().current() {
                println!("{}", view::render_toast(&toast));
            }
        }
        Command::Json => {
            let payload = serde_json::json!({
                "configuration": studio.configuration(),
                "request": studio.derived(),
                "notification": studio.notifications().current(),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Copy(kind) => {
            if studio.derived().is_none() {
                println!("{}", view::EMPTY_RESULT);
            } else {
                studio.copy(kind);
            }
        }
        Command::Store => println!("{}", view::render_store(gate.catalog())),
        Command::Buy(style_id) => match gate.request_purchase(&style_id) {
            PurchaseOutcome::SignInStarted { provider } => {
                println!("Sign in with {provider} to buy {style_id}");
            }
            PurchaseOutcome::Checkout { route } => println!("Continue to checkout: {route}"),
            PurchaseOutcome::NotForSale => println!("{style_id} is free, no purchase needed"),
            PurchaseOutcome::UnknownStyle => println!("No style called {style_id}"),
        },
        Command::Help => println!("{}", commands::HELP),
        Command::Quit => {}
    }

    if edits && let Some(request) = studio.derived() {
        // the preview printer reports loading and the outcome
        println!("{}", view::render_snippets(request));
        studio.settle().await;
    }

    Ok(())
}

fn set_color(studio: &mut BadgeStudio, color: String) {
    if !studio.set_color(color) && !studio.configuration().style.allows_custom_color() {
        warn!("color change ignored for style {}", studio.configuration().style);
        println!("Color is locked for the {} style", studio.configuration().style);
    }
}
