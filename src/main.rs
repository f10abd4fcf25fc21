use clap::Parser;

mod cli;
mod commands;
mod domain;
mod selection;
mod services;

use cli::{Cli, Commands};
use commands::{handle_account_commands, handle_gallery_commands};
use services::session::SessionError;
use services::storage::load_prefs;
use services::sync::ClientError;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        if cli.json {
            let envelope = serde_json::json!({
                "ok": false,
                "error": { "code": error_code(&e), "message": format!("{:#}", e) }
            });
            println!("{}", serde_json::to_string_pretty(&envelope).unwrap_or_default());
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let prefs = load_prefs()?;
    match &cli.command {
        Commands::Account { .. } => handle_account_commands(cli, &prefs.general),
        _ => handle_gallery_commands(cli, &prefs.general),
    }
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if let Some(se) = e.downcast_ref::<SessionError>() {
        return se.code();
    }
    if let Some(ce) = e.downcast_ref::<ClientError>() {
        return match ce {
            ClientError::RemoteOnly => "REMOTE_ONLY",
            ClientError::GalleryUnreachable(_) => "GALLERY_UNREACHABLE",
        };
    }
    "ERROR"
}
