use crate::cli::{AccountCommands, Cli, Commands};
use crate::domain::models::{AccountReport, PrefsGeneral};
use crate::services::output::print_one;
use crate::services::session::SessionError;
use crate::services::storage::{audit, load_session, save_session};
use crate::services::sync::{GallerySource, NewUser, SyncClient};

pub fn handle_account_commands(cli: &Cli, prefs: &PrefsGeneral) -> anyhow::Result<()> {
    let Commands::Account { command } = &cli.command else {
        unreachable!("account dispatch");
    };
    let client = SyncClient::from_prefs(prefs);
    let source = resolve_source(cli, prefs)?;

    match command {
        AccountCommands::Login { username, password } => {
            let outcome = client.sign_in(&source, username, password)?;
            audit(
                "login",
                serde_json::json!({"username": username, "status": outcome.status, "success": outcome.success}),
            );
            if outcome.success {
                // the browser redirected to /home here; we mark the session
                if let Some(mut session) = load_session()? {
                    if session.source == source.as_str() {
                        session.authenticated = true;
                        save_session(&session)?;
                    }
                }
            }
            let report = AccountReport {
                action: "login".to_string(),
                status: outcome.status,
                success: outcome.success,
                message: outcome.message,
            };
            print_one(cli.json, report, |r| r.message.clone())?;
        }
        AccountCommands::Signup {
            username,
            password,
            email,
            first,
            last,
            address,
            city,
            state,
            zip,
            phone,
        } => {
            let user = NewUser {
                username: username.clone(),
                password: password.clone(),
                email: email.clone(),
                first: first.clone(),
                last: last.clone(),
                address: address.clone(),
                city: city.clone(),
                state: state.clone(),
                zip: zip.clone(),
                phone: phone.clone(),
            };
            let outcome = client.create_user(&source, &user)?;
            audit(
                "signup",
                serde_json::json!({"username": username, "status": outcome.status, "success": outcome.success}),
            );
            let report = AccountReport {
                action: "signup".to_string(),
                status: outcome.status,
                success: outcome.success,
                message: outcome.message,
            };
            print_one(cli.json, report, |r| r.message.clone())?;
        }
    }

    Ok(())
}

/// Account endpoints hang off the gallery base: explicit --gallery wins,
/// then the open session's source, then the configured default.
fn resolve_source(cli: &Cli, prefs: &PrefsGeneral) -> anyhow::Result<GallerySource> {
    if let Some(g) = &cli.gallery {
        return Ok(GallerySource::parse(g));
    }
    if let Some(session) = load_session()? {
        return Ok(GallerySource::parse(&session.source));
    }
    if let Some(g) = &prefs.gallery {
        return Ok(GallerySource::parse(g));
    }
    Err(SessionError::NoSession.into())
}
