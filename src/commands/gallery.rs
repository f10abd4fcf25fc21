use crate::cli::{Cli, Commands, JarCommands};
use crate::domain::models::{
    JarReport, NavReport, Phase, PrefsGeneral, SaveReport, Session, StatusReport, ToggleReport,
};
use crate::services::cookies::{self, CookieScope};
use crate::services::output::{alert, print_one, print_out};
use crate::services::session::{
    counter_text, item_rows, load_page, parse_page_url, restore_onto, working_store, SessionError,
};
use crate::services::storage::{audit, jar_slot_path, load_session, save_session};
use crate::services::sync::{GallerySource, PullVariant, SyncClient};

pub fn handle_gallery_commands(cli: &Cli, prefs: &PrefsGeneral) -> anyhow::Result<()> {
    let client = SyncClient::from_prefs(prefs);

    if let Commands::Open { url } = &cli.command {
        return open_page(cli, prefs, &client, url);
    }

    let mut session = load_session()?.ok_or(SessionError::NoSession)?;
    let source = match &cli.gallery {
        Some(g) => GallerySource::parse(g),
        None => GallerySource::parse(&session.source),
    };
    let scope = CookieScope::for_source(&source, prefs.cookie_max_age_secs);

    match &cli.command {
        Commands::Status => {
            let store = working_store(&scope);
            let report = StatusReport {
                shoot: session.shoot.clone(),
                page: session.page,
                phase: session.phase,
                counter: counter_text(store.count()),
                selection: store.snapshot(),
                save_status: session.save_status.clone(),
                authenticated: session.authenticated,
            };
            print_one(cli.json, report, |r| {
                format!(
                    "shoot {} page {}\n{}{}",
                    r.shoot,
                    r.page,
                    r.counter,
                    r.save_status
                        .as_deref()
                        .map(|s| format!("\n{}", s))
                        .unwrap_or_default()
                )
            })?;
        }
        Commands::Items => {
            let store = working_store(&scope);
            let rows = item_rows(&session.items, &store);
            print_out(cli.json, &rows, |r| {
                format!("{}\t{}", r.id, if r.picked { "picked" } else { "-" })
            })?;
        }
        Commands::Toggle { id } => {
            require_ready(&session)?;
            if !session.items.iter().any(|i| i == id) {
                return Err(SessionError::ItemNotOnPage(id.clone()).into());
            }
            let mut store = working_store(&scope);
            let picked = store.toggle(id);
            cookies::save(&store.snapshot(), &scope)?;
            // any previous "Saved" text is stale now
            session.save_status = None;
            save_session(&session)?;
            audit(
                "toggle",
                serde_json::json!({"id": id, "picked": picked, "count": store.count()}),
            );
            let report = ToggleReport {
                id: id.clone(),
                picked,
                counter: counter_text(store.count()),
            };
            print_one(cli.json, report, |r| {
                format!(
                    "{} {}\n{}",
                    r.id,
                    if r.picked { "picked" } else { "unpicked" },
                    r.counter
                )
            })?;
        }
        Commands::Restore => {
            let store = working_store(&scope);
            let outcomes = restore_onto(&session.items, &store);
            print_out(cli.json, &outcomes, |r| {
                format!("{}\t{}", r.id, r.outcome.as_str())
            })?;
        }
        Commands::Pull => {
            let report = load_page(
                &client,
                &source,
                &scope,
                &mut session,
                PullVariant::GetPicks,
            )?;
            save_session(&session)?;
            audit("pull", serde_json::json!({"shoot": session.shoot, "page": session.page}));
            print_one(cli.json, report, |r| {
                format!("page {} refreshed\n{}", r.page, r.counter)
            })?;
        }
        Commands::Save => {
            require_ready(&session)?;
            let store = working_store(&scope);
            let report = push_current(&client, &source, &session, &store.snapshot());
            session.save_status = if report.saved {
                Some("Saved".to_string())
            } else {
                None
            };
            save_session(&session)?;
            print_one(cli.json, report, |r| {
                if r.saved {
                    "Saved".to_string()
                } else {
                    format!("save failed (status {})", r.status)
                }
            })?;
        }
        Commands::Next | Commands::Prev => {
            require_ready(&session)?;
            let forward = matches!(cli.command, Commands::Next);
            let report = navigate(prefs, &client, &source, &mut session, forward)?;
            print_one(cli.json, report, |r| {
                if r.navigated {
                    format!("page {}\n{}", r.to_page, r.counter)
                } else {
                    format!("already at page {}\n{}", r.from_page, r.counter)
                }
            })?;
        }
        Commands::Jar { command } => match command {
            JarCommands::Show => {
                let report = JarReport {
                    domain: scope.domain.clone(),
                    path: jar_slot_path(&scope.domain)?.to_string_lossy().to_string(),
                    secure: scope.secure,
                    selection: cookies::load(&scope),
                };
                print_one(cli.json, report, |r| match &r.selection {
                    Some(s) => format!("{}\t{} picks", r.domain, s.count),
                    None => format!("{}\tempty", r.domain),
                })?;
            }
            JarCommands::Clear => {
                let removed = cookies::clear(&scope)?;
                audit("jar_clear", serde_json::json!({"domain": scope.domain}));
                print_one(cli.json, removed, |r| {
                    if *r { "cleared".to_string() } else { "nothing to clear".to_string() }
                })?;
            }
        },
        Commands::Open { .. } | Commands::Account { .. } => {
            unreachable!("handled before session loading")
        }
    }

    Ok(())
}

fn open_page(
    cli: &Cli,
    prefs: &PrefsGeneral,
    client: &SyncClient,
    url: &str,
) -> anyhow::Result<()> {
    let parsed = parse_page_url(url)?;
    let source = match &cli.gallery {
        Some(g) => GallerySource::parse(g),
        None => GallerySource::parse(&parsed.base),
    };
    let scope = CookieScope::for_source(&source, prefs.cookie_max_age_secs);

    let authenticated = load_session()?
        .filter(|s| s.source == source.as_str())
        .map(|s| s.authenticated)
        .unwrap_or(false);

    let mut session = Session {
        source: source.as_str(),
        shoot: parsed.shoot,
        page: parsed.page,
        phase: Phase::Loading,
        items: Vec::new(),
        save_status: None,
        authenticated,
    };
    save_session(&session)?;

    let report = load_page(
        client,
        &source,
        &scope,
        &mut session,
        PullVariant::UpdatePicksCookie,
    )?;
    save_session(&session)?;
    audit(
        "open",
        serde_json::json!({"shoot": session.shoot, "page": session.page, "items": session.items.len()}),
    );
    print_one(cli.json, report, |r| {
        format!(
            "shoot {} page {} ready ({} items)\n{}",
            r.shoot,
            r.page,
            r.items.len(),
            r.counter
        )
    })?;
    Ok(())
}

/// Push-then-navigate. The push always completes first; a failed push is
/// alerted but does not block the move. Previous floors at page 0.
fn navigate(
    prefs: &PrefsGeneral,
    client: &SyncClient,
    source: &GallerySource,
    session: &mut Session,
    forward: bool,
) -> anyhow::Result<NavReport> {
    let scope = CookieScope::for_source(source, prefs.cookie_max_age_secs);
    let store = working_store(&scope);
    let pushed = push_current(client, source, session, &store.snapshot());

    let from_page = session.page;
    let (to_page, navigated) = if forward {
        (from_page + 1, true)
    } else if from_page == 0 {
        (0, false)
    } else {
        (from_page - 1, true)
    };

    if !navigated {
        session.save_status = if pushed.saved {
            Some("Saved".to_string())
        } else {
            None
        };
        save_session(session)?;
        return Ok(NavReport {
            pushed,
            from_page,
            to_page,
            navigated,
            counter: counter_text(store.count()),
        });
    }

    session.page = to_page;
    session.save_status = None;
    let report = load_page(client, source, &scope, session, PullVariant::UpdatePicksCookie)?;
    save_session(session)?;
    audit(
        "navigate",
        serde_json::json!({"from": from_page, "to": to_page}),
    );
    Ok(NavReport {
        pushed,
        from_page,
        to_page,
        navigated,
        counter: report.counter,
    })
}

fn push_current(
    client: &SyncClient,
    source: &GallerySource,
    session: &Session,
    snapshot: &crate::selection::Selection,
) -> SaveReport {
    let outcome = client.push(source, &session.shoot, session.page, snapshot);
    let saved = outcome.is_success();
    audit(
        "push",
        serde_json::json!({
            "shoot": session.shoot,
            "page": session.page,
            "status": outcome.status,
            "saved": saved,
        }),
    );
    if !saved {
        alert(&format!(
            "could not save picks (status {}){}",
            outcome.status,
            outcome
                .error
                .as_deref()
                .map(|e| format!(": {}", e))
                .unwrap_or_default()
        ));
    }
    SaveReport {
        status: outcome.status,
        saved,
        message: outcome.error,
    }
}

fn require_ready(session: &Session) -> Result<(), SessionError> {
    if session.phase != Phase::Ready {
        return Err(SessionError::PageLoading);
    }
    Ok(())
}
