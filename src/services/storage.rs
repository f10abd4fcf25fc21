use crate::domain::models::{PrefsFile, Session};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

pub fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Append-only JSONL event log. Best effort: logging must never fail a
/// command.
pub fn audit(action: &str, data: serde_json::Value) {
    let home = match std::env::var("HOME") {
        Ok(h) => h,
        Err(_) => return,
    };
    let path = PathBuf::from(home).join(".config/picks/audit.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/picks"))
}

fn session_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("session.json"))
}

/// Jar slot for a cookie scope domain. One file per domain so that
/// subdomain-shared scopes land in the same slot.
pub fn jar_slot_path(domain: &str) -> anyhow::Result<PathBuf> {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    let id = hex::encode(hasher.finalize());
    Ok(config_dir()?.join("jar").join(format!("{}.cookie", id)))
}

pub fn load_session() -> anyhow::Result<Option<Session>> {
    let p = session_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn save_session(s: &Session) -> anyhow::Result<()> {
    let p = session_path()?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(s)?)?;
    Ok(())
}

pub fn load_prefs() -> anyhow::Result<PrefsFile> {
    let path = config_dir()?.join("config.toml");
    if !path.exists() {
        return Ok(PrefsFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}
