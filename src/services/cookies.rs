use crate::selection::Selection;
use crate::services::storage::{jar_slot_path, unix_now};
use crate::services::sync::GallerySource;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use sha2::{Digest, Sha256};

pub const COOKIE_NAME: &str = "picks";

/// Bytes that would collide with the jar line's own delimiters.
const COOKIE_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b';')
    .add(b'=')
    .add(b',')
    .add(b'%')
    .add(b'"');

/// Attributes governing where the persisted selection is visible and for
/// how long.
#[derive(Debug, Clone)]
pub struct CookieScope {
    pub domain: String,
    pub path: String,
    pub max_age_secs: u64,
    pub secure: bool,
}

impl CookieScope {
    pub fn for_source(source: &GallerySource, max_age_secs: u64) -> Self {
        let domain = match source {
            GallerySource::Remote(_) => wildcard_domain(&source.host()),
            GallerySource::Local(path) => {
                // Fixture galleries get a synthetic per-directory domain so
                // two fixtures never share a slot.
                let mut hasher = Sha256::new();
                hasher.update(path.to_string_lossy().as_bytes());
                let id = hex::encode(hasher.finalize());
                format!(".{}.local", &id[..12])
            }
        };
        Self {
            domain,
            path: "/".to_string(),
            max_age_secs,
            secure: source.is_secure(),
        }
    }
}

/// Leading-dot wildcard of the host's parent domain, so picks made on
/// `gallery.example.com` are visible to sibling subdomains.
pub fn wildcard_domain(host: &str) -> String {
    let host = host.split(':').next().unwrap_or(host);
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let scoped = if labels.len() > 2 {
        labels[1..].join(".")
    } else {
        labels.join(".")
    };
    format!(".{}", scoped)
}

/// Serializes the selection into the jar slot as a Set-Cookie-style line.
/// Name and value are percent-escaped to survive the `;` and `=` delimiters.
pub fn save(selection: &Selection, scope: &CookieScope) -> anyhow::Result<()> {
    let value = serde_json::to_string(selection)?;
    let mut line = format!(
        "{}={}; Expires={}; Path={}; Domain={}",
        utf8_percent_encode(COOKIE_NAME, COOKIE_ESCAPE),
        utf8_percent_encode(&value, COOKIE_ESCAPE),
        unix_now() + scope.max_age_secs,
        scope.path,
        scope.domain,
    );
    if scope.secure {
        line.push_str("; Secure");
    }
    let slot = jar_slot_path(&scope.domain)?;
    if let Some(parent) = slot.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(slot, line)?;
    Ok(())
}

/// Reads the slot back. Returns `None` when the slot is absent, expired or
/// malformed in any way; a bad slot must never take down page load.
pub fn load(scope: &CookieScope) -> Option<Selection> {
    let slot = jar_slot_path(&scope.domain).ok()?;
    let line = std::fs::read_to_string(slot).ok()?;
    parse_cookie_line(&line)
}

pub fn clear(scope: &CookieScope) -> anyhow::Result<bool> {
    let slot = jar_slot_path(&scope.domain)?;
    if slot.exists() {
        std::fs::remove_file(slot)?;
        return Ok(true);
    }
    Ok(false)
}

fn parse_cookie_line(line: &str) -> Option<Selection> {
    let mut parts = line.split("; ");
    let pair = parts.next()?;
    let (raw_name, raw_value) = pair.split_once('=')?;

    let name = percent_decode_str(raw_name).decode_utf8().ok()?;
    if name != COOKIE_NAME {
        return None;
    }

    for attr in parts {
        if let Some(expires) = attr.strip_prefix("Expires=") {
            let expires: u64 = expires.parse().ok()?;
            if expires <= unix_now() {
                return None;
            }
        }
    }

    let value = percent_decode_str(raw_value).decode_utf8().ok()?;
    let selection: Selection = serde_json::from_str(&value).ok()?;
    if !selection.is_consistent() {
        return None;
    }
    Some(selection)
}
