use crate::selection::Selection;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
}

/// On-disk page context: which gallery is open, where in it we are, and
/// what the last save attempt reported. The selection itself is not here;
/// the cookie jar is its only durable slot.
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    pub source: String,
    pub shoot: String,
    pub page: u32,
    pub phase: Phase,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub save_status: Option<String>,
    #[serde(default)]
    pub authenticated: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct PrefsFile {
    #[serde(default)]
    pub general: PrefsGeneral,
}

#[derive(Debug, Deserialize)]
pub struct PrefsGeneral {
    #[serde(default)]
    pub gallery: Option<String>,
    #[serde(default = "default_pull_timeout_ms")]
    pub pull_timeout_ms: u64,
    #[serde(default = "default_push_timeout_ms")]
    pub push_timeout_ms: u64,
    #[serde(default = "default_cookie_max_age_secs")]
    pub cookie_max_age_secs: u64,
}

fn default_pull_timeout_ms() -> u64 {
    2500
}

fn default_push_timeout_ms() -> u64 {
    3000
}

fn default_cookie_max_age_secs() -> u64 {
    // 7 days, same window the picks cookie carried.
    604_800
}

impl Default for PrefsGeneral {
    fn default() -> Self {
        Self {
            gallery: None,
            pull_timeout_ms: default_pull_timeout_ms(),
            push_timeout_ms: default_push_timeout_ms(),
            cookie_max_age_secs: default_cookie_max_age_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreOutcome {
    Restored,
    Skipped,
}

impl RestoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreOutcome::Restored => "restored",
            RestoreOutcome::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemRestore {
    pub id: String,
    pub outcome: RestoreOutcome,
}

#[derive(Serialize)]
pub struct ItemRow {
    pub id: String,
    pub picked: bool,
}

#[derive(Serialize)]
pub struct PageReport {
    pub shoot: String,
    pub page: u32,
    pub counter: String,
    pub items: Vec<ItemRow>,
    pub restore: Vec<ItemRestore>,
    pub alerted: bool,
}

#[derive(Serialize)]
pub struct StatusReport {
    pub shoot: String,
    pub page: u32,
    pub phase: Phase,
    pub counter: String,
    pub selection: Selection,
    pub save_status: Option<String>,
    pub authenticated: bool,
}

#[derive(Serialize)]
pub struct ToggleReport {
    pub id: String,
    pub picked: bool,
    pub counter: String,
}

#[derive(Serialize)]
pub struct SaveReport {
    pub status: u16,
    pub saved: bool,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct NavReport {
    pub pushed: SaveReport,
    pub from_page: u32,
    pub to_page: u32,
    pub navigated: bool,
    pub counter: String,
}

#[derive(Serialize)]
pub struct AccountReport {
    pub action: String,
    pub status: u16,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct JarReport {
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub selection: Option<Selection>,
}
