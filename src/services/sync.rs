use crate::domain::models::PrefsGeneral;
use crate::selection::Selection;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Where a gallery lives: a proofing server, or a fixture directory laid
/// out with the same `shoot/<name>/...` shape.
#[derive(Debug, Clone)]
pub enum GallerySource {
    Remote(String),
    Local(PathBuf),
}

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("account operations need a remote gallery, got a fixture dir")]
    RemoteOnly,
    #[error("could not reach gallery: {0}")]
    GalleryUnreachable(String),
}

impl GallerySource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            GallerySource::Remote(trimmed.to_string())
        } else {
            GallerySource::Local(PathBuf::from(trimmed))
        }
    }

    pub fn as_str(&self) -> String {
        match self {
            GallerySource::Remote(url) => url.clone(),
            GallerySource::Local(path) => path.to_string_lossy().to_string(),
        }
    }

    pub fn host(&self) -> String {
        match self {
            GallerySource::Remote(url) => {
                let rest = url
                    .strip_prefix("https://")
                    .or_else(|| url.strip_prefix("http://"))
                    .unwrap_or(url);
                rest.split('/').next().unwrap_or(rest).to_string()
            }
            GallerySource::Local(_) => "local".to_string(),
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, GallerySource::Remote(url) if url.starts_with("https://"))
    }

    fn shoot_dir(&self, shoot: &str) -> Option<PathBuf> {
        match self {
            GallerySource::Local(dir) => Some(dir.join("shoot").join(shoot)),
            GallerySource::Remote(_) => None,
        }
    }
}

/// Which server route a pull goes through. `UpdatePicksCookie` is the page
/// -load variant; `GetPicks` is the plain fetch.
#[derive(Debug, Clone, Copy)]
pub enum PullVariant {
    GetPicks,
    UpdatePicksCookie,
}

impl PullVariant {
    fn route(&self) -> &'static str {
        match self {
            PullVariant::GetPicks => "getPicks",
            PullVariant::UpdatePicksCookie => "updatePicksCookie",
        }
    }
}

pub struct PullOutcome {
    pub selection: Selection,
    /// User-visible notice for a recoverable transport failure. A body that
    /// fails to deserialize is treated as "no prior selection" and stays
    /// silent.
    pub alert: Option<String>,
}

pub struct PushOutcome {
    /// HTTP status, or 0 for the local transport.
    pub status: u16,
    pub error: Option<String>,
}

impl PushOutcome {
    /// 0 is deliberately a success: the original client treated the local
    /// transport's empty status as saved. Preserved, covered by tests.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status, 0 | 200 | 202)
    }
}

pub struct AccountOutcome {
    pub status: u16,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first: String,
    pub last: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

/// Request/response round trips to the gallery. Decoupled from the session;
/// callers decide what to do with outcomes.
pub struct SyncClient {
    pull_timeout: Duration,
    push_timeout: Duration,
}

impl SyncClient {
    pub fn from_prefs(prefs: &PrefsGeneral) -> Self {
        Self {
            pull_timeout: Duration::from_millis(prefs.pull_timeout_ms),
            push_timeout: Duration::from_millis(prefs.push_timeout_ms),
        }
    }

    fn http(&self, timeout: Duration) -> anyhow::Result<reqwest::blocking::Client> {
        Ok(reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?)
    }

    /// Fetches the server-authoritative picks. Never fatal: any failure
    /// resolves to an empty selection, with an alert only for transport
    /// -level problems.
    pub fn pull(&self, source: &GallerySource, shoot: &str, variant: PullVariant) -> PullOutcome {
        match source {
            GallerySource::Local(_) => {
                let dir = source.shoot_dir(shoot).expect("local source");
                let path = dir.join("picks.json");
                if !path.exists() {
                    // fresh shoot, nothing picked yet
                    return PullOutcome {
                        selection: Selection::default(),
                        alert: None,
                    };
                }
                let selection = std::fs::read_to_string(path)
                    .ok()
                    .and_then(|raw| serde_json::from_str::<Selection>(&raw).ok())
                    .filter(Selection::is_consistent)
                    .unwrap_or_default();
                PullOutcome {
                    selection,
                    alert: None,
                }
            }
            GallerySource::Remote(base) => {
                let url = format!("{}/shoot/{}/{}", base, shoot, variant.route());
                let resp = self
                    .http(self.pull_timeout)
                    .and_then(|c| Ok(c.get(&url).send()?));
                match resp {
                    Ok(resp) if resp.status().as_u16() == 200 => {
                        let selection = resp
                            .json::<Selection>()
                            .ok()
                            .filter(Selection::is_consistent)
                            .unwrap_or_default();
                        PullOutcome {
                            selection,
                            alert: None,
                        }
                    }
                    Ok(resp) => PullOutcome {
                        selection: Selection::default(),
                        alert: Some(format!(
                            "could not fetch picks (status {})",
                            resp.status().as_u16()
                        )),
                    },
                    Err(e) => PullOutcome {
                        selection: Selection::default(),
                        alert: Some(format!("could not fetch picks: {}", e)),
                    },
                }
            }
        }
    }

    /// Transmits the selection. Completes before any navigation proceeds;
    /// a failure is reported, never thrown.
    pub fn push(
        &self,
        source: &GallerySource,
        shoot: &str,
        page: u32,
        selection: &Selection,
    ) -> PushOutcome {
        match source {
            GallerySource::Local(_) => {
                let dir = source.shoot_dir(shoot).expect("local source");
                let write = std::fs::create_dir_all(&dir).and_then(|_| {
                    std::fs::write(
                        dir.join("picks.json"),
                        serde_json::to_string_pretty(selection).unwrap_or_default(),
                    )
                });
                PushOutcome {
                    status: 0,
                    error: write.err().map(|e| e.to_string()),
                }
            }
            GallerySource::Remote(base) => {
                let url = format!("{}/shoot/{}/{}/savePicks", base, shoot, page);
                let resp = self
                    .http(self.push_timeout)
                    .and_then(|c| Ok(c.post(&url).json(selection).send()?));
                match resp {
                    Ok(resp) => PushOutcome {
                        status: resp.status().as_u16(),
                        error: None,
                    },
                    Err(e) => PushOutcome {
                        status: 0,
                        error: Some(e.to_string()),
                    },
                }
            }
        }
    }

    /// The item ids making up one gallery page.
    pub fn fetch_manifest(
        &self,
        source: &GallerySource,
        shoot: &str,
        page: u32,
    ) -> anyhow::Result<Vec<String>> {
        match source {
            GallerySource::Local(_) => {
                let dir = source.shoot_dir(shoot).expect("local source");
                let path = dir.join("pages").join(format!("{}.json", page));
                if !path.exists() {
                    return Ok(Vec::new());
                }
                let raw = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&raw)?)
            }
            GallerySource::Remote(base) => {
                let url = format!("{}/shoot/{}/{}", base, shoot, page);
                let resp = self
                    .http(self.pull_timeout)?
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .map_err(|e| ClientError::GalleryUnreachable(e.to_string()))?;
                match resp.status().as_u16() {
                    200 => Ok(resp.json()?),
                    404 => Ok(Vec::new()),
                    other => Err(ClientError::GalleryUnreachable(format!(
                        "page manifest returned status {}",
                        other
                    ))
                    .into()),
                }
            }
        }
    }

    pub fn sign_in(
        &self,
        source: &GallerySource,
        username: &str,
        password: &str,
    ) -> anyhow::Result<AccountOutcome> {
        let base = match source {
            GallerySource::Remote(base) => base,
            GallerySource::Local(_) => return Err(ClientError::RemoteOnly.into()),
        };
        let url = format!("{}/signin", base);
        let body = serde_json::json!({ "username": username, "password": password });
        let resp = self
            .http(self.push_timeout)
            .and_then(|c| Ok(c.post(&url).json(&body).send()?));
        Ok(match resp {
            Ok(resp) => {
                let status = resp.status().as_u16();
                match status {
                    200 | 202 => AccountOutcome {
                        status,
                        success: true,
                        message: "Authentication success!".to_string(),
                    },
                    404 => AccountOutcome {
                        status,
                        success: false,
                        message: resp
                            .text()
                            .unwrap_or_else(|_| "incorrect username or password".to_string()),
                    },
                    _ => AccountOutcome {
                        status,
                        success: false,
                        message: "Something went wrong".to_string(),
                    },
                }
            }
            Err(e) => AccountOutcome {
                status: 0,
                success: false,
                message: format!("Something went wrong: {}", e),
            },
        })
    }

    pub fn create_user(
        &self,
        source: &GallerySource,
        user: &NewUser,
    ) -> anyhow::Result<AccountOutcome> {
        let base = match source {
            GallerySource::Remote(base) => base,
            GallerySource::Local(_) => return Err(ClientError::RemoteOnly.into()),
        };
        let url = format!("{}/createUser", base);
        let resp = self
            .http(self.push_timeout)
            .and_then(|c| Ok(c.post(&url).json(user).send()?));
        Ok(match resp {
            Ok(resp) => {
                let status = resp.status().as_u16();
                if status == 200 {
                    AccountOutcome {
                        status,
                        success: true,
                        message: "User Created!".to_string(),
                    }
                } else {
                    AccountOutcome {
                        status,
                        success: false,
                        message: "Something went wrong".to_string(),
                    }
                }
            }
            Err(e) => AccountOutcome {
                status: 0,
                success: false,
                message: format!("Something went wrong: {}", e),
            },
        })
    }
}
