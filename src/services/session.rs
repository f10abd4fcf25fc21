use crate::domain::models::{ItemRestore, ItemRow, PageReport, Phase, RestoreOutcome, Session};
use crate::selection::{Selection, SelectionStore};
use crate::services::cookies::{self, CookieScope};
use crate::services::output;
use crate::services::storage::audit;
use crate::services::sync::{GallerySource, PullVariant, SyncClient};

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("no open gallery session; run `picks open <url>` first")]
    NoSession,
    #[error("page is still loading; re-run `picks open` to recover")]
    PageLoading,
    #[error("item not on this page: {0}")]
    ItemNotOnPage(String),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NoSession => "NO_SESSION",
            SessionError::PageLoading => "PAGE_LOADING",
            SessionError::ItemNotOnPage(_) => "ITEM_NOT_ON_PAGE",
        }
    }
}

/// A gallery page address broken into its parts. The trailing numeric path
/// segment is the page; a bare shoot url means page 0.
#[derive(Debug, PartialEq, Eq)]
pub struct PageUrl {
    pub base: String,
    pub shoot: String,
    pub page: u32,
}

pub fn parse_page_url(raw: &str) -> anyhow::Result<PageUrl> {
    let trimmed = raw.trim_end_matches('/');
    let marker = "/shoot/";
    let idx = trimmed
        .rfind(marker)
        .ok_or_else(|| anyhow::anyhow!("not a gallery page url (missing /shoot/): {}", raw))?;
    let base = trimmed[..idx].to_string();
    let rest = &trimmed[idx + marker.len()..];
    let mut segments = rest.split('/');
    let shoot = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing shoot name in url: {}", raw))?
        .to_string();
    let page = match segments.next() {
        Some(seg) => seg
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("trailing page segment is not a number: {}", seg))?,
        None => 0,
    };
    Ok(PageUrl { base, shoot, page })
}

pub fn counter_text(count: usize) -> String {
    format!("{} Items Selected", count)
}

/// Applies the picked set onto a page's items. Picks that are not on this
/// page are skipped, one by one; the loop never aborts.
pub fn restore_onto(items: &[String], store: &SelectionStore) -> Vec<ItemRestore> {
    store
        .snapshot()
        .picks
        .into_iter()
        .map(|id| {
            let outcome = if items.iter().any(|i| i == &id) {
                RestoreOutcome::Restored
            } else {
                RestoreOutcome::Skipped
            };
            ItemRestore { id, outcome }
        })
        .collect()
}

pub fn item_rows(items: &[String], store: &SelectionStore) -> Vec<ItemRow> {
    items
        .iter()
        .map(|id| ItemRow {
            id: id.clone(),
            picked: store.contains(id),
        })
        .collect()
}

/// The page-load sequence: manifest, pull, persist, restore, counter.
/// Mutates the session in place; the caller saves it. Pull failures alert
/// exactly once and degrade to an empty selection.
pub fn load_page(
    client: &SyncClient,
    source: &GallerySource,
    scope: &CookieScope,
    session: &mut Session,
    variant: PullVariant,
) -> anyhow::Result<PageReport> {
    session.phase = Phase::Loading;
    let items = client.fetch_manifest(source, &session.shoot, session.page)?;

    let pulled = client.pull(source, &session.shoot, variant);
    let alerted = match &pulled.alert {
        Some(msg) => {
            output::alert(msg);
            audit(
                "pull_failed",
                serde_json::json!({"shoot": session.shoot, "message": msg}),
            );
            true
        }
        None => false,
    };

    let store = SelectionStore::from_selection(pulled.selection);
    cookies::save(&store.snapshot(), scope)?;

    let restore = restore_onto(&items, &store);
    let report = PageReport {
        shoot: session.shoot.clone(),
        page: session.page,
        counter: counter_text(store.count()),
        items: item_rows(&items, &store),
        restore,
        alerted,
    };

    session.items = items;
    session.phase = Phase::Ready;
    Ok(report)
}

/// Loads the working selection for a session: jar slot if present, empty
/// otherwise. A corrupt slot is indistinguishable from an absent one.
pub fn working_store(scope: &CookieScope) -> SelectionStore {
    SelectionStore::from_selection(cookies::load(scope).unwrap_or_else(Selection::default))
}

#[cfg(test)]
mod tests {
    use super::{counter_text, parse_page_url, restore_onto, PageUrl};
    use crate::domain::models::RestoreOutcome;
    use crate::selection::{Selection, SelectionStore};

    #[test]
    fn page_url_parses_trailing_numeric_segment() {
        assert_eq!(
            parse_page_url("https://proofs.example.com/shoot/summer/3").unwrap(),
            PageUrl {
                base: "https://proofs.example.com".into(),
                shoot: "summer".into(),
                page: 3,
            }
        );
    }

    #[test]
    fn bare_shoot_url_means_page_zero() {
        let parsed = parse_page_url("https://proofs.example.com/shoot/summer/").unwrap();
        assert_eq!(parsed.page, 0);
    }

    #[test]
    fn fixture_dir_urls_parse_too() {
        let parsed = parse_page_url("/tmp/gallery/shoot/wedding/2").unwrap();
        assert_eq!(parsed.base, "/tmp/gallery");
        assert_eq!(parsed.shoot, "wedding");
        assert_eq!(parsed.page, 2);
    }

    #[test]
    fn non_gallery_urls_are_rejected() {
        assert!(parse_page_url("https://example.com/somewhere").is_err());
        assert!(parse_page_url("https://example.com/shoot/summer/abc").is_err());
    }

    #[test]
    fn counter_text_matches_display_contract() {
        assert_eq!(counter_text(0), "0 Items Selected");
        assert_eq!(counter_text(2), "2 Items Selected");
    }

    #[test]
    fn restore_skips_items_missing_from_the_page() {
        let store = SelectionStore::from_selection(Selection {
            count: 2,
            picks: vec!["img1".into(), "img9".into()],
        });
        let items = vec!["img1".to_string(), "img2".to_string()];
        let outcomes = restore_onto(&items, &store);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].outcome, RestoreOutcome::Restored);
        assert_eq!(outcomes[1].outcome, RestoreOutcome::Skipped);
    }
}
