use crate::models::{AppRole, SalesDraft};
use crate::registry::Registry;
use crate::seed;
use crate::storage::{self, LocalStore};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Mutex<Registry>>,
    // Global session for single-user desktop-like usage
    pub session: Arc<Mutex<SessionState>>,
    pub prefs: Arc<Mutex<SitePrefs>>,
    /// Draft staged by finalizing a trip; consumed at most once.
    pub pending_sale: Arc<Mutex<Option<SalesDraft>>>,
    pub insights: Arc<InsightBoard>,
    pub store: LocalStore,
}

impl AppState {
    pub fn seeded(store: LocalStore) -> Self {
        let prefs = SitePrefs::restore(&store);
        Self {
            registry: Arc::new(Mutex::new(Registry::seeded())),
            session: Arc::new(Mutex::new(SessionState::default())),
            prefs: Arc::new(Mutex::new(prefs)),
            pending_sale: Arc::new(Mutex::new(None)),
            insights: Arc::new(InsightBoard::default()),
            store,
        }
    }
}

#[derive(Clone, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub role: Option<AppRole>,
}

/// Branding and UI preferences, mirrored to local storage on change.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePrefs {
    pub site_name: String,
    pub site_logo: String,
    pub language: String,
    pub dark_mode: bool,
}

impl Default for SitePrefs {
    fn default() -> Self {
        Self {
            site_name: seed::DEFAULT_SITE_NAME.to_string(),
            site_logo: seed::DEFAULT_SITE_LOGO.to_string(),
            language: "en".to_string(),
            dark_mode: false,
        }
    }
}

impl SitePrefs {
    pub fn restore(store: &LocalStore) -> Self {
        let defaults = Self::default();
        Self {
            site_name: store
                .get(storage::SITE_NAME_KEY)
                .unwrap_or(defaults.site_name),
            site_logo: store
                .get(storage::SITE_LOGO_KEY)
                .unwrap_or(defaults.site_logo),
            language: store.get(storage::LANG_KEY).unwrap_or(defaults.language),
            dark_mode: store
                .get(storage::THEME_KEY)
                .map(|theme| theme == "dark")
                .unwrap_or(defaults.dark_mode),
        }
    }

    pub fn mirror(&self, store: &LocalStore) {
        store.set(storage::SITE_NAME_KEY, self.site_name.clone());
        store.set(storage::SITE_LOGO_KEY, self.site_logo.clone());
        store.set(storage::LANG_KEY, self.language.clone());
        store.set(storage::THEME_KEY, if self.dark_mode { "dark" } else { "light" });
    }
}

/// Latest AI insight text plus the generation counter that kills the
/// stale-overwrite race: a fetch only publishes if no newer fetch has been
/// dispatched since it started.
#[derive(Default)]
pub struct InsightBoard {
    seq: AtomicU64,
    latest: Mutex<Option<String>>,
}

impl InsightBoard {
    /// Registers a new fetch generation and returns its ticket.
    pub fn begin(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Stores the text unless a newer generation exists. Returns whether
    /// the text was accepted.
    pub fn publish(&self, ticket: u64, text: String) -> bool {
        if self.seq.load(Ordering::SeqCst) != ticket {
            return false;
        }
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(text);
            return true;
        }
        false
    }

    pub fn latest(&self) -> Option<String> {
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }
}
