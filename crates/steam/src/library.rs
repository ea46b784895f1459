//! Library visibility state read from `sharedconfig.vdf`.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::SteamError;
use crate::ids::AppId;
use crate::vdf::{self, VdfValue};

/// Nested keys leading to the per-app records.
const APPS_PATH: &[&str] = &["UserRoamingConfigStore", "Software", "Valve", "Steam", "apps"];

const HIDDEN_KEY: &str = "hidden";
const HIDDEN_TRUE: &str = "1";

/// Every title listed in the visibility config, split into hidden and
/// visible. The two sets are disjoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    hidden: HashSet<AppId>,
    visible: HashSet<AppId>,
}

impl LibraryState {
    /// Reads and classifies the visibility config at `path`.
    pub fn load(path: &Path) -> Result<Self, SteamError> {
        let text = crate::read_input(path)?;
        let state = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            hidden = state.hidden.len(),
            visible = state.visible.len(),
            "library state loaded"
        );
        Ok(state)
    }

    /// Classifies every app record of a visibility config document.
    pub fn parse(text: &str) -> Result<Self, SteamError> {
        let root = vdf::parse(text)?;
        let apps = root.get_path(APPS_PATH).ok_or_else(|| {
            SteamError::MalformedConfig(format!("missing '{}'", APPS_PATH.join("/")))
        })?;

        let mut state = Self::default();
        for (app, record) in apps.iter() {
            let app = AppId::from(app);
            // A repeated key is classified by its last record.
            state.hidden.remove(&app);
            state.visible.remove(&app);
            if is_hidden_record(record) {
                state.hidden.insert(app);
            } else {
                state.visible.insert(app);
            }
        }
        Ok(state)
    }

    /// Builds a state from explicit sets. A title present in both is
    /// treated as visible.
    pub fn from_sets(
        hidden: impl IntoIterator<Item = AppId>,
        visible: impl IntoIterator<Item = AppId>,
    ) -> Self {
        let visible: HashSet<AppId> = visible.into_iter().collect();
        let hidden = hidden
            .into_iter()
            .filter(|app| !visible.contains(app))
            .collect();
        Self { hidden, visible }
    }

    pub fn hidden(&self) -> &HashSet<AppId> {
        &self.hidden
    }

    pub fn visible(&self) -> &HashSet<AppId> {
        &self.visible
    }

    pub fn is_hidden(&self, app: &AppId) -> bool {
        self.hidden.contains(app)
    }

    /// True only for titles the config lists as not hidden. Titles absent
    /// from the config are neither hidden nor visible.
    pub fn is_visible(&self, app: &AppId) -> bool {
        self.visible.contains(app)
    }

    /// Hidden titles in ascending id order.
    pub fn hidden_sorted(&self) -> Vec<&AppId> {
        let mut apps: Vec<&AppId> = self.hidden.iter().collect();
        apps.sort();
        apps
    }
}

fn is_hidden_record(record: &VdfValue) -> bool {
    record
        .as_object()
        .and_then(|obj| obj.get(HIDDEN_KEY))
        .and_then(VdfValue::as_str)
        == Some(HIDDEN_TRUE)
}
