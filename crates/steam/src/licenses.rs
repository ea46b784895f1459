//! Package membership read from a `licenses_print` report.
//!
//! The report is a sequence of four-line records:
//!
//! ```text
//! License packageID 12345:
//!  - State   : Active( flags 0 ) - Purchased : ...
//!  - Apps    : 10, 80, 100, (3 in total)
//!  - Depots  : 0, 1, (2 in total)
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::SteamError;
use crate::ids::{AppId, PackageId};

/// Packages that must never be removed. Package 0 is Steam itself and
/// grants hundreds of apps.
pub const PACKAGE_BLACKLIST: &[&str] = &["0"];

static PACKAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^License packageID (\d+)").expect("package pattern is valid")
});

static APPS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ *- Apps +: ((\d+, )+)").expect("apps pattern is valid")
});

const APPS_SEPARATOR: &str = ", ";

/// Returns true if `package` is reserved and must never be targeted.
pub fn is_blacklisted(package: &PackageId) -> bool {
    PACKAGE_BLACKLIST.contains(&package.as_str())
}

/// Where the line scanner is inside a record. `None` packages are
/// blacklisted records being skipped.
#[derive(Debug)]
enum RecordState {
    AwaitingRecord,
    ReadingState(Option<PackageId>),
    ReadingApps(Option<PackageId>),
    ReadingDepots(Option<(PackageId, Vec<AppId>)>),
}

/// Package → titles and title → packages, both in report order.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    packages_to_titles: HashMap<PackageId, Vec<AppId>>,
    titles_to_packages: HashMap<AppId, Vec<PackageId>>,
}

impl PackageIndex {
    /// Reads and indexes the license report at `path`.
    pub fn load(path: &Path) -> Result<Self, SteamError> {
        let text = crate::read_input(path)?;
        let index = Self::parse(&text);
        debug!(
            path = %path.display(),
            packages = index.len(),
            apps = index.titles_to_packages.len(),
            "license report loaded"
        );
        Ok(index)
    }

    /// Indexes a license report. Never fails: lines outside a record are
    /// skipped and a record cut off before its apps line is dropped.
    pub fn parse(text: &str) -> Self {
        let mut index = Self::default();
        let mut state = RecordState::AwaitingRecord;

        for line in text.lines() {
            state = match state {
                RecordState::AwaitingRecord => match PACKAGE_LINE.captures(line) {
                    Some(caps) => {
                        let package = PackageId::from(&caps[1]);
                        if is_blacklisted(&package) {
                            trace!(%package, "skipping blacklisted package");
                            RecordState::ReadingState(None)
                        } else {
                            RecordState::ReadingState(Some(package))
                        }
                    }
                    None => RecordState::AwaitingRecord,
                },
                RecordState::ReadingState(package) => RecordState::ReadingApps(package),
                RecordState::ReadingApps(None) => RecordState::ReadingDepots(None),
                RecordState::ReadingApps(Some(package)) => match parse_apps_line(line) {
                    Some(apps) => RecordState::ReadingDepots(Some((package, apps))),
                    None => {
                        trace!(%package, "package has no apps");
                        RecordState::ReadingDepots(None)
                    }
                },
                RecordState::ReadingDepots(record) => {
                    if let Some((package, apps)) = record {
                        index.insert(package, apps);
                    }
                    RecordState::AwaitingRecord
                }
            };
        }

        // A record whose apps line was read is kept even when the depots
        // line is missing at end of input.
        if let RecordState::ReadingDepots(Some((package, apps))) = state {
            index.insert(package, apps);
        }

        index
    }

    /// Records `package` as granting `apps`. Blacklisted packages and empty
    /// app lists are ignored; a package seen again replaces its earlier
    /// membership.
    pub fn insert(&mut self, package: PackageId, apps: Vec<AppId>) {
        if is_blacklisted(&package) {
            return;
        }

        let mut members: Vec<AppId> = Vec::with_capacity(apps.len());
        for app in apps {
            if !members.contains(&app) {
                members.push(app);
            }
        }
        if members.is_empty() {
            return;
        }

        if let Some(previous) = self.packages_to_titles.remove(&package) {
            debug!(%package, "package listed twice, keeping last record");
            for app in previous {
                if let Some(packages) = self.titles_to_packages.get_mut(&app) {
                    packages.retain(|p| p != &package);
                    if packages.is_empty() {
                        self.titles_to_packages.remove(&app);
                    }
                }
            }
        }

        for app in &members {
            self.titles_to_packages
                .entry(app.clone())
                .or_default()
                .push(package.clone());
        }
        self.packages_to_titles.insert(package, members);
    }

    /// Titles granted by `package`, or `None` if the package is unknown.
    pub fn members(&self, package: &PackageId) -> Option<&[AppId]> {
        self.packages_to_titles.get(package).map(Vec::as_slice)
    }

    /// Packages granting `app`, in report order. Empty if none.
    pub fn packages_for(&self, app: &AppId) -> &[PackageId] {
        self.titles_to_packages
            .get(app)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_package(&self, package: &PackageId) -> bool {
        self.packages_to_titles.contains_key(package)
    }

    /// Number of recorded packages.
    pub fn len(&self) -> usize {
        self.packages_to_titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages_to_titles.is_empty()
    }
}

/// Extracts the app ids from an apps line, or `None` if it lists none.
fn parse_apps_line(line: &str) -> Option<Vec<AppId>> {
    let caps = APPS_LINE.captures(line)?;
    let list = caps[1].strip_suffix(APPS_SEPARATOR).unwrap_or(&caps[1]);
    Some(list.split(APPS_SEPARATOR).map(AppId::from).collect())
}
