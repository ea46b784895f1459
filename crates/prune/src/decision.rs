//! Pure removal decisions for one hidden title.

use std::collections::HashSet;
use std::fmt;

use dustman_steam::{AppId, PackageId, PackageIndex};

/// Why a package may be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveReason {
    /// The package grants only the hidden title.
    SoleTitle,
    /// The package grants several titles and none of them is visible.
    NoVisibleTitles,
}

/// Why a package must be kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The package still grants this visible title.
    ContainsVisible(AppId),
    /// The package is not in the index.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Remove(RemoveReason),
    Skip(SkipReason),
}

/// The verdict for one package reached through one hidden title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub app: AppId,
    pub package: PackageId,
    pub verdict: Verdict,
}

impl Decision {
    pub fn is_removal(&self) -> bool {
        matches!(self.verdict, Verdict::Remove(_))
    }
}

impl fmt::Display for RemoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveReason::SoleTitle => write!(f, "package contains only this app"),
            RemoveReason::NoVisibleTitles => {
                write!(f, "package contains more than one app, none visible")
            }
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ContainsVisible(app) => {
                write!(f, "package contains other non-hidden app {app}")
            }
            SkipReason::Unknown => write!(f, "package is not in the license report"),
        }
    }
}

/// Decides, for each of `packages` in order, whether it may be removed on
/// behalf of hidden title `app`.
///
/// A single-title package is always removable. A multi-title package is
/// removable only if none of its titles is in `visible`; the whole package
/// is kept otherwise. Titles absent from `visible` are not treated as
/// visible even if the library config never mentions them.
pub fn decide(
    app: &AppId,
    packages: &[PackageId],
    index: &PackageIndex,
    visible: &HashSet<AppId>,
) -> Vec<Decision> {
    packages
        .iter()
        .map(|package| Decision {
            app: app.clone(),
            package: package.clone(),
            verdict: verdict_for(index.members(package), visible),
        })
        .collect()
}

/// The sub-sequence of `packages` that [`decide`] marks for removal.
pub fn eligible_packages(
    app: &AppId,
    packages: &[PackageId],
    index: &PackageIndex,
    visible: &HashSet<AppId>,
) -> Vec<PackageId> {
    decide(app, packages, index, visible)
        .into_iter()
        .filter(Decision::is_removal)
        .map(|d| d.package)
        .collect()
}

fn verdict_for(members: Option<&[AppId]>, visible: &HashSet<AppId>) -> Verdict {
    match members {
        None | Some([]) => Verdict::Skip(SkipReason::Unknown),
        Some([_]) => Verdict::Remove(RemoveReason::SoleTitle),
        Some(members) => match members.iter().find(|m| visible.contains(*m)) {
            Some(shown) => Verdict::Skip(SkipReason::ContainsVisible(shown.clone())),
            None => Verdict::Remove(RemoveReason::NoVisibleTitles),
        },
    }
}
