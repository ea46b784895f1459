//! The removal run: walks every hidden title and removes what the decision
//! engine allows.
//!
//! Removals are strictly sequential. A failed removal is logged and the run
//! moves on to the next package; nothing is retried.

use dustman_steam::{AppId, LibraryState, PackageId, PackageIndex};
use tracing::{debug, error, info};

use crate::decision::{RemoveReason, Verdict, decide};
use crate::error::RemovalError;
use crate::remover::PackageRemover;

/// Counters and failures from one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Hidden titles with at least one known package.
    pub apps_considered: usize,
    /// Hidden titles with no license record (e.g. free titles).
    pub apps_without_packages: usize,
    pub removed: Vec<(AppId, PackageId)>,
    pub skipped: usize,
    pub failed: Vec<(AppId, PackageId, RemovalError)>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Drives removals over a loaded library.
pub struct Pruner<'a> {
    library: &'a LibraryState,
    index: &'a PackageIndex,
}

impl<'a> Pruner<'a> {
    pub fn new(library: &'a LibraryState, index: &'a PackageIndex) -> Self {
        Self { library, index }
    }

    /// Processes every hidden title in ascending id order, calling `remover`
    /// once per eligible package in the order the license report lists the
    /// title's packages.
    pub async fn run(&self, remover: &dyn PackageRemover) -> RunSummary {
        let mut summary = RunSummary::default();

        for app in self.library.hidden_sorted() {
            let packages = self.index.packages_for(app);
            if packages.is_empty() {
                debug!(%app, "hidden app has no packages");
                summary.apps_without_packages += 1;
                continue;
            }
            summary.apps_considered += 1;

            for decision in decide(app, packages, self.index, self.library.visible()) {
                let package = decision.package;
                match decision.verdict {
                    Verdict::Skip(reason) => {
                        info!(%app, %package, %reason, "skipping package");
                        summary.skipped += 1;
                    }
                    Verdict::Remove(reason) => {
                        match reason {
                            RemoveReason::SoleTitle => {
                                debug!(%app, %package, %reason, "removing package")
                            }
                            RemoveReason::NoVisibleTitles => {
                                info!(%app, %package, %reason, "removing package")
                            }
                        }

                        match remover.remove(app, &package).await {
                            Ok(()) => summary.removed.push((app.clone(), package)),
                            Err(e) => {
                                error!(%app, %package, error = %e, "failed to remove package");
                                summary.failed.push((app.clone(), package, e));
                            }
                        }
                    }
                }
            }
        }

        info!(
            considered = summary.apps_considered,
            without_packages = summary.apps_without_packages,
            removed = summary.removed.len(),
            skipped = summary.skipped,
            failed = summary.failed.len(),
            "run finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    /// Records calls and fails for the packages listed in `fail`.
    struct MockRemover {
        calls: Mutex<Vec<(String, String)>>,
        fail: Vec<&'static str>,
    }

    impl MockRemover {
        fn new(fail: Vec<&'static str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PackageRemover for MockRemover {
        fn remove<'a>(
            &'a self,
            app: &'a AppId,
            package: &'a PackageId,
        ) -> Pin<Box<dyn Future<Output = Result<(), RemovalError>> + Send + 'a>> {
            self.calls
                .lock()
                .unwrap()
                .push((app.to_string(), package.to_string()));
            let fails = self.fail.iter().any(|f| *f == package.as_str());
            Box::pin(async move {
                if fails {
                    Err(RemovalError::Rejected("15".into()))
                } else {
                    Ok(())
                }
            })
        }
    }

    fn library(hidden: &[&str], visible: &[&str]) -> LibraryState {
        LibraryState::from_sets(
            hidden.iter().map(|a| AppId::from(*a)),
            visible.iter().map(|a| AppId::from(*a)),
        )
    }

    fn index(records: &[(&str, &str)]) -> PackageIndex {
        let mut index = PackageIndex::default();
        for (package, apps) in records {
            index.insert(
                PackageId::from(*package),
                apps.split(',').map(AppId::from).collect(),
            );
        }
        index
    }

    fn pair(app: &str, package: &str) -> (String, String) {
        (app.into(), package.into())
    }

    #[tokio::test]
    async fn removes_only_eligible_packages() {
        let lib = library(&["10"], &["20"]);
        let idx = index(&[("100", "10"), ("200", "10,20")]);
        let remover = MockRemover::new(vec![]);

        let summary = Pruner::new(&lib, &idx).run(&remover).await;

        assert_eq!(remover.calls(), vec![pair("10", "100")]);
        assert_eq!(summary.removed.len(), 1);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.has_failures());
    }

    #[tokio::test]
    async fn hidden_without_packages_skipped_silently() {
        let lib = library(&["10", "11"], &[]);
        let idx = index(&[("100", "10")]);
        let remover = MockRemover::new(vec![]);

        let summary = Pruner::new(&lib, &idx).run(&remover).await;

        assert_eq!(summary.apps_considered, 1);
        assert_eq!(summary.apps_without_packages, 1);
        assert_eq!(remover.calls().len(), 1);
    }

    #[tokio::test]
    async fn visible_titles_never_drive_removals() {
        let lib = library(&[], &["10"]);
        let idx = index(&[("100", "10")]);
        let remover = MockRemover::new(vec![]);

        Pruner::new(&lib, &idx).run(&remover).await;
        assert!(remover.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_does_not_stop_run() {
        let lib = library(&["10", "30"], &[]);
        let idx = index(&[("100", "10"), ("101", "10"), ("300", "30")]);
        let remover = MockRemover::new(vec!["100"]);

        let summary = Pruner::new(&lib, &idx).run(&remover).await;

        assert_eq!(
            remover.calls(),
            vec![pair("10", "100"), pair("10", "101"), pair("30", "300")]
        );
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].1, PackageId::from("100"));
        assert_eq!(summary.removed.len(), 2);
        assert!(summary.has_failures());
    }

    #[tokio::test]
    async fn order_follows_ids_then_report() {
        let lib = library(&["20", "3"], &[]);
        let idx = index(&[("900", "20"), ("50", "3"), ("40", "3")]);
        let remover = MockRemover::new(vec![]);

        Pruner::new(&lib, &idx).run(&remover).await;

        assert_eq!(
            remover.calls(),
            vec![pair("3", "50"), pair("3", "40"), pair("20", "900")]
        );
    }

    #[tokio::test]
    async fn shared_hidden_package_attempted_per_title() {
        let lib = library(&["10", "11"], &[]);
        let idx = index(&[("200", "10,11")]);
        let remover = MockRemover::new(vec![]);

        Pruner::new(&lib, &idx).run(&remover).await;

        assert_eq!(remover.calls(), vec![pair("10", "200"), pair("11", "200")]);
    }
}
