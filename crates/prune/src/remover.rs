//! The seam between removal decisions and the network.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use dustman_steam::{AppId, PackageId};
use tracing::info;

use crate::error::RemovalError;

/// Revokes one package from the account.
///
/// The CLI implements this on top of the help-site HTTP client. Using a
/// trait keeps the run logic decoupled from transport and testable with
/// mocks. Implementations must issue at most one request per call and never
/// retry.
pub trait PackageRemover: Send + Sync {
    fn remove<'a>(
        &'a self,
        app: &'a AppId,
        package: &'a PackageId,
    ) -> Pin<Box<dyn Future<Output = Result<(), RemovalError>> + Send + 'a>>;
}

/// Records what would be removed without sending anything.
#[derive(Debug, Default)]
pub struct DryRunRemover {
    planned: Mutex<Vec<(AppId, PackageId)>>,
}

impl DryRunRemover {
    pub fn new() -> Self {
        Self::default()
    }

    /// The (app, package) pairs seen so far, in call order.
    pub fn planned(&self) -> Vec<(AppId, PackageId)> {
        self.planned
            .lock()
            .map(|p| p.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl PackageRemover for DryRunRemover {
    fn remove<'a>(
        &'a self,
        app: &'a AppId,
        package: &'a PackageId,
    ) -> Pin<Box<dyn Future<Output = Result<(), RemovalError>> + Send + 'a>> {
        Box::pin(async move {
            info!(%app, %package, "dry run: would remove package");
            let mut planned = self
                .planned
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            planned.push((app.clone(), package.clone()));
            Ok(())
        })
    }
}
