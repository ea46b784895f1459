//! Wires the loaders, the removal run and the help-site client together.

use std::path::PathBuf;

use anyhow::Context;
use dustman_help_client::{Client, Credentials};
use dustman_prune::{DryRunRemover, Pruner, RunSummary};
use dustman_steam::{LibraryState, PackageIndex};
use tracing::info;

use crate::config::Config;

/// Inputs for one run.
pub struct RunRequest {
    pub category_file: PathBuf,
    pub licenses_file: PathBuf,
    pub credentials: Credentials,
    pub dry_run: bool,
}

/// Loads both inputs and removes every eligible package.
///
/// Input errors abort before any request is sent. Removal failures are
/// reported in the returned summary.
pub async fn run(request: &RunRequest, config: &Config) -> anyhow::Result<RunSummary> {
    let library = LibraryState::load(&request.category_file).with_context(|| {
        format!("loading library config {}", request.category_file.display())
    })?;
    let index = PackageIndex::load(&request.licenses_file).with_context(|| {
        format!("loading license report {}", request.licenses_file.display())
    })?;

    info!(
        hidden = library.hidden().len(),
        visible = library.visible().len(),
        packages = index.len(),
        "inputs loaded"
    );

    let pruner = Pruner::new(&library, &index);
    let summary = if request.dry_run {
        pruner.run(&DryRunRemover::new()).await
    } else {
        let client = Client::new(&request.credentials)
            .context("building help-site client")?
            .with_endpoint(config.endpoint.clone());
        pruner.run(&client).await
    };

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#""UserRoamingConfigStore"
{
	"Software" { "Valve" { "Steam" { "apps" {
		"10" { "hidden" "1" }
		"20" { }
	} } } }
}"#;

    const LICENSES: &str = "License packageID 100:\n - State   : Active\n - Apps    : 10, (1 in total)\n - Depots  : 1, (1 in total)\nLicense packageID 200:\n - State   : Active\n - Apps    : 10, 20, (2 in total)\n - Depots  : 2, (1 in total)\n";

    fn request(dir: &std::path::Path, dry_run: bool) -> RunRequest {
        let category_file = dir.join("sharedconfig.vdf");
        let licenses_file = dir.join("licenses.txt");
        std::fs::write(&category_file, CONFIG).unwrap();
        std::fs::write(&licenses_file, LICENSES).unwrap();
        RunRequest {
            category_file,
            licenses_file,
            credentials: Credentials {
                session_id: "s".into(),
                steam_login: "l".into(),
                steam_login_secure: "ls".into(),
            },
            dry_run,
        }
    }

    #[tokio::test]
    async fn dry_run_reports_eligible_packages() {
        let tmp = tempfile::tempdir().unwrap();
        let summary = run(&request(tmp.path(), true), &Config::default())
            .await
            .unwrap();

        assert_eq!(summary.removed.len(), 1);
        assert_eq!(summary.removed[0].1.as_str(), "100");
        assert_eq!(summary.skipped, 1);
        assert!(!summary.has_failures());
    }

    #[tokio::test]
    async fn unreachable_endpoint_records_failures() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            endpoint: format!("http://127.0.0.1:{port}/remove"),
            ..Config::default()
        };
        let summary = run(&request(tmp.path(), false), &config).await.unwrap();

        assert_eq!(summary.failed.len(), 1);
        assert!(summary.removed.is_empty());
    }

    #[tokio::test]
    async fn missing_input_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut req = request(tmp.path(), true);
        req.licenses_file = tmp.path().join("missing.txt");

        let err = run(&req, &Config::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("input not found"));
    }

    #[tokio::test]
    async fn malformed_config_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let req = request(tmp.path(), true);
        std::fs::write(&req.category_file, "\"UserLocalConfigStore\" { }").unwrap();

        let err = run(&req, &Config::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("malformed library config"));
    }
}
