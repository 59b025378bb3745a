//! Reconciliation engine
//!
//! One cycle converges GoCD towards GitHub:
//! 1. Fetch the desired set of tagged repositories
//! 2. Look up each repository's config repo, creating it when missing
//! 3. Snapshot every registered config repo
//! 4. Delete registrations under our prefix whose repository is gone
//!
//! Nothing is carried between cycles. Failures are logged and isolated to the
//! repository or registration they concern; the next cycle is the retry.

use seeder_client::ClientError;
use seeder_core::domain::config_repo::ConfigRepo;
use seeder_core::domain::naming::RegistrationPrefix;
use seeder_core::domain::repository::RepositoryDescriptor;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::repository::{PipelineRegistry, RepositoryProvider};
use crate::service::delta::plan_removals;

/// Outcome counters of one cycle, used for the summary log line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Tagged repositories found
    pub desired: usize,
    /// Repositories that already had a registration
    pub existing: usize,
    pub created: usize,
    pub deleted: usize,
    /// Registrations outside our prefix, left untouched
    pub foreign: usize,
    /// Lookups, creates and deletes that failed
    pub failures: usize,
    /// Whether the desired set was fetched at all
    pub fetched: bool,
    /// Whether the deletion phase ran
    pub pruned: bool,
}

/// Orchestrates reconciliation cycles between a provider and a registry
pub struct Reconciler {
    provider: Arc<dyn RepositoryProvider>,
    registry: Arc<dyn PipelineRegistry>,
    prefix: RegistrationPrefix,
}

impl Reconciler {
    pub fn new(
        provider: Arc<dyn RepositoryProvider>,
        registry: Arc<dyn PipelineRegistry>,
        prefix: RegistrationPrefix,
    ) -> Self {
        Self {
            provider,
            registry,
            prefix,
        }
    }

    pub fn prefix(&self) -> &RegistrationPrefix {
        &self.prefix
    }

    /// Runs one full cycle
    ///
    /// Never fails: every error is logged and the cycle moves on.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle_id = Uuid::new_v4();
        let span = info_span!("reconcile", %cycle_id, prefix = %self.prefix);

        async {
            let report = self.reconcile().await;
            info!(
                desired = report.desired,
                existing = report.existing,
                created = report.created,
                deleted = report.deleted,
                foreign = report.foreign,
                failures = report.failures,
                "reconciliation cycle finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn reconcile(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let desired = match self.provider.fetch().await {
            Ok(desired) => desired,
            Err(e) => {
                log_fetch_failure(&e);
                return report;
            }
        };
        report.fetched = true;
        report.desired = desired.len();
        debug!(count = desired.len(), "fetched desired repositories");

        for repo in &desired {
            self.ensure_registered(repo, &mut report).await;
        }

        // Snapshot taken after creates so this cycle never removes what it just added
        let actual = match self.registry.list_all().await {
            Ok(actual) => actual,
            Err(e) => {
                error!(error = %e, kind = %e.kind(), "failed to list gocd config repos; skipping removals");
                return report;
            }
        };

        self.remove_stale(&desired, &actual, &mut report).await;
        report.pruned = true;
        report
    }

    /// Creates the registration for `repo` if GoCD reports it missing
    async fn ensure_registered(&self, repo: &RepositoryDescriptor, report: &mut CycleReport) {
        match self.registry.get(&repo.name, &self.prefix).await {
            Ok(existing) => {
                report.existing += 1;
                debug!(repository = %repo.name, id = %existing.id, "config repo already registered");
            }
            Err(e) if e.is_not_found() => match self.registry.create(repo, &self.prefix).await {
                Ok(created) => {
                    report.created += 1;
                    info!(repository = %repo.name, id = %created.id, "created {}", created.id);
                }
                Err(e) => {
                    report.failures += 1;
                    error!(repository = %repo.name, error = %e, kind = %e.kind(), "failed to create config repo");
                }
            },
            Err(e) => {
                report.failures += 1;
                warn!(repository = %repo.name, error = %e, kind = %e.kind(), "failed to look up config repo");
            }
        }
    }

    /// Deletes registrations under our prefix with no matching repository
    async fn remove_stale(
        &self,
        desired: &[RepositoryDescriptor],
        actual: &[ConfigRepo],
        report: &mut CycleReport,
    ) {
        let removals = plan_removals(desired, actual, &self.prefix);
        report.foreign = removals.foreign.len();

        for foreign in &removals.foreign {
            debug!(id = %foreign.id, "leaving config repo outside our prefix untouched");
        }

        for config_repo in removals.stale {
            let name = config_repo.material_name().unwrap_or_default();

            match self.registry.delete(config_repo).await {
                Ok(()) => {
                    report.deleted += 1;
                    info!(
                        id = %config_repo.id,
                        repository = name,
                        "removed gocd config repo {} for {} ({})",
                        config_repo.id,
                        name,
                        config_repo.material_url()
                    );
                }
                Err(e) => {
                    report.failures += 1;
                    error!(id = %config_repo.id, error = %e, kind = %e.kind(), "failed to delete config repo");
                }
            }
        }
    }
}

fn log_fetch_failure(e: &ClientError) {
    if e.is_rate_limited() {
        warn!(error = %e, "github rate limit hit; skipping cycle");
    } else {
        error!(error = %e, kind = %e.kind(), "failed to fetch github repositories; skipping cycle");
    }
}
