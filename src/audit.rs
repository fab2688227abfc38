//! Runs an export through the breach checker and collects report rows.
//!
//! Items are processed strictly in order, one lookup at a time, with the
//! pacer's delay after every lookup. Items without a password are skipped.
//! Whatever rows were collected are written to the report even when the run
//! fails or is interrupted part way through.

use crate::checker::{sha1_hex, BreachChecker, RangeSource};
use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::model::{AuditResult, Item, LookupResult, ReportRow, UrlStyle};
use crate::pacing::Pacer;
use crate::report::{report_path, write_report};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Progress callbacks for an audit run.
pub trait AuditProgress {
    fn on_start(&self, _total: usize) {}
    fn on_item_start(&self, _item: &Item) {}
    fn on_item_done(&self, _row: &ReportRow, _lookup: &LookupResult) {}
    fn on_item_skipped(&self, _item: &Item) {}
}

/// Progress reporter that ignores every event.
pub struct NoProgress;

impl AuditProgress for NoProgress {}

/// Final state of [`audit_export`].
#[derive(Debug)]
pub struct AuditReport {
    pub result: AuditResult,
    /// Where the CSV landed, if any rows were written.
    pub report: Option<PathBuf>,
}

pub struct Auditor<S> {
    checker: BreachChecker<S>,
    pacer: Pacer,
    url_style: UrlStyle,
}

impl<S: RangeSource> Auditor<S> {
    pub fn new(checker: BreachChecker<S>, pacer: Pacer, url_style: UrlStyle) -> Self {
        Self {
            checker,
            pacer,
            url_style,
        }
    }

    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(
            BreachChecker::new(source),
            Pacer::new(config.delay()),
            config.url_style,
        )
    }

    /// Checks every item, appending rows to `result` as they complete.
    ///
    /// Stops between lookups once `shutdown` resolves and marks the result
    /// interrupted. Rows already pushed stay in `result` if an error is
    /// returned.
    pub async fn audit(
        &self,
        items: &[Item],
        progress: &dyn AuditProgress,
        shutdown: impl Future<Output = ()>,
        result: &mut AuditResult,
    ) -> Result<()> {
        tokio::pin!(shutdown);
        progress.on_start(items.len());

        for item in items {
            let Some(credential) = item.credential() else {
                debug!("Skipping {:?}: no password", item.title);
                result.skipped += 1;
                progress.on_item_skipped(item);
                continue;
            };

            progress.on_item_start(item);
            let hash = sha1_hex(&credential.password);

            let lookup = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    result.interrupted = true;
                    break;
                }
                lookup = self.checker.check(&hash) => lookup?,
            };

            if lookup.is_unavailable() {
                result.unavailable += 1;
            }

            let row = ReportRow::new(item, &credential, &lookup, self.url_style);
            debug!("Checked {:?}: pwned={} count={}", row.title, row.pwned, row.count);
            progress.on_item_done(&row, &lookup);
            result.rows.push(row);

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    result.interrupted = true;
                    break;
                }
                _ = self.pacer.pause() => {}
            }
        }

        Ok(())
    }
}

/// Parses `<dir>/data.1pif`, checks every item, and writes the report next
/// to the export.
///
/// The report is written before any error from the lookup loop is returned.
pub async fn audit_export<S: RangeSource>(
    dir: &Path,
    auditor: &Auditor<S>,
    progress: &dyn AuditProgress,
    shutdown: impl Future<Output = ()>,
) -> Result<AuditReport> {
    let items = export::parse(dir)?;
    info!("Checking {} items from {}", items.len(), dir.display());

    let mut result = AuditResult {
        total_items: items.len(),
        ..AuditResult::default()
    };

    let outcome = auditor.audit(&items, progress, shutdown, &mut result).await;

    let path = report_path(dir);
    let written = write_report(&path, &result.rows)?;
    outcome?;

    info!(
        "{} checked, {} pwned, {} skipped, {} unavailable",
        result.rows.len(),
        result.pwned_count(),
        result.skipped,
        result.unavailable
    );

    Ok(AuditReport {
        result,
        report: written.then_some(path),
    })
}
