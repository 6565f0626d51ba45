use std::path::{Path, PathBuf};

use tracing::info;

use super::check_user_name;
use crate::error::ScanError;
use crate::models::scan::{ProbeSubmission, RecognizeStatus, ScanStatus, WebhookRecord};
use crate::utils::config::MatchPolicy;
use crate::verify::Verifier;
use crate::AppState;

/// Verify a probe against the stored references of `probe.username`.
///
/// Both a match and a mismatch copy the probe into the results directory and
/// send exactly one webhook record. Unknown users short-circuit before
/// anything is written.
pub async fn recognize(state: &AppState, probe: ProbeSubmission) -> Result<RecognizeStatus, ScanError> {
    let username = probe.username.as_str();
    check_user_name(username)?;
    info!(
        username,
        user_id = %probe.user_id,
        panel = %probe.panel,
        kpm = %probe.kpm,
        filename = %probe.upload.filename,
        "recognition requested"
    );

    if !state.store.user_exists(username).await {
        info!(username, "no dataset for user");
        return Ok(RecognizeStatus::UnknownUser);
    }

    let temp = state.store.temp_upload(&probe.upload.bytes)?;
    let references = state.store.list_references(username, state.max_references).await?;
    if references.is_empty() {
        info!(username, "user has no reference images");
        return Ok(RecognizeStatus::UnknownUser);
    }

    let matched = compare_references(state.verifier.as_ref(), state.match_policy, temp.path(), &references).await?;
    let status = if matched { ScanStatus::Sukses } else { ScanStatus::Gagal };

    let image_path = state
        .store
        .record_result(username, &probe.upload.filename, &probe.upload.bytes)
        .await?;
    info!(username, result = %image_path, status = status.as_str(), "recognition finished");

    let record = WebhookRecord {
        user_id: probe.user_id,
        image_path,
        status,
        panel: probe.panel,
        kpm: probe.kpm,
    };
    state.notifier.notify(&record).await;
    drop(temp);

    Ok(if matched { RecognizeStatus::Matched } else { RecognizeStatus::NotMatched })
}

/// Walk `references` in order until the policy reaches a verdict.
///
/// With `FirstDecisive` only the first reference is ever compared.
pub async fn compare_references(
    verifier: &dyn Verifier,
    policy: MatchPolicy,
    probe: &Path,
    references: &[PathBuf],
) -> Result<bool, ScanError> {
    for reference in references {
        info!(reference = %reference.display(), "comparing probe");
        let decision = verifier
            .compare(probe, reference)
            .await
            .map_err(ScanError::Verification)?;
        if decision.verified {
            return Ok(true);
        }
        if policy == MatchPolicy::FirstDecisive {
            return Ok(false);
        }
    }
    Ok(false)
}
