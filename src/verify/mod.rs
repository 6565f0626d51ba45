//! Face verification is delegated: this crate only decides which image pairs
//! to compare and what to do with the answer.

mod remote;

pub use remote::RemoteVerifier;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::scan::MatchDecision;

#[async_trait]
pub trait Verifier: Send + Sync {
    /// Compare the probe image against one stored reference image.
    async fn compare(&self, probe: &Path, reference: &Path) -> Result<MatchDecision>;
}
