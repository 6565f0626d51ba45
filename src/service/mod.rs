//! Registration and recognition workflows, independent of the HTTP layer.

pub mod register;
pub mod recognize;

pub use recognize::recognize;
pub use register::register;

use crate::error::ScanError;
use crate::utils::path::is_valid_user_name;

pub(crate) fn check_user_name(name: &str) -> Result<(), ScanError> {
    if is_valid_user_name(name) {
        Ok(())
    } else {
        Err(ScanError::InvalidName(name.to_string()))
    }
}
