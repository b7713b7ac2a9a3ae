use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a bulk operation (sync or baseline reset) over many users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SyncReport {
    /// True iff no user failed
    pub success: bool,
    pub updated_count: usize,
    pub failed_count: usize,
    /// One message per failed user, in input order
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<(), String>>,
    {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(()) => report.updated_count += 1,
                Err(message) => {
                    report.failed_count += 1;
                    report.errors.push(message);
                }
            }
        }
        report.success = report.failed_count == 0;
        report
    }

    pub fn attempted(&self) -> usize {
        self.updated_count + self.failed_count
    }
}
