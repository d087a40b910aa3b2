//! Creator stats reader port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::stats::CreatorStats;

#[async_trait]
pub trait CreatorStatsReader: Send + Sync {
    /// Returns the creator's counters, zeroed if nothing was ever recorded.
    async fn get_stats(&self, creator_id: &UserId) -> Result<CreatorStats, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_stats_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn CreatorStatsReader) {}
    }
}
