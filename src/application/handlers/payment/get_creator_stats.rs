//! GetCreatorStatsHandler - Query handler for per-creator counters.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::stats::CreatorStats;
use crate::domain::subscription::PaymentError;
use crate::ports::CreatorStatsReader;

#[derive(Debug, Clone)]
pub struct GetCreatorStatsQuery {
    pub creator_id: UserId,
}

pub type GetCreatorStatsResult = CreatorStats;

pub struct GetCreatorStatsHandler {
    reader: Arc<dyn CreatorStatsReader>,
}

impl GetCreatorStatsHandler {
    pub fn new(reader: Arc<dyn CreatorStatsReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetCreatorStatsQuery,
    ) -> Result<GetCreatorStatsResult, PaymentError> {
        Ok(self.reader.get_stats(&query.creator_id).await?)
    }
}
