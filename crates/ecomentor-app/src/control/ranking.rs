use ecomentor_api::{ApiClient, ServiceResult, service};
use ecomentor_core::RankedItem;

use super::{ControlStatus, if_mounted};
use crate::MountGuard;

/// The Explore screen's eco ranking.
pub struct RankingControl {
    api: ApiClient,
    guard: MountGuard,
    ranked: Vec<RankedItem>,
    status: ControlStatus,
}

impl RankingControl {
    pub fn new(api: ApiClient, guard: MountGuard) -> Self {
        Self {
            api,
            guard,
            ranked: Vec::new(),
            status: ControlStatus::default(),
        }
    }

    pub fn ranked(&self) -> &[RankedItem] {
        &self.ranked
    }

    pub fn status(&self) -> &ControlStatus {
        &self.status
    }

    pub async fn reload(&mut self) -> ServiceResult<usize> {
        let result = service::load_ranking(&self.api).await;
        let (ranked, status) = (&mut self.ranked, &mut self.status);
        if_mounted(&self.guard, "ranking", || match &result {
            Ok(items) => {
                *ranked = items.clone();
                status.clear();
            }
            Err(f) => status.fail(f),
        });
        result.map(|items| items.len())
    }
}
