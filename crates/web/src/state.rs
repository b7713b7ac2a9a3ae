use storage::{UserStore, models::TierWeights};
use tracker::SyncContext;

/// Shared by every handler. Cloning is cheap; the store, provider and rate
/// limiter behind `sync` are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub sync: SyncContext,
    pub weights: TierWeights,
}

impl AppState {
    pub fn new(sync: SyncContext) -> Self {
        Self {
            sync,
            weights: TierWeights::default(),
        }
    }

    pub fn store(&self) -> &dyn UserStore {
        self.sync.store()
    }
}
