mod engine;

pub use engine::ReconciliationEngine;

/// What happens to budgets when an existing transaction is edited or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPolicy {
    /// Leave budgets as they are. Only new transactions reconcile.
    #[default]
    Ignore,
    /// Recompute every budget whose category/month the edit touched.
    Reconcile,
}

impl EditPolicy {
    pub fn reconciles(self) -> bool {
        matches!(self, EditPolicy::Reconcile)
    }
}
