use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use recast_api::mapping::CopyPlan;
use recast_api::record::Record;

/// Copy plans keyed by `(source TypeId, destination TypeId)`.
///
/// Plans depend on the two shapes only, never on converters, so one cache is
/// shared by a mapper and every mapper derived from it.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<(TypeId, TypeId), Arc<CopyPlan>>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached plan for `S → D`, built on first use.
    pub fn get_or_build<S: Record, D: Record>(&self) -> Arc<CopyPlan> {
        let key = (TypeId::of::<S>(), TypeId::of::<D>());

        {
            let guard = match self.plans.read() {
                Ok(g) => g,
                Err(poisoned) => {
                    tracing::warn!("plan cache read lock was poisoned, recovering");
                    poisoned.into_inner()
                }
            };
            if let Some(plan) = guard.get(&key) {
                return plan.clone();
            }
        }

        let plan = Arc::new(CopyPlan::build::<S, D>());
        tracing::debug!(
            source = %plan.source(),
            target = %plan.target(),
            links = plan.links().len(),
            conversions = plan.conversions(),
            "built copy plan"
        );

        let mut guard = match self.plans.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("plan cache write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        // Another thread may have won the race; keep the first plan.
        guard.entry(key).or_insert(plan).clone()
    }

    pub fn len(&self) -> usize {
        match self.plans.read() {
            Ok(g) => g.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
