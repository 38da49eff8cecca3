use std::mem::size_of;

use crate::PlanError;

/// Byte accounting for everything one planner allocates.
///
/// Every table and pass descriptor is charged here before it is allocated, so a planner
/// with a memory limit fails cleanly instead of growing past it. The allocations are
/// released together when the planner and the plans it handed out are dropped.
#[derive(Debug)]
pub(crate) struct Arena {
    limit: Option<usize>,
    used: usize,
}

impl Arena {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit, used: 0 }
    }

    pub fn used(&self) -> usize {
        self.used
    }

    /// Charges `bytes` against the limit.
    pub fn reserve(&mut self, bytes: usize) -> Result<(), PlanError> {
        let total = self
            .used
            .checked_add(bytes)
            .ok_or(PlanError::OutOfMemory(bytes))?;
        if let Some(limit) = self.limit {
            if total > limit {
                return Err(PlanError::OutOfMemory(bytes));
            }
        }
        self.used = total;
        Ok(())
    }

    /// Charges a value of type `T` against the limit.
    pub fn reserve_for<T>(&mut self) -> Result<(), PlanError> {
        self.reserve(size_of::<T>())
    }

    /// Returns an empty vector with room for exactly `len` floats.
    pub fn alloc_table(&mut self, len: usize) -> Result<Vec<f32>, PlanError> {
        let bytes = len.saturating_mul(size_of::<f32>());
        self.reserve(bytes)?;
        let mut table = Vec::new();
        if table.try_reserve_exact(len).is_err() {
            self.used -= bytes;
            return Err(PlanError::OutOfMemory(bytes));
        }
        Ok(table)
    }

    /// Runs `build`, returning every byte it charged if it fails.
    ///
    /// Only for allocations that are dropped together with a failed result. Anything `build`
    /// caches elsewhere must be charged outside of it.
    pub fn transaction<T>(
        &mut self,
        build: impl FnOnce(&mut Arena) -> Result<T, PlanError>,
    ) -> Result<T, PlanError> {
        let used = self.used;
        let result = build(self);
        if result.is_err() {
            self.used = used;
        }
        result
    }
}
