use crate::LaneWidth;

/// Options controlling how a planner builds plans.
///
/// `FftPlanner::new` uses the defaults: no memory limit and the widest kernel set
/// each length allows.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct PlannerOptions {
    /// Upper bound, in bytes, on everything the planner allocates for its caches.
    /// Plan construction fails with `PlanError::OutOfMemory` once it would be exceeded.
    pub memory_limit: Option<usize>,
    /// Widest lane kernel set the complex modulation may pick.
    ///
    /// The frequency-offset real modulation always runs four lanes.
    pub max_lanes: LaneWidth,
}

impl PlannerOptions {
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    pub fn with_max_lanes(mut self, lanes: LaneWidth) -> Self {
        self.max_lanes = lanes;
        self
    }
}
