use std::fmt;
use std::sync::Arc;

use crate::arena::Arena;
use crate::inner_pass::InnerPassCache;
use crate::{Modulation, Plan, PlanError, PlannerOptions};

/// The FFT planner builds and caches [`Plan`]s.
///
/// Plans are memoized by `(length, modulation)`: requesting the same pair twice returns the
/// same `Arc`. Plans of different lengths share the radix stages they have in common, so a
/// planner that serves many related lengths keeps its twiddle tables small.
///
/// Building a plan needs `&mut self`; executing one only needs `&Plan`. Dropping the planner
/// releases its caches, while plans already handed out stay valid for as long as they are held.
///
/// ~~~
/// use std::sync::Arc;
/// use convfft::{FftPlanner, Modulation};
///
/// let mut planner = FftPlanner::new();
/// let real = planner.plan(256, Modulation::FrequencyOffsetReal).unwrap();
/// let again = planner.plan_real(256).unwrap();
/// assert!(Arc::ptr_eq(&real, &again));
/// assert_eq!(real.bins(), 128);
/// ~~~
pub struct FftPlanner {
    options: PlannerOptions,
    arena: Arena,
    inner_passes: InnerPassCache,
    // sorted by descending length
    plans: Vec<Arc<Plan>>,
}

impl FftPlanner {
    /// Creates a new planner with default options.
    pub fn new() -> Self {
        Self::with_options(PlannerOptions::default())
    }

    pub fn with_options(options: PlannerOptions) -> Self {
        Self {
            arena: Arena::new(options.memory_limit),
            options,
            inner_passes: InnerPassCache::new(),
            plans: Vec::new(),
        }
    }

    /// Returns a plan computing transforms of `len` with the given modulation.
    ///
    /// If this planner already built the plan, the cached instance is returned.
    ///
    /// # Panics
    ///
    /// Panics if `len` is not supported: `Complex` needs `len / lanes` to factor into 2, 3, 4,
    /// 5, 6, 8 and 16 (with 5 at most once), `FrequencyOffsetReal` additionally needs a
    /// multiple of 32. [`recommend_convolution_length`](crate::recommend_convolution_length)
    /// always returns an accepted length.
    pub fn plan(&mut self, len: usize, modulation: Modulation) -> Result<Arc<Plan>, PlanError> {
        let mut insert_at = self.plans.len();
        for (index, plan) in self.plans.iter().enumerate() {
            if plan.len() == len && plan.modulation() == modulation {
                return Ok(Arc::clone(plan));
            }
            if plan.len() < len {
                insert_at = index;
                break;
            }
        }

        let (lanes, inner_len) = modulation.shape(len, self.options.max_lanes);
        let inner = self.inner_passes.get_or_build(&mut self.arena, inner_len)?;

        // a failed plan hands back its own bytes; the inner passes above stay cached
        let layout = self.arena.transaction(|arena| {
            arena.reserve_for::<Plan>()?;
            modulation.init(len, lanes, &inner, arena)
        })?;
        let plan = Arc::new(Plan::new(len, modulation, layout));
        self.plans.insert(insert_at, Arc::clone(&plan));
        Ok(plan)
    }

    /// Shorthand for `plan(len, Modulation::Complex)`.
    pub fn plan_complex(&mut self, len: usize) -> Result<Arc<Plan>, PlanError> {
        self.plan(len, Modulation::Complex)
    }

    /// Shorthand for `plan(len, Modulation::FrequencyOffsetReal)`.
    pub fn plan_real(&mut self, len: usize) -> Result<Arc<Plan>, PlanError> {
        self.plan(len, Modulation::FrequencyOffsetReal)
    }

    /// Bytes charged against the memory limit so far.
    pub fn memory_used(&self) -> usize {
        self.arena.used()
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }
}

impl fmt::Debug for FftPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPlanner")
            .field("options", &self.options)
            .field("memory_used", &self.arena.used())
            .field("plans", &self.plans.len())
            .field("inner_passes", &self.inner_passes.len())
            .finish()
    }
}

impl Default for FftPlanner {
    fn default() -> Self {
        Self::new()
    }
}
