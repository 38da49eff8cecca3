use std::fmt;
use std::sync::Arc;

use crate::algorithm::butterflies::{Butterfly1, Butterfly4, Butterfly8};
use crate::algorithm::radixn::conj_multiply;
use crate::common::check_buffer;
use crate::inner_pass::InnerPass;
use crate::modulation::{Boundary, ComplexBoundary, FrequencyOffsetRealBoundary, PlanLayout};
use crate::vector::{F32x4, F32x8, LaneVector, LaneWidth};
use crate::Modulation;

/// A precomputed transform of one length and modulation.
///
/// Plans are built by [`FftPlanner`](crate::FftPlanner) and are immutable, so one plan can
/// be shared between threads as long as every call gets its own buffers.
///
/// Every buffer passed to a plan must hold exactly [`buffer_len`](Plan::buffer_len) floats:
/// interleaved `(re, im)` pairs for complex data, plain samples for the real input of a
/// `FrequencyOffsetReal` plan. Work buffers are scratch space; their contents on return are
/// unspecified. Passing a buffer of any other length panics.
///
/// ~~~
/// use convfft::{FftPlanner, Modulation};
///
/// let mut planner = FftPlanner::new();
/// let plan = planner.plan(64, Modulation::Complex).unwrap();
///
/// let mut signal = vec![0.0f32; plan.buffer_len()];
/// signal[0] = 1.0;
/// let mut spectrum = vec![0.0f32; plan.buffer_len()];
/// let mut work = vec![0.0f32; plan.buffer_len()];
/// plan.forward(&signal, &mut spectrum, &mut work);
///
/// // the spectrum of an impulse at t = 0 is flat
/// assert!(spectrum.chunks(2).all(|bin| (bin[0] - 1.0).abs() < 1e-6 && bin[1].abs() < 1e-6));
/// ~~~
pub struct Plan {
    len: usize,
    modulation: Modulation,
    lanes: LaneWidth,
    twiddles: Box<[f32]>,
    stages: Box<[Arc<InnerPass>]>,
}

macro_rules! with_boundary {
    ($plan:expr, $func:ident($($arg:expr),*)) => {
        match ($plan.modulation, $plan.lanes) {
            (Modulation::Complex, LaneWidth::One) => {
                $func::<ComplexBoundary<f32, Butterfly1>>($plan, $($arg),*)
            }
            (Modulation::Complex, LaneWidth::Four) => {
                $func::<ComplexBoundary<F32x4, Butterfly4>>($plan, $($arg),*)
            }
            (Modulation::Complex, LaneWidth::Eight) => {
                $func::<ComplexBoundary<F32x8, Butterfly8>>($plan, $($arg),*)
            }
            (Modulation::FrequencyOffsetReal, _) => {
                $func::<FrequencyOffsetRealBoundary>($plan, $($arg),*)
            }
        }
    };
}

impl Plan {
    pub(crate) fn new(len: usize, modulation: Modulation, layout: PlanLayout) -> Self {
        Self {
            len,
            modulation,
            lanes: layout.lanes,
            twiddles: layout.twiddles,
            stages: layout.stages,
        }
    }

    /// The length this plan was requested with: complex samples for `Complex`, real samples
    /// for `FrequencyOffsetReal`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Plans are never empty: every modulation needs a length of at least 2.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    /// Number of complex bins in a spectrum.
    pub fn bins(&self) -> usize {
        self.modulation.bins(self.len)
    }

    /// Number of `f32`s in every buffer this plan reads or writes.
    pub fn buffer_len(&self) -> usize {
        self.modulation.buffer_len(self.len)
    }

    /// The factor by which `inverse(forward(x))` and `convolve` scale their results.
    pub fn inverse_scale(&self) -> f32 {
        self.modulation.inverse_scale(self.len)
    }

    /// The kernel set executing this plan.
    pub fn lanes(&self) -> LaneWidth {
        self.lanes
    }

    /// Length of the transform each lane runs between the boundary stages.
    pub fn inner_len(&self) -> usize {
        self.stages[0].len()
    }

    /// The radices of the inner chain, outermost first.
    pub fn stage_radices(&self) -> Vec<usize> {
        self.stages.iter().map(|pass| pass.radix()).collect()
    }

    /// Computes the spectrum of `input` into `output` in ascending frequency order.
    pub fn forward(&self, input: &[f32], output: &mut [f32], work: &mut [f32]) {
        self.check_buffers(&[("input", input.len()), ("output", output.len()), ("work", work.len())]);
        with_boundary!(self, forward_outofplace(input, output, work))
    }

    /// Replaces the contents of `buffer` with its spectrum.
    pub fn forward_inplace(&self, buffer: &mut [f32], work: &mut [f32]) {
        self.check_buffers(&[("buffer", buffer.len()), ("work", work.len())]);
        with_boundary!(self, forward_inplace(buffer, work))
    }

    /// Transforms a spectrum back into the signal domain, scaled by [`inverse_scale`](Plan::inverse_scale).
    pub fn inverse(&self, input: &[f32], output: &mut [f32], work: &mut [f32]) {
        self.check_buffers(&[("input", input.len()), ("output", output.len()), ("work", work.len())]);
        with_boundary!(self, inverse_outofplace(input, output, work))
    }

    pub fn inverse_inplace(&self, buffer: &mut [f32], work: &mut [f32]) {
        self.check_buffers(&[("buffer", buffer.len()), ("work", work.len())]);
        with_boundary!(self, inverse_inplace(buffer, work))
    }

    /// Converts a filter impulse response into the layout `convolve` expects.
    ///
    /// The result is an unordered spectrum and only meaningful as the `kernel` argument of
    /// this plan's `convolve`.
    pub fn get_kernel(&self, input: &[f32], output: &mut [f32]) {
        self.check_buffers(&[("input", input.len()), ("output", output.len())]);
        with_boundary!(self, get_kernel(input, output))
    }

    /// Convolves `input` with a kernel produced by [`get_kernel`](Plan::get_kernel).
    ///
    /// Complex plans compute the cyclic convolution, `FrequencyOffsetReal` plans the negacyclic
    /// one; both are scaled by [`inverse_scale`](Plan::inverse_scale). When the signal and the
    /// filter together span no more than `len` samples the result equals the scaled linear
    /// convolution.
    pub fn convolve(&self, input: &[f32], kernel: &[f32], output: &mut [f32], work: &mut [f32]) {
        self.check_buffers(&[
            ("input", input.len()),
            ("kernel", kernel.len()),
            ("output", output.len()),
            ("work", work.len()),
        ]);
        with_boundary!(self, convolve(input, kernel, output, work))
    }

    pub fn convolve_inplace(&self, buffer: &mut [f32], kernel: &[f32], work: &mut [f32]) {
        self.check_buffers(&[("buffer", buffer.len()), ("kernel", kernel.len()), ("work", work.len())]);
        with_boundary!(self, convolve_inplace(buffer, kernel, work))
    }

    #[inline]
    fn check_buffers(&self, buffers: &[(&str, usize)]) {
        let expected = self.buffer_len();
        for (name, len) in buffers {
            check_buffer(name, *len, expected);
        }
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("len", &self.len)
            .field("modulation", &self.modulation)
            .field("lanes", &self.lanes)
            .field("stages", &self.stage_radices())
            .finish()
    }
}

/// Runs every inner pass as a Stockham stage, alternating between the two buffers.
///
/// The result ends up in `src` for an even number of stages and in `dst` otherwise.
fn stockham_chain<'a, V: LaneVector>(
    stages: &[Arc<InnerPass>],
    mut src: &'a mut [f32],
    mut dst: &'a mut [f32],
) {
    let mut rows = 1;
    for pass in stages {
        pass.stockham::<V>(src, dst, rows);
        rows *= pass.radix();
        std::mem::swap(&mut src, &mut dst);
    }
}

/// In-place decimation in frequency through the whole chain, leaving the spectrum in
/// digit-reversed order.
fn dif_chain<V: LaneVector>(stages: &[Arc<InnerPass>], buffer: &mut [f32]) {
    let mut nfft = 1;
    for pass in stages {
        pass.dif::<V>(buffer, nfft);
        nfft *= pass.radix();
    }
}

/// Undoes the ordering of `dif_chain`, running the passes innermost first.
fn dit_chain<V: LaneVector>(stages: &[Arc<InnerPass>], buffer: &mut [f32]) {
    let inner_len = stages[0].len();
    for pass in stages.iter().rev() {
        pass.dit::<V>(buffer, inner_len / pass.len());
    }
}

fn forward_outofplace<M: Boundary>(plan: &Plan, input: &[f32], output: &mut [f32], work: &mut [f32]) {
    let stages = &plan.stages[..];
    if stages.len() % 2 == 0 {
        M::forward_first(plan.len, &plan.twiddles, input, work);
        stockham_chain::<M::Lanes>(stages, work, output);
    } else {
        M::forward_first(plan.len, &plan.twiddles, input, output);
        stockham_chain::<M::Lanes>(stages, output, work);
    }
    M::forward_reorder(plan.len, work, output);
}

fn forward_inplace<M: Boundary>(plan: &Plan, buffer: &mut [f32], work: &mut [f32]) {
    let stages = &plan.stages[..];
    M::forward_first(plan.len, &plan.twiddles, buffer, work);
    stockham_chain::<M::Lanes>(stages, work, buffer);
    if stages.len() % 2 == 1 {
        work.copy_from_slice(buffer);
    }
    M::forward_reorder(plan.len, work, buffer);
}

fn inverse_outofplace<M: Boundary>(plan: &Plan, input: &[f32], output: &mut [f32], work: &mut [f32]) {
    let stages = &plan.stages[..];
    if stages.len() % 2 == 0 {
        M::inverse_reorder(plan.len, input, work);
        stockham_chain::<M::Lanes>(stages, work, output);
    } else {
        M::inverse_reorder(plan.len, input, output);
        stockham_chain::<M::Lanes>(stages, output, work);
    }
    M::inverse_last(plan.len, &plan.twiddles, work, output);
}

fn inverse_inplace<M: Boundary>(plan: &Plan, buffer: &mut [f32], work: &mut [f32]) {
    let stages = &plan.stages[..];
    M::inverse_reorder(plan.len, buffer, work);
    stockham_chain::<M::Lanes>(stages, work, buffer);
    if stages.len() % 2 == 1 {
        work.copy_from_slice(buffer);
    }
    M::inverse_last(plan.len, &plan.twiddles, work, buffer);
}

fn get_kernel<M: Boundary>(plan: &Plan, input: &[f32], output: &mut [f32]) {
    M::forward_first(plan.len, &plan.twiddles, input, output);
    dif_chain::<M::Lanes>(&plan.stages, output);
}

fn convolve<M: Boundary>(
    plan: &Plan,
    input: &[f32],
    kernel: &[f32],
    output: &mut [f32],
    work: &mut [f32],
) {
    M::forward_first(plan.len, &plan.twiddles, input, work);
    dif_chain::<M::Lanes>(&plan.stages, work);
    conj_multiply::<M::Lanes>(work, kernel);
    dit_chain::<M::Lanes>(&plan.stages, work);
    M::inverse_last(plan.len, &plan.twiddles, work, output);
}

fn convolve_inplace<M: Boundary>(plan: &Plan, buffer: &mut [f32], kernel: &[f32], work: &mut [f32]) {
    M::forward_first(plan.len, &plan.twiddles, buffer, work);
    dif_chain::<M::Lanes>(&plan.stages, work);
    conj_multiply::<M::Lanes>(work, kernel);
    dit_chain::<M::Lanes>(&plan.stages, work);
    M::inverse_last(plan.len, &plan.twiddles, work, buffer);
}
