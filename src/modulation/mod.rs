//! Modulations adapt the lane-parallel complex inner chain to a concrete transform.
//!
//! A modulation owns the first and last stage of every plan (the "boundary"): it folds the
//! caller's samples into `WIDTH` independent lanes, and after the inner chain it reorders the
//! lanes back into caller-visible bins. The inner chain itself never changes between
//! modulations.

mod complex;
mod real;

use std::mem::size_of;
use std::sync::Arc;

use crate::algorithm::butterflies::Butterfly;
use crate::algorithm::radixn::transpose_tile;
use crate::arena::Arena;
use crate::inner_pass::InnerPass;
use crate::twiddles;
use crate::vector::{ComplexLanes, LaneVector, LaneWidth};
use crate::PlanError;

pub(crate) use self::complex::ComplexBoundary;
pub(crate) use self::real::FrequencyOffsetRealBoundary;

/// The transform flavor a plan computes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modulation {
    /// Complex DFT `X[k] = Σ x[n]·e^{-2πi·nk/L}` over `L` interleaved complex samples.
    ///
    /// The inverse scales by `L`.
    Complex,
    /// Half-bin shifted DFT of `L` real samples, `X[k] = Σ x[n]·e^{-2πi·n(k+½)/L}` for
    /// `k < L/2`, returned as `L/2` interleaved complex bins. `L` must be a multiple of 32.
    ///
    /// The inverse scales by `L/2`; convolution computes `L/2` times the negacyclic convolution.
    FrequencyOffsetReal,
}

impl Modulation {
    /// Number of complex output bins for a plan of length `len`.
    pub fn bins(self, len: usize) -> usize {
        match self {
            Modulation::Complex => len,
            Modulation::FrequencyOffsetReal => len / 2,
        }
    }

    /// Number of `f32`s every buffer passed to a plan of length `len` must hold.
    pub fn buffer_len(self, len: usize) -> usize {
        match self {
            Modulation::Complex => 2 * len,
            Modulation::FrequencyOffsetReal => len,
        }
    }

    /// The factor by which `inverse(forward(x))` exceeds `x`.
    pub fn inverse_scale(self, len: usize) -> f32 {
        self.bins(len) as f32
    }

    /// Lane width the boundary folds a length `len` transform into.
    ///
    /// Complex plans take 8 lanes for multiples of 8 and 4 lanes for multiples of 4, as long
    /// as every lane keeps at least two points, and a single lane otherwise.
    pub(crate) fn lanes(self, len: usize, max_lanes: LaneWidth) -> LaneWidth {
        match self {
            Modulation::Complex => {
                let fits = |lanes: LaneWidth| {
                    max_lanes >= lanes && len % lanes.width() == 0 && len / lanes.width() >= 2
                };
                if fits(LaneWidth::Eight) {
                    LaneWidth::Eight
                } else if fits(LaneWidth::Four) {
                    LaneWidth::Four
                } else {
                    LaneWidth::One
                }
            }
            Modulation::FrequencyOffsetReal => LaneWidth::Four,
        }
    }

    /// Lane width and inner chain length of a plan of length `len`.
    ///
    /// Panics if `len` is not supported by this modulation.
    pub(crate) fn shape(self, len: usize, max_lanes: LaneWidth) -> (LaneWidth, usize) {
        match self {
            Modulation::Complex => {
                assert!(len >= 2, "Complex plans require a length of at least 2. Got {}", len);
                let lanes = self.lanes(len, max_lanes);
                (lanes, len / lanes.width())
            }
            Modulation::FrequencyOffsetReal => {
                assert!(
                    len >= 32 && len % 32 == 0,
                    "FrequencyOffsetReal plans require a length that is a multiple of 32. Got {}",
                    len
                );
                (LaneWidth::Four, len / 8)
            }
        }
    }

    /// Builds the boundary table of a plan whose inner chain starts at `inner`.
    pub(crate) fn init(
        self,
        len: usize,
        lanes: LaneWidth,
        inner: &Arc<InnerPass>,
        arena: &mut Arena,
    ) -> Result<PlanLayout, PlanError> {
        let stages = inner.chain();
        arena.reserve(stages.len() * size_of::<Arc<InnerPass>>())?;

        let twiddles = match (self, lanes) {
            (Modulation::Complex, LaneWidth::One) => Box::default(),
            (Modulation::Complex, _) => {
                twiddles::complex_boundary_twiddles(arena, len, lanes.width())?
            }
            (Modulation::FrequencyOffsetReal, _) => twiddles::real_boundary_twiddles(arena, len)?,
        };

        Ok(PlanLayout {
            lanes,
            twiddles,
            stages: stages.into_boxed_slice(),
        })
    }
}

/// Everything a modulation decides about a plan.
pub(crate) struct PlanLayout {
    pub lanes: LaneWidth,
    pub twiddles: Box<[f32]>,
    pub stages: Box<[Arc<InnerPass>]>,
}

/// The four boundary kernels of one modulation at one lane width.
///
/// Buffers in lane layout hold `len / WIDTH` elements (per lane, one complex sample of each
/// of the `WIDTH` sub-transforms); caller buffers hold `Modulation::buffer_len` floats.
pub(crate) trait Boundary {
    type Lanes: LaneVector;

    /// Folds caller samples into lane layout, applying the boundary butterfly and twiddles.
    fn forward_first(len: usize, twiddles: &[f32], input: &[f32], output: &mut [f32]);

    /// Converts the naturally ordered lane-layout spectrum into caller bins.
    fn forward_reorder(len: usize, input: &[f32], output: &mut [f32]);

    /// Converts caller bins into conjugated lane layout.
    fn inverse_reorder(len: usize, input: &[f32], output: &mut [f32]);

    /// Undoes `forward_first` on a conjugated spectrum, producing scaled caller samples.
    fn inverse_last(len: usize, twiddles: &[f32], input: &[f32], output: &mut [f32]);
}

/// Butterflies `WIDTH` rows across lanes, applies one tile of lane twiddles, transposes and
/// stores the first `count` resulting elements from `first` on.
#[inline(always)]
fn dif_tile<V: LaneVector, B: Butterfly>(
    rows: &mut [ComplexLanes<V>],
    twiddles: &[f32],
    output: &mut [f32],
    first: usize,
    count: usize,
) {
    B::perform(rows);
    for m in 1..V::WIDTH {
        rows[m] = rows[m].mul(ComplexLanes::load(twiddles, m - 1));
    }
    transpose_tile(rows);
    for (l, row) in rows[..count].iter().enumerate() {
        row.store(output, first + l);
    }
}

/// Transpose of `dif_tile`: loads `count` elements from `first` on (the rest of the tile is
/// zero), transposes, applies the twiddles and butterflies across lanes.
#[inline(always)]
fn dit_tile<V: LaneVector, B: Butterfly>(
    input: &[f32],
    first: usize,
    count: usize,
    twiddles: &[f32],
    rows: &mut [ComplexLanes<V>],
) {
    for (l, row) in rows.iter_mut().enumerate() {
        *row = if l < count {
            ComplexLanes::load(input, first + l)
        } else {
            ComplexLanes::zero()
        };
    }
    transpose_tile(rows);
    for m in 1..V::WIDTH {
        rows[m] = rows[m].mul(ComplexLanes::load(twiddles, m - 1));
    }
    B::perform(rows);
}
