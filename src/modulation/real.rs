use crate::algorithm::butterflies::Butterfly4;
use crate::twiddles::REAL_GROUP_TWIDDLES;
use crate::vector::{ComplexLanes, F32x4, LaneVector};

use super::{dif_tile, dit_tile, Boundary};

/// Offset of the radix-4 twiddle rows inside one group of the boundary table.
const STAGE_TWIDDLES: usize = 32;

/// Boundary kernels of the frequency-offset real modulation.
///
/// With `N = len / 2`, the real input folds into the complex sequence
/// `z[m] = (x[m] - i·x[m + N])·e^{-iπm/(2N)}` whose `N`-point DFT `Z` holds every bin:
/// `X[2p] = Z[p]` and `X[2p + 1] = conj(Z[N - 1 - p])`. The fold is fused with a radix-4
/// decimation in frequency so the inner chain runs four lanes of length `N / 4`.
pub(crate) struct FrequencyOffsetRealBoundary;

impl Boundary for FrequencyOffsetRealBoundary {
    type Lanes = F32x4;

    fn forward_first(len: usize, twiddles: &[f32], input: &[f32], output: &mut [f32]) {
        let half = len / 2;
        let quarter = half / 4;
        let mut rows = [ComplexLanes::<F32x4>::zero(); 4];

        for (group, table) in twiddles
            .chunks_exact(REAL_GROUP_TWIDDLES)
            .take(quarter / 4)
            .enumerate()
        {
            let first = group * 4;
            for (q, row) in rows.iter_mut().enumerate() {
                let position = first + q * quarter;
                let folded = ComplexLanes {
                    re: F32x4::load(&input[position..]),
                    im: -F32x4::load(&input[half + position..]),
                };
                *row = folded.mul(ComplexLanes::load(table, q));
            }
            dif_tile::<F32x4, Butterfly4>(&mut rows, &table[STAGE_TWIDDLES..], output, first, 4);
        }
    }

    fn forward_reorder(len: usize, input: &[f32], output: &mut [f32]) {
        let elements = len / 8;
        for i in 0..elements / 2 {
            let low = ComplexLanes::<F32x4>::load(input, i);
            let high = ComplexLanes::<F32x4>::load(input, elements - 1 - i);

            // odd bins come from the mirrored upper half, conjugated
            let mirror_re = high.re.reverse();
            let mirror_im = (-high.im).reverse();

            let (re_a, re_b) = low.re.interleave(mirror_re);
            let (im_a, im_b) = low.im.interleave(mirror_im);
            let out = &mut output[16 * i..];
            ComplexLanes { re: re_a, im: im_a }.store_interleaved(out);
            ComplexLanes { re: re_b, im: im_b }.store_interleaved(&mut out[8..]);
        }
    }

    fn inverse_reorder(len: usize, input: &[f32], output: &mut [f32]) {
        let elements = len / 8;
        for i in 0..elements / 2 {
            let bins = &input[16 * i..];
            let a = ComplexLanes::<F32x4>::load_interleaved(bins);
            let b = ComplexLanes::<F32x4>::load_interleaved(&bins[8..]);

            let (re_even, re_odd) = a.re.deinterleave(b.re);
            let (im_even, im_odd) = a.im.deinterleave(b.im);

            ComplexLanes {
                re: re_even,
                im: -im_even,
            }
            .store(output, i);
            ComplexLanes {
                re: re_odd.reverse(),
                im: im_odd.reverse(),
            }
            .store(output, elements - 1 - i);
        }
    }

    fn inverse_last(len: usize, twiddles: &[f32], input: &[f32], output: &mut [f32]) {
        let half = len / 2;
        let quarter = half / 4;
        let mut rows = [ComplexLanes::<F32x4>::zero(); 4];

        for (group, table) in twiddles
            .chunks_exact(REAL_GROUP_TWIDDLES)
            .take(quarter / 4)
            .enumerate()
        {
            let first = group * 4;
            dit_tile::<F32x4, Butterfly4>(input, first, 4, &table[STAGE_TWIDDLES..], &mut rows);
            for (q, row) in rows.iter().enumerate() {
                // the tile holds the conjugate of the scaled fold, so the rotation is undone
                // by multiplying with it again
                let unfolded = row.mul(ComplexLanes::load(table, q));
                let position = first + q * quarter;
                unfolded.re.store(&mut output[position..]);
                unfolded.im.store(&mut output[half + position..]);
            }
        }
    }
}
