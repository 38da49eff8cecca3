use std::marker::PhantomData;

use crate::algorithm::butterflies::Butterfly;
use crate::vector::{ComplexLanes, LaneVector, MAX_LANES};

use super::{dif_tile, dit_tile, Boundary};

/// Boundary kernels of the complex modulation.
///
/// The first stage is a radix-`WIDTH` decimation in frequency across the `WIDTH` strided
/// sections of the input, so lane `m` of the inner chain computes the bins `k ≡ m (mod WIDTH)`.
/// Positions are processed in tiles of `WIDTH`; the last tile of a section may be partial.
/// `B::RADIX` must equal `V::WIDTH`.
pub(crate) struct ComplexBoundary<V, B>(PhantomData<(V, B)>);

/// Loads `count` interleaved complex values into the low lanes, zeroing the rest.
#[inline(always)]
fn load_positions<V: LaneVector>(src: &[f32], count: usize) -> ComplexLanes<V> {
    if count == V::WIDTH {
        return ComplexLanes::load_interleaved(src);
    }
    let mut padded = [0.0; 2 * MAX_LANES];
    padded[..2 * count].copy_from_slice(&src[..2 * count]);
    ComplexLanes::load_interleaved(&padded)
}

/// Stores the low `count` lanes as interleaved complex values.
#[inline(always)]
fn store_positions<V: LaneVector>(value: ComplexLanes<V>, dst: &mut [f32], count: usize) {
    if count == V::WIDTH {
        value.store_interleaved(dst);
    } else {
        let mut padded = [0.0; 2 * MAX_LANES];
        value.store_interleaved(&mut padded);
        dst[..2 * count].copy_from_slice(&padded[..2 * count]);
    }
}

impl<V: LaneVector, B: Butterfly> Boundary for ComplexBoundary<V, B> {
    type Lanes = V;

    fn forward_first(len: usize, twiddles: &[f32], input: &[f32], output: &mut [f32]) {
        let lanes = V::WIDTH;
        let section = len / lanes;
        let tile_twiddles = 2 * lanes * (lanes - 1);
        let mut scratch = [ComplexLanes::<V>::zero(); MAX_LANES];
        let rows = &mut scratch[..lanes];

        for (tile, first) in (0..section).step_by(lanes).enumerate() {
            let count = lanes.min(section - first);
            for (q, row) in rows.iter_mut().enumerate() {
                *row = load_positions(&input[2 * (first + q * section)..], count);
            }
            let tile_table = &twiddles[tile * tile_twiddles..];
            dif_tile::<V, B>(rows, tile_table, output, first, count);
        }
    }

    fn forward_reorder(len: usize, input: &[f32], output: &mut [f32]) {
        let element = 2 * V::WIDTH;
        let floats = 2 * len;
        for (src, dst) in input[..floats]
            .chunks_exact(element)
            .zip(output[..floats].chunks_exact_mut(element))
        {
            transpose::transpose(src, dst, V::WIDTH, 2);
        }
    }

    fn inverse_reorder(len: usize, input: &[f32], output: &mut [f32]) {
        let element = 2 * V::WIDTH;
        let floats = 2 * len;
        for (src, dst) in input[..floats]
            .chunks_exact(element)
            .zip(output[..floats].chunks_exact_mut(element))
        {
            transpose::transpose(src, dst, 2, V::WIDTH);
            for im in dst[V::WIDTH..].iter_mut() {
                *im = -*im;
            }
        }
    }

    fn inverse_last(len: usize, twiddles: &[f32], input: &[f32], output: &mut [f32]) {
        let lanes = V::WIDTH;
        let section = len / lanes;
        let tile_twiddles = 2 * lanes * (lanes - 1);
        let mut scratch = [ComplexLanes::<V>::zero(); MAX_LANES];
        let rows = &mut scratch[..lanes];

        for (tile, first) in (0..section).step_by(lanes).enumerate() {
            let count = lanes.min(section - first);
            let tile_table = &twiddles[tile * tile_twiddles..];
            dit_tile::<V, B>(input, first, count, tile_table, rows);
            for (q, row) in rows.iter().enumerate() {
                store_positions(row.conj(), &mut output[2 * (first + q * section)..], count);
            }
        }
    }
}
