use crate::vector::{ComplexLanes, LaneVector, MAX_LANES};

use super::butterflies::{
    Butterfly, Butterfly16, Butterfly2, Butterfly3, Butterfly4, Butterfly5, Butterfly6, Butterfly8,
};

const MAX_RADIX: usize = 16;

/// The radices an inner pass can be built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RadixFactor {
    Factor2,
    Factor3,
    Factor4,
    Factor5,
    Factor6,
    Factor8,
    Factor16,
}

macro_rules! dispatch_radix {
    ($factor:expr, $func:ident::<$v:ty>($($arg:expr),*)) => {
        match $factor {
            RadixFactor::Factor2 => $func::<Butterfly2, $v>($($arg),*),
            RadixFactor::Factor3 => $func::<Butterfly3, $v>($($arg),*),
            RadixFactor::Factor4 => $func::<Butterfly4, $v>($($arg),*),
            RadixFactor::Factor5 => $func::<Butterfly5, $v>($($arg),*),
            RadixFactor::Factor6 => $func::<Butterfly6, $v>($($arg),*),
            RadixFactor::Factor8 => $func::<Butterfly8, $v>($($arg),*),
            RadixFactor::Factor16 => $func::<Butterfly16, $v>($($arg),*),
        }
    };
}

impl RadixFactor {
    pub const fn radix(self) -> usize {
        match self {
            RadixFactor::Factor2 => 2,
            RadixFactor::Factor3 => 3,
            RadixFactor::Factor4 => 4,
            RadixFactor::Factor5 => 5,
            RadixFactor::Factor6 => 6,
            RadixFactor::Factor8 => 8,
            RadixFactor::Factor16 => 16,
        }
    }

    /// Returns the factor with a dedicated base-case kernel of exactly this length.
    pub fn from_base_len(len: usize) -> Option<Self> {
        match len {
            2 => Some(RadixFactor::Factor2),
            3 => Some(RadixFactor::Factor3),
            4 => Some(RadixFactor::Factor4),
            5 => Some(RadixFactor::Factor5),
            6 => Some(RadixFactor::Factor6),
            8 => Some(RadixFactor::Factor8),
            16 => Some(RadixFactor::Factor16),
            _ => None,
        }
    }

    pub fn innermost<V: LaneVector>(self, buffer: &mut [f32], nfft: usize) {
        dispatch_radix!(self, innermost::<V>(buffer, nfft))
    }

    pub fn dif<V: LaneVector>(self, buffer: &mut [f32], nfft: usize, columns: usize, twiddles: &[f32]) {
        dispatch_radix!(self, dif_strided::<V>(buffer, nfft, columns, twiddles))
    }

    pub fn dit<V: LaneVector>(self, buffer: &mut [f32], nfft: usize, columns: usize, twiddles: &[f32]) {
        dispatch_radix!(self, dit_strided::<V>(buffer, nfft, columns, twiddles))
    }

    pub fn stockham<V: LaneVector>(
        self,
        input: &[f32],
        output: &mut [f32],
        rows: usize,
        columns: usize,
        twiddles: &[f32],
    ) {
        dispatch_radix!(self, stockham::<V>(input, output, rows, columns, twiddles))
    }
}

#[inline(always)]
fn twiddle_at<V: LaneVector>(
    value: ComplexLanes<V>,
    twiddles: &[f32],
    radix: usize,
    column: usize,
    row: usize,
) -> ComplexLanes<V> {
    let index = 2 * (column * (radix - 1) + row - 1);
    value.mul_scalar(twiddles[index], twiddles[index + 1])
}

/// Runs `nfft` untwiddled butterflies over consecutive blocks of `B::RADIX` elements.
pub(crate) fn innermost<B: Butterfly, V: LaneVector>(buffer: &mut [f32], nfft: usize) {
    let block_floats = B::RADIX * 2 * V::WIDTH;
    let mut scratch = [ComplexLanes::<V>::zero(); MAX_RADIX];
    let rows = &mut scratch[..B::RADIX];

    for block in buffer[..nfft * block_floats].chunks_exact_mut(block_floats) {
        for (k, row) in rows.iter_mut().enumerate() {
            *row = ComplexLanes::load(block, k);
        }
        B::perform(rows);
        for (k, row) in rows.iter().enumerate() {
            row.store(block, k);
        }
    }
}

/// In-place decimation-in-frequency stage: `nfft` blocks of `B::RADIX * columns` elements,
/// butterflies across stride `columns`, twiddles applied after the butterfly.
///
/// Outputs stay in the positions they were read from, so a chain of these stages leaves the
/// spectrum in digit-reversed order.
pub(crate) fn dif_strided<B: Butterfly, V: LaneVector>(
    buffer: &mut [f32],
    nfft: usize,
    columns: usize,
    twiddles: &[f32],
) {
    let block_len = B::RADIX * columns;
    let mut scratch = [ComplexLanes::<V>::zero(); MAX_RADIX];
    let rows = &mut scratch[..B::RADIX];

    for block in 0..nfft {
        let base = block * block_len;
        for column in 0..columns {
            for (k, row) in rows.iter_mut().enumerate() {
                *row = ComplexLanes::load(buffer, base + column + k * columns);
            }

            B::perform(rows);

            rows[0].store(buffer, base + column);
            for q in 1..B::RADIX {
                let value = twiddle_at(rows[q], twiddles, B::RADIX, column, q);
                value.store(buffer, base + column + q * columns);
            }
        }
    }
}

/// In-place decimation-in-time stage, the transpose of `dif_strided`: twiddles first, then the
/// butterfly. Consumes digit-reversed input and restores natural order across a full chain.
pub(crate) fn dit_strided<B: Butterfly, V: LaneVector>(
    buffer: &mut [f32],
    nfft: usize,
    columns: usize,
    twiddles: &[f32],
) {
    let block_len = B::RADIX * columns;
    let mut scratch = [ComplexLanes::<V>::zero(); MAX_RADIX];
    let rows = &mut scratch[..B::RADIX];

    for block in 0..nfft {
        let base = block * block_len;
        for column in 0..columns {
            rows[0] = ComplexLanes::load(buffer, base + column);
            for q in 1..B::RADIX {
                let value = ComplexLanes::load(buffer, base + column + q * columns);
                rows[q] = twiddle_at(value, twiddles, B::RADIX, column, q);
            }

            B::perform(rows);

            for (k, row) in rows.iter().enumerate() {
                row.store(buffer, base + column + k * columns);
            }
        }
    }
}

/// Out-of-place Stockham auto-sort stage.
///
/// `rows` is the product of the radices already applied. Block `row` of `B::RADIX * columns`
/// input elements is transformed and scattered to `row * columns + column + q * columns * rows`,
/// so no reordering pass is needed at the end of a chain. An empty twiddle table means the
/// innermost stage (`columns == 1`).
pub(crate) fn stockham<B: Butterfly, V: LaneVector>(
    input: &[f32],
    output: &mut [f32],
    rows: usize,
    columns: usize,
    twiddles: &[f32],
) {
    let block_len = B::RADIX * columns;
    let out_stride = columns * rows;
    let mut scratch = [ComplexLanes::<V>::zero(); MAX_RADIX];
    let values = &mut scratch[..B::RADIX];

    for row in 0..rows {
        let base = row * block_len;
        for column in 0..columns {
            for (k, value) in values.iter_mut().enumerate() {
                *value = ComplexLanes::load(input, base + column + k * columns);
            }

            B::perform(values);

            let first = row * columns + column;
            values[0].store(output, first);
            for q in 1..B::RADIX {
                let value = if twiddles.is_empty() {
                    values[q]
                } else {
                    twiddle_at(values[q], twiddles, B::RADIX, column, q)
                };
                value.store(output, first + q * out_stride);
            }
        }
    }
}

/// Replaces every element of `buffer` with `conj(buffer * kernel)`.
///
/// Both operands are in digit-reversed kernel order; the conjugation lets the forward-only
/// decimation-in-time chain that follows compute the inverse transform.
pub(crate) fn conj_multiply<V: LaneVector>(buffer: &mut [f32], kernel: &[f32]) {
    let element = 2 * V::WIDTH;
    for (value, filter) in buffer
        .chunks_exact_mut(element)
        .zip(kernel.chunks_exact(element))
    {
        let product = ComplexLanes::<V>::load(value, 0).mul(ComplexLanes::load(filter, 0));
        product.conj().store(value, 0);
    }
}

/// Transposes one `WIDTH x WIDTH` tile of complex lanes in place.
#[inline(always)]
pub(crate) fn transpose_tile<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
    let mut re = [V::zero(); MAX_LANES];
    let mut im = [V::zero(); MAX_LANES];
    for (k, row) in rows.iter().enumerate() {
        re[k] = row.re;
        im[k] = row.im;
    }
    V::transpose(&mut re[..V::WIDTH]);
    V::transpose(&mut im[..V::WIDTH]);
    for (k, row) in rows.iter_mut().enumerate() {
        *row = ComplexLanes { re: re[k], im: im[k] };
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::arena::Arena;
    use crate::test_utils::{compare_vectors, dft, random_signal};
    use crate::twiddles::stage_twiddles;
    use crate::vector::F32x4;
    use num_complex::Complex;

    fn to_lane_buffer(signal: &[Complex<f32>]) -> Vec<f32> {
        signal.iter().flat_map(|c| [c.re, c.im]).collect()
    }

    fn from_lane_buffer(buffer: &[f32]) -> Vec<Complex<f32>> {
        buffer.chunks_exact(2).map(|c| Complex::new(c[0], c[1])).collect()
    }

    // single-lane 12 = 4 x 3: one twiddled stage followed by an innermost stage
    #[test]
    fn test_stockham_two_stage() {
        let mut arena = Arena::new(None);
        let twiddles = stage_twiddles(&mut arena, 4, 3).unwrap();
        let signal = random_signal(12);
        let input = to_lane_buffer(&signal);
        let mut scratch = vec![0.0; 24];
        let mut output = vec![0.0; 24];

        RadixFactor::Factor4.stockham::<f32>(&input, &mut scratch, 1, 3, &twiddles);
        RadixFactor::Factor3.stockham::<f32>(&scratch, &mut output, 4, 1, &[]);

        assert!(compare_vectors(&from_lane_buffer(&output), &dft(&signal)));
    }

    // a DIF chain followed by the DIT chain in reverse order computes the DFT twice,
    // which reverses the signal and scales it by the length
    #[test]
    fn test_dif_then_dit() {
        let mut arena = Arena::new(None);
        let twiddles = stage_twiddles(&mut arena, 3, 8).unwrap();
        let signal = random_signal(24);
        let mut buffer = to_lane_buffer(&signal);

        RadixFactor::Factor3.dif::<f32>(&mut buffer, 1, 8, &twiddles);
        RadixFactor::Factor8.innermost::<f32>(&mut buffer, 3);
        RadixFactor::Factor8.innermost::<f32>(&mut buffer, 3);
        RadixFactor::Factor3.dit::<f32>(&mut buffer, 1, 8, &twiddles);

        let expected: Vec<Complex<f32>> = (0..24).map(|n| signal[(24 - n) % 24] * 24.0).collect();
        assert!(compare_vectors(&from_lane_buffer(&buffer), &expected));
    }

    #[test]
    fn test_lanes_are_independent() {
        let signals: Vec<Vec<Complex<f32>>> = (0..4).map(|l| random_signal(8 + l)[l..].to_vec()).collect();
        let mut input = vec![0.0; 8 * 8];
        for (lane, signal) in signals.iter().enumerate() {
            for (k, value) in signal.iter().enumerate() {
                input[k * 8 + lane] = value.re;
                input[k * 8 + 4 + lane] = value.im;
            }
        }
        let mut output = vec![0.0; 8 * 8];
        RadixFactor::Factor8.stockham::<F32x4>(&input, &mut output, 1, 1, &[]);

        for (lane, signal) in signals.iter().enumerate() {
            let actual: Vec<Complex<f32>> = (0..8)
                .map(|k| Complex::new(output[k * 8 + lane], output[k * 8 + 4 + lane]))
                .collect();
            assert!(compare_vectors(&actual, &dft(signal)), "lane = {}", lane);
        }
    }

    #[test]
    fn test_conj_multiply() {
        let mut buffer = vec![1.0, 2.0, 3.0, -1.0];
        let kernel = vec![0.5, -1.0, 2.0, 2.0];
        conj_multiply::<f32>(&mut buffer, &kernel);
        // (1+2i)(0.5-i) = 2.5, (3-i)(2+2i) = 8+4i
        assert_eq!(buffer, vec![2.5, 0.0, 8.0, -4.0]);
    }
}
