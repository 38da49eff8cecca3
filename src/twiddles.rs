use num_complex::Complex;
use num_integer::Integer;
use std::f64::consts::PI;

use crate::arena::Arena;
use crate::PlanError;

/// Computes the forward twiddle factor `e^{-2πi·index/fft_len}`.
///
/// The angle is evaluated in double precision and rounded once.
pub fn compute_twiddle(index: usize, fft_len: usize) -> Complex<f32> {
    let angle = -2.0 * PI * index as f64 / fft_len as f64;
    Complex {
        re: angle.cos() as f32,
        im: angle.sin() as f32,
    }
}

/// Twiddles for one strided radix stage of length `radix * columns`.
///
/// Entry `(j, q)` for `j < columns` and `1 <= q < radix` holds `W_{radix*columns}^{j*q}`
/// as an interleaved `(re, im)` pair at float offset `2 * (j * (radix - 1) + q - 1)`.
pub(crate) fn stage_twiddles(
    arena: &mut Arena,
    radix: usize,
    columns: usize,
) -> Result<Box<[f32]>, PlanError> {
    let fft_len = radix * columns;
    let mut table = arena.alloc_table(2 * columns * (radix - 1))?;
    for j in 0..columns {
        for q in 1..radix {
            let twiddle = compute_twiddle(j * q, fft_len);
            table.push(twiddle.re);
            table.push(twiddle.im);
        }
    }
    Ok(table.into_boxed_slice())
}

/// Pushes one row of lane-parallel twiddles: `WIDTH` real parts then `WIDTH` imaginary parts.
fn push_lane_row(table: &mut Vec<f32>, lanes: usize, mut twiddle: impl FnMut(usize) -> Complex<f32>) {
    let row: Vec<Complex<f32>> = (0..lanes).map(&mut twiddle).collect();
    table.extend(row.iter().map(|c| c.re));
    table.extend(row.iter().map(|c| c.im));
}

/// Boundary table for the complex modulation with `lanes` lanes.
///
/// For each tile of `lanes` consecutive input positions `j0..j0+lanes` and each output lane
/// `m` in `1..lanes`, one lane row holding `W_len^{(j0+l)*m}` for lane `l`. The last tile is
/// padded when `len / lanes` is not a multiple of `lanes`.
pub(crate) fn complex_boundary_twiddles(
    arena: &mut Arena,
    len: usize,
    lanes: usize,
) -> Result<Box<[f32]>, PlanError> {
    let tiles = Integer::div_ceil(&(len / lanes), &lanes);
    let mut table = arena.alloc_table(tiles * (lanes - 1) * 2 * lanes)?;
    for tile in 0..tiles {
        let first = tile * lanes;
        for m in 1..lanes {
            push_lane_row(&mut table, lanes, |l| compute_twiddle((first + l) * m, len));
        }
    }
    Ok(table.into_boxed_slice())
}

/// Floats per group of four positions in the frequency-offset real boundary table.
pub(crate) const REAL_GROUP_TWIDDLES: usize = 56;

/// Boundary table for the frequency-offset real modulation of `len` real samples.
///
/// Each group of four fold positions `n0..n0+4` stores four lane rows of half-bin rotations
/// `e^{-iπ(n0+l+q·N/4)/(2N)}` for quarter `q`, followed by three lane rows of radix-4 twiddles
/// `W_N^{(n0+l)*p}` for `p` in `1..4`, where `N = len / 2`.
pub(crate) fn real_boundary_twiddles(arena: &mut Arena, len: usize) -> Result<Box<[f32]>, PlanError> {
    let half = len / 2;
    let quarter = half / 4;
    let groups = quarter / 4;
    let mut table = arena.alloc_table(groups * REAL_GROUP_TWIDDLES)?;
    for group in 0..groups {
        let first = group * 4;
        for q in 0..4 {
            push_lane_row(&mut table, 4, |l| compute_twiddle(first + l + q * quarter, 2 * len));
        }
        for p in 1..4 {
            push_lane_row(&mut table, 4, |l| compute_twiddle((first + l) * p, half));
        }
    }
    Ok(table.into_boxed_slice())
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::test_utils::compare_vectors;

    #[test]
    fn test_compute_twiddle() {
        let constant = -2f32 * std::f32::consts::PI;
        for len in 1..10 {
            let actual: Vec<Complex<f32>> = (0..len).map(|i| compute_twiddle(i, len)).collect();
            let expected: Vec<Complex<f32>> = (0..len)
                .map(|i| Complex::from_polar(1f32, constant * i as f32 / len as f32))
                .collect();
            assert!(compare_vectors(&actual, &expected), "len = {}", len)
        }
    }

    #[test]
    fn test_stage_layout() {
        let mut arena = Arena::new(None);
        let table = stage_twiddles(&mut arena, 4, 3).unwrap();
        assert_eq!(table.len(), 2 * 3 * 3);

        // (j = 2, q = 3) sits at pair 2 * 3 + 2
        let expected = compute_twiddle(6, 12);
        assert_eq!(table[2 * 8], expected.re);
        assert_eq!(table[2 * 8 + 1], expected.im);
        assert_eq!(arena.used(), table.len() * 4);
    }

    #[test]
    fn test_complex_boundary_layout() {
        let mut arena = Arena::new(None);
        let table = complex_boundary_twiddles(&mut arena, 40, 4).unwrap();
        // ten positions per section take three tiles, the last one padded
        assert_eq!(table.len(), 3 * 3 * 8);

        // third tile, lane row m = 2, lane 1: position 9
        let twiddle = compute_twiddle(18, 40);
        let tile = &table[2 * 24..];
        assert_eq!(tile[8 + 1], twiddle.re);
        assert_eq!(tile[8 + 4 + 1], twiddle.im);
    }

    #[test]
    fn test_real_boundary_layout() {
        let mut arena = Arena::new(None);
        let len = 64;
        let table = real_boundary_twiddles(&mut arena, len).unwrap();
        assert_eq!(table.len(), 2 * REAL_GROUP_TWIDDLES);

        // second group, quarter 1, lane 2: position 4 + 2 + 8
        let rotation = compute_twiddle(14, 128);
        let group = &table[REAL_GROUP_TWIDDLES..];
        assert_eq!(group[8 + 2], rotation.re);
        assert_eq!(group[8 + 4 + 2], rotation.im);

        // second group, radix-4 row p = 2, lane 3: W_32^(7*2)
        let twiddle = compute_twiddle(14, 32);
        assert_eq!(group[32 + 8 + 3], twiddle.re);
        assert_eq!(group[32 + 8 + 4 + 3], twiddle.im);
    }
}
