use crate::vector::{ComplexLanes, LaneVector};

/// A fixed-size forward DFT applied lane-wise to `RADIX` rows.
///
/// Each lane of the rows is an independent transform, so one call computes
/// `V::WIDTH` DFTs of size `RADIX`. Results replace the rows in natural order.
pub(crate) trait Butterfly {
    const RADIX: usize;

    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]);
}

pub(crate) struct Butterfly1;
pub(crate) struct Butterfly2;
pub(crate) struct Butterfly3;
pub(crate) struct Butterfly4;
pub(crate) struct Butterfly5;
pub(crate) struct Butterfly6;
pub(crate) struct Butterfly8;
pub(crate) struct Butterfly16;

impl Butterfly for Butterfly1 {
    const RADIX: usize = 1;

    #[inline(always)]
    fn perform<V: LaneVector>(_rows: &mut [ComplexLanes<V>]) {}
}

#[inline(always)]
fn butterfly2<V: LaneVector>(a: &mut ComplexLanes<V>, b: &mut ComplexLanes<V>) {
    let temp = *a + *b;
    *b = *a - *b;
    *a = temp;
}

impl Butterfly for Butterfly2 {
    const RADIX: usize = 2;

    #[inline(always)]
    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
        let (first, second) = rows.split_at_mut(1);
        butterfly2(&mut first[0], &mut second[0]);
    }
}

// W_3^1
const TW3_RE: f32 = -0.5;
const TW3_IM: f32 = -0.866_025_4;

#[inline(always)]
fn butterfly3<V: LaneVector>(
    x0: ComplexLanes<V>,
    x1: ComplexLanes<V>,
    x2: ComplexLanes<V>,
) -> [ComplexLanes<V>; 3] {
    let xp = x1 + x2;
    let xn = x1 - x2;
    let sum = x0 + xp;

    let temp_a = x0 + xp.scale(V::splat(TW3_RE));
    let temp_b = xn.rotate_pos90().scale(V::splat(TW3_IM));

    [sum, temp_a + temp_b, temp_a - temp_b]
}

impl Butterfly for Butterfly3 {
    const RADIX: usize = 3;

    #[inline(always)]
    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
        let out = butterfly3(rows[0], rows[1], rows[2]);
        rows[..3].copy_from_slice(&out);
    }
}

impl Butterfly for Butterfly4 {
    const RADIX: usize = 4;

    #[inline(always)]
    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
        // two size-2 columns, a quarter-turn twiddle, then two size-2 rows.
        // the output comes out transposed, so rows 1 and 2 are swapped on store
        let (mut v0, mut v1, mut v2, mut v3) = (rows[0], rows[1], rows[2], rows[3]);

        butterfly2(&mut v0, &mut v2);
        butterfly2(&mut v1, &mut v3);

        v3 = v3.rotate_neg90();

        butterfly2(&mut v0, &mut v1);
        butterfly2(&mut v2, &mut v3);

        rows[0] = v0;
        rows[1] = v2;
        rows[2] = v1;
        rows[3] = v3;
    }
}

// W_5^1 and W_5^2
const TW5_1: (f32, f32) = (0.309_017, -0.951_056_5);
const TW5_2: (f32, f32) = (-0.809_017, -0.587_785_24);

impl Butterfly for Butterfly5 {
    const RADIX: usize = 5;

    #[inline(always)]
    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
        let (tw1_re, tw1_im) = (V::splat(TW5_1.0), V::splat(TW5_1.1));
        let (tw2_re, tw2_im) = (V::splat(TW5_2.0), V::splat(TW5_2.1));
        let x0 = rows[0];

        let x14p = rows[1] + rows[4];
        let x14n = rows[1] - rows[4];
        let x23p = rows[2] + rows[3];
        let x23n = rows[2] - rows[3];
        let sum = x0 + x14p + x23p;

        let b14re_a = x0.re + tw1_re * x14p.re + tw2_re * x23p.re;
        let b14re_b = tw1_im * x14n.im + tw2_im * x23n.im;
        let b23re_a = x0.re + tw2_re * x14p.re + tw1_re * x23p.re;
        let b23re_b = tw2_im * x14n.im - tw1_im * x23n.im;

        let b14im_a = x0.im + tw1_re * x14p.im + tw2_re * x23p.im;
        let b14im_b = tw1_im * x14n.re + tw2_im * x23n.re;
        let b23im_a = x0.im + tw2_re * x14p.im + tw1_re * x23p.im;
        let b23im_b = tw2_im * x14n.re - tw1_im * x23n.re;

        rows[0] = sum;
        rows[1] = ComplexLanes {
            re: b14re_a - b14re_b,
            im: b14im_a + b14im_b,
        };
        rows[2] = ComplexLanes {
            re: b23re_a - b23re_b,
            im: b23im_a + b23im_b,
        };
        rows[3] = ComplexLanes {
            re: b23re_a + b23re_b,
            im: b23im_a - b23im_b,
        };
        rows[4] = ComplexLanes {
            re: b14re_a + b14re_b,
            im: b14im_a - b14im_b,
        };
    }
}

impl Butterfly for Butterfly6 {
    const RADIX: usize = 6;

    #[inline(always)]
    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
        // Good-Thomas 2x3: the input reindexing makes the inner twiddles vanish
        let mut scratch_a = butterfly3(rows[0], rows[2], rows[4]);
        let mut scratch_b = butterfly3(rows[3], rows[5], rows[1]);

        for (a, b) in scratch_a.iter_mut().zip(scratch_b.iter_mut()) {
            butterfly2(a, b);
        }

        rows[0] = scratch_a[0];
        rows[1] = scratch_b[1];
        rows[2] = scratch_a[2];
        rows[3] = scratch_b[0];
        rows[4] = scratch_a[1];
        rows[5] = scratch_b[2];
    }
}

const ROOT_HALF: f32 = std::f32::consts::FRAC_1_SQRT_2;

impl Butterfly for Butterfly8 {
    const RADIX: usize = 8;

    #[inline(always)]
    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
        let root2 = V::splat(ROOT_HALF);

        let mut scratch0 = [rows[0], rows[2], rows[4], rows[6]];
        let mut scratch1 = [rows[1], rows[3], rows[5], rows[7]];

        Butterfly4::perform(&mut scratch0);
        Butterfly4::perform(&mut scratch1);

        scratch1[1] = (scratch1[1].rotate_neg90() + scratch1[1]).scale(root2);
        scratch1[2] = scratch1[2].rotate_neg90();
        scratch1[3] = (scratch1[3].rotate_neg90() - scratch1[3]).scale(root2);

        for (even, odd) in scratch0.iter_mut().zip(scratch1.iter_mut()) {
            butterfly2(even, odd);
        }

        rows[..4].copy_from_slice(&scratch0);
        rows[4..8].copy_from_slice(&scratch1);
    }
}

// W_16^k for the products n1 * k2 that appear between the two radix-4 layers
const TW16: [(f32, f32); 10] = [
    (1.0, 0.0),
    (0.923_879_5, -0.382_683_43),
    (0.707_106_77, -0.707_106_77),
    (0.382_683_43, -0.923_879_5),
    (0.0, -1.0),
    (-0.382_683_43, -0.923_879_5),
    (-0.707_106_77, -0.707_106_77),
    (-0.923_879_5, -0.382_683_43),
    (-1.0, 0.0),
    (-0.923_879_5, 0.382_683_43),
];

impl Butterfly for Butterfly16 {
    const RADIX: usize = 16;

    #[inline(always)]
    fn perform<V: LaneVector>(rows: &mut [ComplexLanes<V>]) {
        // 4x4 mixed radix: size-4 columns over x[n1 + 4*n2], twiddle by W_16^(n1*k2),
        // size-4 rows, result X[k2 + 4*k1]
        let mut columns = [[ComplexLanes::zero(); 4]; 4];
        for (n1, column) in columns.iter_mut().enumerate() {
            *column = [rows[n1], rows[n1 + 4], rows[n1 + 8], rows[n1 + 12]];
            Butterfly4::perform(column);
            for (k2, value) in column.iter_mut().enumerate().skip(1) {
                if n1 > 0 {
                    let (re, im) = TW16[n1 * k2];
                    *value = value.mul_scalar(re, im);
                }
            }
        }

        for k2 in 0..4 {
            let mut row = [columns[0][k2], columns[1][k2], columns[2][k2], columns[3][k2]];
            Butterfly4::perform(&mut row);
            for (k1, value) in row.iter().enumerate() {
                rows[k2 + 4 * k1] = *value;
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::test_utils::{compare_vectors, dft, random_signal};
    use crate::vector::{F32x4, F32x8};
    use num_complex::Complex;

    fn check_butterfly<B: Butterfly, V: LaneVector>() {
        let radix = B::RADIX;
        let lanes = V::WIDTH;
        let signals: Vec<Vec<Complex<f32>>> = (0..lanes)
            .map(|lane| random_signal(radix + lane)[lane..].to_vec())
            .collect();

        // one row per input index, lane l carries signal l
        let mut buffer = vec![0.0; radix * 2 * lanes];
        for (lane, signal) in signals.iter().enumerate() {
            for (k, value) in signal.iter().enumerate() {
                buffer[k * 2 * lanes + lane] = value.re;
                buffer[k * 2 * lanes + lanes + lane] = value.im;
            }
        }
        let mut rows: Vec<ComplexLanes<V>> =
            (0..radix).map(|k| ComplexLanes::load(&buffer, k)).collect();
        B::perform(&mut rows);
        for (k, row) in rows.iter().enumerate() {
            row.store(&mut buffer, k);
        }

        for (lane, signal) in signals.iter().enumerate() {
            let actual: Vec<Complex<f32>> = (0..radix)
                .map(|k| Complex::new(buffer[k * 2 * lanes + lane], buffer[k * 2 * lanes + lanes + lane]))
                .collect();
            let expected = dft(signal);
            assert!(
                compare_vectors(&actual, &expected),
                "radix = {}, lanes = {}, lane = {}",
                radix,
                lanes,
                lane
            );
        }
    }

    macro_rules! test_butterfly_func {
        ($test_name:ident, $struct_name:ident) => {
            #[test]
            fn $test_name() {
                check_butterfly::<$struct_name, f32>();
                check_butterfly::<$struct_name, F32x4>();
                check_butterfly::<$struct_name, F32x8>();
            }
        };
    }
    test_butterfly_func!(test_butterfly1, Butterfly1);
    test_butterfly_func!(test_butterfly2, Butterfly2);
    test_butterfly_func!(test_butterfly3, Butterfly3);
    test_butterfly_func!(test_butterfly4, Butterfly4);
    test_butterfly_func!(test_butterfly5, Butterfly5);
    test_butterfly_func!(test_butterfly6, Butterfly6);
    test_butterfly_func!(test_butterfly8, Butterfly8);
    test_butterfly_func!(test_butterfly16, Butterfly16);
}
