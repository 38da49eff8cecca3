use num_traits::Zero;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// The number of `f32` lanes processed together by one kernel set.
///
/// Every lane carries an independent sub-transform, so a plan with `Four` lanes
/// runs four interleaved transforms of a quarter of its length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaneWidth {
    One,
    Four,
    #[default]
    Eight,
}

impl LaneWidth {
    #[inline(always)]
    pub fn width(self) -> usize {
        match self {
            Self::One => 1,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// The widest lane vector any kernel set uses.
pub(crate) const MAX_LANES: usize = 8;

/// A fixed-size bundle of `f32` lanes with element-wise arithmetic.
pub trait LaneVector:
    Copy
    + Debug
    + Send
    + Sync
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    const WIDTH: usize;

    fn splat(value: f32) -> Self;

    /// Reads `WIDTH` floats from the start of `src`.
    fn load(src: &[f32]) -> Self;

    /// Writes `WIDTH` floats to the start of `dst`.
    fn store(self, dst: &mut [f32]);

    /// Reverses the lane order.
    fn reverse(self) -> Self;

    /// Zips the lanes of `self` and `other`, returning the low and high halves of
    /// `[self[0], other[0], self[1], other[1], ...]`.
    fn interleave(self, other: Self) -> (Self, Self);

    /// Inverse of `interleave`: splits the sequence `self ++ other` into its even and odd lanes.
    fn deinterleave(self, other: Self) -> (Self, Self);

    /// Transposes a `WIDTH x WIDTH` block in place. `rows.len()` must equal `WIDTH`.
    fn transpose(rows: &mut [Self]);
}

impl LaneVector for f32 {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        value
    }
    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        src[0]
    }
    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        dst[0] = self;
    }
    #[inline(always)]
    fn reverse(self) -> Self {
        self
    }
    #[inline(always)]
    fn interleave(self, other: Self) -> (Self, Self) {
        (self, other)
    }
    #[inline(always)]
    fn deinterleave(self, other: Self) -> (Self, Self) {
        (self, other)
    }
    #[inline(always)]
    fn transpose(_rows: &mut [Self]) {}
}

#[cfg(all(target_arch = "x86_64", feature = "sse"))]
pub use crate::sse_vector::F32x4;

/// Four `f32` lanes, element-wise.
#[cfg(not(all(target_arch = "x86_64", feature = "sse")))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct F32x4([f32; 4]);

#[cfg(not(all(target_arch = "x86_64", feature = "sse")))]
mod portable {
    use super::*;

    impl F32x4 {
        #[inline(always)]
        fn zip(self, rhs: Self, op: impl Fn(f32, f32) -> f32) -> Self {
            let mut lanes = self.0;
            for (lane, other) in lanes.iter_mut().zip(rhs.0.iter()) {
                *lane = op(*lane, *other);
            }
            Self(lanes)
        }

        #[cfg(test)]
        pub fn to_array(self) -> [f32; 4] {
            self.0
        }
    }

    impl From<[f32; 4]> for F32x4 {
        fn from(lanes: [f32; 4]) -> Self {
            Self(lanes)
        }
    }

    impl Add for F32x4 {
        type Output = Self;
        #[inline(always)]
        fn add(self, rhs: Self) -> Self {
            self.zip(rhs, |a, b| a + b)
        }
    }
    impl Sub for F32x4 {
        type Output = Self;
        #[inline(always)]
        fn sub(self, rhs: Self) -> Self {
            self.zip(rhs, |a, b| a - b)
        }
    }
    impl Mul for F32x4 {
        type Output = Self;
        #[inline(always)]
        fn mul(self, rhs: Self) -> Self {
            self.zip(rhs, |a, b| a * b)
        }
    }
    impl Neg for F32x4 {
        type Output = Self;
        #[inline(always)]
        fn neg(self) -> Self {
            Self(self.0.map(|lane| -lane))
        }
    }
    impl Zero for F32x4 {
        #[inline(always)]
        fn zero() -> Self {
            Self([0.0; 4])
        }
        fn is_zero(&self) -> bool {
            self.0.iter().all(|lane| *lane == 0.0)
        }
    }

    impl LaneVector for F32x4 {
        const WIDTH: usize = 4;

        #[inline(always)]
        fn splat(value: f32) -> Self {
            Self([value; 4])
        }
        #[inline(always)]
        fn load(src: &[f32]) -> Self {
            let mut lanes = [0.0; 4];
            lanes.copy_from_slice(&src[..4]);
            Self(lanes)
        }
        #[inline(always)]
        fn store(self, dst: &mut [f32]) {
            dst[..4].copy_from_slice(&self.0);
        }
        #[inline(always)]
        fn reverse(self) -> Self {
            let [a, b, c, d] = self.0;
            Self([d, c, b, a])
        }
        #[inline(always)]
        fn interleave(self, other: Self) -> (Self, Self) {
            let [a0, a1, a2, a3] = self.0;
            let [b0, b1, b2, b3] = other.0;
            (Self([a0, b0, a1, b1]), Self([a2, b2, a3, b3]))
        }
        #[inline(always)]
        fn deinterleave(self, other: Self) -> (Self, Self) {
            let [a0, a1, a2, a3] = self.0;
            let [b0, b1, b2, b3] = other.0;
            (Self([a0, a2, b0, b2]), Self([a1, a3, b1, b3]))
        }
        #[inline(always)]
        fn transpose(rows: &mut [Self]) {
            assert_eq!(rows.len(), 4);
            for i in 0..4 {
                for j in i + 1..4 {
                    let upper = rows[i].0[j];
                    rows[i].0[j] = rows[j].0[i];
                    rows[j].0[i] = upper;
                }
            }
        }
    }
}

/// Eight `f32` lanes, held as a low and a high [`F32x4`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct F32x8 {
    lo: F32x4,
    hi: F32x4,
}

impl F32x8 {
    #[cfg(test)]
    pub fn to_array(self) -> [f32; 8] {
        let mut lanes = [0.0; 8];
        self.store(&mut lanes);
        lanes
    }
}

impl From<[f32; 8]> for F32x8 {
    fn from(lanes: [f32; 8]) -> Self {
        Self::load(&lanes)
    }
}

impl Add for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            lo: self.lo + rhs.lo,
            hi: self.hi + rhs.hi,
        }
    }
}
impl Sub for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            lo: self.lo - rhs.lo,
            hi: self.hi - rhs.hi,
        }
    }
}
impl Mul for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            lo: self.lo * rhs.lo,
            hi: self.hi * rhs.hi,
        }
    }
}
impl Neg for F32x8 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            lo: -self.lo,
            hi: -self.hi,
        }
    }
}
impl Zero for F32x8 {
    #[inline(always)]
    fn zero() -> Self {
        Self {
            lo: F32x4::zero(),
            hi: F32x4::zero(),
        }
    }
    fn is_zero(&self) -> bool {
        self.lo.is_zero() && self.hi.is_zero()
    }
}

impl LaneVector for F32x8 {
    const WIDTH: usize = 8;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            lo: F32x4::splat(value),
            hi: F32x4::splat(value),
        }
    }
    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        Self {
            lo: F32x4::load(src),
            hi: F32x4::load(&src[4..]),
        }
    }
    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        self.lo.store(dst);
        self.hi.store(&mut dst[4..]);
    }
    #[inline(always)]
    fn reverse(self) -> Self {
        Self {
            lo: self.hi.reverse(),
            hi: self.lo.reverse(),
        }
    }
    #[inline(always)]
    fn interleave(self, other: Self) -> (Self, Self) {
        let (a, b) = self.lo.interleave(other.lo);
        let (c, d) = self.hi.interleave(other.hi);
        (Self { lo: a, hi: b }, Self { lo: c, hi: d })
    }
    #[inline(always)]
    fn deinterleave(self, other: Self) -> (Self, Self) {
        let (self_evens, self_odds) = self.lo.deinterleave(self.hi);
        let (other_evens, other_odds) = other.lo.deinterleave(other.hi);
        (
            Self {
                lo: self_evens,
                hi: other_evens,
            },
            Self {
                lo: self_odds,
                hi: other_odds,
            },
        )
    }
    #[inline(always)]
    fn transpose(rows: &mut [Self]) {
        assert_eq!(rows.len(), 8);
        // 2x2 blocks of 4x4: the off-diagonal blocks swap places
        let mut blocks = [[F32x4::zero(); 4]; 4];
        for i in 0..4 {
            blocks[0][i] = rows[i].lo;
            blocks[1][i] = rows[i].hi;
            blocks[2][i] = rows[4 + i].lo;
            blocks[3][i] = rows[4 + i].hi;
        }
        for block in blocks.iter_mut() {
            F32x4::transpose(block);
        }
        for i in 0..4 {
            rows[i] = Self {
                lo: blocks[0][i],
                hi: blocks[2][i],
            };
            rows[4 + i] = Self {
                lo: blocks[1][i],
                hi: blocks[3][i],
            };
        }
    }
}

/// One complex value per lane, stored as separate real and imaginary lane vectors.
#[derive(Copy, Clone, Debug)]
pub struct ComplexLanes<V> {
    pub re: V,
    pub im: V,
}

impl<V: LaneVector> ComplexLanes<V> {
    #[inline(always)]
    pub fn zero() -> Self {
        Self {
            re: V::zero(),
            im: V::zero(),
        }
    }

    /// Loads element `index` of a buffer in lane layout (`WIDTH` real lanes, then `WIDTH` imaginary lanes).
    #[inline(always)]
    pub fn load(buffer: &[f32], index: usize) -> Self {
        let base = index * 2 * V::WIDTH;
        Self {
            re: V::load(&buffer[base..]),
            im: V::load(&buffer[base + V::WIDTH..]),
        }
    }

    #[inline(always)]
    pub fn store(self, buffer: &mut [f32], index: usize) {
        let base = index * 2 * V::WIDTH;
        self.re.store(&mut buffer[base..]);
        self.im.store(&mut buffer[base + V::WIDTH..]);
    }

    /// Loads `WIDTH` interleaved `(re, im)` pairs from the start of `src`.
    #[inline(always)]
    pub fn load_interleaved(src: &[f32]) -> Self {
        let low = V::load(src);
        let high = V::load(&src[V::WIDTH..]);
        let (re, im) = low.deinterleave(high);
        Self { re, im }
    }

    #[inline(always)]
    pub fn store_interleaved(self, dst: &mut [f32]) {
        let (low, high) = self.re.interleave(self.im);
        low.store(dst);
        high.store(&mut dst[V::WIDTH..]);
    }

    /// Lane-wise complex product.
    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }

    /// Multiplies every lane by the same complex value.
    #[inline(always)]
    pub fn mul_scalar(self, re: f32, im: f32) -> Self {
        let (re, im) = (V::splat(re), V::splat(im));
        Self {
            re: self.re * re - self.im * im,
            im: self.re * im + self.im * re,
        }
    }

    #[inline(always)]
    pub fn scale(self, factor: V) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }

    /// Multiplies by `-i`, the forward quarter turn.
    #[inline(always)]
    pub fn rotate_neg90(self) -> Self {
        Self {
            re: self.im,
            im: -self.re,
        }
    }

    /// Multiplies by `i`.
    #[inline(always)]
    pub fn rotate_pos90(self) -> Self {
        Self {
            re: -self.im,
            im: self.re,
        }
    }

    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
}

impl<V: LaneVector> Add for ComplexLanes<V> {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl<V: LaneVector> Sub for ComplexLanes<V> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn ramp4(start: f32) -> F32x4 {
        F32x4::from([start, start + 1.0, start + 2.0, start + 3.0])
    }

    #[test]
    fn test_interleave() {
        let (low, high) = ramp4(0.0).interleave(ramp4(10.0));
        assert_eq!(low, F32x4::from([0.0, 10.0, 1.0, 11.0]));
        assert_eq!(high, F32x4::from([2.0, 12.0, 3.0, 13.0]));

        let (evens, odds) = low.deinterleave(high);
        assert_eq!(evens, ramp4(0.0));
        assert_eq!(odds, ramp4(10.0));
    }

    #[test]
    fn test_wide_interleave() {
        let ramp8 = |start: f32| F32x8::from([0, 1, 2, 3, 4, 5, 6, 7].map(|i| start + i as f32));
        let (low, high) = ramp8(0.0).interleave(ramp8(10.0));
        assert_eq!(low.to_array(), [0.0, 10.0, 1.0, 11.0, 2.0, 12.0, 3.0, 13.0]);
        assert_eq!(high.to_array(), [4.0, 14.0, 5.0, 15.0, 6.0, 16.0, 7.0, 17.0]);
        assert_eq!(ramp8(0.0).reverse().to_array(), [7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);

        let (evens, odds) = low.deinterleave(high);
        assert_eq!(evens, ramp8(0.0));
        assert_eq!(odds, ramp8(10.0));
    }

    #[test]
    fn test_transpose() {
        let mut rows: Vec<F32x8> = (0..8)
            .map(|r| F32x8::from([0, 1, 2, 3, 4, 5, 6, 7].map(|c| (r * 8 + c) as f32)))
            .collect();
        F32x8::transpose(&mut rows);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.to_array().iter().enumerate() {
                assert_eq!(*value, (c * 8 + r) as f32);
            }
        }
    }

    #[test]
    fn test_interleaved_load_store() {
        let data: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let value = ComplexLanes::<F32x4>::load_interleaved(&data);
        assert_eq!(value.re, F32x4::from([0.0, 2.0, 4.0, 6.0]));
        assert_eq!(value.im, F32x4::from([1.0, 3.0, 5.0, 7.0]));

        let mut out = vec![0.0; 8];
        value.store_interleaved(&mut out);
        assert_eq!(out, data);
    }

    #[test]
    fn test_rotations() {
        let value = ComplexLanes {
            re: 3.0f32,
            im: 2.0f32,
        };
        let neg = value.rotate_neg90();
        assert_eq!((neg.re, neg.im), (2.0, -3.0));
        let pos = value.rotate_pos90();
        assert_eq!((pos.re, pos.im), (-2.0, 3.0));
        let product = value.mul_scalar(0.0, -1.0);
        assert_eq!((product.re, product.im), (neg.re, neg.im));
    }
}
