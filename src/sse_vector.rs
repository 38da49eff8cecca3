use num_traits::Zero;
use std::arch::x86_64::*;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

use crate::vector::LaneVector;

// SSE is part of the x86_64 baseline, so every intrinsic below is always available.
// The `unsafe` blocks only satisfy the intrinsic signatures; loads and stores go through
// slices that were bounds-checked first.

/// Four `f32` lanes in one SSE register.
#[derive(Copy, Clone)]
pub struct F32x4(__m128);

impl F32x4 {
    pub fn to_array(self) -> [f32; 4] {
        let mut lanes = [0.0; 4];
        self.store(&mut lanes);
        lanes
    }
}

impl From<[f32; 4]> for F32x4 {
    fn from(lanes: [f32; 4]) -> Self {
        Self::load(&lanes)
    }
}

impl PartialEq for F32x4 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl Debug for F32x4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("F32x4").field(&self.to_array()).finish()
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm_add_ps(self.0, rhs.0) })
    }
}
impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm_sub_ps(self.0, rhs.0) })
    }
}
impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { _mm_mul_ps(self.0, rhs.0) })
    }
}
impl Neg for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        // flip the sign bits
        Self(unsafe { _mm_xor_ps(self.0, _mm_set1_ps(-0.0)) })
    }
}
impl Zero for F32x4 {
    #[inline(always)]
    fn zero() -> Self {
        Self(unsafe { _mm_setzero_ps() })
    }
    fn is_zero(&self) -> bool {
        self.to_array().iter().all(|lane| *lane == 0.0)
    }
}

impl LaneVector for F32x4 {
    const WIDTH: usize = 4;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(unsafe { _mm_set1_ps(value) })
    }
    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        let src = &src[..4];
        Self(unsafe { _mm_loadu_ps(src.as_ptr()) })
    }
    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..4];
        unsafe { _mm_storeu_ps(dst.as_mut_ptr(), self.0) }
    }
    #[inline(always)]
    fn reverse(self) -> Self {
        Self(unsafe { _mm_shuffle_ps(self.0, self.0, 0x1B) })
    }
    #[inline(always)]
    fn interleave(self, other: Self) -> (Self, Self) {
        unsafe {
            (
                Self(_mm_unpacklo_ps(self.0, other.0)),
                Self(_mm_unpackhi_ps(self.0, other.0)),
            )
        }
    }
    #[inline(always)]
    fn deinterleave(self, other: Self) -> (Self, Self) {
        unsafe {
            (
                Self(_mm_shuffle_ps(self.0, other.0, 0x88)),
                Self(_mm_shuffle_ps(self.0, other.0, 0xDD)),
            )
        }
    }
    #[inline(always)]
    fn transpose(rows: &mut [Self]) {
        assert_eq!(rows.len(), 4);
        unsafe {
            let t0 = _mm_unpacklo_ps(rows[0].0, rows[1].0);
            let t1 = _mm_unpacklo_ps(rows[2].0, rows[3].0);
            let t2 = _mm_unpackhi_ps(rows[0].0, rows[1].0);
            let t3 = _mm_unpackhi_ps(rows[2].0, rows[3].0);
            rows[0] = Self(_mm_movelh_ps(t0, t1));
            rows[1] = Self(_mm_movehl_ps(t1, t0));
            rows[2] = Self(_mm_movelh_ps(t2, t3));
            rows[3] = Self(_mm_movehl_ps(t3, t2));
        }
    }
}
