//! Planned mixed-radix FFTs with fast convolution.
//!
//! ### Usage
//!
//! Build plans with an [`FftPlanner`], then run them on `f32` buffers. A plan combines a
//! [`Modulation`], which decides what the transform means for the caller's samples, with a
//! cached chain of radix 2, 3, 4, 5, 6, 8 and 16 stages. Every modulation supports forward
//! and inverse transforms as well as convolution with a precomputed filter kernel.
//!
//! ~~~
//! use convfft::{recommend_convolution_length, FftPlanner, Modulation};
//!
//! // a 20-tap moving sum, applied to blocks of 100 samples
//! let len = recommend_convolution_length(20, 100);
//! let mut planner = FftPlanner::new();
//! let plan = planner.plan(len, Modulation::FrequencyOffsetReal).unwrap();
//!
//! let mut filter = vec![0.0f32; len];
//! filter[..20].fill(1.0);
//! let mut kernel = vec![0.0f32; len];
//! plan.get_kernel(&filter, &mut kernel);
//!
//! let mut block = vec![0.0f32; len];
//! block[0] = 1.0;
//! let mut work = vec![0.0f32; len];
//! plan.convolve_inplace(&mut block, &kernel, &mut work);
//!
//! // the impulse response comes back scaled by the plan's inverse scale
//! let scale = plan.inverse_scale();
//! assert!((block[10] / scale - 1.0).abs() < 1e-4);
//! assert!((block[30] / scale).abs() < 1e-4);
//! ~~~
//!
//! ### Data layout
//!
//! Complex data is interleaved `(re, im)` pairs. `FrequencyOffsetReal` plans take `len` real
//! samples and produce `len / 2` complex bins centred between the usual DFT bins. Spectra are
//! always in ascending frequency order. Inverse transforms and convolutions are unnormalized;
//! [`Plan::inverse_scale`] reports the factor.
//!
//! ### Supported lengths
//!
//! `Complex` plans accept any length of at least 2 whose factorization uses 2, 3 and at most
//! one 5. `FrequencyOffsetReal` plans additionally require a multiple of 32. Other lengths
//! are contract violations and panic.

mod algorithm;
mod arena;
mod common;
mod error;
mod inner_pass;
mod math_utils;
mod modulation;
mod options;
mod outer_pass;
mod plan;
mod twiddles;
mod vector;

#[cfg(all(target_arch = "x86_64", feature = "sse"))]
mod sse_vector;

#[cfg(test)]
mod test_utils;

pub use crate::error::PlanError;
pub use crate::math_utils::{max_block_size, recommend_convolution_length};
pub use crate::modulation::Modulation;
pub use crate::options::PlannerOptions;
pub use crate::outer_pass::Plan;
pub use crate::plan::FftPlanner;
pub use crate::vector::LaneWidth;

// Re-export the num_complex crate, the twiddle helpers are expressed with its type
pub use num_complex;
pub use crate::twiddles::compute_twiddle;
