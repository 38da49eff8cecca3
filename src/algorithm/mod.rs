//! Radix butterflies and the stage drivers that run them over lane-layout buffers.

pub(crate) mod butterflies;
pub(crate) mod radixn;
