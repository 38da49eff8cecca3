use num_integer::Integer;

/// Every recommended length is a multiple of this, which keeps it valid for
/// `Modulation::FrequencyOffsetReal`.
const LENGTH_GRANULE: usize = 32;

/// Recommends a transform length for fast convolution with a filter of `kernel_len` taps,
/// processing blocks of up to `max_block_size` samples.
///
/// The result is the smallest `32·2^a` or `32·3·2^a` that is at least
/// `kernel_len + max(max_block_size, 8·kernel_len) - 1`. Lengths of that shape are accepted
/// by both modulations. The floor of eight times the kernel keeps the per-sample cost low
/// when the caller asks for very short blocks.
///
/// ~~~
/// use convfft::recommend_convolution_length;
///
/// assert_eq!(recommend_convolution_length(100, 256), 1024);
/// assert_eq!(recommend_convolution_length(16, 1000), 1024);
/// assert_eq!(recommend_convolution_length(1, 1), 32);
/// ~~~
///
/// # Panics
///
/// Panics if no length of that shape fits in a `usize`, which needs a `kernel_len` or
/// `max_block_size` in the order of `usize::MAX / 9`.
pub fn recommend_convolution_length(kernel_len: usize, max_block_size: usize) -> usize {
    let block = max_block_size.max(kernel_len.saturating_mul(8));
    let min_len = kernel_len.saturating_add(block).saturating_sub(1).max(1);
    let units = Integer::div_ceil(&min_len, &LENGTH_GRANULE);

    // units <= usize::MAX / 32 + 1, so none of the multiplier arithmetic overflows
    let mut power: usize = 1;
    while power * 2 < units {
        power *= 2;
    }
    // power < units <= 2 * power, unless units is 1
    let multiplier = if units <= 1 {
        1
    } else if units <= 3 * power / 2 {
        3 * power / 2
    } else {
        2 * power
    };
    match LENGTH_GRANULE.checked_mul(multiplier) {
        Some(len) => len,
        None => panic!(
            "No supported convolution length covers {} samples",
            min_len
        ),
    }
}

/// The longest block that a plan of `conv_len` samples can convolve with a `kernel_len`-tap
/// filter without the result wrapping around.
pub fn max_block_size(conv_len: usize, kernel_len: usize) -> usize {
    (conv_len + 1).saturating_sub(kernel_len)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn is_recommended_shape(len: usize) -> bool {
        if len % LENGTH_GRANULE != 0 {
            return false;
        }
        let mut m = len / LENGTH_GRANULE;
        if m % 3 == 0 {
            m /= 3;
        }
        m.is_power_of_two()
    }

    fn previous_candidate(len: usize) -> usize {
        let m = len / LENGTH_GRANULE;
        let previous = match m {
            1 => 0,
            2 => 1,
            _ if m % 3 == 0 => m / 3 * 2,
            _ => m / 4 * 3,
        };
        previous * LENGTH_GRANULE
    }

    #[test]
    fn test_recommend_small() {
        let expected = [32, 64, 96, 128, 192, 256, 384, 512, 768, 1024];
        let mut previous = 0;
        for min_len in 1..=1024 {
            let len = recommend_convolution_length(1, min_len);
            assert!(len >= min_len, "min_len = {}", min_len);
            assert!(expected.contains(&len), "min_len = {}, len = {}", min_len, len);
            assert!(len >= previous);
            previous = len;
        }
        assert_eq!(recommend_convolution_length(1, 97), 128);
        assert_eq!(recommend_convolution_length(1, 96), 96);
    }

    #[test]
    fn test_recommend_bound() {
        for kernel_len in [1, 2, 7, 31, 64, 100, 513] {
            for block in [1, 10, 100, 1000, 5000] {
                let len = recommend_convolution_length(kernel_len, block);
                let min_len = kernel_len + block.max(8 * kernel_len) - 1;
                assert!(len >= min_len, "kernel = {}, block = {}", kernel_len, block);
                assert!(is_recommended_shape(len), "len = {}", len);
                assert!(previous_candidate(len) < min_len, "len = {}", len);
                assert!(max_block_size(len, kernel_len) >= block);
            }
        }
    }

    #[test]
    fn test_recommend_large() {
        let kernel_len = 1 << 20;
        let len = recommend_convolution_length(kernel_len, 0);
        assert!(len >= 9 * kernel_len - 1);
        assert!(is_recommended_shape(len));

        let largest = recommend_convolution_length(1, (usize::MAX / 64) * 32);
        assert_eq!(largest, (usize::MAX / 64 + 1) * 32);
    }

    #[test]
    #[should_panic]
    fn test_recommend_overflow() {
        recommend_convolution_length(usize::MAX / 9, 0);
    }

    #[test]
    fn test_max_block_size() {
        assert_eq!(max_block_size(1024, 100), 925);
        assert_eq!(max_block_size(32, 40), 0);
    }
}
