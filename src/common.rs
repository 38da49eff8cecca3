#[cold]
#[inline(never)]
pub(crate) fn buffer_len_error(name: &str, expected: usize, actual: usize) -> ! {
    panic!(
        "Provided {} buffer has a length of {}, but this plan requires buffers of exactly {} floats",
        name, actual, expected
    );
}

/// Panics unless a caller-provided buffer has the length the plan was built for.
#[inline(always)]
pub(crate) fn check_buffer(name: &str, actual: usize, expected: usize) {
    if actual != expected {
        buffer_len_error(name, expected, actual);
    }
}
