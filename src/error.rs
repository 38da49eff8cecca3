use std::error::Error;
use std::fmt::Formatter;

/// Errors reported while building a plan.
///
/// Unsupported lengths and wrongly sized buffers are contract violations and panic instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanError {
    /// The planner could not obtain this many bytes, either because its memory limit
    /// would be exceeded or because the system allocator refused.
    OutOfMemory(usize),
}

impl Error for PlanError {}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::OutOfMemory(bytes) => {
                f.write_fmt(format_args!("Cannot allocate {bytes} bytes for plan data"))
            }
        }
    }
}
