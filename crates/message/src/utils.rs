//! Utility macros shared across the crate.

/// Returns early with an error if a condition is not met.
///
/// This is similar to `assert!`, but returns an error instead of panicking.
/// It keeps validation code flat where several checks guard one construction.
///
/// # Example
///
/// ```ignore
/// ensure!(port <= u32::from(u16::MAX), InvalidArgument::invalid_port(port));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
