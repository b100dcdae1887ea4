//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `CarevisError`
///
/// # Examples
///
/// ```rust
/// use carevis_common::bail;
/// use carevis_common::Result;
///
/// fn check_age(age: f64) -> Result<()> {
///     if age < 0.0 {
///         bail!("Age cannot be negative: {}", age);
///     }
///     Ok(())
/// }
/// # assert!(check_age(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::CarevisError::new($msg))
    };
    ($err:expr $(,)?) => {
        return Err($crate::CarevisError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::CarevisError::new(format!($fmt, $($arg)*)))
    };
}

/// Equivalent to `anyhow::ensure!` but for `CarevisError`.
///
/// The failure is reported as a validation error, optionally naming the
/// offending field with `field = "..."` as the first argument after the
/// condition.
///
/// # Examples
///
/// ```rust
/// use carevis_common::ensure;
/// use carevis_common::Result;
///
/// fn validate_limit(limit: usize) -> Result<()> {
///     ensure!(limit > 0, field = "charts.top_n", "limit must be positive, got: {}", limit);
///     Ok(())
/// }
/// # assert!(validate_limit(0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, field = $field:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::CarevisError::validation_field($msg, $field));
        }
    };
    ($cond:expr, field = $field:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::CarevisError::validation_field(format!($fmt, $($arg)*), $field));
        }
    };
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::CarevisError::validation($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::CarevisError::validation(format!($fmt, $($arg)*)));
        }
    };
}

/// Add context to an error while preserving the error chain
///
/// # Examples
///
/// ```rust
/// use carevis_common::{with_context, Result};
///
/// fn read_dataset(path: &str) -> Result<String> {
///     std::fs::read_to_string(path)
///         .map_err(|e| with_context!(e, "Failed to read dataset {}", path))
/// }
/// ```
#[macro_export]
macro_rules! with_context {
    ($err:expr, $msg:literal $(,)?) => {
        $crate::CarevisError::with_source($msg, $err)
    };
    ($err:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::CarevisError::with_source(format!($fmt, $($arg)*), $err)
    };
}
