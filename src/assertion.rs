//! Located assertion failures and the macros that raise them.
//!
//! An example body fails an assertion by returning an [`AssertionFailure`] (directly or
//! wrapped in `anyhow::Error`), or by panicking with one through [`std::panic::panic_any`].
//! The engine tells these apart from every other error and reports the location.

use thiserror::Error;

/// A failed expectation, carrying where it was raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// A failure with no known location.
    pub fn unlocated(message: impl Into<String>) -> Self {
        Self::new(message, "", 0)
    }
}

/// Returns an [`AssertionFailure`] from the enclosing body unless the condition holds.
///
/// ```
/// use spectree::spec_assert;
///
/// fn body() -> Result<(), spectree::AssertionFailure> {
///     spec_assert!(1 + 1 == 2);
///     spec_assert!(2 > 1, "two should beat {}", 1);
///     Ok(())
/// }
/// assert!(body().is_ok());
/// ```
#[macro_export]
macro_rules! spec_assert {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::AssertionFailure::new(
                    concat!("Expected: ", stringify!($cond)),
                    file!(),
                    line!(),
                )
                .into(),
            );
        }
    };
    ($cond:expr, $($fmt:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::AssertionFailure::new(format!($($fmt)+), file!(), line!()).into(),
            );
        }
    };
}

/// Returns an [`AssertionFailure`] from the enclosing body unless both sides are equal.
#[macro_export]
macro_rules! spec_assert_eq {
    ($actual:expr, $expected:expr $(,)?) => {
        match (&$actual, &$expected) {
            (actual, expected) => {
                if !(*actual == *expected) {
                    return ::core::result::Result::Err(
                        $crate::AssertionFailure::new(
                            format!("Expected: equal to {:?}\nActual: {:?}", expected, actual),
                            file!(),
                            line!(),
                        )
                        .into(),
                    );
                }
            }
        }
    };
}

/// Unconditionally returns an [`AssertionFailure`] from the enclosing body.
#[macro_export]
macro_rules! spec_fail {
    ($($fmt:tt)+) => {
        return ::core::result::Result::Err(
            $crate::AssertionFailure::new(format!($($fmt)+), file!(), line!()).into(),
        )
    };
}
