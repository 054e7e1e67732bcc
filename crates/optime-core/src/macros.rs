//! Convenience macros for building operation arguments.

/// Capture message template arguments by value
///
/// # Example
///
/// ```
/// # use optime_core::op_args;
/// let url = String::from("https://example.test");
/// let args = op_args![url, 3];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! op_args {
    () => {
        ::std::vec::Vec::<$crate::template::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::template::Arg::new($arg)),+]
    };
}
