//! Logging macros that forward to the `log` crate if the `logging` feature
//! is enabled, and otherwise only borrow their arguments.

macro_rules! forward_log {
    ($level:ident, $fmt:literal $(, $($arg:expr),* $(,)?)?) => {
        #[cfg(feature = "logging")]
        ::log::$level!($fmt $(, $($arg),*)?);
        #[cfg(not(feature = "logging"))]
        { $($(let _ = &$arg;)*)? }
    };
}

macro_rules! ldebug {
    ($($tokens:tt)*) => {
        forward_log!(debug, $($tokens)*)
    };
}

macro_rules! ltrace {
    ($($tokens:tt)*) => {
        forward_log!(trace, $($tokens)*)
    };
}

macro_rules! lwarn {
    ($($tokens:tt)*) => {
        forward_log!(warn, $($tokens)*)
    };
}
