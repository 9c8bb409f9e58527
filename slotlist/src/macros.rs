#[cfg(feature = "tracing")]
macro_rules! strace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "slotlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! strace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! sdebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "slotlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sdebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! swarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "slotlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! swarn {
    ($($tt:tt)*) => {};
}

/// Developer-facing warning: debug builds only, at most once per `$flag`.
///
/// The flag is flipped even when the `tracing` feature is off so callers can inspect it.
macro_rules! dev_warn {
    ($flag:expr, $($tt:tt)*) => {
        if cfg!(debug_assertions) && !$flag {
            $flag = true;
            swarn!($($tt)*);
        }
    };
}
