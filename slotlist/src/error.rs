use core::fmt;

use crate::ItemKey;

/// Errors surfaced by [`crate::ListEngine`].
///
/// Only host misuse and corrupted input are errors. Missing positions or sizes for items the
/// engine has not visited yet are expected and never reported here.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A scroll correction had to be applied but no `scroll_adjust_handler` is configured.
    MissingScrollAdjustHandler,
    /// A programmatic scroll was requested but no `scroll_to_handler` is configured.
    MissingScrollToHandler,
    /// Two items of the same data array produced the same key.
    DuplicateKey {
        key: ItemKey,
        first: usize,
        second: usize,
    },
    /// A measurement was negative or not finite.
    InvalidSize { key: ItemKey, size: f64 },
    /// A viewport layout was negative or not finite.
    InvalidViewport { size: f64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScrollAdjustHandler => {
                f.write_str("scroll adjustment requested without a scroll_adjust_handler")
            }
            Self::MissingScrollToHandler => {
                f.write_str("programmatic scroll requested without a scroll_to_handler")
            }
            Self::DuplicateKey { key, first, second } => write!(
                f,
                "duplicate item key {key:?} at indexes {first} and {second}"
            ),
            Self::InvalidSize { key, size } => {
                write!(f, "invalid size {size} measured for item {key:?}")
            }
            Self::InvalidViewport { size } => write!(f, "invalid viewport size {size}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T, E = Error> = core::result::Result<T, E>;
