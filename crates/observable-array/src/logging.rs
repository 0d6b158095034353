#![forbid(unsafe_code)]

//! Logging shim.
//!
//! With the `tracing` feature the macros are `tracing`'s own. Without it they
//! expand to nothing, so call sites never need a `cfg`. Call sites import
//! them by path (`use crate::logging::warn;`).
//!
//! The no-op macros carry distinct names and are aliased on re-export: a bare
//! `warn` would collide with the built-in `#[warn]` lint attribute.

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop {
    macro_rules! noop_trace {
        ($($arg:tt)*) => {};
    }

    macro_rules! noop_debug {
        ($($arg:tt)*) => {};
    }

    macro_rules! noop_warn {
        ($($arg:tt)*) => {};
    }

    #[allow(unused_imports)]
    pub(crate) use {noop_debug as debug, noop_trace as trace, noop_warn as warn};
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use self::noop::{debug, trace, warn};
