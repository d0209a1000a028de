//! Collection types tuned for the hull algorithms.
//!
//! Everything here is a thin alias or wrapper over `rustc-hash`, `smallvec` and
//! `slotmap` so that call sites name what a collection holds rather than how it is
//! stored.

mod aliases;
mod buffers;
mod helpers;

pub use aliases::*;
pub use buffers::*;
pub use helpers::*;
