//! General helper utilities

mod hashing;

pub use hashing::*;
