//! Utility functions and types for debugging the register.
//!
//! These are not needed for normal use, but are useful during development of
//! both the register itself and applications embedding it.

#[cfg(feature = "arbitrary")]
mod arbitrary;
mod checker;
mod display;
mod ops;
mod validate_register;

#[cfg(feature = "arbitrary")]
pub use self::arbitrary::*;
pub use checker::*;
pub use display::*;
pub use ops::*;
pub use validate_register::*;
