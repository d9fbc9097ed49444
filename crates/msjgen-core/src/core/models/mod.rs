//! Data structures describing a resolved protocol.
//!
//! Everything here is produced once by the engine and then only read: the writers in
//! [`crate::core::io`] walk these types without re-deriving or re-checking anything.

pub mod protocol;
pub mod restraint;
pub mod stage;
pub mod system;
