//! Structural hashing, and persistent sets and maps keyed by it.
//!
//! [`hash::calc`] reduces a value to a 64-bit fingerprint computed from its
//! type and contents rather than its memory layout. [`Set`] and [`HashMap`]
//! use that fingerprint to place their members, so any value with a
//! structural hash can be a member or a key without also implementing
//! `std::hash::Hash`.
//!
//! # Hashing
//! Callers cannot customize the hash function: every table hashes with
//! [`hash::calc`]. Interior nodes store the XOR of the hashes beneath them,
//! which gives every collection a structural hash of its own in constant time
//! and lets unequal collections be told apart without a walk.
//!
//! A structural hash is not an identity. Two unequal values may share a hash,
//! so the tables keep colliding members side by side and compare them with
//! `Eq`.
//!
//! # Persistence
//! Every operation that would change a collection returns a new one and leaves
//! the receiver as it was. Versions share structure through `Arc`, so cloning
//! is constant time, updates copy only the path they touch, and collections
//! can be shared across threads.
//!
//! # Performance
//! Lookups and single updates are comparable to `im`, but pay for computing
//! the structural hash of the probed value on every call. Values with large
//! structural hashes to compute (long strings, nested collections) are better
//! wrapped in a type with a cheaper hand-written
//! [`StructuralHash`](hash::StructuralHash) implementation.

pub mod hash;
pub mod map;
pub(crate) mod node;
pub mod set;
#[cfg(test)]
pub(crate) mod test_workloads;

mod error;

pub use error::Error;
pub use hash::StructuralHash;
pub use map::{pair, Entry, HashMap};
pub use set::Set;
