//! Structural hashing for values of any supported shape.
//!
//! Every value is reduced to a 64-bit fingerprint derived from its type and
//! contents:
//!
//! - scalars hash the text `"<type-name>:<value>"`, so equal bit patterns of
//!   different types diverge (`0i8` and `0i16` never share a hash);
//! - arrays, slices, tuples, records and enum variants fold their parts left
//!   to right with `h = 31 * h + part`, starting from a seed naming the
//!   category and the element or record type;
//! - maps and sets XOR their (key, value) or member hashes into a seed, which
//!   makes the result independent of iteration order;
//! - shared pointers (`Rc`, `Arc`, `Weak`) and function pointers hash their
//!   address: they model identity, not content.
//!
//! Raw pointers have no rule. Hashing one panics with
//! [`Error::UnsupportedKind`](crate::Error::UnsupportedKind); there is no
//! fallback value.
//!
//! The hash is deterministic within a build. Type names come from
//! [`std::any::type_name`], whose output may change between compiler
//! releases, so hashes are not meant to be persisted.

use std::{
    fmt::{self, Write},
    hash::Hasher,
};

use crate::error::Error;

mod composite;
mod primitive;
mod record;

pub(crate) use composite::{map_seed, set_seed};

/// Hash of the absent value: `()` and `Option::None`.
pub const NIL: u64 = 0;

/// Types with a structural hash.
///
/// Records and enums get an implementation through
/// [`hash_record!`](crate::hash_record) and
/// [`hash_enum!`](crate::hash_enum). Hand-written implementations should
/// build on [`text`], [`Ordered`] and [`Unordered`] so they follow the same
/// rules as the provided ones.
pub trait StructuralHash {
    fn structural_hash(&self) -> u64;
}

/// Compute the structural hash of `value`.
#[inline]
pub fn calc<T: StructuralHash + ?Sized>(value: &T) -> u64 {
    value.structural_hash()
}

/// Hash formatted text, e.g. `text(format_args!("i32:{}", 7))`.
pub fn text(args: fmt::Arguments<'_>) -> u64 {
    let mut hasher = Fnv64::default();
    // Fnv64::write_str never fails.
    let _ = hasher.write_fmt(args);
    hasher.finish()
}

/// Order-sensitive combination: `h = 31 * h + part`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordered(u64);

impl Ordered {
    pub fn new(seed: u64) -> Self {
        Ordered(seed)
    }

    pub fn push<T: StructuralHash + ?Sized>(&mut self, part: &T) -> &mut Self {
        self.push_hash(calc(part))
    }

    pub fn push_hash(&mut self, hash: u64) -> &mut Self {
        self.0 = self.0.wrapping_mul(31).wrapping_add(hash);
        self
    }

    pub fn finish(&self) -> u64 {
        self.0
    }
}

/// Order-independent combination: parts are XOR-ed into the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unordered(u64);

impl Unordered {
    pub fn new(seed: u64) -> Self {
        Unordered(seed)
    }

    pub fn push<T: StructuralHash + ?Sized>(&mut self, member: &T) -> &mut Self {
        self.push_hash(calc(member))
    }

    /// Add one key/value pair, weighted as `31 * hash(key) + hash(value)`.
    pub fn push_pair<K, V>(&mut self, key: &K, value: &V) -> &mut Self
    where
        K: StructuralHash + ?Sized,
        V: StructuralHash + ?Sized,
    {
        self.push_hash(pair_hash(calc(key), calc(value)))
    }

    pub fn push_hash(&mut self, hash: u64) -> &mut Self {
        self.0 ^= hash;
        self
    }

    pub fn finish(&self) -> u64 {
        self.0
    }
}

pub(crate) fn pair_hash(key: u64, value: u64) -> u64 {
    key.wrapping_mul(31).wrapping_add(value)
}

/// Hash of the address behind a pointer, tagged with its category.
pub(crate) fn identity(category: &str, ptr: *const ()) -> u64 {
    text(format_args!("{category}:{ptr:p}"))
}

pub(crate) fn unsupported<T: ?Sized>() -> ! {
    panic!("{}", Error::unsupported::<T>())
}

/// 64-bit FNV-1.
#[derive(Debug, Clone)]
pub(crate) struct Fnv64 {
    state: u64,
}

impl Fnv64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
}

impl Default for Fnv64 {
    fn default() -> Self {
        Fnv64 {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv64 {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.wrapping_mul(Self::PRIME);
            self.state ^= u64::from(byte);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

impl Write for Fnv64 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Hasher::write(self, s.as_bytes());
        Ok(())
    }
}
