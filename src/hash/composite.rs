//! Sequences, maps, sets, tuples, sum types and pointers.
use std::{
    any::type_name,
    borrow::{Cow, ToOwned},
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    marker::PhantomData,
    ptr::NonNull,
    rc::{self, Rc},
    sync::{self, Arc},
};

use super::{identity, text, unsupported, Ordered, StructuralHash, Unordered, NIL};

fn slice_seed<T: ?Sized>() -> u64 {
    text(format_args!("slice:{}", type_name::<T>()))
}

pub(crate) fn map_seed<K: ?Sized, V: ?Sized>() -> u64 {
    text(format_args!("map:{}:{}", type_name::<K>(), type_name::<V>()))
}

pub(crate) fn set_seed<T: ?Sized>() -> u64 {
    text(format_args!("set:{}", type_name::<T>()))
}

fn fold_ordered<'a, T>(seed: u64, parts: impl IntoIterator<Item = &'a T>) -> u64
where
    T: StructuralHash + 'a,
{
    let mut fold = Ordered::new(seed);
    for part in parts {
        fold.push(part);
    }
    fold.finish()
}

fn fold_pairs<'a, K, V>(seed: u64, pairs: impl IntoIterator<Item = (&'a K, &'a V)>) -> u64
where
    K: StructuralHash + 'a,
    V: StructuralHash + 'a,
{
    let mut fold = Unordered::new(seed);
    for (key, value) in pairs {
        fold.push_pair(key, value);
    }
    fold.finish()
}

fn fold_members<'a, T>(seed: u64, members: impl IntoIterator<Item = &'a T>) -> u64
where
    T: StructuralHash + 'a,
{
    let mut fold = Unordered::new(seed);
    for member in members {
        fold.push(member);
    }
    fold.finish()
}

// -- sequences --

impl<T: StructuralHash, const N: usize> StructuralHash for [T; N] {
    fn structural_hash(&self) -> u64 {
        let seed = text(format_args!("array:{}", type_name::<T>()));
        fold_ordered(seed, self)
    }
}

impl<T: StructuralHash> StructuralHash for [T] {
    fn structural_hash(&self) -> u64 {
        fold_ordered(slice_seed::<T>(), self)
    }
}

impl<T: StructuralHash> StructuralHash for Vec<T> {
    fn structural_hash(&self) -> u64 {
        self.as_slice().structural_hash()
    }
}

impl<T: StructuralHash> StructuralHash for VecDeque<T> {
    fn structural_hash(&self) -> u64 {
        fold_ordered(slice_seed::<T>(), self)
    }
}

// -- maps and sets --

impl<K: StructuralHash, V: StructuralHash, S> StructuralHash for HashMap<K, V, S> {
    fn structural_hash(&self) -> u64 {
        fold_pairs(map_seed::<K, V>(), self)
    }
}

impl<K: StructuralHash, V: StructuralHash> StructuralHash for BTreeMap<K, V> {
    fn structural_hash(&self) -> u64 {
        fold_pairs(map_seed::<K, V>(), self)
    }
}

impl<T: StructuralHash, S> StructuralHash for HashSet<T, S> {
    fn structural_hash(&self) -> u64 {
        fold_members(set_seed::<T>(), self)
    }
}

impl<T: StructuralHash> StructuralHash for BTreeSet<T> {
    fn structural_hash(&self) -> u64 {
        fold_members(set_seed::<T>(), self)
    }
}

#[cfg(feature = "indexmap")]
impl<K: StructuralHash, V: StructuralHash, S> StructuralHash for indexmap::IndexMap<K, V, S> {
    fn structural_hash(&self) -> u64 {
        fold_pairs(map_seed::<K, V>(), self)
    }
}

#[cfg(feature = "indexmap")]
impl<T: StructuralHash, S> StructuralHash for indexmap::IndexSet<T, S> {
    fn structural_hash(&self) -> u64 {
        fold_members(set_seed::<T>(), self)
    }
}

// -- tuples --

macro_rules! impl_tuple_hash {
    ($(($($name:ident $idx:tt),+))*) => {
        $(
            impl<$($name: StructuralHash),+> StructuralHash for ($($name,)+) {
                fn structural_hash(&self) -> u64 {
                    let seed = text(format_args!("tuple:{}", type_name::<Self>()));
                    let mut fold = Ordered::new(seed);
                    $( fold.push(&self.$idx); )+
                    fold.finish()
                }
            }
        )*
    };
}

impl_tuple_hash! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11)
}

// -- sum types --

fn variant_seed<T: ?Sized>(variant: &str) -> u64 {
    text(format_args!("enum:{}::{}", type_name::<T>(), variant))
}

impl<T: StructuralHash> StructuralHash for Option<T> {
    fn structural_hash(&self) -> u64 {
        match self {
            None => NIL,
            Some(value) => Ordered::new(variant_seed::<Self>("Some")).push(value).finish(),
        }
    }
}

impl<T: StructuralHash, E: StructuralHash> StructuralHash for Result<T, E> {
    fn structural_hash(&self) -> u64 {
        match self {
            Ok(value) => Ordered::new(variant_seed::<Self>("Ok")).push(value).finish(),
            Err(error) => Ordered::new(variant_seed::<Self>("Err")).push(error).finish(),
        }
    }
}

impl<T: ?Sized> StructuralHash for PhantomData<T> {
    fn structural_hash(&self) -> u64 {
        NIL
    }
}

// -- indirection that owns or borrows a value: hash the value --

impl<T: StructuralHash + ?Sized> StructuralHash for &T {
    fn structural_hash(&self) -> u64 {
        (**self).structural_hash()
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for &mut T {
    fn structural_hash(&self) -> u64 {
        (**self).structural_hash()
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for Box<T> {
    fn structural_hash(&self) -> u64 {
        (**self).structural_hash()
    }
}

impl<T: StructuralHash + ToOwned + ?Sized> StructuralHash for Cow<'_, T> {
    fn structural_hash(&self) -> u64 {
        (**self).structural_hash()
    }
}

// -- shared pointers: hash the identity --

impl<T: ?Sized> StructuralHash for Rc<T> {
    fn structural_hash(&self) -> u64 {
        identity("pointer", Rc::as_ptr(self).cast())
    }
}

impl<T: ?Sized> StructuralHash for Arc<T> {
    fn structural_hash(&self) -> u64 {
        identity("pointer", Arc::as_ptr(self).cast())
    }
}

impl<T> StructuralHash for rc::Weak<T> {
    fn structural_hash(&self) -> u64 {
        identity("pointer", self.as_ptr().cast())
    }
}

impl<T> StructuralHash for sync::Weak<T> {
    fn structural_hash(&self) -> u64 {
        identity("pointer", self.as_ptr().cast())
    }
}

macro_rules! impl_fn_hash {
    ($(($($arg:ident),*))*) => {
        $(
            impl<R, $($arg),*> StructuralHash for fn($($arg),*) -> R {
                fn structural_hash(&self) -> u64 {
                    identity("func", *self as *const ())
                }
            }
        )*
    };
}

impl_fn_hash! {
    ()
    (A)
    (A, B)
    (A, B, C)
    (A, B, C, D)
}

// -- raw pointers: no rule --

impl<T: ?Sized> StructuralHash for *const T {
    fn structural_hash(&self) -> u64 {
        unsupported::<Self>()
    }
}

impl<T: ?Sized> StructuralHash for *mut T {
    fn structural_hash(&self) -> u64 {
        unsupported::<Self>()
    }
}

impl<T: ?Sized> StructuralHash for NonNull<T> {
    fn structural_hash(&self) -> u64 {
        unsupported::<Self>()
    }
}

// -- float wrappers --

#[cfg(feature = "ordered-float")]
// Both wrappers treat `-0.0` and `0.0` as equal, so they must hash alike.
macro_rules! impl_ordered_float_hash {
    ($($t:ty),*) => {
        $(
            impl StructuralHash for ordered_float::OrderedFloat<$t> {
                fn structural_hash(&self) -> u64 {
                    let value = if self.0 == 0.0 { 0.0 } else { self.0 };
                    Ordered::new(text(format_args!("struct:{}", type_name::<Self>())))
                        .push(&value)
                        .finish()
                }
            }

            impl StructuralHash for ordered_float::NotNan<$t> {
                fn structural_hash(&self) -> u64 {
                    let value = self.into_inner();
                    let value = if value == 0.0 { 0.0 } else { value };
                    Ordered::new(text(format_args!("struct:{}", type_name::<Self>())))
                        .push(&value)
                        .finish()
                }
            }
        )*
    };
}

#[cfg(feature = "ordered-float")]
impl_ordered_float_hash!(f32, f64);
