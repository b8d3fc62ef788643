//! Scalars: the type name is part of the hashed text.

use super::{text, StructuralHash, NIL};

macro_rules! impl_primitive_hash {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl StructuralHash for $t {
                fn structural_hash(&self) -> u64 {
                    text(format_args!(concat!($name, ":{}"), self))
                }
            }
        )*
    };
}

impl_primitive_hash! {
    bool  => "bool",
    char  => "char",

    u8    => "u8",    i8    => "i8",
    u16   => "u16",   i16   => "i16",
    u32   => "u32",   i32   => "i32",
    u64   => "u64",   i64   => "i64",
    u128  => "u128",  i128  => "i128",
    usize => "usize", isize => "isize",

    str    => "string",
    String => "string",
}

// `{:?}` is the shortest text that round-trips, so distinct floats never
// render alike.
macro_rules! impl_float_hash {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl StructuralHash for $t {
                fn structural_hash(&self) -> u64 {
                    text(format_args!(concat!($name, ":{:?}"), self))
                }
            }
        )*
    };
}

impl_float_hash! {
    f32 => "f32",
    f64 => "f64",
}

impl StructuralHash for () {
    fn structural_hash(&self) -> u64 {
        NIL
    }
}
