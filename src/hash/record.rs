//! Implementations for user-defined records and enums.
//!
//! Rust has no way to walk the fields of an arbitrary struct, so records opt
//! in by naming their fields. Invoking the macro next to the type definition
//! gives it access to private fields, which take part in the hash like any
//! other field.

/// Implement [`StructuralHash`](crate::hash::StructuralHash) for a struct.
///
/// Fields are listed in declaration order, by name or by tuple index. The
/// hash is seeded with `"struct:<type-name>"` and folds every listed field
/// with `h = 31 * h + hash(field)`. Every field must be listed; a record
/// whose list misses one is rejected at compile time:
///
/// ```compile_fail
/// struct Account {
///     id: u32,
///     balance: i64,
/// }
/// extlib::hash_record!(Account { id });
/// ```
///
/// Generic records use the `impl<..>` form; every parameter must itself
/// implement `StructuralHash`.
///
/// ```
/// use extlib::{hash, hash_record};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// hash_record!(Point { x, y });
///
/// struct Meters(f64);
/// hash_record!(Meters { 0 });
///
/// struct Tagged<T> {
///     tag: u8,
///     value: T,
/// }
/// hash_record!(impl<T> Tagged<T> { tag, value });
///
/// assert_ne!(hash::calc(&Point { x: 1, y: 2 }), hash::calc(&Point { x: 2, y: 1 }));
/// assert_eq!(hash::calc(&Meters(1.5)), hash::calc(&Meters(1.5)));
/// assert_ne!(
///     hash::calc(&Tagged { tag: 0, value: "a" }),
///     hash::calc(&Tagged { tag: 1, value: "a" }),
/// );
/// ```
#[macro_export]
macro_rules! hash_record {
    (impl<$($param:ident),+ $(,)?> $ty:ty { $($field:tt),* $(,)? }) => {
        impl<$($param: $crate::hash::StructuralHash),+> $crate::hash::StructuralHash for $ty {
            fn structural_hash(&self) -> u64 {
                let seed = $crate::hash::text(::core::format_args!(
                    "struct:{}",
                    ::core::any::type_name::<Self>()
                ));
                let Self { $($field: _),* } = self;
                #[allow(unused_mut)]
                let mut fold = $crate::hash::Ordered::new(seed);
                $( fold.push(&self.$field); )*
                fold.finish()
            }
        }
    };
    ($ty:ty { $($field:tt),* $(,)? }) => {
        impl $crate::hash::StructuralHash for $ty {
            fn structural_hash(&self) -> u64 {
                let seed = $crate::hash::text(::core::format_args!(
                    "struct:{}",
                    ::core::any::type_name::<Self>()
                ));
                let Self { $($field: _),* } = self;
                #[allow(unused_mut)]
                let mut fold = $crate::hash::Ordered::new(seed);
                $( fold.push(&self.$field); )*
                fold.finish()
            }
        }
    };
}

/// Implement [`StructuralHash`](crate::hash::StructuralHash) for an enum.
///
/// Every variant is listed with a binding for each of its fields. Each
/// variant seeds with `"enum:<type-name>::<Variant>"` and folds its fields in
/// order. Missing variants or fields are compile errors.
///
/// ```
/// use extlib::{hash, hash_enum};
///
/// enum Shape {
///     Empty,
///     Circle(f64),
///     Rect { w: u32, h: u32 },
/// }
/// hash_enum!(Shape { Empty, Circle(r), Rect { w, h } });
///
/// assert_ne!(hash::calc(&Shape::Empty), hash::calc(&Shape::Circle(0.0)));
/// assert_ne!(
///     hash::calc(&Shape::Rect { w: 1, h: 2 }),
///     hash::calc(&Shape::Rect { w: 2, h: 1 }),
/// );
/// ```
#[macro_export]
macro_rules! hash_enum {
    (impl<$($param:ident),+ $(,)?> $ty:ty {
        $($variant:ident $(( $($field:ident),* $(,)? ))? $({ $($named:ident),* $(,)? })?),* $(,)?
    }) => {
        impl<$($param: $crate::hash::StructuralHash),+> $crate::hash::StructuralHash for $ty {
            fn structural_hash(&self) -> u64 {
                match self {
                    $(
                        Self::$variant $(( $($field),* ))? $({ $($named),* })? => {
                            let seed = $crate::hash::text(::core::format_args!(
                                "enum:{}::{}",
                                ::core::any::type_name::<Self>(),
                                ::core::stringify!($variant)
                            ));
                            #[allow(unused_mut)]
                            let mut fold = $crate::hash::Ordered::new(seed);
                            $($( fold.push($field); )*)?
                            $($( fold.push($named); )*)?
                            fold.finish()
                        }
                    )*
                }
            }
        }
    };
    ($ty:ty {
        $($variant:ident $(( $($field:ident),* $(,)? ))? $({ $($named:ident),* $(,)? })?),* $(,)?
    }) => {
        impl $crate::hash::StructuralHash for $ty {
            fn structural_hash(&self) -> u64 {
                match self {
                    $(
                        Self::$variant $(( $($field),* ))? $({ $($named),* })? => {
                            let seed = $crate::hash::text(::core::format_args!(
                                "enum:{}::{}",
                                ::core::any::type_name::<Self>(),
                                ::core::stringify!($variant)
                            ));
                            #[allow(unused_mut)]
                            let mut fold = $crate::hash::Ordered::new(seed);
                            $($( fold.push($field); )*)?
                            $($( fold.push($named); )*)?
                            fold.finish()
                        }
                    )*
                }
            }
        }
    };
}
