//! Hash strategy selection by key category.
//!
//! Each key type declares which of three bucket functions it uses through
//! `ScalarKey::STRATEGY`. A map binds the matching function once, at
//! construction, and keeps it for its whole lifetime.

use core::fmt;
use core::ptr::NonNull;

/// The closed set of bucket functions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HashStrategy {
    /// `key mod table_size`, taking the non-negative remainder for negative keys.
    Modulo,
    /// The key's IEEE-754 bit pattern read as an unsigned integer, `mod table_size`.
    FloatBits,
    /// `((address * 6) mod (2 * table_size)) mod table_size`.
    Address,
}

/// Bucket function bound into a map: `(table_size, key) -> slot`.
pub type HashFn<K> = fn(usize, &K) -> usize;

impl HashStrategy {
    /// Map an already extracted scalar to a slot in `0..table_size`.
    ///
    /// `table_size` must be at least 1.
    #[inline]
    pub fn slot(self, table_size: usize, scalar: i128) -> usize {
        debug_assert!(table_size > 0);
        match self {
            HashStrategy::Modulo => scalar.rem_euclid(table_size as i128) as usize,
            HashStrategy::FloatBits => ((scalar as u128) % (table_size as u128)) as usize,
            HashStrategy::Address => {
                let addr = scalar as usize;
                (addr.wrapping_mul(6) % table_size.saturating_mul(2)) % table_size
            }
        }
    }

    pub(crate) fn bind<K: ScalarKey>(self) -> HashFn<K> {
        match self {
            HashStrategy::Modulo => hash_modulo::<K>,
            HashStrategy::FloatBits => hash_float_bits::<K>,
            HashStrategy::Address => hash_address::<K>,
        }
    }
}

fn hash_modulo<K: ScalarKey>(table_size: usize, key: &K) -> usize {
    HashStrategy::Modulo.slot(table_size, key.scalar())
}

fn hash_float_bits<K: ScalarKey>(table_size: usize, key: &K) -> usize {
    HashStrategy::FloatBits.slot(table_size, key.scalar())
}

fn hash_address<K: ScalarKey>(table_size: usize, key: &K) -> usize {
    HashStrategy::Address.slot(table_size, key.scalar())
}

/// A key whose equality is built-in and whose hash is derived from one scalar.
///
/// Implemented for the integer types, `bool`, `char`, `f32`, `f64`, raw and
/// `NonNull` pointers, and `ByAddress`. Implement it for a fieldless enum (or
/// any type whose `PartialEq` agrees with its scalar) to use it as a key.
///
/// Contract: `a == b` must imply `a.scalar() == b.scalar()`, otherwise equal
/// keys can land in different buckets and lookups miss.
pub trait ScalarKey: PartialEq {
    /// Strategy bound into a map whose keys are of this type.
    const STRATEGY: HashStrategy;

    /// The value the strategy hashes: the integer itself, the float's bit
    /// pattern, or the address.
    fn scalar(&self) -> i128;
}

macro_rules! integer_keys {
    ($($t:ty),* $(,)?) => {
        $(
            impl ScalarKey for $t {
                const STRATEGY: HashStrategy = HashStrategy::Modulo;
                #[inline]
                fn scalar(&self) -> i128 {
                    *self as i128
                }
            }
        )*
    };
}

integer_keys!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl ScalarKey for bool {
    const STRATEGY: HashStrategy = HashStrategy::Modulo;
    #[inline]
    fn scalar(&self) -> i128 {
        i128::from(*self)
    }
}

impl ScalarKey for char {
    const STRATEGY: HashStrategy = HashStrategy::Modulo;
    #[inline]
    fn scalar(&self) -> i128 {
        i128::from(u32::from(*self))
    }
}

// `-0.0 == 0.0`, so both must produce the same bits.
impl ScalarKey for f32 {
    const STRATEGY: HashStrategy = HashStrategy::FloatBits;
    #[inline]
    fn scalar(&self) -> i128 {
        let v = if *self == 0.0 { 0.0f32 } else { *self };
        i128::from(v.to_bits())
    }
}

impl ScalarKey for f64 {
    const STRATEGY: HashStrategy = HashStrategy::FloatBits;
    #[inline]
    fn scalar(&self) -> i128 {
        let v = if *self == 0.0 { 0.0f64 } else { *self };
        i128::from(v.to_bits())
    }
}

impl<T: ?Sized> ScalarKey for *const T {
    const STRATEGY: HashStrategy = HashStrategy::Address;
    #[inline]
    fn scalar(&self) -> i128 {
        self.cast::<()>() as usize as i128
    }
}

impl<T: ?Sized> ScalarKey for *mut T {
    const STRATEGY: HashStrategy = HashStrategy::Address;
    #[inline]
    fn scalar(&self) -> i128 {
        self.cast::<()>() as usize as i128
    }
}

impl<T: ?Sized> ScalarKey for NonNull<T> {
    const STRATEGY: HashStrategy = HashStrategy::Address;
    #[inline]
    fn scalar(&self) -> i128 {
        self.as_ptr().cast::<()>() as usize as i128
    }
}

/// Reference key compared and hashed by address, not by value.
///
/// Two `ByAddress` keys are equal only when they point at the same object.
pub struct ByAddress<'a, T: ?Sized>(pub &'a T);

impl<'a, T: ?Sized> ByAddress<'a, T> {
    #[inline]
    fn addr(&self) -> usize {
        (self.0 as *const T).cast::<()>() as usize
    }
}

impl<'a, T: ?Sized> Clone for ByAddress<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: ?Sized> Copy for ByAddress<'a, T> {}

impl<'a, T: ?Sized> PartialEq for ByAddress<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<'a, T: ?Sized> Eq for ByAddress<'a, T> {}

impl<'a, T: ?Sized> fmt::Debug for ByAddress<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByAddress({:#x})", self.addr())
    }
}

impl<'a, T: ?Sized> ScalarKey for ByAddress<'a, T> {
    const STRATEGY: HashStrategy = HashStrategy::Address;
    #[inline]
    fn scalar(&self) -> i128 {
        self.addr() as i128
    }
}
