use num_traits::{One, PrimInt};

/// An enum whose variants each name one bit of a mask.
///
/// With `#[repr(u8)]` the discriminant is the bit index.
pub trait FlagBitmask: Copy {
    type Storage: PrimInt;

    fn bit_index(self) -> u8;

    fn mask(self) -> Self::Storage {
        // `bit_index` must be below the bit width of `Storage`.
        Self::Storage::one() << usize::from(self.bit_index())
    }
}

/// A set of flags stored as a primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn from_flags<U: FlagBitmask<Storage = T>>(flags: &[U]) -> Self {
        Self::new(flags.iter().fold(T::zero(), |bits, f| bits | f.mask()))
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }
}

/// Declare a flag enum with explicit bit indices and implement
/// [`FlagBitmask`] for it.
///
/// ```rust
/// combat_physics::define_bitmask_flags!(Layer, u32, {
///     Terrain = 0,
///     Props = 3,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident = $bit:literal),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $bit),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(self) -> u8 {
                self as u8
            }
        }
    };
}
