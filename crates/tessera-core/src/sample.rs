use std::cmp::Ordering;
use std::fmt::Debug;

use num_traits::Zero;

/// Element type that can be filtered.
///
/// Order statistics need a total order; floats use IEEE `total_cmp` so NaN
/// sorts above every finite value instead of poisoning the selection.
pub trait Sample: Copy + Send + Sync + Debug + PartialEq + Zero + 'static {
    fn order(&self, other: &Self) -> Ordering;
}

macro_rules! impl_sample_float {
    ($($t:ty),*) => {
        $(impl Sample for $t {
            #[inline]
            fn order(&self, other: &Self) -> Ordering {
                self.total_cmp(other)
            }
        })*
    };
}

macro_rules! impl_sample_int {
    ($($t:ty),*) => {
        $(impl Sample for $t {
            #[inline]
            fn order(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        })*
    };
}

impl_sample_float!(f32, f64);
impl_sample_int!(u8, u16, u32, u64, i8, i16, i32, i64);
