//! Bit-depth rescaling
//!
//! Maps the full range of the native sample type linearly onto the full
//! range of the target type:
//!
//! ```text
//! factor = (max(native) + 1) / (max(target) + 1)
//! out    = floor(in / factor)
//! ```
//!
//! Both ranges are powers of two, so the division is evaluated exactly as
//! `in * (max(target) + 1) / (max(native) + 1)` in 128-bit integers.

use ndarray::{Array, Dimension};

use crate::pixels::datatype::{Datatype, Sample};

/// Divisor applied to native samples when converting to `target`
pub fn scale_factor(native: Datatype, target: Datatype) -> f64 {
    (native.max_value() + 1) as f64 / (target.max_value() + 1) as f64
}

/// Rescales one sample from `T` to `U`, truncating toward zero
pub fn rescale_value<T: Sample, U: Sample>(value: T) -> U {
    let numerator = U::DATATYPE.max_value() as u128 + 1;
    let denominator = T::DATATYPE.max_value() as u128 + 1;
    U::from_u64((value.to_u64() as u128 * numerator / denominator) as u64)
}

/// Rescales every sample of `data` from `T` to `U`
///
/// Always produces a new array, even when `T` and `U` are the same type.
pub fn rescale<T, U, D>(data: &Array<T, D>) -> Array<U, D>
where
    T: Sample,
    U: Sample,
    D: Dimension,
{
    data.mapv(rescale_value::<T, U>)
}
