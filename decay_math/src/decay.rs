//! Exponential decay of a last known count
//!
//! A count observed at some base month is carried forward as
//! `base * k^n`, where `n` is the number of whole months elapsed.

/// Decay `base` forward by `months` whole months with monthly factor `k`.
///
/// `months == 0` returns `base` unchanged.
pub fn decay_forward(base: f64, k: f64, months: u32) -> f64 {
    match i32::try_from(months) {
        Ok(n) => base * k.powi(n),
        Err(_) => base * k.powf(months as f64),
    }
}
