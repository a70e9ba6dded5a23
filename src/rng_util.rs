/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Sample a value from the standard normal distribution using Box-Muller transform.
pub(crate) fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    // u1 in (0, 1] so the log stays finite
    let u1 = 1.0 - rng.f64();
    let u2 = f64_range(rng, 0.0, core::f64::consts::TAU);
    (-2.0 * u1.ln()).sqrt() * u2.cos()
}

/// Overwrite every component of `out` with an independent standard normal draw.
pub(crate) fn fill_standard_normal(rng: &mut fastrand::Rng, out: &mut [f64]) {
    for x in out.iter_mut() {
        *x = standard_normal(rng);
    }
}

/// Build an RNG from an optional seed.
pub(crate) fn rng_from(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}
