use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::f64::consts::TAU;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Velocity drawn in plane-polar form: speed uniform in `[0, max_speed)`, heading uniform in
/// `[0, 2π)`. Not uniform over the disc area; slow agents are over-represented.
pub fn polar_velocity<R: Rng + ?Sized>(rng: &mut R, max_speed: f64) -> [f64; 2] {
    let speed = rng.random::<f64>() * max_speed;
    let heading = rng.random::<f64>() * TAU;
    [speed * heading.cos(), speed * heading.sin()]
}
