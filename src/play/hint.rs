//! Random hint target selection

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform values in `[0, 1)`
///
/// Any `FnMut() -> f64` closure is a source, which keeps hint picks
/// reproducible in tests. Wrap a `rand` generator in [`RngSource`] for play.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

impl<F: FnMut() -> f64> UniformSource for F {
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Adapts any `rand::Rng` into a [`UniformSource`]
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Production hint generator
pub type HintRng = RngSource<Pcg32>;

impl HintRng {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        RngSource(Pcg32::from_os_rng())
    }

    /// Fixed seed for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        RngSource(Pcg32::seed_from_u64(seed))
    }
}

/// Pick one id at index `floor(rng * len)`
///
/// Returns `None` for an empty list, or when the source yields a value
/// outside `[0, 1)`.
pub fn pick_hint_target<'a, T, S>(ids: &'a [T], rng: &mut S) -> Option<&'a str>
where
    T: AsRef<str>,
    S: UniformSource + ?Sized,
{
    if ids.is_empty() {
        return None;
    }

    let unit = rng.next_unit();
    if !(0.0..1.0).contains(&unit) {
        log::warn!("Hint source produced {} outside [0, 1), no target picked", unit);
        return None;
    }

    let index = (unit * ids.len() as f64).floor() as usize;
    ids.get(index).map(AsRef::as_ref)
}
