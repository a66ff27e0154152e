//! Seeded, domain-separated random streams.
//!
//! Each consumer of randomness draws from its own stream so that, for a
//! given seed, shuffling results never perturbs the spotlight pick.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

#[derive(Debug)]
pub struct RngBundle {
    seed: u64,
    spotlight: RefCell<CountingRng<SmallRng>>,
    shuffle: RefCell<CountingRng<SmallRng>>,
    ticker: RefCell<CountingRng<SmallRng>>,
    surprise: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            spotlight: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"spotlight"))),
            shuffle: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"shuffle"))),
            ticker: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"ticker"))),
            surprise: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"surprise"))),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(rand::random())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn spotlight(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.spotlight.borrow_mut()
    }

    #[must_use]
    pub fn shuffle(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.shuffle.borrow_mut()
    }

    #[must_use]
    pub fn ticker(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.ticker.borrow_mut()
    }

    #[must_use]
    pub fn surprise(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.surprise.borrow_mut()
    }

    /// Total draws across all streams.
    #[must_use]
    pub fn total_draws(&self) -> u64 {
        [&self.spotlight, &self.shuffle, &self.ticker, &self.surprise]
            .iter()
            .map(|stream| stream.borrow().draws())
            .sum()
    }
}

/// Stream wrapper that counts every draw.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
