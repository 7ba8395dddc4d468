//! Seeded random streams, one per mission domain.
//!
//! Crew names, event picks and consequence impacts each draw from their own
//! stream, keyed off the user seed with HMAC-SHA256, so a change in how
//! often one domain draws leaves the others untouched. Every stream counts
//! its draws; the counts travel with the mission debrief.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::{RefCell, RefMut};

use crate::constants::{RNG_TAG_CONSEQUENCES, RNG_TAG_CREW, RNG_TAG_EVENTS};

/// Simulation domain owning a random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Crew,
    Events,
    Consequences,
}

impl Stream {
    pub const ALL: [Self; 3] = [Self::Crew, Self::Events, Self::Consequences];

    const fn tag(self) -> &'static [u8] {
        match self {
            Self::Crew => RNG_TAG_CREW,
            Self::Events => RNG_TAG_EVENTS,
            Self::Consequences => RNG_TAG_CONSEQUENCES,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Crew => 0,
            Self::Events => 1,
            Self::Consequences => 2,
        }
    }

    /// Seed for this domain: first eight bytes of `HMAC-SHA256(user_seed, tag)`.
    #[must_use]
    pub fn seed_for(self, user_seed: u64) -> u64 {
        let Ok(mut mac) = Hmac::<sha2::Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
            return user_seed;
        };
        mac.update(self.tag());
        let digest = mac.finalize().into_bytes();
        let mut head = [0_u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(head)
    }
}

/// Draw counts per stream, reported with the debrief.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngDraws {
    pub crew: u64,
    pub events: u64,
    pub consequences: u64,
}

/// The three mission streams behind interior mutability, so a shared
/// controller can draw while the caller holds `&mut MissionState`.
#[derive(Debug, Clone)]
pub struct RngBundle {
    streams: [RefCell<CountingRng<SmallRng>>; 3],
}

impl RngBundle {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let open = |stream: Stream| RefCell::new(CountingRng::seeded(stream.seed_for(seed)));
        Self {
            streams: Stream::ALL.map(open),
        }
    }

    #[must_use]
    pub fn stream(&self, stream: Stream) -> RefMut<'_, CountingRng<SmallRng>> {
        self.streams[stream.slot()].borrow_mut()
    }

    #[must_use]
    pub fn crew(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.stream(Stream::Crew)
    }

    #[must_use]
    pub fn events(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.stream(Stream::Events)
    }

    #[must_use]
    pub fn consequences(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.stream(Stream::Consequences)
    }

    /// Snapshot of how often each stream has been drawn from.
    #[must_use]
    pub fn draws(&self) -> RngDraws {
        let count = |stream: Stream| self.streams[stream.slot()].borrow().draws();
        RngDraws {
            crew: count(Stream::Crew),
            events: count(Stream::Events),
            consequences: count(Stream::Consequences),
        }
    }
}

/// `RngCore` adapter that counts calls into the wrapped generator.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    inner: R,
    draws: u64,
}

impl<R: SeedableRng> CountingRng<R> {
    fn seeded(seed: u64) -> Self {
        Self {
            inner: R::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R> CountingRng<R> {
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    fn bump(&mut self) -> &mut R {
        self.draws = self.draws.saturating_add(1);
        &mut self.inner
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.bump().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.bump().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bump().fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.bump().try_fill_bytes(dest)
    }
}
