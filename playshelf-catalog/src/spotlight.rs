//! Spotlight rotation over the featured pool.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::SPOTLIGHT_FALLBACK_POOL;
use crate::record::{Catalog, GameRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    const fn step(self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpotlightState {
    #[default]
    Empty,
    /// Id of the highlighted record. Not necessarily a pool member after
    /// [`Spotlight::focus`].
    Active { current: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Spotlight {
    pool: Vec<usize>,
    state: SpotlightState,
}

impl Spotlight {
    /// Build the pool from featured records, or the first records when none
    /// are featured, and pick a random starting record.
    #[must_use]
    pub fn init<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Self {
        Self::init_with_fallback(catalog, SPOTLIGHT_FALLBACK_POOL, rng)
    }

    #[must_use]
    pub fn init_with_fallback<R: Rng + ?Sized>(
        catalog: &Catalog,
        fallback: usize,
        rng: &mut R,
    ) -> Self {
        let featured: Vec<usize> = catalog
            .iter()
            .filter(|record| record.featured)
            .map(|record| record.id)
            .collect();
        let pool = if featured.is_empty() {
            catalog.iter().take(fallback).map(|record| record.id).collect()
        } else {
            featured
        };
        let mut spotlight = Self {
            pool,
            state: SpotlightState::Empty,
        };
        spotlight.refresh(rng);
        spotlight
    }

    #[must_use]
    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    #[must_use]
    pub const fn state(&self) -> SpotlightState {
        self.state
    }

    #[must_use]
    pub const fn current_id(&self) -> Option<usize> {
        match self.state {
            SpotlightState::Empty => None,
            SpotlightState::Active { current } => Some(current),
        }
    }

    #[must_use]
    pub fn current<'c>(&self, catalog: &'c Catalog) -> Option<&'c GameRecord> {
        self.current_id().and_then(|id| catalog.get(id))
    }

    #[must_use]
    pub fn is_in_pool(&self) -> bool {
        self.current_id()
            .is_some_and(|id| self.pool.contains(&id))
    }

    /// Uniform re-pick from the pool; may land on the current record again.
    pub fn refresh<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.pool.is_empty() {
            return;
        }
        let index = rng.gen_range(0..self.pool.len());
        self.state = SpotlightState::Active {
            current: self.pool[index],
        };
    }

    /// Step circularly through the pool. A current record outside the pool
    /// counts as index -1.
    pub fn shift(&mut self, direction: Direction) {
        let Ok(len) = isize::try_from(self.pool.len()) else {
            return;
        };
        if len == 0 {
            return;
        }
        let index = self
            .current_id()
            .and_then(|id| self.pool.iter().position(|member| *member == id))
            .and_then(|position| isize::try_from(position).ok())
            .unwrap_or(-1);
        let next = (index + direction.step() + len).rem_euclid(len);
        if let Ok(next) = usize::try_from(next) {
            self.state = SpotlightState::Active {
                current: self.pool[next],
            };
        }
    }

    /// Highlight an arbitrary record, bypassing pool membership.
    pub const fn focus(&mut self, id: usize) {
        self.state = SpotlightState::Active { current: id };
    }

    /// Bring an out-of-pool focus back into the pool.
    pub fn settle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.is_in_pool() {
            self.refresh(rng);
        }
    }
}
