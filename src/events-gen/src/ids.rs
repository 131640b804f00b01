use std::collections::HashSet;

use rand::Rng;
use sha2::Digest;
use sha2::Sha256;
use uuid::Uuid;

use crate::error::EventsGenError;
use crate::error::Result;

pub const PRODUCTS_COUNT: usize = 100;
pub const USERS_COUNT: usize = 500;

/// Makes an opaque entity id.
///
/// A seeded id is the hex encoded SHA-256 of the seed, so the same seed always
/// maps to the same id. Without a seed a random UUID v4 is returned.
pub fn generate_id(seed: Option<&str>) -> String {
    match seed {
        Some(seed) => hex::encode(Sha256::digest(seed.as_bytes())),
        None => Uuid::new_v4().to_string(),
    }
}

/// Fixed set of deterministic ids derived from `<prefix>_1..<prefix>_<size>`.
#[derive(Debug, Clone)]
pub struct IdPool {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl IdPool {
    pub fn new(prefix: &str, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EventsGenError::Config(format!(
                "{prefix} id pool should not be empty"
            )));
        }
        let ids: Vec<String> = (1..=size)
            .map(|i| generate_id(Some(format!("{prefix}_{i}").as_str())))
            .collect();
        let index = ids.iter().cloned().collect();

        Ok(Self { ids, index })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // non-empty, checked in new
        &self.ids[rng.gen_range(0..self.ids.len())]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// Product and user pools, built once per run and shared by every generator.
#[derive(Debug, Clone)]
pub struct IdPools {
    pub products: IdPool,
    pub users: IdPool,
}

impl IdPools {
    pub fn new() -> Result<Self> {
        Ok(Self {
            products: IdPool::new("product", PRODUCTS_COUNT)?,
            users: IdPool::new("user", USERS_COUNT)?,
        })
    }
}
