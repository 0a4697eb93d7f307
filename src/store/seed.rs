//! JSON fixtures for the in-memory store.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::store::models::*;
use crate::store::{MemoryStore, NewUser, StoreError};

/// A user as written in a fixture file (plain-text password).
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub users: Vec<SeedUser>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub groups: Vec<Group>,
    pub higgles: Vec<Higgle>,
    pub counter_offers: Vec<CounterOffer>,
}

impl Seed {
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load every record into `store`.
    pub fn apply(self, store: &MemoryStore) -> Result<(), StoreError> {
        // Fixed ids first so generated user ids land above them.
        for row in self.categories {
            store.seed(&store.categories, row);
        }
        for row in self.products {
            store.seed(&store.products, row);
        }
        for row in self.groups {
            store.seed(&store.groups, row);
        }
        for row in self.higgles {
            store.seed(&store.higgles, row);
        }
        for row in self.counter_offers {
            store.seed(&store.counter_offers, row);
        }
        for seed in self.users {
            let user = store.create_user(NewUser {
                name: seed.name,
                email: seed.email,
                password: seed.password,
                auth_token: seed.auth_token,
            })?;
            if let Some(address) = seed.address {
                store.update_user(user.id, |u| u.address = Some(address));
            }
        }
        Ok(())
    }
}

impl MemoryStore {
    /// Build a store from a JSON fixture.
    pub fn load_seed(path: &Path) -> Result<Self, StoreError> {
        let store = Self::new();
        Seed::from_file(path)?.apply(&store)?;
        tracing::info!(
            users = store.users.len(),
            products = store.products.len(),
            higgles = store.higgles.len(),
            "Store seeded"
        );
        Ok(store)
    }
}
