//! In-memory store backed by `DashMap`.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::store::models::*;
use crate::store::{StoreError, UserLookup};

/// Anything stored by id.
pub trait Record: Clone {
    fn id(&self) -> Id;
}

macro_rules! record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> Id {
                self.id
            }
        })*
    };
}

record!(User, Product, Category, Group, Higgle, Order, CounterOffer);

/// One keyed collection.
#[derive(Debug)]
pub struct Table<T> {
    rows: DashMap<Id, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: DashMap::new() }
    }
}

impl<T: Record> Table<T> {
    pub fn get(&self, id: Id) -> Option<T> {
        self.rows.get(&id).map(|r| r.value().clone())
    }

    pub fn insert(&self, row: T) {
        self.rows.insert(row.id(), row);
    }

    /// Apply `f` to the row in place and return the updated copy.
    pub fn update(&self, id: Id, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut row = self.rows.get_mut(&id)?;
        f(row.value_mut());
        Some(row.value().clone())
    }

    /// All rows ordered by id.
    pub fn all(&self) -> Vec<T> {
        let mut rows: Vec<T> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(Record::id);
        rows
    }

    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.all().into_iter().find(|row| predicate(row))
    }

    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        self.all().into_iter().filter(|row| predicate(row)).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fields needed to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub auth_token: Option<String>,
}

/// Thread-safe store for every domain collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sequence: AtomicU64,
    tokens: DashMap<String, Id>,
    pub users: Table<User>,
    pub products: Table<Product>,
    pub categories: Table<Category>,
    pub groups: Table<Group>,
    pub higgles: Table<Higgle>,
    pub orders: Table<Order>,
    pub counter_offers: Table<CounterOffer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free id, shared by all collections.
    pub fn next_id(&self) -> Id {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Make sure generated ids stay above `id`.
    pub fn reserve(&self, id: Id) {
        self.sequence.fetch_max(id, Ordering::Relaxed);
    }

    /// Monotonic stamp for ordering updates.
    pub fn tick(&self) -> u64 {
        self.next_id()
    }

    /// Register a user, hashing the password.
    pub fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        if self.user_by_email(&new.email).is_some() {
            return Err(StoreError::DuplicateEmail(new.email));
        }
        let user = User {
            id: self.next_id(),
            name: new.name,
            email: new.email,
            password_hash: hash_password(&new.password)?,
            auth_token: new
                .auth_token
                .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
            address: None,
            card: None,
            followed_categories: BTreeSet::new(),
            liked_products: BTreeSet::new(),
        };
        self.tokens.insert(user.auth_token.clone(), user.id);
        self.users.insert(user.clone());
        Ok(user)
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn update_user(&self, id: Id, f: impl FnOnce(&mut User)) -> Option<User> {
        self.users.update(id, f)
    }

    /// Insert a record with a fixed id, keeping the sequence ahead of it.
    pub fn seed<T: Record>(&self, table: &Table<T>, row: T) {
        self.reserve(row.id());
        table.insert(row);
    }

    /// Running higgles, most recently updated first.
    pub fn running_higgles(&self) -> Vec<Higgle> {
        let mut higgles = self.higgles.filter(|h| h.running);
        higgles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        higgles
    }

    pub fn higgles_count(&self, category_id: Id) -> usize {
        self.higgles
            .filter(|h| h.category_ids.contains(&category_id))
            .len()
    }

    pub fn order_for(&self, higgle_id: Id, user_id: Id) -> Option<Order> {
        self.orders
            .find(|o| o.higgle_id == higgle_id && o.user_id == user_id)
    }

    pub fn counter_offer_for(&self, higgle_id: Id) -> Option<CounterOffer> {
        self.counter_offers.find(|c| c.higgle_id == higgle_id)
    }
}

impl UserLookup for MemoryStore {
    fn find_by_token(&self, token: &str) -> Option<User> {
        let id = *self.tokens.get(token)?.value();
        self.users.get(id)
    }

    fn find_by_email_and_password(&self, email: &str, password: &str) -> Option<User> {
        let user = self.user_by_email(email)?;
        verify_password(password, &user.password_hash).then_some(user)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
