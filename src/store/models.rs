//! Domain records held by the store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type Id = u64;

/// A registered account.
///
/// Never serialized directly to clients; handlers render views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub auth_token: String,
    pub address: Option<Address>,
    pub card: Option<Card>,
    pub followed_categories: BTreeSet<Id>,
    pub liked_products: BTreeSet<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

/// Card on file. Only the last four digits are retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub last4: String,
    pub holder_name: String,
    pub expiration_month: String,
    pub expiration_year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub merchant: String,
    pub price_cents: u64,
    #[serde(default = "yes")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category_ids: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    pub name: String,
    #[serde(default = "yes")]
    pub public: bool,
    #[serde(default = "yes")]
    pub active: bool,
    #[serde(default)]
    pub category_ids: Vec<Id>,
    #[serde(default)]
    pub member_ids: BTreeSet<Id>,
}

/// A group-buying offer on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Higgle {
    pub id: Id,
    pub slug: String,
    pub product_id: Id,
    #[serde(default)]
    pub group_id: Option<Id>,
    pub creator_id: Id,
    #[serde(default)]
    pub category_ids: Vec<Id>,
    pub quantity_sold: u32,
    pub price_cents: u64,
    #[serde(default = "yes")]
    pub running: bool,
    /// Monotonic stamp used for "most recently updated" ordering.
    #[serde(default)]
    pub updated_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Id,
    pub higgle_id: Id,
    pub user_id: Id,
    pub quantity: u32,
    pub price_cents: u64,
    pub charge_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterOffer {
    pub id: Id,
    pub higgle_id: Id,
    pub price_cents: u64,
    #[serde(default)]
    pub accepted_by: BTreeSet<Id>,
    #[serde(default)]
    pub declined_by: BTreeSet<Id>,
}

fn yes() -> bool {
    true
}
