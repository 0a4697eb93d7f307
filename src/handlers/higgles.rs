//! Higgle (group purchase) endpoints.
//!
//! # Responsibilities
//! - List running higgles, by category, group or creator
//! - Create a higgle and place the creator's order
//! - Join a running higgle with a new order
//!
//! # Design Decisions
//! - Missing `higgle_price`/`quantity` on create is a validation failure (501)
//! - Order validation errors are returned per field (403)
//! - Card updates and gateway declines share the generic 403 message
//! - A higgle is only stored once its first order has been charged

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::handlers::users::LoginView;
use crate::handlers::{
    paginate, parse_cents, Action, ActionResult, Call, Handler, HandlerError, OrNotFound,
};
use crate::http::response::ResponseEnvelope;
use crate::payments::{Charge, PaymentFailure};
use crate::store::models::{Address, Card, Higgle, Id, Order, User};

#[derive(Debug, Serialize)]
pub struct HiggleView {
    pub id: Id,
    pub slug: String,
    pub product_id: Id,
    pub product_name: Option<String>,
    pub group_id: Option<Id>,
    pub categories: Vec<Id>,
    pub quantity_sold: u32,
    pub price_cents: u64,
    pub running: bool,
}

#[derive(Debug, Default)]
pub struct HiggleApi;

impl Handler for HiggleApi {
    const NAME: &'static str = "HiggleAPI";
    const AUTHENTICATED_ACTIONS: &'static [&'static str] =
        &["create", "join", "higgles_created_by_user"];

    fn action(id: &str) -> Option<Action<Self>> {
        let action: Action<Self> = match id {
            "login" => Self::login,
            "create" => Self::create,
            "index" => Self::index,
            "join" => Self::join,
            "higgles_created_by_user" => Self::higgles_created_by_user,
            "for_category" => Self::for_category,
            "for_group" => Self::for_group,
            _ => return None,
        };
        Some(action)
    }
}

impl HiggleApi {
    fn login(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        Ok(ResponseEnvelope::json(200, &LoginView::from(user))?)
    }

    fn index(&mut self, call: &Call<'_>) -> ActionResult {
        let higgles = call.store().running_higgles();
        self.render(call, higgles)
    }

    fn higgles_created_by_user(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let mut higgles = call.store().higgles.filter(|h| h.creator_id == user.id);
        higgles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        self.render(call, higgles)
    }

    /// Higgles of a category, one per product.
    fn for_category(&mut self, call: &Call<'_>) -> ActionResult {
        let store = call.store();
        let category = call
            .params()
            .id("category_id")
            .and_then(|id| store.categories.get(id))
            .or_not_found()?;

        let mut higgles = store.higgles.filter(|h| h.category_ids.contains(&category.id));
        higgles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        let mut seen = HashSet::new();
        higgles.retain(|h| seen.insert(h.product_id));

        let page = paginate(higgles, call.params());
        self.render(call, page)
    }

    fn for_group(&mut self, call: &Call<'_>) -> ActionResult {
        let store = call.store();
        let group = call
            .params()
            .id("group_id")
            .and_then(|id| store.groups.get(id))
            .or_not_found()?;

        let mut higgles = store.higgles.filter(|h| h.group_id == Some(group.id));
        higgles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        self.render(call, higgles)
    }

    fn create(&mut self, call: &Call<'_>) -> ActionResult {
        let params = call.params();
        let (Some(price), Some(quantity)) = (params.present("higgle_price"), params.present("quantity")) else {
            return Err(HandlerError::Validation(
                "higgle_price and quantity are required".to_string(),
            ));
        };
        let user = call.require_user()?;
        let store = call.store();

        let product = params
            .id("product_id")
            .and_then(|id| store.products.get(id))
            .or_not_found()?;
        let group_id = params
            .id("group_id")
            .and_then(|id| store.groups.get(id))
            .map(|g| g.id);

        let price_cents = parse_cents(price)
            .ok_or_else(|| PaymentFailure::field("higgle_price", "is not a number"))?;
        let quantity = parse_quantity(quantity);

        self.process_address(call, user);
        self.process_billing(call, user)?;

        let higgle = Higgle {
            id: store.next_id(),
            slug: uuid::Uuid::new_v4().simple().to_string(),
            product_id: product.id,
            group_id,
            creator_id: user.id,
            category_ids: product.category_ids.clone(),
            quantity_sold: quantity,
            price_cents,
            running: true,
            updated_at: store.tick(),
        };
        self.create_order(call, user.id, &higgle, quantity)?;
        store.higgles.insert(higgle.clone());

        Ok(ResponseEnvelope::json(200, &serde_json::json!({ "slug": higgle.slug }))?)
    }

    fn join(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let store = call.store();
        let higgle = call
            .params()
            .id("higgle_id")
            .and_then(|id| store.higgles.get(id))
            .filter(|h| h.running)
            .or_not_found()?;
        let quantity = call.params().present("quantity").map(parse_quantity).unwrap_or(0);

        self.create_order(call, user.id, &higgle, quantity)?;
        let stamp = store.tick();
        store.higgles.update(higgle.id, |h| {
            h.quantity_sold = h.quantity_sold.saturating_add(quantity);
            h.updated_at = stamp;
        });

        Ok(ResponseEnvelope::json(200, &serde_json::json!({ "id": higgle.id }))?)
    }

    /// Validate, charge and store an order for `user_id`.
    fn create_order(
        &self,
        call: &Call<'_>,
        user_id: Id,
        higgle: &Higgle,
        quantity: u32,
    ) -> Result<Order, HandlerError> {
        let store = call.store();
        // Re-read: address and card may have been updated earlier in this call.
        let user = store.users.get(user_id).or_not_found()?;

        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if user.address.is_none() {
            errors.entry("address".into()).or_default().push("can't be blank".into());
        }
        if quantity == 0 {
            errors
                .entry("quantity".into())
                .or_default()
                .push("must be greater than 0".into());
        }
        let card_number = call
            .params()
            .present("last4_credit_card")
            .map(str::to_string)
            .or_else(|| user.card.as_ref().map(|c| c.last4.clone()));
        if card_number.is_none() {
            errors
                .entry("credit_card".into())
                .or_default()
                .push("can't be blank".into());
        }
        let Some(card_number) = card_number.filter(|_| errors.is_empty()) else {
            return Err(PaymentFailure::Rejected(errors).into());
        };

        let receipt = call.payments().charge(&Charge {
            user_id: user.id,
            amount_cents: higgle.price_cents.saturating_mul(u64::from(quantity)),
            card_number,
            description: format!("higgle {}", higgle.slug),
        })?;

        let order = Order {
            id: store.next_id(),
            higgle_id: higgle.id,
            user_id: user.id,
            quantity,
            price_cents: higgle.price_cents,
            charge_id: receipt.charge_id,
        };
        store.orders.insert(order.clone());
        Ok(order)
    }

    /// Create or replace the user's address when one is submitted.
    fn process_address(&self, call: &Call<'_>, user: &User) {
        let params = call.params();
        let Some(line) = params.present("address_line") else {
            return;
        };
        let submitted = Address {
            line: line.to_string(),
            city: params.get("address_city").unwrap_or_default().to_string(),
            state: params.get("address_state").unwrap_or_default().to_string(),
            zip_code: params.get("address_zipcode").unwrap_or_default().to_string(),
        };
        if user.address.as_ref() == Some(&submitted) {
            return;
        }
        call.store().update_user(user.id, |u| u.address = Some(submitted));
    }

    /// Replace the card on file when different card details are submitted.
    fn process_billing(&self, call: &Call<'_>, user: &User) -> Result<(), PaymentFailure> {
        let params = call.params();
        let Some(number) = params.present("last4_credit_card") else {
            return Ok(());
        };
        let last4 = number
            .char_indices()
            .rev()
            .nth(3)
            .map_or(number, |(i, _)| &number[i..])
            .to_string();
        let holder_name = params.present("credit_card_holder_name");
        let month = params.present("credit_card_expiration_month");
        let year = params.present("credit_card_expiration_year");

        let (Some(holder_name), Some(month), Some(year)) = (holder_name, month, year) else {
            return Err(PaymentFailure::Declined("incomplete card details".to_string()));
        };
        let card = Card {
            last4,
            holder_name: holder_name.to_string(),
            expiration_month: month.to_string(),
            expiration_year: year.to_string(),
        };
        if user.card.as_ref() == Some(&card) {
            return Ok(());
        }
        call.store().update_user(user.id, |u| u.card = Some(card));
        Ok(())
    }

    fn render(&self, call: &Call<'_>, higgles: Vec<Higgle>) -> ActionResult {
        let store = call.store();
        let views: Vec<HiggleView> = higgles
            .into_iter()
            .map(|h| HiggleView {
                product_name: store.products.get(h.product_id).map(|p| p.name),
                id: h.id,
                slug: h.slug,
                product_id: h.product_id,
                group_id: h.group_id,
                categories: h.category_ids,
                quantity_sold: h.quantity_sold,
                price_cents: h.price_cents,
                running: h.running,
            })
            .collect();
        Ok(ResponseEnvelope::json(200, &views)?)
    }
}

/// Non-numeric or negative quantities count as zero.
fn parse_quantity(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}
