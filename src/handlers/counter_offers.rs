//! Counter-offer endpoints.

use serde::Serialize;

use crate::handlers::{Action, ActionResult, Call, Handler, HandlerError, OrNotFound};
use crate::http::response::ResponseEnvelope;
use crate::store::models::{CounterOffer, Id};

#[derive(Debug, Serialize)]
pub struct CounterOfferView {
    pub id: Id,
    pub higgle_id: Id,
    pub price_cents: u64,
    pub accepted: bool,
    pub declined: bool,
}

#[derive(Debug, Default)]
pub struct CounterOfferApi;

impl Handler for CounterOfferApi {
    const NAME: &'static str = "CounterOfferAPI";
    const AUTHENTICATED_ACTIONS: &'static [&'static str] = &["show", "accept", "decline"];

    fn action(id: &str) -> Option<Action<Self>> {
        let action: Action<Self> = match id {
            "show" => Self::show,
            "accept" => Self::accept,
            "decline" => Self::decline,
            _ => return None,
        };
        Some(action)
    }
}

impl CounterOfferApi {
    fn show(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let store = call.store();
        let higgle = call
            .params()
            .id("higgle_id")
            .and_then(|id| store.higgles.get(id))
            .or_not_found()?;
        let offer = store.counter_offer_for(higgle.id).or_not_found()?;
        let view = CounterOfferView {
            id: offer.id,
            higgle_id: offer.higgle_id,
            price_cents: offer.price_cents,
            accepted: offer.accepted_by.contains(&user.id),
            declined: offer.declined_by.contains(&user.id),
        };
        Ok(ResponseEnvelope::json(200, &view)?)
    }

    /// Move the user's order on the higgle to the counter-offer price.
    fn accept(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let store = call.store();
        let offer = self.counter_offer(call)?;
        let order = store.order_for(offer.higgle_id, user.id).or_not_found()?;

        store.orders.update(order.id, |o| o.price_cents = offer.price_cents);
        store.counter_offers.update(offer.id, |c| {
            c.declined_by.remove(&user.id);
            c.accepted_by.insert(user.id);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn decline(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let offer = self.counter_offer(call)?;
        call.store().counter_offers.update(offer.id, |c| {
            c.accepted_by.remove(&user.id);
            c.declined_by.insert(user.id);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn counter_offer(&self, call: &Call<'_>) -> Result<CounterOffer, HandlerError> {
        call.params()
            .id("counter_offer_id")
            .and_then(|id| call.store().counter_offers.get(id))
            .or_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::*;
    use crate::store::models::{Higgle, Order};

    fn run(action: &str, call: &Call<'_>) -> ActionResult {
        let f = CounterOfferApi::action(action).unwrap();
        f(&mut CounterOfferApi, call)
    }

    fn seeded(with_order: bool) -> (crate::handlers::Services, Id) {
        let (services, user_id) = services_with_user();
        let store = &services.store;
        store.seed(
            &store.higgles,
            Higgle {
                id: 50,
                slug: "bike".into(),
                product_id: 1,
                group_id: None,
                creator_id: user_id,
                category_ids: vec![],
                quantity_sold: 1,
                price_cents: 1_000,
                running: true,
                updated_at: 0,
            },
        );
        store.seed(
            &store.counter_offers,
            CounterOffer {
                id: 60,
                higgle_id: 50,
                price_cents: 800,
                accepted_by: Default::default(),
                declined_by: Default::default(),
            },
        );
        if with_order {
            store.seed(
                &store.orders,
                Order {
                    id: 70,
                    higgle_id: 50,
                    user_id,
                    quantity: 1,
                    price_cents: 1_000,
                    charge_id: "ch_1".into(),
                },
            );
        }
        (services, user_id)
    }

    #[test]
    fn test_show() {
        let (services, _) = seeded(false);
        let body = json(&run("show", &authed(&services, &[("higgle_id", "50")])).unwrap());
        assert_eq!(body["price_cents"], 800);
        assert_eq!(body["accepted"], false);

        let err = run("show", &authed(&services, &[("higgle_id", "51")])).unwrap_err();
        assert!(matches!(err, HandlerError::ResourceNotFound));
    }

    #[test]
    fn test_accept_reprices_order() {
        let (services, user_id) = seeded(true);
        let envelope = run("accept", &authed(&services, &[("counter_offer_id", "60")])).unwrap();
        assert_eq!(envelope.body_str(), "ok");
        assert_eq!(services.store.orders.get(70).unwrap().price_cents, 800);
        assert!(services.store.counter_offers.get(60).unwrap().accepted_by.contains(&user_id));
    }

    #[test]
    fn test_accept_without_order() {
        let (services, _) = seeded(false);
        let err = run("accept", &authed(&services, &[("counter_offer_id", "60")])).unwrap_err();
        assert!(matches!(err, HandlerError::ResourceNotFound));
    }

    #[test]
    fn test_decline() {
        let (services, user_id) = seeded(false);
        run("decline", &authed(&services, &[("counter_offer_id", "60")])).unwrap();
        let offer = services.store.counter_offers.get(60).unwrap();
        assert!(offer.declined_by.contains(&user_id));
        assert!(offer.accepted_by.is_empty());
    }
}
