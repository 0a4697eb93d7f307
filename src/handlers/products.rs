//! Product catalogue endpoints.

use serde::Serialize;

use crate::handlers::{paginate, Action, ActionResult, Call, Handler, OrNotFound};
use crate::http::response::ResponseEnvelope;
use crate::store::models::{Id, Product};
use crate::store::MemoryStore;

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: Id,
    pub name: String,
    pub merchant: String,
    pub price_cents: u64,
    pub categories: Vec<CategoryRef>,
    pub liked: bool,
}

impl ProductView {
    fn render(product: Product, store: &MemoryStore, liked: bool) -> Self {
        let categories = product
            .category_ids
            .iter()
            .filter_map(|id| store.categories.get(*id))
            .map(|c| CategoryRef { id: c.id, name: c.name })
            .collect();
        Self {
            id: product.id,
            name: product.name,
            merchant: product.merchant,
            price_cents: product.price_cents,
            categories,
            liked,
        }
    }
}

#[derive(Debug, Default)]
pub struct ProductApi;

impl Handler for ProductApi {
    const NAME: &'static str = "ProductAPI";
    const AUTHENTICATED_ACTIONS: &'static [&'static str] = &["liked", "like"];

    fn action(id: &str) -> Option<Action<Self>> {
        let action: Action<Self> = match id {
            "index" => Self::index,
            "show" => Self::show,
            "liked" => Self::liked,
            "like" => Self::like,
            "dislike" => Self::dislike,
            _ => return None,
        };
        Some(action)
    }
}

impl ProductApi {
    fn index(&mut self, call: &Call<'_>) -> ActionResult {
        let store = call.store();
        let liked = call
            .current_user()
            .map(|u| u.liked_products.clone())
            .unwrap_or_default();
        let products = store.products.filter(|p| p.active && p.featured);
        let views: Vec<_> = paginate(products, call.params())
            .into_iter()
            .map(|p| {
                let is_liked = liked.contains(&p.id);
                ProductView::render(p, store, is_liked)
            })
            .collect();
        Ok(ResponseEnvelope::json(200, &views)?)
    }

    fn show(&mut self, call: &Call<'_>) -> ActionResult {
        let product = call.params().id("id").and_then(|id| call.store().products.get(id)).or_not_found()?;
        let liked = call
            .current_user()
            .is_some_and(|u| u.liked_products.contains(&product.id));
        Ok(ResponseEnvelope::json(200, &ProductView::render(product, call.store(), liked))?)
    }

    fn liked(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let store = call.store();
        let products: Vec<_> = user
            .liked_products
            .iter()
            .filter_map(|id| store.products.get(*id))
            .collect();
        let views: Vec<_> = paginate(products, call.params())
            .into_iter()
            .map(|p| ProductView::render(p, store, true))
            .collect();
        Ok(ResponseEnvelope::json(200, &views)?)
    }

    fn like(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let product = self.product(call)?;
        call.store().update_user(user.id, |u| {
            u.liked_products.insert(product.id);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn dislike(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let product = self.product(call)?;
        call.store().update_user(user.id, |u| {
            u.liked_products.remove(&product.id);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn product(&self, call: &Call<'_>) -> Result<Product, crate::handlers::HandlerError> {
        call.params()
            .id("product_id")
            .and_then(|id| call.store().products.get(id))
            .or_not_found()
    }
}
