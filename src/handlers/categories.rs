//! Category endpoints.

use serde::Serialize;

use crate::handlers::{Action, ActionResult, Call, Handler, HandlerError, OrNotFound};
use crate::http::response::ResponseEnvelope;
use crate::store::models::{Category, Id};

const INDEX_LIMIT: usize = 20;

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: Id,
    pub name: String,
    pub products: Vec<Id>,
    pub following_count: usize,
    pub higgles_count: usize,
}

#[derive(Debug, Default)]
pub struct CategoryApi {
    category: Option<Category>,
}

impl Handler for CategoryApi {
    const NAME: &'static str = "CategoryAPI";
    const AUTHENTICATED_ACTIONS: &'static [&'static str] = &["follow", "unfollow"];

    fn action(id: &str) -> Option<Action<Self>> {
        let action: Action<Self> = match id {
            "index" => Self::index,
            "follow" => Self::follow,
            "unfollow" => Self::unfollow,
            _ => return None,
        };
        Some(action)
    }
}

impl CategoryApi {
    /// Categories with products or higgles, busiest first.
    fn index(&mut self, call: &Call<'_>) -> ActionResult {
        let store = call.store();
        let users = store.users.all();
        let mut views: Vec<CategoryView> = store
            .categories
            .all()
            .into_iter()
            .map(|category| {
                let products = store
                    .products
                    .filter(|p| p.category_ids.contains(&category.id))
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                CategoryView {
                    following_count: users
                        .iter()
                        .filter(|u| u.followed_categories.contains(&category.id))
                        .count(),
                    higgles_count: store.higgles_count(category.id),
                    products,
                    id: category.id,
                    name: category.name,
                }
            })
            .filter(|view| !view.products.is_empty() || view.higgles_count > 0)
            .collect();

        views.sort_by(|a, b| b.higgles_count.cmp(&a.higgles_count).then(a.id.cmp(&b.id)));
        views.truncate(INDEX_LIMIT);
        Ok(ResponseEnvelope::json(200, &views)?)
    }

    fn follow(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let category = self.current_category(call)?.id;
        call.store().update_user(user.id, |u| {
            u.followed_categories.insert(category);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn unfollow(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let category = self.current_category(call)?.id;
        call.store().update_user(user.id, |u| {
            u.followed_categories.remove(&category);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn current_category(&mut self, call: &Call<'_>) -> Result<&Category, HandlerError> {
        if self.category.is_none() {
            self.category = call
                .params()
                .id("category_id")
                .and_then(|id| call.store().categories.get(id));
        }
        self.category.as_ref().or_not_found()
    }
}
