//! The application's route table.
//!
//! Routes are matched in the order drawn here, first match wins. A template
//! ending in `/` also matches everything below it, so specific routes come
//! before the prefix they overlap.

use crate::handlers::{CategoryApi, CounterOfferApi, GroupApi, HiggleApi, ProductApi, UserApi};
use crate::routing::{Router, RouterError};

/// Build the registry.
pub fn draw() -> Result<Router, RouterError> {
    let mut routes = Router::builder();

    routes
        .get::<ProductApi>("/products/liked", "liked")?
        .get::<ProductApi>("/products/", "index")?
        .get::<ProductApi>("/product/:id", "show")?
        .post::<ProductApi>("/products/:product_id/like", "like")?
        .delete::<ProductApi>("/products/:product_id/dislike", "dislike")?;

    routes
        .post::<HiggleApi>("/higgle/:higgle_id", "join")?
        .post::<HiggleApi>("/higgle/", "create")?
        .get::<HiggleApi>("/login", "login")?
        .get::<HiggleApi>("/higgles", "index")?
        .get::<HiggleApi>("/higgles_created_by_user", "higgles_created_by_user")?
        .get::<HiggleApi>("/for_category", "for_category")?
        .get::<HiggleApi>("/for_group", "for_group")?;

    routes
        .get::<CounterOfferApi>("/counter_offer", "show")?
        .put::<CounterOfferApi>("/counter_offer/accept", "accept")?
        .delete::<CounterOfferApi>("/counter_offer/decline", "decline")?;

    routes
        .get::<CategoryApi>("/categories/", "index")?
        .put::<CategoryApi>("/category/follow", "follow")?
        .put::<CategoryApi>("/category/unfollow", "unfollow")?;

    routes
        .get::<GroupApi>("/groups/", "index")?
        .put::<GroupApi>("/groups/:group_id/join", "join")?
        .put::<GroupApi>("/groups/:group_id/leave", "leave")?;

    routes
        .get::<UserApi>("/users/:user_id/show", "show")?
        .get::<UserApi>("/users/:email/find_by_email", "find_by_email")?;

    Ok(routes.build())
}
