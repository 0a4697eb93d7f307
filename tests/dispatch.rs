//! Dispatcher scenarios against the library, without a socket.

use std::sync::Arc;

use axum::http::Method;
use higgler_api::config::AuthConfig;
use higgler_api::dispatch::auth::encode_basic;
use higgler_api::handlers::{CategoryApi, ProductApi, Services};
use higgler_api::http::response::{ResponseEnvelope, APPLICATION_JSON, CONTENT_TYPE};
use higgler_api::{Dispatcher, RawRequest, Router};
use serde_json::Value;

mod common;
use common::*;

fn json(envelope: &ResponseEnvelope) -> Value {
    serde_json::from_str(envelope.body_str()).unwrap()
}

fn get(path: &str) -> RawRequest {
    RawRequest::new(Method::GET, path)
}

#[test]
fn test_index_with_no_products_is_empty_list() {
    let mut builder = Router::builder();
    builder.get::<ProductApi>("/products/", "index").unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(builder.build()),
        Services::in_memory(),
        AuthConfig::default(),
    );

    let envelope = dispatcher.handle(&get("/products/"));
    assert_eq!(envelope.status, 200);
    assert_eq!(envelope.headers.get(CONTENT_TYPE).map(String::as_str), Some(APPLICATION_JSON));
    assert_eq!(envelope.body, ["[]".to_string()]);
}

#[test]
fn test_unknown_path_is_route_not_found() {
    let envelope = seeded_dispatcher().handle(&get("/unknown/path"));
    assert_eq!(envelope.status, 404);
    assert_eq!(envelope.headers.get(CONTENT_TYPE).map(String::as_str), Some(APPLICATION_JSON));
    assert_eq!(envelope.body, ["Route not found".to_string()]);
}

#[test]
fn test_authenticated_action_with_blank_token() {
    let mut builder = Router::builder();
    builder.put::<CategoryApi>("/category/follow", "follow").unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(builder.build()),
        Services::in_memory(),
        AuthConfig::default(),
    );

    let request = RawRequest::new(Method::PUT, "/category/follow")
        .with_header(TOKEN_HEADER, "   ")
        .with_param("category_id", "1");
    let envelope = dispatcher.handle(&request);
    assert_eq!(envelope, ResponseEnvelope::resource_not_found());
    assert_eq!(json(&envelope)["message"], "resource not found");
}

#[test]
fn test_unregistered_method_is_route_not_found() {
    let dispatcher = seeded_dispatcher();
    let request = RawRequest::new(Method::PATCH, "/products/");
    assert_eq!(dispatcher.handle(&request), ResponseEnvelope::route_not_found());
    let request = RawRequest::new(Method::GET, "/category/follow");
    assert_eq!(dispatcher.handle(&request), ResponseEnvelope::route_not_found());
}

#[test]
fn test_get_under_groups_prefix_lists_groups() {
    let dispatcher = seeded_dispatcher();
    let dispatched = dispatcher.dispatch(&get("/groups/20/join"));
    assert_eq!(dispatched.handler, "GroupAPI");
    assert_eq!(dispatched.envelope.status, 200);
    assert_eq!(json(&dispatched.envelope)[0]["id"], 20);
    assert!(dispatcher.services().store.groups.get(20).unwrap().member_ids.is_empty());
}

#[test]
fn test_follow_with_token_runs_action() {
    let dispatcher = seeded_dispatcher();
    let request = RawRequest::new(Method::PUT, "/category/follow")
        .with_header(TOKEN_HEADER, ANN_TOKEN)
        .with_param("category_id", "1");
    let envelope = dispatcher.handle(&request);
    assert_eq!((envelope.status, envelope.body_str()), (200, "ok"));

    let ann = dispatcher.services().store.users.get(ANN_ID).unwrap();
    assert!(ann.followed_categories.contains(&1));
}

#[test]
fn test_path_params_reach_handler() {
    let dispatcher = seeded_dispatcher();
    let request = RawRequest::new(Method::PUT, "/groups/20/join").with_header(TOKEN_HEADER, BOB_TOKEN);
    assert_eq!(dispatcher.handle(&request).body_str(), "ok");
    let group = dispatcher.services().store.groups.get(20).unwrap();
    assert_eq!(group.member_ids.len(), 1);

    // A query param cannot redirect the action to another group.
    let request = RawRequest::new(Method::PUT, "/groups/20/leave")
        .with_header(TOKEN_HEADER, BOB_TOKEN)
        .with_param("group_id", "21");
    assert_eq!(dispatcher.handle(&request).body_str(), "ok");
    assert!(dispatcher.services().store.groups.get(20).unwrap().member_ids.is_empty());
}

#[test]
fn test_private_group_join_is_resource_not_found() {
    let dispatcher = seeded_dispatcher();
    let request = RawRequest::new(Method::PUT, "/groups/21/join").with_header(TOKEN_HEADER, BOB_TOKEN);
    assert_eq!(dispatcher.handle(&request), ResponseEnvelope::resource_not_found());
}

#[test]
fn test_products_prefix_and_specific_route() {
    let dispatcher = seeded_dispatcher();

    let listed = json(&dispatcher.handle(&get("/products/")));
    let names: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Road Bike", "Novel"]);

    let anonymous = dispatcher.handle(&get("/products/liked"));
    assert_eq!(anonymous, ResponseEnvelope::resource_not_found());

    let liked = dispatcher.handle(&get("/products/liked").with_header(TOKEN_HEADER, ANN_TOKEN));
    assert_eq!((liked.status, liked.body_str()), (200, "[]"));
}

#[test]
fn test_like_then_list_liked() {
    let dispatcher = seeded_dispatcher();
    let like = RawRequest::new(Method::POST, "/products/10/like").with_header(TOKEN_HEADER, ANN_TOKEN);
    assert_eq!(dispatcher.handle(&like).body_str(), "ok");

    let liked = json(&dispatcher.handle(&get("/products/liked").with_header(TOKEN_HEADER, ANN_TOKEN)));
    assert_eq!(liked[0]["id"], 10);
}

#[test]
fn test_smuggled_query_token_is_ignored() {
    let dispatcher = seeded_dispatcher();
    let request = get("/login").with_param("auth_token", ANN_TOKEN);
    assert_eq!(dispatcher.handle(&request), ResponseEnvelope::resource_not_found());
}

#[test]
fn test_login_with_basic_credentials() {
    let dispatcher = seeded_dispatcher();
    let request = get("/login").with_header("Authorization", &encode_basic("ann@example.com", "secret"));
    let envelope = dispatcher.handle(&request);
    assert_eq!(envelope.status, 200);
    let body = json(&envelope);
    assert_eq!(body["auth_token"], ANN_TOKEN);
    assert_eq!(body["email"], "ann@example.com");

    let wrong = get("/login").with_header("Authorization", &encode_basic("ann@example.com", "nope"));
    assert_eq!(dispatcher.handle(&wrong), ResponseEnvelope::resource_not_found());
}

#[test]
fn test_user_profile_routes() {
    let dispatcher = seeded_dispatcher();
    let body = json(&dispatcher.handle(&get("/users/ann@example.com/find_by_email")));
    assert_eq!(body["name"], "Ann");
    assert!(body.get("auth_token").is_none());

    let body = json(&dispatcher.handle(&get(&format!("/users/{ANN_ID}/show"))));
    assert_eq!(body["email"], "ann@example.com");

    let missing = dispatcher.handle(&get("/users/999/show"));
    assert_eq!(missing, ResponseEnvelope::resource_not_found());
}

#[test]
fn test_higgle_listings() {
    let dispatcher = seeded_dispatcher();
    let running = json(&dispatcher.handle(&get("/higgles")));
    assert_eq!(running[0]["slug"], "bike-deal");

    let by_category = json(&dispatcher.handle(&get("/for_category").with_param("category_id", "1")));
    assert_eq!(by_category.as_array().unwrap().len(), 1);

    let by_group = json(&dispatcher.handle(&get("/for_group").with_param("group_id", "20")));
    assert_eq!(by_group[0]["id"], 30);

    let mine = json(&dispatcher.handle(&get("/higgles_created_by_user").with_header(TOKEN_HEADER, ANN_TOKEN)));
    assert_eq!(mine[0]["id"], 30);
    let theirs = dispatcher.handle(&get("/higgles_created_by_user").with_header(TOKEN_HEADER, BOB_TOKEN));
    assert_eq!(theirs.body_str(), "[]");
}

#[test]
fn test_create_higgle_flow() {
    let dispatcher = seeded_dispatcher();

    let missing_fields = RawRequest::new(Method::POST, "/higgle/")
        .with_header(TOKEN_HEADER, ANN_TOKEN)
        .with_param("product_id", "11");
    assert_eq!(dispatcher.handle(&missing_fields), ResponseEnvelope::internal_error());

    let create = RawRequest::new(Method::POST, "/higgle/")
        .with_header(TOKEN_HEADER, ANN_TOKEN)
        .with_param("product_id", "11")
        .with_param("higgle_price", "12.50")
        .with_param("quantity", "2")
        .with_param("last4_credit_card", "4242424242424242")
        .with_param("credit_card_holder_name", "Ann")
        .with_param("credit_card_expiration_month", "12")
        .with_param("credit_card_expiration_year", "2030");
    let envelope = dispatcher.handle(&create);
    assert_eq!(envelope.status, 200, "{}", envelope.body_str());
    let slug = json(&envelope)["slug"].as_str().unwrap().to_string();

    let store = &dispatcher.services().store;
    let higgle = store.higgles.find(|h| h.slug == slug).unwrap();
    assert_eq!((higgle.product_id, higgle.price_cents, higgle.quantity_sold), (11, 1_250, 2));
    assert!(store.order_for(higgle.id, ANN_ID).is_some());
}

#[test]
fn test_create_higgle_declined_card() {
    let dispatcher = seeded_dispatcher();
    let create = RawRequest::new(Method::POST, "/higgle/")
        .with_header(TOKEN_HEADER, ANN_TOKEN)
        .with_param("product_id", "11")
        .with_param("higgle_price", "10")
        .with_param("quantity", "1")
        .with_param("last4_credit_card", "4000000000000002")
        .with_param("credit_card_holder_name", "Ann")
        .with_param("credit_card_expiration_month", "12")
        .with_param("credit_card_expiration_year", "2030");
    let envelope = dispatcher.handle(&create);
    assert_eq!(envelope.status, 403);
    assert_eq!(json(&envelope)["message"], "internal server error");
    assert_eq!(dispatcher.services().store.higgles.len(), 1);
}

#[test]
fn test_join_without_address_reports_errors() {
    let dispatcher = seeded_dispatcher();
    let join = RawRequest::new(Method::POST, "/higgle/30")
        .with_header(TOKEN_HEADER, BOB_TOKEN)
        .with_param("quantity", "1");
    let envelope = dispatcher.handle(&join);
    assert_eq!(envelope.status, 403);
    let errors = &json(&envelope)["errors"];
    assert_eq!(errors["address"][0], "can't be blank");
    assert_eq!(errors["credit_card"][0], "can't be blank");
}

#[test]
fn test_counter_offer_round() {
    let dispatcher = seeded_dispatcher();
    let offer = json(&dispatcher.handle(&get("/counter_offer").with_header(TOKEN_HEADER, BOB_TOKEN).with_param("higgle_id", "30")));
    assert_eq!(offer["price_cents"], 90_000);

    let decline = RawRequest::new(Method::DELETE, "/counter_offer/decline")
        .with_header(TOKEN_HEADER, BOB_TOKEN)
        .with_param("counter_offer_id", "40");
    assert_eq!(dispatcher.handle(&decline).body_str(), "ok");

    // Bob has no order on the higgle, so there is nothing to reprice.
    let accept = RawRequest::new(Method::PUT, "/counter_offer/accept")
        .with_header(TOKEN_HEADER, BOB_TOKEN)
        .with_param("counter_offer_id", "40");
    assert_eq!(dispatcher.handle(&accept), ResponseEnvelope::resource_not_found());
}

#[test]
fn test_categories_and_groups_listing() {
    let dispatcher = seeded_dispatcher();
    let categories = json(&dispatcher.handle(&get("/categories/")));
    assert_eq!(categories[0]["name"], "Bikes");

    let groups = json(&dispatcher.handle(&get("/groups")));
    let names: Vec<_> = groups.as_array().unwrap().iter().map(|g| g["name"].clone()).collect();
    assert_eq!(names, [Value::from("Cyclists")]);
}

#[test]
fn test_lookup_is_repeatable() {
    let dispatcher = seeded_dispatcher();
    let router = dispatcher.router();
    let first = router.lookup(&Method::PUT, "/groups/42/join").cloned();
    let second = router.lookup(&Method::PUT, "/groups/42/join").cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(router.lookup(&Method::GET, "/nope"), router.lookup(&Method::GET, "/nope"));
    assert_eq!(router.len(), 23);
}
