//! End-to-end HTTP flows over the in-memory store.
//!
//! Requests go through the real routing, extractors, services and trace
//! middleware; only persistence is swapped for [`InMemoryStore`].

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use recipe_backend::Trace;
use recipe_backend::domain::TRACE_ID_HEADER;
use recipe_backend::inbound::http::configure_api;
use recipe_backend::test_support::{InMemoryStore, in_memory_http_state};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct Reply {
    status: StatusCode,
    trace_id: Option<String>,
    body: Value,
}

async fn send(store: &InMemoryStore, request: TestRequest) -> Reply {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(in_memory_http_state(store)))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        trace_id,
        body,
    }
}

async fn register(store: &InMemoryStore, email: &str) -> String {
    let created = send(
        store,
        TestRequest::post()
            .uri("/api/v1/user/create/")
            .set_json(json!({"email": email, "password": "pass123", "name": "Cook"})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let issued = send(
        store,
        TestRequest::post()
            .uri("/api/v1/user/token/")
            .set_json(json!({"email": email, "password": "pass123"})),
    )
    .await;
    assert_eq!(issued.status, StatusCode::OK);
    let token = issued.body["token"].as_str().expect("token string");
    format!("Token {token}")
}

fn authed(request: TestRequest, auth: &str) -> TestRequest {
    request.insert_header((AUTHORIZATION, auth.to_owned()))
}

async fn create_label(store: &InMemoryStore, auth: &str, kind: &str, name: &str) -> i64 {
    let reply = send(
        store,
        authed(TestRequest::post().uri(&format!("/api/v1/recipe/{kind}/")), auth)
            .set_json(json!({"name": name})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_i64().expect("label id")
}

async fn create_recipe(store: &InMemoryStore, auth: &str, body: Value) -> Value {
    let reply = send(
        store,
        authed(TestRequest::post().uri("/api/v1/recipe/recipes/"), auth).set_json(body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect()
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

#[rstest]
#[actix_web::test]
async fn registered_user_manages_a_recipe_end_to_end(store: InMemoryStore) {
    let auth = register(&store, "cook@example.com").await;
    let breakfast = create_label(&store, &auth, "tags", "Breakfast").await;
    let flour = create_label(&store, &auth, "ingredients", "Flour").await;

    let created = create_recipe(
        &store,
        &auth,
        json!({
            "title": "Pancakes",
            "timeMinutes": 20,
            "price": 5,
            "link": "https://example.com/pancakes",
            "tags": [breakfast],
            "ingredients": [flour],
        }),
    )
    .await;
    assert_eq!(created["price"], json!("5"));
    assert_eq!(created["tags"], json!([breakfast]));
    let id = created["id"].as_i64().expect("recipe id");

    let detail = send(
        &store,
        authed(
            TestRequest::get().uri(&format!("/api/v1/recipe/recipes/{id}/")),
            &auth,
        ),
    )
    .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(
        detail.body["tags"],
        json!([{"id": breakfast, "name": "Breakfast"}])
    );
    assert_eq!(detail.body["image"], Value::Null);

    let deleted = send(
        &store,
        authed(
            TestRequest::delete().uri(&format!("/api/v1/recipe/recipes/{id}/")),
            &auth,
        ),
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(store.recipe_count(), 0);
}

#[rstest]
#[actix_web::test]
async fn anonymous_requests_are_rejected_with_a_trace_id(store: InMemoryStore) {
    let reply = send(&store, TestRequest::get().uri("/api/v1/recipe/recipes/")).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["code"], json!("unauthorized"));
    let header = reply.trace_id.expect("trace id header");
    assert_eq!(reply.body["traceId"], json!(header));
}

#[rstest]
#[actix_web::test]
async fn users_only_see_their_own_records(store: InMemoryStore) {
    let alice = register(&store, "alice@example.com").await;
    let bob = register(&store, "bob@example.com").await;
    create_label(&store, &alice, "tags", "Mine").await;
    let recipe = create_recipe(
        &store,
        &alice,
        json!({"title": "Stew", "timeMinutes": 90, "price": 12}),
    )
    .await;
    let id = recipe["id"].as_i64().expect("recipe id");

    let tags = send(
        &store,
        authed(TestRequest::get().uri("/api/v1/recipe/tags/"), &bob),
    )
    .await;
    assert_eq!(tags.body, json!([]));

    let recipes = send(
        &store,
        authed(TestRequest::get().uri("/api/v1/recipe/recipes/"), &bob),
    )
    .await;
    assert_eq!(recipes.body, json!([]));

    let foreign = send(
        &store,
        authed(
            TestRequest::delete().uri(&format!("/api/v1/recipe/recipes/{id}/")),
            &bob,
        ),
    )
    .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(store.recipe_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn foreign_tags_cannot_be_attached(store: InMemoryStore) {
    let alice = register(&store, "alice@example.com").await;
    let bob = register(&store, "bob@example.com").await;
    let alices_tag = create_label(&store, &alice, "tags", "Private").await;

    let reply = send(
        &store,
        authed(TestRequest::post().uri("/api/v1/recipe/recipes/"), &bob).set_json(json!({
            "title": "Borrowed",
            "timeMinutes": 5,
            "price": 1,
            "tags": [alices_tag],
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(store.recipe_count(), 0);
}

#[rstest]
#[actix_web::test]
async fn put_replaces_associations_while_patch_keeps_them(store: InMemoryStore) {
    let auth = register(&store, "cook@example.com").await;
    let tag = create_label(&store, &auth, "tags", "Dinner").await;
    let recipe = create_recipe(
        &store,
        &auth,
        json!({"title": "Curry", "timeMinutes": 40, "price": 8, "tags": [tag]}),
    )
    .await;
    let uri = format!("/api/v1/recipe/recipes/{}/", recipe["id"]);

    let patched = send(
        &store,
        authed(TestRequest::patch().uri(&uri), &auth).set_json(json!({"title": "Green curry"})),
    )
    .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["title"], json!("Green curry"));
    assert_eq!(patched.body["tags"], json!([tag]));

    let replaced = send(
        &store,
        authed(TestRequest::put().uri(&uri), &auth).set_json(json!({
            "title": "Red curry",
            "timeMinutes": 45,
            "price": 9,
            "tags": [],
        })),
    )
    .await;
    assert_eq!(replaced.status, StatusCode::OK);
    assert_eq!(replaced.body["tags"], json!([]));
    assert_eq!(replaced.body["link"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn recipe_filters_combine_tags_and_ingredients(store: InMemoryStore) {
    let auth = register(&store, "cook@example.com").await;
    let quick = create_label(&store, &auth, "tags", "Quick").await;
    let vegan = create_label(&store, &auth, "tags", "Vegan").await;
    let rice = create_label(&store, &auth, "ingredients", "Rice").await;

    let first = create_recipe(
        &store,
        &auth,
        json!({"title": "Fried rice", "timeMinutes": 15, "price": 4,
               "tags": [quick], "ingredients": [rice]}),
    )
    .await;
    let second = create_recipe(
        &store,
        &auth,
        json!({"title": "Salad", "timeMinutes": 10, "price": 3, "tags": [vegan]}),
    )
    .await;

    let any_tag = send(
        &store,
        authed(
            TestRequest::get().uri(&format!("/api/v1/recipe/recipes/?tags={quick},{vegan}")),
            &auth,
        ),
    )
    .await;
    assert_eq!(
        ids(&any_tag.body),
        [
            second["id"].as_i64().expect("id"),
            first["id"].as_i64().expect("id")
        ]
    );

    let narrowed = send(
        &store,
        authed(
            TestRequest::get().uri(&format!(
                "/api/v1/recipe/recipes/?tags={quick},{vegan}&ingredients={rice}"
            )),
            &auth,
        ),
    )
    .await;
    assert_eq!(ids(&narrowed.body), [first["id"].as_i64().expect("id")]);

    let malformed = send(
        &store,
        authed(
            TestRequest::get().uri("/api/v1/recipe/recipes/?tags=one"),
            &auth,
        ),
    )
    .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn assigned_only_hides_unused_labels(store: InMemoryStore) {
    let auth = register(&store, "cook@example.com").await;
    let used = create_label(&store, &auth, "ingredients", "Egg").await;
    create_label(&store, &auth, "ingredients", "Saffron").await;
    create_recipe(
        &store,
        &auth,
        json!({"title": "Omelette", "timeMinutes": 5, "price": 2, "ingredients": [used]}),
    )
    .await;

    let all = send(
        &store,
        authed(TestRequest::get().uri("/api/v1/recipe/ingredients/"), &auth),
    )
    .await;
    assert_eq!(all.body.as_array().map(Vec::len), Some(2));

    let assigned = send(
        &store,
        authed(
            TestRequest::get().uri("/api/v1/recipe/ingredients/?assignedOnly=1"),
            &auth,
        ),
    )
    .await;
    assert_eq!(assigned.body, json!([{"id": used, "name": "Egg"}]));
}

#[rstest]
#[actix_web::test]
async fn a_new_token_revokes_the_previous_one(store: InMemoryStore) {
    let first = register(&store, "cook@example.com").await;
    let second = send(
        &store,
        TestRequest::post()
            .uri("/api/v1/user/token/")
            .set_json(json!({"email": "cook@example.com", "password": "pass123"})),
    )
    .await;
    let second = format!("Token {}", second.body["token"].as_str().expect("token"));
    assert_eq!(store.token_count(), 1);

    let stale = send(
        &store,
        authed(TestRequest::get().uri("/api/v1/user/me/"), &first),
    )
    .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let fresh = send(
        &store,
        authed(TestRequest::get().uri("/api/v1/user/me/"), &second),
    )
    .await;
    assert_eq!(fresh.status, StatusCode::OK);
    assert_eq!(fresh.body["email"], json!("cook@example.com"));
}

#[rstest]
#[actix_web::test]
async fn changed_password_is_required_for_the_next_token(store: InMemoryStore) {
    let auth = register(&store, "cook@example.com").await;
    let patched = send(
        &store,
        authed(TestRequest::patch().uri("/api/v1/user/me/"), &auth)
            .set_json(json!({"password": "better-secret"})),
    )
    .await;
    assert_eq!(patched.status, StatusCode::OK);

    let old = send(
        &store,
        TestRequest::post()
            .uri("/api/v1/user/token/")
            .set_json(json!({"email": "cook@example.com", "password": "pass123"})),
    )
    .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    let new = send(
        &store,
        TestRequest::post()
            .uri("/api/v1/user/token/")
            .set_json(json!({"email": "cook@example.com", "password": "better-secret"})),
    )
    .await;
    assert_eq!(new.status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn uploaded_images_are_stored_and_linked(store: InMemoryStore) {
    let auth = register(&store, "cook@example.com").await;
    let recipe = create_recipe(
        &store,
        &auth,
        json!({"title": "Cake", "timeMinutes": 60, "price": 6}),
    )
    .await;
    let id = recipe["id"].as_i64().expect("recipe id");

    let uploaded = send(
        &store,
        authed(
            TestRequest::post().uri(&format!(
                "/api/v1/recipe/recipes/{id}/upload-image/?filename=cake.png"
            )),
            &auth,
        )
        .set_payload(&b"\x89PNG fake"[..]),
    )
    .await;
    assert_eq!(uploaded.status, StatusCode::OK);
    let path = uploaded.body["image"].as_str().expect("image path");
    assert!(path.starts_with("uploads/recipe/"));
    assert!(path.ends_with(".png"));
    assert_eq!(store.image(path), Some(b"\x89PNG fake".to_vec()));

    let detail = send(
        &store,
        authed(
            TestRequest::get().uri(&format!("/api/v1/recipe/recipes/{id}/")),
            &auth,
        ),
    )
    .await;
    assert_eq!(detail.body["image"], json!(path));
}
