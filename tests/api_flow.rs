//! End-to-end HTTP flows over the assembled router.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "a-test-password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, admin: &str, name: &str, price: f64, stock: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(admin),
        Some(json!({"name": name, "price": price, "stock": stock})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create product failed: {body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn full_purchase_flow() {
    let (_dir, state) = common::test_state().await;
    let app = tienda_server::api::router(state);

    let admin = login(&app, common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;

    // admin sets up the catalog
    let (status, category) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(&admin),
        Some(json!({"name": "Ropa", "description": "Prendas de vestir"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();

    let (status, product) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&admin),
        Some(json!({
            "name": "Camiseta",
            "price": 19.99,
            "stock": 5,
            "colors": "Rojo,Azul",
            "sizes": "S,M,L",
            "category_id": category_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = product["id"].as_i64().unwrap();

    // anonymous storefront browsing works without a token
    let (status, listing) = send(&app, Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["colors"], json!(["Rojo", "Azul"]));

    // customer registers and buys two shirts
    let customer = register(&app, "ana").await;
    let (status, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&customer),
        Some(json!({
            "detalles": [{
                "producto_id": product_id,
                "cantidad": 2,
                "color_seleccionado": "Rojo",
                "talla_seleccionada": "M",
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "sale failed: {sale}");
    assert_eq!(sale["total"], json!(39.98));
    assert_eq!(sale["detalles"][0]["producto_nombre"], json!("Camiseta"));
    assert_eq!(sale["detalles"][0]["precio_unitario"], json!(19.99));
    assert_eq!(sale["detalles"][0]["color_seleccionado"], json!("Rojo"));
    let sale_id = sale["id"].as_i64().unwrap();

    // stock moved from 5 to 3
    let (_, product) = send(
        &app,
        Method::GET,
        &format!("/api/products/{product_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(product["stock"], json!(3));

    // overdrawing now fails with the stock error payload and touches nothing
    let (status, err) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&customer),
        Some(json!({"detalles": [{"producto_id": product_id, "cantidad": 10}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], json!("E0005"));
    assert_eq!(err["details"]["disponible"], json!(3));
    assert_eq!(err["details"]["solicitado"], json!(10));

    // customers cannot cancel sales
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/sales/{sale_id}"),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // admins can; stock comes back
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/sales/{sale_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, product) = send(
        &app,
        Method::GET,
        &format!("/api/products/{product_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(product["stock"], json!(5));
}

#[tokio::test]
async fn cart_flow_over_http() {
    let (_dir, state) = common::test_state().await;
    let app = tienda_server::api::router(state);

    let admin = login(&app, common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let product_id = create_product(&app, &admin, "Camiseta", 19.99, 5).await;
    let customer = register(&app, "luis").await;

    // add 2, then 1 more of the same variant
    let uri = format!(
        "/api/cart/add?producto_id={product_id}&cantidad=2&color_seleccionado=Rojo&talla_seleccionada=M"
    );
    let (status, _) = send(&app, Method::POST, &uri, Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    let uri = format!(
        "/api/cart/add?producto_id={product_id}&cantidad=1&color_seleccionado=Rojo&talla_seleccionada=M"
    );
    let (status, cart) = send(&app, Method::POST, &uri, Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["cantidad"], json!(3));
    assert_eq!(cart["total"], json!(59.97));

    // adding beyond stock is rejected against the cumulative quantity
    let uri = format!(
        "/api/cart/add?producto_id={product_id}&cantidad=3&color_seleccionado=Rojo&talla_seleccionada=M"
    );
    let (status, err) = send(&app, Method::POST, &uri, Some(&customer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], json!("E0005"));

    // decrease twice, then placing the sale clears the cart
    let key = cart["items"][0]["key"].as_str().unwrap().to_string();
    let uri = format!("/api/cart/items/{key}?accion=disminuir");
    let (status, cart) = send(&app, Method::PUT, &uri, Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["cantidad"], json!(2));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&customer),
        Some(json!({"detalles": [{"producto_id": product_id, "cantidad": 2}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, cart) = send(&app, Method::GET, "/api/cart", Some(&customer), None).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn auth_and_role_boundaries() {
    let (_dir, state) = common::test_state().await;
    let app = tienda_server::api::router(state);

    // protected routes demand a token
    let (status, body) = send(&app, Method::GET, "/api/sales/mine", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("E3001"));

    // garbage tokens are rejected, not 500ed
    let (status, _) = send(&app, Method::GET, "/api/cart", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = login(&app, common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let customer = register(&app, "eva").await;

    // customers cannot reach admin surfaces
    for uri in [
        "/api/users",
        "/api/expenses",
        "/api/reports/financial",
        "/api/stats/dashboard",
    ] {
        let (status, _) = send(&app, Method::GET, uri, Some(&customer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "expected 403 for {uri}");
    }

    // wrong password is a 401 with a uniform message
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": common::ADMIN_EMAIL, "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // duplicate registration conflicts
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": "eva2",
            "email": "eva@example.com",
            "password": "a-test-password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // admin can see the user list and the dashboard
    let (status, users) = send(&app, Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);

    let (status, stats) = send(
        &app,
        Method::GET,
        "/api/stats/dashboard",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"], json!(2));
}

#[tokio::test]
async fn expense_and_report_flow() {
    let (_dir, state) = common::test_state().await;
    let app = tienda_server::api::router(state);

    let admin = login(&app, common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let product_id = create_product(&app, &admin, "Camiseta", 10.00, 20).await;
    let customer = register(&app, "ana").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&customer),
        Some(json!({"detalles": [{"producto_id": product_id, "cantidad": 4}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, expense) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(&admin),
        Some(json!({"description": "Alquiler del local", "amount": 25.50, "category": "Alquiler"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let expense_id = expense["id"].as_i64().unwrap();

    let (status, summary) = send(
        &app,
        Method::GET,
        "/api/reports/financial",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_sales"], json!(40.0));
    assert_eq!(summary["total_expenses"], json!(25.5));
    assert_eq!(summary["profit"], json!(14.5));

    // partial update leaves the other fields alone
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/expenses/{expense_id}"),
        Some(&admin),
        Some(json!({"amount": 30.00})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], json!("Alquiler del local"));
    assert_eq!(updated["amount"], json!(30.0));

    let (status, top) = send(
        &app,
        Method::GET,
        "/api/reports/top-products",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top[0]["units_sold"], json!(4));
}

#[tokio::test]
async fn product_merge_update_and_stock_clamp() {
    let (_dir, state) = common::test_state().await;
    let app = tienda_server::api::router(state);

    let admin = login(&app, common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let product_id = create_product(&app, &admin, "Camiseta", 19.99, 5).await;

    // only the price changes; name and stock stay
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{product_id}"),
        Some(&admin),
        Some(json!({"price": 24.99})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("Camiseta"));
    assert_eq!(updated["price"], json!(24.99));
    assert_eq!(updated["stock"], json!(5));

    // negative adjustment clamps at zero
    let (status, adjusted) = send(
        &app,
        Method::POST,
        &format!("/api/products/{product_id}/stock"),
        Some(&admin),
        Some(json!({"quantity": -100})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(adjusted["stock"], json!(0));

    // over-long text fields are rejected before anything hits the database
    let (status, err) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&admin),
        Some(json!({"name": "Camiseta 2", "price": 10.0, "image": "x".repeat(501)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], json!("E0002"));

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{product_id}"),
        Some(&admin),
        Some(json!({"colors": "x".repeat(501)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sale_list_honors_storefront_date_filters() {
    let (_dir, state) = common::test_state().await;
    let app = tienda_server::api::router(state);

    let admin = login(&app, common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let product_id = create_product(&app, &admin, "Camiseta", 10.00, 5).await;
    let customer = register(&app, "ana").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&customer),
        Some(json!({"detalles": [{"producto_id": product_id, "cantidad": 1}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let today = chrono::Utc::now().date_naive();
    let tomorrow = today.succ_opt().unwrap();

    // fecha_hasta is an inclusive date, so today's window finds today's sale
    let uri = format!("/api/sales?fecha_desde={today}&fecha_hasta={today}");
    let (status, listing) = send(&app, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let uri = format!("/api/sales?fecha_desde={tomorrow}");
    let (status, listing) = send(&app, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listing.as_array().unwrap().is_empty());
}
