//! Sale placement and cancellation, exercised at the repository level.
//!
//! These tests pin down the transactional contract: totals match line
//! subtotals, stock moves exactly once per placement, failures leave no
//! partial state, and concurrent checkouts cannot oversell.

mod common;

use tienda_server::AppError;
use tienda_server::ServerState;
use tienda_server::db::models::{ProductCreate, SaleItemInput, User};

async fn seed_product(state: &ServerState, name: &str, price: f64, stock: i64) -> i64 {
    let product = state
        .products()
        .create(&ProductCreate {
            name: name.to_string(),
            description: None,
            price,
            stock,
            image: None,
            colors: Some("Rojo,Azul".to_string()),
            sizes: Some("S,M,L".to_string()),
            featured: false,
            category_id: None,
        })
        .await
        .expect("create product");
    product.id
}

async fn seed_user(state: &ServerState, username: &str) -> i64 {
    let hash = User::hash_password("a-test-password").expect("hash");
    let user = state
        .users()
        .create(username, &format!("{username}@example.com"), &hash, false)
        .await
        .expect("create user");
    user.id
}

fn item(product_id: i64, quantity: i64) -> SaleItemInput {
    SaleItemInput {
        product_id,
        quantity,
        color: None,
        size: None,
    }
}

async fn stock_of(state: &ServerState, product_id: i64) -> i64 {
    state
        .products()
        .find_by_id(product_id)
        .await
        .expect("query product")
        .expect("product exists")
        .stock
}

#[tokio::test]
async fn total_equals_sum_of_subtotals() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 19.99, 10).await;
    let pants = seed_product(&state, "Pantalón", 45.50, 10).await;

    let sale = state
        .sales()
        .place_sale(user_id, &[item(shirt, 3), item(pants, 2)])
        .await
        .expect("place sale");

    let subtotal_sum: f64 = sale.details.iter().map(|d| d.subtotal).sum();
    assert_eq!(sale.total, subtotal_sum);
    assert_eq!(sale.total, 150.97); // 59.97 + 91.00
    assert_eq!(sale.details.len(), 2);
}

#[tokio::test]
async fn stock_decrements_for_every_line() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 10.00, 5).await;
    let pants = seed_product(&state, "Pantalón", 20.00, 8).await;

    let sale = state
        .sales()
        .place_sale(user_id, &[item(shirt, 2), item(pants, 3)])
        .await
        .expect("place sale");

    assert_eq!(sale.total, 80.00);
    assert_eq!(stock_of(&state, shirt).await, 3);
    assert_eq!(stock_of(&state, pants).await, 5);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 10.00, 5).await;
    let pants = seed_product(&state, "Pantalón", 20.00, 1).await;

    // first line would succeed on its own; second line overdraws
    let err = state
        .sales()
        .place_sale(user_id, &[item(shirt, 2), item(pants, 4)])
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 1,
            requested: 4,
            ..
        }
    ));
    // no partial decrement survives the rollback
    assert_eq!(stock_of(&state, shirt).await, 5);
    assert_eq!(stock_of(&state, pants).await, 1);
    assert!(
        state
            .sales()
            .list_by_user(user_id, 0, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn unknown_product_aborts_whole_sale() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 10.00, 5).await;

    let err = state
        .sales()
        .place_sale(user_id, &[item(shirt, 1), item(999_999, 1)])
        .await
        .expect_err("must fail");

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(stock_of(&state, shirt).await, 5);
}

#[tokio::test]
async fn empty_sale_is_rejected_without_side_effects() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;

    let err = state
        .sales()
        .place_sale(user_id, &[])
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn recorded_price_ignores_later_price_changes() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 19.99, 10).await;

    let sale = state
        .sales()
        .place_sale(user_id, &[item(shirt, 1)])
        .await
        .expect("place sale");

    state
        .products()
        .update(
            shirt,
            &tienda_server::db::models::ProductUpdate {
                price: Some(29.99),
                ..Default::default()
            },
        )
        .await
        .expect("update price");

    let reloaded = state
        .sales()
        .find_by_id(sale.id)
        .await
        .expect("query sale")
        .expect("sale exists");
    assert_eq!(reloaded.details[0].unit_price, 19.99);
    assert_eq!(reloaded.total, 19.99);
}

#[tokio::test]
async fn product_delete_preserves_sale_history() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 19.99, 5).await;

    let sale = state
        .sales()
        .place_sale(user_id, &[item(shirt, 2)])
        .await
        .expect("place sale");

    state.products().delete(shirt).await.expect("delete product");

    // the sale survives; the detail keeps its figures but loses the product
    let reloaded = state
        .sales()
        .find_by_id(sale.id)
        .await
        .expect("query sale")
        .expect("sale exists");
    assert_eq!(reloaded.total, 39.98);
    assert_eq!(reloaded.details.len(), 1);
    let detail = &reloaded.details[0];
    assert_eq!(detail.product_id, None);
    assert_eq!(detail.product_name, None);
    assert_eq!(detail.unit_price, 19.99);
    assert_eq!(detail.quantity, 2);
}

#[tokio::test]
async fn cancel_restores_stock_and_deletes_sale() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 10.00, 5).await;

    let sale = state
        .sales()
        .place_sale(user_id, &[item(shirt, 4)])
        .await
        .expect("place sale");
    assert_eq!(stock_of(&state, shirt).await, 1);

    state.sales().cancel_sale(sale.id).await.expect("cancel");

    assert_eq!(stock_of(&state, shirt).await, 5);
    assert!(state.sales().find_by_id(sale.id).await.unwrap().is_none());
}

#[tokio::test]
async fn cancel_skips_restock_for_deleted_products() {
    let (_dir, state) = common::test_state().await;
    let user_id = seed_user(&state, "ana").await;
    let shirt = seed_product(&state, "Camiseta", 10.00, 5).await;
    let pants = seed_product(&state, "Pantalón", 20.00, 5).await;

    let sale = state
        .sales()
        .place_sale(user_id, &[item(shirt, 2), item(pants, 2)])
        .await
        .expect("place sale");

    state.products().delete(shirt).await.expect("delete product");

    state.sales().cancel_sale(sale.id).await.expect("cancel");
    // the surviving product is restocked, the deleted one is just gone
    assert_eq!(stock_of(&state, pants).await, 5);
    assert!(state.products().find_by_id(shirt).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_placements_cannot_oversell() {
    let (_dir, state) = common::test_state().await;
    let ana = seed_user(&state, "ana").await;
    let luis = seed_user(&state, "luis").await;
    let shirt = seed_product(&state, "Camiseta", 10.00, 5).await;

    let sales_a = state.sales();
    let sales_b = state.sales();
    let task_a = tokio::spawn(async move { sales_a.place_sale(ana, &[item(shirt, 3)]).await });
    let task_b = tokio::spawn(async move { sales_b.place_sale(luis, &[item(shirt, 3)]).await });

    let results = [task_a.await.unwrap(), task_b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(successes, 1, "exactly one of two competing sales wins");
    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser.as_ref().unwrap_err(),
        AppError::InsufficientStock { .. }
    ));

    let final_stock = stock_of(&state, shirt).await;
    assert_eq!(final_stock, 2);
    assert!(final_stock >= 0, "stock must never go negative");
}
