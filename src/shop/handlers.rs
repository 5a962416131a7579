//! Shop item and order handlers

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{MessageResponse, Order, ShopItem, ShopItemRequest, UpdateOrderStatusRequest};
use super::validators::{OrderStatusValidator, ShopItemValidator};
use crate::auth::AuthedUser;
use crate::common::{generate_id, now_rfc3339, ApiError, AppState, EntityPrefix, Validator};

// ============================================================================
// Shop Item Handlers
// ============================================================================

/// GET /api/shop/items - List shop items
pub async fn list_items(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<ShopItem>>, ApiError> {
    let state = state_lock.read().await.clone();

    let items: Vec<ShopItem> =
        sqlx::query_as::<_, ShopItem>("SELECT * FROM shop_items ORDER BY created_at")
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(Json(items))
}

/// GET /api/shop/items/:id - Get a single shop item
pub async fn get_item(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(item_id): Path<String>,
) -> Result<Json<ShopItem>, ApiError> {
    let state = state_lock.read().await.clone();

    let item: ShopItem = sqlx::query_as::<_, ShopItem>("SELECT * FROM shop_items WHERE item_id = ?")
        .bind(&item_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}

/// POST /api/shop/items - Create a shop item (admin)
pub async fn create_item(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<ShopItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let validation = ShopItemValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();
    let item = ShopItem {
        item_id: generate_id(EntityPrefix::ShopItem),
        name: request.name,
        description: request.description,
        price: request.price,
        image_url: request.image_url,
        category: request.category,
        stock: request.stock,
        created_at: now_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO shop_items (item_id, name, description, price, image_url, category, stock, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.item_id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.price)
    .bind(&item.image_url)
    .bind(&item.category)
    .bind(item.stock)
    .bind(&item.created_at)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(item_id = %item.item_id, "Shop item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/shop/items/:id - Update a shop item (admin)
pub async fn update_item(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(item_id): Path<String>,
    Json(request): Json<ShopItemRequest>,
) -> Result<Json<ShopItem>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let validation = ShopItemValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();
    let result = sqlx::query(
        "UPDATE shop_items SET name = ?, description = ?, price = ?, image_url = ?, category = ?, stock = ? \
         WHERE item_id = ?",
    )
    .bind(&request.name)
    .bind(&request.description)
    .bind(request.price)
    .bind(&request.image_url)
    .bind(&request.category)
    .bind(request.stock)
    .bind(&item_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    let item: ShopItem = sqlx::query_as::<_, ShopItem>("SELECT * FROM shop_items WHERE item_id = ?")
        .bind(&item_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(item))
}

/// DELETE /api/shop/items/:id - Delete a shop item (admin)
pub async fn delete_item(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(item_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let state = state_lock.read().await.clone();
    let result = sqlx::query("DELETE FROM shop_items WHERE item_id = ?")
        .bind(&item_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    info!(item_id = %item_id, "Shop item deleted");

    Ok(Json(MessageResponse {
        message: "Item deleted successfully".to_string(),
    }))
}

// ============================================================================
// Order Handlers
// ============================================================================

/// GET /api/shop/orders - The caller's orders, newest first
pub async fn my_orders(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    let state = state_lock.read().await.clone();

    let orders: Vec<Order> = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&user.user_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(orders))
}

/// GET /api/admin/orders - All orders (admin), newest first
pub async fn all_orders(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let state = state_lock.read().await.clone();

    let orders: Vec<Order> =
        sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(Json(orders))
}

/// PUT /api/admin/orders/:id/status - Update fulfillment status (admin)
pub async fn update_order_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(order_id): Path<String>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let validation = OrderStatusValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();
    let result = sqlx::query("UPDATE orders SET status = ? WHERE order_id = ?")
        .bind(&request.status)
        .bind(&order_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    info!(order_id = %order_id, status = %request.status, "Order status updated");

    Ok(Json(MessageResponse {
        message: "Order status updated".to_string(),
    }))
}
