use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Serialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    database::Database,
    error::ApiError,
    middleware::get_identity,
    models::{CreateInventoryItem, InventoryItem, UpdateInventoryItem},
};

use super::auth::fetch_user;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryListResponse {
    pub items: Vec<InventoryItem>,
    pub needs_setup: bool,
}

/// GET /api/inventory: the caller's pharmacy inventory. A caller with no
/// user row or no pharmacy link gets an empty list with `needsSetup: true`;
/// that is the normal steady state for a fresh account, not an error.
pub async fn inventory_list(
    State(db): State<Database>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Result<Json<InventoryListResponse>, ApiError> {
    let identity = get_identity(&cookies, &headers)?;

    let user = fetch_user(&db, &identity.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch inventory", e))?;

    let pharmacy_id = match user.and_then(|u| u.pharmacy_id) {
        Some(id) => id,
        None => {
            return Ok(Json(InventoryListResponse {
                items: vec![],
                needs_setup: true,
            }))
        }
    };

    let items = sqlx::query_as::<_, InventoryItem>(
        "SELECT * FROM inventory WHERE pharmacy_id = $1",
    )
    .bind(pharmacy_id)
    .fetch_all(&db)
    .await
    .map_err(|e| ApiError::internal("Failed to fetch inventory", e))?;

    Ok(Json(InventoryListResponse {
        items,
        needs_setup: false,
    }))
}

/// POST /api/inventory: list a medication. The owning pharmacy is always
/// the caller's linked pharmacy; whatever the payload said is ignored.
pub async fn create_inventory_item(
    State(db): State<Database>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(mut payload): Json<CreateInventoryItem>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    let identity = get_identity(&cookies, &headers)?;
    let pharmacy_id = linked_pharmacy(&db, &identity.user_id, "Failed to create inventory item")
        .await?
        .ok_or(ApiError::NeedsSetup)?;

    payload.validate()?;
    payload.normalize();

    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        INSERT INTO inventory (
            pharmacy_id, medication_id, quantity, price, original_price,
            in_stock, expiry_date, batch_number
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(pharmacy_id)
    .bind(payload.medication_id)
    .bind(payload.quantity)
    .bind(payload.price)
    .bind(payload.original_price)
    .bind(payload.in_stock)
    .bind(payload.expiry_date)
    .bind(&payload.batch_number)
    .fetch_one(&db)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .map_or(false, |db_err| db_err.is_foreign_key_violation())
        {
            ApiError::Validation("Medication does not exist".to_string())
        } else {
            ApiError::internal("Failed to create inventory item", e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/inventory/:id: partial update of an owned listing. Bumps
/// `last_updated`; absent fields keep their stored values.
pub async fn update_inventory_item(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(mut payload): Json<UpdateInventoryItem>,
) -> Result<Json<InventoryItem>, ApiError> {
    let identity = get_identity(&cookies, &headers)?;
    let pharmacy_id = linked_pharmacy(&db, &identity.user_id, "Failed to update inventory item")
        .await?
        .ok_or_else(|| ApiError::BadRequest("User not associated with a pharmacy".to_string()))?;

    owned_item(&db, id, pharmacy_id, "Failed to update inventory item").await?;

    payload.validate()?;
    payload.normalize();

    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        UPDATE inventory SET
            quantity = COALESCE($2, quantity),
            price = COALESCE($3, price),
            original_price = COALESCE($4, original_price),
            in_stock = COALESCE($5, in_stock),
            expiry_date = COALESCE($6, expiry_date),
            batch_number = COALESCE($7, batch_number),
            last_updated = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.quantity)
    .bind(payload.price)
    .bind(payload.original_price)
    .bind(payload.in_stock)
    .bind(payload.expiry_date)
    .bind(&payload.batch_number)
    .fetch_one(&db)
    .await
    .map_err(|e| ApiError::internal("Failed to update inventory item", e))?;

    Ok(Json(item))
}

/// DELETE /api/inventory/:id: hard delete of an owned listing. A row owned
/// by another pharmacy is reported as missing.
pub async fn delete_inventory_item(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let identity = get_identity(&cookies, &headers)?;
    let pharmacy_id = linked_pharmacy(&db, &identity.user_id, "Failed to delete inventory item")
        .await?
        .ok_or_else(|| ApiError::BadRequest("User not associated with a pharmacy".to_string()))?;

    owned_item(&db, id, pharmacy_id, "Failed to delete inventory item").await?;

    sqlx::query("DELETE FROM inventory WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await
        .map_err(|e| ApiError::internal("Failed to delete inventory item", e))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn linked_pharmacy(
    db: &Database,
    user_id: &str,
    context: &str,
) -> Result<Option<Uuid>, ApiError> {
    let user = fetch_user(db, user_id)
        .await
        .map_err(|e| ApiError::internal(context, e))?;
    Ok(user.and_then(|u| u.pharmacy_id))
}

/// Load an inventory row and enforce ownership. Missing and not-owned are
/// indistinguishable on purpose.
async fn owned_item(
    db: &Database,
    id: Uuid,
    pharmacy_id: Uuid,
    context: &str,
) -> Result<InventoryItem, ApiError> {
    let item = sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::internal(context, e))?;

    match item {
        Some(item) if item.pharmacy_id == pharmacy_id => Ok(item),
        _ => Err(ApiError::NotFound("Inventory item not found".to_string())),
    }
}
