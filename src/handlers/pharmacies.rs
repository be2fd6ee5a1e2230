use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use tower_cookies::Cookies;

use crate::{
    database::Database,
    error::ApiError,
    middleware::get_identity,
    models::{CreatePharmacy, Pharmacy},
};

/// GET /api/pharmacies: public marketplace listing.
pub async fn pharmacies_list(
    State(db): State<Database>,
) -> Result<Json<Vec<Pharmacy>>, ApiError> {
    let pharmacies = sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies")
        .fetch_all(&db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch pharmacies", e))?;

    Ok(Json(pharmacies))
}

/// POST /api/pharmacies: register a pharmacy. Never marks the new row as
/// the auto-provisioning default.
pub async fn create_pharmacy(
    State(db): State<Database>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(payload): Json<CreatePharmacy>,
) -> Result<(StatusCode, Json<Pharmacy>), ApiError> {
    get_identity(&cookies, &headers)?;

    let pharmacy = sqlx::query_as::<_, Pharmacy>(
        r#"
        INSERT INTO pharmacies (
            name, address, phone, hours, rating, is_open_24_hours, delivery_time,
            distance, latitude, longitude, delivery_fee, onboarding_status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.address)
    .bind(&payload.phone)
    .bind(&payload.hours)
    .bind(payload.rating)
    .bind(payload.is_open_24_hours)
    .bind(&payload.delivery_time)
    .bind(&payload.distance)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.delivery_fee)
    .bind(&payload.onboarding_status)
    .fetch_one(&db)
    .await
    .map_err(|e| ApiError::internal("Failed to create pharmacy", e))?;

    Ok((StatusCode::CREATED, Json(pharmacy)))
}
