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
    models::{CreateMedication, Medication},
};

/// GET /api/medications: the shared catalog, unauthenticated and
/// unpaginated.
pub async fn medications_list(
    State(db): State<Database>,
) -> Result<Json<Vec<Medication>>, ApiError> {
    let medications = sqlx::query_as::<_, Medication>("SELECT * FROM medications")
        .fetch_all(&db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch medications", e))?;

    Ok(Json(medications))
}

/// POST /api/medications: admit a medication into the catalog. Requires a
/// valid identity but no pharmacy link; only OTC medications pass
/// validation.
pub async fn create_medication(
    State(db): State<Database>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(payload): Json<CreateMedication>,
) -> Result<(StatusCode, Json<Medication>), ApiError> {
    get_identity(&cookies, &headers)?;
    payload.validate()?;

    let medication = sqlx::query_as::<_, Medication>(
        r#"
        INSERT INTO medications (
            name, strength, manufacturer, category, description, form_factor,
            requires_prescription, is_otc
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.strength)
    .bind(&payload.manufacturer)
    .bind(&payload.category)
    .bind(&payload.description)
    .bind(&payload.form_factor)
    .bind(payload.requires_prescription)
    .fetch_one(&db)
    .await
    .map_err(|e| ApiError::internal("Failed to create medication", e))?;

    Ok((StatusCode::CREATED, Json(medication)))
}
