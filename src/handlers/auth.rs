use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;
use rust_decimal::Decimal;

use crate::{
    database::Database,
    error::ApiError,
    middleware::{get_identity, Identity},
    models::{Pharmacy, User},
};

#[derive(Serialize)]
pub struct SetupPharmacyResponse {
    pub user: User,
    pub pharmacy: Pharmacy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPharmacyRequest {
    #[serde(default)]
    pub pharmacy_id: Option<Uuid>,
}

/// GET /api/auth/user: sync the user row from the identity claims and
/// return it. This is where a never-before-seen identity gets its row.
pub async fn current_user(
    State(db): State<Database>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Result<Json<User>, ApiError> {
    let identity = get_identity(&cookies, &headers)?;

    let user = upsert_user(&db, &identity)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch user", e))?;

    Ok(Json(user))
}

/// POST /api/auth/setup-pharmacy: first-time onboarding. Provisions the
/// default pharmacy if none exists and links the caller to it. A user that
/// is already linked is rejected and left untouched.
pub async fn setup_pharmacy(
    State(db): State<Database>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Result<Json<SetupPharmacyResponse>, ApiError> {
    let identity = get_identity(&cookies, &headers)?;

    let user = fetch_user(&db, &identity.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to setup pharmacy", e))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.pharmacy_id.is_some() {
        return Err(ApiError::Conflict(
            "User already associated with a pharmacy".to_string(),
        ));
    }

    let pharmacy = ensure_default_pharmacy(&db)
        .await
        .map_err(|e| ApiError::internal("Failed to setup pharmacy", e))?;
    let user = assign_user_to_pharmacy(&db, &identity.user_id, pharmacy.id)
        .await
        .map_err(|e| ApiError::internal("Failed to setup pharmacy", e))?;

    Ok(Json(SetupPharmacyResponse { user, pharmacy }))
}

/// POST /api/auth/assign-pharmacy: manual onboarding path. Links the
/// caller to a specific, existing pharmacy, overwriting any previous link.
pub async fn assign_pharmacy(
    State(db): State<Database>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(payload): Json<AssignPharmacyRequest>,
) -> Result<Json<User>, ApiError> {
    let identity = get_identity(&cookies, &headers)?;

    let pharmacy_id = payload
        .pharmacy_id
        .ok_or_else(|| ApiError::BadRequest("Pharmacy ID is required".to_string()))?;

    let pharmacy = sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies WHERE id = $1")
        .bind(pharmacy_id)
        .fetch_optional(&db)
        .await
        .map_err(|e| ApiError::internal("Failed to assign pharmacy", e))?;
    if pharmacy.is_none() {
        return Err(ApiError::BadRequest("Pharmacy not found".to_string()));
    }

    let user = assign_user_to_pharmacy(&db, &identity.user_id, pharmacy_id)
        .await
        .map_err(|e| ApiError::internal("Failed to assign pharmacy", e))?;

    Ok(Json(user))
}

async fn upsert_user(db: &Database, identity: &Identity) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, first_name, last_name, profile_image_url)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE SET
            email = EXCLUDED.email,
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            profile_image_url = EXCLUDED.profile_image_url,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(&identity.user_id)
    .bind(&identity.email)
    .bind(&identity.first_name)
    .bind(&identity.last_name)
    .bind(&identity.profile_image_url)
    .fetch_one(db)
    .await
}

pub async fn fetch_user(db: &Database, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await
}

async fn assign_user_to_pharmacy(
    db: &Database,
    user_id: &str,
    pharmacy_id: Uuid,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET pharmacy_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(pharmacy_id)
    .fetch_one(db)
    .await
}

/// Resolve the pharmacy used for auto-provisioning. The default-marked row
/// wins; failing that, any existing pharmacy blocks provisioning; on a cold
/// store the demo pharmacy is inserted under the partial unique index on
/// `is_default`, so concurrent first-time onboardings converge on one row.
async fn ensure_default_pharmacy(db: &Database) -> Result<Pharmacy, sqlx::Error> {
    if let Some(pharmacy) =
        sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies WHERE is_default LIMIT 1")
            .fetch_optional(db)
            .await?
    {
        return Ok(pharmacy);
    }

    if let Some(pharmacy) =
        sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies ORDER BY id LIMIT 1")
            .fetch_optional(db)
            .await?
    {
        return Ok(pharmacy);
    }

    let inserted = sqlx::query_as::<_, Pharmacy>(
        r#"
        INSERT INTO pharmacies (
            name, address, phone, hours, rating, is_open_24_hours, delivery_time,
            distance, latitude, longitude, delivery_fee, onboarding_status, is_default
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, TRUE)
        ON CONFLICT (is_default) WHERE is_default DO NOTHING
        RETURNING *
        "#,
    )
    .bind("BoK Pharm - Demo Pharmacy")
    .bind("123 Ocean View Drive, Coastal City")
    .bind("+1-555-BOKPHARM")
    .bind("24/7")
    .bind(Decimal::new(49, 1))
    .bind(true)
    .bind("15-20 min")
    .bind("0 km")
    .bind(Decimal::ZERO)
    .bind(Decimal::ZERO)
    .bind(Decimal::new(500, 2))
    .bind("active")
    .fetch_optional(db)
    .await?;

    match inserted {
        Some(pharmacy) => Ok(pharmacy),
        // Lost the insert race; the winner's row is the default now.
        None => {
            sqlx::query_as::<_, Pharmacy>("SELECT * FROM pharmacies WHERE is_default LIMIT 1")
                .fetch_one(db)
                .await
        }
    }
}
