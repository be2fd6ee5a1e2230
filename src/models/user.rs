use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Marketplace role. The data model distinguishes the four parties but no
/// endpoint in this service is role-gated yet; authorization is driven by
/// the pharmacy link alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    PharmacyStaff,
    Delivery,
    Admin,
}

/// A user row. The id is issued by the external identity provider and is
/// opaque to us; `pharmacy_id` stays null until onboarding links the user
/// to a pharmacy and is never cleared afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub role: UserRole,
    pub pharmacy_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
