use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub full_name: String,
    pub headline: String,
}

/// Profile as returned to the owning user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub full_name: String,
    pub headline: String,
    pub skills: Vec<String>,
}
