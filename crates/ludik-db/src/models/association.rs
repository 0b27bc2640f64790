//! Association model — the local mirror of a Provider directory entry.
//!
//! Associations carry an external correlation key (`provider_slug`) plus the
//! denormalized directory fields the sync engine reads and writes. Rows are
//! created on first encounter with a new slug and mutated on later syncs;
//! the sync path never deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

/// Closed category set for associations.
///
/// Provider categories are free text; the sync engine normalizes them into
/// this set, falling back to [`AssociationCategory::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationCategory {
    Sport,
    Culture,
    Music,
    Dance,
    Theatre,
    Education,
    Leisure,
    Solidarity,
    #[default]
    Other,
}

impl fmt::Display for AssociationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sport => write!(f, "sport"),
            Self::Culture => write!(f, "culture"),
            Self::Music => write!(f, "music"),
            Self::Dance => write!(f, "dance"),
            Self::Theatre => write!(f, "theatre"),
            Self::Education => write!(f, "education"),
            Self::Leisure => write!(f, "leisure"),
            Self::Solidarity => write!(f, "solidarity"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for AssociationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sport" => Ok(Self::Sport),
            "culture" => Ok(Self::Culture),
            "music" => Ok(Self::Music),
            "dance" => Ok(Self::Dance),
            "theatre" => Ok(Self::Theatre),
            "education" => Ok(Self::Education),
            "leisure" => Ok(Self::Leisure),
            "solidarity" => Ok(Self::Solidarity),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown association category: {s}")),
        }
    }
}

/// Moderation status of an association.
///
/// Owned locally: the sync path sets `Active` on creation and never
/// overwrites the status afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationStatus {
    #[default]
    Active,
    Suspended,
    Archived,
}

impl fmt::Display for AssociationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Suspended => write!(f, "suspended"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for AssociationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Unknown association status: {s}")),
        }
    }
}

/// An association row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Association {
    pub id: Uuid,
    /// External correlation key; null until first synced from the Provider.
    pub provider_slug: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub department: Option<String>,
    pub region: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub category: String,
    pub status: String,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The directory fields the sync engine compares and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFields {
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub department: Option<String>,
    pub region: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub category: AssociationCategory,
}

impl Association {
    /// Get the category enum.
    pub fn category(&self) -> AssociationCategory {
        self.category.parse().unwrap_or_default()
    }

    /// Get the status enum.
    pub fn status(&self) -> AssociationStatus {
        self.status.parse().unwrap_or_default()
    }

    /// Look up an association by its Provider slug.
    pub async fn find_by_provider_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM associations
            WHERE provider_slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new association from a Provider directory record.
    ///
    /// Status defaults to `active`; `last_synced_at` is set to the sync time.
    pub async fn insert_synced(
        pool: &PgPool,
        slug: &str,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO associations (
                provider_slug, name, description, city, postal_code,
                department, region, website, logo_url, category,
                status, last_synced_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'active', $11)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.city)
        .bind(&fields.postal_code)
        .bind(&fields.department)
        .bind(&fields.region)
        .bind(&fields.website)
        .bind(&fields.logo_url)
        .bind(fields.category.to_string())
        .bind(synced_at)
        .fetch_one(pool)
        .await
    }

    /// Overwrite the directory fields of an existing association and advance
    /// `last_synced_at`. The moderation `status` is left untouched.
    pub async fn update_synced(
        pool: &PgPool,
        id: Uuid,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE associations
            SET name = $2,
                description = $3,
                city = $4,
                postal_code = $5,
                department = $6,
                region = $7,
                website = $8,
                logo_url = $9,
                category = $10,
                last_synced_at = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.city)
        .bind(&fields.postal_code)
        .bind(&fields.department)
        .bind(&fields.region)
        .bind(&fields.website)
        .bind(&fields.logo_url)
        .bind(fields.category.to_string())
        .bind(synced_at)
        .fetch_one(pool)
        .await
    }
}
