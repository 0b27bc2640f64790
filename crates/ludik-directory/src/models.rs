//! Wire types for the Provider's directory API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One organization record as returned by the Provider directory.
///
/// Transient: consumed by the reconciliation engine, never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrganization {
    #[serde(default)]
    pub name: String,
    /// External correlation key; may be absent or blank in edge cases.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    /// Free-text category, normalized downstream.
    #[serde(default)]
    pub category: Option<String>,
    /// Last-modified timestamp, if the Provider supplies one.
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
}

/// Pagination block of a directory search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_index: u32,
    pub page_size: u32,
    pub total_count: u32,
    pub total_pages: u32,
}

impl PageInfo {
    /// Whether the Provider reports more pages after `page_index`.
    pub fn has_more(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }
}

/// One page of a directory search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPage {
    #[serde(default)]
    pub data: Vec<RemoteOrganization>,
    pub pagination: PageInfo,
}
