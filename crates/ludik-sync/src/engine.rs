//! Reconciliation engine: idempotent, change-detecting upserts keyed by
//! Provider slug.

use crate::category::normalize_category;
use crate::error::SyncOpResult;
use crate::store::AssociationStore;
use chrono::Utc;
use ludik_db::{Association, DirectoryFields};
use ludik_directory::RemoteOrganization;
use std::fmt;
use tracing::debug;

/// Outcome of reconciling one remote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new association was inserted for an unseen slug.
    Created,
    /// An existing association had differing fields and was overwritten.
    Updated,
    /// Nothing was written: identical fields, or a record without a slug.
    Unchanged,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Engine that reconciles remote organization records against the local
/// association store.
pub struct ReconciliationEngine<S> {
    store: S,
}

impl<S: AssociationStore> ReconciliationEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reconcile one remote record.
    ///
    /// Records without a usable slug are skipped with
    /// [`UpsertOutcome::Unchanged`] — logged, not an error. Otherwise the
    /// record is matched by `provider_slug`: absent → insert (Created);
    /// present with any differing comparable field → overwrite plus
    /// `last_synced_at` (Updated); identical → no write (Unchanged), so
    /// no-op syncs generate no spurious update timestamps.
    ///
    /// The moderation `status` is neither compared nor overwritten: the
    /// Provider's status never propagates to a locally moderated row.
    pub async fn reconcile(&self, record: &RemoteOrganization) -> SyncOpResult<UpsertOutcome> {
        let slug = match record.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => {
                debug!(name = %record.name, "Skipping directory record without slug");
                return Ok(UpsertOutcome::Unchanged);
            }
        };

        let fields = directory_fields(record);

        match self.store.find_by_provider_slug(slug).await? {
            None => {
                let created = self.store.insert_synced(slug, &fields, Utc::now()).await?;
                debug!(slug, id = %created.id, "Created association from directory");
                Ok(UpsertOutcome::Created)
            }
            Some(existing) => {
                if fields_differ(&existing, &fields) {
                    self.store
                        .update_synced(existing.id, &fields, Utc::now())
                        .await?;
                    debug!(slug, id = %existing.id, "Updated association from directory");
                    Ok(UpsertOutcome::Updated)
                } else {
                    Ok(UpsertOutcome::Unchanged)
                }
            }
        }
    }
}

/// Project a remote record onto the comparable directory field set.
pub fn directory_fields(record: &RemoteOrganization) -> DirectoryFields {
    DirectoryFields {
        name: record.name.clone(),
        description: record.description.clone(),
        city: record.city.clone(),
        postal_code: record.zip_code.clone(),
        department: record.department.clone(),
        region: record.region.clone(),
        website: record.website.clone(),
        logo_url: record.logo.clone(),
        category: normalize_category(record.category.as_deref()),
    }
}

/// Field-level comparison over the fixed comparable set.
fn fields_differ(existing: &Association, fields: &DirectoryFields) -> bool {
    existing.name != fields.name
        || existing.description != fields.description
        || existing.city != fields.city
        || existing.postal_code != fields.postal_code
        || existing.department != fields.department
        || existing.region != fields.region
        || existing.website != fields.website
        || existing.logo_url != fields.logo_url
        || existing.category() != fields.category
}
