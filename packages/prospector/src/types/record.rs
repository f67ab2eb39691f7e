//! Contact records and their dedup identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The uniqueness boundary for records: one record per (owner, name, locator).
///
/// Dedup is a precondition of record creation, not an after-the-fact cleanup;
/// stores enforce this key and the processor probes it before doing any work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub owner: String,
    pub name: String,
    pub locator: String,
}

impl IdentityKey {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            locator: locator.into(),
        }
    }
}

/// The optional fields the pipeline can populate for one item.
///
/// Every field may be absent; an all-empty set is still a valid extraction
/// result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
}

impl ContactFields {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.address.is_none()
            && self.website.is_none()
            && self.email.is_none()
    }

    /// Number of populated fields, for logging.
    pub fn populated(&self) -> usize {
        [
            self.phone.is_some(),
            self.address.is_some(),
            self.website.is_some(),
            self.email.is_some(),
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }
}

/// The persisted output of extracting one item, possibly partial.
///
/// Records outlive their job: deleting or re-running a job does not touch
/// the records it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub locator: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub source_job_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    pub fn new(key: IdentityKey, fields: ContactFields, source_job_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: key.owner,
            name: key.name,
            locator: key.locator,
            phone: fields.phone,
            address: fields.address,
            website: fields.website,
            email: fields.email,
            source_job_id,
            created_at: Utc::now(),
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.owner, &self.name, &self.locator)
    }

    /// True when at least one contact field is missing.
    pub fn is_partial(&self) -> bool {
        self.phone.is_none()
            || self.address.is_none()
            || self.website.is_none()
            || self.email.is_none()
    }
}

/// Field-population counts over an owner's records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStats {
    pub total: usize,
    pub with_phone: usize,
    pub with_address: usize,
    pub with_website: usize,
    pub with_email: usize,
}

impl RecordStats {
    /// Tally stats from a record iterator (used by the in-memory store).
    pub fn tally<'a>(records: impl Iterator<Item = &'a ContactRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            stats.with_phone += record.phone.is_some() as usize;
            stats.with_address += record.address.is_some() as usize;
            stats.with_website += record.website.is_some() as usize;
            stats.with_email += record.email.is_some() as usize;
        }
        stats
    }
}
