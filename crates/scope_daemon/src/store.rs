//! In-memory emission record store.
//!
//! One `RwLock` around the whole map serializes writers, which is the
//! row-level locking the record lifecycle needs: concurrent edits of the
//! same record are last-writer-wins, and no reader ever observes a
//! half-written record. Aggregation views recompute from these source
//! records on demand; nothing is maintained incrementally.

use std::collections::HashMap;

use scope_core::{ActivityType, CompanyId, EmissionRecord, MemberId, RecordId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("emission record not found")]
    NotFound,
    #[error("record does not belong to the requesting member")]
    Forbidden,
}

/// Optional filters for list queries; absent filters match everything.
#[derive(Debug, Default, Clone)]
pub struct RecordFilter {
    pub company_id: Option<CompanyId>,
    pub activity_type: Option<ActivityType>,
    pub reporting_year: Option<i32>,
    pub reporting_month: Option<u32>,
}

impl RecordFilter {
    fn matches(&self, record: &EmissionRecord) -> bool {
        self.company_id
            .as_ref()
            .is_none_or(|c| record.company_id == *c)
            && self
                .activity_type
                .is_none_or(|a| record.activity_type() == a)
            && self
                .reporting_year
                .is_none_or(|y| record.reporting_year == y)
            && self
                .reporting_month
                .is_none_or(|m| record.reporting_month == m)
    }
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<RecordId, EmissionRecord>,
}

impl RecordStore {
    pub fn insert(&mut self, record: EmissionRecord) {
        self.records.insert(record.id, record);
    }

    /// Fetches a record after verifying it belongs to the caller.
    pub fn get_owned(&self, member_id: MemberId, id: RecordId) -> Result<&EmissionRecord, StoreError> {
        let record = self.records.get(&id).ok_or(StoreError::NotFound)?;
        if record.member_id != member_id {
            return Err(StoreError::Forbidden);
        }
        Ok(record)
    }

    /// Overwrites a record by id. Used by the update flow after ownership
    /// has already been verified via `get_owned`.
    pub fn replace(&mut self, record: EmissionRecord) {
        self.records.insert(record.id, record);
    }

    /// Removes a record once ownership is verified. Leaf record; no
    /// cascading effects.
    pub fn remove(&mut self, member_id: MemberId, id: RecordId) -> Result<EmissionRecord, StoreError> {
        self.get_owned(member_id, id)?;
        Ok(self.records.remove(&id).expect("checked above"))
    }

    /// All of a member's records matching the filter, ordered by period
    /// then creation time so listings are stable.
    pub fn query(&self, member_id: MemberId, filter: &RecordFilter) -> Vec<&EmissionRecord> {
        let mut records: Vec<&EmissionRecord> = self
            .records
            .values()
            .filter(|r| r.member_id == member_id && filter.matches(r))
            .collect();
        records.sort_by(|a, b| {
            (a.reporting_year, a.reporting_month, a.created_at, a.id.0).cmp(&(
                b.reporting_year,
                b.reporting_month,
                b.created_at,
                b.id.0,
            ))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
