//! Patient record persistence
//!
//! `RecordStore` is the seam between the service layer and storage. Methods
//! return boxed futures so the trait can be shared as
//! `Arc<dyn RecordStore>`.

pub mod memory;

use futures::future::BoxFuture;

use crate::error::Result;
use crate::models::record::{NewPatientRecord, OwnerFilter, PatientRecord};

pub use memory::InMemoryRecordStore;

/// Future returned by `RecordStore` methods
pub type StoreFuture<'a, T> = BoxFuture<'a, Result<T>>;

/// Edit applied to the current version of a record by `update_with`
pub type RecordEdit<'a> = Box<dyn FnOnce(&PatientRecord) -> Result<PatientRecord> + Send + 'a>;

/// Storage of patient records
pub trait RecordStore: Send + Sync {
    /// Store a new record and assign its id and timestamps
    ///
    /// When the record carries an owner and a submission id that were already
    /// stored together, the existing record is returned unchanged.
    fn create<'a>(&'a self, record: NewPatientRecord) -> StoreFuture<'a, PatientRecord>;

    /// Fetch a record by id
    fn get<'a>(&'a self, id: u64) -> StoreFuture<'a, Option<PatientRecord>>;

    /// Replace the clinician-entered and derived fields of record `id`
    ///
    /// Id, owner, submission id and creation time are kept from the stored
    /// record. Fails with `NotFound` if `id` does not exist.
    fn update<'a>(&'a self, id: u64, record: PatientRecord) -> StoreFuture<'a, PatientRecord> {
        self.update_with(
            id,
            Box::new(move |_: &PatientRecord| -> Result<PatientRecord> { Ok(record) }),
        )
    }

    /// Derive the new version of record `id` from its current version
    ///
    /// `edit` sees the latest stored record and runs in the same serialized
    /// step as the write, so concurrent edits never start from a stale copy.
    /// An error from `edit` leaves the record unchanged. The same fields as in
    /// `update` are kept from the stored record.
    fn update_with<'a>(&'a self, id: u64, edit: RecordEdit<'a>) -> StoreFuture<'a, PatientRecord>;

    /// Remove record `id`; fails with `NotFound` if it does not exist
    fn delete<'a>(&'a self, id: u64) -> StoreFuture<'a, ()>;

    /// Records passing `filter`, newest first
    fn list<'a>(&'a self, filter: &'a OwnerFilter) -> StoreFuture<'a, Vec<PatientRecord>>;

    /// The record `owner_id` created with idempotency key `submission_id`
    fn find_by_submission<'a>(
        &'a self,
        owner_id: &'a str,
        submission_id: &'a str,
    ) -> StoreFuture<'a, Option<PatientRecord>>;

    /// Assign every record without an owner to `owner_id`, returning how many
    /// records changed
    fn reassign_unowned<'a>(&'a self, owner_id: &'a str) -> StoreFuture<'a, usize>;
}
