use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use uuid::Uuid;

use crate::error::EncodeError;
use crate::guid::{self, CompressedGuid};

/// The `#N` token identifying an entity within one STEP file.
///
/// Always positive: an unassigned record number is `None`, never `#0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordNumber(NonZeroU64);

impl RecordNumber {
    #[must_use]
    pub fn new(n: u64) -> Option<Self> {
        NonZeroU64::new(n).map(Self)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RecordNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out record numbers for one serialization session, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCounter {
    /// `None` once `u64::MAX` has been handed out.
    next: Option<NonZeroU64>,
    issued: u64,
}

impl RecordCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(RecordNumber(NonZeroU64::MIN))
    }

    /// Starts numbering at `first`; useful when appending to an existing file.
    #[must_use]
    pub fn starting_at(first: RecordNumber) -> Self {
        Self {
            next: Some(first.0),
            issued: 0,
        }
    }

    /// Returns the next number and advances the counter.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::RecordNumbersExhausted`] after `u64::MAX` has
    /// been handed out, instead of repeating it.
    pub fn next_number(&mut self) -> Result<RecordNumber, EncodeError> {
        let current = self.next.ok_or(EncodeError::RecordNumbersExhausted)?;
        self.next = current.checked_add(1);
        self.issued += 1;
        Ok(RecordNumber(current))
    }

    /// Number of records handed out by this counter.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl Default for RecordCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of one entity: a session-local record number and a GUID.
///
/// The GUID is fixed at creation. The record number is assigned by the
/// writer before rendering and may change between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    record_number: Option<RecordNumber>,
    guid: Uuid,
}

impl Identity {
    /// New identity with a random GUID and no record number.
    #[must_use]
    pub fn new() -> Self {
        Self::with_guid(guid::new_guid())
    }

    #[must_use]
    pub fn with_guid(guid: Uuid) -> Self {
        Self {
            record_number: None,
            guid,
        }
    }

    #[must_use]
    pub fn record_number(&self) -> Option<RecordNumber> {
        self.record_number
    }

    pub fn assign_record_number(&mut self, number: RecordNumber) {
        self.record_number = Some(number);
    }

    pub fn clear_record_number(&mut self) {
        self.record_number = None;
    }

    #[must_use]
    pub fn guid(&self) -> Uuid {
        self.guid
    }

    /// Replaces the GUID, e.g. to keep the GlobalId of an entity read from
    /// an earlier file.
    pub fn override_guid(&mut self, guid: Uuid) {
        self.guid = guid;
    }

    /// The GUID in its 22-character GlobalId form.
    pub fn global_id(&self) -> Result<CompressedGuid, EncodeError> {
        guid::compress(self.guid)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}
