//! Fulfillment attempt log buffer.
//!
//! Attempt records accumulate in memory and reach the store only in batches,
//! bounding per-step write cost. Growth is bounded by the maintenance period:
//! at most one record per step between flushes.

use supplysim_store::{FulfillmentRecord, SimulationStore, StoreError};

/// Bounded queue of attempt records awaiting a batch write.
#[derive(Debug, Default)]
pub struct FulfillmentLogBuffer {
    records: Vec<FulfillmentRecord>,
}

impl FulfillmentLogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(1); never touches the store.
    pub fn append(&mut self, record: FulfillmentRecord) {
        self.records.push(record);
    }

    /// Persist all buffered records as one batch and clear the buffer.
    /// A flush of an empty buffer is a no-op. Returns the batch size.
    ///
    /// The buffer is only cleared after the store accepts the batch, so a
    /// failed flush loses nothing.
    pub fn flush<S: SimulationStore>(&mut self, store: &mut S) -> Result<usize, StoreError> {
        if self.records.is_empty() {
            return Ok(0);
        }
        store.append_fulfillment_records(self.records.clone())?;
        let flushed = self.records.len();
        self.records.clear();
        Ok(flushed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use supplysim_store::InMemoryStore;

    fn test_record() -> FulfillmentRecord {
        FulfillmentRecord::no_candidate(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn flush_persists_one_batch_and_clears() {
        let mut store = InMemoryStore::new();
        let mut buffer = FulfillmentLogBuffer::new();

        buffer.append(test_record());
        buffer.append(test_record());
        assert_eq!(buffer.len(), 2);

        let flushed = buffer.flush(&mut store).unwrap();
        assert_eq!(flushed, 2);
        assert!(buffer.is_empty());

        store.commit().unwrap();
        assert_eq!(store.fulfillment_log().len(), 2);
    }

    #[test]
    fn flush_on_empty_buffer_is_a_no_op() {
        let mut store = InMemoryStore::new();
        let mut buffer = FulfillmentLogBuffer::new();

        assert_eq!(buffer.flush(&mut store).unwrap(), 0);
        store.commit().unwrap();
        assert!(store.fulfillment_log().is_empty());
    }

    #[test]
    fn flush_after_flush_appends_nothing() {
        let mut store = InMemoryStore::new();
        let mut buffer = FulfillmentLogBuffer::new();

        buffer.append(test_record());
        buffer.flush(&mut store).unwrap();
        buffer.flush(&mut store).unwrap();

        store.commit().unwrap();
        assert_eq!(store.fulfillment_log().len(), 1);
    }
}
