use crate::detect::Anomaly;

/// Initial capacity of the per-cycle anomaly buffer. The buffer grows
/// past this if a cycle produces more records.
pub const DEFAULT_ANOMALY_CAPACITY: usize = 1000;

/// Append-only sequence of anomaly records for the current cycle.
#[derive(Debug)]
pub struct AnomalyBuffer {
    records: Vec<Anomaly>,
}

impl AnomalyBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ANOMALY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Empty the buffer, retaining allocated capacity.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn push(&mut self, record: Anomaly) {
        self.records.push(record);
    }

    /// Records oldest-first, in push order.
    pub fn iter(&self) -> impl Iterator<Item = &Anomaly> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Anomaly] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for AnomalyBuffer {
    fn default() -> Self {
        Self::new()
    }
}
