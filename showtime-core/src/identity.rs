use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Source of unique, opaque identifiers
pub trait IdGenerator: Send + Sync {
    fn generate_id(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `seq-1`, `seq-2`, ... Handy for readable logs and tests.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&self) -> String {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        format!("seq-{}", id)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl IdStrategy {
    pub fn build(self) -> Arc<dyn IdGenerator> {
        match self {
            IdStrategy::Uuid => Arc::new(UuidIdGenerator),
            IdStrategy::Sequential => Arc::new(SequentialIdGenerator::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.generate_id(), "seq-1");
        assert_eq!(ids.generate_id(), "seq-2");
    }

    #[test]
    fn test_ids_are_unique_across_threads() {
        let ids = Arc::new(SequentialIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.generate_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_uuid_strategy() {
        let ids = IdStrategy::Uuid.build();
        let id = ids.generate_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, ids.generate_id());
    }
}
