//! In-memory backend.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::backend::{BackendType, StorageBackend};
use crate::Result;

/// A process-local key/value map.
///
/// Clones share the same map, so a test can hand one clone to a store and
/// inspect or tamper with the persisted values through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let a = MemoryBackend::new();
        let mut b = a.clone();
        b.set("k", "v").unwrap();
        assert_eq!(a.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(a.get("other").unwrap(), None);
    }
}
