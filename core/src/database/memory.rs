//! `MemoryLog`: an in-memory, mutex-guarded implementation of the
//! `EventLog` contract, used by this crate's own test suite and as the
//! reference example of how to satisfy the storage contract (§6.3). A real
//! deployment brings its own persistence engine (§1 non-goals); this one
//! exists so the rest of the crate has something to run against.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::Error;

use super::EventLog;

#[derive(Default)]
pub struct MemoryLog {
    store: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventLog for MemoryLog {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let store = self
            .store
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory log poisoned".into()))?;
        Ok(store.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory log poisoned".into()))?;
        store.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn del(&self, key: &str) -> Result<(), Error> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory log poisoned".into()))?;
        store.remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, Error> {
        let store = self
            .store
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory log poisoned".into()))?;
        Ok(store
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_if_absent_via_ordered_list() {
        let log = MemoryLog::new();
        log.put("kel/EAID/0000000000000000", b"icp-bytes").unwrap();
        log.put("kel/EAID/0000000000000001", b"rot-bytes").unwrap();
        log.put("kel/EOTHER/0000000000000000", b"unrelated").unwrap();

        let events = log.list("kel/EAID/").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1, b"icp-bytes");
        assert_eq!(events[1].1, b"rot-bytes");
    }

    #[test]
    fn get_missing_key_is_none() {
        let log = MemoryLog::new();
        assert!(log.get("kel/EAID/head").unwrap().is_none());
    }

    #[test]
    fn del_removes_key() {
        let log = MemoryLog::new();
        log.put("alias/local/bob", b"EAID").unwrap();
        log.del("alias/local/bob").unwrap();
        assert!(log.get("alias/local/bob").unwrap().is_none());
    }
}
