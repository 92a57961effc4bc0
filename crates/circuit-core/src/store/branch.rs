//! Write-buffering overlay over a parent store.

use super::{BatchOp, KvStore};
use crate::error::StoreError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A unit of work over a parent store.
///
/// Reads see buffered writes first, then the parent. Nothing reaches the parent
/// until [`BranchStore::commit`]; dropping the branch discards every write.
pub struct BranchStore<'p> {
    parent: &'p dyn KvStore,
    writes: Mutex<BTreeMap<Vec<u8>, Option<Vec<u8>>>>,
}

impl<'p> BranchStore<'p> {
    pub fn new(parent: &'p dyn KvStore) -> Self {
        Self {
            parent,
            writes: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of buffered writes (sets and removals).
    pub fn pending_writes(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    /// Flush buffered writes to the parent as one batch. Returns the batch size.
    pub fn commit(self) -> Result<usize, StoreError> {
        let writes = self.writes.into_inner().map_err(|_| StoreError::Poisoned)?;
        let batch: Vec<BatchOp> = writes.into_iter().collect();
        if !batch.is_empty() {
            self.parent.apply_batch(&batch)?;
        }
        Ok(batch.len())
    }

    /// Drop buffered writes. Returns how many were discarded.
    pub fn discard(self) -> usize {
        match self.writes.into_inner() {
            Ok(writes) => writes.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<Vec<u8>, Option<Vec<u8>>>>, StoreError> {
        self.writes.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl KvStore for BranchStore<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(buffered) = self.lock()?.get(key) {
            return Ok(buffered.clone());
        }
        self.parent.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn remove(&self, key: &[u8]) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_vec(), None);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.iter_prefix(prefix)?.into_iter().collect();

        let writes = self.lock()?;
        for (key, value) in writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }

    fn apply_batch(&self, batch: &[BatchOp]) -> Result<(), StoreError> {
        let mut writes = self.lock()?;
        for (key, value) in batch {
            writes.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_reads_see_buffered_writes_before_parent() {
        let parent = MemoryStore::new();
        parent.set(b"a", b"parent").unwrap();
        parent.set(b"b", b"parent").unwrap();

        let branch = BranchStore::new(&parent);
        branch.set(b"a", b"branch").unwrap();
        branch.remove(b"b").unwrap();

        assert_eq!(branch.get(b"a").unwrap(), Some(b"branch".to_vec()));
        assert_eq!(branch.get(b"b").unwrap(), None);
        assert_eq!(parent.get(b"a").unwrap(), Some(b"parent".to_vec()));
        assert_eq!(parent.get(b"b").unwrap(), Some(b"parent".to_vec()));
    }

    #[test]
    fn test_commit_applies_writes_to_parent() {
        let parent = MemoryStore::new();
        parent.set(b"gone", b"x").unwrap();

        let branch = BranchStore::new(&parent);
        branch.set(b"new", b"y").unwrap();
        branch.remove(b"gone").unwrap();
        assert_eq!(branch.commit().unwrap(), 2);

        assert_eq!(parent.get(b"new").unwrap(), Some(b"y".to_vec()));
        assert_eq!(parent.get(b"gone").unwrap(), None);
    }

    #[test]
    fn test_drop_discards_writes() {
        let parent = MemoryStore::new();
        parent.set(b"kept", b"x").unwrap();
        {
            let branch = BranchStore::new(&parent);
            branch.remove(b"kept").unwrap();
            assert_eq!(branch.pending_writes().unwrap(), 1);
        }
        assert_eq!(parent.get(b"kept").unwrap(), Some(b"x".to_vec()));

        let branch = BranchStore::new(&parent);
        branch.set(b"other", b"y").unwrap();
        assert_eq!(branch.discard(), 1);
        assert_eq!(parent.get(b"other").unwrap(), None);
    }

    #[test]
    fn test_iter_prefix_merges_overlay() {
        let parent = MemoryStore::new();
        parent.set(&[1, 1], b"p1").unwrap();
        parent.set(&[1, 2], b"p2").unwrap();
        parent.set(&[2, 1], b"other").unwrap();

        let branch = BranchStore::new(&parent);
        branch.remove(&[1, 1]).unwrap();
        branch.set(&[1, 3], b"b3").unwrap();
        branch.set(&[2, 2], b"outside").unwrap();

        let entries = branch.iter_prefix(&[1]).unwrap();
        assert_eq!(
            entries,
            vec![(vec![1, 2], b"p2".to_vec()), (vec![1, 3], b"b3".to_vec())]
        );
    }

    #[test]
    fn test_nested_branch_commits_into_outer_branch_only() {
        let parent = MemoryStore::new();
        let outer = BranchStore::new(&parent);
        {
            let inner = BranchStore::new(&outer);
            inner.set(b"k", b"v").unwrap();
            inner.commit().unwrap();
        }
        assert_eq!(outer.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(parent.get(b"k").unwrap(), None);
    }
}
