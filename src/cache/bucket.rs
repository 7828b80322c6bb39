use crate::cache::entry::Entry;
use std::sync::Arc;

/// One collision chain: a singly-linked sequence of entries whose keys hashed
/// to the same bucket index.
///
/// The bucket owns the head node and each node owns its successor. Structural
/// mutation (append, splice-removal, clear) requires `&mut self`; the cache
/// provides that exclusivity through a per-bucket lock. Entries are shared as
/// [`Arc`] so a caller can keep using an entry's value lock after releasing
/// the bucket lock.
#[derive(Debug, Default)]
pub(crate) struct Bucket {
    head: Option<Box<Node>>,
}

#[derive(Debug)]
struct Node {
    entry: Arc<Entry>,
    next: Option<Box<Node>>,
}

impl Bucket {
    pub(crate) const fn new() -> Self {
        Self { head: None }
    }

    /// Walks the chain and returns the entry stored under `key`, if any.
    pub(crate) fn find(&self, key: &str) -> Option<Arc<Entry>> {
        let mut current = self.head.as_deref();
        while let Some(node) = current {
            if node.entry.key() == key {
                return Some(Arc::clone(&node.entry));
            }
            current = node.next.as_deref();
        }
        None
    }

    /// Appends an entry at the tail of the chain.
    pub(crate) fn push_back(&mut self, entry: Arc<Entry>) {
        let mut slot = &mut self.head;
        while let Some(node) = slot {
            slot = &mut node.next;
        }
        *slot = Some(Box::new(Node { entry, next: None }));
    }

    /// Unlinks the node holding `key` and returns its entry. Head removal
    /// promotes the next node, tail removal truncates, and mid-chain removal
    /// splices the neighbors together; all three are the same slot rewrite.
    pub(crate) fn remove(&mut self, key: &str) -> Option<Arc<Entry>> {
        let mut slot = &mut self.head;
        loop {
            let matches = match slot.as_deref() {
                Some(node) => node.entry.key() == key,
                None => return None,
            };
            if matches {
                let node = slot.take().expect("loop checked the slot is occupied");
                *slot = node.next;
                return Some(node.entry);
            }
            slot = &mut slot.as_mut().expect("loop checked the slot is occupied").next;
        }
    }

    /// Drops every node in the chain iteratively and returns how many nodes
    /// were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let mut dropped = 0;
        let mut next = self.head.take();
        while let Some(mut node) = next {
            next = node.next.take();
            dropped += 1;
        }
        dropped
    }
}

// The default recursive drop of the boxed nodes would overflow the stack on a
// sufficiently long chain, and chain length is unbounded here.
impl Drop for Bucket {
    fn drop(&mut self) {
        self.clear();
    }
}
