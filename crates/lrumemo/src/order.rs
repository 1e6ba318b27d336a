//! Access-order sequence backed by a slot arena
//!
//! Nodes live in a `Vec` and link to each other by index, so the [`Slot`]
//! returned from `push_back` keeps pointing at the same key until that node
//! is removed. Freed slots are recycled through a free list.

use std::iter::FusedIterator;

/// Stable handle to a node in an [`AccessOrder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot(usize);

/// Node in the access-order doubly-linked list
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Keys ordered from least recently used (front) to most recently used (back)
pub(crate) struct AccessOrder<K> {
    nodes: Vec<Option<Node<K>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K> AccessOrder<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Least recently used key
    pub(crate) fn front(&self) -> Option<&K> {
        self.head.and_then(|idx| self.node(idx)).map(|node| &node.key)
    }

    /// Key stored at `slot`, if the slot is live
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn key(&self, slot: Slot) -> Option<&K> {
        self.node(slot.0).map(|node| &node.key)
    }

    /// Append `key` as the most recently used entry
    pub(crate) fn push_back(&mut self, key: K) -> Slot {
        let idx = self.alloc_node(Node {
            key,
            prev: None,
            next: None,
        });
        self.link_back(idx);
        self.len += 1;
        Slot(idx)
    }

    /// Mark the key at `slot` as most recently used
    pub(crate) fn move_to_back(&mut self, slot: Slot) {
        let idx = slot.0;
        if self.tail == Some(idx) {
            return;
        }

        let live = self.node(idx).is_some();
        debug_assert!(live, "move_to_back on a free slot");
        if !live {
            return;
        }

        self.unlink(idx);
        self.link_back(idx);
    }

    /// Remove and return the least recently used key
    pub(crate) fn pop_front(&mut self) -> Option<K> {
        let head = self.head?;
        self.take(head)
    }

    /// Remove the key at `slot`
    pub(crate) fn remove(&mut self, slot: Slot) -> Option<K> {
        self.take(slot.0)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Keys from most to least recently used
    pub(crate) fn iter_recent(&self) -> KeysByRecency<'_, K> {
        KeysByRecency {
            order: self,
            cursor: self.tail,
            remaining: self.len,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K>> {
        self.nodes.get(idx).and_then(Option::as_ref)
    }

    fn take(&mut self, idx: usize) -> Option<K> {
        self.node(idx)?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.len -= 1;
        Some(node.key)
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.nodes[tail_idx] {
                    tail.next = Some(idx);
                }
            }
            None => {
                self.head = Some(idx);
            }
        }

        self.tail = Some(idx);
    }

    /// Splice the node at `idx` out, joining its neighbours
    fn unlink(&mut self, idx: usize) {
        let Some((prev, next)) = self.node(idx).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev.and_then(|p| self.nodes[p].as_mut()) {
            Some(before) => before.next = next,
            None => self.head = next,
        }

        match next.and_then(|n| self.nodes[n].as_mut()) {
            Some(after) => after.prev = prev,
            None => self.tail = prev,
        }
    }

    /// Store `node` in a recycled slot if one is free, else grow the arena
    fn alloc_node(&mut self, node: Node<K>) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }
}

/// Iterator over cached keys, most recently used first
///
/// Created by [`LruMemo::keys_by_recency`](crate::LruMemo::keys_by_recency).
pub struct KeysByRecency<'a, K> {
    order: &'a AccessOrder<K>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K> Iterator for KeysByRecency<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.order.node(self.cursor?)?;
        self.cursor = node.prev;
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for KeysByRecency<'_, K> {}

impl<K> FusedIterator for KeysByRecency<'_, K> {}

impl<K> Clone for KeysByRecency<'_, K> {
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}
