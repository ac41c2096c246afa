//! Arena-backed doubly linked list that tracks recency order.
//!
//! Nodes are stored in a slot vector and linked by [`NodeId`] indices rather
//! than pointers. Slots freed by `remove` / `pop_back` go onto a free list and
//! are reused by later pushes, so a [`NodeId`] stays valid for as long as its
//! node is linked.
//!
//! ```text
//!   slots: [ Some(b) | None | Some(a) | Some(c) ]      free: [1]
//!
//!   head ─► [2: a] ◄──► [0: b] ◄──► [3: c] ◄── tail
//!           (MRU)                    (LRU)
//! ```
//!
//! `push_front`, `move_to_front`, `remove` and `pop_back` are all O(1).

use crate::error::InvariantError;

/// Stable handle to a node in a [`RecencyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the slot index backing this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

struct Node<K> {
    key: K,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Keys ordered from most recently used (head) to least recently used (tail).
pub struct RecencyList<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<K> RecencyList<K> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Key at the head (most recently used).
    pub fn front(&self) -> Option<&K> {
        self.head.and_then(|id| self.get(id))
    }

    /// Key at the tail, i.e. the next eviction candidate.
    pub fn back(&self) -> Option<&K> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(|node| &node.key)
    }

    /// Inserts `key` at the head and returns its handle.
    pub fn push_front(&mut self, key: K) -> NodeId {
        let node = Node {
            key,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    /// Moves a linked node to the head. Unknown handles are ignored.
    pub fn move_to_front(&mut self, id: NodeId) {
        if self.head == Some(id) {
            return;
        }
        if self.unlink(id) {
            self.link_front(id);
        }
    }

    /// Unlinks the node and returns its key, freeing the slot for reuse.
    pub fn remove(&mut self, id: NodeId) -> Option<K> {
        if !self.unlink(id) {
            return None;
        }
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.key)
    }

    /// Removes and returns the least recently used key.
    pub fn pop_back(&mut self) -> Option<K> {
        let tail = self.tail?;
        self.remove(tail)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Walks the list and checks link symmetry, slot accounting and length.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let broken = |msg: String| Err(InvariantError::BrokenLinks(msg));

        if self.head.is_none() != self.tail.is_none() {
            return broken(format!(
                "head is {:?} but tail is {:?}",
                self.head, self.tail
            ));
        }

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        if occupied != self.len {
            return broken(format!("{occupied} occupied slots but len is {}", self.len));
        }
        if occupied + self.free.len() != self.slots.len() {
            return broken(format!(
                "{occupied} occupied + {} free != {} slots",
                self.free.len(),
                self.slots.len()
            ));
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.node(id) else {
                return broken(format!("link to empty slot {}", id.0));
            };
            if node.prev != prev {
                return broken(format!(
                    "node {} has prev {:?}, expected {:?}",
                    id.0, node.prev, prev
                ));
            }
            count += 1;
            if count > self.len {
                return broken(format!("walk exceeded len {}, cycle suspected", self.len));
            }
            prev = Some(id);
            cursor = node.next;
        }

        if prev != self.tail {
            return broken(format!("walk ended at {:?} but tail is {:?}", prev, self.tail));
        }
        if count != self.len {
            return broken(format!("walked {count} nodes but len is {}", self.len));
        }
        Ok(())
    }

    fn node(&self, id: NodeId) -> Option<&Node<K>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    // Attach an already-allocated, detached node at the head.
    fn link_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => {
                if let Some(node) = self.node_mut(head) {
                    node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    // Detach a node from its neighbours, leaving its slot occupied.
    fn unlink(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let (prev, next) = (node.prev, node.next);

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
        true
    }
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a [`RecencyList`], head to tail.
pub struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
