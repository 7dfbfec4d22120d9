//! FIFO Order Module
//!
//! Tracks insertion order for FIFO eviction.
//!
//! Nodes live in a `Vec` and link to each other by index, with freed slots
//! recycled through a free list. The caller keeps the index returned by
//! [`FifoOrder::push_newest`] so any key can be unlinked in O(1).

// == Node ==
#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

// == FIFO Order ==
/// Insertion-ordered list of keys.
///
/// - Head = oldest (next eviction victim)
/// - Tail = newest
#[derive(Debug)]
pub struct FifoOrder<K> {
    nodes: Vec<Option<Node<K>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K> FifoOrder<K> {
    // == Constructor ==
    /// Creates an empty order list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty order list with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    // == Push Newest ==
    /// Appends a key at the tail and returns its slot index.
    pub fn push_newest(&mut self, key: K) -> usize {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.nodes[tail_idx] {
                    tail.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }

        self.tail = Some(idx);
        self.len += 1;
        idx
    }

    // == Remove ==
    /// Unlinks the node at `idx` and returns its key.
    ///
    /// Returns None if the slot is vacant.
    pub fn remove(&mut self, idx: usize) -> Option<K> {
        let node = self.nodes.get_mut(idx)?.take()?;

        match node.prev {
            Some(prev_idx) => {
                if let Some(prev) = &mut self.nodes[prev_idx] {
                    prev.next = node.next;
                }
            }
            None => self.head = node.next,
        }

        match node.next {
            Some(next_idx) => {
                if let Some(next) = &mut self.nodes[next_idx] {
                    next.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free_list.push(idx);
        self.len -= 1;
        Some(node.key)
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest key.
    pub fn pop_oldest(&mut self) -> Option<K> {
        let head = self.head?;
        self.remove(head)
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.head
            .and_then(|idx| self.nodes[idx].as_ref())
            .map(|node| &node.key)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every node and releases the free list.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            order: self,
            cursor: self.head,
        }
    }

    fn alloc_node(&mut self) -> usize {
        match self.free_list.pop() {
            Some(idx) => idx,
            None => {
                self.nodes.push(None);
                self.nodes.len() - 1
            }
        }
    }
}

impl<K> Default for FifoOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Oldest-to-newest iterator over a [`FifoOrder`].
pub struct Iter<'a, K> {
    order: &'a FifoOrder<K>,
    cursor: Option<usize>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.order.nodes[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some(&node.key)
    }
}
