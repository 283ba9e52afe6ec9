//! Frontier containers shared by all strategies. Which container is used is the only
//! structural difference between the strategies; priorities come from the strategy itself.
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrontierKind {
    /// Last in, first out.
    Stack,
    /// First in, first out.
    Queue,
    /// Smallest priority first, insertion order among equal priorities.
    Priority,
}

/// Reference to a node in the pool together with the values it was pushed with.
#[derive(Copy, Clone, Debug)]
pub struct FrontierEntry {
    pub priority: i32,
    pub cost: i32,
    pub index: usize,
    sequence: u64,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the smallest priority, and among equal priorities the
        // earliest pushed entry, has to compare as the greatest.
        match other.priority.cmp(&self.priority) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

#[derive(Clone, Debug)]
enum Entries {
    Stack(Vec<FrontierEntry>),
    Queue(VecDeque<FrontierEntry>),
    Priority(BinaryHeap<FrontierEntry>),
}

#[derive(Clone, Debug)]
pub struct Frontier {
    entries: Entries,
    next_sequence: u64,
}

impl Frontier {
    pub fn new(kind: FrontierKind) -> Frontier {
        let entries = match kind {
            FrontierKind::Stack => Entries::Stack(Vec::new()),
            FrontierKind::Queue => Entries::Queue(VecDeque::new()),
            FrontierKind::Priority => Entries::Priority(BinaryHeap::new()),
        };
        Frontier {
            entries,
            next_sequence: 0,
        }
    }

    pub fn kind(&self) -> FrontierKind {
        match self.entries {
            Entries::Stack(_) => FrontierKind::Stack,
            Entries::Queue(_) => FrontierKind::Queue,
            Entries::Priority(_) => FrontierKind::Priority,
        }
    }

    pub fn push(&mut self, index: usize, priority: i32, cost: i32) {
        let entry = FrontierEntry {
            priority,
            cost,
            index,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        match &mut self.entries {
            Entries::Stack(v) => v.push(entry),
            Entries::Queue(q) => q.push_back(entry),
            Entries::Priority(h) => h.push(entry),
        }
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        match &mut self.entries {
            Entries::Stack(v) => v.pop(),
            Entries::Queue(q) => q.pop_front(),
            Entries::Priority(h) => h.pop(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Stack(v) => v.len(),
            Entries::Queue(q) => q.len(),
            Entries::Priority(h) => h.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the frontier while keeping its allocation.
    pub fn clear(&mut self) {
        self.next_sequence = 0;
        match &mut self.entries {
            Entries::Stack(v) => v.clear(),
            Entries::Queue(q) => q.clear(),
            Entries::Priority(h) => h.clear(),
        }
    }

    /// Entries in no particular order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &FrontierEntry> + '_> {
        match &self.entries {
            Entries::Stack(v) => Box::new(v.iter()),
            Entries::Queue(q) => Box::new(q.iter()),
            Entries::Priority(h) => Box::new(h.iter()),
        }
    }
}
