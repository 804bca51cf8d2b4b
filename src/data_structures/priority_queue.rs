use std::fmt::Debug;

/// An element stored in the heap together with its priority
#[derive(Debug, Clone, Copy)]
struct HeapEntry<E, P> {
    element: E,
    priority: P,
}

/// Binary min-heap priority queue stored as a dense vector
///
/// - `insert` and `extract_min` run in O(log n)
/// - `update_priority` scans for the element in O(n) before re-heapifying
///
/// Duplicates are not suppressed: the same element may be queued several times
/// with different priorities, and callers skip stale entries themselves. Ties
/// between equal priorities are broken arbitrarily.
#[derive(Debug, Clone)]
pub struct MinPriorityQueue<E, P>
where
    E: Copy + Debug,
    P: PartialOrd + Copy + Debug,
{
    heap: Vec<HeapEntry<E, P>>,
}

impl<E, P> Default for MinPriorityQueue<E, P>
where
    E: Copy + Debug,
    P: PartialOrd + Copy + Debug,
{
    fn default() -> Self {
        MinPriorityQueue { heap: Vec::new() }
    }
}

impl<E, P> MinPriorityQueue<E, P>
where
    E: Copy + Debug,
    P: PartialOrd + Copy + Debug,
{
    /// Creates a new empty priority queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty queue with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        MinPriorityQueue {
            heap: Vec::with_capacity(capacity),
        }
    }

    /// Returns true if the priority queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of entries in the priority queue
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Inserts an element with the given priority
    pub fn insert(&mut self, element: E, priority: P) {
        self.heap.push(HeapEntry { element, priority });
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the entry with the smallest priority, or `None` when empty
    pub fn extract_min(&mut self) -> Option<(E, P)> {
        if self.heap.is_empty() {
            return None;
        }

        let root = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        Some((root.element, root.priority))
    }

    /// Returns the entry with the smallest priority without removing it
    pub fn peek(&self) -> Option<(E, P)> {
        self.heap.first().map(|entry| (entry.element, entry.priority))
    }

    /// Queued elements in heap order (not priority order)
    pub fn elements(&self) -> Vec<E> {
        self.heap.iter().map(|entry| entry.element).collect()
    }

    /// Clears the priority queue
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !(self.heap[index].priority < self.heap[parent].priority) {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < len && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.heap.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<E, P> MinPriorityQueue<E, P>
where
    E: Copy + Debug + PartialEq,
    P: PartialOrd + Copy + Debug,
{
    /// Changes the priority of the first queued entry for `element`
    ///
    /// Sifts up when the priority decreased and down when it increased.
    /// Returns false if the element is not queued.
    pub fn update_priority(&mut self, element: E, priority: P) -> bool {
        let index = match self.heap.iter().position(|entry| entry.element == element) {
            Some(index) => index,
            None => return false,
        };

        let old = self.heap[index].priority;
        self.heap[index].priority = priority;
        if priority < old {
            self.sift_up(index);
        } else if priority > old {
            self.sift_down(index);
        }
        true
    }

    /// Returns true if the element is queued at least once
    pub fn contains(&self, element: E) -> bool {
        self.heap.iter().any(|entry| entry.element == element)
    }

    /// Priority of the first queued entry for `element`
    pub fn priority_of(&self, element: E) -> Option<P> {
        self.heap
            .iter()
            .find(|entry| entry.element == element)
            .map(|entry| entry.priority)
    }
}
