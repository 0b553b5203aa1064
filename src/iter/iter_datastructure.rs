///! Generic data structure interface for graph search algorithms
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::LinkedList;
use std::fmt::Debug;

/// Trait for queues used in graph search/iteration. Depending on the
/// implementation, traversal order differs: FIFO for breadth-first,
/// priority-ordered for best-first / Yen candidate selection.
pub trait SearchQueue<T> {
    fn push(&mut self, elt: T) -> ();
    fn pop(&mut self) -> Option<T>;
}

/// FIFO queue, used by the hop-count breadth-first search.
#[derive(Clone, Debug)]
pub struct Queue<T> {
    queue: LinkedList<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Queue<T> {
        Queue {
            queue: LinkedList::new(),
        }
    }
}

impl<T> SearchQueue<T> for Queue<T> {
    fn push(&mut self, elt: T) -> () {
        self.queue.push_back(elt)
    }

    fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }
}

/// Min-priority queue, used by Yen's algorithm to pick the cheapest
/// candidate path out of the B-list on each iteration.
#[derive(Clone, Debug)]
pub struct MinPriorityQueue<T: Ord> {
    priority_queue: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> MinPriorityQueue<T> {
    pub fn new() -> MinPriorityQueue<T> {
        MinPriorityQueue {
            priority_queue: BinaryHeap::new(),
        }
    }
}

impl<T: Ord + Debug> SearchQueue<T> for MinPriorityQueue<T> {
    fn push(&mut self, elt: T) -> () {
        self.priority_queue.push(Reverse(elt))
    }

    fn pop(&mut self) -> Option<T> {
        self.priority_queue.pop().map(|Reverse(x)| x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_pops_entries_in_fifo_order() {
        let mut queue: Queue<usize> = Queue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn min_priority_queue_pops_entries_in_increasing_order() {
        let mut queue: MinPriorityQueue<usize> = MinPriorityQueue::new();
        queue.push(3);
        queue.push(1);
        queue.push(2);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }
}
