use ac_sssp::data_structures::MinPriorityQueue;

#[test]
fn test_extract_min_returns_ascending_priorities() {
    let mut pq: MinPriorityQueue<char, f64> = MinPriorityQueue::new();
    for (element, priority) in [('d', 4.0), ('a', 1.0), ('e', 5.0), ('c', 3.0), ('b', 2.0)] {
        pq.insert(element, priority);
    }
    assert_eq!(pq.len(), 5);

    let mut order = Vec::new();
    while let Some((element, _)) = pq.extract_min() {
        order.push(element);
    }
    assert_eq!(order, vec!['a', 'b', 'c', 'd', 'e']);
    assert!(pq.is_empty());
}

#[test]
fn test_empty_queue_signals_empty() {
    let mut pq: MinPriorityQueue<usize, f64> = MinPriorityQueue::new();
    assert!(pq.is_empty());
    assert_eq!(pq.extract_min(), None);
    assert_eq!(pq.peek(), None);
}

#[test]
fn test_duplicates_are_kept() {
    let mut pq: MinPriorityQueue<usize, f64> = MinPriorityQueue::new();
    pq.insert(7, 10.0);
    pq.insert(7, 3.0);
    assert_eq!(pq.len(), 2);

    assert_eq!(pq.extract_min(), Some((7, 3.0)));
    assert_eq!(pq.extract_min(), Some((7, 10.0)));
    assert_eq!(pq.extract_min(), None);
}

#[test]
fn test_update_priority_moves_in_both_directions() {
    let mut pq: MinPriorityQueue<usize, f64> = MinPriorityQueue::new();
    pq.insert(1, 10.0);
    pq.insert(2, 20.0);
    pq.insert(3, 30.0);

    // Decrease: 3 jumps to the front
    assert!(pq.update_priority(3, 5.0));
    assert_eq!(pq.peek(), Some((3, 5.0)));

    // Increase: 3 sinks behind 1 and 2
    assert!(pq.update_priority(3, 25.0));
    assert_eq!(pq.priority_of(3), Some(25.0));

    assert!(!pq.update_priority(42, 1.0));
    assert!(!pq.contains(42));

    let order: Vec<usize> = std::iter::from_fn(|| pq.extract_min().map(|(e, _)| e)).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn test_elements_and_clear() {
    let mut pq: MinPriorityQueue<usize, u32> = MinPriorityQueue::with_capacity(4);
    pq.insert(4, 4);
    pq.insert(2, 2);
    pq.insert(9, 9);

    let mut elements = pq.elements();
    elements.sort();
    assert_eq!(elements, vec![2, 4, 9]);

    pq.clear();
    assert!(pq.is_empty());
    assert_eq!(pq.len(), 0);
}
