use std::collections::VecDeque;

/// Bounded FIFO of recent points. Pushing into a full buffer evicts the oldest.
#[derive(Debug, Clone)]
pub struct RollingHistory<T> {
    points: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingHistory<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: T) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn latest(&self) -> Option<&T> {
        self.points.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_and_latest() {
        let mut history = RollingHistory::new(30);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), Some(&2.0));
    }

    #[test]
    fn evicts_oldest_first() {
        let mut history = RollingHistory::new(5);
        for i in 0..10 {
            history.push(i);
        }
        let kept: Vec<i32> = history.iter().copied().collect();
        assert_eq!(kept, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn zero_capacity_keeps_one_point() {
        let mut history = RollingHistory::new(0);
        history.push("a");
        history.push("b");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec!["b"]);
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(capacity in 1usize..80, ticks in 0usize..1000) {
            let mut history = RollingHistory::new(capacity);
            for tick in 0..ticks {
                history.push(tick);
                prop_assert!(history.len() <= capacity);
            }
            prop_assert_eq!(history.len(), ticks.min(capacity));
            if ticks > 0 {
                prop_assert_eq!(history.latest(), Some(&(ticks - 1)));
            }
        }
    }
}
