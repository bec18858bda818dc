use std::collections::VecDeque;

/// Most-recent-first window of samples with a fixed capacity.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.samples.push_front(sample);
        self.trim_length()
    }

    fn trim_length(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_back();
        }
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    pub fn values(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
