use std::collections::VecDeque;

/// Encoded frames waiting for the connection to open
#[derive(Debug)]
pub struct OutboundQueue {
    queue: VecDeque<Vec<u8>>,
    max_size: usize,
}

impl OutboundQueue {
    pub fn new(max_size: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max_size,
        }
    }

    /// Push a frame (returns error if full)
    pub fn push(&mut self, frame: Vec<u8>) -> Result<(), QueueError> {
        if self.queue.len() >= self.max_size {
            return Err(QueueError::Full { max: self.max_size });
        }
        self.queue.push_back(frame);
        Ok(())
    }

    /// Oldest frame, left in place until [`OutboundQueue::pop`]
    pub fn front(&self) -> Option<&Vec<u8>> {
        self.queue.front()
    }

    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QueueError {
    #[error("Queue is full (max size: {max})")]
    Full { max: usize },
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::new(256)
    }
}
