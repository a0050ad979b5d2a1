use std::collections::VecDeque;

use async_trait::async_trait;

use crate::task::QueueItem;

/// Source of files to process, provided by the host.
#[async_trait]
pub trait ItemQueue: Send {
    /// Number of items still waiting.
    fn remaining(&self) -> usize;

    /// Hands over the next item. Only called while [`remaining`](Self::remaining) is non-zero.
    async fn next_item(&mut self) -> Option<QueueItem>;
}

/// In-memory FIFO queue.
#[derive(Debug, Default)]
pub struct VecQueue {
    items: VecDeque<QueueItem>,
    requests: usize,
}

impl VecQueue {
    /// Creates a queue holding `items` in order.
    pub fn new(items: impl IntoIterator<Item = QueueItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
            requests: 0,
        }
    }

    /// Appends an item.
    pub fn push(&mut self, item: QueueItem) {
        self.items.push_back(item);
    }

    /// How many times [`ItemQueue::next_item`] was called.
    pub fn requests(&self) -> usize {
        self.requests
    }
}

#[async_trait]
impl ItemQueue for VecQueue {
    fn remaining(&self) -> usize {
        self.items.len()
    }

    async fn next_item(&mut self) -> Option<QueueItem> {
        self.requests += 1;
        self.items.pop_front()
    }
}
