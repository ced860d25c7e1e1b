use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Per-actor FIFO of pending messages (component **C1**).
///
/// Unbounded: `post` never blocks and never fails. Messages posted by a
/// single sender are delivered in send order; ordering across senders is
/// unspecified (inherited straight from the shared `VecDeque` below, which
/// preserves whatever order `post` calls arrive in).
///
/// Collapsed to one shared `Mutex<VecDeque<_>>` rather than the teacher's
/// split writer/reader halves (`kernel::queue::{QueueWriter, QueueReader}`)
/// because that split exists in the teacher to support an async `Stream`
/// dequeue; nothing here needs to await a message that hasn't arrived yet.
#[derive(Clone)]
pub struct Mailbox<Msg> {
    inner: Arc<Mutex<VecDeque<Msg>>>,
}

impl<Msg> Default for Mailbox<Msg> {
    fn default() -> Self {
        Mailbox {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl<Msg> Mailbox<Msg> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. Safe to call concurrently from any thread.
    pub fn post(&self, msg: Msg) {
        self.inner.lock().push_back(msg);
    }

    /// Removes and returns the head message, if any.
    pub fn dequeue(&self) -> Option<Msg> {
        self.inner.lock().pop_front()
    }

    /// Non-blocking snapshot of whether any message is pending.
    pub fn has_messages(&self) -> bool {
        !self.inner.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_ordering_within_one_sender() {
        let mbox: Mailbox<u32> = Mailbox::new();
        for i in 1..=5 {
            mbox.post(i);
        }

        let mut drained = Vec::new();
        while let Some(msg) = mbox.dequeue() {
            drained.push(msg);
        }

        assert_eq!(drained, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn has_messages_tracks_queue_state() {
        let mbox: Mailbox<&'static str> = Mailbox::new();
        assert!(!mbox.has_messages());

        mbox.post("hello");
        assert!(mbox.has_messages());

        assert_eq!(mbox.dequeue(), Some("hello"));
        assert!(!mbox.has_messages());
        assert_eq!(mbox.dequeue(), None);
    }

    #[test]
    fn dequeue_on_empty_mailbox_is_none_not_a_panic() {
        let mbox: Mailbox<()> = Mailbox::new();
        assert_eq!(mbox.dequeue(), None);
        assert_eq!(mbox.dequeue(), None);
    }
}
