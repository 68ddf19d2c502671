//! Bounded blocking channel.
//!
//! A multi-sender FIFO built on `std::sync` and `heapless::Deque`. Senders
//! block while the queue is full, so a saturated queue applies backpressure
//! instead of dropping values. Receiving never blocks.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use heapless::Deque;

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, thread-safe channel.
///
/// The queue lives in a fixed-size `heapless::Deque`, so the capacity is
/// part of the type and never reallocates.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<Deque<T, SIZE>>,
    not_full: Condvar,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Deque::new()),
            not_full: Condvar::new(),
        }
    }

    /// Get a sender handle for this channel.
    ///
    /// Multiple senders can coexist; they share access to the same queue.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    /// Get a receiver handle for this channel.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Send a value, blocking while the channel is full.
    pub fn send(&self, value: T) {
        let mut queue = self.lock();
        let mut pending = value;
        loop {
            match queue.push_back(pending) {
                Ok(()) => return,
                Err(rejected) => {
                    pending = rejected;
                    queue = self
                        .not_full
                        .wait(queue)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    /// Try to send a value into the channel.
    ///
    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.lock().push_back(value).map_err(TrySendError)
    }

    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        let value = self.lock().pop_front().ok_or(TryReceiveError)?;
        self.not_full.notify_one();
        Ok(value)
    }

    /// Number of queued values
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub const fn capacity(&self) -> usize {
        SIZE
    }

    fn lock(&self) -> MutexGuard<'_, Deque<T, SIZE>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`Channel`].
///
/// This is a lightweight reference that can be copied into every producer.
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Clone for Sender<'_, T, SIZE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const SIZE: usize> Copy for Sender<'_, T, SIZE> {}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Send a value, blocking while the channel is full.
    pub fn send(&self, value: T) {
        self.channel.send(value);
    }

    /// Try to send a value into the channel.
    ///
    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }
}

/// A receiver handle for a [`Channel`].
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
