use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{combat::BodyRegion, types::CharacterId};

/// A classified hit, keyed by the struck character rather than its collider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub character: CharacterId,
    pub region: BodyRegion,
    /// Distance from the struck volume to the shooter (meters).
    pub distance: f32,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    event: HitEvent,
}

/// Delay line for hit events, advanced once per frame.
///
/// Events come out in due order; events due at the same time keep the order
/// they were scheduled in.
#[derive(Clone, Debug, Default)]
pub struct HitQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl HitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, event: HitEvent, delay: Duration) {
        let due = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;

        let at = self
            .pending
            .partition_point(|p| (p.due, p.seq) <= (due, seq));
        self.pending.insert(at, Pending { due, seq, event });
    }

    /// Move the clock forward by `dt` and return every event now due.
    pub fn advance(&mut self, dt: Duration) -> Vec<HitEvent> {
        self.now += dt;
        let ready = self.pending.partition_point(|p| p.due <= self.now);
        self.pending.drain(..ready).map(|p| p.event).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: u32) -> HitEvent {
        HitEvent {
            character: CharacterId(id),
            region: BodyRegion::Torso,
            distance: 1.0,
        }
    }

    #[test]
    fn releases_in_due_order() {
        let mut queue = HitQueue::new();
        queue.schedule(hit(1), Duration::from_millis(30));
        queue.schedule(hit(2), Duration::from_millis(10));
        queue.schedule(hit(3), Duration::from_millis(10));

        assert!(queue.advance(Duration::from_millis(5)).is_empty());
        let out = queue.advance(Duration::from_millis(5));
        assert_eq!(out, vec![hit(2), hit(3)]);
        assert_eq!(queue.len(), 1);

        assert!(queue.advance(Duration::from_millis(19)).is_empty());
        assert_eq!(queue.advance(Duration::from_millis(1)), vec![hit(1)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_delay_is_released_on_next_advance() {
        let mut queue = HitQueue::new();
        queue.advance(Duration::from_millis(100));
        queue.schedule(hit(4), Duration::ZERO);
        assert_eq!(queue.advance(Duration::ZERO), vec![hit(4)]);
    }
}
