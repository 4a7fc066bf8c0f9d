use crate::zone::ZoneId;

/// One-shot work that fires after a delay in simulated time
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    /// Land the player's queued swing
    ResolveMelee,
    RespawnPlayer,
    RespawnBoss { zone_id: ZoneId },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: f64,
    seq: u64,
    action: DeferredAction,
}

/// Deferred actions ordered by due time, then by scheduling order
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: f64, delay: f64, action: DeferredAction) {
        let entry = Scheduled {
            due: now + delay.max(0.0),
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;

        let at = self
            .queue
            .iter()
            .position(|s| (s.due, s.seq) > (entry.due, entry.seq))
            .unwrap_or(self.queue.len());
        self.queue.insert(at, entry);
    }

    /// Remove and return every action due at or before `now`, in order
    pub fn take_due(&mut self, now: f64) -> Vec<DeferredAction> {
        let split = self
            .queue
            .iter()
            .position(|s| s.due > now)
            .unwrap_or(self.queue.len());
        self.queue.drain(..split).map(|s| s.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_order_then_fifo() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 3.0, DeferredAction::RespawnPlayer);
        s.schedule(0.0, 0.1, DeferredAction::ResolveMelee);
        s.schedule(0.0, 3.0, DeferredAction::RespawnBoss { zone_id: 2 });

        assert!(s.take_due(0.05).is_empty());
        assert_eq!(s.take_due(0.1), vec![DeferredAction::ResolveMelee]);
        assert_eq!(
            s.take_due(10.0),
            vec![DeferredAction::RespawnPlayer, DeferredAction::RespawnBoss { zone_id: 2 }]
        );
        assert!(s.take_due(100.0).is_empty());
    }
}
