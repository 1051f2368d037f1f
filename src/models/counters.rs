use hashbrown::HashMap;
use serde::Serialize;

/// Change to one user's denormalized relationship counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CounterDelta {
    pub outgoing: i64,
    pub incoming: i64,
    pub friends: i64,
}

impl CounterDelta {
    pub fn is_zero(&self) -> bool {
        *self == CounterDelta::default()
    }
}

/// Counter deltas accumulated by one transition, applied with its writes.
#[derive(Debug, Default)]
pub struct CounterLedger {
    deltas: HashMap<String, CounterDelta>,
}

impl CounterLedger {
    fn delta_mut(&mut self, uid: &str) -> &mut CounterDelta {
        self.deltas.entry_ref(uid).or_default()
    }

    pub fn request_opened(&mut self, from_uid: &str, to_uid: &str) {
        self.delta_mut(from_uid).outgoing += 1;
        self.delta_mut(to_uid).incoming += 1;
    }

    pub fn request_closed(&mut self, from_uid: &str, to_uid: &str) {
        self.delta_mut(from_uid).outgoing -= 1;
        self.delta_mut(to_uid).incoming -= 1;
    }

    pub fn friendship_created(&mut self, uid_a: &str, uid_b: &str) {
        self.delta_mut(uid_a).friends += 1;
        self.delta_mut(uid_b).friends += 1;
    }

    pub fn friendship_removed(&mut self, uid_a: &str, uid_b: &str) {
        self.delta_mut(uid_a).friends -= 1;
        self.delta_mut(uid_b).friends -= 1;
    }

    pub fn get(&self, uid: &str) -> CounterDelta {
        self.deltas.get(uid).copied().unwrap_or_default()
    }

    /// Non-zero deltas in uid order.
    pub fn entries(&self) -> Vec<(&str, CounterDelta)> {
        let mut entries: Vec<(&str, CounterDelta)> = self
            .deltas
            .iter()
            .filter(|(_, delta)| !delta.is_zero())
            .map(|(uid, delta)| (uid.as_str(), *delta))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub outgoing_count: i64,
    pub incoming_count: i64,
    pub friends_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_nets_out_pending_counters() {
        let mut ledger = CounterLedger::default();
        ledger.request_closed("alice", "bob");
        ledger.friendship_created("alice", "bob");
        assert_eq!(
            ledger.get("alice"),
            CounterDelta {
                outgoing: -1,
                incoming: 0,
                friends: 1
            }
        );
        assert_eq!(
            ledger.get("bob"),
            CounterDelta {
                outgoing: 0,
                incoming: -1,
                friends: 1
            }
        );
    }

    #[test]
    fn cancelling_deltas_are_skipped() {
        let mut ledger = CounterLedger::default();
        ledger.request_opened("alice", "bob");
        ledger.request_closed("alice", "bob");
        assert!(ledger.entries().is_empty());
    }
}
