//! Pair-state bookkeeping for one trial move.

/// A stochastic link formed during cluster growth, keyed by the member
/// that initiated it. `e_old` is the pair energy at link time (pre-move
/// state); `e_new` is filled in once the trial has been applied to both
/// endpoints.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Link {
    pub a: usize,
    pub b: usize,
    pub e_old: f64,
    pub e_new: f64,
}

/// Append-only ledger of the links accepted in the current trial.
/// Scratch storage owned by the engine and cleared between trials.
#[derive(Default)]
pub(crate) struct PairLedger {
    links: Vec<Link>,
}

impl PairLedger {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: Vec::with_capacity(capacity),
        }
    }

    /// Record a formed link. `e_new` starts out as `e_old`; rigid
    /// translations leave it there, rotations overwrite it during the
    /// overlap scan.
    pub fn push(&mut self, a: usize, b: usize, e_old: f64) {
        self.links.push(Link {
            a,
            b,
            e_old,
            e_new: e_old,
        });
    }

    /// Has `a` already initiated a link to `b` this trial? Guards
    /// against duplicate initiation from a contract-violating neighbour
    /// list.
    pub fn initiated(&self, a: usize, b: usize) -> bool {
        self.links.iter().any(|l| l.a == a && l.b == b)
    }

    /// Whether the unordered pair is linked, in either initiation order.
    pub fn contains_pair(&self, i: usize, j: usize) -> bool {
        self.links
            .iter()
            .any(|l| (l.a == i && l.b == j) || (l.a == j && l.b == i))
    }

    pub fn links_mut(&mut self) -> &mut [Link] {
        &mut self.links
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initiation_is_directional() {
        let mut ledger = PairLedger::default();
        ledger.push(3, 7, -1.5);
        assert!(ledger.initiated(3, 7));
        assert!(!ledger.initiated(7, 3));
        assert!(ledger.contains_pair(7, 3));
        assert!(ledger.contains_pair(3, 7));
        assert!(!ledger.contains_pair(3, 4));
    }

    #[test]
    fn clear_empties_the_ledger() {
        let mut ledger = PairLedger::with_capacity(4);
        ledger.push(0, 1, 0.0);
        ledger.clear();
        assert!(!ledger.initiated(0, 1));
        assert!(ledger.links_mut().is_empty());
    }
}
