//! Apply-now, commit-later state with exact rollback.
//!
//! An [`Optimistic`] cell holds the locally displayed state of one item-action
//! pair. [`Optimistic::apply`] swaps in the next state immediately and hands back
//! a [`Ticket`] holding the literal prior snapshot and a sequence number. When the
//! commit resolves, [`Optimistic::settle`] either reconciles, restores the
//! snapshot, or drops the reply because a newer action has been applied since.

/// Receipt for one optimistic step.
#[derive(Debug, Clone)]
pub struct Ticket<S> {
    seq: u64,
    prior: S,
}

impl<S> Ticket<S> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn prior(&self) -> &S {
        &self.prior
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<E> {
    /// The commit succeeded and the reply was reconciled into the state.
    Confirmed,
    /// The commit failed and the prior snapshot was restored.
    RolledBack(E),
    /// A newer action owns the state; the reply was ignored.
    Stale,
}

impl<E> Settlement<E> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Settlement::Confirmed)
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Settlement::RolledBack(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Optimistic<S> {
    state: S,
    seq: u64,
}

impl<S: Clone> Optimistic<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            seq: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Sequence number of the most recent optimistic step.
    pub fn latest(&self) -> u64 {
        self.seq
    }

    pub fn has_newer_than(&self, ticket: &Ticket<S>) -> bool {
        self.seq != ticket.seq
    }

    /// Replaces the state with authoritative data (fresh server payload) and
    /// invalidates every outstanding ticket.
    pub fn reseed(&mut self, state: S) {
        self.state = state;
        self.seq = self.seq.wrapping_add(1);
    }

    pub fn apply<F>(&mut self, next: F) -> Ticket<S>
    where
        F: FnOnce(&S) -> S,
    {
        let prior = self.state.clone();
        self.state = next(&prior);
        self.seq = self.seq.wrapping_add(1);
        Ticket {
            seq: self.seq,
            prior,
        }
    }

    pub fn settle<R, E, F>(
        &mut self,
        ticket: Ticket<S>,
        outcome: Result<R, E>,
        reconcile: F,
    ) -> Settlement<E>
    where
        F: FnOnce(&mut S, R),
    {
        if self.has_newer_than(&ticket) {
            return Settlement::Stale;
        }
        match outcome {
            Ok(reply) => {
                reconcile(&mut self.state, reply);
                Settlement::Confirmed
            }
            Err(err) => {
                self.state = ticket.prior;
                Settlement::RolledBack(err)
            }
        }
    }

    /// Applies, commits and settles in one go.
    pub fn perform<R, E, N, C, F>(&mut self, next: N, commit: C, reconcile: F) -> Settlement<E>
    where
        N: FnOnce(&S) -> S,
        C: FnOnce() -> Result<R, E>,
        F: FnOnce(&mut S, R),
    {
        let ticket = self.apply(next);
        let outcome = commit();
        self.settle(ticket, outcome, reconcile)
    }
}
