use crate::results::DealCandidate;

/// Keeps whichever of `best` and `candidate` has the higher discount.
///
/// Only a strictly greater discount replaces the current best, so among equal
/// discounts the earliest candidate is kept.
pub fn consider(best: Option<DealCandidate>, candidate: DealCandidate) -> Option<DealCandidate> {
    match best {
        Some(current) if candidate.discount <= current.discount => Some(current),
        _ => Some(candidate),
    }
}

/// Running best-discount accumulator for one mission
#[derive(Debug, Default)]
pub struct Ranker {
    best: Option<DealCandidate>,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate; returns true if it took the lead
    pub fn offer(&mut self, candidate: DealCandidate) -> bool {
        let took_lead = self
            .best
            .as_ref()
            .is_none_or(|best| candidate.discount > best.discount);
        self.best = consider(self.best.take(), candidate);
        took_lead
    }

    pub fn best(&self) -> Option<&DealCandidate> {
        self.best.as_ref()
    }

    /// Final best, but only if it actually has a discount
    pub fn into_winner(self) -> Option<DealCandidate> {
        self.best.filter(|best| best.discount > 0)
    }
}
