use solana_sdk::signature::Signature;
use thiserror::Error;

/// Lifecycle of one mint transaction.
///
/// `Building -> Signed -> Submitted -> {Confirmed | Rejected | TimedOut}`.
/// A rejection can also happen at submission time, straight from `Signed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintState {
    Building,
    Signed,
    Submitted,
    Confirmed,
    Rejected,
    TimedOut,
}

impl MintState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MintState::Confirmed | MintState::Rejected | MintState::TimedOut
        )
    }

    fn can_transition_to(&self, next: MintState) -> bool {
        use MintState::*;
        matches!(
            (self, next),
            (Building, Signed)
                | (Building, Rejected)
                | (Signed, Submitted)
                | (Signed, Rejected)
                | (Submitted, Confirmed)
                | (Submitted, Rejected)
                | (Submitted, TimedOut)
        )
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid mint state transition from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: MintState,
    pub to: MintState,
}

/// Tracks a single attempt. Terminal attempts are never reused; a retry
/// starts a new attempt with a fresh blockhash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintAttempt {
    state: MintState,
    signature: Option<Signature>,
    broadcasts: u32,
}

impl Default for MintAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl MintAttempt {
    pub fn new() -> Self {
        Self {
            state: MintState::Building,
            signature: None,
            broadcasts: 0,
        }
    }

    pub fn state(&self) -> MintState {
        self.state
    }

    pub fn signature(&self) -> Option<Signature> {
        self.signature
    }

    /// Times the signed transaction was sent, rebroadcasts included.
    pub fn broadcasts(&self) -> u32 {
        self.broadcasts
    }

    fn transition(&mut self, next: MintState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn signed(&mut self, signature: Signature) -> Result<(), InvalidTransition> {
        self.transition(MintState::Signed)?;
        self.signature = Some(signature);
        Ok(())
    }

    pub fn submitted(&mut self) -> Result<(), InvalidTransition> {
        self.transition(MintState::Submitted)?;
        self.broadcasts += 1;
        Ok(())
    }

    /// Records a resend of the already submitted transaction.
    pub fn rebroadcast(&mut self) -> Result<(), InvalidTransition> {
        if self.state != MintState::Submitted {
            return Err(InvalidTransition {
                from: self.state,
                to: MintState::Submitted,
            });
        }
        self.broadcasts += 1;
        Ok(())
    }

    pub fn confirmed(&mut self) -> Result<(), InvalidTransition> {
        self.transition(MintState::Confirmed)
    }

    pub fn rejected(&mut self) -> Result<(), InvalidTransition> {
        self.transition(MintState::Rejected)
    }

    pub fn timed_out(&mut self) -> Result<(), InvalidTransition> {
        self.transition(MintState::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut attempt = MintAttempt::new();
        let signature = Signature::new_unique();
        attempt.signed(signature).unwrap();
        attempt.submitted().unwrap();
        attempt.rebroadcast().unwrap();
        attempt.confirmed().unwrap();
        assert_eq!(attempt.state(), MintState::Confirmed);
        assert_eq!(attempt.signature(), Some(signature));
        assert_eq!(attempt.broadcasts(), 2);
        assert!(attempt.state().is_terminal());
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        let mut attempt = MintAttempt::new();
        assert_eq!(
            attempt.submitted(),
            Err(InvalidTransition {
                from: MintState::Building,
                to: MintState::Submitted
            })
        );
        assert!(attempt.rebroadcast().is_err());
        attempt.signed(Signature::new_unique()).unwrap();
        assert!(attempt.signed(Signature::new_unique()).is_err());
        attempt.submitted().unwrap();
        attempt.timed_out().unwrap();
        assert!(attempt.confirmed().is_err());
        assert!(attempt.rejected().is_err());
        assert_eq!(attempt.state(), MintState::TimedOut);
    }

    #[test]
    fn test_rejected_at_submission() {
        let mut attempt = MintAttempt::new();
        attempt.signed(Signature::new_unique()).unwrap();
        attempt.rejected().unwrap();
        assert!(attempt.submitted().is_err());
    }
}
