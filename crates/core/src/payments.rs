//! Payment state machine

use std::fmt;

use thiserror::Error;

/// Illegal payment state transition.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot move payment from {from} to {to}")]
pub struct PaymentTransitionError {
    /// State the payment was in
    pub from: &'static str,

    /// State that was requested
    pub to: &'static str,
}

/// Lifecycle of one payment attempt.
///
/// `Idle → Initializing → AwaitingGatewayRedirect → Verifying → Succeeded | Failed`.
/// A failed attempt may be verified again; a succeeded one is final.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaymentState {
    /// Nothing has happened yet
    #[default]
    Idle,

    /// Initialization request sent to the gateway
    Initializing,

    /// Customer is completing payment on the gateway's page
    AwaitingGatewayRedirect {
        /// Gateway hosted payment page
        authorization_url: String,
    },

    /// Verification request sent to the gateway
    Verifying,

    /// Gateway confirmed the payment
    Succeeded,

    /// Initialization or verification failed
    Failed {
        /// Failure reason shown to the customer
        reason: String,
    },
}

impl PaymentState {
    /// State name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::AwaitingGatewayRedirect { .. } => "awaiting_gateway_redirect",
            Self::Verifying => "verifying",
            Self::Succeeded => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }

    /// Whether the payment succeeded.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// `Idle → Initializing`
    ///
    /// # Errors
    ///
    /// Returns an error from any other state.
    pub fn begin_initialize(&self) -> Result<Self, PaymentTransitionError> {
        match self {
            Self::Idle => Ok(Self::Initializing),
            other => Err(other.illegal("initializing")),
        }
    }

    /// `Initializing → AwaitingGatewayRedirect`
    ///
    /// # Errors
    ///
    /// Returns an error from any other state.
    pub fn await_redirect(
        &self,
        authorization_url: impl Into<String>,
    ) -> Result<Self, PaymentTransitionError> {
        match self {
            Self::Initializing => Ok(Self::AwaitingGatewayRedirect {
                authorization_url: authorization_url.into(),
            }),
            other => Err(other.illegal("awaiting_gateway_redirect")),
        }
    }

    /// `AwaitingGatewayRedirect | Failed → Verifying`
    ///
    /// `Idle` is accepted too: the customer may return with a reference this
    /// process never initialized.
    ///
    /// # Errors
    ///
    /// Returns an error from `Initializing`, `Verifying` or `Succeeded`.
    pub fn begin_verify(&self) -> Result<Self, PaymentTransitionError> {
        match self {
            Self::Idle | Self::AwaitingGatewayRedirect { .. } | Self::Failed { .. } => {
                Ok(Self::Verifying)
            }
            other => Err(other.illegal("verifying")),
        }
    }

    /// `Verifying → Succeeded`
    ///
    /// # Errors
    ///
    /// Returns an error from any other state.
    pub fn succeed(&self) -> Result<Self, PaymentTransitionError> {
        match self {
            Self::Verifying => Ok(Self::Succeeded),
            other => Err(other.illegal("succeeded")),
        }
    }

    /// `Initializing | Verifying → Failed`
    ///
    /// # Errors
    ///
    /// Returns an error from any other state.
    pub fn fail(&self, reason: impl Into<String>) -> Result<Self, PaymentTransitionError> {
        match self {
            Self::Initializing | Self::Verifying => Ok(Self::Failed {
                reason: reason.into(),
            }),
            other => Err(other.illegal("failed")),
        }
    }

    fn illegal(&self, to: &'static str) -> PaymentTransitionError {
        PaymentTransitionError {
            from: self.name(),
            to,
        }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn happy_path_reaches_succeeded() -> TestResult {
        let state = PaymentState::Idle
            .begin_initialize()?
            .await_redirect("https://checkout.example.com/abc")?
            .begin_verify()?
            .succeed()?;

        assert!(state.is_succeeded());

        Ok(())
    }

    #[test]
    fn failed_verification_can_be_retried() -> TestResult {
        let state = PaymentState::Verifying.fail("declined")?;

        assert_eq!(state.begin_verify()?, PaymentState::Verifying);

        Ok(())
    }

    #[test]
    fn succeeded_is_final() {
        let state = PaymentState::Succeeded;

        assert_eq!(
            state.begin_verify(),
            Err(PaymentTransitionError {
                from: "succeeded",
                to: "verifying",
            })
        );
        assert!(state.fail("late").is_err(), "succeeded payments cannot fail");
    }

    #[test]
    fn cannot_succeed_without_verifying() {
        let result = PaymentState::Initializing.succeed();

        assert_eq!(
            result,
            Err(PaymentTransitionError {
                from: "initializing",
                to: "succeeded",
            })
        );
    }

    #[test]
    fn cannot_initialize_twice() {
        assert!(PaymentState::Initializing.begin_initialize().is_err());
    }
}
