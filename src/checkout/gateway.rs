//! Payment gateway seam.
//!
//! The storefront has no real gateway; settlement is a fixed-delay
//! simulation that always succeeds. The seam still carries a decline
//! branch so callers are written against the honest shape of a payment,
//! and tests can exercise the path the simulation never takes.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use thiserror::Error;

use super::PaymentMethod;

/// Ways a settlement can fail to produce a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The gateway refused the payment.
    #[error("payment declined: {reason}")]
    Declined {
        /// Gateway-supplied refusal reason.
        reason: String,
    },

    /// The shopper abandoned the settlement before it completed.
    #[error("settlement cancelled before completion")]
    Cancelled,
}

/// Proof of a completed settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    /// Gateway settlement reference.
    pub reference: String,

    /// When the gateway settled the payment.
    pub settled_at: Timestamp,
}

/// A payment processor that can settle a charge.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Settle a charge of `amount` whole currency units.
    async fn settle(
        &self,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<SettlementReceipt, PaymentError>;
}

/// The simulated gateway: resolves after a fixed delay and never declines.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    /// Delay used by [`Default`], matching the storefront's two-second
    /// processing spinner.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Create a gateway that settles after the given delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A gateway with no delay, for tests that don't care about timing.
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn settle(
        &self,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<SettlementReceipt, PaymentError> {
        tokio::time::sleep(self.delay).await;

        let settled_at = Timestamp::now();

        tracing::info!(amount, %method, "simulated settlement complete");

        Ok(SettlementReceipt {
            reference: format!("SIM-{}", settled_at.as_millisecond()),
            settled_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn simulated_gateway_always_settles() -> TestResult {
        let gateway = SimulatedGateway::instant();

        let receipt = gateway.settle(3245, PaymentMethod::Debit).await?;

        assert!(
            receipt.reference.starts_with("SIM-"),
            "reference should carry the simulation prefix"
        );

        Ok(())
    }

    #[tokio::test]
    async fn settlement_waits_for_the_configured_delay() -> TestResult {
        let gateway = SimulatedGateway::new(Duration::from_millis(50));
        let started = std::time::Instant::now();

        gateway.settle(100, PaymentMethod::Netbanking).await?;

        assert!(
            started.elapsed() >= Duration::from_millis(50),
            "settlement should not resolve before its delay"
        );

        Ok(())
    }

    #[tokio::test]
    async fn mocked_gateway_can_decline() {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_settle().returning(|_, _| {
            Err(PaymentError::Declined {
                reason: "insufficient funds".into(),
            })
        });

        let result = gateway.settle(100, PaymentMethod::Credit).await;

        assert!(
            matches!(result, Err(PaymentError::Declined { .. })),
            "expected a decline"
        );
    }
}
