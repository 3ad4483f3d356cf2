//! Outbound notifier for the ride platform.
//!
//! After a wallet payment with an external transaction id is posted or
//! declined locally, the platform is told about it. The call happens after
//! the local commit and is fire-and-forget: failures are logged, never
//! propagated, and never roll back local document state.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::PlatformConfig;

/// Platform notifier errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to reach the platform.
    #[error("Failed to reach platform: {0}")]
    Transport(String),
    /// The platform rejected the update.
    #[error("Platform rejected status update: {0}")]
    Rejected(String),
}

/// Outcome reported for a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionOutcome {
    /// The backing payment was posted.
    Confirm,
    /// The backing payment was declined.
    Decline,
}

/// Payload for the platform's change-transaction-status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionStatusUpdate {
    /// External transaction id the platform issued.
    pub transaction_id: String,
    /// Confirm or decline.
    pub status: TransactionOutcome,
    /// Bank used for the transaction, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    /// Customer bank account number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// Reason given when declining.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decline_reason: Option<String>,
}

/// Notifier for the ride platform's transaction-status endpoint.
#[derive(Clone)]
pub struct PlatformNotifier {
    config: PlatformConfig,
    client: reqwest::Client,
}

impl PlatformNotifier {
    /// Creates a new platform notifier.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed (invalid TLS setup).
    #[must_use]
    pub fn new(config: PlatformConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/api/change-transaction-status",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Sends a status update to the platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the platform rejects it.
    /// Callers in the ledger path must treat this as best-effort.
    pub async fn send_status_update(
        &self,
        update: &TransactionStatusUpdate,
    ) -> Result<(), PlatformError> {
        let mut request = self.client.post(self.endpoint()).json(update);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        if response.status().is_success() {
            info!(
                transaction_id = %update.transaction_id,
                status = ?update.status,
                "Platform transaction status synced"
            );
            Ok(())
        } else {
            Err(PlatformError::Rejected(format!(
                "HTTP {}",
                response.status()
            )))
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> PlatformConfig {
        PlatformConfig {
            base_url: base_url.to_string(),
            token: None,
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let notifier = PlatformNotifier::new(test_config("https://platform.example/"));
        assert_eq!(
            notifier.endpoint(),
            "https://platform.example/api/change-transaction-status"
        );
    }

    #[test]
    fn test_update_serialization_skips_empty_fields() {
        let update = TransactionStatusUpdate {
            transaction_id: "TX-1".to_string(),
            status: TransactionOutcome::Confirm,
            bank: None,
            account_number: None,
            decline_reason: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"transaction_id": "TX-1", "status": "confirm"})
        );
    }

    #[test]
    fn test_decline_carries_reason() {
        let update = TransactionStatusUpdate {
            transaction_id: "TX-2".to_string(),
            status: TransactionOutcome::Decline,
            bank: Some("ACME Bank".to_string()),
            account_number: None,
            decline_reason: Some("Transaction cancelled".to_string()),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["status"], "decline");
        assert_eq!(json["decline_reason"], "Transaction cancelled");
        assert_eq!(json["bank"], "ACME Bank");
    }
}
