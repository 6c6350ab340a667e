use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::draft::ListingDraft;
use super::validation::{missing_fields, MissingFields};

/// Identifier handed back by the submission backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub listing_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("listing rejected: {0}")]
    Rejected(String),
    #[error("submission backend unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook receiving drafts that passed validation.
pub trait SubmissionGateway: Send + Sync {
    fn submit_listing(&self, draft: &ListingDraft) -> Result<SubmissionReceipt, SubmissionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishAcknowledgement {
    pub listing_id: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    MissingFields(#[from] MissingFields),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Gates submission on the completeness check.
pub struct ListingPublisher<G: ?Sized> {
    gateway: Arc<G>,
}

impl<G> Clone for ListingPublisher<G>
where
    G: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G> ListingPublisher<G>
where
    G: SubmissionGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub fn publish(&self, draft: &ListingDraft) -> Result<PublishAcknowledgement, PublishError> {
        let missing = missing_fields(draft);
        if !missing.is_empty() {
            let missing = MissingFields(missing);
            tracing::warn!(missing = %missing, "publish blocked by incomplete draft");
            return Err(missing.into());
        }

        let receipt = self.gateway.submit_listing(draft)?;
        tracing::info!(listing_id = %receipt.listing_id, "listing published");

        Ok(PublishAcknowledgement {
            listing_id: receipt.listing_id,
            message: "Your listing has been published.".to_string(),
        })
    }
}
