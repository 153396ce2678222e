//! Typed push-channel messages.
//!
//! Frames arrive as `{ "type": ..., "data": ... }`. Parsing happens in two
//! steps so that an unrecognized `type` can be reported as
//! [`PushMessage::Unknown`] instead of a decode error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cost::CostSample;
use super::usage::UsageBreakdown;
use super::view::Slice;
use crate::error::CoreError;

/// Wire tag for cost-series updates.
pub const CLOUD_COSTS_TYPE: &str = "cloud_costs";
/// Wire tag for service-usage updates.
pub const SERVICE_USAGE_TYPE: &str = "service_usage";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// An incremental update delivered by the push channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PushMessage {
    /// Replacement cost series.
    #[serde(rename = "cloud_costs")]
    CloudCosts(Vec<CostSample>),
    /// Replacement service-usage breakdown.
    #[serde(rename = "service_usage")]
    ServiceUsage(UsageBreakdown),
    /// A type this client does not understand. Carries the raw tag.
    #[serde(skip)]
    Unknown(String),
}

impl PushMessage {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the frame is not an envelope
    /// or the payload does not match the slice its `type` names, and
    /// [`CoreError::InvalidData`] for a usage breakdown whose labels and
    /// values differ in length.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        match envelope.kind.as_str() {
            CLOUD_COSTS_TYPE => Ok(Self::CloudCosts(serde_json::from_value(envelope.data)?)),
            SERVICE_USAGE_TYPE => {
                let usage: UsageBreakdown = serde_json::from_value(envelope.data)?;
                usage.validate()?;
                Ok(Self::ServiceUsage(usage))
            }
            _ => Ok(Self::Unknown(envelope.kind)),
        }
    }

    /// The view-model slice this message replaces, if any.
    pub fn target(&self) -> Option<Slice> {
        match self {
            Self::CloudCosts(_) => Some(Slice::CostSeries),
            Self::ServiceUsage(_) => Some(Slice::ServiceUsage),
            Self::Unknown(_) => None,
        }
    }

    /// The wire tag of this message.
    pub fn type_name(&self) -> &str {
        match self {
            Self::CloudCosts(_) => CLOUD_COSTS_TYPE,
            Self::ServiceUsage(_) => SERVICE_USAGE_TYPE,
            Self::Unknown(kind) => kind,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
