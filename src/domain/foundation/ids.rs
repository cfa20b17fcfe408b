//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for one analysis event.
    AnalysisId
}

uuid_id! {
    /// Unique identifier for a pattern detection.
    DetectionId
}

uuid_id! {
    /// Unique identifier for a weak signal.
    SignalId
}

uuid_id! {
    /// Unique identifier for an emerging trend.
    TrendId
}

/// Identifier for a workspace, supplied by the upstream workspace registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Creates a workspace id, rejecting empty strings.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("workspace_id"));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for the actor (team or person) an analysis history belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Creates an actor id, rejecting empty strings.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("actor_id"));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_id_new_is_unique() {
        assert_ne!(AnalysisId::new(), AnalysisId::new());
    }

    #[test]
    fn analysis_id_roundtrips_through_string() {
        let id = AnalysisId::new();
        let parsed: AnalysisId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn workspace_id_rejects_empty() {
        assert!(WorkspaceId::new("").is_err());
        assert!(WorkspaceId::new("   ").is_err());
    }

    #[test]
    fn workspace_id_accepts_non_empty() {
        let id = WorkspaceId::new("ws-main").unwrap();
        assert_eq!(id.as_str(), "ws-main");
    }

    #[test]
    fn actor_id_serializes_transparently() {
        let id = ActorId::new("team-7").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"team-7\"");
    }
}
