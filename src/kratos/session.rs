//! Session model returned by the `whoami` endpoint.
//!
//! Only the fields the gates and handlers look at are typed. Everything else the
//! provider sends is kept in the flattened `extra` maps so a session can be
//! handed back to clients unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Authenticator Assurance Level reported for a session or method.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorAssuranceLevel {
    Aal0,
    Aal1,
    Aal2,
    Aal3,
}

// Fields declared `Option<Option<T>>` tell an absent key (`None`) from an
// explicit `null` (`Some(None)`), so both survive re-encoding.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationMethod {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub method: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub aal: Option<Option<AuthenticatorAssuranceLevel>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<Option<String>>,
    /// `Some(Value::Null)` when the provider sent `"traits": null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub traits: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<Option<bool>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub authenticated_at: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub issued_at: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub authenticator_assurance_level: Option<Option<AuthenticatorAssuranceLevel>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub authentication_methods: Option<Option<Vec<AuthenticationMethod>>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub identity: Option<Option<Identity>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref().and_then(Option::as_ref)
    }

    #[must_use]
    pub fn identity_id(&self) -> Option<Uuid> {
        self.identity().map(|identity| identity.id)
    }

    /// Assurance level of the session, `None` when absent or `null`.
    #[must_use]
    pub fn assurance_level(&self) -> Option<AuthenticatorAssuranceLevel> {
        self.authenticator_assurance_level.flatten()
    }
}
