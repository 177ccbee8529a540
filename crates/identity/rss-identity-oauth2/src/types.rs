//! Identity manager payload types.

use serde::{Deserialize, Deserializer, Serialize};

/// Role label that marks a revenue-sharing administrator.
pub const ADMIN_ROLE: &str = "Provider";

/// Session produced by the authorization-code exchange.
///
/// `email` and `role` are filled in once by
/// [`OAuthClient::authorize_session`](crate::OAuthClient::authorize_session).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSession {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl TokenSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Option<String>,
    pub name: String,
}

impl Role {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Identity and roles returned by the IdM for an access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatedToken {
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<Role>,
}

impl ValidatedToken {
    /// Case-sensitive role lookup.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

/// Client application registered in the IdM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
}

impl ApplicationInfo {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            url: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Role>>::deserialize(deserializer)?.unwrap_or_default())
}
