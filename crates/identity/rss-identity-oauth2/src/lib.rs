//! OAuth2 client for the revenue-sharing settlement system.
//!
//! Authenticates users against an external Identity Manager (IdM) with the
//! Authorization Code flow, validates access tokens, reads the user's roles
//! and checks that the calling client application is registered.
//!
//! All clients share one [`IdmHttpClient`], built at startup and shut down
//! explicitly at teardown.

mod client;
mod config;
mod error;
mod http;
mod types;


pub use client::{AUTHORIZATION_STATE, OAuthClient};
pub use config::{HttpClientConfig, OAuthConfig};
pub use error::{OAuth2Error, OAuth2Result};
pub use http::IdmHttpClient;
pub use types::{ADMIN_ROLE, ApplicationInfo, Role, TokenSession, ValidatedToken};
