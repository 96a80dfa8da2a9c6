//! Uploader gateway — mock authentication gateway for the uploaders API.
//!
//! Swaps uploader slugs for bearer tokens minted by an external authority,
//! gates protected routes on those tokens, and serves the default-uploader
//! flag and configuration intake.

pub mod api;
pub mod authority;
pub mod cli;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod store;

use authority::AuthorityClient;
use store::session::SessionStore;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub sessions: SessionStore,
    pub authority: AuthorityClient,
}

impl AppState {
    pub fn new(config: config::Config) -> anyhow::Result<Self> {
        let authority = AuthorityClient::new(&config.authority_url, config.authority_timeout)?;
        Ok(Self {
            sessions: SessionStore::new(),
            authority,
        })
    }
}
