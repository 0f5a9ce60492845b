//! Typed wrappers for the API actions the reboot tooling uses.
//!
//! The responses stay untyped [`Value`]s; the API's schema is not enforced here.

use chrono::{DateTime, Utc};
use landscape_auth::ParameterSet;
use landscape_auth::canonical::format_timestamp;
use serde_json::Value;

use crate::client::LandscapeClient;
use crate::error::ClientResult;

/// Action listing computers.
pub const GET_COMPUTERS: &str = "GetComputers";

/// Action scheduling a reboot.
pub const REBOOT_COMPUTERS: &str = "RebootComputers";

/// Parameters for `GetComputers`, with an optional search query.
#[must_use]
pub fn get_computers_params(query: Option<&str>) -> ParameterSet {
    let mut params = ParameterSet::new();
    if let Some(query) = query {
        params.insert("query", query);
    }
    params
}

/// Parameters for `RebootComputers`.
#[must_use]
pub fn reboot_computers_params(
    computer_ids: &[String],
    deliver_after: DateTime<Utc>,
) -> ParameterSet {
    ParameterSet::new()
        .with("computer_ids", computer_ids.to_vec())
        .with("deliver_after", format_timestamp(deliver_after))
}

impl LandscapeClient {
    /// List computers, optionally filtered by a search query such as
    /// `needs:reboot`.
    ///
    /// # Errors
    ///
    /// See [`LandscapeClient::call`].
    pub async fn get_computers(&self, query: Option<&str>) -> ClientResult<Value> {
        self.call(GET_COMPUTERS, &get_computers_params(query)).await
    }

    /// Schedule a reboot of the given computers once `deliver_after` has passed.
    ///
    /// # Errors
    ///
    /// See [`LandscapeClient::call`].
    pub async fn reboot_computers(
        &self,
        computer_ids: &[String],
        deliver_after: DateTime<Utc>,
    ) -> ClientResult<Value> {
        self.call(
            REBOOT_COMPUTERS,
            &reboot_computers_params(computer_ids, deliver_after),
        )
        .await
    }
}
