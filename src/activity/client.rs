//! HTTP client fetching activity records from a fitmap server.

use super::Activity;
use crate::error::FetchError;
use log::{debug, error};
use reqwest::{Client, StatusCode};

/// A source of activity records, keyed by identifier.
#[allow(async_fn_in_trait)]
pub trait FetchActivities {
    /// Fetches and validates the activity with the given identifier.
    async fn fetch(&self, id: &str) -> Result<Activity, FetchError>;
}

/// Client fetching activities over HTTP.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Creates a client for the server at the given base URL.
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Fetches the list of available activity identifiers.
    pub async fn list(&self) -> Result<Vec<String>, FetchError> {
        debug!("Query activity list");
        let response = self
            .client
            .get(format!("{}/activities", self.base_url))
            .send()
            .await?;

        let response = Self::check_response_status(response)?;
        Ok(response.json().await?)
    }

    /// Checks that a response contains an OK status code.
    fn check_response_status(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status_code = response.status();
        if status_code != StatusCode::OK {
            error!("Server replied with status code {status_code}");
            Err(FetchError::Status(status_code))
        } else {
            Ok(response)
        }
    }
}

impl FetchActivities for HttpClient {
    async fn fetch(&self, id: &str) -> Result<Activity, FetchError> {
        debug!("Query activity {id}");
        let response = self
            .client
            .get(format!("{}/activity", self.base_url))
            .query(&[("fit", id)])
            .send()
            .await?;

        let response = Self::check_response_status(response)?;

        let body = response.bytes().await?;
        let activity = Activity::from_json(&body)?;
        debug!("Fetched activity {id} with {} points", activity.coords.len());
        Ok(activity)
    }
}
