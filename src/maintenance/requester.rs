//! HTTP client for the maintenance service API.
//!
//! This module provides the [`MaintenanceRequester`] struct for making HTTP
//! requests to the maintenance service, behind the [`RecordSource`] and
//! [`AppDirectory`] traits so collaborators can be mocked in tests.

use log::{debug, info};
use mockall::automock;
use reqwest::Client;

use crate::maintenance::SourceError;
use crate::maintenance::response_structs::{AppIdResponse, WindowRecord};

/// HTTP client for requesting data from the maintenance service.
///
/// # Examples
///
/// ```no_run
/// let requester = MaintenanceRequester::new("http://your_service_url", "your_api_key");
/// let windows = requester.fetch_active_windows("Sales").await.unwrap();
/// println!("Windows: {:?}", windows);
/// ```
pub struct MaintenanceRequester {
    /// Maintenance service api key
    ///
    /// Sent as a query parameter on every request
    api_key: String,
    /// Maintenance service base url
    url: String,
    /// HTTP client
    client: Client,
}

/// Trait for fetching maintenance window records.
///
/// This trait abstracts the record source for easier testing with mocks.
#[automock]
pub trait RecordSource {
    /// Fetches the maintenance window records for an application context.
    fn fetch_active_windows(
        &self,
        app_context: &str,
    ) -> impl std::future::Future<Output = Result<Vec<WindowRecord>, SourceError>> + Send;
}

/// Trait for resolving symbolic application names to navigable identifiers.
///
/// Absence of an id is not an error, it just disables navigation.
#[automock]
pub trait AppDirectory {
    /// Resolves an application developer name to its navigable id.
    async fn resolve_app_id(&self, developer_name: &str) -> Result<Option<String>, SourceError>;
}

impl MaintenanceRequester {
    /// Create a new [MaintenanceRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the maintenance service.
    /// * `api_key` - The api key used to authenticate requests.
    pub fn new(url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::new();
        MaintenanceRequester {
            api_key: api_key.to_string(),
            url: url.to_string(),
            client,
        }
    }
}

impl RecordSource for MaintenanceRequester {
    /// Request `/api/maintenance/windows` to get the window records for a context.
    ///
    /// This api call returns a json array of window records:
    /// ```
    /// [
    ///   { id: "a01", subject: "Database upgrade", startDateTime: "...", endDateTime: "...",
    ///     dismissible: false, applicableScope: "System", alertFrequency: "Daily" }
    /// ]
    /// ```
    /// This method transforms this json into a [`WindowRecord`] vector.
    async fn fetch_active_windows(
        &self,
        app_context: &str,
    ) -> Result<Vec<WindowRecord>, SourceError> {
        let url = format!("{}/api/maintenance/windows", &self.url);
        info!("request maintenance windows for context {}", app_context);
        debug!("request {}?context={}", &url, app_context);

        let response = self
            .client
            .get(&url)
            .query(&[("context", app_context), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(SourceError::Permission(status));
        }

        let records: Vec<WindowRecord> = response.json().await?;

        debug!("response from {} -> {:?}", &url, &records);

        Ok(records)
    }
}

impl AppDirectory for MaintenanceRequester {
    /// Request `/api/apps/id?developerName={name}` to resolve a navigable app id.
    ///
    /// This api call returns a json object with an optional identifier:
    /// ```
    /// { appId: "06m000000000001" }
    /// ```
    /// An unknown name yields `{ appId: null }`, transformed into `None`.
    async fn resolve_app_id(&self, developer_name: &str) -> Result<Option<String>, SourceError> {
        let url = format!("{}/api/apps/id", &self.url);
        info!("request app id for {}", developer_name);
        debug!("request {}?developerName={}", &url, developer_name);

        let response: AppIdResponse = self
            .client
            .get(&url)
            .query(&[
                ("developerName", developer_name),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        debug!("response from {} -> {:?}", &url, &response);

        Ok(response.app_id)
    }
}
