//! HTTP client for network-based API calls

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::models::{
    Area, AreaCreate, AreaUpdate, Event, EventLayoutUpdate, OccupiedSet, PriceTier, Seat,
    SeatCreate, VenueTable, VenueTableCreate,
};
use shared::response::ApiResponse;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making network requests to the ticketing backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_header() {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)));
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.put(self.url(path)).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.authorized(self.client.delete(self.url(path)));
        Self::handle_response::<ApiResponse<()>>(request.send().await?).await?;
        Ok(())
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    /// Unwrap the envelope, mapping non-success codes to errors
    fn unwrap_data<T>(resp: ApiResponse<T>, what: &str) -> ClientResult<T> {
        if !resp.is_success() {
            return Err(ClientError::Api {
                code: resp.code,
                message: resp.message,
            });
        }
        resp.data
            .ok_or_else(|| ClientError::InvalidResponse(format!("missing {what} data")))
    }

    // ========== Events API ==========

    /// Fetch an event's scalar layout fields
    pub async fn get_event(&self, id: i64) -> ClientResult<Event> {
        let resp: ApiResponse<Event> = self.get(&format!("api/events/{id}")).await?;
        Self::unwrap_data(resp, "event")
    }

    /// Update an event's scalar layout fields in one call
    pub async fn update_event(&self, id: i64, update: &EventLayoutUpdate) -> ClientResult<Event> {
        let resp: ApiResponse<Event> = self.put(&format!("api/events/{id}"), update).await?;
        Self::unwrap_data(resp, "event")
    }

    // ========== Areas API ==========

    pub async fn list_areas(&self, event_id: i64) -> ClientResult<Vec<Area>> {
        let resp: ApiResponse<Vec<Area>> =
            self.get(&format!("api/areas?event_id={event_id}")).await?;
        Self::unwrap_data(resp, "areas")
    }

    pub async fn create_area(&self, payload: &AreaCreate) -> ClientResult<Area> {
        let resp: ApiResponse<Area> = self.post("api/areas", payload).await?;
        Self::unwrap_data(resp, "area")
    }

    pub async fn update_area(&self, id: i64, payload: &AreaUpdate) -> ClientResult<Area> {
        let resp: ApiResponse<Area> = self.put(&format!("api/areas/{id}"), payload).await?;
        Self::unwrap_data(resp, "area")
    }

    pub async fn delete_area(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("api/areas/{id}")).await
    }

    // ========== Tables API ==========

    pub async fn list_tables(&self, event_id: i64) -> ClientResult<Vec<VenueTable>> {
        let resp: ApiResponse<Vec<VenueTable>> =
            self.get(&format!("api/tables?event_id={event_id}")).await?;
        Self::unwrap_data(resp, "tables")
    }

    pub async fn create_table(&self, payload: &VenueTableCreate) -> ClientResult<VenueTable> {
        let resp: ApiResponse<VenueTable> = self.post("api/tables", payload).await?;
        Self::unwrap_data(resp, "table")
    }

    pub async fn delete_table(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("api/tables/{id}")).await
    }

    // ========== Seats API ==========

    pub async fn list_seats(&self, event_id: i64) -> ClientResult<Vec<Seat>> {
        let resp: ApiResponse<Vec<Seat>> =
            self.get(&format!("api/seats?event_id={event_id}")).await?;
        Self::unwrap_data(resp, "seats")
    }

    pub async fn create_seat(&self, payload: &SeatCreate) -> ClientResult<Seat> {
        let resp: ApiResponse<Seat> = self.post("api/seats", payload).await?;
        Self::unwrap_data(resp, "seat")
    }

    pub async fn delete_seat(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("api/seats/{id}")).await
    }

    // ========== Purchases / tiers API ==========

    /// Occupied table and seat IDs for the customer-facing view
    pub async fn occupied(&self, event_id: i64) -> ClientResult<OccupiedSet> {
        let resp: ApiResponse<OccupiedSet> = self
            .get(&format!("api/purchases/occupied/{event_id}"))
            .await?;
        Self::unwrap_data(resp, "occupied set")
    }

    /// Price tiers, referenced by layout elements by ID
    pub async fn list_price_tiers(&self, event_id: i64) -> ClientResult<Vec<PriceTier>> {
        let resp: ApiResponse<Vec<PriceTier>> = self
            .get(&format!("api/price-tiers?event_id={event_id}"))
            .await?;
        Self::unwrap_data(resp, "price tiers")
    }
}
