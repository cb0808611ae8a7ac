//! HTTP API client for the Keikichi backend.
//!
//! Every request carries the session's bearer token. A 401 triggers a single
//! refresh through `/auth/refresh` followed by a single retry; if the refresh
//! fails the session is cleared and [`ApiError::Unauthorized`] is returned.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use keikichi_shared::auth::Session;
use keikichi_shared::catalog::{CatalogProduct, CatalogUnit, LabelPrice, WizardCatalog};
use keikichi_shared::{
    AdminReservationCreate, ApiError, AuditHistory, ConfirmPaymentRequest, ConfirmPaymentResponse,
    DashboardStats, ForgotPasswordRequest, HoldSpacesRequest, HoldSpacesResponse, LoginRequest,
    MessageResponse, Notification, PaginatedReservations, PaymentProofUploadResponse,
    RefreshRequest, RegisterRequest, Reservation, ReservationCreate, ReservationFilters,
    ReservationUpdate, SpaceStatus, TokenResponse, Trip, TripCreate, TripSpacesResponse,
    TripStatus, TripUpdate, UploadedDocument, User,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Where the client reads and refreshes its tokens.
pub trait TokenStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn store_tokens(&self, access: String, refresh: Option<String>);
    /// Drop the whole session (tokens and user).
    fn clear(&self);
}

/// Session kept in memory only. Used before the app context exists and in tests.
#[derive(Clone, Default)]
pub struct MemoryTokens(Rc<RefCell<Session>>);

impl MemoryTokens {
    pub fn new(session: Session) -> Self {
        Self(Rc::new(RefCell::new(session)))
    }

    pub fn session(&self) -> Session {
        self.0.borrow().clone()
    }
}

impl TokenStore for MemoryTokens {
    fn access_token(&self) -> Option<String> {
        self.0.borrow().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.0.borrow().refresh_token.clone()
    }

    fn store_tokens(&self, access: String, refresh: Option<String>) {
        self.0.borrow_mut().set_tokens(access, refresh);
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A file picked by the user, ready to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    fn part(&self) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        match self.mime.as_deref() {
            Some(mime) => part
                .mime_str(mime)
                .map_err(|e| ApiError::Network(format!("invalid mime type: {e}"))),
            None => Ok(part),
        }
    }
}

/// A downloaded file (ticket or summary PDF).
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Paths that must never trigger a refresh attempt.
const NO_REFRESH_PATHS: [&str; 3] = ["auth/login", "auth/register", "auth/refresh"];

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Option<Rc<dyn TokenStore>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.tokens.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: String::new(),
            tokens: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_tokens(mut self, tokens: impl TokenStore + 'static) -> Self {
        self.tokens = Some(Rc::new(tokens));
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn access_token(&self) -> Option<String> {
        self.tokens.as_ref().and_then(|t| t.access_token())
    }

    async fn send_once<F>(&self, url: &str, build: &F, token: Option<&str>) -> Result<Response, ApiError>
    where
        F: Fn(&Client, &str) -> Result<RequestBuilder, ApiError>,
    {
        let mut rb = build(&self.client, url)?;
        if let Some(token) = token {
            rb = rb.bearer_auth(token);
        }
        rb.send().await.map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Send a request, refreshing the access token once on 401.
    async fn execute<F>(&self, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client, &str) -> Result<RequestBuilder, ApiError>,
    {
        let url = self.url(path);
        let resp = self.send_once(&url, &build, self.access_token().as_deref()).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        let trimmed = path.trim_start_matches('/');
        if NO_REFRESH_PATHS.iter().any(|p| trimmed.starts_with(p)) {
            return Ok(resp);
        }
        let Some(tokens) = self.tokens.clone() else {
            return Ok(resp);
        };
        let Some(refresh_token) = tokens.refresh_token() else {
            return Ok(resp);
        };

        crate::log_debug!("401 on {}, refreshing access token", trimmed);
        let access = self.renew(tokens.as_ref(), &refresh_token).await?;
        self.send_once(&url, &build, Some(&access)).await
    }

    /// Exchange the stored refresh token for a new access token without
    /// waiting for a 401. Used when the stored access token is already past
    /// its expiry.
    pub async fn refresh_session(&self) -> Result<(), ApiError> {
        let Some(tokens) = self.tokens.clone() else {
            return Err(ApiError::Unauthorized);
        };
        let Some(refresh_token) = tokens.refresh_token() else {
            return Err(ApiError::Unauthorized);
        };
        self.renew(tokens.as_ref(), &refresh_token).await.map(|_| ())
    }

    /// Refresh and store the tokens, returning the new access token. A failed
    /// refresh clears the session.
    async fn renew(&self, tokens: &dyn TokenStore, refresh_token: &str) -> Result<String, ApiError> {
        match self.refresh(refresh_token).await {
            Ok(token) => {
                tokens.store_tokens(token.access_token.clone(), token.refresh_token);
                Ok(token.access_token)
            }
            Err(e) => {
                crate::log_warn!("Token refresh failed, clearing session: {}", e);
                tokens.clear();
                Err(ApiError::Unauthorized)
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let body = RefreshRequest {
            access_token: refresh_token.to_string(),
        };
        let resp = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.get(url))).await?;
        read_json(resp).await
    }

    pub async fn get_json_query<TRes: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<TRes, ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.get(url).query(query))).await?;
        read_json(resp).await
    }

    pub async fn post_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.post(url).json(body))).await?;
        read_json(resp).await
    }

    /// POST without a body.
    pub async fn post_empty<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.post(url))).await?;
        read_json(resp).await
    }

    /// PUT without a body.
    pub async fn put_empty<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.put(url))).await?;
        read_json(resp).await
    }

    pub async fn patch_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.patch(url).json(body))).await?;
        read_json(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.delete(url))).await?;
        read_success(resp).await.map(|_| ())
    }

    /// POST a multipart form of text `fields` and named `files`.
    pub async fn post_multipart<TRes: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, String)],
        files: &[(&str, &Upload)],
    ) -> Result<TRes, ApiError> {
        let resp = self
            .execute(path, |c, url| {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name.to_string(), value.clone());
                }
                for (name, upload) in files {
                    form = form.part(name.to_string(), upload.part()?);
                }
                Ok(c.post(url).multipart(form))
            })
            .await?;
        read_json(resp).await
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Download, ApiError> {
        let resp = self.execute(path, |c, url| Ok(c.get(url))).await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        let header = |name: reqwest::header::HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let file_name = header(reqwest::header::CONTENT_DISPOSITION)
            .as_deref()
            .and_then(attachment_file_name);
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;
        Ok(Download {
            bytes: bytes.to_vec(),
            file_name,
            content_type,
        })
    }

    // --- Auth ---

    pub async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.post_json("/auth/login", req).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<User, ApiError> {
        self.post_json("/auth/register", req).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_empty::<serde_json::Value>("/auth/logout").await.map(|_| ())
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/auth/me").await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let req = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.post_json("/auth/forgot-password", &req).await
    }

    // --- Trips and spaces ---

    pub async fn trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.get_json("/trips").await
    }

    pub async fn trip(&self, trip_id: &str) -> Result<Trip, ApiError> {
        self.get_json(&format!("/trips/{trip_id}")).await
    }

    pub async fn create_trip(&self, req: &TripCreate) -> Result<Trip, ApiError> {
        self.post_json("/trips", req).await
    }

    pub async fn update_trip(&self, trip_id: &str, req: &TripUpdate) -> Result<Trip, ApiError> {
        self.patch_json(&format!("/trips/{trip_id}"), req).await
    }

    pub async fn set_trip_status(&self, trip_id: &str, status: TripStatus) -> Result<Trip, ApiError> {
        let resp = self
            .execute(&format!("/trips/{trip_id}/status"), |c, url| {
                Ok(c.patch(url).query(&[("status", status.as_str())]))
            })
            .await?;
        read_json(resp).await
    }

    pub async fn delete_trip(&self, trip_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/trips/{trip_id}")).await
    }

    pub async fn trip_spaces(&self, trip_id: &str) -> Result<TripSpacesResponse, ApiError> {
        self.get_json(&format!("/spaces/trip/{trip_id}")).await
    }

    pub async fn set_space_status(&self, space_id: &str, status: SpaceStatus) -> Result<(), ApiError> {
        let resp = self
            .execute(&format!("/spaces/{space_id}/status"), |c, url| {
                Ok(c.put(url).query(&[("status", status.as_str())]))
            })
            .await?;
        read_success(resp).await.map(|_| ())
    }

    // --- Reservations ---

    pub async fn hold_spaces(&self, req: &HoldSpacesRequest) -> Result<HoldSpacesResponse, ApiError> {
        self.post_json("/reservations/hold", req).await
    }

    pub async fn create_reservation(&self, req: &ReservationCreate) -> Result<Reservation, ApiError> {
        self.post_json("/reservations", req).await
    }

    pub async fn create_admin_reservation(
        &self,
        req: &AdminReservationCreate,
    ) -> Result<Reservation, ApiError> {
        self.post_json("/reservations/admin", req).await
    }

    pub async fn reservations(
        &self,
        page: u32,
        page_size: u32,
        filters: &ReservationFilters,
    ) -> Result<PaginatedReservations, ApiError> {
        let mut query = vec![("page", page.to_string()), ("page_size", page_size.to_string())];
        query.extend(filters.query_pairs());
        self.get_json_query("/reservations", &query).await
    }

    pub async fn reservation(&self, reservation_id: &str) -> Result<Reservation, ApiError> {
        self.get_json(&format!("/reservations/{reservation_id}")).await
    }

    pub async fn update_reservation(
        &self,
        reservation_id: &str,
        req: &ReservationUpdate,
    ) -> Result<Reservation, ApiError> {
        self.patch_json(&format!("/reservations/{reservation_id}"), req).await
    }

    pub async fn cancel_reservation(&self, reservation_id: &str) -> Result<(), ApiError> {
        self.post_empty::<serde_json::Value>(&format!("/reservations/{reservation_id}/cancel"))
            .await
            .map(|_| ())
    }

    pub async fn delete_reservation(&self, reservation_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/reservations/{reservation_id}")).await
    }

    pub async fn upload_payment_proof(
        &self,
        reservation_id: &str,
        file: &Upload,
    ) -> Result<PaymentProofUploadResponse, ApiError> {
        self.post_multipart(
            &format!("/reservations/{reservation_id}/payment-proof"),
            &[],
            &[("file", file)],
        )
        .await
    }

    pub async fn confirm_payment(
        &self,
        reservation_id: &str,
        req: &ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse, ApiError> {
        self.post_json(&format!("/reservations/{reservation_id}/confirm-payment"), req)
            .await
    }

    pub async fn audit_history(&self, reservation_id: &str) -> Result<AuditHistory, ApiError> {
        self.get_json(&format!("/reservations/{reservation_id}/audit-history"))
            .await
    }

    pub async fn ticket_pdf(&self, reservation_id: &str) -> Result<Download, ApiError> {
        self.get_bytes(&format!("/reservations/{reservation_id}/ticket")).await
    }

    pub async fn summary_pdf(&self, reservation_id: &str) -> Result<Download, ApiError> {
        self.get_bytes(&format!("/reservations/{reservation_id}/summary-pdf"))
            .await
    }

    // --- Documents ---

    pub async fn upload_document(
        &self,
        file: &Upload,
        document_type: &str,
    ) -> Result<UploadedDocument, ApiError> {
        self.post_multipart(
            "/documents/upload",
            &[("document_type", document_type.to_string())],
            &[("file", file)],
        )
        .await
    }

    // --- Catalog ---

    pub async fn catalog_products(&self) -> Result<Vec<CatalogProduct>, ApiError> {
        self.get_json("/catalog/products").await
    }

    pub async fn catalog_units(&self) -> Result<Vec<CatalogUnit>, ApiError> {
        self.get_json("/catalog/units").await
    }

    /// Packaging names the signed-in user has shipped with before.
    pub async fn packaging_history(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/users/me/packaging-history").await
    }

    pub async fn label_prices(&self) -> Result<Vec<LabelPrice>, ApiError> {
        self.get_json("/label-prices/").await
    }

    /// Everything the wizard's items step suggests. Packaging history is
    /// optional; a failure there only loses the user's own entries.
    pub async fn wizard_catalog(&self) -> Result<WizardCatalog, ApiError> {
        let products = self.catalog_products().await?;
        let units = self.catalog_units().await?;
        let history = match self.packaging_history().await {
            Ok(history) => history,
            Err(e) => {
                crate::log_warn!("Packaging history unavailable: {}", e);
                Vec::new()
            }
        };
        let label_prices = self.label_prices().await?;
        Ok(WizardCatalog::new(&products, &units, &history, label_prices))
    }

    // --- Verification ---

    /// Submit the ID card photos for account verification.
    pub async fn upload_ine(
        &self,
        front: &Upload,
        back: &Upload,
        selfie: &Upload,
    ) -> Result<MessageResponse, ApiError> {
        self.post_multipart(
            "/admin/verifications/ine",
            &[],
            &[("ine_front", front), ("ine_back", back), ("ine_selfie", selfie)],
        )
        .await
    }

    // --- Notifications ---

    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get_json("/notifications").await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError> {
        self.put_empty::<serde_json::Value>(&format!("/notifications/{id}/read"))
            .await
            .map(|_| ())
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.put_empty::<serde_json::Value>("/notifications/read-all")
            .await
            .map(|_| ())
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/notifications/{id}")).await
    }

    pub async fn clear_notifications(&self) -> Result<(), ApiError> {
        self.delete("/notifications").await
    }

    // --- Admin ---

    pub async fn pending_verifications(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/admin/verifications/pending").await
    }

    pub async fn approve_verification(&self, user_id: &str, notes: &str) -> Result<(), ApiError> {
        self.post_multipart::<serde_json::Value>(
            &format!("/admin/verifications/{user_id}/approve"),
            &[("notes", notes.to_string())],
            &[],
        )
        .await
        .map(|_| ())
    }

    pub async fn reject_verification(&self, user_id: &str, reason: &str) -> Result<(), ApiError> {
        self.post_multipart::<serde_json::Value>(
            &format!("/admin/verifications/{user_id}/reject"),
            &[("reason", reason.to_string())],
            &[],
        )
        .await
        .map(|_| ())
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/admin/dashboard/stats").await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_success(resp: Response) -> Result<String, ApiError> {
    let status = resp.status().as_u16();
    let is_success = resp.status().is_success();
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;
    if !is_success {
        return Err(ApiError::Http { status, body: text });
    }
    Ok(text)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let text = read_success(resp).await?;
    let text = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(text).map_err(|e| ApiError::Deserialize(e.to_string()))
}

/// File name from a `Content-Disposition: attachment; filename="..."` header.
pub fn attachment_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        let client = ApiClient::new().with_base_url("http://localhost:8000/api/v1/");
        assert_eq!(client.url("/trips"), "http://localhost:8000/api/v1/trips");
        assert_eq!(client.url("trips/t1"), "http://localhost:8000/api/v1/trips/t1");
        assert_eq!(client.url("https://cdn.example.com/x.pdf"), "https://cdn.example.com/x.pdf");
    }

    #[test]
    fn parses_attachment_names() {
        assert_eq!(
            attachment_file_name(r#"attachment; filename="ticket_R-001.pdf""#).as_deref(),
            Some("ticket_R-001.pdf")
        );
        assert_eq!(attachment_file_name("inline"), None);
    }

    #[test]
    fn memory_tokens_keep_refresh_token_on_rotation() {
        let tokens = MemoryTokens::new(Session {
            access_token: Some("a1".into()),
            refresh_token: Some("r1".into()),
            user: None,
        });
        tokens.store_tokens("a2".into(), None);
        assert_eq!(tokens.access_token().as_deref(), Some("a2"));
        assert_eq!(tokens.refresh_token().as_deref(), Some("r1"));
        tokens.clear();
        assert_eq!(tokens.session(), Session::default());
    }
}
