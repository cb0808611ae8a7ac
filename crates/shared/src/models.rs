//! Wire models mirrored from the Keikichi backend.
//!
//! These are DTOs only. The backend owns every invariant; the client renders
//! whatever the last fetch returned.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde_ext::{amount, option_amount, option_timestamp, timestamp};

// --- Auth ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Superadmin,
    Manager,
    Client,
}

impl UserRole {
    /// Managers and superadmins see the admin area.
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Superadmin | UserRole::Manager)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body of `POST /auth/refresh`. The backend reads the refresh token from the
/// `access_token` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// --- Trips ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Scheduled,
    InTransit,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 4] = [
        TripStatus::Scheduled,
        TripStatus::InTransit,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::InTransit => "in_transit",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default)]
    pub departure_time: Option<NaiveTime>,
    pub status: TripStatus,
    #[serde(default)]
    pub is_international: bool,
    pub total_spaces: u32,
    #[serde(with = "amount")]
    pub price_per_space: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, with = "option_amount")]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub individual_pricing: bool,
    #[serde(default)]
    pub tax_included: bool,
    #[serde(default, with = "option_amount")]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub payment_deadline_hours: Option<u32>,
    #[serde(default, with = "option_amount")]
    pub pickup_cost: Option<f64>,
    /// `"flat"` or `"per_pallet"`.
    #[serde(default)]
    pub pickup_cost_type: Option<String>,
    #[serde(default, with = "option_amount")]
    pub bond_cost: Option<f64>,
    #[serde(default)]
    pub max_spaces_per_client: Option<u32>,
    #[serde(default)]
    pub notes_public: Option<String>,
    #[serde(default)]
    pub notes_internal: Option<String>,
    #[serde(default)]
    pub truck_identifier: Option<String>,
    #[serde(default)]
    pub trailer_identifier: Option<String>,
    #[serde(default)]
    pub truck_plate: Option<String>,
    #[serde(default)]
    pub trailer_plate: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
    #[serde(default)]
    pub available_spaces: Option<u32>,
    #[serde(default)]
    pub reserved_spaces: Option<u32>,
    #[serde(default)]
    pub blocked_spaces: Option<u32>,
    #[serde(default)]
    pub on_hold_spaces: Option<u32>,
}

impl Trip {
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

/// Body of `POST /trips`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripCreate {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<NaiveTime>,
    pub total_spaces: u32,
    pub price_per_space: f64,
    pub currency: String,
    pub is_international: bool,
    pub tax_included: bool,
    pub tax_rate: f64,
    pub payment_deadline_hours: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_public: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_internal: Option<String>,
}

/// Body of `PATCH /trips/{id}`; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TripUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spaces: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_space: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_public: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_internal: Option<String>,
}

// --- Spaces ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SpaceStatus {
    Available,
    OnHold,
    Reserved,
    Blocked,
    Internal,
}

impl SpaceStatus {
    pub const ALL: [SpaceStatus; 5] = [
        SpaceStatus::Available,
        SpaceStatus::OnHold,
        SpaceStatus::Reserved,
        SpaceStatus::Blocked,
        SpaceStatus::Internal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpaceStatus::Available => "available",
            SpaceStatus::OnHold => "on_hold",
            SpaceStatus::Reserved => "reserved",
            SpaceStatus::Blocked => "blocked",
            SpaceStatus::Internal => "internal",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl fmt::Display for SpaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Space {
    pub id: String,
    pub space_number: u32,
    pub status: SpaceStatus,
    #[serde(default, with = "option_amount")]
    pub price: Option<f64>,
    #[serde(default, with = "option_timestamp")]
    pub hold_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub held_by: Option<String>,
    #[serde(default)]
    pub is_mine: Option<bool>,
    #[serde(default)]
    pub has_pending_reservation: Option<bool>,
}

impl Space {
    pub fn is_mine(&self) -> bool {
        self.is_mine.unwrap_or(false)
    }

    pub fn has_pending_reservation(&self) -> bool {
        self.has_pending_reservation.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceSummary {
    #[serde(default)]
    pub available: u32,
    #[serde(default)]
    pub reserved: u32,
    #[serde(default)]
    pub blocked: u32,
    #[serde(default)]
    pub on_hold: u32,
    #[serde(default)]
    pub internal: u32,
}

impl SpaceSummary {
    pub fn count(&self, status: SpaceStatus) -> u32 {
        match status {
            SpaceStatus::Available => self.available,
            SpaceStatus::OnHold => self.on_hold,
            SpaceStatus::Reserved => self.reserved,
            SpaceStatus::Blocked => self.blocked,
            SpaceStatus::Internal => self.internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripSpacesResponse {
    pub trip_id: String,
    pub total_spaces: u32,
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub summary: SpaceSummary,
}

// --- Holds ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoldSpacesRequest {
    pub trip_id: String,
    pub space_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldSpacesResponse {
    #[serde(default)]
    pub message: String,
    pub trip_id: String,
    pub space_ids: Vec<String>,
    #[serde(default)]
    pub spaces_count: u32,
    #[serde(with = "timestamp")]
    pub hold_expires_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_in_minutes: u32,
}

// --- Reservations ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 3] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    #[default]
    BankTransfer,
    Mercadopago,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::BankTransfer,
        PaymentMethod::Cash,
        PaymentMethod::Mercadopago,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Mercadopago => "mercadopago",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PendingReview,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Unpaid,
        PaymentStatus::PendingReview,
        PaymentStatus::Paid,
        PaymentStatus::Refunded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::PendingReview => "pending_review",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationSpace {
    pub id: String,
    pub space_number: u32,
    #[serde(default, with = "option_amount")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationTrip {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(with = "amount")]
    pub price_per_space: f64,
    #[serde(default, with = "option_amount")]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub tax_included: bool,
    #[serde(default)]
    pub is_international: bool,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoadItemCreate {
    pub product_name: String,
    pub box_count: u32,
    pub total_weight: f64,
    pub weight_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packaging_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    pub labeling_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadItem {
    pub id: String,
    pub product_name: String,
    pub box_count: u32,
    #[serde(with = "amount")]
    pub total_weight: f64,
    #[serde(default)]
    pub weight_unit: Option<String>,
    #[serde(default)]
    pub packaging_type: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub labeling_required: bool,
    #[serde(default)]
    pub label_quantity: Option<u32>,
    #[serde(default)]
    pub label_dimensions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PickupDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /reservations`, created from an active hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationCreate {
    pub trip_id: String,
    pub space_ids: Vec<String>,
    pub items: Vec<LoadItemCreate>,
    pub is_international: bool,
    pub use_own_bond: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_file_id: Option<String>,
    pub request_pickup: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_details: Option<PickupDetails>,
    pub requires_invoice: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_rfc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfdi_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_contact_methods: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_data_id: Option<String>,
    pub payment_method: PaymentMethod,
}

/// Body of `POST /reservations/admin`: an internal reservation without payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminReservationCreate {
    pub trip_id: String,
    pub space_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PATCH /reservations/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_invoice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub client_id: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub trip_id: String,
    pub status: ReservationStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(with = "amount")]
    pub subtotal: f64,
    #[serde(with = "amount")]
    pub tax_amount: f64,
    #[serde(with = "amount")]
    pub total_amount: f64,
    #[serde(default, with = "option_amount")]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub discount_reason: Option<String>,
    #[serde(default)]
    pub is_international: bool,
    #[serde(default)]
    pub use_own_bond: bool,
    #[serde(default)]
    pub bond_file_id: Option<String>,
    #[serde(default)]
    pub request_pickup: bool,
    #[serde(default)]
    pub pickup_details: Option<serde_json::Value>,
    #[serde(default)]
    pub requires_invoice: bool,
    #[serde(default)]
    pub invoice_data_id: Option<String>,
    #[serde(default)]
    pub invoice_pdf_path: Option<String>,
    #[serde(default)]
    pub invoice_xml_path: Option<String>,
    #[serde(default)]
    pub ticket_pdf_path: Option<String>,
    #[serde(default)]
    pub payment_proof_path: Option<String>,
    #[serde(default, with = "option_timestamp")]
    pub payment_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_confirmed_by: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub spaces: Option<Vec<ReservationSpace>>,
    #[serde(default)]
    pub items: Option<Vec<LoadItem>>,
    #[serde(default)]
    pub trip: Option<ReservationTrip>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationListItem {
    pub id: String,
    pub trip_id: String,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(with = "amount")]
    pub total_amount: f64,
    pub spaces_count: u32,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub trip_origin: Option<String>,
    #[serde(default)]
    pub trip_destination: Option<String>,
    #[serde(default)]
    pub trip_departure_date: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedReservations {
    pub items: Vec<ReservationListItem>,
    pub total: u32,
    pub page: u32,
    pub page_size: u32,
    pub pages: u32,
}

/// Query filters for `GET /reservations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReservationFilters {
    pub trip_id: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<ReservationStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl ReservationFilters {
    /// Query pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(trip_id) = &self.trip_id {
            pairs.push(("trip_id", trip_id.clone()));
        }
        if let Some(client_id) = &self.client_id {
            pairs.push(("client_id", client_id.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(payment_status) = self.payment_status {
            pairs.push(("payment_status", payment_status.as_str().to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmPaymentRequest {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmPaymentResponse {
    pub message: String,
    #[serde(default)]
    pub reservation_id: Option<String>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub ticket_pdf_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentProofUploadResponse {
    pub message: String,
    #[serde(default)]
    pub reservation_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_proof_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub performed_by: String,
    #[serde(default)]
    pub old_values: Option<serde_json::Value>,
    #[serde(default)]
    pub new_values: Option<serde_json::Value>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditHistory {
    pub audit_history: Vec<AuditLogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedDocument {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// --- Notifications ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationType,
    pub is_read: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub link: Option<String>,
}

// --- Admin ---

/// `GET /admin/dashboard/stats` returns a loosely typed map.
pub type DashboardStats = serde_json::Map<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_status_uses_snake_case_on_the_wire() {
        let space: Space = serde_json::from_str(
            r#"{"id":"s1","space_number":3,"status":"on_hold","is_mine":true,
                "hold_expires_at":"2025-05-01T12:00:00"}"#,
        )
        .unwrap();
        assert_eq!(space.status, SpaceStatus::OnHold);
        assert!(space.is_mine());
        assert!(!space.has_pending_reservation());
        assert!(space.hold_expires_at.is_some());
        assert_eq!(SpaceStatus::parse("internal"), Some(SpaceStatus::Internal));
        assert_eq!(SpaceStatus::parse("gone"), None);
    }

    #[test]
    fn trip_tolerates_decimal_strings_and_missing_optionals() {
        let trip: Trip = serde_json::from_str(
            r#"{"id":"t1","origin":"Monterrey","destination":"Laredo",
                "departure_date":"2025-06-10","departure_time":"08:30:00",
                "status":"scheduled","total_spaces":28,"price_per_space":"1500.00"}"#,
        )
        .unwrap();
        assert_eq!(trip.price_per_space, 1500.0);
        assert_eq!(trip.currency, "USD");
        assert!(!trip.is_international);
        assert_eq!(trip.route_label(), "Monterrey → Laredo");
    }

    #[test]
    fn reservation_create_omits_unset_optionals() {
        let body = ReservationCreate {
            trip_id: "t1".into(),
            space_ids: vec!["s1".into()],
            items: vec![],
            is_international: false,
            use_own_bond: false,
            bond_file_id: None,
            request_pickup: false,
            pickup_details: None,
            requires_invoice: false,
            billing_company_name: None,
            billing_rfc: None,
            cfdi_use: None,
            billing_contact_methods: None,
            invoice_data_id: None,
            payment_method: PaymentMethod::BankTransfer,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["payment_method"], "bank_transfer");
        assert!(json.get("pickup_details").is_none());
        assert!(json.get("billing_rfc").is_none());
    }

    #[test]
    fn filters_render_only_set_values() {
        let filters = ReservationFilters {
            status: Some(ReservationStatus::Pending),
            payment_status: Some(PaymentStatus::PendingReview),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("status", "pending".to_string()),
                ("payment_status", "pending_review".to_string()),
            ]
        );
    }
}
