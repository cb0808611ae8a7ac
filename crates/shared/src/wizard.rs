//! Two-step reservation wizard: form state, validation and request building.

use serde::{Deserialize, Serialize};

use crate::models::{
    LoadItemCreate, PaymentMethod, PickupDetails, ReservationCreate, Space, Trip,
};

/// Bond charged when an international shipment does not bring its own and
/// the trip has no explicit bond cost.
pub const DEFAULT_BOND_COST: f64 = 500.0;
/// Estimated cost per label.
pub const LABEL_UNIT_COST: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Spaces,
    Payment,
}

/// One load item as edited in the form, linked to a selected space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemForm {
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub box_count: u32,
    #[serde(default)]
    pub weight_per_unit: f64,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    #[serde(default)]
    pub packaging_type: Option<String>,
    #[serde(default)]
    pub needs_labeling: bool,
    #[serde(default)]
    pub labeling_quantity: Option<u32>,
    #[serde(default)]
    pub labeling_dimensions: Option<String>,
    #[serde(default)]
    pub labeling_file_id: Option<String>,
}

fn default_weight_unit() -> String {
    "kg".to_string()
}

impl ItemForm {
    pub fn blank(space_id: &str) -> Self {
        Self {
            space_id: Some(space_id.to_string()),
            product_name: String::new(),
            box_count: 0,
            weight_per_unit: 0.0,
            weight_unit: default_weight_unit(),
            packaging_type: None,
            needs_labeling: false,
            labeling_quantity: None,
            labeling_dimensions: None,
            labeling_file_id: None,
        }
    }

    pub fn total_weight(&self) -> f64 {
        f64::from(self.box_count) * self.weight_per_unit
    }

    fn to_request(&self) -> LoadItemCreate {
        LoadItemCreate {
            product_name: self.product_name.trim().to_string(),
            box_count: self.box_count,
            total_weight: self.total_weight(),
            weight_unit: self.weight_unit.clone(),
            packaging_type: non_blank(&self.packaging_type),
            space_id: self.space_id.clone(),
            labeling_required: self.needs_labeling,
            label_quantity: self.labeling_quantity.filter(|q| *q > 0),
            label_dimensions: non_blank(&self.labeling_dimensions),
            label_file_id: non_blank(&self.labeling_file_id),
            services: None,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Full wizard form. This is also the shape persisted as a draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationForm {
    #[serde(default)]
    pub items: Vec<ItemForm>,
    #[serde(default)]
    pub is_international: bool,
    #[serde(default)]
    pub use_own_bond: bool,
    #[serde(default)]
    pub bond_file_id: Option<String>,
    #[serde(default)]
    pub request_pickup: bool,
    #[serde(default)]
    pub pickup_details: PickupDetails,
    #[serde(default)]
    pub requires_invoice: bool,
    #[serde(default)]
    pub billing_company_name: Option<String>,
    #[serde(default)]
    pub billing_rfc: Option<String>,
    #[serde(default)]
    pub cfdi_use: Option<String>,
    #[serde(default)]
    pub billing_contact_methods: Option<String>,
    #[serde(default)]
    pub invoice_data_id: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemField {
    ProductName,
    BoxCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    NoItems,
    Item { index: usize, field: ItemField },
    BondFileRequired,
    BillingCompanyRequired,
    BillingRfcRequired,
}

impl FormError {
    pub fn message(&self) -> &'static str {
        match self {
            FormError::NoItems => "Add at least one product",
            FormError::Item {
                field: ItemField::ProductName,
                ..
            } => "Select a product",
            FormError::Item {
                field: ItemField::BoxCount,
                ..
            } => "At least 1 box",
            FormError::BondFileRequired => "Upload your bond document",
            FormError::BillingCompanyRequired => "Company name is required for invoicing",
            FormError::BillingRfcRequired => "RFC is required for invoicing",
        }
    }
}

/// Rough total shown in the summary. The backend computes the real one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostEstimate {
    pub spaces: f64,
    pub pickup: f64,
    pub labeling: f64,
    pub bond: f64,
    pub total: f64,
    /// Total converted to MXN when the trip is priced in another currency.
    pub total_mxn: Option<f64>,
}

impl ReservationForm {
    /// Fresh form with one blank item per selected space.
    pub fn new(trip: &Trip, selected: &[Space]) -> Self {
        Self {
            items: selected.iter().map(|s| ItemForm::blank(&s.id)).collect(),
            is_international: trip.is_international,
            use_own_bond: false,
            bond_file_id: None,
            request_pickup: false,
            pickup_details: PickupDetails::default(),
            requires_invoice: false,
            billing_company_name: None,
            billing_rfc: None,
            cfdi_use: None,
            billing_contact_methods: None,
            invoice_data_id: None,
            payment_method: PaymentMethod::default(),
        }
    }

    /// Copy product, weight, packaging and labeling settings of the first
    /// item to every other item. Space links are kept.
    pub fn copy_first_to_all(&mut self) {
        let Some((first, rest)) = self.items.split_first_mut() else {
            return;
        };
        for item in rest {
            item.product_name = first.product_name.clone();
            item.box_count = first.box_count;
            item.weight_per_unit = first.weight_per_unit;
            item.weight_unit = first.weight_unit.clone();
            item.packaging_type = first.packaging_type.clone();
            item.needs_labeling = first.needs_labeling;
            item.labeling_quantity = first.labeling_quantity;
            item.labeling_dimensions = first.labeling_dimensions.clone();
            item.labeling_file_id = first.labeling_file_id.clone();
        }
    }

    pub fn validate_items(&self) -> Result<(), Vec<FormError>> {
        if self.items.is_empty() {
            return Err(vec![FormError::NoItems]);
        }
        let mut errors = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.product_name.trim().is_empty() {
                errors.push(FormError::Item {
                    index,
                    field: ItemField::ProductName,
                });
            }
            if item.box_count < 1 {
                errors.push(FormError::Item {
                    index,
                    field: ItemField::BoxCount,
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn validate_payment(&self) -> Result<(), Vec<FormError>> {
        let mut errors = Vec::new();
        if self.is_international && self.use_own_bond && non_blank(&self.bond_file_id).is_none()
        {
            errors.push(FormError::BondFileRequired);
        }
        if self.requires_invoice {
            if non_blank(&self.billing_company_name).is_none() {
                errors.push(FormError::BillingCompanyRequired);
            }
            if non_blank(&self.billing_rfc).is_none() {
                errors.push(FormError::BillingRfcRequired);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Try to move forward. Step 1 only advances with valid items.
    pub fn advance(&self, step: WizardStep) -> Result<WizardStep, Vec<FormError>> {
        match step {
            WizardStep::Spaces => self.validate_items().map(|()| WizardStep::Payment),
            WizardStep::Payment => Ok(WizardStep::Payment),
        }
    }

    pub fn estimate(&self, trip: &Trip, space_count: usize) -> CostEstimate {
        let spaces = space_count as f64 * trip.price_per_space;
        let pickup = if self.request_pickup {
            let cost = trip.pickup_cost.unwrap_or(0.0);
            if trip.pickup_cost_type.as_deref() == Some("per_pallet") {
                cost * space_count as f64
            } else {
                cost
            }
        } else {
            0.0
        };
        let labeling = self
            .items
            .iter()
            .filter(|i| i.needs_labeling)
            .map(|i| f64::from(i.labeling_quantity.unwrap_or(0)) * LABEL_UNIT_COST)
            .sum();
        let bond = if trip.is_international && !self.use_own_bond {
            trip.bond_cost.unwrap_or(DEFAULT_BOND_COST)
        } else {
            0.0
        };
        let total = spaces + pickup + labeling + bond;
        let total_mxn = (trip.currency != "MXN")
            .then_some(trip.exchange_rate)
            .flatten()
            .map(|rate| total * rate);
        CostEstimate {
            spaces,
            pickup,
            labeling,
            bond,
            total,
            total_mxn,
        }
    }

    /// Build the create request for the held spaces. Pickup details are only
    /// sent when pickup is requested.
    pub fn to_request(&self, trip_id: &str, space_ids: Vec<String>) -> ReservationCreate {
        ReservationCreate {
            trip_id: trip_id.to_string(),
            space_ids,
            items: self.items.iter().map(ItemForm::to_request).collect(),
            is_international: self.is_international,
            use_own_bond: self.use_own_bond,
            bond_file_id: non_blank(&self.bond_file_id),
            request_pickup: self.request_pickup,
            pickup_details: self.request_pickup.then(|| self.pickup_details.clone()),
            requires_invoice: self.requires_invoice,
            billing_company_name: non_blank(&self.billing_company_name),
            billing_rfc: non_blank(&self.billing_rfc),
            cfdi_use: non_blank(&self.cfdi_use),
            billing_contact_methods: non_blank(&self.billing_contact_methods),
            invoice_data_id: non_blank(&self.invoice_data_id),
            payment_method: self.payment_method,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{SpaceStatus, TripStatus};
    use chrono::NaiveDate;

    pub(crate) fn trip(international: bool) -> Trip {
        Trip {
            id: "t1".into(),
            origin: "Monterrey".into(),
            destination: "Laredo".into(),
            departure_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            departure_time: None,
            status: TripStatus::Scheduled,
            is_international: international,
            total_spaces: 28,
            price_per_space: 1500.0,
            currency: "USD".into(),
            exchange_rate: Some(17.0),
            individual_pricing: false,
            tax_included: false,
            tax_rate: None,
            payment_deadline_hours: None,
            pickup_cost: Some(100.0),
            pickup_cost_type: Some("per_pallet".into()),
            bond_cost: None,
            max_spaces_per_client: None,
            notes_public: None,
            notes_internal: None,
            truck_identifier: None,
            trailer_identifier: None,
            truck_plate: None,
            trailer_plate: None,
            driver_name: None,
            driver_phone: None,
            available_spaces: None,
            reserved_spaces: None,
            blocked_spaces: None,
            on_hold_spaces: None,
        }
    }

    pub(crate) fn space(id: &str, number: u32) -> Space {
        Space {
            id: id.into(),
            space_number: number,
            status: SpaceStatus::OnHold,
            price: None,
            hold_expires_at: None,
            held_by: None,
            is_mine: Some(true),
            has_pending_reservation: None,
        }
    }

    fn filled(form: &mut ReservationForm) {
        for item in &mut form.items {
            item.product_name = "Aguacate".into();
            item.box_count = 40;
            item.weight_per_unit = 12.5;
        }
    }

    #[test]
    fn step_one_requires_items() {
        let mut form = ReservationForm::new(&trip(false), &[]);
        assert_eq!(form.advance(WizardStep::Spaces), Err(vec![FormError::NoItems]));

        form.items.push(ItemForm::blank("s1"));
        let errors = form.advance(WizardStep::Spaces).unwrap_err();
        assert_eq!(errors.len(), 2);

        filled(&mut form);
        assert_eq!(form.advance(WizardStep::Spaces), Ok(WizardStep::Payment));
    }

    #[test]
    fn copy_first_keeps_space_links() {
        let mut form = ReservationForm::new(&trip(false), &[space("s1", 1), space("s2", 2)]);
        form.items[0].product_name = "Limón".into();
        form.items[0].box_count = 3;
        form.items[0].needs_labeling = true;
        form.items[0].labeling_quantity = Some(30);
        form.copy_first_to_all();

        assert_eq!(form.items[1].product_name, "Limón");
        assert_eq!(form.items[1].labeling_quantity, Some(30));
        assert_eq!(form.items[1].space_id.as_deref(), Some("s2"));
    }

    #[test]
    fn request_maps_weights_and_labels() {
        let mut form = ReservationForm::new(&trip(false), &[space("s1", 1)]);
        filled(&mut form);
        form.items[0].needs_labeling = true;
        form.items[0].labeling_quantity = Some(40);
        form.items[0].labeling_dimensions = Some("10x15".into());
        form.pickup_details.address = Some("Calle 5".into());

        let req = form.to_request("t1", vec!["s1".into()]);
        let item = &req.items[0];
        assert_eq!(item.total_weight, 500.0);
        assert!(item.labeling_required);
        assert_eq!(item.label_quantity, Some(40));
        assert_eq!(item.label_dimensions.as_deref(), Some("10x15"));
        assert_eq!(item.label_file_id, None);
        assert_eq!(req.pickup_details, None);

        form.request_pickup = true;
        let req = form.to_request("t1", vec!["s1".into()]);
        assert_eq!(
            req.pickup_details.and_then(|p| p.address).as_deref(),
            Some("Calle 5")
        );
    }

    #[test]
    fn payment_step_checks_bond_and_invoice() {
        let mut form = ReservationForm::new(&trip(true), &[space("s1", 1)]);
        form.use_own_bond = true;
        form.requires_invoice = true;
        form.billing_rfc = Some("XAXX010101000".into());
        assert_eq!(
            form.validate_payment(),
            Err(vec![
                FormError::BondFileRequired,
                FormError::BillingCompanyRequired
            ])
        );
    }

    #[test]
    fn estimate_adds_pickup_bond_and_labels() {
        let mut form = ReservationForm::new(&trip(true), &[space("s1", 1), space("s2", 2)]);
        form.request_pickup = true;
        form.items[0].needs_labeling = true;
        form.items[0].labeling_quantity = Some(10);

        let est = form.estimate(&trip(true), 2);
        assert_eq!(est.spaces, 3000.0);
        assert_eq!(est.pickup, 200.0);
        assert_eq!(est.bond, DEFAULT_BOND_COST);
        assert_eq!(est.labeling, 10.0);
        assert_eq!(est.total, 3710.0);
        assert_eq!(est.total_mxn, Some(3710.0 * 17.0));
    }
}
