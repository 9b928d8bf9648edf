//! # Domain Types
//!
//! Core domain types of the gemstone trading business.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Supplier ──supplies──► InventoryItem ◄──for── Certification          │
//! │                              ▲                                          │
//! │                              │ sells                                    │
//! │   Client ──buys────────────► Sale                                       │
//! │     │                                                                   │
//! │     └──books──► Consultation        Task ──about──► Client/Supplier/   │
//! │                                                     Stone               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - A business key where one exists (`stone_code`, `invoice_number`)
//!
//! ## Wire Format
//! Field names are camelCase; enum values use the labels the UI shows
//! (`"In Stock"`, `"In Progress"`, `"AAA"`). Money is integer paise.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

/// Generates a new entity ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%).
///
/// GST on cut gemstones is 0.25% (25 bps), on jewellery 3% (300 bps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Half of the rate, used for the CGST/SGST split.
    #[inline]
    pub const fn half(&self) -> Self {
        TaxRate(self.0 / 2)
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// Market quality grade of a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum QualityGrade {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    A,
    B,
    Commercial,
}

impl QualityGrade {
    pub const ALL: [QualityGrade; 5] = [
        QualityGrade::Aaa,
        QualityGrade::Aa,
        QualityGrade::A,
        QualityGrade::B,
        QualityGrade::Commercial,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QualityGrade::Aaa => "AAA",
            QualityGrade::Aa => "AA",
            QualityGrade::A => "A",
            QualityGrade::B => "B",
            QualityGrade::Commercial => "Commercial",
        }
    }
}

impl Default for QualityGrade {
    fn default() -> Self {
        QualityGrade::A
    }
}

/// Whether a stone is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum StoneStatus {
    #[serde(rename = "In Stock")]
    InStock,
    Sold,
    Reserved,
}

impl StoneStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StoneStatus::InStock => "In Stock",
            StoneStatus::Sold => "Sold",
            StoneStatus::Reserved => "Reserved",
        }
    }

    /// A stone can be sold while it is in stock or reserved for the buyer.
    pub fn is_sellable(&self) -> bool {
        matches!(self, StoneStatus::InStock | StoneStatus::Reserved)
    }
}

impl Default for StoneStatus {
    fn default() -> Self {
        StoneStatus::InStock
    }
}

/// Kind of counterparty buying from the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum ClientType {
    Astrologer,
    Jeweler,
    Temple,
    Individual,
}

impl ClientType {
    pub fn label(&self) -> &'static str {
        match self {
            ClientType::Astrologer => "Astrologer",
            ClientType::Jeweler => "Jeweler",
            ClientType::Temple => "Temple",
            ClientType::Individual => "Individual",
        }
    }
}

/// CRM segmentation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum LoyaltyLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LoyaltyLevel::Bronze => "Bronze",
            LoyaltyLevel::Silver => "Silver",
            LoyaltyLevel::Gold => "Gold",
            LoyaltyLevel::Platinum => "Platinum",
        }
    }
}

impl Default for LoyaltyLevel {
    fn default() -> Self {
        LoyaltyLevel::Bronze
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum SupplierType {
    Domestic,
    International,
}

/// Settlement state of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }
}

/// Lab-submission progress of a stone.
///
/// ```text
/// Pending ──► In Progress ──► Received ──► Certified
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum CertificationStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Received,
    Certified,
}

impl CertificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CertificationStatus::Pending => "Pending",
            CertificationStatus::InProgress => "In Progress",
            CertificationStatus::Received => "Received",
            CertificationStatus::Certified => "Certified",
        }
    }
}

impl Default for CertificationStatus {
    fn default() -> Self {
        CertificationStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum ConsultationStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl Default for ConsultationStatus {
    fn default() -> Self {
        ConsultationStatus::Scheduled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// What a task is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum RelatedType {
    Client,
    Supplier,
    Stone,
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(
    QualityGrade,
    StoneStatus,
    ClientType,
    LoyaltyLevel,
    PaymentStatus,
    CertificationStatus
);

// =============================================================================
// Inventory
// =============================================================================

/// A gemstone lot held by the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    /// Business identifier printed on packets and invoices (e.g. `RUB-0001`).
    pub stone_code: String,
    /// Ruby, Emerald, Yellow Sapphire, ...
    pub gem_type: String,
    pub carat: f64,
    pub origin: String,
    pub shape: Option<String>,
    pub color: Option<String>,
    pub clarity: Option<String>,
    pub quality_grade: QualityGrade,
    /// GIA, IGI, GRS, ...
    pub certification_lab: Option<String>,
    /// Reference to the scanned certificate file.
    pub certificate_file: Option<String>,
    pub purchase_price_paise: i64,
    pub selling_price_paise: i64,
    pub status: StoneStatus,
    pub tags: Vec<String>,
    pub supplier_id: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for an inventory item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryInput {
    pub stone_code: String,
    pub gem_type: String,
    pub carat: f64,
    pub origin: String,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub clarity: Option<String>,
    #[serde(default)]
    pub quality_grade: QualityGrade,
    #[serde(default)]
    pub certification_lab: Option<String>,
    #[serde(default)]
    pub certificate_file: Option<String>,
    pub purchase_price_paise: i64,
    pub selling_price_paise: i64,
    #[serde(default)]
    pub status: StoneStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InventoryItem {
    /// Builds a new item from a validated input.
    pub fn new(input: InventoryInput, now: DateTime<Utc>) -> Self {
        let mut item = InventoryItem {
            id: new_id(),
            stone_code: String::new(),
            gem_type: String::new(),
            carat: 0.0,
            origin: String::new(),
            shape: None,
            color: None,
            clarity: None,
            quality_grade: QualityGrade::default(),
            certification_lab: None,
            certificate_file: None,
            purchase_price_paise: 0,
            selling_price_paise: 0,
            status: StoneStatus::default(),
            tags: Vec::new(),
            supplier_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        item.apply(input, now);
        item
    }

    /// Overwrites the editable fields from an input.
    pub fn apply(&mut self, input: InventoryInput, now: DateTime<Utc>) {
        self.stone_code = input.stone_code.trim().to_string();
        self.gem_type = input.gem_type.trim().to_string();
        self.carat = input.carat;
        self.origin = input.origin.trim().to_string();
        self.shape = input.shape;
        self.color = input.color;
        self.clarity = input.clarity;
        self.quality_grade = input.quality_grade;
        self.certification_lab = input.certification_lab;
        self.certificate_file = input.certificate_file;
        self.purchase_price_paise = input.purchase_price_paise;
        self.selling_price_paise = input.selling_price_paise;
        self.status = input.status;
        self.tags = input.tags;
        self.supplier_id = input.supplier_id;
        self.notes = input.notes;
        self.updated_at = now;
    }

    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_paise(self.purchase_price_paise)
    }

    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_paise(self.selling_price_paise)
    }

    /// Whether the stone carries a lab certificate.
    pub fn is_certified(&self) -> bool {
        self.certification_lab
            .as_deref()
            .is_some_and(|lab| !lab.trim().is_empty())
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub client_type: ClientType,
    pub loyalty_level: LoyaltyLevel,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientInput {
    pub name: String,
    pub client_type: ClientType,
    #[serde(default)]
    pub loyalty_level: LoyaltyLevel,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Client {
    pub fn new(input: ClientInput, now: DateTime<Utc>) -> Self {
        Client {
            id: new_id(),
            name: input.name.trim().to_string(),
            client_type: input.client_type,
            loyalty_level: input.loyalty_level,
            phone: input.phone,
            email: input.email,
            city: input.city,
            address: input.address,
            gstin: input.gstin.map(|g| g.trim().to_uppercase()),
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: ClientInput, now: DateTime<Utc>) {
        let mut fresh = Client::new(input, now);
        fresh.id = std::mem::take(&mut self.id);
        fresh.created_at = self.created_at;
        *self = fresh;
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub supplier_type: SupplierType,
    pub location: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Gem types this supplier deals in.
    pub gemstone_types: Vec<String>,
    /// 1 (poor) to 5 (excellent).
    pub rating: Option<i64>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupplierInput {
    pub name: String,
    pub supplier_type: SupplierType,
    pub location: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gemstone_types: Vec<String>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Supplier {
    pub fn new(input: SupplierInput, now: DateTime<Utc>) -> Self {
        Supplier {
            id: new_id(),
            name: input.name.trim().to_string(),
            supplier_type: input.supplier_type,
            location: input.location.trim().to_string(),
            contact_person: input.contact_person,
            phone: input.phone,
            email: input.email,
            gemstone_types: input.gemstone_types,
            rating: input.rating,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: SupplierInput, now: DateTime<Utc>) {
        let mut fresh = Supplier::new(input, now);
        fresh.id = std::mem::take(&mut self.id);
        fresh.created_at = self.created_at;
        *self = fresh;
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale of one stone to one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub invoice_number: String,
    pub client_id: String,
    pub inventory_id: String,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub total_amount_paise: i64,
    /// `total_amount − purchase_price` of the stone at the time of sale.
    pub profit_paise: i64,
    pub payment_status: PaymentStatus,
    pub amount_paid_paise: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleInput {
    pub client_id: String,
    pub inventory_id: String,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub total_amount_paise: i64,
    #[serde(default)]
    pub amount_paid_paise: i64,
    /// When omitted, derived from the amount paid.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Sale {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }

    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_paise(self.amount_paid_paise)
    }

    /// Outstanding amount (never negative).
    pub fn balance_due(&self) -> Money {
        Money::from_paise((self.total_amount_paise - self.amount_paid_paise).max(0))
    }
}

// =============================================================================
// Certification
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Certification {
    pub id: String,
    pub inventory_id: String,
    pub lab: String,
    #[ts(as = "String")]
    pub submitted_date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub expected_date: Option<NaiveDate>,
    pub certificate_number: Option<String>,
    pub status: CertificationStatus,
    pub cost_paise: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CertificationInput {
    pub inventory_id: String,
    pub lab: String,
    #[ts(as = "String")]
    pub submitted_date: NaiveDate,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expected_date: Option<NaiveDate>,
    #[serde(default)]
    pub certificate_number: Option<String>,
    #[serde(default)]
    pub status: CertificationStatus,
    #[serde(default)]
    pub cost_paise: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Certification {
    pub fn new(input: CertificationInput, now: DateTime<Utc>) -> Self {
        Certification {
            id: new_id(),
            inventory_id: input.inventory_id,
            lab: input.lab.trim().to_string(),
            submitted_date: input.submitted_date,
            expected_date: input.expected_date,
            certificate_number: input.certificate_number,
            status: input.status,
            cost_paise: input.cost_paise,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Consultation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Consultation {
    pub id: String,
    pub client_id: String,
    #[ts(as = "String")]
    pub consultation_date: NaiveDate,
    pub topic: String,
    pub zodiac_sign: Option<String>,
    pub recommended_stones: Vec<String>,
    pub fee_paise: i64,
    pub status: ConsultationStatus,
    #[ts(as = "Option<String>")]
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConsultationInput {
    pub client_id: String,
    #[ts(as = "String")]
    pub consultation_date: NaiveDate,
    pub topic: String,
    #[serde(default)]
    pub zodiac_sign: Option<String>,
    #[serde(default)]
    pub recommended_stones: Vec<String>,
    #[serde(default)]
    pub fee_paise: i64,
    #[serde(default)]
    pub status: ConsultationStatus,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Consultation {
    pub fn new(input: ConsultationInput, now: DateTime<Utc>) -> Self {
        Consultation {
            id: new_id(),
            client_id: input.client_id,
            consultation_date: input.consultation_date,
            topic: input.topic.trim().to_string(),
            zodiac_sign: input.zodiac_sign,
            recommended_stones: input.recommended_stones,
            fee_paise: input.fee_paise,
            status: input.status,
            follow_up_date: input.follow_up_date,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: ConsultationInput, now: DateTime<Utc>) {
        let mut fresh = Consultation::new(input, now);
        fresh.id = std::mem::take(&mut self.id);
        fresh.created_at = self.created_at;
        *self = fresh;
    }
}

// =============================================================================
// Task
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub related_type: Option<RelatedType>,
    pub related_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub related_type: Option<RelatedType>,
    #[serde(default)]
    pub related_id: Option<String>,
}

impl Task {
    pub fn new(input: TaskInput, now: DateTime<Utc>) -> Self {
        Task {
            id: new_id(),
            title: input.title.trim().to_string(),
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            status: input.status,
            related_type: input.related_type,
            related_id: input.related_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: TaskInput, now: DateTime<Utc>) {
        let mut fresh = Task::new(input, now);
        fresh.id = std::mem::take(&mut self.id);
        fresh.created_at = self.created_at;
        *self = fresh;
    }

    /// A task is overdue when it has a past due date and is not completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < today)
    }
}
