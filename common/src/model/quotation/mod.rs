//! Quotation line models and related types

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Amount, Percent, Quantity, Rate};
use crate::model::summary::QuotationSummary;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Rate of exchange used when neither the line nor the quotation sets one
pub const FALLBACK_ROE: Rate = dec!(1.00);

/// Markup percentage used when neither the line nor the quotation sets one
pub const FALLBACK_MARKUP: Percent = dec!(25.00);

/// Currency adjustment factor used when the quotation does not set one
pub const FALLBACK_CAF: Percent = dec!(5.00);

/// Line status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    /// Line is part of the live offer
    Current,
    /// Waiting on vendor or client confirmation
    Pending,
    /// Client has ordered the line
    Order,
    /// Delivered and ready to be invoiced
    ToInvoice,
    /// Kept on the quotation but excluded from every summary
    Inactive,
    /// Any status string the console does not track
    #[serde(other)]
    Unknown,
}

impl LineStatus {
    /// Status bucket this line is summarised under, if any
    pub fn bucket(self) -> Option<StatusBucket> {
        match self {
            LineStatus::Current => Some(StatusBucket::Current),
            LineStatus::Pending => Some(StatusBucket::Pending),
            LineStatus::Order => Some(StatusBucket::Order),
            LineStatus::ToInvoice => Some(StatusBucket::ToInvoice),
            LineStatus::Inactive | LineStatus::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineStatus::Current => "current",
            LineStatus::Pending => "pending",
            LineStatus::Order => "order",
            LineStatus::ToInvoice => "toinvoice",
            LineStatus::Inactive => "inactive",
            LineStatus::Unknown => "unknown",
        }
    }
}

/// Exact, case-sensitive match against the known status names
impl From<&str> for LineStatus {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "current" => LineStatus::Current,
            "pending" => LineStatus::Pending,
            "order" => LineStatus::Order,
            "toinvoice" => LineStatus::ToInvoice,
            "inactive" => LineStatus::Inactive,
            _ => LineStatus::Unknown,
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four lifecycle stages that get a financial summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    Current,
    Pending,
    Order,
    ToInvoice,
}

impl StatusBucket {
    /// All buckets in display order
    pub const ALL: [StatusBucket; 4] = [
        StatusBucket::Current,
        StatusBucket::Pending,
        StatusBucket::Order,
        StatusBucket::ToInvoice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusBucket::Current => "current",
            StatusBucket::Pending => "pending",
            StatusBucket::Order => "order",
            StatusBucket::ToInvoice => "toinvoice",
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One priced item within a quotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(default)]
pub struct QuotationLine {
    /// Vendor reference
    pub vendor_id: String,
    /// Item reference, may be empty
    pub item_name: String,
    /// Currency code of the buy rate
    pub currency: Option<String>,
    /// Quantity
    pub quantity: Quantity,
    /// Cost per unit in the source currency
    pub buy_rate: Rate,
    /// Total cost in the source currency. Derived from `quantity * buy_rate`
    /// when not set.
    pub cost_sum: Option<Amount>,
    /// Line rate of exchange; falls back to the quotation default
    pub roe: Option<Rate>,
    /// Line markup percentage; falls back to the quotation default
    pub mu_percent: Option<Percent>,
    /// Lifecycle status
    pub status: LineStatus,
    /// Whether the client rate is set by hand
    pub fixed: bool,
    /// Manual client rate, used while `fixed` is set
    pub fixed_rate_to_client: Option<Rate>,
}

impl Default for QuotationLine {
    fn default() -> Self {
        Self {
            vendor_id: String::new(),
            item_name: String::new(),
            currency: None,
            quantity: Decimal::ONE,
            buy_rate: Decimal::ZERO,
            cost_sum: None,
            roe: None,
            mu_percent: None,
            status: LineStatus::Current,
            fixed: false,
            fixed_rate_to_client: None,
        }
    }
}

impl QuotationLine {
    /// Create a blank line with quantity 1 and status `current`
    pub fn new() -> Self {
        Self::default()
    }

    /// A line is complete enough to start another one once it names a
    /// vendor and has a positive quantity.
    pub fn is_complete(&self) -> bool {
        !self.vendor_id.trim().is_empty() && self.quantity > Decimal::ZERO
    }
}

/// Quotation-level inputs that backstop missing per-line values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(default)]
pub struct QuotationDefaults {
    /// Default rate of exchange
    pub usd_roe: Option<Rate>,
    /// Default markup percentage
    pub general_mu: Option<Percent>,
    /// Currency adjustment factor percentage
    pub caf: Option<Percent>,
    /// Round client rates up to the next whole unit
    pub round_up_rate_to_client: bool,
}

impl Default for QuotationDefaults {
    fn default() -> Self {
        Self {
            usd_roe: Some(FALLBACK_ROE),
            general_mu: Some(FALLBACK_MARKUP),
            caf: Some(FALLBACK_CAF),
            round_up_rate_to_client: false,
        }
    }
}

/// Editable line fields, named as the form submits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    VendorId,
    ItemName,
    Currency,
    Quantity,
    BuyRate,
    CostSum,
    Roe,
    MuPercent,
    Status,
    Fixed,
    FixedRateToClient,
}

impl LineField {
    /// Whether editing this field changes the line's derived rates
    pub fn affects_pricing(self) -> bool {
        !matches!(self, LineField::VendorId | LineField::ItemName | LineField::Currency)
    }
}

/// Editable quotation-level fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DefaultField {
    UsdRoe,
    GeneralMu,
    Caf,
    RoundUpRateToClient,
}

/// Derived rates for one line. Never stored as a source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct LinePricing {
    /// Source-currency cost the rates were derived from
    pub cost_sum: Amount,
    /// Cost converted with the resolved rate of exchange
    pub cost_usd: Amount,
    /// Markup on the converted cost
    pub mu_amount: Amount,
    /// Quoted rate before the currency adjustment factor
    pub qt_rate: Rate,
    /// Client-facing rate
    pub rate_to_client: Rate,
}

/// Why a line could not be priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum LineIssue {
    /// The resolved rate of exchange is zero
    ZeroExchangeRate,
    /// An amount exceeded the decimal range
    ArithmeticOverflow,
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineIssue::ZeroExchangeRate => f.write_str("rate of exchange is zero"),
            LineIssue::ArithmeticOverflow => f.write_str("amount out of range"),
        }
    }
}

/// Result of pricing one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LineOutcome {
    Priced(LinePricing),
    Invalid { issue: LineIssue },
}

impl LineOutcome {
    pub fn pricing(&self) -> Option<&LinePricing> {
        match self {
            LineOutcome::Priced(pricing) => Some(pricing),
            LineOutcome::Invalid { .. } => None,
        }
    }

    pub fn issue(&self) -> Option<LineIssue> {
        match self {
            LineOutcome::Priced(_) => None,
            LineOutcome::Invalid { issue } => Some(*issue),
        }
    }
}

/// A line together with its current derived rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub line: QuotationLine,
    pub outcome: LineOutcome,
}

/// A finished quotation, handed to the backend on save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationDocument {
    /// Editing session ID
    pub id: Uuid,
    /// Quotation-level defaults
    pub defaults: QuotationDefaults,
    /// Lines in entry order
    pub lines: Vec<PricedLine>,
    /// Per-status financial summary
    pub summary: QuotationSummary,
    /// When the editing session was opened
    pub created_at: DateTime<Utc>,
    /// When the document was handed off
    pub submitted_at: DateTime<Utc>,
}
