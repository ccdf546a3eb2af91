//! Invoice record as delivered by the billing service
//!
//! Every scalar is decoded leniently: a missing or `null` field, or a
//! number where a string was expected, falls back to a default instead of
//! failing. Only the presence of the month rows, the enrollment and its
//! student is checked, and that check happens at format time. An amount
//! that is present but cannot be represented exactly is a decode error.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A complete invoice payload for one student and enrollment period
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(rename = "ref", default, deserialize_with = "lenient_string")]
    pub reference: String,
    /// Creation timestamp as sent by the service (ISO 8601)
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "lenient_option")]
    pub school: Option<School>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub enrollement: Option<Enrollment>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub month_invoice_relations: Option<Vec<MonthPaymentRow>>,
}

impl InvoiceRecord {
    /// Decode a service response body
    ///
    /// Returns `Ok(None)` when the body is `null` or an empty object. Any
    /// other non-object body is an error.
    pub fn from_value(value: Value) -> serde_json::Result<Option<Self>> {
        match &value {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            Value::Object(_) => serde_json::from_value(value).map(Some),
            _ => Err(de::Error::custom(format!(
                "invoice body must be a JSON object, got {value}"
            ))),
        }
    }

    /// Decode a raw response body, treating an empty body as no data
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Option<Self>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Self::from_value(serde_json::from_slice(body)?)
    }

    /// Month rows, or an empty slice when the collection is absent
    pub fn rows(&self) -> &[MonthPaymentRow] {
        self.month_invoice_relations.as_deref().unwrap_or(&[])
    }

    /// Column sums over all month rows, `None` when a sum overflows
    pub fn totals(&self) -> Option<Totals> {
        Totals::of(self.rows())
    }
}

/// School identity carried by the record
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub arabic_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, alias = "phone", deserialize_with = "lenient_string")]
    pub tel: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub whatsapp: String,
    #[serde(default, alias = "logo", deserialize_with = "lenient_string")]
    pub logo_url: String,
}

/// Enrollment the invoice bills against
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub enrollement_price: Decimal,
    #[serde(default, deserialize_with = "lenient_option")]
    pub student: Option<Student>,
    #[serde(default, deserialize_with = "lenient_default")]
    pub school_class: SchoolClass,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub matricule: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub arabic_name: String,
}

/// Dues and payments for one month
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPaymentRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub paid_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub remaining_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: PaymentStatus,
    #[serde(default, deserialize_with = "lenient_default")]
    pub enrollement_payment: EnrollmentPayment,
}

impl MonthPaymentRow {
    pub fn month(&self) -> &Month {
        &self.enrollement_payment.month
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EnrollmentPayment {
    #[serde(default, deserialize_with = "lenient_default")]
    pub month: Month,
}

/// A calendar month with its display name in each supported language
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Month {
    #[serde(default, deserialize_with = "lenient_string")]
    pub french_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub arabic_name: String,
}

/// Sums of the amount columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub total: Decimal,
    pub paid: Decimal,
    pub remaining: Decimal,
}

impl Totals {
    /// Recompute the sums from scratch
    pub fn of(rows: &[MonthPaymentRow]) -> Option<Self> {
        rows.iter().try_fold(Totals::default(), |acc, row| {
            Some(Totals {
                total: acc.total.checked_add(row.total_amount)?,
                paid: acc.paid.checked_add(row.paid_amount)?,
                remaining: acc.remaining.checked_add(row.remaining_amount)?,
            })
        })
    }
}

/// Payment state of a month row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    PartiallyPaid,
    /// A value this layer does not know, kept verbatim
    Other(String),
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Paid,
        PaymentStatus::Unpaid,
        PaymentStatus::PartiallyPaid,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::PartiallyPaid => "PARTIALLY_PAID",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Other(String::new())
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PAID" => PaymentStatus::Paid,
            "UNPAID" => PaymentStatus::Unpaid,
            "PARTIALLY_PAID" => PaymentStatus::PartiallyPaid,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the invoice was settled
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Cash,
    Bankily,
    Masrivi,
    Sedad,
    Click,
    BimBank,
    MoovMoney,
    /// A value this layer does not know, kept verbatim
    Other(String),
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Cash,
        PaymentMethod::Bankily,
        PaymentMethod::Masrivi,
        PaymentMethod::Sedad,
        PaymentMethod::Click,
        PaymentMethod::BimBank,
        PaymentMethod::MoovMoney,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Bankily => "BANKILY",
            PaymentMethod::Masrivi => "MASRIVI",
            PaymentMethod::Sedad => "SEDAD",
            PaymentMethod::Click => "CLICK",
            PaymentMethod::BimBank => "BIM_BANK",
            PaymentMethod::MoovMoney => "MOOV_MONEY",
            PaymentMethod::Other(raw) => raw,
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Other(String::new())
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "CASH" => PaymentMethod::Cash,
            "BANKILY" => PaymentMethod::Bankily,
            "MASRIVI" => PaymentMethod::Masrivi,
            "SEDAD" => PaymentMethod::Sedad,
            "CLICK" => PaymentMethod::Click,
            "BIM_BANK" => PaymentMethod::BimBank,
            "MOOV_MONEY" => PaymentMethod::MoovMoney,
            _ => PaymentMethod::Other(raw),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any scalar as text; `null`, arrays and objects become the empty string
fn lenient_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    Ok(T::from(text))
}

/// Numbers or numeric strings
///
/// Missing, `null`, blank and non-scalar values are zero. A number or
/// string that does not fit a `Decimal` is an error.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return Ok(Decimal::ZERO),
    };
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }
    parse_decimal(&text)
        .ok_or_else(|| de::Error::custom(format!("amount `{text}` is not a representable decimal")))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// JSON shape a nested value must have to be decoded
trait Nested: DeserializeOwned {
    fn fits(value: &Value) -> bool {
        value.is_object()
    }
}

impl Nested for School {}
impl Nested for Enrollment {}
impl Nested for Student {}
impl Nested for SchoolClass {}
impl Nested for MonthPaymentRow {}
impl Nested for EnrollmentPayment {}
impl Nested for Month {}

impl<T: Nested> Nested for Vec<T> {
    fn fits(value: &Value) -> bool {
        value.is_array()
    }
}

/// A nested value that may be missing, `null` or of the wrong shape
///
/// Errors from inside a value of the right shape are kept.
fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Nested,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value) if T::fits(&value) => serde_json::from_value(value)
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

fn lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Nested + Default,
{
    lenient_option(deserializer).map(Option::unwrap_or_default)
}
