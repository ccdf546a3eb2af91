//! Locale variants
//!
//! A [`LocaleConfig`] holds everything that differs between the French and
//! the Arabic invoice: direction, label strings, calendar, which month
//! name field to read, where currency suffixes go and which way rows are
//! ordered. The formatter is written once against this table.

mod arabic;
mod french;

use std::fmt;
use std::str::FromStr;

use medrasti_ast::{Alignment, Direction};
use serde::{Deserialize, Serialize};

use crate::error::InvoiceError;
use crate::model::{Month, PaymentMethod, PaymentStatus, SchoolClass};

pub use arabic::ARABIC;
pub use french::FRENCH;

/// A supported invoice language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::Ar];

    /// Short tag used in routes and file names
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::Ar => "ar",
        }
    }

    pub fn config(self) -> &'static LocaleConfig {
        match self {
            Locale::Fr => &FRENCH,
            Locale::Ar => &ARABIC,
        }
    }

    pub fn direction(self) -> Direction {
        self.config().direction
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr" => Ok(Locale::Fr),
            "ar" => Ok(Locale::Ar),
            other => Err(InvoiceError::UnsupportedLocale(other.to_string())),
        }
    }
}

/// Which display name a variant reads from a month object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthNameField {
    French,
    Arabic,
}

impl MonthNameField {
    pub fn select(self, month: &Month) -> &str {
        match self {
            MonthNameField::French => &month.french_name,
            MonthNameField::Arabic => &month.arabic_name,
        }
    }
}

/// Which name a variant prints for the class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassNameField {
    /// `name` only
    Name,
    /// `arabicName`, or `name` when it is empty
    ArabicOrName,
}

impl ClassNameField {
    pub fn select(self, class: &SchoolClass) -> &str {
        match self {
            ClassNameField::Name => &class.name,
            ClassNameField::ArabicOrName if class.arabic_name.is_empty() => &class.name,
            ClassNameField::ArabicOrName => &class.arabic_name,
        }
    }
}

/// Where an amount is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPlace {
    /// A month row of the payment table
    TableRow,
    /// The totals block
    Totals,
    /// The enrollment fee line
    EnrollmentFee,
}

/// Currency suffix per placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyPolicy {
    pub table_rows: Option<&'static str>,
    pub totals: Option<&'static str>,
    pub enrollment_fee: Option<&'static str>,
}

impl CurrencyPolicy {
    pub fn suffix(&self, place: AmountPlace) -> Option<&'static str> {
        match place {
            AmountPlace::TableRow => self.table_rows,
            AmountPlace::Totals => self.totals,
            AmountPlace::EnrollmentFee => self.enrollment_fee,
        }
    }
}

/// The order a label and its value appear in, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    LabelFirst,
    ValueFirst,
}

/// Abbreviated month names of a calendar, January first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    /// Locale the calendar imitates, e.g. `fr-FR`
    pub tag: &'static str,
    pub short_months: [&'static str; 12],
}

/// Static label strings of one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub invoice_title: &'static str,
    pub number_prefix: &'static str,
    pub phone_prefix: &'static str,
    pub whatsapp_prefix: &'static str,
    pub school_year_prefix: &'static str,
    pub student_section: &'static str,
    pub full_name: &'static str,
    pub matricule: &'static str,
    pub class: &'static str,
    pub payment_method: &'static str,
    pub enrollment_fee: &'static str,
    pub payments_section: &'static str,
    pub column_month: &'static str,
    pub column_total: &'static str,
    pub column_paid: &'static str,
    pub column_status: &'static str,
    pub total_amount: &'static str,
    pub paid_amount: &'static str,
    pub remaining_amount: &'static str,
    pub generated_on_prefix: &'static str,
    pub generated_notice: &'static str,
    pub file_word: &'static str,
}

/// User-facing messages for failures and progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub missing_identifier: &'static str,
    pub fetch_failed: &'static str,
    pub no_data: &'static str,
    pub generation_failed: &'static str,
    pub unsupported_locale: &'static str,
    pub idle: &'static str,
    pub fetching: &'static str,
    pub generating: &'static str,
    pub downloading: &'static str,
    pub embedding_ready: &'static str,
    pub complete: &'static str,
}

/// Everything that varies between the invoice languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConfig {
    pub locale: Locale,
    pub direction: Direction,
    pub labels: Labels,
    pub messages: Messages,
    pub calendar: Calendar,
    pub month_name: MonthNameField,
    pub class_name: ClassNameField,
    pub currency: CurrencyPolicy,
    /// Order of label and value in the information rows and totals
    pub label_side: LabelSide,
    /// Payment table columns read right to left
    pub mirrored_table: bool,
    /// The header repeats the creation date under the invoice number
    pub header_date: bool,
    /// The WhatsApp line prints the phone number instead of the WhatsApp one
    pub whatsapp_shows_phone: bool,
    /// Information values and table cells are set in bold
    pub bold_values: bool,
    pub footer_align: Alignment,
    pub status_labels: &'static [(&'static str, &'static str)],
    pub method_labels: &'static [(&'static str, &'static str)],
}

impl LocaleConfig {
    /// Localized payment status, or the raw value when it is not in the table
    pub fn status_label<'a>(&self, status: &'a PaymentStatus) -> &'a str {
        lookup(self.status_labels, status.as_str())
    }

    /// Localized payment method, or the raw value when it is not in the table
    pub fn method_label<'a>(&self, method: &'a PaymentMethod) -> &'a str {
        lookup(self.method_labels, method.as_str())
    }

    pub fn month_name<'a>(&self, month: &'a Month) -> &'a str {
        self.month_name.select(month)
    }

    pub fn class_name<'a>(&self, class: &'a SchoolClass) -> &'a str {
        self.class_name.select(class)
    }
}

fn lookup<'a>(table: &'static [(&'static str, &'static str)], raw: &'a str) -> &'a str {
    match table.iter().find(|(key, _)| *key == raw) {
        Some(&(_, label)) => label,
        None => raw,
    }
}
