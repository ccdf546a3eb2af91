//! Configuration settings
//!
//! Settings are loaded from `medrasti.toml`:
//!
//! ```toml
//! [api]
//! base_url = "https://api.medrasti.example"
//! timeout_secs = 30
//!
//! [school]
//! name = "École Medrasti"
//! arabic_name = "مدرسة مدرستي"
//! logo_url = "https://cdn.medrasti.example/logo.png"
//!
//! [fonts]
//! dir = "fonts/Tajawal"
//!
//! [output]
//! dir = "downloads"
//! ```

use std::path::{Path, PathBuf};

use medrasti_ast::{FontFamily, FontWeight};
use serde::{Deserialize, Serialize};

use crate::model::School;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "MEDRASTI_API_URL";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub school: SchoolSettings,
    pub fonts: FontSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        self
    }
}

/// Billing service endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

/// School identity printed in the invoice header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolSettings {
    pub name: String,
    pub arabic_name: String,
    pub address: Option<String>,
    pub tel: Option<String>,
    pub whatsapp: Option<String>,
    pub logo_url: Option<String>,
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            name: "École Medrasti".to_string(),
            arabic_name: "مدرسة مدرستي".to_string(),
            address: Some("Nouakchott, Mauritanie".to_string()),
            tel: Some("+222 1234 5678".to_string()),
            whatsapp: Some("+222 1234 5678".to_string()),
            logo_url: None,
        }
    }
}

impl SchoolSettings {
    /// Overlay the non-empty fields a record carries
    pub fn merged_with(&self, school: Option<&School>) -> SchoolSettings {
        let Some(school) = school else {
            return self.clone();
        };

        fn pick(record: &str, configured: &str) -> String {
            if record.trim().is_empty() {
                configured.to_string()
            } else {
                record.to_string()
            }
        }

        fn pick_opt(record: &str, configured: &Option<String>) -> Option<String> {
            if record.trim().is_empty() {
                configured.clone()
            } else {
                Some(record.to_string())
            }
        }

        SchoolSettings {
            name: pick(&school.name, &self.name),
            arabic_name: pick(&school.arabic_name, &self.arabic_name),
            address: pick_opt(&school.address, &self.address),
            tel: pick_opt(&school.tel, &self.tel),
            whatsapp: pick_opt(&school.whatsapp, &self.whatsapp),
            logo_url: pick_opt(&school.logo_url, &self.logo_url),
        }
    }
}

/// Embedded font family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub family: String,
    pub dir: PathBuf,
    pub regular: String,
    pub medium: String,
    pub bold: String,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "Tajawal".to_string(),
            dir: PathBuf::from("fonts/Tajawal"),
            regular: "Tajawal-Regular.ttf".to_string(),
            medium: "Tajawal-Medium.ttf".to_string(),
            bold: "Tajawal-Bold.ttf".to_string(),
        }
    }
}

impl FontSettings {
    /// The family with its three faces resolved against `dir`
    pub fn family(&self) -> FontFamily {
        let path = |file: &str| -> String { self.dir.join(file).display().to_string() };
        FontFamily::new(&self.family)
            .with_face(FontWeight::Regular, path(&self.regular))
            .with_face(FontWeight::Medium, path(&self.medium))
            .with_face(FontWeight::Bold, path(&self.bold))
    }
}

/// Where downloaded files go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl OutputSettings {
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
