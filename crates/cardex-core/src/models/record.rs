//! Normalized extraction record and confidence buckets.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat business card record produced from a provider prediction.
///
/// `confidence` is the maximum confidence over the populated fields and is
/// `0.0` when nothing was populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub website: String,
    pub address: String,

    /// Highest per-field confidence (0.0 - 1.0).
    pub confidence: f64,

    /// Provider payload the record was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,

    /// Description of a parse failure, when the payload was malformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractedRecord {
    /// An empty record carrying a parse failure description.
    pub fn from_parse_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Mutable slot for a field category.
    pub fn field_mut(&mut self, category: FieldCategory) -> &mut String {
        match category {
            FieldCategory::Name => &mut self.name,
            FieldCategory::Emails => &mut self.email,
            FieldCategory::PhoneNumbers => &mut self.phone,
            FieldCategory::CompanyNames => &mut self.company,
            FieldCategory::JobTitles => &mut self.job_title,
            FieldCategory::Websites => &mut self.website,
            FieldCategory::Addresses => &mut self.address,
        }
    }

    /// Value stored for a field category.
    pub fn field(&self, category: FieldCategory) -> &str {
        match category {
            FieldCategory::Name => &self.name,
            FieldCategory::Emails => &self.email,
            FieldCategory::PhoneNumbers => &self.phone,
            FieldCategory::CompanyNames => &self.company,
            FieldCategory::JobTitles => &self.job_title,
            FieldCategory::Websites => &self.website,
            FieldCategory::Addresses => &self.address,
        }
    }

    /// Categories whose value is non-empty, in canonical order.
    pub fn populated_fields(&self) -> Vec<FieldCategory> {
        FieldCategory::ALL
            .into_iter()
            .filter(|c| !self.field(*c).is_empty())
            .collect()
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.populated_fields().is_empty()
    }

    /// Bucketed overall confidence.
    pub fn level(&self) -> ConfidenceLevel {
        confidence_level(self.confidence)
    }
}

/// One of the seven recognized extraction groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Name,
    Emails,
    PhoneNumbers,
    CompanyNames,
    JobTitles,
    Websites,
    Addresses,
}

impl FieldCategory {
    /// All categories in the order they are read from a prediction.
    pub const ALL: [FieldCategory; 7] = [
        FieldCategory::Name,
        FieldCategory::Emails,
        FieldCategory::PhoneNumbers,
        FieldCategory::CompanyNames,
        FieldCategory::JobTitles,
        FieldCategory::Websites,
        FieldCategory::Addresses,
    ];

    /// Key of the category in the provider prediction.
    pub fn key(self) -> &'static str {
        match self {
            FieldCategory::Name => "name",
            FieldCategory::Emails => "emails",
            FieldCategory::PhoneNumbers => "phone_numbers",
            FieldCategory::CompanyNames => "company_names",
            FieldCategory::JobTitles => "job_titles",
            FieldCategory::Websites => "websites",
            FieldCategory::Addresses => "addresses",
        }
    }

    /// Human-readable label of the output field.
    pub fn label(self) -> &'static str {
        match self {
            FieldCategory::Name => "Name",
            FieldCategory::Emails => "Email",
            FieldCategory::PhoneNumbers => "Phone",
            FieldCategory::CompanyNames => "Company",
            FieldCategory::JobTitles => "Job title",
            FieldCategory::Websites => "Website",
            FieldCategory::Addresses => "Address",
        }
    }
}

/// Coarse description of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::VeryHigh => "Very High",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::VeryLow => "Very Low",
        };
        f.write_str(label)
    }
}

/// Bucket a confidence score. Lower bounds are inclusive; NaN is `VeryLow`.
pub fn confidence_level(confidence: f64) -> ConfidenceLevel {
    if confidence >= 0.9 {
        ConfidenceLevel::VeryHigh
    } else if confidence >= 0.7 {
        ConfidenceLevel::High
    } else if confidence >= 0.5 {
        ConfidenceLevel::Medium
    } else if confidence >= 0.3 {
        ConfidenceLevel::Low
    } else {
        ConfidenceLevel::VeryLow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_confidence_boundaries() {
        assert_eq!(confidence_level(0.9), ConfidenceLevel::VeryHigh);
        assert_eq!(confidence_level(0.7), ConfidenceLevel::High);
        assert_eq!(confidence_level(0.5), ConfidenceLevel::Medium);
        assert_eq!(confidence_level(0.3), ConfidenceLevel::Low);
        assert_eq!(confidence_level(0.29999), ConfidenceLevel::VeryLow);
    }

    #[test]
    fn test_confidence_extremes() {
        assert_eq!(confidence_level(1.0), ConfidenceLevel::VeryHigh);
        assert_eq!(confidence_level(0.0), ConfidenceLevel::VeryLow);
        assert_eq!(confidence_level(f64::NAN), ConfidenceLevel::VeryLow);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(ConfidenceLevel::VeryHigh.to_string(), "Very High");
        assert_eq!(ConfidenceLevel::VeryLow.to_string(), "Very Low");
    }

    #[test]
    fn test_parse_error_record_is_empty() {
        let record = ExtractedRecord::from_parse_error("boom");
        assert!(record.is_empty());
        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.error.as_deref(), Some("boom"));
        assert!(record.raw_response.is_none());
    }

    #[test]
    fn test_camel_case_serialization() {
        let record = ExtractedRecord {
            job_title: "CTO".to_string(),
            ..ExtractedRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["jobTitle"], "CTO");
        assert!(json.get("rawResponse").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_populated_fields() {
        let mut record = ExtractedRecord::default();
        *record.field_mut(FieldCategory::Websites) = "x.com".to_string();
        *record.field_mut(FieldCategory::Name) = "Jane".to_string();
        assert_eq!(
            record.populated_fields(),
            vec![FieldCategory::Name, FieldCategory::Websites]
        );
    }
}
