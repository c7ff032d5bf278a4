//! Domain documents touched by the built-in preparers

use crate::store::Entity;
use serde::{Deserialize, Serialize};

/// Element nested inside a region or hospital document that carries its own id
pub trait SubElement {
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
}

macro_rules! sub_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SubElement for $ty {
                fn id(&self) -> Option<&str> {
                    self.id.as_deref()
                }

                fn set_id(&mut self, id: String) {
                    self.id = Some(id);
                }
            }
        )*
    };
}

macro_rules! entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> Option<&str> {
                    self.id.as_deref()
                }

                fn set_id(&mut self, id: String) {
                    self.id = Some(id);
                }
            }
        )*
    };
}

/// Urgency category of a region or hospital
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub max_wait_list_stay: i32,
    #[serde(default)]
    pub min_points_required: i32,
    #[serde(default)]
    pub possible_points: i32,
}

/// Hospital department
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub max_simultaneous_sessions: i32,
}

/// Hospital ward
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ward {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub beds_count: i32,
}

/// Specialist type, attached to a department by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub department_name: String,
    #[serde(default)]
    pub label: String,
}

sub_element!(UrgencyCategory, Department, Ward, SpecialistType);

/// Region document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub urgency_categories: Option<Vec<UrgencyCategory>>,
    #[serde(default)]
    pub interval_type: Option<String>,
    #[serde(default)]
    pub first_interval_start: i64,
}

impl Region {
    /// Interval types accepted for `interval_type`
    pub const INTERVAL_TYPES: [&'static str; 6] = [
        "weekly",
        "bi-weekly",
        "monthly",
        "quarterly",
        "half-yearly",
        "yearly",
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Hospital document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub wards: Option<Vec<Ward>>,
    #[serde(default)]
    pub departments: Option<Vec<Department>>,
    #[serde(default)]
    pub specialist_types: Option<Vec<SpecialistType>>,
    #[serde(default)]
    pub urgency_categories: Option<Vec<UrgencyCategory>>,
    #[serde(default)]
    pub icu_bed_count: i32,
    #[serde(default)]
    pub theatre_sessions_per_day: i32,
    #[serde(default)]
    pub session_duration: i32,
    #[serde(default)]
    pub theatre_count: i32,
}

impl Hospital {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

entity!(Region, Hospital);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_region_uses_camel_case_keys() {
        let json = r#"{
            "name": "North",
            "intervalType": "monthly",
            "firstIntervalStart": 1420070400000,
            "urgencyCategories": [{"label": "Cat 1", "maxWaitListStay": 30}]
        }"#;

        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region.interval_type.as_deref(), Some("monthly"));
        assert_eq!(region.first_interval_start, 1_420_070_400_000);
        let categories = region.urgency_categories.unwrap();
        assert_eq!(categories[0].max_wait_list_stay, 30);
        assert!(categories[0].id.is_none());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_missing_id_is_not_serialized() {
        let value = serde_json::to_value(Ward {
            name: "7A".to_string(),
            ..Ward::default()
        })
        .unwrap();

        assert!(value.get("id").is_none());
        assert_eq!(value["bedsCount"], 0);
    }
}
