use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dosage form / dispensing unit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOfMeasurement {
    #[serde(rename = "TBL")]
    Tablet,
    #[serde(rename = "CAP")]
    Capsule,
    #[serde(rename = "SYR")]
    Syrup,
    #[serde(rename = "ONT")]
    Ointment,
    #[serde(rename = "OTH")]
    Other,
}

impl Default for UnitOfMeasurement {
    fn default() -> Self {
        UnitOfMeasurement::Tablet
    }
}

/// Therapeutic category codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryType {
    #[serde(rename = "ANT")]
    Antibiotic,
    #[serde(rename = "ANL")]
    Analgesic,
    #[serde(rename = "APR")]
    Antipyretic,
    #[serde(rename = "VIT")]
    Vitamin,
    #[serde(rename = "SUP")]
    Supplement,
    #[serde(rename = "OTH")]
    Other,
}

impl Default for CategoryType {
    fn default() -> Self {
        CategoryType::Other
    }
}

/// A medicine record in the catalog.
///
/// This is both the persisted document shape and the API payload; cached
/// entries hold exactly this serialization, so a cache hit is byte-equal to
/// a fresh read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub generic_name: String,
    pub description: String,
    pub price: f64,
    pub batch_number: String,
    pub stock_quantity: u32,
    pub unit_of_measurement: UnitOfMeasurement,
    pub category: CategoryType,
    pub manufacturer: Option<String>,
    pub prescription_required: bool,
    pub is_available: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Field values a search query could have matched this record by;
    /// mutations invalidate the search cache keyed by these.
    pub fn searchable_terms(&self) -> [&str; 2] {
        [self.name.as_str(), self.generic_name.as_str()]
    }
}

/// Payload for creating a medicine
#[derive(Debug, Deserialize)]
pub struct CreateMedicine {
    pub name: String,
    pub generic_name: String,
    pub description: String,
    pub price: f64,
    pub batch_number: String,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub unit_of_measurement: UnitOfMeasurement,
    #[serde(default)]
    pub category: CategoryType,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub prescription_required: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

impl CreateMedicine {
    pub fn into_medicine(self) -> Medicine {
        let now = Utc::now();
        Medicine {
            id: Uuid::new_v4(),
            name: self.name,
            generic_name: self.generic_name,
            description: self.description,
            price: self.price,
            batch_number: self.batch_number,
            stock_quantity: self.stock_quantity,
            unit_of_measurement: self.unit_of_measurement,
            category: self.category,
            manufacturer: self.manufacturer,
            prescription_required: self.prescription_required,
            is_available: self.is_available,
            is_featured: self.is_featured,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update payload; absent fields keep their stored values
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMedicine {
    pub name: Option<String>,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub batch_number: Option<String>,
    pub stock_quantity: Option<u32>,
    pub unit_of_measurement: Option<UnitOfMeasurement>,
    pub category: Option<CategoryType>,
    pub manufacturer: Option<Option<String>>,
    pub prescription_required: Option<bool>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

impl UpdateMedicine {
    /// Merge this partial update into an existing record, bumping
    /// `updated_at`.
    pub fn apply_to(self, medicine: &mut Medicine) {
        if let Some(name) = self.name {
            medicine.name = name;
        }
        if let Some(generic_name) = self.generic_name {
            medicine.generic_name = generic_name;
        }
        if let Some(description) = self.description {
            medicine.description = description;
        }
        if let Some(price) = self.price {
            medicine.price = price;
        }
        if let Some(batch_number) = self.batch_number {
            medicine.batch_number = batch_number;
        }
        if let Some(stock_quantity) = self.stock_quantity {
            medicine.stock_quantity = stock_quantity;
        }
        if let Some(unit) = self.unit_of_measurement {
            medicine.unit_of_measurement = unit;
        }
        if let Some(category) = self.category {
            medicine.category = category;
        }
        if let Some(manufacturer) = self.manufacturer {
            medicine.manufacturer = manufacturer;
        }
        if let Some(prescription_required) = self.prescription_required {
            medicine.prescription_required = prescription_required;
        }
        if let Some(is_available) = self.is_available {
            medicine.is_available = is_available;
        }
        if let Some(is_featured) = self.is_featured {
            medicine.is_featured = is_featured;
        }
        medicine.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Medicine {
        CreateMedicine {
            name: "Paracetamol Tablet".to_string(),
            generic_name: "Paracetamol".to_string(),
            description: "Pain reliever and fever reducer".to_string(),
            price: 4.99,
            batch_number: "B123".to_string(),
            stock_quantity: 100,
            unit_of_measurement: UnitOfMeasurement::Tablet,
            category: CategoryType::Analgesic,
            manufacturer: Some("Acme Pharma".to_string()),
            prescription_required: false,
            is_available: true,
            is_featured: false,
        }
        .into_medicine()
    }

    #[test]
    fn enum_codes_use_stored_abbreviations() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["unit_of_measurement"], "TBL");
        assert_eq!(json["category"], "ANL");
    }

    #[test]
    fn serde_round_trip_is_value_equal() {
        let medicine = sample();
        let json = serde_json::to_string(&medicine).unwrap();
        let back: Medicine = serde_json::from_str(&json).unwrap();
        assert_eq!(serde_json::to_value(&medicine).unwrap(), serde_json::to_value(&back).unwrap());
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let mut medicine = sample();
        let before = medicine.clone();

        let update = UpdateMedicine {
            price: Some(11.99),
            ..Default::default()
        };
        update.apply_to(&mut medicine);

        assert_eq!(medicine.price, 11.99);
        assert_eq!(medicine.name, before.name);
        assert_eq!(medicine.batch_number, before.batch_number);
        assert!(medicine.updated_at >= before.updated_at);
    }

    #[test]
    fn searchable_terms_are_name_and_generic_name() {
        let medicine = sample();
        assert_eq!(medicine.searchable_terms(), ["Paracetamol Tablet", "Paracetamol"]);
    }
}
