use chrono::NaiveDate;
use serde::Deserialize;

/// Identity and particulars of the person reporting a loss.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResidentInput {
    pub full_name: String,
    #[serde(default)]
    pub birth_place: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub religion: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LostItemInput {
    pub item_name: String,
    #[serde(default)]
    pub description: String,
}

/// Payload for both creating and editing a letter.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    pub resident: ResidentInput,
    pub loss_location: String,
    pub reporting_officer_id: i32,
    #[serde(default)]
    pub approving_official_id: Option<i32>,
    pub items: Vec<LostItemInput>,
}

impl DocumentInput {
    /// Trims free-text fields so lookups by name are not defeated by stray
    /// whitespace.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let r = &mut self.resident;
        for field in [
            &mut r.full_name,
            &mut r.birth_place,
            &mut r.birth_date,
            &mut r.sex,
            &mut r.religion,
            &mut r.occupation,
            &mut r.address,
        ] {
            *field = field.trim().to_string();
        }
        self.loss_location = self.loss_location.trim().to_string();
        for item in &mut self.items {
            item.item_name = item.item_name.trim().to_string();
            item.description = item.description.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.resident.full_name.is_empty() {
            return Err("Resident name is required".to_string());
        }

        if NaiveDate::parse_from_str(&self.resident.birth_date, "%Y-%m-%d").is_err() {
            return Err(format!(
                "Invalid birth date '{}'. Expected YYYY-MM-DD",
                self.resident.birth_date
            ));
        }

        if self.loss_location.is_empty() {
            return Err("Loss location is required".to_string());
        }

        if self.reporting_officer_id <= 0 {
            return Err("A reporting officer must be selected".to_string());
        }

        if self.items.is_empty() {
            return Err("At least one lost item is required".to_string());
        }

        if self.items.iter().any(|item| item.item_name.is_empty()) {
            return Err("Every lost item needs a name".to_string());
        }

        Ok(())
    }
}
