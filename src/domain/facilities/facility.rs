use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Location {
    pub id: i64,
    pub city: String,
    pub address: String,
    pub zip_code: String,
    pub country_code: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
}

/// Facility as exposed over HTTP: the facility row, its location and its tags
/// ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub location: Location,
    pub tags: Vec<TagRef>,
}

/// A facility joined with its location, before tags are attached.
#[derive(Debug, Clone)]
pub struct FacilityRecord {
    pub id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub location_id: i64,
    pub city: String,
    pub address: String,
    pub zip_code: String,
    pub country_code: String,
    pub phone_number: String,
}

#[derive(Debug, Clone)]
pub struct NewFacility {
    pub name: String,
    pub location_id: i64,
    pub tags: Vec<String>,
}

// `tags: Some(vec![])` clears every link; `None` leaves them untouched.
#[derive(Debug, Clone, Default)]
pub struct FacilityChanges {
    pub name: Option<String>,
    pub location_id: Option<i64>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub city: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.tag.is_none() && self.city.is_none()
    }
}
