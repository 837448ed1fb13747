use crate::application::ports::facility_repository::FacilityRepository;
use crate::application::services::tagging::normalize_tag_names;
use crate::application::use_cases::facilities::{FacilityError, ensure_location, fetch_facility};
use crate::domain::facilities::facility::{Facility, FacilityChanges};

/// Partial update; `None` means the field was not supplied.
#[derive(Debug, Clone, Default)]
pub struct UpdateFacilityInput {
    pub name: Option<String>,
    pub location_id: Option<i64>,
    pub tags: Option<Vec<String>>,
}

pub struct UpdateFacility<'a, R: FacilityRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FacilityRepository + ?Sized> UpdateFacility<'a, R> {
    pub async fn execute(
        &self,
        id: i64,
        input: UpdateFacilityInput,
    ) -> Result<Facility, FacilityError> {
        if input.name.is_none() && input.location_id.is_none() && input.tags.is_none() {
            return Err(FacilityError::Validation {
                message: "No fields provided to update",
                fields: Vec::new(),
                hint: Some("Provide at least one of: name, location_id, tags"),
                example: None,
            });
        }

        let exists = self
            .repo
            .facility_exists(id)
            .await
            .map_err(FacilityError::query("Failed to fetch facility"))?;
        if !exists {
            return Err(FacilityError::NotFound);
        }

        if let Some(location_id) = input.location_id {
            if location_id <= 0 {
                return Err(FacilityError::invalid("location_id must be > 0"));
            }
            ensure_location(self.repo, location_id).await?;
        }

        let name = match input.name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(FacilityError::invalid("name cannot be empty"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let changes = FacilityChanges {
            name,
            location_id: input.location_id,
            tags: input.tags.map(normalize_tag_names),
        };
        self.repo
            .update_facility(id, &changes)
            .await
            .map_err(FacilityError::write("Unexpected error updating facility"))?;
        tracing::info!(facility_id = id, "facility_updated");
        fetch_facility(self.repo, id).await
    }
}
