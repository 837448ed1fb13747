use serde::Serialize;
use utoipa::ToSchema;

use crate::application::ports::facility_repository::FacilityRepository;
use crate::application::use_cases::facilities::FacilityError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeletedFacility {
    pub message: String,
    pub id: i64,
}

pub struct DeleteFacility<'a, R: FacilityRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FacilityRepository + ?Sized> DeleteFacility<'a, R> {
    pub async fn execute(&self, id: i64) -> Result<DeletedFacility, FacilityError> {
        let exists = self
            .repo
            .facility_exists(id)
            .await
            .map_err(FacilityError::query("Failed to fetch facility"))?;
        if !exists {
            return Err(FacilityError::NotFound);
        }
        self.repo
            .delete_facility(id)
            .await
            .map_err(FacilityError::write("Unexpected error deleting facility"))?;
        tracing::info!(facility_id = id, "facility_deleted");
        Ok(DeletedFacility {
            message: "Facility deleted successfully".to_string(),
            id,
        })
    }
}
