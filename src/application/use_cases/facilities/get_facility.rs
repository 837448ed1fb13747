use crate::application::ports::facility_repository::FacilityRepository;
use crate::application::use_cases::facilities::{FacilityError, fetch_facility};
use crate::domain::facilities::facility::Facility;

pub struct GetFacility<'a, R: FacilityRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FacilityRepository + ?Sized> GetFacility<'a, R> {
    pub async fn execute(&self, id: i64) -> Result<Facility, FacilityError> {
        fetch_facility(self.repo, id).await
    }
}
