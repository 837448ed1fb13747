use crate::application::ports::facility_repository::FacilityRepository;
use crate::application::use_cases::facilities::{FacilityError, assemble_all};
use crate::domain::facilities::facility::{Facility, SearchFilters};

pub struct SearchFacilities<'a, R: FacilityRepository + ?Sized> {
    pub repo: &'a R,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<'a, R: FacilityRepository + ?Sized> SearchFacilities<'a, R> {
    // A facility matched through one tag is still returned with all of its tags.
    pub async fn execute(&self, filters: SearchFilters) -> Result<Vec<Facility>, FacilityError> {
        let filters = SearchFilters {
            name: non_blank(filters.name),
            tag: non_blank(filters.tag),
            city: non_blank(filters.city),
        };
        if filters.is_empty() {
            return Err(FacilityError::Validation {
                message: "Provide at least one search parameter: name, tag, or city",
                fields: Vec::new(),
                hint: None,
                example: Some("/facilities/search?name=neo&city=ams&tag=veg"),
            });
        }
        let records = self
            .repo
            .search_facilities(&filters)
            .await
            .map_err(FacilityError::query("Search query failed"))?;
        Ok(assemble_all(self.repo, records).await)
    }
}
