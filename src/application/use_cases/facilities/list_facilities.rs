use crate::application::ports::facility_repository::FacilityRepository;
use crate::application::use_cases::facilities::{FacilityError, assemble_all};
use crate::domain::facilities::facility::Facility;

pub struct ListFacilities<'a, R: FacilityRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FacilityRepository + ?Sized> ListFacilities<'a, R> {
    pub async fn execute(&self) -> Result<Vec<Facility>, FacilityError> {
        let records = self
            .repo
            .list_facilities()
            .await
            .map_err(FacilityError::query("Failed to fetch facilities"))?;
        Ok(assemble_all(self.repo, records).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::facility_repository::FacilityRepository;
    use crate::domain::facilities::facility::NewFacility;
    use crate::test_support::InMemoryFacilityRepository;

    fn new_facility(name: &str, tags: &[&str]) -> NewFacility {
        NewFacility {
            name: name.into(),
            location_id: 1,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn lists_in_id_order_with_tags() {
        let repo = InMemoryFacilityRepository::new();
        repo.create_facility(&new_facility("B", &["spa"])).await.unwrap();
        repo.create_facility(&new_facility("A", &[])).await.unwrap();

        let items = ListFacilities { repo: &repo }.execute().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "B");
        assert_eq!(items[0].tags[0].name, "spa");
        assert!(items[1].tags.is_empty());
    }

    #[tokio::test]
    async fn tag_fetch_failure_degrades_single_row() {
        let repo = InMemoryFacilityRepository::new();
        let first = repo
            .create_facility(&new_facility("First", &["pool"]))
            .await
            .unwrap();
        repo.create_facility(&new_facility("Second", &["pool"]))
            .await
            .unwrap();
        repo.fail_tag_fetch_for(first);

        let items = ListFacilities { repo: &repo }.execute().await.unwrap();

        assert!(items[0].tags.is_empty());
        assert_eq!(items[1].tags.len(), 1);
    }
}
