use crate::application::ports::facility_repository::FacilityRepository;
use crate::application::services::tagging::normalize_tag_names;
use crate::application::use_cases::facilities::{FacilityError, ensure_location, fetch_facility};
use crate::domain::facilities::facility::{Facility, NewFacility};

#[derive(Debug, Clone, Default)]
pub struct CreateFacilityInput {
    pub name: String,
    pub location_id: i64,
    pub tags: Vec<String>,
}

pub struct CreateFacility<'a, R: FacilityRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FacilityRepository + ?Sized> CreateFacility<'a, R> {
    pub async fn execute(&self, input: CreateFacilityInput) -> Result<Facility, FacilityError> {
        let name = input.name.trim().to_string();
        if name.is_empty() || input.location_id <= 0 {
            return Err(FacilityError::Validation {
                message: "Validation failed",
                fields: vec![
                    ("name", "required (string)"),
                    ("location_id", "required (number > 0)"),
                ],
                hint: None,
                example: None,
            });
        }
        ensure_location(self.repo, input.location_id).await?;

        let new = NewFacility {
            name,
            location_id: input.location_id,
            tags: normalize_tag_names(&input.tags),
        };
        let id = self
            .repo
            .create_facility(&new)
            .await
            .map_err(FacilityError::write("Unexpected error creating facility"))?;
        tracing::info!(facility_id = id, tags = new.tags.len(), "facility_created");
        fetch_facility(self.repo, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::facilities::get_facility::GetFacility;
    use crate::test_support::InMemoryFacilityRepository;

    fn input(name: &str, location_id: i64, tags: &[&str]) -> CreateFacilityInput {
        CreateFacilityInput {
            name: name.into(),
            location_id,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn tag_names(f: &Facility) -> Vec<&str> {
        f.tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[tokio::test]
    async fn stores_deduplicated_tags_sorted_by_name() {
        let repo = InMemoryFacilityRepository::new();
        let created = CreateFacility { repo: &repo }
            .execute(input("Downtown Gym", 1, &["yoga", " crossfit", "yoga"]))
            .await
            .unwrap();

        let fetched = GetFacility { repo: &repo }.execute(created.id).await.unwrap();
        assert_eq!(fetched.name, "Downtown Gym");
        assert_eq!(fetched.location.id, 1);
        assert_eq!(tag_names(&fetched), vec!["crossfit", "yoga"]);
    }

    #[tokio::test]
    async fn shared_tag_names_reuse_one_tag_row() {
        let repo = InMemoryFacilityRepository::new();
        let uc = CreateFacility { repo: &repo };
        let a = uc.execute(input("A", 1, &["vegan", "pool"])).await.unwrap();
        let b = uc.execute(input("B", 2, &["vegan"])).await.unwrap();

        assert_eq!(repo.tag_rows(), vec!["vegan".to_string(), "pool".to_string()]);
        let shared_a = a.tags.iter().find(|t| t.name == "vegan").unwrap();
        assert_eq!(shared_a.id, b.tags[0].id);
    }

    #[tokio::test]
    async fn rejects_blank_name_and_missing_location() {
        let repo = InMemoryFacilityRepository::new();
        let uc = CreateFacility { repo: &repo };

        let err = uc.execute(input("   ", 1, &[])).await.unwrap_err();
        assert!(matches!(err, FacilityError::Validation { message: "Validation failed", .. }));

        let err = uc.execute(input("Gym", 0, &[])).await.unwrap_err();
        assert!(matches!(err, FacilityError::Validation { ref fields, .. } if fields.len() == 2));
        assert_eq!(repo.facility_count(), 0);
    }

    #[tokio::test]
    async fn unknown_location_is_a_validation_error() {
        let repo = InMemoryFacilityRepository::new();
        let err = CreateFacility { repo: &repo }
            .execute(input("Gym", 99, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, FacilityError::Validation { message: "Invalid location_id", .. }));
    }

    #[tokio::test]
    async fn failed_tag_link_leaves_nothing_behind() {
        let repo = InMemoryFacilityRepository::new().failing_on_tag("broken");
        let err = CreateFacility { repo: &repo }
            .execute(input("Gym", 1, &["fine", "broken"]))
            .await
            .unwrap_err();

        assert!(matches!(err, FacilityError::Write { .. }));
        assert_eq!(repo.facility_count(), 0);
        assert_eq!(repo.link_count(1), 0);
        assert!(repo.tag_rows().is_empty());
    }
}
