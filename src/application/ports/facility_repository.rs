use async_trait::async_trait;

use crate::domain::facilities::facility::{
    FacilityChanges, FacilityRecord, NewFacility, SearchFilters, TagRef,
};

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("facility not found")]
    NotFound,
    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("{context}: {source}")]
    Write {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("could not create or retrieve tag: {name}")]
    TagResolution { name: String },
}

#[async_trait]
pub trait FacilityRepository: Send + Sync {
    async fn list_facilities(&self) -> Result<Vec<FacilityRecord>, RepositoryError>;

    async fn get_facility(&self, id: i64) -> Result<Option<FacilityRecord>, RepositoryError>;

    // Tags ordered by name.
    async fn facility_tags(&self, facility_id: i64) -> Result<Vec<TagRef>, RepositoryError>;

    async fn facility_exists(&self, id: i64) -> Result<bool, RepositoryError>;

    async fn location_exists(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Inserts the facility and links every tag in one transaction; returns the new id.
    async fn create_facility(&self, new: &NewFacility) -> Result<i64, RepositoryError>;

    /// Applies every supplied change in one transaction.
    async fn update_facility(
        &self,
        id: i64,
        changes: &FacilityChanges,
    ) -> Result<(), RepositoryError>;

    /// Removes the tag links, then the facility row, in one transaction.
    async fn delete_facility(&self, id: i64) -> Result<(), RepositoryError>;

    // Distinct facilities ordered by id.
    async fn search_facilities(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<FacilityRecord>, RepositoryError>;
}
