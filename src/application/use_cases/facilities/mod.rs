pub mod create_facility;
pub mod delete_facility;
pub mod get_facility;
pub mod list_facilities;
pub mod search_facilities;
pub mod update_facility;

use crate::application::ports::facility_repository::{FacilityRepository, RepositoryError};
use crate::application::services::assembler::assemble_facility;
use crate::domain::facilities::facility::{Facility, FacilityRecord, TagRef};

#[derive(thiserror::Error, Debug)]
pub enum FacilityError {
    #[error("{message}")]
    Validation {
        message: &'static str,
        fields: Vec<(&'static str, &'static str)>,
        hint: Option<&'static str>,
        example: Option<&'static str>,
    },
    #[error("facility not found")]
    NotFound,
    #[error("{message}")]
    Query {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
    #[error("{message}: {source}")]
    Write {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl FacilityError {
    pub fn invalid(message: &'static str) -> Self {
        FacilityError::Validation {
            message,
            fields: Vec::new(),
            hint: None,
            example: None,
        }
    }

    pub(crate) fn query(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::NotFound => FacilityError::NotFound,
            source => FacilityError::Query { message, source },
        }
    }

    pub(crate) fn write(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::NotFound => FacilityError::NotFound,
            source => FacilityError::Write { message, source },
        }
    }
}

/// Tags for one facility; a failed fetch degrades to an empty list.
pub(crate) async fn load_tags<R: FacilityRepository + ?Sized>(
    repo: &R,
    facility_id: i64,
) -> Vec<TagRef> {
    match repo.facility_tags(facility_id).await {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(facility_id, error = %e, "facility_tags_fetch_failed");
            Vec::new()
        }
    }
}

pub(crate) async fn assemble_all<R: FacilityRepository + ?Sized>(
    repo: &R,
    records: Vec<FacilityRecord>,
) -> Vec<Facility> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let tags = load_tags(repo, record.id).await;
        out.push(assemble_facility(record, tags));
    }
    out
}

pub(crate) async fn fetch_facility<R: FacilityRepository + ?Sized>(
    repo: &R,
    id: i64,
) -> Result<Facility, FacilityError> {
    let record = repo
        .get_facility(id)
        .await
        .map_err(FacilityError::query("Failed to fetch facility"))?
        .ok_or(FacilityError::NotFound)?;
    let tags = load_tags(repo, record.id).await;
    Ok(assemble_facility(record, tags))
}

pub(crate) async fn ensure_location<R: FacilityRepository + ?Sized>(
    repo: &R,
    location_id: i64,
) -> Result<(), FacilityError> {
    let exists = repo
        .location_exists(location_id)
        .await
        .map_err(FacilityError::query("Failed to fetch location"))?;
    if exists {
        Ok(())
    } else {
        Err(FacilityError::invalid("Invalid location_id"))
    }
}
