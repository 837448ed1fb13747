use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::facility_repository::{FacilityRepository, RepositoryError};
use crate::domain::facilities::facility::{
    FacilityChanges, FacilityRecord, Location, NewFacility, SearchFilters, TagRef,
};

#[derive(Clone)]
struct StoredFacility {
    name: String,
    location_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Default)]
struct State {
    locations: BTreeMap<i64, Location>,
    facilities: BTreeMap<i64, StoredFacility>,
    tags: BTreeMap<i64, String>,
    links: BTreeSet<(i64, i64)>,
    next_facility_id: i64,
    next_tag_id: i64,
}

impl State {
    fn resolve_tag(&mut self, name: &str) -> i64 {
        if let Some((id, _)) = self.tags.iter().find(|(_, n)| n.as_str() == name) {
            return *id;
        }
        self.next_tag_id += 1;
        self.tags.insert(self.next_tag_id, name.to_string());
        self.next_tag_id
    }

    fn record(&self, id: i64) -> Option<FacilityRecord> {
        let f = self.facilities.get(&id)?;
        let loc = self.locations.get(&f.location_id)?;
        Some(FacilityRecord {
            id,
            name: f.name.clone(),
            created_at: f.created_at,
            location_id: loc.id,
            city: loc.city.clone(),
            address: loc.address.clone(),
            zip_code: loc.zip_code.clone(),
            country_code: loc.country_code.clone(),
            phone_number: loc.phone_number.clone(),
        })
    }

    fn tags_of(&self, facility_id: i64) -> Vec<TagRef> {
        let mut tags: Vec<TagRef> = self
            .links
            .iter()
            .filter(|(f, _)| *f == facility_id)
            .filter_map(|(_, t)| {
                self.tags.get(t).map(|name| TagRef {
                    id: *t,
                    name: name.clone(),
                })
            })
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }
}

/// Repository double that stages each mutation on a copy of its state and
/// only swaps it in when every step succeeded.
#[derive(Default)]
pub struct InMemoryFacilityRepository {
    state: Mutex<State>,
    failing_tag: Option<String>,
    failing_tag_fetch: Mutex<HashSet<i64>>,
}

impl InMemoryFacilityRepository {
    pub fn new() -> Self {
        let repo = Self::default();
        repo.add_location(1, "Amsterdam", "NL");
        repo.add_location(2, "Berlin", "DE");
        repo
    }

    /// Linking a tag with this name fails mid-transaction.
    pub fn failing_on_tag(mut self, name: &str) -> Self {
        self.failing_tag = Some(name.to_string());
        self
    }

    pub fn add_location(&self, id: i64, city: &str, country_code: &str) {
        let mut state = self.state.lock().unwrap();
        state.locations.insert(
            id,
            Location {
                id,
                city: city.to_string(),
                address: format!("{city} Central 1"),
                zip_code: "1000".to_string(),
                country_code: country_code.to_string(),
                phone_number: "+00 000".to_string(),
            },
        );
    }

    pub fn fail_tag_fetch_for(&self, facility_id: i64) {
        self.failing_tag_fetch.lock().unwrap().insert(facility_id);
    }

    pub fn facility_count(&self) -> usize {
        self.state.lock().unwrap().facilities.len()
    }

    pub fn tag_rows(&self) -> Vec<String> {
        self.state.lock().unwrap().tags.values().cloned().collect()
    }

    pub fn link_count(&self, facility_id: i64) -> usize {
        let state = self.state.lock().unwrap();
        state.links.iter().filter(|(f, _)| *f == facility_id).count()
    }

    fn link_tags(
        &self,
        staged: &mut State,
        facility_id: i64,
        tags: &[String],
    ) -> Result<(), RepositoryError> {
        for name in tags {
            let tag_id = staged.resolve_tag(name);
            if self.failing_tag.as_deref() == Some(name.as_str()) {
                return Err(RepositoryError::Write {
                    context: "failed to link tag to facility",
                    source: anyhow::anyhow!("simulated link failure"),
                });
            }
            staged.links.insert((facility_id, tag_id));
        }
        Ok(())
    }
}

#[async_trait]
impl FacilityRepository for InMemoryFacilityRepository {
    async fn list_facilities(&self) -> Result<Vec<FacilityRecord>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .facilities
            .keys()
            .filter_map(|id| state.record(*id))
            .collect())
    }

    async fn get_facility(&self, id: i64) -> Result<Option<FacilityRecord>, RepositoryError> {
        Ok(self.state.lock().unwrap().record(id))
    }

    async fn facility_tags(&self, facility_id: i64) -> Result<Vec<TagRef>, RepositoryError> {
        if self.failing_tag_fetch.lock().unwrap().contains(&facility_id) {
            return Err(RepositoryError::Query {
                context: "failed to fetch facility tags",
                source: anyhow::anyhow!("simulated fetch failure"),
            });
        }
        Ok(self.state.lock().unwrap().tags_of(facility_id))
    }

    async fn facility_exists(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.state.lock().unwrap().facilities.contains_key(&id))
    }

    async fn location_exists(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.state.lock().unwrap().locations.contains_key(&id))
    }

    async fn create_facility(&self, new: &NewFacility) -> Result<i64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let mut staged = state.clone();
        staged.next_facility_id += 1;
        let id = staged.next_facility_id;
        staged.facilities.insert(
            id,
            StoredFacility {
                name: new.name.clone(),
                location_id: new.location_id,
                created_at: chrono::Utc::now(),
            },
        );
        self.link_tags(&mut staged, id, &new.tags)?;
        *state = staged;
        Ok(id)
    }

    async fn update_facility(
        &self,
        id: i64,
        changes: &FacilityChanges,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let mut staged = state.clone();
        let facility = staged
            .facilities
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &changes.name {
            facility.name = name.clone();
        }
        if let Some(location_id) = changes.location_id {
            facility.location_id = location_id;
        }
        if let Some(tags) = &changes.tags {
            staged.links.retain(|(f, _)| *f != id);
            self.link_tags(&mut staged, id, tags)?;
        }
        *state = staged;
        Ok(())
    }

    async fn delete_facility(&self, id: i64) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.links.retain(|(f, _)| *f != id);
        state
            .facilities
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn search_facilities(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<FacilityRecord>, RepositoryError> {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
                .unwrap_or(true)
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .facilities
            .keys()
            .filter_map(|id| state.record(*id))
            .filter(|r| contains(&r.name, &filters.name) && contains(&r.city, &filters.city))
            .filter(|r| {
                filters.tag.is_none()
                    || state
                        .tags_of(r.id)
                        .iter()
                        .any(|t| contains(&t.name, &filters.tag))
            })
            .collect())
    }
}
