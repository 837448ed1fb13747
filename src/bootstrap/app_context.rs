use std::sync::Arc;

use crate::application::ports::facility_repository::FacilityRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    facility_repo: Arc<dyn FacilityRepository>,
}

impl AppServices {
    pub fn new(facility_repo: Arc<dyn FacilityRepository>) -> Self {
        Self { facility_repo }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn facility_repo(&self) -> Arc<dyn FacilityRepository> {
        self.services.facility_repo.clone()
    }
}
