use std::sync::Arc;

use crate::application::ads::AdService;
use crate::application::repos::HealthRepo;

#[derive(Clone)]
pub struct ApiState {
    pub ads: Arc<AdService>,
    pub health: Arc<dyn HealthRepo>,
}
