use std::sync::Arc;

use crate::health::HealthProber;
use crate::observability::Metrics;
use crate::resolver::MetadataResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<MetadataResolver>,
    pub prober: Arc<HealthProber>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(resolver: MetadataResolver, prober: HealthProber) -> Self {
        Self {
            resolver: Arc::new(resolver),
            prober: Arc::new(prober),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
