use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub update_interval: Duration,
    pub update_interval_max: Duration,
    pub stale_after: Duration,
    pub poll_timeout: Duration,
    pub error_threshold: u32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(60),
            update_interval_max: Duration::from_secs(600),
            stale_after: Duration::from_secs(180),
            poll_timeout: Duration::from_secs(30),
            error_threshold: 3,
        }
    }
}
