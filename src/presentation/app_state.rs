// Application state for HTTP handlers
use crate::application::trend_service::TrendService;

#[derive(Clone)]
pub struct AppState {
    pub trend_service: TrendService,
    pub default_hours: u32,
}
