use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub xui_enabled: bool,
    pub login_target: String,
    pub logout_target: String,
    pub profile_target: String,
}

#[derive(Deserialize)]
pub struct XuiToggle {
    pub enabled: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let targets = state.filter.targets();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        xui_enabled: state.flag.enabled(),
        login_target: targets.login().to_string(),
        logout_target: targets.logout().to_string(),
        profile_target: targets.profile().to_string(),
    })
}

pub async fn put_xui(
    State(state): State<AppState>,
    Json(toggle): Json<XuiToggle>,
) -> Json<serde_json::Value> {
    state.flag.set(toggle.enabled);
    tracing::info!(enabled = toggle.enabled, "XUI flag updated via admin API");

    Json(serde_json::json!({ "enabled": toggle.enabled }))
}
