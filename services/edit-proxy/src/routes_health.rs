use axum::{extract::State, Json};
use serde::Serialize;

use crate::provider::ProviderInfo;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub upstream: Option<ProviderInfo>,
}

pub async fn health(State(st): State<SharedState>) -> Json<HealthResp> {
    Json(HealthResp {
        status: "ok",
        upstream: st.media.as_ref().map(|m| m.info()),
    })
}
