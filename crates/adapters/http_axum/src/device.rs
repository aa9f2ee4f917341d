//! `/device` handler: the command endpoint of the controller contract.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use smartspace_domain::command::DeviceCommand;
use smartspace_domain::device::{Device, Level, PowerState};
use smartspace_domain::error::SmartSpaceError;
use smartspace_domain::id::VenueId;

use crate::error::ApiError;
use crate::state::MockState;

/// Query string of a device command.
#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    pub venue: String,
    pub name: String,
    pub state: Option<String>,
    pub value: Option<String>,
}

impl DeviceQuery {
    fn command(&self) -> Result<DeviceCommand, ApiError> {
        match (&self.state, &self.value) {
            (Some(state), None) => PowerState::from_str(state)
                .map(DeviceCommand::SetState)
                .map_err(|err| ApiError::BadRequest(err.to_string())),
            (None, Some(value)) => Level::from_str(value)
                .map(DeviceCommand::SetValue)
                .map_err(|err| ApiError::from(SmartSpaceError::from(err))),
            _ => Err(ApiError::BadRequest(
                "expected exactly one of `state` or `value`".to_string(),
            )),
        }
    }
}

/// `GET /device`
pub async fn handle(
    State(state): State<MockState>,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<Device>, ApiError> {
    let venue_id = VenueId::new(query.venue.as_str())
        .map_err(|err| ApiError::from(SmartSpaceError::from(err)))?;
    let command = query.command()?;
    let device = state.controller.apply(&venue_id, &query.name, command)?;
    Ok(Json(device))
}
