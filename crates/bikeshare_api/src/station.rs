use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bikeshare_core::{
    FieldError, Station, StationError, StationField, StationRepository,
    UpdateOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: usize,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        fields: Vec::new(),
    };
    (status, Json(body)).into_response()
}

fn station_error_to_response(error: StationError) -> Response {
    let status = match &error {
        StationError::InvalidFields(_) | StationError::IncompleteNewStation => {
            StatusCode::BAD_REQUEST
        }
        StationError::NotFound { .. } => StatusCode::NOT_FOUND,
        StationError::IdentifiersExhausted => StatusCode::INSUFFICIENT_STORAGE,
    };
    let fields = match &error {
        StationError::InvalidFields(invalid) => invalid.errors().to_vec(),
        _ => Vec::new(),
    };
    let body = ErrorResponse {
        error: error.to_string(),
        fields,
    };
    (status, Json(body)).into_response()
}

fn not_found(id: u32) -> Response {
    station_error_to_response(StationError::NotFound { id })
}

/// List every station
pub async fn list_stations(State(repository): State<Arc<StationRepository>>) -> Json<Vec<Station>> {
    tracing::info!("Listing stations");
    Json(repository.read_all())
}

/// Create a station from a complete payload
pub async fn create_station(
    State(repository): State<Arc<StationRepository>>,
    payload: Result<Json<Station>, JsonRejection>,
) -> Response {
    let Json(station) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match repository.add(station, false) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => station_error_to_response(error),
    }
}

/// Import a list of stations, all or nothing
pub async fn import_stations(
    State(repository): State<Arc<StationRepository>>,
    payload: Result<Json<Vec<Station>>, JsonRejection>,
) -> Response {
    let Json(stations) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match repository.add_batch(stations, false) {
        Ok(added) => (
            StatusCode::CREATED,
            Json(ImportResponse {
                imported: added.len(),
            }),
        )
            .into_response(),
        Err(error) => station_error_to_response(error),
    }
}

/// Get a single station
pub async fn get_station(
    State(repository): State<Arc<StationRepository>>,
    id: Result<Path<u32>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid station identifier"),
    };
    match repository.read(id) {
        Some(station) => Json(station).into_response(),
        None => not_found(id),
    }
}

/// Replace, create or partially update the station at the given identifier
pub async fn update_station(
    State(repository): State<Arc<StationRepository>>,
    id: Result<Path<u32>, PathRejection>,
    payload: Result<Json<Station>, JsonRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid station identifier"),
    };
    let Json(mut station) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    if station.id.is_some_and(|body_id| body_id != id) {
        let field = FieldError::new(
            StationField::Identifier.as_str(),
            "does not match the station in the path",
        );
        return match field {
            Ok(field) => station_error_to_response(StationError::InvalidFields(field.into())),
            Err(error) => error_response(StatusCode::BAD_REQUEST, error),
        };
    }
    station.id = Some(id);

    match repository.update(station) {
        Ok(UpdateOutcome::Created(stored)) => (StatusCode::CREATED, Json(stored)).into_response(),
        Ok(UpdateOutcome::Replaced(_) | UpdateOutcome::Merged(_)) => {
            StatusCode::NO_CONTENT.into_response()
        }
        Err(error) => station_error_to_response(error),
    }
}

/// Delete a station
pub async fn delete_station(
    State(repository): State<Arc<StationRepository>>,
    id: Result<Path<u32>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid station identifier"),
    };
    match repository.delete(id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(id),
    }
}
