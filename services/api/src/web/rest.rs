//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the schedule REST API and the master
//! definition for the OpenAPI specification.
//!
//! Every successful mutation answers with the full, updated schedule so the
//! client never has to guess ids that the store regenerated.

use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use schedule_core::{Day, Event, EventUpdate, NewEvent, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        get_schedule_handler,
        add_day_handler,
        add_event_handler,
        update_event_handler,
        delete_event_handler,
        delete_day_handler,
        initialize_handler,
    ),
    components(
        schemas(
            DayResponse,
            EventResponse,
            CreateDayRequest,
            CreateEventRequest,
            UpdateEventRequest,
            ErrorResponse,
            RootResponse
        )
    ),
    tags(
        (
            name = "Schedule API",
            description = "Manage the days and events of the conference schedule."
        )
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One day of the schedule as sent to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayResponse {
    pub id: String,
    pub day: String,
    pub date: String,
    pub events: Vec<EventResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub time: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "hasOutline", default, skip_serializing_if = "Option::is_none")]
    pub has_outline: Option<bool>,
}

impl From<Day> for DayResponse {
    fn from(day: Day) -> Self {
        Self {
            id: day.id,
            day: day.day,
            date: day.date,
            events: day.events.into_iter().map(EventResponse::from).collect(),
        }
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            time: event.time,
            name: event.name,
            link: event.link,
            has_outline: event.has_outline,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateDayRequest {
    pub day: String,
    pub date: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub day_id: String,
    pub time: String,
    pub name: String,
    pub link: Option<String>,
    #[serde(rename = "hasOutline")]
    pub has_outline: Option<bool>,
}

/// Fields left out of the body keep their current value.
#[derive(Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub time: Option<String>,
    pub name: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "hasOutline")]
    pub has_outline: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

type ScheduleResult = Result<Json<Vec<DayResponse>>, (StatusCode, Json<ErrorResponse>)>;

//=========================================================================================
// Error Mapping
//=========================================================================================

fn error_response(
    status: StatusCode,
    detail: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn store_error_response(e: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        StoreError::Validation(_) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        StoreError::DayNotFound(_) | StoreError::EventNotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
        StoreError::Storage(ref port_error) => {
            error!("Schedule storage failed: {:?}", port_error);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save the schedule")
        }
    }
}

fn rejection_response(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn schedule_response(days: Vec<Day>) -> Json<Vec<DayResponse>> {
    Json(days.into_iter().map(DayResponse::from).collect())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Youth Conference Schedule API".to_string(),
    })
}

/// Return the whole schedule.
#[utoipa::path(
    get,
    path = "/api/schedule",
    responses((status = 200, description = "The full schedule", body = [DayResponse]))
)]
pub async fn get_schedule_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<DayResponse>> {
    schedule_response(app_state.store.get_schedule().await)
}

/// Append a day to the end of the schedule.
///
/// The new day's id is its position, so ids are always "1", "2", ….
#[utoipa::path(
    post,
    path = "/api/schedule/day",
    request_body = CreateDayRequest,
    responses(
        (status = 200, description = "Day added", body = [DayResponse]),
        (status = 400, description = "Missing or empty field", body = ErrorResponse),
        (status = 500, description = "The schedule could not be saved", body = ErrorResponse)
    )
)]
pub async fn add_day_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateDayRequest>, JsonRejection>,
) -> ScheduleResult {
    let Json(req) = payload.map_err(rejection_response)?;
    app_state
        .store
        .add_day(&req.day, &req.date)
        .await
        .map(schedule_response)
        .map_err(store_error_response)
}

#[utoipa::path(
    post,
    path = "/api/schedule/event",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event added", body = [DayResponse]),
        (status = 400, description = "Missing or empty field", body = ErrorResponse),
        (status = 404, description = "Day not found", body = ErrorResponse),
        (status = 500, description = "The schedule could not be saved", body = ErrorResponse)
    )
)]
pub async fn add_event_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> ScheduleResult {
    let Json(req) = payload.map_err(rejection_response)?;
    let new_event = NewEvent {
        time: req.time,
        name: req.name,
        link: req.link,
        has_outline: req.has_outline,
    };
    app_state
        .store
        .add_event(&req.day_id, new_event)
        .await
        .map(schedule_response)
        .map_err(store_error_response)
}

/// Update some fields of an event.
///
/// Renaming an event regenerates its id; clients must re-read it from the
/// returned schedule.
#[utoipa::path(
    put,
    path = "/api/schedule/event/{day_id}/{event_id}",
    request_body = UpdateEventRequest,
    params(
        ("day_id" = String, Path, description = "Id of the day holding the event."),
        ("event_id" = String, Path, description = "Current id of the event.")
    ),
    responses(
        (status = 200, description = "Event updated", body = [DayResponse]),
        (status = 400, description = "Empty field", body = ErrorResponse),
        (status = 404, description = "Day or event not found", body = ErrorResponse),
        (status = 500, description = "The schedule could not be saved", body = ErrorResponse)
    )
)]
pub async fn update_event_handler(
    State(app_state): State<Arc<AppState>>,
    Path((day_id, event_id)): Path<(String, String)>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> ScheduleResult {
    let Json(req) = payload.map_err(rejection_response)?;
    let update = EventUpdate {
        time: req.time,
        name: req.name,
        link: req.link,
        has_outline: req.has_outline,
    };
    app_state
        .store
        .update_event(&day_id, &event_id, update)
        .await
        .map(schedule_response)
        .map_err(store_error_response)
}

#[utoipa::path(
    delete,
    path = "/api/schedule/event/{day_id}/{event_id}",
    params(
        ("day_id" = String, Path, description = "Id of the day holding the event."),
        ("event_id" = String, Path, description = "Id of the event to remove.")
    ),
    responses(
        (status = 200, description = "Event removed", body = [DayResponse]),
        (status = 404, description = "Day or event not found", body = ErrorResponse),
        (status = 500, description = "The schedule could not be saved", body = ErrorResponse)
    )
)]
pub async fn delete_event_handler(
    State(app_state): State<Arc<AppState>>,
    Path((day_id, event_id)): Path<(String, String)>,
) -> ScheduleResult {
    app_state
        .store
        .delete_event(&day_id, &event_id)
        .await
        .map(schedule_response)
        .map_err(store_error_response)
}

/// Remove a day and all of its events.
///
/// Every later day moves up one position and gets a new id.
#[utoipa::path(
    delete,
    path = "/api/schedule/day/{day_id}",
    params(("day_id" = String, Path, description = "Id of the day to remove.")),
    responses(
        (status = 200, description = "Day removed", body = [DayResponse]),
        (status = 404, description = "Day not found", body = ErrorResponse),
        (status = 500, description = "The schedule could not be saved", body = ErrorResponse)
    )
)]
pub async fn delete_day_handler(
    State(app_state): State<Arc<AppState>>,
    Path(day_id): Path<String>,
) -> ScheduleResult {
    app_state
        .store
        .delete_day(&day_id)
        .await
        .map(schedule_response)
        .map_err(store_error_response)
}

/// Replace the whole schedule with the built-in sample data.
#[utoipa::path(
    post,
    path = "/api/schedule/initialize",
    responses(
        (status = 200, description = "Sample schedule installed", body = [DayResponse]),
        (status = 500, description = "The schedule could not be saved", body = ErrorResponse)
    )
)]
pub async fn initialize_handler(State(app_state): State<Arc<AppState>>) -> ScheduleResult {
    app_state
        .store
        .initialize_sample_data()
        .await
        .map(schedule_response)
        .map_err(store_error_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;
    use crate::web::router;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        Router,
    };
    use async_trait::async_trait;
    use schedule_core::sample::sample_schedule;
    use schedule_core::{PortError, PortResult, ScheduleRepository, ScheduleStore};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    /// Loads fine but refuses every write.
    struct ReadOnlyRepository;

    #[async_trait]
    impl ScheduleRepository for ReadOnlyRepository {
        async fn load(&self) -> PortResult<Vec<Day>> {
            Ok(sample_schedule())
        }

        async fn save(&self, _days: &[Day]) -> PortResult<()> {
            Err(PortError::Io("permission denied".to_string()))
        }
    }

    async fn app_over(repo: Arc<dyn ScheduleRepository>) -> Router {
        let store = ScheduleStore::load(repo).await.unwrap();
        router(Arc::new(AppState::new(store)))
    }

    async fn app_with(days: Vec<Day>) -> Router {
        app_over(Arc::new(InMemoryRepository::with_days(days))).await
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_banner() {
        let app = app_with(Vec::new()).await;

        let (status, body) = send(&app, Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = parse(&body);
        assert_eq!(json["message"], "Youth Conference Schedule API");
    }

    #[tokio::test]
    async fn test_get_schedule_returns_stored_document() {
        let app = app_with(sample_schedule()).await;

        let (status, body) = send(&app, Method::GET, "/api/schedule", None).await;

        assert_eq!(status, StatusCode::OK);
        let days: Vec<DayResponse> = parse(&body);
        assert_eq!(days.len(), 3);
        assert_eq!(days[1].events[1].id, "2-bible-study");
        assert_eq!(days[1].events[1].has_outline, Some(true));
    }

    #[tokio::test]
    async fn test_add_day_and_event() {
        let app = app_with(Vec::new()).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/schedule/day",
            Some(r#"{"day": "Day 1", "date": "MONDAY"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let days: Vec<DayResponse> = parse(&body);
        assert_eq!(days[0].id, "1");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/schedule/event",
            Some(r#"{"day_id": "1", "time": "9:00", "name": "Bible Study", "hasOutline": true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let days: Vec<DayResponse> = parse(&body);
        assert_eq!(days[0].events[0].id, "1-bible-study");
        assert_eq!(days[0].events[0].has_outline, Some(true));
        assert_eq!(days[0].events[0].link, None);
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_requests() {
        let app = app_with(Vec::new()).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/schedule/day",
            Some(r#"{"day": "", "date": "MONDAY"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = parse(&body);
        assert!(error.detail.contains("day"));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/schedule/day",
            Some(r#"{"date": "MONDAY"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_event_to_missing_day_is_not_found() {
        let app = app_with(sample_schedule()).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/schedule/event",
            Some(r#"{"day_id": "42", "time": "9:00", "name": "Talk"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ErrorResponse = parse(&body);
        assert!(error.detail.contains("42"));

        let (_, body) = send(&app, Method::GET, "/api/schedule", None).await;
        let days: Vec<DayResponse> = parse(&body);
        assert_eq!(days.len(), 3);
        assert_eq!(days.iter().map(|d| d.events.len()).sum::<usize>(), 6);
    }

    #[tokio::test]
    async fn test_update_event_renames_and_keeps_other_fields() {
        let app = app_with(sample_schedule()).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/schedule/event/2/2-p-u-s-h",
            Some(r#"{"name": "Morning Prayer"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let days: Vec<DayResponse> = parse(&body);
        let event = &days[1].events[0];
        assert_eq!(event.id, "2-morning-prayer");
        assert_eq!(event.time, "5:30am - 7:00am (GMT +1)");
        assert_eq!(
            event.link.as_deref(),
            Some("https://www.youtube.com/live/rnCSGMtxhSc?feature=shared")
        );

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/schedule/event/2/2-p-u-s-h",
            Some(r#"{"time": "6:00am"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_event_and_day() {
        let app = app_with(sample_schedule()).await;

        let (status, body) = send(
            &app,
            Method::DELETE,
            "/api/schedule/event/1/1-arrival-of-participants",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let days: Vec<DayResponse> = parse(&body);
        assert_eq!(days[0].events.len(), 1);
        assert_eq!(days[0].events[0].id, "1-welcome-programme-movie-premiere");

        let (status, body) = send(&app, Method::DELETE, "/api/schedule/day/2", None).await;
        assert_eq!(status, StatusCode::OK);
        let days: Vec<DayResponse> = parse(&body);
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].id, "2");
        assert_eq!(days[1].events[1].id, "2-symposium-aspire");

        let (status, _) = send(&app, Method::DELETE, "/api/schedule/day/3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_installs_sample_schedule() {
        let app = app_with(Vec::new()).await;

        let (status, first) = send(&app, Method::POST, "/api/schedule/initialize", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send(&app, Method::POST, "/api/schedule/initialize", None).await;

        assert_eq!(first, second);
        let days: Vec<DayResponse> = parse(&first);
        assert_eq!(days.len(), 3);
        assert_eq!(days[2].events[1].id, "3-symposium-aspire");
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error_and_changes_nothing() {
        let app = app_over(Arc::new(ReadOnlyRepository)).await;

        let (status, body) = send(&app, Method::DELETE, "/api/schedule/day/1", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = parse(&body);
        assert_eq!(error.detail, "Failed to save the schedule");

        let (_, body) = send(&app, Method::GET, "/api/schedule", None).await;
        let days: Vec<DayResponse> = parse(&body);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day, "Day 1");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = app_with(Vec::new()).await;

        let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = parse(&body);
        assert!(json["paths"]["/api/schedule/event/{day_id}/{event_id}"].is_object());
    }
}
