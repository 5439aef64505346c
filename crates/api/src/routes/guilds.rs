//! Guild CRUD handlers
//!
//! Each handler records one `guild_operations_total` sample and one
//! `db_queries_total` sample per store call.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use byte_domain::{CreateGuildRequest, GuildSchema, UpdateGuildRequest};
use byte_infra::observability::metrics::{ApiMetrics, OperationStatus};
use tracing::{field, info, instrument, Span};
use uuid::Uuid;

use crate::context::AppState;
use crate::error::HandlerError;

type HandlerResult<T> = Result<T, HandlerError>;

fn record<T>(metrics: &ApiMetrics, operation: &str, result: &HandlerResult<T>) {
    let status = if result.is_ok() { OperationStatus::Success } else { OperationStatus::Error };
    metrics.record_guild_operation(operation, status);
}

/// `POST /api/guilds`
#[instrument(skip_all, fields(guild_id = field::Empty))]
pub async fn create_guild(
    State(state): State<AppState>,
    payload: Result<Json<CreateGuildRequest>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<GuildSchema>)> {
    let result = async {
        let Json(request) = payload?;
        Span::current().record("guild_id", request.guild_id);
        request.validate()?;
        state.metrics.record_db_query("insert");
        let guild = state.guilds.create(request).await?;
        info!(id = %guild.id, "guild created");
        Ok::<_, HandlerError>((StatusCode::CREATED, Json(guild)))
    }
    .await;
    record(&state.metrics, "create", &result);
    result
}

/// `GET /api/guilds/{guild_id}`
#[instrument(skip(state))]
pub async fn get_guild(
    State(state): State<AppState>,
    Path(guild_id): Path<i64>,
) -> HandlerResult<Json<GuildSchema>> {
    state.metrics.record_db_query("select");
    let result = match state.guilds.get_by_guild_id(guild_id).await {
        Ok(Some(guild)) => Ok(Json(guild)),
        Ok(None) => Err(HandlerError::NotFound(format!("Guild {guild_id} not found"))),
        Err(err) => Err(err.into()),
    };
    record(&state.metrics, "get", &result);
    result
}

/// `PATCH /api/guilds/{id}`
#[instrument(skip(state, payload))]
pub async fn update_guild(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateGuildRequest>, JsonRejection>,
) -> HandlerResult<Json<GuildSchema>> {
    let result = async {
        let Json(update) = payload?;
        update.validate()?;
        state.metrics.record_db_query("update");
        let guild = state.guilds.update(id, update).await?;
        info!("guild updated");
        Ok::<_, HandlerError>(Json(guild))
    }
    .await;
    record(&state.metrics, "update", &result);
    result
}

/// `DELETE /api/guilds/{id}`
#[instrument(skip(state))]
pub async fn delete_guild(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<StatusCode> {
    state.metrics.record_db_query("delete");
    let result = state.guilds.delete(id).await.map(|()| StatusCode::NO_CONTENT).map_err(HandlerError::from);
    if result.is_ok() {
        info!("guild deleted");
    }
    record(&state.metrics, "delete", &result);
    result
}
