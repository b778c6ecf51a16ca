use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use super::AppState;
use super::error::ApiError;
use crate::domain::Domain;
use crate::metrics::{
    CpuInfo, CpuReadings, DiskInfo, GpuInfo, MemoryInfo, ProcessSample, format_cpu, format_disk,
    format_gpu, format_memory, format_processes,
};
use crate::system::{MetricsProvider, ProviderError};

/// Runs one provider call on the blocking pool.
async fn blocking<T, F>(
    provider: &Arc<dyn MetricsProvider>,
    domain: Domain,
    call: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn MetricsProvider) -> Result<T, ProviderError> + Send + 'static,
{
    let provider = Arc::clone(provider);
    tokio::task::spawn_blocking(move || call(provider.as_ref()))
        .await
        .map_err(ProviderError::from)
        .and_then(|result| result)
        .map_err(|source| ApiError::provider(domain, source))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn processes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProcessSample>>, ApiError> {
    let list = blocking(&state.provider, Domain::Process, |p| p.processes()).await?;
    Ok(Json(format_processes(list)))
}

pub async fn cpu(State(state): State<AppState>) -> Result<Json<CpuInfo>, ApiError> {
    let provider = &state.provider;
    let (required, temperature) = tokio::join!(
        async {
            tokio::try_join!(
                blocking(provider, Domain::Cpu, |p| p.processes()),
                blocking(provider, Domain::Cpu, |p| p.cpu()),
                blocking(provider, Domain::Cpu, |p| p.cpu_speed()),
                blocking(provider, Domain::Cpu, |p| p.current_load()),
            )
        },
        blocking(provider, Domain::Cpu, |p| p.cpu_temperature()),
    );
    let (processes, identity, speed, load) = required?;
    let temperature = temperature
        .inspect_err(|err| debug!(error = %err, "temperature unavailable"))
        .ok();

    let readings = CpuReadings {
        total_processes: processes.all,
        identity,
        speed,
        load,
        temperature,
    };
    Ok(Json(format_cpu(readings, Utc::now().timestamp_millis())))
}

pub async fn memory(State(state): State<AppState>) -> Result<Json<MemoryInfo>, ApiError> {
    let provider = &state.provider;
    let (totals, modules) = tokio::try_join!(
        blocking(provider, Domain::Memory, |p| p.mem()),
        blocking(provider, Domain::Memory, |p| p.mem_layout()),
    )?;
    Ok(Json(format_memory(
        totals,
        modules,
        state.settings.slot_policy,
    )))
}

pub async fn disk(State(state): State<AppState>) -> Result<Json<DiskInfo>, ApiError> {
    let provider = &state.provider;
    let (layout, fs) = tokio::try_join!(
        blocking(provider, Domain::Disk, |p| p.disk_layout()),
        blocking(provider, Domain::Disk, |p| p.fs_size()),
    )?;
    Ok(Json(format_disk(
        &layout,
        &fs,
        state.settings.disk_aggregation,
    )))
}

pub async fn gpu(State(state): State<AppState>) -> Result<Json<GpuInfo>, ApiError> {
    let controllers = blocking(&state.provider, Domain::Gpu, |p| p.graphics()).await?;
    format_gpu(&controllers).map(Json).ok_or(ApiError::NoDevice)
}
