//! HTTP endpoints, one GET route per domain.
//!
//! Handlers are stateless: every request queries the provider again and formats
//! the result. The only shared state is the provider handle and the deployment
//! settings.

pub mod error;
pub mod handlers;

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::domain::Domain;
use crate::metrics::{DiskAggregation, SlotPolicy};
use crate::system::MetricsProvider;

pub use error::ApiError;

/// Per-deployment formatting choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerSettings {
    pub disk_aggregation: DiskAggregation,
    pub slot_policy: SlotPolicy,
}

#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn MetricsProvider>,
    settings: ServerSettings,
}

pub fn router(provider: Arc<dyn MetricsProvider>, settings: ServerSettings) -> Router {
    let state = AppState { provider, settings };

    Router::new()
        .route("/health", get(handlers::health))
        .route(Domain::Process.path(), get(handlers::processes))
        .route(Domain::Cpu.path(), get(handlers::cpu))
        .route(Domain::Memory.path(), get(handlers::memory))
        .route(Domain::Disk.path(), get(handlers::disk))
        .route(Domain::Gpu.path(), get(handlers::gpu))
        // casing used by older dashboards
        .route("/GPUInfo", get(handlers::gpu))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "metrics server listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("metrics server stopped");
    Ok(())
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::system::ProviderError;
    use crate::system::snapshot::{
        CpuIdentity, CpuLoad, CpuSpeed, CpuTemperature, DiskDevice, FsUsage, GpuController,
        MemoryModule, MemoryTotals, ProcessEntry, ProcessList,
    };

    #[derive(Default)]
    struct FakeProvider {
        processes: usize,
        gpus: Vec<GpuController>,
        broken_disk: bool,
        broken_temperature: bool,
        broken_processes: bool,
        broken_speed: bool,
        broken_load: bool,
    }

    impl MetricsProvider for FakeProvider {
        fn processes(&self) -> Result<ProcessList, ProviderError> {
            if self.broken_processes {
                return Err(ProviderError::unavailable(Domain::Process, "ps failed"));
            }
            let list: Vec<ProcessEntry> = (0..self.processes)
                .map(|i| ProcessEntry {
                    pid: i as u32 + 1,
                    name: format!("worker-{i}"),
                    cpu_percent: Some(i as f64),
                    ..ProcessEntry::default()
                })
                .collect();
            Ok(ProcessList {
                all: list.len(),
                list,
            })
        }

        fn cpu(&self) -> Result<CpuIdentity, ProviderError> {
            Ok(CpuIdentity {
                brand: Some("Test CPU".into()),
                logical_cores: 2,
                ..CpuIdentity::default()
            })
        }

        fn cpu_speed(&self) -> Result<CpuSpeed, ProviderError> {
            if self.broken_speed {
                return Err(ProviderError::unavailable(Domain::Cpu, "no cpufreq"));
            }
            Ok(CpuSpeed {
                min: 1.0,
                max: 2.0,
                avg: 1.5,
                cores: vec![1.0, 2.0],
            })
        }

        fn current_load(&self) -> Result<CpuLoad, ProviderError> {
            if self.broken_load {
                return Err(ProviderError::unavailable(Domain::Cpu, "no /proc/stat"));
            }
            Ok(CpuLoad {
                current: 42.0,
                ..CpuLoad::default()
            })
        }

        fn cpu_temperature(&self) -> Result<CpuTemperature, ProviderError> {
            if self.broken_temperature {
                return Err(ProviderError::unavailable(Domain::Cpu, "no sensors"));
            }
            Ok(CpuTemperature {
                main: Some(55.0),
                max: Some(61.0),
                cores: vec![],
            })
        }

        fn mem(&self) -> Result<MemoryTotals, ProviderError> {
            Ok(MemoryTotals {
                total: 1_000_000_000,
                free: 750_000_000,
                used: 250_000_000,
                ..MemoryTotals::default()
            })
        }

        fn mem_layout(&self) -> Result<Vec<MemoryModule>, ProviderError> {
            Ok(vec![MemoryModule::default(), MemoryModule::default()])
        }

        fn disk_layout(&self) -> Result<Vec<DiskDevice>, ProviderError> {
            Ok(Vec::new())
        }

        fn fs_size(&self) -> Result<Vec<FsUsage>, ProviderError> {
            if self.broken_disk {
                return Err(ProviderError::unavailable(Domain::Disk, "df failed"));
            }
            Ok(vec![FsUsage {
                mount: "/home".into(),
                size: 1 << 40,
                used: 1 << 39,
                ..FsUsage::default()
            }])
        }

        fn graphics(&self) -> Result<Vec<GpuController>, ProviderError> {
            Ok(self.gpus.clone())
        }
    }

    async fn get(provider: FakeProvider, path: &str) -> (StatusCode, serde_json::Value) {
        let app = router(Arc::new(provider), ServerSettings::default());
        let response = app
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn process_list_is_capped_and_sorted() {
        let provider = FakeProvider {
            processes: 30,
            ..FakeProvider::default()
        };
        let (status, body) = get(provider, "/ProcessInfo").await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 20);
        assert_eq!(list[0]["cpu"], 29.0);
        assert_eq!(list[0]["power"], "Moderate");
        assert_eq!(list[0]["threads"], "N/A");
    }

    #[tokio::test]
    async fn cpu_survives_missing_temperature() {
        let provider = FakeProvider {
            broken_temperature: true,
            ..FakeProvider::default()
        };
        let (status, body) = get(provider, "/CPUInfo").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["temperature"].is_null());
        assert_eq!(body["historicalData"][0]["utilization"], 42.0);
        assert_eq!(body["totalprocess"], 0);
    }

    #[tokio::test]
    async fn cpu_includes_temperature_when_available() {
        let (_, body) = get(FakeProvider::default(), "/CPUInfo").await;
        assert_eq!(body["temperature"]["mainCelsius"], 55.0);
    }

    #[tokio::test]
    async fn memory_echoes_bytes() {
        let (status, body) = get(FakeProvider::default(), "/MemoryInfo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalmemory"], 1_000_000_000u64);
        assert_eq!(body["usedmemory"], 250_000_000u64);
        assert_eq!(body["slots"], 2);
    }

    #[tokio::test]
    async fn disk_without_primary_volume_reports_zero() {
        let (status, body) = get(FakeProvider::default(), "/DiskInfo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["capacity"], "0.0");
        assert_eq!(body["usedGB"], "0.0");
        assert_eq!(body["storagePercent"], "0%");
        assert_eq!(body["type"], "Unknown");
    }

    #[tokio::test]
    async fn disk_failure_is_500() {
        let provider = FakeProvider {
            broken_disk: true,
            ..FakeProvider::default()
        };
        let (status, body) = get(provider, "/DiskInfo").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to get disk info" }));
    }

    #[tokio::test]
    async fn process_failure_is_500_without_partial_list() {
        let provider = FakeProvider {
            processes: 5,
            broken_processes: true,
            ..FakeProvider::default()
        };
        let (status, body) = get(provider, "/ProcessInfo").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Error getting processes" }));
    }

    #[tokio::test]
    async fn cpu_fails_when_any_required_call_fails() {
        let broken = [
            FakeProvider {
                broken_processes: true,
                ..FakeProvider::default()
            },
            FakeProvider {
                broken_speed: true,
                ..FakeProvider::default()
            },
            FakeProvider {
                broken_load: true,
                ..FakeProvider::default()
            },
        ];
        for provider in broken {
            let (status, body) = get(provider, "/CPUInfo").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, serde_json::json!({ "error": "Failed to get CPU info" }));
        }
    }

    #[tokio::test]
    async fn no_gpu_is_404() {
        let (status, body) = get(FakeProvider::default(), "/GpuInfo").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "No GPU controller found" }));
    }

    #[tokio::test]
    async fn gpu_alias_route() {
        let provider = FakeProvider {
            gpus: vec![GpuController::default()],
            ..FakeProvider::default()
        };
        let (status, body) = get(provider, "/GPUInfo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["memory"]["dedicated"], "0.2/3.9 GB");
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = get(FakeProvider::default(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
