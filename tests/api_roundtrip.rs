use std::sync::Arc;

use hostwatch::client::{ApiClient, ClientError, DomainSnapshot, MetricsSource};
use hostwatch::domain::Domain;
use hostwatch::server::{self, ServerSettings, router};
use hostwatch::system::snapshot::{
    CpuIdentity, CpuLoad, CpuSpeed, CpuTemperature, DiskDevice, FsUsage, GpuController,
    MemoryModule, MemoryTotals, ProcessEntry, ProcessList,
};
use hostwatch::system::{MetricsProvider, ProviderError};
use tokio::sync::oneshot;

const GB: u64 = 1024 * 1024 * 1024;

struct StubProvider {
    gpus: Vec<GpuController>,
}

impl MetricsProvider for StubProvider {
    fn processes(&self) -> Result<ProcessList, ProviderError> {
        let list = vec![
            ProcessEntry {
                pid: 1,
                name: "init".into(),
                cpu_percent: Some(0.1),
                ..ProcessEntry::default()
            },
            ProcessEntry {
                pid: 812,
                name: "renderer".into(),
                cpu_percent: Some(74.5),
                threads: Some(31),
                priority: Some(20),
                ..ProcessEntry::default()
            },
        ];
        Ok(ProcessList { all: 2, list })
    }

    fn cpu(&self) -> Result<CpuIdentity, ProviderError> {
        Ok(CpuIdentity {
            manufacturer: Some("AMD".into()),
            brand: Some("Ryzen 7 5800X".into()),
            logical_cores: 16,
            physical_cores: Some(8),
            ..CpuIdentity::default()
        })
    }

    fn cpu_speed(&self) -> Result<CpuSpeed, ProviderError> {
        Ok(CpuSpeed {
            min: 3.8,
            max: 4.7,
            avg: 4.1,
            cores: vec![3.8, 4.7],
        })
    }

    fn current_load(&self) -> Result<CpuLoad, ProviderError> {
        Ok(CpuLoad {
            current: 12.5,
            ..CpuLoad::default()
        })
    }

    fn cpu_temperature(&self) -> Result<CpuTemperature, ProviderError> {
        Err(ProviderError::unavailable(Domain::Cpu, "no sensors"))
    }

    fn mem(&self) -> Result<MemoryTotals, ProviderError> {
        Ok(MemoryTotals {
            total: 16 * GB,
            free: 12 * GB,
            used: 4 * GB,
            available: 12 * GB,
            ..MemoryTotals::default()
        })
    }

    fn mem_layout(&self) -> Result<Vec<MemoryModule>, ProviderError> {
        Ok(vec![MemoryModule {
            size: 16 * GB,
            ..MemoryModule::default()
        }])
    }

    fn disk_layout(&self) -> Result<Vec<DiskDevice>, ProviderError> {
        Ok(vec![DiskDevice {
            name: "sda".into(),
            kind: Some("SSD".into()),
            size: 256 * GB,
            ..DiskDevice::default()
        }])
    }

    fn fs_size(&self) -> Result<Vec<FsUsage>, ProviderError> {
        Ok(vec![FsUsage {
            fs: "/dev/sda1".into(),
            mount: "/".into(),
            size: 256 * GB,
            used: 64 * GB,
            available: 192 * GB,
        }])
    }

    fn graphics(&self) -> Result<Vec<GpuController>, ProviderError> {
        Ok(self.gpus.clone())
    }
}

struct Running {
    client: ApiClient,
    stop: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl Running {
    async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await.unwrap().unwrap();
    }
}

async fn spawn_server(provider: StubProvider) -> Running {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(provider), ServerSettings::default());
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(server::run(listener, app, async {
        let _ = stopped.await;
    }));
    let client = ApiClient::new(format!("http://{addr}"), None).unwrap();
    Running {
        client,
        stop: Some(stop),
        task,
    }
}

#[tokio::test]
async fn every_domain_decodes_over_http() {
    let running = spawn_server(StubProvider {
        gpus: vec![GpuController {
            model: Some("Radeon RX 6600".into()),
            vendor: Some("AMD".into()),
            memory_total_mb: Some(8192.0),
            memory_used_mb: Some(2048.0),
            utilization_gpu: Some(40.0),
            ..GpuController::default()
        }],
    })
    .await;
    let client = &running.client;

    match client.fetch(Domain::Process).await.unwrap() {
        DomainSnapshot::Process(list) => {
            assert_eq!(list.len(), 2);
            assert_eq!(list[0].name, "renderer");
            assert_eq!(list[0].threads.known(), Some(&31));
            assert_eq!(list[1].threads.known(), None);
        }
        other => panic!("unexpected {other:?}"),
    }

    match client.fetch(Domain::Cpu).await.unwrap() {
        DomainSnapshot::Cpu(info) => {
            assert_eq!(info.brand, "Ryzen 7 5800X");
            assert_eq!(info.physical_cores, 8);
            assert!(info.temperature.is_none());
            assert_eq!(info.utilization(), 12.5);
        }
        other => panic!("unexpected {other:?}"),
    }

    match client.fetch(Domain::Memory).await.unwrap() {
        DomainSnapshot::Memory(info) => {
            assert_eq!(info.totalmemory, 16 * GB);
            assert_eq!(info.used_percent(), Some(25.0));
            assert_eq!(info.slots, 1);
        }
        other => panic!("unexpected {other:?}"),
    }

    match client.fetch(Domain::Disk).await.unwrap() {
        DomainSnapshot::Disk(info) => {
            assert_eq!(info.capacity, "256.0");
            assert_eq!(info.used_gb, "64.0");
            assert_eq!(info.storage_percent, "25.0%");
            assert_eq!(info.free, 192.0);
            assert_eq!(info.kind, "SSD");
        }
        other => panic!("unexpected {other:?}"),
    }

    match client.fetch(Domain::Gpu).await.unwrap() {
        DomainSnapshot::Gpu(info) => {
            assert_eq!(info.model, "Radeon RX 6600");
            assert_eq!(info.utilization, "40%");
            assert_eq!(info.usage_percent, 25.0);
        }
        other => panic!("unexpected {other:?}"),
    }

    running.shutdown().await;
}

#[tokio::test]
async fn missing_gpu_is_a_status_error() {
    let running = spawn_server(StubProvider { gpus: Vec::new() }).await;

    let err = running.client.fetch(Domain::Gpu).await.unwrap_err();
    match err {
        ClientError::Status { status, url } => {
            assert_eq!(status.as_u16(), 404);
            assert!(url.ends_with("/GpuInfo"));
        }
        other => panic!("unexpected {other:?}"),
    }

    running.shutdown().await;
}

#[tokio::test]
async fn health_and_alias_routes_answer() {
    let running = spawn_server(StubProvider {
        gpus: vec![GpuController::default()],
    })
    .await;
    let base = running.client.base_url().to_string();

    let health: serde_json::Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let alias = reqwest::get(format!("{base}/GPUInfo")).await.unwrap();
    assert!(alias.status().is_success());
    let body: serde_json::Value = alias.json().await.unwrap();
    // no memory figures reported, so the fallback applies
    assert_eq!(body["memory"]["dedicated"], "0.2/3.9 GB");

    running.shutdown().await;
}
