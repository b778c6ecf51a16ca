use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::domain::Domain;
use crate::metrics::{CpuInfo, DiskInfo, GpuInfo, MemoryInfo, ProcessSample};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("unexpected response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Latest decoded response for one domain.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainSnapshot {
    Process(Vec<ProcessSample>),
    Cpu(Box<CpuInfo>),
    Memory(MemoryInfo),
    Disk(DiskInfo),
    Gpu(GpuInfo),
}

impl DomainSnapshot {
    pub fn domain(&self) -> Domain {
        match self {
            DomainSnapshot::Process(_) => Domain::Process,
            DomainSnapshot::Cpu(_) => Domain::Cpu,
            DomainSnapshot::Memory(_) => Domain::Memory,
            DomainSnapshot::Disk(_) => Domain::Disk,
            DomainSnapshot::Gpu(_) => Domain::Gpu,
        }
    }
}

/// Where the dashboard gets its data from.
#[async_trait]
pub trait MetricsSource: Send + Sync + 'static {
    async fn fetch(&self, domain: Domain) -> Result<DomainSnapshot, ClientError>;
}

/// [`MetricsSource`] talking to a running server over HTTP.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, domain: Domain) -> String {
        format!("{}{}", self.base_url, domain.path())
    }

    async fn get_json<T: DeserializeOwned>(&self, domain: Domain) -> Result<T, ClientError> {
        let url = self.url(domain);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }
        debug!(%url, %status, "fetched");
        response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }
}

#[async_trait]
impl MetricsSource for ApiClient {
    async fn fetch(&self, domain: Domain) -> Result<DomainSnapshot, ClientError> {
        Ok(match domain {
            Domain::Process => DomainSnapshot::Process(self.get_json(domain).await?),
            Domain::Cpu => DomainSnapshot::Cpu(Box::new(self.get_json(domain).await?)),
            Domain::Memory => DomainSnapshot::Memory(self.get_json(domain).await?),
            Domain::Disk => DomainSnapshot::Disk(self.get_json(domain).await?),
            Domain::Gpu => DomainSnapshot::Gpu(self.get_json(domain).await?),
        })
    }
}
