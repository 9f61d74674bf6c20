//! API module for the video summarizer
//!
//! Provides the REST endpoints the content-script client talks to.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::analyzer::Analyzer;
use crate::page::PageObserver;

pub mod handlers;
pub mod models;
pub mod server;

pub use models::{ApiResponse, NavigateRequest, NavigateResponse, SummarizeRequest};

/// API server owning the shared pipeline and navigation cursor.
pub struct ApiServer {
    analyzer: Arc<Analyzer>,
    observer: Arc<PageObserver>,
    port: u16,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(analyzer: Arc<Analyzer>, observer: Arc<PageObserver>, port: u16) -> Self {
        Self {
            analyzer,
            observer,
            port,
        }
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.port);

        server::start_http_server(self.analyzer, self.observer, self.port).await
    }
}
