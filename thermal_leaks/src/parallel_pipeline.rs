// THEORY:
// A building survey produces dozens of captures per wall, and every one of them
// is an independent, CPU-bound inspection with no shared state. The
// `BatchInspector` fans them out over tokio's blocking thread pool while a
// semaphore caps how many run at once (one per core by default). Results come
// back in input order, and a failure (or a panicking worker) only affects its own
// item.

use crate::config::InspectionConfig;
use crate::error::{InspectionError, Result};
use crate::pipeline::{InspectionReport, ThermalInspector};
use futures::future::join_all;
use image::DynamicImage;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// One named capture's outcome.
#[derive(Debug)]
pub struct BatchItem {
    pub name: String,
    pub result: Result<InspectionReport>,
}

pub struct BatchInspector {
    inspector: Arc<ThermalInspector>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl BatchInspector {
    /// `workers` defaults to the number of logical CPUs.
    pub fn new(config: InspectionConfig, workers: Option<usize>) -> Result<Self> {
        let workers = workers.unwrap_or_else(num_cpus::get).max(1);
        Ok(Self {
            inspector: Arc::new(ThermalInspector::new(config)?),
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Inspects palette-rendered captures concurrently.
    pub async fn inspect_images(&self, captures: Vec<(String, DynamicImage)>) -> Vec<BatchItem> {
        self.run_all(captures, |inspector, img| inspector.detect_from_image(&img))
            .await
    }

    /// Inspects raw sample grids concurrently.
    pub async fn inspect_sample_grids(&self, grids: Vec<(String, Vec<Vec<f64>>)>) -> Vec<BatchItem> {
        self.run_all(grids, |inspector, samples| inspector.detect_from_samples(samples))
            .await
    }

    async fn run_all<I, F>(&self, inputs: Vec<(String, I)>, job: F) -> Vec<BatchItem>
    where
        I: Send + 'static,
        F: Fn(&ThermalInspector, I) -> Result<InspectionReport> + Send + Sync + Copy + 'static,
    {
        tracing::debug!(items = inputs.len(), workers = self.workers, "starting batch inspection");

        let tasks = inputs.into_iter().map(|(name, input)| {
            let inspector = Arc::clone(&self.inspector);
            let permits = Arc::clone(&self.permits);
            async move {
                let result = match permits.acquire_owned().await {
                    Ok(permit) => {
                        let joined = tokio::task::spawn_blocking(move || {
                            let _permit = permit;
                            job(&inspector, input)
                        })
                        .await;
                        joined.unwrap_or_else(|e| Err(InspectionError::Worker(e.to_string())))
                    }
                    Err(e) => Err(InspectionError::Worker(e.to_string())),
                };
                if let Err(e) = &result {
                    tracing::warn!(capture = %name, error = %e, "inspection failed");
                }
                BatchItem { name, result }
            }
        });

        join_all(tasks).await
    }
}
