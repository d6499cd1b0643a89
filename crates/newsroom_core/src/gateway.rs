//! crates/newsroom_core/src/gateway.rs
//!
//! The editor's view of the content generation provider. Wraps a
//! `ContentGenerationService`, publishes a loading/step/error status while calls
//! are in flight, and turns every provider failure into a quiet fallback:
//! no draft, no image, or the unchanged text.

use crate::domain::{ImagePayload, NewsIssueDraft, PublicationType, ThemeType};
use crate::ports::{ContentGenerationService, ContentRequest, ImageRequest};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{error, info, warn};

/// What the gateway is currently doing, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStep {
    WritingIssue,
    DevelopingPhoto,
    Rewriting,
}

impl GenerationStep {
    pub fn label(self) -> &'static str {
        match self {
            GenerationStep::WritingIssue => "Writing the two-page issue...",
            GenerationStep::DevelopingPhoto => "Developing the front-page photo...",
            GenerationStep::Rewriting => "Rewriting the selected text...",
        }
    }
}

/// A snapshot of the gateway's progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GatewayStatus {
    pub loading: bool,
    pub step: Option<GenerationStep>,
    /// Message from the last failed issue generation, cleared when the next one starts.
    pub error: Option<String>,
}

impl GatewayStatus {
    pub fn step_label(&self) -> &'static str {
        self.step.map(GenerationStep::label).unwrap_or("")
    }
}

#[derive(Default)]
struct StatusInner {
    in_flight: usize,
    step: Option<GenerationStep>,
    error: Option<String>,
}

fn lock(status: &Mutex<StatusInner>) -> MutexGuard<'_, StatusInner> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks one call as in flight until dropped, whatever way the call ends.
struct InFlight {
    status: Arc<Mutex<StatusInner>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut status = lock(&self.status);
        status.in_flight = status.in_flight.saturating_sub(1);
        if status.in_flight == 0 {
            status.step = None;
        }
    }
}

//=========================================================================================
// The Gateway
//=========================================================================================

#[derive(Clone)]
pub struct ContentGateway {
    service: Arc<dyn ContentGenerationService>,
    status: Arc<Mutex<StatusInner>>,
}

impl ContentGateway {
    pub fn new(service: Arc<dyn ContentGenerationService>) -> Self {
        Self {
            service,
            status: Arc::new(Mutex::new(StatusInner::default())),
        }
    }

    pub fn status(&self) -> GatewayStatus {
        let status = lock(&self.status);
        GatewayStatus {
            loading: status.in_flight > 0,
            step: status.step,
            error: status.error.clone(),
        }
    }

    fn begin(&self, step: GenerationStep) -> InFlight {
        let mut status = lock(&self.status);
        status.in_flight += 1;
        status.step = Some(step);
        if step == GenerationStep::WritingIssue {
            status.error = None;
        }
        InFlight {
            status: Arc::clone(&self.status),
        }
    }

    /// Generates a full issue. The returned draft always carries `date`, whatever
    /// the provider wrote. `None` on any failure, with the reason in `status().error`.
    pub async fn generate_content(
        &self,
        topic: &str,
        date: NaiveDate,
        theme: ThemeType,
        publication: PublicationType,
    ) -> Option<NewsIssueDraft> {
        let _in_flight = self.begin(GenerationStep::WritingIssue);
        let started = Instant::now();
        info!(topic, %date, %theme, %publication, "Starting issue generation");

        let request = ContentRequest {
            topic: topic.to_string(),
            date,
            theme,
            publication,
        };
        match self.service.generate_issue(&request).await {
            Ok(mut draft) => {
                draft.date = date.format("%Y-%m-%d").to_string();
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    headline = %draft.front_page.headline,
                    "Issue generation completed"
                );
                Some(draft)
            }
            Err(e) => {
                error!(elapsed_ms = started.elapsed().as_millis() as u64, "Issue generation failed: {}", e);
                lock(&self.status).error = Some(e.to_string());
                None
            }
        }
    }

    /// Best-effort image generation: `None` when the provider fails or returns no image.
    pub async fn generate_image(
        &self,
        prompt: &str,
        theme: ThemeType,
        publication: PublicationType,
    ) -> Option<ImagePayload> {
        let _in_flight = self.begin(GenerationStep::DevelopingPhoto);
        let started = Instant::now();

        let request = ImageRequest {
            prompt: prompt.to_string(),
            theme,
            publication,
        };
        match self.service.generate_image(&request).await {
            Ok(image) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    has_image = image.is_some(),
                    "Image generation completed"
                );
                image
            }
            Err(e) => {
                warn!("Image generation failed: {}", e);
                None
            }
        }
    }

    /// Rewrites `current_text`; any failure or blank answer returns it unchanged.
    pub async fn rewrite_text(&self, current_text: &str, instruction: &str) -> String {
        let _in_flight = self.begin(GenerationStep::Rewriting);

        match self.service.rewrite_text(current_text, instruction).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => current_text.to_string(),
            Err(e) => {
                warn!("Rewrite failed, keeping original text: {}", e);
                current_text.to_string()
            }
        }
    }
}
