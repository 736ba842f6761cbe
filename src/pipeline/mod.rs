//! Request orchestration.
//!
//! [`Pipeline::generate`] runs one request through the full gate
//! sequence: API-key prefix, sanitization, length, injection scan, rate
//! limit. A request that clears the gates is assembled into a prompt,
//! dispatched to the completion backend, and the response is parsed,
//! structurally validated, and safety-scanned before being returned.
//!
//! Session state is threaded through as `&mut`, so one session can only
//! ever have a single generation in flight.

use crate::config::SecretString;
use crate::error::{AppError, GateError, GuardError, ScriptError};
use crate::files::FileMetadata;
use crate::guard::{InjectionDetector, RateLimiter, RateWindow, Sanitizer};
use crate::prompt::build_prompt;
use crate::provider::Provider;
use crate::script::{parse_generation, GeneratedScript, ImportScanner};
use crate::traits::{CompletionBackend, RealTimeProvider, TimeProvider};

/// Maximum requirement length in characters, measured after sanitization.
pub const MAX_REQUIREMENT_CHARS: usize = 5000;

/// One script-generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// API key for the selected provider.
    pub api_key: SecretString,
    /// Which provider to dispatch to.
    pub provider: Provider,
    /// Free-text description of the Alteryx workflow.
    pub requirement: String,
    /// Metadata for the staged input files.
    pub files: Vec<FileMetadata>,
}

/// Per-session state carried across requests.
#[derive(Debug, Clone, Default)]
pub struct Session {
    window: RateWindow,
}

impl Session {
    /// Create a fresh session with an empty rate window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            window: RateWindow::new(),
        }
    }

    /// Number of requests currently recorded in the rate window.
    #[must_use]
    pub fn recorded_requests(&self) -> usize {
        self.window.len()
    }
}

/// The gate-and-dispatch pipeline.
///
/// Generic over the completion backend and the clock so tests can swap
/// in mocks; production code uses [`ProviderClient`] and
/// [`RealTimeProvider`].
///
/// [`ProviderClient`]: crate::provider::ProviderClient
#[derive(Debug)]
pub struct Pipeline<C, T = RealTimeProvider> {
    backend: C,
    time: T,
    sanitizer: Sanitizer,
    detector: InjectionDetector,
    limiter: RateLimiter,
    scanner: ImportScanner,
}

impl<C: CompletionBackend> Pipeline<C, RealTimeProvider> {
    /// Build a pipeline around a backend, using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPattern`] if any of the guard pattern
    /// tables fails to compile.
    pub fn new(backend: C) -> Result<Self, GuardError> {
        Self::with_time(backend, RealTimeProvider)
    }
}

impl<C: CompletionBackend, T: TimeProvider> Pipeline<C, T> {
    /// Build a pipeline with an injectable clock.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPattern`] if any of the guard pattern
    /// tables fails to compile.
    pub fn with_time(backend: C, time: T) -> Result<Self, GuardError> {
        Ok(Self {
            backend,
            time,
            sanitizer: Sanitizer::new()?,
            detector: InjectionDetector::new()?,
            limiter: RateLimiter::default(),
            scanner: ImportScanner::new()?,
        })
    }

    /// Run one request end to end, producing a validated script.
    ///
    /// Gates run in a fixed order and the first rejection wins; nothing
    /// touches the network until every gate has passed. The rate window
    /// records the request at the moment the rate gate admits it, so a
    /// later provider or validation failure still consumes a slot.
    ///
    /// # Errors
    ///
    /// - [`GateError`] for any local rejection: bad key prefix, empty or
    ///   over-length requirement, injection pattern match, rate limit.
    /// - [`ProviderError`](crate::error::ProviderError) when the API call
    ///   itself fails.
    /// - [`ScriptError`] when the response is unparseable, incomplete, or
    ///   references a disallowed module.
    pub async fn generate(
        &self,
        session: &mut Session,
        request: GenerationRequest,
    ) -> Result<GeneratedScript, AppError> {
        if !request.api_key.starts_with(request.provider.key_prefix()) {
            return Err(GateError::InvalidApiKey {
                provider: request.provider.to_string(),
            }
            .into());
        }

        let requirement = self.sanitizer.sanitize(&request.requirement);
        if requirement.is_empty() {
            return Err(GateError::EmptyRequirement.into());
        }
        let length = requirement.chars().count();
        if length > MAX_REQUIREMENT_CHARS {
            return Err(GateError::RequirementTooLong {
                length,
                max: MAX_REQUIREMENT_CHARS,
            }
            .into());
        }

        if let Some(category) = self.detector.scan(&requirement) {
            return Err(GateError::InjectionDetected {
                category: category.to_string(),
            }
            .into());
        }

        let now_ms = self.time.now().timestamp_millis();
        self.limiter.check(&mut session.window, now_ms)?;

        let prompt = build_prompt(&requirement, &request.files);
        tracing::debug!(
            provider = %request.provider,
            requirement_chars = length,
            files = request.files.len(),
            "Dispatching generation request"
        );
        let content = self.backend.complete(&prompt).await?;

        let generated = parse_generation(&content)?;
        if let Some(module) = self.scanner.scan(&generated.script) {
            return Err(ScriptError::DisallowedImport {
                module: module.to_string(),
            }
            .into());
        }

        tracing::debug!(steps = generated.steps.len(), "Generation validated");
        Ok(generated)
    }
}
