//! pycture
//!
//! Convert natural-language descriptions of Alteryx data workflows into
//! Python/pandas scripts via the Anthropic Claude or OpenAI GPT-4 API.
//!
//! # Features
//!
//! - File staging gate (extension and size) with bounded metadata sniffing
//! - Input sanitization and prompt-injection pattern detection
//! - Session-scoped sliding-window rate limiting
//! - Dual-provider dispatch with one normalized response path
//! - Structural and import-safety validation of the generated script
//!
//! # Quick Start
//!
//! ```bash
//! PYCTURE_API_KEY=sk-ant-xxx pycture "Filter sales over $1000 and group by region" -f sales.csv
//! ```
//!
//! # Architecture
//!
//! ```text
//! requirement + files
//!        │
//!        ▼
//! ┌──────────────────┐    prompt    ┌─────────────────┐
//! │  gate pipeline    │─────────────▶│ provider client  │──────▶ Anthropic / OpenAI
//! │ (sanitize, scan,  │◀─────────────│  (one request,   │
//! │  rate limit)      │   response   │   no retry)      │
//! └────────┬─────────┘              └─────────────────┘
//!          │ parse + validate + safety scan
//!          ▼
//!   pycture_script.py
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod files;
pub mod guard;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod script;
pub mod traits;

pub use config::Config;
pub use error::AppError;
pub use pipeline::{GenerationRequest, Pipeline, Session};
pub use provider::{Provider, ProviderClient};
pub use script::GeneratedScript;
