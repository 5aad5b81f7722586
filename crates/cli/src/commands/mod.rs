pub mod catalog;
pub mod check;
pub mod config;
pub mod shop;

use basket_core::config::CatalogConfig;
use basket_core::{LoadError, ShopSession};
use serde::Serialize;

use crate::http_source::source_for;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_SCRIPT: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: String,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: error_class.to_string(),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Builds a current-thread runtime, performs the session's single catalog
/// load and hands back the session.
pub(crate) fn load_session(config: &CatalogConfig) -> Result<ShopSession, LoadError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| LoadError::Fetch(format!("failed to initialize async runtime: {error}")))?;
    let source = source_for(config)?;

    let mut session = ShopSession::new();
    let failure = runtime.block_on(session.load_catalog(source.as_ref())).error().cloned();
    match failure {
        Some(error) => Err(error),
        None => Ok(session),
    }
}
