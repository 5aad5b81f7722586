use std::time::Instant;

use basket_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

use crate::commands::{load_session, CommandResult, EXIT_CATALOG, EXIT_CONFIG};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct CheckItem {
    name: &'static str,
    status: CheckStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    command: &'static str,
    status: CheckStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<CheckItem>,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(options.clone())) {
        Ok((elapsed_ms, config)) => {
            checks.push(CheckItem {
                name: "config_validation",
                status: CheckStatus::Pass,
                elapsed_ms,
                message: "configuration loaded and validated".to_string(),
            });
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(CheckItem {
                name: "config_validation",
                status: CheckStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.push(skipped("catalog_load"));
            return finalize_report(checks, started.elapsed().as_millis() as u64, EXIT_CONFIG);
        }
    };

    match timed_check(|| load_session(&config.catalog)) {
        Ok((elapsed_ms, session)) => checks.push(CheckItem {
            name: "catalog_load",
            status: CheckStatus::Pass,
            elapsed_ms,
            message: format!(
                "{} catalog ready with {} products",
                config.catalog.source.as_str(),
                session.catalog_size()
            ),
        }),
        Err((elapsed_ms, error)) => {
            checks.push(CheckItem {
                name: "catalog_load",
                status: CheckStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            return finalize_report(checks, started.elapsed().as_millis() as u64, EXIT_CATALOG);
        }
    }

    finalize_report(checks, started.elapsed().as_millis() as u64, 0)
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> CheckItem {
    CheckItem {
        name,
        status: CheckStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due to a previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<CheckItem>, total_elapsed_ms: u64, exit_code: u8) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == CheckStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == CheckStatus::Fail);

    let report = CheckReport {
        command: "check",
        status: if failed { CheckStatus::Fail } else { CheckStatus::Pass },
        summary: format!("check: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"check\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code, output: format!("{human}\n{machine}") }
}
