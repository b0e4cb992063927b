use serde::Serialize;
use shopcart_core::config::{AppConfig, LoadOptions};
use shopcart_db::{connect_with_settings, migrations};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(
                "config_validation",
                format!("configuration loaded; server would listen on {}", config.listen_address()),
            ));
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            checks.push(DoctorCheck::skipped(
                "database_connectivity",
                "configuration did not load",
            ));
            checks.push(DoctorCheck::skipped("schema_migrations", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Connectivity plus how many of the embedded migrations the database has applied.
fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![
                DoctorCheck::fail(
                    "database_connectivity",
                    format!("failed to initialize async runtime: {error}"),
                ),
                DoctorCheck::skipped("schema_migrations", "the async runtime did not start"),
            ];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck::fail(
                        "database_connectivity",
                        format!("failed to connect to database: {error}"),
                    ),
                    DoctorCheck::skipped("schema_migrations", "the database is unreachable"),
                ];
            }
        };

        let expected = migrations::MIGRATOR.iter().count() as i64;
        let applied = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
        )
        .fetch_one(&pool)
        .await;
        pool.close().await;

        let schema = match applied {
            Ok(applied) if applied >= expected => {
                DoctorCheck::pass("schema_migrations", format!("{applied} of {expected} applied"))
            }
            Ok(applied) => DoctorCheck::fail(
                "schema_migrations",
                format!("{applied} of {expected} applied; run `shopcart migrate`"),
            ),
            Err(_) => DoctorCheck::fail(
                "schema_migrations",
                "no migration history found; run `shopcart migrate`",
            ),
        };

        vec![
            DoctorCheck::pass(
                "database_connectivity",
                format!("connected using `{}`", config.database.url),
            ),
            schema,
        ]
    })
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::{render_human, CheckStatus, DoctorCheck, DoctorReport};

    #[test]
    fn human_report_marks_each_check() {
        let report = DoctorReport {
            overall_status: CheckStatus::Fail,
            summary: "doctor: one or more readiness checks failed".to_string(),
            checks: vec![
                DoctorCheck::pass("config_validation", "ok"),
                DoctorCheck::fail("database_connectivity", "refused"),
                DoctorCheck::skipped("schema_migrations", "the database is unreachable"),
            ],
        };

        let rendered = render_human(&report);

        assert!(rendered.contains("- [ok] config_validation: ok"));
        assert!(rendered.contains("- [fail] database_connectivity: refused"));
        assert!(rendered.contains(
            "- [skip] schema_migrations: skipped because the database is unreachable"
        ));
    }
}
