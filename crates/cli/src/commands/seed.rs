use crate::commands::{connect, load_config, runtime, CommandResult, StepFailure};
use shopcart_db::{migrations, DemoCatalog, SeedResult};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect(&config).await?;
        let outcome = seed_and_verify(&pool).await;
        pool.close().await;
        outcome
    });

    match result {
        Ok(seeded) => CommandResult::success(
            "seed",
            format!(
                "demo catalog loaded: {} categories, {} products ({})",
                seeded.categories_seeded,
                seeded.products_seeded.len(),
                seeded.products_seeded.join(", ")
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

async fn seed_and_verify(pool: &shopcart_db::DbPool) -> Result<SeedResult, StepFailure> {
    migrations::run_pending(pool).await.map_err(|error| ("migration", error.to_string(), 5u8))?;

    let seeded = DemoCatalog::load(pool)
        .await
        .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

    let verification = DemoCatalog::verify(pool)
        .await
        .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

    if !verification.all_present {
        let failed = failed_checks(&verification.checks);
        return Err(("seed_verification", verification_message(&failed), 6u8));
    }

    Ok(seeded)
}

fn failed_checks(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect()
}

fn verification_message(failed: &[&str]) -> String {
    if failed.is_empty() {
        "some demo catalog rows failed to load".to_string()
    } else {
        format!("demo catalog verification failed for: {}", failed.join(", "))
    }
}
