// ==========================================
// Metro Induction Planner - command line entry
// ==========================================
// stdout: JSON report or error payload
// stderr: logs
// exit code: 0 success, ApiError::exit_code() otherwise
// ==========================================

use anyhow::Context;
use chrono::Local;
use metro_induction::api::{ApiError, ErrorPayload, PlanningApi};
use metro_induction::{cli, logging};

fn main() -> anyhow::Result<()> {
    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            logging::init();
            return fail(&ApiError::from(e));
        }
    };

    if args.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(
        version = metro_induction::VERSION,
        db_path = %args.db_path,
        strategy = %args.strategy,
        "{} starting",
        metro_induction::APP_NAME
    );

    let db_path = args.db_path.clone();
    let request = args.into_request(Local::now().date_naive());

    match PlanningApi::run(&db_path, &request) {
        Ok(report) => {
            let json =
                serde_json::to_string_pretty(&report).context("failed to serialize report")?;
            println!("{}", json);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

/// Prints the error payload and exits non-zero
fn fail(err: &ApiError) -> anyhow::Result<()> {
    tracing::error!(kind = err.kind(), error = %err, "planning run failed");
    let json = serde_json::to_string_pretty(&ErrorPayload::from(err))
        .context("failed to serialize error payload")?;
    println!("{}", json);
    std::process::exit(err.exit_code());
}
