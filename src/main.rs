use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match clinic_risk_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("clinic-risk: {e}");
            ExitCode::FAILURE
        }
    }
}
