mod cli;
mod infra;
mod report;
mod routes;
mod server;

use digital_diagnostic::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
