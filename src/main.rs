use std::process::ExitCode;

fn main() -> ExitCode {
    match warehouse_sales::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "exiting with error");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
