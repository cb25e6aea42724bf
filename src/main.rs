use std::process::ExitCode;

fn main() -> ExitCode {
    ng2web::cli::run()
}
