use std::process::ExitCode;

fn main() -> ExitCode {
    platey_cli::run()
}
