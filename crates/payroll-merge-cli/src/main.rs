use std::process::ExitCode;

fn main() -> ExitCode {
    payroll_merge_cli::run(std::env::args())
}
