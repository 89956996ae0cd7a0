use std::process::ExitCode;

use testmeta::ui::output;

fn main() -> ExitCode {
    match testmeta::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
