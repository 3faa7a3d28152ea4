//! Binary entrypoint for the terminal chat client.

use std::process::ExitCode;

use chatbridge::start_chatbridge;

/// Start the interactive client against the configured backend.
fn main() -> ExitCode {
    start_chatbridge::run()
}
