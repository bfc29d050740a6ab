use std::process::ExitCode;

use clap::Parser;
use gcvm::{cli::Cli, Interpreter};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let mut gvm = Interpreter::new(cli.config(), cli.verbose, cli.debug);

    let result = match (&cli.file_name, cli.repl) {
        (_, true) => {
            gvm.repl();
            Ok(())
        }
        (Some(file_name), false) => gvm.execute_from_file(file_name),
        (None, false) => gvm.run_demo(),
    };

    let status = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.dump_error(gvm.sources());
            ExitCode::FAILURE
        }
    };

    gvm.shutdown();
    status
}
