//! Command routing logic for CLI

use crate::args::{Cli, Commands, GetTarget, RunTarget};
use crate::{commands, output};
use tracing::debug;

/// Run the selected command and return the process exit status
pub async fn route(cli: Cli) -> i32 {
    let config_file = cli.config_file.as_deref();

    let result = match cli.command {
        Commands::Run {
            target: RunTarget::Test(args),
        } => {
            debug!("routing to run test");
            commands::run_test::execute(args, config_file, cli.json).await
        }
        Commands::Get {
            target: GetTarget::Test(args),
        } => {
            debug!("routing to get test");
            commands::get_test::execute(args, config_file, cli.json).await
        }
    };

    output::emit(result, cli.json)
}
