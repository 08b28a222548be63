//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands::{config_file, effective_config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config_file(global).display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let cfg = effective_config(global)?;
            // Surface bad values here rather than at the next `watch`.
            cfg.to_live_sync_config()
                .map_err(|e| CliError::config(&config_file(global), e))?;

            let rendered = output::render_single(&global.output, &cfg, |c| {
                toml::to_string_pretty(c).map_err(|e| CliError::Render(e.to_string()))
            })?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }
    }
}
