use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult};
use crate::output::render_config;

pub(crate) fn handle_config_show(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    render_config(&ctx.config, format)
}
