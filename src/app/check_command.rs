use super::{cli_manager, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::info;

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks preference files for errors and displays the size of their models")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::mode_arg())
            .arg(common::prune_zero_weights_arg())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let model = common::build_model(arg_matches)?;
        let weights = model.weights();
        let n_positive = weights.iter().filter(|(_, w)| !w.is_zero()).count();
        info!(
            "{} tables out of {} have a positive weight",
            n_positive,
            model.stats().n_pairs + model.stats().n_triples
        );
        info!("the input file is valid");
        Ok(())
    }
}
