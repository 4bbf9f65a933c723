use super::{cli_manager, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use tcpc::io::SeatingWriter;

const CMD_NAME: &str = "solve";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Computes a seating maximizing the satisfaction of the students")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::mode_arg())
            .arg(common::cardinality_encoding_arg())
            .arg(common::prune_zero_weights_arg())
            .arg(common::timeout_arg())
            .args(&common::external_sat_solver_args())
            .args(&common::external_maxsat_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let model = common::build_model(arg_matches)?;
        let stop_condition = common::read_stop_condition(arg_matches)?;
        let mut engine = common::create_engine(arg_matches)?;
        let (result, seating) =
            common::optimize_and_decode(engine.as_mut(), &model, &stop_condition)?;
        let writer = SeatingWriter::default();
        let mut out = std::io::stdout();
        match seating {
            Some(s) => writer.write_seating(&mut out, result.status(), &s),
            None => writer.write_no_seating(&mut out, result.status()),
        }
    }
}
