use super::{cli_manager, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::info;
use tcpc::{io::SeatingWriter, model::SolutionDecoder, solvers::PerfectSeatingSolver};

const CMD_NAME: &str = "perfect";

pub(crate) struct PerfectCommand;

impl PerfectCommand {
    pub(crate) fn new() -> Self {
        PerfectCommand
    }
}

impl<'a> Command<'a> for PerfectCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Searches a seating in which every table is perfectly satisfied")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::cardinality_encoding_arg())
            .arg(common::timeout_arg())
            .args(&common::external_sat_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let model = common::build_model(arg_matches)?;
        let stop_condition = common::read_stop_condition(arg_matches)?;
        let mut solver = PerfectSeatingSolver::new_with_sat_solver_factory(
            common::create_sat_solver_factory(arg_matches)?,
        );
        solver.set_cardinality_encoding(common::read_cardinality_encoding(arg_matches));
        let result = solver.search(&model, &stop_condition)?;
        let writer = SeatingWriter::default();
        let mut out = std::io::stdout();
        match result.assignment() {
            Some(a) => {
                let seating = SolutionDecoder::new(&model)
                    .decode(Some(a))
                    .context("while decoding the perfect seating")?;
                writer.write_seating(&mut out, result.status(), &seating)
            }
            None => {
                info!("no perfect seating was found");
                writer.write_no_seating(&mut out, result.status())
            }
        }
    }
}
