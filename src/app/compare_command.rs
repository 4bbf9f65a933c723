use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::info;
use std::io::Write;
use tcpc::{
    model::{EncodingMode, Weight},
    solvers::EngineStatus,
};

const CMD_NAME: &str = "compare";

pub(crate) struct CompareCommand;

impl CompareCommand {
    pub(crate) fn new() -> Self {
        CompareCommand
    }
}

impl<'a> Command<'a> for CompareCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Solves both the maximizing and the minimizing models and checks that they reach the same weight")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::cardinality_encoding_arg())
            .arg(common::timeout_arg())
            .args(&common::external_sat_solver_args())
            .args(&common::external_maxsat_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let max_model = common::build_model(arg_matches)?;
        let stop_condition = common::read_stop_condition(arg_matches)?;
        let mut weights = Vec::with_capacity(2);
        for mode in [EncodingMode::Maximize, EncodingMode::Minimize] {
            let model = max_model.with_mode(mode);
            if mode == EncodingMode::Minimize {
                common::log_model_stats(&model);
            }
            let mut engine = common::create_engine(arg_matches)?;
            let (result, seating) =
                common::optimize_and_decode(engine.as_mut(), &model, &stop_condition)?;
            match seating {
                Some(s) if result.status() == EngineStatus::Optimal => {
                    weights.push((mode, s.achieved_weight()))
                }
                _ => {
                    return Err(anyhow!(
                        "no optimal seating for the {} model (engine answered {})",
                        mode,
                        result.status()
                    ))
                }
            }
        }
        let mut out = std::io::stdout();
        for (mode, w) in &weights {
            writeln!(out, "{} {}", mode, w)?;
        }
        out.flush()?;
        check_duality(weights[0].1, weights[1].1)
    }
}

fn check_duality(max_weight: Weight, min_weight: Weight) -> Result<()> {
    if max_weight == min_weight {
        info!("both modes reach the weight {}", max_weight);
        Ok(())
    } else {
        Err(anyhow!(
            "duality check failed: the maximizing model reaches {} while the minimizing one reaches {}",
            max_weight,
            min_weight
        ))
    }
}
