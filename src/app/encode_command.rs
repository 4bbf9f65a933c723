use super::{cli_manager, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
};
use tcpc::io::{LpWriter, WcnfFormat, WcnfWriter};

const CMD_NAME: &str = "encode";

const ARG_FORMAT: &str = "FORMAT";
const ARG_OUT: &str = "OUT";

pub(crate) struct EncodeCommand;

impl EncodeCommand {
    pub(crate) fn new() -> Self {
        EncodeCommand
    }
}

impl<'a> Command<'a> for EncodeCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Writes the seating model of a preference file for external engines")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::mode_arg())
            .arg(common::cardinality_encoding_arg())
            .arg(common::prune_zero_weights_arg())
            .arg(
                Arg::with_name(ARG_FORMAT)
                    .long("format")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["wcnf", "wcnf-legacy", "lp"])
                    .default_value("wcnf")
                    .help("the output format")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_OUT)
                    .short("o")
                    .long("output")
                    .empty_values(false)
                    .multiple(false)
                    .help("the output file for the encoding (default is the standard output)")
                    .required(false),
            )
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let model = common::build_model(arg_matches)?;
        let mut out: Box<dyn Write> = match arg_matches.value_of(ARG_OUT) {
            Some(path) => {
                info!("writing the encoding to {:?}", path);
                Box::new(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!(r#"while creating file "{}""#, path))?,
                ))
            }
            None => Box::new(BufWriter::new(std::io::stdout())),
        };
        match arg_matches.value_of(ARG_FORMAT).unwrap_or("wcnf") {
            "lp" => LpWriter::default().write(&model, &mut out)?,
            format => {
                let wcnf_format = if format == "wcnf-legacy" {
                    WcnfFormat::Legacy
                } else {
                    WcnfFormat::Current
                };
                let mut writer = WcnfWriter::new(wcnf_format);
                writer.set_cardinality_encoding(common::read_cardinality_encoding(arg_matches));
                let n_vars = writer.write(&model, &mut out)?;
                info!("the WCNF instance has {} variables", n_vars);
            }
        }
        out.flush().context("while writing the encoding")
    }
}
