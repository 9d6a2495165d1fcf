//! `voteweb-controller` lets a voter check the ballot they cast on a
//! voteweb.fr election site, using the control elements they were given when
//! voting.
//!
//! Exits with 0 when the ballot checks out, 255 when the check ran and found
//! a problem with the ballot, and 1 when the check could not be carried out.

#![warn(
    clippy::all,
    clippy::todo,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::mem_forget,
    clippy::unused_self,
    clippy::filter_map_next,
    clippy::needless_continue,
    clippy::needless_borrow,
    clippy::match_wildcard_for_single_variants,
    clippy::if_let_mutex,
    clippy::await_holding_lock,
    clippy::match_on_vec_items,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::lossy_float_literal,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::fn_params_excessive_bools,
    clippy::exit,
    clippy::inefficient_to_string,
    clippy::linkedlist,
    clippy::macro_use_imports,
    clippy::option_option,
    clippy::verbose_file_reads,
    clippy::unnested_or_patterns,
    clippy::str_to_string,
    rust_2018_idioms,
    future_incompatible,
    nonstandard_style,
    missing_debug_implementations,
    missing_docs
)]
#![deny(unreachable_pub)]
#![allow(elided_lifetimes_in_paths, clippy::type_complexity)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

use std::process::ExitCode;

use clap::Parser;
use voteweb_controller::{
    config::{self, Config, OutputFormat},
    controller::{ControlState, Controller, HttpConnector},
    log,
    present::{JsonPresenter, TerminalPresenter},
};

/// Exit status when the ballot failed verification.
const VERIFICATION_FAILED: u8 = 255;

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    config::load_dotenv()?;
    let config = Config::parse();
    log::setup(&config)?;

    let control_elements = config.read_control_elements()?;
    let controller = Controller::new(
        HttpConnector::new(config.timeout()),
        config.plaintext_policy(),
    );

    let state = match config.format {
        OutputFormat::Text => {
            let mut presenter = TerminalPresenter::new(std::io::stdout());
            controller
                .verify(&config.control_type, &control_elements, &mut presenter)
                .await
        }
        OutputFormat::Json => {
            let mut presenter = JsonPresenter::new(std::io::stdout());
            controller
                .verify(&config.control_type, &control_elements, &mut presenter)
                .await
        }
    };

    Ok(match state {
        ControlState::Succeeded(_) => ExitCode::SUCCESS,
        ControlState::Failed(error) if error.is_verification_failure() => {
            ExitCode::from(VERIFICATION_FAILED)
        }
        ControlState::Failed(_) | ControlState::Idle | ControlState::Requesting => {
            ExitCode::FAILURE
        }
    })
}
