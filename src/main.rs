// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod api;
mod app;
mod command;
mod error;
mod gate;
mod metadata;
mod model;
mod password;
mod route;
mod session;
mod storage;
mod validation;

use std::{
    io::{self, IsTerminal as _},
    path::PathBuf,
    process,
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use error::Result;
use log::{error, warn};
use url::Url;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the backend.
    #[arg(long, env = "AFILADO_URL", default_value = metadata::DEFAULT_URL, value_parser = Url::parse)]
    url: Url,

    /// Keep the session in memory only instead of storing it for later runs.
    #[arg(long)]
    no_cache_session: bool,

    /// The path to the Pinentry program to use when asking for passwords.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,

    /// Seconds to wait for the backend before giving up on a request.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[clap(subcommand)]
    command: command::Command,
}

async fn get_session_storage(args: &Args) -> Box<dyn storage::Storage<session::Data>> {
    if !args.no_cache_session {
        #[cfg(feature = "secret-service")]
        match storage::SecretService::new(&args.url).await {
            Ok(secret_service_storage) => return Box::new(secret_service_storage),
            Err(e) => {
                warn!("We need to fall back to unencrypted file storage because we can't connect to the secret service: {}", e);
            }
        }

        #[cfg(feature = "keychain")]
        match storage::Keychain::new(&args.url) {
            Ok(keychain_storage) => return Box::new(keychain_storage),
            Err(e) => {
                warn!("We need to fall back to unencrypted file storage because we can't connect to Keychain: {}", e);
            }
        }

        match storage::File::new("session.json") {
            Ok(file_storage) => return Box::new(file_storage),
            Err(e) => {
                warn!("The session will not be remembered between runs: {}", e);
            }
        }
    }

    Box::new(storage::Memory::<session::Data>::new())
}

async fn run(args: Args) -> Result<()> {
    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(args.pinentry_program.clone().map_or_else(
            password::PinentryPrompt::new,
            password::PinentryPrompt::new_with_executable,
        )),
        Box::new(password::RpasswordPrompt),
    ];

    let session = Arc::new(session::SessionStore::open(get_session_storage(&args).await).await);
    let transport = api::Http::new(Duration::from_secs(args.timeout))?;
    let pipeline = api::Pipeline::new(args.url, Box::new(transport), session);

    let interactive = io::stdin().is_terminal() && io::stderr().is_terminal();
    let app = app::App::new(pipeline, Box::new(prompt), interactive);

    app.navigate(args.command).await.map_err(|e| {
        eprintln!("{}", e.banner());
        e
    })
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("AFILADO_LOG", "warn")
        .write_style("AFILADO_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
