// SPDX-FileCopyrightText: 2026 Noah Fontes
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
mod attendance;
mod cas;
mod client;
mod command;
mod config;
mod error;
mod intake;
mod metadata;
mod otp;
mod password;
mod semester;
mod session;
mod storage;
mod ticket;
mod timetable;
mod transport;

use std::{process, time::Duration};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use client::{Apspace, Client};
use error::Result;
use log::{error, info};
use secrecy::SecretString;
use ticket::Cached;
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Attend(command::attend::Command),
    Attendance(command::attendance::Command),
    Semester(command::semester::Command),
    Intake(command::intake::Command),
    Modules(command::modules::Command),
    Timetable(command::timetable::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, client: impl Client + Send) -> Result<()> {
        match self {
            Self::Attend(cmd) => cmd.execute(client).await,
            Self::Attendance(cmd) => cmd.execute(client).await,
            Self::Semester(cmd) => cmd.execute(client).await,
            Self::Intake(cmd) => cmd.execute(client).await,
            Self::Modules(cmd) => cmd.execute(client).await,
            Self::Timetable(cmd) => cmd.execute(client).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The APSpace username (TP number) to log in as.
    #[arg(long, short, env = "APSPACE_USERNAME")]
    username: Option<String>,

    /// The APSpace password. When omitted, it is read from the terminal.
    #[arg(long, env = "APSPACE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// The API key sent to the attendance service.
    #[arg(long, env = "APSPACE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Seconds to wait for each request before giving up.
    #[arg(long, env = "APSPACE_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// The CAS endpoint that issues master tickets.
    #[arg(long, env = "APSPACE_TICKET_URL", value_parser = Url::parse)]
    ticket_url: Option<Url>,

    /// The base URL that service tickets are issued for.
    #[arg(long, env = "APSPACE_SERVICE_URL", value_parser = Url::parse)]
    service_url: Option<Url>,

    /// The base URL of the student API.
    #[arg(long, env = "APSPACE_STUDENT_URL", value_parser = Url::parse)]
    student_url: Option<Url>,

    /// The attendance GraphQL endpoint.
    #[arg(long, env = "APSPACE_ATTENDIX_URL", value_parser = Url::parse)]
    attendix_url: Option<Url>,

    /// The weekly timetable document.
    #[arg(long, env = "APSPACE_TIMETABLE_URL", value_parser = Url::parse)]
    timetable_url: Option<Url>,

    /// Turn off caching of the master ticket between runs.
    #[arg(long)]
    no_cache_ticket: bool,

    /// Log in again even if a cached master ticket exists.
    #[arg(long)]
    relogin: bool,

    #[clap(subcommand)]
    command: Command,
}

impl Args {
    fn config(&self) -> Result<config::Config> {
        let mut builder = config::Config::builder();
        if let Some(url) = self.ticket_url.clone() {
            builder = builder.with_ticket_url(url);
        }
        if let Some(url) = self.service_url.clone() {
            builder = builder.with_service_url(url);
        }
        if let Some(url) = self.student_url.clone() {
            builder = builder.with_student_url(url);
        }
        if let Some(url) = self.attendix_url.clone() {
            builder = builder.with_attendix_url(url);
        }
        if let Some(url) = self.timetable_url.clone() {
            builder = builder.with_timetable_url(url);
        }

        builder.into_config(
            SecretString::new(self.api_key.clone().unwrap_or_default()),
            Duration::from_secs(self.timeout),
        )
    }
}

fn get_ticket_storage(args: &Args) -> Box<dyn storage::Storage<Cached>> {
    if !args.no_cache_ticket {
        if let Some(file_storage) = storage::File::new("ticket.json") {
            return Box::new(file_storage);
        }
    }

    Box::new(storage::Memory::<Cached>::new())
}

async fn run(args: Args) -> Result<()> {
    let config = args.config()?;
    let username = args
        .username
        .clone()
        .ok_or(error::Config::MissingUsername)?;

    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(password::Fixed::new(args.password.clone().map(SecretString::new))),
        Box::new(password::RpasswordPrompt),
    ];
    let credentials = cas::Credentials::new(
        username.as_str(),
        password::require(&prompt, &username).await?,
    );

    let transport = transport::Http::new(config.timeout())?;
    let session = session::Session::new(transport, config, credentials, get_ticket_storage(&args));
    let client = if args.relogin {
        Apspace::login(session).await?
    } else {
        Apspace::connect(session).await?
    };
    info!("Logged in as {}", username);

    let result = command::Command::execute(args.command, &client).await;
    client.close();

    result
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("APSPACE_LOG", "warn")
        .write_style("APSPACE_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
