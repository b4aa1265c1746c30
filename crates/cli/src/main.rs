//! `micro-curl`: send one HTTP/1.1 request and write out the response.
//!
//! Exit codes:
//!
//! | code | cause                                   |
//! |------|-----------------------------------------|
//! | 0    | response received and written           |
//! | 1    | any other io failure                    |
//! | 2    | invalid header name or non latin-1 text |
//! | 3    | invalid url                             |
//! | 4    | can't connect                           |
//! | 5    | invalid status line or header line      |
//! | 6    | tls handshake failure                   |

mod args;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bytes::Bytes;
use clap::Parser;
use micro_http_client::client::Client;
use micro_http_client::protocol::{HttpError, ParseError, RequestError, Response, TransportError};
use micro_http_client::transport::SecureChannel;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;

use crate::args::Args;

/// Env var holding a `tracing` filter directive, e.g. `micro_http_client=trace`.
const LOG_ENV: &str = "MICRO_CURL_LOG";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Http {
        #[from]
        source: HttpError,
    },

    #[error("can't read upload file {path:?}: {source}")]
    Input { path: PathBuf, source: std::io::Error },

    #[error("can't write output: {source}")]
    Output { source: std::io::Error },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Http { source } => match source {
                HttpError::RequestError { source } => match source {
                    RequestError::HeaderFormat { .. }
                    | RequestError::NonLatin1 { .. }
                    | RequestError::HeaderValue { .. } => 2,
                    RequestError::UrlParsing { .. } | RequestError::UnsupportedScheme { .. } => 3,
                },
                HttpError::TransportError { source } => match source {
                    TransportError::Connecting { .. } => 4,
                    TransportError::Tls { .. } => 6,
                    TransportError::Closed | TransportError::Io { .. } => 1,
                },
                HttpError::ResponseError { source } => match source {
                    ParseError::IncorrectStartingLine { .. } | ParseError::MalformedHeaderLine { .. } => 5,
                    ParseError::Io { .. } => 1,
                },
            },
            CliError::Input { .. } | CliError::Output { .. } => 1,
        }
    }
}

impl From<RequestError> for CliError {
    fn from(e: RequestError) -> Self {
        HttpError::from(e).into()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "request failed");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { LevelFilter::INFO } else { LevelFilter::WARN };
    let filter = EnvFilter::builder().with_default_directive(default_level.into()).with_env_var(LOG_ENV).from_env_lossy();

    let subscriber =
        FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).without_time().finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("can't install the log subscriber: {e}");
    }
}

async fn run(args: &Args) -> Result<(), CliError> {
    let body = read_body(args).await?;
    let spec = args.request_spec(body)?;

    let secure_channel = if args.insecure { SecureChannel::insecure() } else { SecureChannel::new() };
    let client = Client::new().secure_channel(secure_channel).verbose(args.verbose);

    let response = client.execute(&spec).await?;
    info!(status_code = response.status_code(), body_size = response.body().len(), "<- response");

    write_output(&response, args.output.as_deref(), args.include).await
}

async fn read_body(args: &Args) -> Result<Bytes, CliError> {
    match &args.upload_file {
        Some(path) => {
            let content = tokio::fs::read(path).await.map_err(|source| CliError::Input { path: path.clone(), source })?;
            Ok(Bytes::from(content))
        }
        None => Ok(args.data_bytes()?),
    }
}

/// Writes to `output` when given, stdout otherwise. Nothing is written unless
/// the whole response was parsed.
async fn write_output(response: &Response, output: Option<&Path>, include_headers: bool) -> Result<(), CliError> {
    let result = match output {
        Some(path) => match tokio::fs::File::create(path).await {
            Ok(mut file) => response.write_to(&mut file, include_headers).await,
            Err(e) => Err(e),
        },
        None => response.write_to(&mut tokio::io::stdout(), include_headers).await,
    };
    result.map_err(|source| CliError::Output { source })
}
