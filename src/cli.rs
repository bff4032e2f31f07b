use clap::Parser;

use crate::constants::{DEBUG_STORE_ID, DEBUG_UPLOAD_DATE_TIME};
use crate::query::{InputError, QueryParams};

#[derive(Debug, Parser)]
#[command(
    name = "cert-extractor",
    version,
    about = "Recover an uploaded PKCS#12 certificate from CloudWatch request logs"
)]
pub struct Cli {
    /// Store identifier the certificate was uploaded for
    #[arg(short = 'l', long = "lojaId", value_name = "ID")]
    pub loja_id: String,

    /// Upload time, YYYY-MM-DDTHH:MM:SS in the configured UTC offset
    #[arg(short = 'u', long = "uploadDateTime", value_name = "TIMESTAMP")]
    pub upload_date_time: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Usage(#[from] clap::Error),
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Store id and upload time for this run. With `debug` set the arguments are
/// not read at all and fixed inputs are used.
pub fn resolve_input<I, T>(debug: bool, args: I, offset_hours: i32) -> Result<QueryParams, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    if debug {
        tracing::info!("Debug marker set, using fixed inputs");
        return Ok(QueryParams::new(
            DEBUG_STORE_ID,
            DEBUG_UPLOAD_DATE_TIME,
            offset_hours,
        )?);
    }

    let cli = Cli::try_parse_from(args)?;
    Ok(QueryParams::new(
        cli.loja_id,
        &cli.upload_date_time,
        offset_hours,
    )?)
}
