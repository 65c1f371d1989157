use clap::Parser;

/// Materialize an Athena query into object storage and start a data load
/// from the result files.
#[derive(Parser, Debug)]
#[command(name = "athena-dataload", version, about)]
pub struct CliArgs {
    /// SQL query (falls back to DATALOAD_QUERY)
    #[arg(short = 'q', long)]
    pub query: Option<String>,

    /// Config profile; PROD makes every key resolve as PROD_<KEY> first
    #[arg(long, env = "DATALOAD_PROFILE")]
    pub profile: Option<String>,

    /// Override ATHENA_TIMEOUT_SECONDS for this run
    #[arg(long)]
    pub timeout_secs: Option<u32>,
}
