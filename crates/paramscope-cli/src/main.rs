use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use paramscope_cli::OutputFormat;
use paramscope_cli::commands;
use paramscope_cli::commands::analyze::ParameterSource;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paramscope")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Infer types and statistics for URL query parameters",
    long_about = "paramscope parses query strings, deduplicates repeated and comma-separated \
                  values, infers a type for every parameter and reports descriptive statistics \
                  for numeric arrays. It can analyze input locally or serve the analysis over HTTP."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a query string, URL or parameter file
    #[command(group(
        ArgGroup::new("source")
            .required(true)
            .args(["query", "url", "input"])
    ))]
    Analyze {
        /// Raw query string, e.g. 'a=1&b=true&n=1,2,3'
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Analyze the query part of a full URL
        #[arg(long)]
        url: Option<String>,

        /// File with one key=value pair per line
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Only print the parameter type summary
        #[arg(long)]
        summary: bool,
    },

    /// Serve the analysis as a JSON HTTP endpoint at /api
    Serve {
        /// Interface to bind
        #[arg(long, env = "PARAMSCOPE_HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, env = "PARAMSCOPE_PORT", default_value_t = paramscope_server::config::DEFAULT_PORT)]
        port: u16,

        /// Emit compact (unindented) JSON responses
        #[arg(long)]
        compact: bool,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for paramscope.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    bash:  paramscope completion --shell bash >> ~/.bashrc
    zsh:   paramscope completion --shell zsh > ~/.zfunc/_paramscope
           (add `fpath=(~/.zfunc $fpath)` to ~/.zshrc)
    fish:  paramscope completion --shell fish > ~/.config/fish/completions/paramscope.fish")]
    Completion {
        /// Target shell
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Analyze {
            query,
            url,
            input,
            summary,
        } => {
            let source = match (query, url, input) {
                (_, _, Some(path)) => ParameterSource::File(path),
                (_, Some(url), None) => ParameterSource::Url(url),
                (query, None, None) => ParameterSource::Query(query.unwrap_or_default()),
            };
            commands::analyze::execute(source, summary, cli.format)
        }
        Commands::Serve {
            host,
            port,
            compact,
        } => commands::serve::execute(host, port, compact),
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "paramscope=debug,paramscope_cli=debug,paramscope_core=debug,paramscope_server=debug",
        )
    } else {
        EnvFilter::new("paramscope=info,paramscope_cli=info,paramscope_server=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
