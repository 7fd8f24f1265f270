use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tender")]
#[command(about = "Federated retrieval over procurement notices, web search and market data")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  tender search \"AI 바우처\"                    Web search, ranked
  tender search 005930 --tickers 005930       Quotes + company profile
  tender notices \"인공지능\"                    Paginated procurement notices

\x1b[1;36mEnvironment:\x1b[0m
  TAVILY_API_KEY     Web search / content extraction key
  PPS_SERVICE_KEY    data.go.kr service key for the notices command
  PPS_ROWS, PPS_PAGE_MAX, PPS_DATE_FROM, PPS_DATE_TO")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fan out a query to web search, quotes and company profile
    ///
    /// Sources run in parallel under one deadline; failures surface as
    /// labeled errors next to whatever the other sources returned.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tender search \"AI procurement Korea\"
  tender search 삼성전자 --tickers 005930,AAPL
  tender search AAPL --no-web")]
    Search {
        /// Search query (a bare ticker also triggers the profile lookup)
        query: String,

        /// Comma-separated ticker symbols for the quotes source
        #[arg(long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Keywords to search instead of the raw query
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,

        /// Skip the web search source
        #[arg(long)]
        no_web: bool,

        /// Maximum web results
        #[arg(long, default_value_t = 6)]
        limit: u32,
    },

    /// Page through procurement notices and rank them
    ///
    /// Fetches pages sequentially until an empty page, a short page or
    /// the page cap, then normalizes, dedupes and ranks the notices.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tender notices \"인공지능\"
  tender notices \"클라우드\" --rows 50 --pages 5")]
    Notices {
        /// Query forwarded to the listing API
        query: String,

        /// Rows per page
        #[arg(long)]
        rows: Option<u32>,

        /// Maximum pages to fetch
        #[arg(long)]
        pages: Option<u32>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Pretty,
    /// Raw JSON
    Json,
}
