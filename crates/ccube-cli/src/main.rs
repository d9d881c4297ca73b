//! ccube CLI: serve the C-Cube QA store over HTTP or query it offline.
//!
//! Commands: serve, init, question, questions, answers, votes, tags, stats,
//! completions

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ccube_core::SystemClock;
use ccube_query::questions::DEFAULT_LIST_LIMIT;
use ccube_query::tags::DEFAULT_TAG_LIMIT;
use ccube_query::{
    format_json, format_results, parse_target, AnswerAggregator, ListQuery, OutputFormat,
    QuestionRepository, QuestionSort, StatsAggregator, TagAggregator, TagQuery, VoteAggregator,
};
use ccube_server::{AppState, ServerConfig};
use ccube_store::QaStore;

#[derive(Parser)]
#[command(name = "ccube")]
#[command(version)]
#[command(about = "File-backed Q&A store for C-Cube")]
struct Cli {
    /// Store root [env: CCUBE_STORE_DIR, default: ./data/qa]
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Tracing filter [env: CCUBE_LOG_LEVEL, default: info]
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format for listings
    #[arg(long, short, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
    Markdown,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => Self::Json,
            Format::Table => Self::Table,
            Format::Markdown => Self::Markdown,
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the read-only HTTP API
    Serve {
        /// Listen address [env: CCUBE_BIND, default: 127.0.0.1:8080]
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// Do not count views on GET /questions/{id}
        #[arg(long)]
        no_record_views: bool,
    },
    /// Create an empty store layout
    Init {
        /// Directory to initialize (defaults to the store root)
        dir: Option<PathBuf>,
    },
    /// Show one question with its related questions
    #[command(alias = "q")]
    Question {
        id: String,
        /// Count this read as a view
        #[arg(long)]
        record_view: bool,
    },
    /// List questions
    #[command(alias = "ls")]
    Questions {
        /// Tag to filter by
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive text in title, content, or tags
        #[arg(long)]
        search: Option<String>,
        /// newest, active, votes, views, or trending
        #[arg(long, default_value = "newest")]
        sort: String,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// List the answers to a question
    Answers { question_id: String },
    /// List the votes on a question or answer
    Votes {
        /// question or answer
        target: String,
        id: String,
    },
    /// List tags
    Tags {
        /// Tag category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
        /// Order by popularity instead of name
        #[arg(long)]
        popular: bool,
        #[arg(long, default_value_t = DEFAULT_TAG_LIMIT)]
        limit: usize,
    },
    /// Site statistics
    Stats,
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(store) = cli.store {
        config.store_dir = store;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_tracing(&config.log_level);

    let store = QaStore::open(&config.store_dir);
    let format = OutputFormat::from(cli.format);

    match cli.command {
        Commands::Serve {
            bind,
            no_record_views,
        } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if no_record_views {
                config.record_views = false;
            }
            info!(
                version = env!("CARGO_PKG_VERSION"),
                store = %config.store_dir.display(),
                record_views = config.record_views,
                "ccube starting"
            );
            let state = AppState::new(store, Arc::new(SystemClock), config.record_views);
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime
                .block_on(ccube_server::serve(state, config.bind))
                .with_context(|| format!("server on {} failed", config.bind))?;
        }
        Commands::Init { dir } => {
            let root = dir.unwrap_or(config.store_dir);
            QaStore::init(&root)
                .with_context(|| format!("failed to initialize {}", root.display()))?;
            println!("Initialized QA store at {}", root.display());
        }
        Commands::Question { id, record_view } => {
            let repo = QuestionRepository::new(store, Arc::new(SystemClock));
            let detail = if record_view {
                repo.fetch(&id)?
            } else {
                repo.peek(&id)?
            };
            println!("{}", format_json(&detail));
        }
        Commands::Questions {
            category,
            search,
            sort,
            limit,
            offset,
        } => {
            let repo = QuestionRepository::new(store, Arc::new(SystemClock));
            let listing = repo.list(&ListQuery {
                category,
                search,
                sort: QuestionSort::from_param(&sort),
                limit,
                offset,
            })?;
            println!("{}", format_results(&listing, format));
        }
        Commands::Answers { question_id } => {
            let listing = AnswerAggregator::new(store).answers_for(&question_id)?;
            println!("{}", format_results(&listing, format));
        }
        Commands::Votes { target, id } => {
            let (target, id) = parse_target(Some(target.as_str()), Some(id.as_str()))?;
            let listing = VoteAggregator::new(store).votes_for(target, &id)?;
            println!("{}", format_results(&listing, format));
        }
        Commands::Tags {
            category,
            popular,
            limit,
        } => {
            let listing = TagAggregator::new(store).list(&TagQuery {
                category,
                popular,
                limit,
            })?;
            println!("{}", format_results(&listing, format));
        }
        Commands::Stats => {
            let stats = StatsAggregator::new(store, Arc::new(SystemClock)).site_stats()?;
            println!("{}", format_json(&stats));
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ccube", &mut io::stdout());
        }
    }

    Ok(())
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .compact()
        .init();
}
