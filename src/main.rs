use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use clap::{Parser, Subcommand};
use ranker::rankcore::cfg::{DbTarget, RankerCfg};
use ranker::rankcore::engine::Ranker;
use ranker::server::{self, AppState};

#[derive(Parser)]
#[derive(Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// BM25 ranking service over a posting index and a document store
struct Cli {
    #[clap(long, value_parser, env = "ROCKSDB_PATH", default_value = "/shared_data/search_index.db")]
    /// Posting index file
    index_path: PathBuf,
    #[clap(long, value_parser, env = "DB_HOST", default_value = "postgres_service")]
    /// Metadata database host
    db_host: String,
    #[clap(long, value_parser, env = "DB_PORT", default_value_t = 5432)]
    /// Metadata database port
    db_port: u16,
    #[clap(long, value_parser, env = "DB_NAME", default_value = "search_engine")]
    /// Metadata database name
    db_name: String,
    #[clap(long, value_parser, env = "DB_USER", default_value = "admin")]
    /// Metadata database user
    db_user: String,
    #[clap(long, value_parser, env = "DB_PASS", default_value = "password123", hide_env_values = true)]
    /// Metadata database password
    db_pass: String,
    #[clap(long, value_parser, env = "RANKER_CONFIG")]
    /// Ranking config (yaml)
    config: Option<PathBuf>,
    #[clap(long, value_parser, env = "RANKER_BIND", default_value = "0.0.0.0:5000")]
    /// Listen address
    bind: SocketAddr,
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
#[derive(Debug)]
enum Commands {
    /// Serve /health and /search over http (default)
    Serve,
    /// Run one query and print the ranking
    Search {
        #[clap(value_parser)]
        /// query text
        query: String,
        #[clap(short, long, value_parser)]
        /// number of results
        k: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let cfg = match load_cfg(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("cannot read config: {}", e);
            std::process::exit(1);
        }
    };
    let db = DbTarget {
        host: cli.db_host.clone(),
        port: cli.db_port,
        database: cli.db_name.clone(),
        user: cli.db_user.clone(),
        password: cli.db_pass.clone(),
    };
    let ranker = Ranker::connect(&db, &cli.index_path, &cfg).await;

    match cli.command {
        Some(Commands::Search { query, k }) => {
            command_search(&ranker, &query, k.unwrap_or(cfg.default_k)).await;
        },
        Some(Commands::Serve) | None => command_serve(ranker, cli.bind, cfg.default_k).await,
    }
}

fn load_cfg(path: Option<&Path>) -> std::io::Result<RankerCfg> {
    match path {
        Some(path) => RankerCfg::load(path),
        None => Ok(RankerCfg::default()),
    }
}

async fn command_search(ranker: &Ranker, query: &str, k: usize) {
    let results = ranker.search(query, k).await;
    if results.is_empty() {
        println!("no results");
        return;
    }
    println!("{} results", results.len());
    for (i, result) in results.iter().enumerate() {
        println!("{}:{} {:.4} {}", i + 1, result.id, result.score, result.url);
    }
}

async fn command_serve(ranker: Ranker, bind: SocketAddr, default_k: usize) {
    let state = AppState {
        ranker: Arc::new(ranker),
        default_k: default_k.max(1),
    };
    if let Err(e) = server::serve(bind, state).await {
        eprintln!("server error on {}: {}", bind, e);
        std::process::exit(1);
    }
}
