//! NewsRAG CLI
//!
//! Command-line client for the NewsRAG knowledge base

mod console;
mod context;

use clap::{Args, Parser, Subcommand};
use console::print_json;
use context::Context;
use newsrag_config_file::{ClientConfig, LoggingConfig};
use newsrag_egress::UploadFile;
use newsrag_egress::api::{
    AskRequest, KnowledgeListParams, KnowledgeSearch, KnowledgeUpdate, LoginRequest,
    NewKnowledgeEntry, RegisterRequest, SearchQuery,
};
use newsrag_egress::api::query::DEFAULT_TOP_K;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "newsrag")]
#[command(about = "NewsRAG - news knowledge base and question answering client", long_about = None)]
struct Cli {
    /// Config file (YAML or TOML); defaults to config.yaml in ~/.newsrag or $NEWSRAG_CONFIG_DIR
    #[arg(long, global = true, env = "NEWSRAG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "NEWSRAG_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        remember_me: bool,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "NEWSRAG_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(short, long)]
        email: String,

        #[arg(long)]
        full_name: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the current session
    Whoami,
    /// Ask a question
    Ask {
        query: String,

        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,

        /// Only retrieve entries, skip answer generation
        #[arg(long)]
        no_answer: bool,

        #[arg(long)]
        similarity_threshold: Option<f64>,

        /// Use the backend's /query/ask even when a webhook is configured
        #[arg(long)]
        backend: bool,
    },
    /// Semantic search over the knowledge base
    Search {
        query: String,

        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,
    },
    /// Manage knowledge entries
    #[command(subcommand)]
    Knowledge(KnowledgeCommand),
    /// Dashboard statistics
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Navigate to a client route through the route guard
    Open { route: String },
}

#[derive(Subcommand)]
enum KnowledgeCommand {
    /// List entries page by page
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,

        #[arg(long)]
        keyword: Option<String>,

        #[arg(long)]
        content_type: Option<String>,

        #[arg(long)]
        start_date: Option<String>,

        #[arg(long)]
        end_date: Option<String>,
    },
    Get { id: i64 },
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        #[command(flatten)]
        fields: EntryFields,
    },
    Update {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: EntryFields,
    },
    Delete { id: i64 },
    BatchDelete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Advanced search
    Search {
        keyword: String,

        /// keyword, semantic or hybrid
        #[arg(long, default_value = "hybrid")]
        search_type: String,

        /// relevance, time or views
        #[arg(long, default_value = "relevance")]
        sort_by: String,

        #[arg(long, default_value = "desc")]
        sort_order: String,

        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 20)]
        size: u64,
    },
    /// Upload a document as a new entry
    Upload {
        path: PathBuf,

        #[arg(long)]
        mime_type: Option<String>,
    },
}

#[derive(Args)]
struct EntryFields {
    #[arg(long)]
    content_type: Option<String>,

    #[arg(long)]
    summary: Option<String>,

    #[arg(long)]
    source_name: Option<String>,

    #[arg(long)]
    source_url: Option<String>,

    #[arg(long)]
    author: Option<String>,
}

#[derive(Subcommand)]
enum StatsCommand {
    Overview,
    Detailed,
    /// Ten most frequent keywords
    Keywords,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging);

    let ctx = Context::build(&config)?;
    run(cli.command, &ctx).await
}

/// Logs go to stderr; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if logging.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    if let Err(e) = result {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}

async fn run(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Login {
            username,
            password,
            remember_me,
        } => {
            let request = LoginRequest {
                remember_me: remember_me.then_some(true),
                ..LoginRequest::new(username, password)
            };
            ctx.auth.login(&request).await?;
            let landed = ctx.router.push(newsrag_core::LOGIN_ROUTE);
            print_json(&json!({
                "username": ctx.session.username(),
                "route": landed,
            }))?;
        }
        Commands::Register {
            username,
            password,
            email,
            full_name,
        } => {
            let request = RegisterRequest {
                username,
                confirm_password: password.clone(),
                password,
                email,
                full_name,
            };
            print_json(&ctx.auth.register(&request).await?)?;
        }
        Commands::Logout => {
            if ctx.auth.logout() {
                info!("Logged out");
            }
            print_json(&json!({ "loggedIn": false }))?;
        }
        Commands::Whoami => {
            let session = ctx.session.snapshot();
            print_json(&json!({
                "loggedIn": session.is_logged_in(),
                "username": session.username,
                "role": session.role(),
                "userInfo": session.user_info,
            }))?;
        }
        Commands::Ask {
            query,
            top_k,
            no_answer,
            similarity_threshold,
            backend,
        } => {
            let request = ask_request(query, top_k, no_answer, similarity_threshold);
            match ctx.webhook.as_ref().filter(|_| !backend) {
                Some(webhook) => print_json(&webhook.ask(&request).await?)?,
                None => print_json(&ctx.api.query.ask(&request).await?)?,
            }
        }
        Commands::Search { query, top_k } => {
            let result = ctx
                .api
                .query
                .semantic_search(&SearchQuery::new(query).top_k(top_k))
                .await?;
            print_json(&result)?;
        }
        Commands::Knowledge(command) => run_knowledge(command, ctx).await?,
        Commands::Stats(command) => {
            let stats = &ctx.api.statistics;
            match command {
                StatsCommand::Overview => print_json(&stats.overview().await?)?,
                StatsCommand::Detailed => print_json(&stats.detailed().await?)?,
                StatsCommand::Keywords => print_json(&stats.keywords_top10().await?)?,
            }
        }
        Commands::Open { route } => {
            let landed = ctx.router.push(&route);
            print_json(&json!({
                "requested": route,
                "route": landed,
            }))?;
        }
    }

    Ok(())
}

/// Same request for the backend and the webhook, so both honour the flags
fn ask_request(
    query: String,
    top_k: u32,
    no_answer: bool,
    similarity_threshold: Option<f64>,
) -> AskRequest {
    let mut request = AskRequest::new(query).top_k(top_k).need_answer(!no_answer);
    if let Some(threshold) = similarity_threshold {
        request = request.similarity_threshold(threshold);
    }
    request
}

async fn run_knowledge(command: KnowledgeCommand, ctx: &Context) -> anyhow::Result<()> {
    let knowledge = &ctx.api.knowledge;

    match command {
        KnowledgeCommand::List {
            page,
            size,
            keyword,
            content_type,
            start_date,
            end_date,
        } => {
            let params = KnowledgeListParams {
                page,
                size,
                keyword,
                content_type,
                start_date,
                end_date,
            };
            print_json(&knowledge.list(&params).await?)?;
        }
        KnowledgeCommand::Get { id } => print_json(&knowledge.get(id).await?)?,
        KnowledgeCommand::Create {
            title,
            content,
            fields,
        } => {
            let entry = NewKnowledgeEntry {
                title,
                content,
                content_type: fields.content_type,
                summary: fields.summary,
                source_name: fields.source_name,
                source_url: fields.source_url,
                author: fields.author,
                tags: None,
            };
            print_json(&knowledge.create(&entry).await?)?;
        }
        KnowledgeCommand::Update { id, title, fields } => {
            let update = KnowledgeUpdate {
                title,
                summary: fields.summary,
                source_name: fields.source_name,
                source_url: fields.source_url,
                author: fields.author,
                tags: None,
                content_type: fields.content_type,
            };
            print_json(&knowledge.update(id, &update).await?)?;
        }
        KnowledgeCommand::Delete { id } => {
            knowledge.delete(id).await?;
            print_json(&json!({ "deleted": id }))?;
        }
        KnowledgeCommand::BatchDelete { ids } => {
            print_json(&knowledge.batch_delete(&ids).await?)?;
        }
        KnowledgeCommand::Search {
            keyword,
            search_type,
            sort_by,
            sort_order,
            page,
            size,
        } => {
            let search = KnowledgeSearch {
                search_type,
                sort_by,
                sort_order,
                current: page,
                size,
                ..KnowledgeSearch::keyword(keyword)
            };
            print_json(&knowledge.search(&search).await?)?;
        }
        KnowledgeCommand::Upload { path, mime_type } => {
            let mut file = UploadFile::from_path(&path).await?;
            if let Some(mime_type) = mime_type {
                file = file.with_mime_type(mime_type);
            }
            print_json(&knowledge.upload(file).await?)?;
        }
    }

    Ok(())
}
