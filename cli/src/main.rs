use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Parser, Debug)]
#[command(name = "doxify")]
#[command(about = "Doxify CLI - Publish and browse pages over HTTP", long_about = None)]
struct Cli {
    /// Base URL of a running Doxify server
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a page name is still free
    Check {
        /// Page name (letters, numbers and hyphens, 3-50 characters)
        slug: String,
    },
    /// Publish a new page
    Create(CreateArgs),
    /// Print a page as JSON
    Show { slug: String },
    /// List recent pages
    List {
        /// Case-insensitive search over slug, title and content
        #[arg(short, long)]
        query: Option<String>,
        /// Maximum number of pages to return
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct CreateArgs {
    slug: String,
    #[arg(short, long)]
    title: String,
    /// Page body
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    content: Option<String>,
    /// Read the page body from a file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Serialize)]
struct CreatePageRequest {
    slug: String,
    title: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct CreatePageResponse {
    slug: String,
    url: String,
}

#[derive(Deserialize, Debug)]
struct Availability {
    available: bool,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Page {
    slug: String,
    title: String,
    content: String,
    created_at: String,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = Client::new(&cli.api_url);

    match cli.command {
        Commands::Check { slug } => check(&client, &slug).await,
        Commands::Create(args) => create(&client, args).await,
        Commands::Show { slug } => show(&client, &slug).await,
        Commands::List { query, limit } => list(&client, query, limit).await,
    }
}

struct Client {
    base: String,
    http: reqwest::Client,
}

impl Client {
    fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// JSON endpoint for one page, with the slug percent-encoded as a single
    /// path segment.
    fn page_url(&self, slug: &str) -> Result<String> {
        let mut url = reqwest::Url::parse(&self.base)
            .with_context(|| format!("Invalid API URL: {}", self.base))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API URL cannot have a path: {}", self.base))?
            .pop_if_empty()
            .extend(["api", "pages", slug]);
        Ok(url.into())
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .context("Failed to parse server response");
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => bail!("{} ({})", body.error, status),
            Err(_) => bail!("Request failed with status: {}", status),
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.fetch(self.url(path), query).await
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        Self::decode(response).await
    }
}

async fn check(client: &Client, slug: &str) -> Result<()> {
    let availability: Availability = client
        .get("/check-slug", &[("slug", slug.to_string())])
        .await?;

    let shown = availability.slug.as_deref().unwrap_or(slug);
    if availability.available {
        println!("✓ /{shown} is available");
    } else {
        let reason = availability.reason.as_deref().unwrap_or("taken");
        println!("✗ /{shown} is not available ({})", reason.replace('_', " "));
    }
    Ok(())
}

async fn create(client: &Client, args: CreateArgs) -> Result<()> {
    let content = match (args.content, args.file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("either --content or --file is required"),
    };

    let request = CreatePageRequest {
        slug: args.slug,
        title: args.title,
        content,
    };

    let url = client.url("/create");
    tracing::debug!("POST {}", url);
    let response = client
        .http
        .post(&url)
        .json(&request)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {url}"))?;
    let created: CreatePageResponse = Client::decode(response).await?;

    println!("✓ Page created successfully!");
    println!("  Slug: {}", created.slug);
    println!("  URL:  {}", client.url(&created.url));
    Ok(())
}

async fn show(client: &Client, slug: &str) -> Result<()> {
    let page: Page = client.fetch(client.page_url(slug)?, &[]).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

async fn list(client: &Client, query: Option<String>, limit: Option<usize>) -> Result<()> {
    let mut params = Vec::new();
    if let Some(q) = query {
        params.push(("q", q));
    }
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }

    let pages: Vec<Page> = client.get("/list", &params).await?;
    if pages.is_empty() {
        println!("No pages found.");
    }
    for page in pages {
        println!("/{:<50} {}  {}", page.slug, page.created_at, page.title);
    }
    Ok(())
}
