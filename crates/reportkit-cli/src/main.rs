//! ReportKit CLI - locate research reports and study them from the terminal

mod chat;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reportkit::study::DEFAULT_MODEL;
use reportkit::{
    DocumentRetriever, DuckDuckGoSearch, FetchOptions, HttpFetcher, Language, OpenAiChat,
    ResolvedSource, SourceResolver, StudySession, StudySettings, DEFAULT_FALLBACK_QUERY,
    PORTAL_ORGAN_LIST_URL, PORTAL_SEARCH_URL,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type Resolver = SourceResolver<Arc<HttpFetcher>, DuckDuckGoSearch<Arc<HttpFetcher>>>;

/// Output format for the resolve subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter
    #[default]
    Md,
    /// JSON format
    Json,
}

/// Well-known portal pages
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Research report list of the organization
    OrganList,
    /// Portal total-search results
    TotalSearch,
}

impl Preset {
    fn url(self) -> &'static str {
        match self {
            Preset::OrganList => PORTAL_ORGAN_LIST_URL,
            Preset::TotalSearch => PORTAL_SEARCH_URL,
        }
    }
}

/// ReportKit - research report acquisition and study assistant
#[derive(Parser, Debug)]
#[command(name = "reportkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    net: NetArgs,
}

#[derive(Args, Debug)]
struct NetArgs {
    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Page timeout in seconds
    #[arg(long, global = true, default_value_t = 12)]
    timeout: u64,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Report, listing or search page URL
    #[arg(required_unless_present = "preset")]
    url: Option<String>,

    /// Start from a portal page instead of a URL
    #[arg(long, conflicts_with = "url")]
    preset: Option<Preset>,

    /// Web search query used when the page yields no report text
    #[arg(long, short, default_value = DEFAULT_FALLBACK_QUERY)]
    query: String,
}

impl SourceArgs {
    fn url(&self) -> &str {
        match (self.preset, &self.url) {
            (Some(preset), _) => preset.url(),
            (None, Some(url)) => url,
            (None, None) => "",
        }
    }
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    /// Chat model name
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Output language (ko, en)
    #[arg(long, default_value = "ko")]
    language: Language,
}

impl ModelArgs {
    fn chat_model(&self) -> OpenAiChat {
        OpenAiChat::new(&self.api_key, &self.model)
    }

    fn settings(&self) -> StudySettings {
        StudySettings::default().language(self.language)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a report and print its text with metadata frontmatter
    Resolve {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
    /// List report-detail links found on a listing page
    Candidates {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List document download links found on a page
    Documents {
        /// Page URL
        url: String,
    },
    /// Download a document into a directory
    Download {
        /// Document URL
        url: String,

        /// Target directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Number used in the fallback file name
        #[arg(long, default_value_t = 1)]
        index: usize,
    },
    /// Resolve a report and summarize it
    Summarize {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// Number of bullet points (3-10)
        #[arg(long, default_value_t = 5)]
        bullets: usize,
    },
    /// Resolve a report and generate a quiz
    Quiz {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// Number of questions (3-8)
        #[arg(long, default_value_t = 5)]
        questions: usize,
    },
    /// Resolve a report and answer questions from stdin, one per line
    Chat {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        model: ModelArgs,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("Usage: reportkit resolve <URL>");
        eprintln!("   or: reportkit resolve --preset organ-list");
        eprintln!("   or: reportkit --help");
        std::process::exit(1);
    };

    let resolver = build_resolver(&cli.net);

    match command {
        Commands::Resolve { source, output } => run_resolve(&resolver, &source, output).await,
        Commands::Candidates { source } => {
            for link in resolver.listing_candidates(source.url()).await {
                writeln_safe(&link);
            }
        }
        Commands::Documents { url } => {
            for link in resolver.document_links(&url).await {
                writeln_safe(&link);
            }
        }
        Commands::Download { url, dir, index } => {
            run_download(resolver.fetcher().clone(), &url, &dir, index).await
        }
        Commands::Summarize {
            source,
            model,
            bullets,
        } => {
            let mut session = load_session(&resolver, &source).await;
            let settings = model.settings().max_bullets(bullets);
            match session.summarize(&model.chat_model(), &settings).await {
                Ok(summary) => writeln_safe(summary),
                Err(e) => fail(e),
            }
        }
        Commands::Quiz {
            source,
            model,
            questions,
        } => {
            let mut session = load_session(&resolver, &source).await;
            let settings = model.settings().question_count(questions);
            match session.quiz(&model.chat_model(), &settings).await {
                Ok(quiz) => writeln_safe(quiz),
                Err(e) => fail(e),
            }
        }
        Commands::Chat { source, model } => {
            let mut session = load_session(&resolver, &source).await;
            chat::run(&mut session, &model.chat_model(), &model.settings()).await;
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn build_resolver(net: &NetArgs) -> Resolver {
    let mut options = FetchOptions::default().text_timeout(Duration::from_secs(net.timeout));
    if let Some(ua) = &net.user_agent {
        options = options.user_agent(ua);
    }

    let fetcher = match HttpFetcher::with_options(options) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => fail(e),
    };
    SourceResolver::new(fetcher.clone(), DuckDuckGoSearch::new(fetcher))
}

async fn run_resolve(resolver: &Resolver, args: &SourceArgs, output: OutputFormat) {
    let url = args.url();
    let candidates = resolver.listing_candidates(url).await;

    let source = match resolver
        .resolve_with_candidates(url, &candidates, &args.query)
        .await
    {
        Ok(source) => source,
        Err(e) => {
            print_candidates(&candidates);
            fail(e)
        }
    };
    let documents = resolver.document_links(&source.url).await;

    match output {
        OutputFormat::Md => writeln_safe(&format_md_with_frontmatter(&source, &documents)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&SourceOutput {
                source: &source,
                provenance: source.provenance(),
                characters: source.char_count(),
                documents: &documents,
            })
            .unwrap_or_else(|e| {
                eprintln!("Error serializing response: {}", e);
                std::process::exit(1);
            });
            writeln_safe(&json);
        }
    }
}

async fn run_download(fetcher: Arc<HttpFetcher>, url: &str, dir: &std::path::Path, index: usize) {
    let retriever = DocumentRetriever::new(fetcher);
    let doc = match retriever.fetch_document(url).await {
        Ok(doc) => doc,
        Err(e) => fail(e),
    };

    let path = dir.join(safe_file_name(&doc.file_name_or_default(index)));
    if let Err(e) = std::fs::write(&path, &doc.bytes) {
        eprintln!("Error writing {}: {}", path.display(), e);
        std::process::exit(1);
    }
    tracing::debug!(path = %path.display(), content_type = %doc.content_type, "Document saved");
    writeln_safe(&path.display().to_string());
}

/// Load the report into a fresh session, or exit listing the candidates
async fn load_session(resolver: &Resolver, args: &SourceArgs) -> StudySession {
    let mut session = StudySession::new();
    let loaded = session
        .load(resolver, args.url(), &args.query)
        .await
        .map(|source| format!("{} ({})", source.url, source.provenance()));
    match loaded {
        Ok(loaded) => eprintln!("Loaded {}", loaded),
        Err(e) => {
            print_candidates(session.candidates());
            fail(e)
        }
    }
    session
}

fn print_candidates(candidates: &[String]) {
    if candidates.is_empty() {
        return;
    }
    eprintln!("Report candidates on the listing page:");
    for (i, link) in candidates.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, link);
    }
}

#[derive(Serialize)]
struct SourceOutput<'a> {
    #[serde(flatten)]
    source: &'a ResolvedSource,
    provenance: &'a str,
    characters: usize,
    documents: &'a [String],
}

/// Format a resolved source as markdown with YAML frontmatter
fn format_md_with_frontmatter(source: &ResolvedSource, documents: &[String]) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("url: {}\n", source.url));
    output.push_str(&format!("provenance: {}\n", source.provenance()));
    output.push_str(&format!("characters: {}\n", source.char_count()));
    if !documents.is_empty() {
        output.push_str("documents:\n");
        for link in documents {
            output.push_str(&format!("  - {}\n", link));
        }
    }
    output.push_str("---\n");
    output.push_str(&source.text);

    output
}

/// Keep only the last path component of a server-supplied file name
fn safe_file_name(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if name.is_empty() || name == "." || name == ".." {
        "report.pdf".to_string()
    } else {
        name.to_string()
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(is_fallback: bool) -> ResolvedSource {
        ResolvedSource {
            url: "https://alio.go.kr/item/itemDetail.do?seq=1".to_string(),
            text: "수자원 보고서 본문".to_string(),
            is_fallback,
        }
    }

    #[test]
    fn test_format_md_basic() {
        let output = format_md_with_frontmatter(&source(false), &[]);

        assert!(output.starts_with("---\n"));
        assert!(output.contains("url: https://alio.go.kr/item/itemDetail.do?seq=1\n"));
        assert!(output.contains("provenance: portal\n"));
        assert!(output.contains("characters: 10\n"));
        assert!(!output.contains("documents:"));
        assert!(output.ends_with("---\n수자원 보고서 본문"));
    }

    #[test]
    fn test_format_md_with_documents() {
        let docs = vec![
            "https://alio.go.kr/files/a.pdf".to_string(),
            "https://alio.go.kr/download?id=2".to_string(),
        ];
        let output = format_md_with_frontmatter(&source(true), &docs);

        assert!(output.contains("provenance: search-fallback\n"));
        assert!(output.contains(
            "documents:\n  - https://alio.go.kr/files/a.pdf\n  - https://alio.go.kr/download?id=2\n---\n"
        ));
    }

    #[test]
    fn test_json_output_fields() {
        let source = source(true);
        let json = serde_json::to_value(SourceOutput {
            source: &source,
            provenance: source.provenance(),
            characters: source.char_count(),
            documents: &[],
        })
        .unwrap();

        assert_eq!(json["url"], "https://alio.go.kr/item/itemDetail.do?seq=1");
        assert_eq!(json["is_fallback"], true);
        assert_eq!(json["provenance"], "search-fallback");
        assert_eq!(json["characters"], 10);
        assert!(json["documents"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("report.pdf"), "report.pdf");
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("a\\b.hwp"), "b.hwp");
        assert_eq!(safe_file_name(".."), "report.pdf");
        assert_eq!(safe_file_name("dir/"), "report.pdf");
    }

    #[test]
    fn test_preset_urls() {
        assert_eq!(Preset::OrganList.url(), PORTAL_ORGAN_LIST_URL);
        assert_eq!(Preset::TotalSearch.url(), PORTAL_SEARCH_URL);
    }

    #[test]
    fn test_cli_parses_preset() {
        let cli = Cli::parse_from(["reportkit", "resolve", "--preset", "organ-list", "-o", "json"]);
        match cli.command {
            Some(Commands::Resolve { source, output }) => {
                assert_eq!(source.url(), PORTAL_ORGAN_LIST_URL);
                assert_eq!(source.query, DEFAULT_FALLBACK_QUERY);
                assert!(matches!(output, OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.net.timeout, 12);
    }

    #[test]
    fn test_cli_rejects_url_with_preset() {
        let result = Cli::try_parse_from([
            "reportkit",
            "candidates",
            "https://x.org",
            "--preset",
            "total-search",
        ]);
        assert!(result.is_err());
    }
}
