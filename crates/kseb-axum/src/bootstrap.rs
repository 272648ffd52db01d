//! Axum server bootstrap - the composition root.
//!
//! This module is the only place where concrete adapters are instantiated
//! and wired into the agent. Everything downstream sees ports.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kseb_agent::{AgentExecutor, ChatService, ToolRegistry};
use kseb_backend::MainServerClient;
use kseb_core::{
    ArtifactStore, BackendPort, LlmPort, PageReaderPort, PaperSearchPort, PdfTextPort, Settings,
    WebSearchPort, validate_settings,
};
use kseb_docs::FsArtifactStore;
use kseb_llm::{OpenAiClient, OpenAiConfig};
use kseb_research::{
    AnalysisProfile, ArxivClient, DeepSearch, GoogleSearchClient, HtmlPageReader, JinaReader,
    PaperAnalyst, PdfFetcher, SemanticScholarClient,
};
use kseb_tools::{
    CreateScheduleTool, DeleteScheduleTool, DownloadLinks, Gatherer, GeneratePptTool,
    GenerateReportTool, GetScheduleTool, ReadWebPageTool, RecommendMeetingTimeTool,
    ResearchTool, Researcher, SummarizeChannelTool, UpdateScheduleTool,
};

use crate::auth::JwtVerifier;

/// How often expired documents are looked for.
const ARTIFACT_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// An empty list means allow all.
    pub fn from_origins(origins: &[String]) -> Self {
        if origins.is_empty() {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins.to_vec())
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: settings.server_host.clone(),
            port: settings.server_port,
            cors: CorsConfig::from_origins(&settings.cors_origins),
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Services the handlers need.
pub struct AxumContext {
    pub chat: Arc<ChatService>,
    pub auth: Arc<JwtVerifier>,
    pub artifacts: Arc<dyn ArtifactStore>,
    /// Prefix of the versioned API, e.g. `/api/v1`.
    pub api_prefix: String,
}

impl AxumContext {
    pub fn new(
        chat: Arc<ChatService>,
        auth: Arc<JwtVerifier>,
        artifacts: Arc<dyn ArtifactStore>,
        api_prefix: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            auth,
            artifacts,
            api_prefix: api_prefix.into(),
        }
    }
}

/// The adapters every tool is built from.
#[derive(Clone)]
pub struct ToolDeps {
    pub llm: Arc<dyn LlmPort>,
    pub backend: Arc<dyn BackendPort>,
    pub web_search: Arc<dyn WebSearchPort>,
    /// Reader used by deep search.
    pub search_reader: Arc<dyn PageReaderPort>,
    /// Reader behind `read_web_page`.
    pub page_reader: Arc<dyn PageReaderPort>,
    pub arxiv: Arc<dyn PaperSearchPort>,
    pub semantic_scholar: Arc<dyn PaperSearchPort>,
    pub pdf: Arc<dyn PdfTextPort>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub links: DownloadLinks,
}

impl ToolDeps {
    /// Instantiate the HTTP adapters configured by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let llm = OpenAiClient::new(
            OpenAiConfig::new(&settings.openai_api_key, &settings.openai_model)
                .with_base_url(&settings.openai_api_base_url),
        )
        .context("Failed to create LLM client")?;
        let backend = MainServerClient::new(&settings.main_server_url)
            .context("Failed to create main server client")?;
        let web_search = GoogleSearchClient::new(&settings.google_api_key, &settings.google_cse_id)
            .context("Failed to create web search client")?;

        Ok(Self {
            llm: Arc::new(llm),
            backend: Arc::new(backend),
            web_search: Arc::new(web_search),
            search_reader: Arc::new(JinaReader::new().context("Failed to create page reader")?),
            page_reader: Arc::new(HtmlPageReader::new().context("Failed to create page reader")?),
            arxiv: Arc::new(ArxivClient::new().context("Failed to create arXiv client")?),
            semantic_scholar: Arc::new(
                SemanticScholarClient::new(settings.semantic_scholar_api_key.clone())
                    .context("Failed to create Semantic Scholar client")?,
            ),
            pdf: Arc::new(PdfFetcher::new().context("Failed to create PDF fetcher")?),
            artifacts: Arc::new(FsArtifactStore::new(settings.artifact_dir.clone())),
            links: DownloadLinks::from_settings(settings),
        })
    }
}

/// Register every agent tool.
pub fn build_tool_registry(deps: &ToolDeps) -> ToolRegistry {
    let deep_search: Arc<dyn Researcher> = Arc::new(DeepSearch::new(
        deps.web_search.clone(),
        deps.search_reader.clone(),
    ));
    let arxiv: Arc<dyn Researcher> = Arc::new(PaperAnalyst::new(
        deps.llm.clone(),
        deps.arxiv.clone(),
        deps.pdf.clone(),
        AnalysisProfile::ARXIV,
    ));
    let semantic_scholar: Arc<dyn Researcher> = Arc::new(PaperAnalyst::new(
        deps.llm.clone(),
        deps.semantic_scholar.clone(),
        deps.pdf.clone(),
        AnalysisProfile::SEMANTIC_SCHOLAR,
    ));
    let gatherer = Arc::new(Gatherer::new(
        deps.backend.clone(),
        deep_search.clone(),
        semantic_scholar.clone(),
    ));

    ToolRegistry::new()
        .with(Arc::new(GetScheduleTool::new(deps.backend.clone())))
        .with(Arc::new(CreateScheduleTool::new(deps.backend.clone())))
        .with(Arc::new(UpdateScheduleTool::new(deps.backend.clone())))
        .with(Arc::new(DeleteScheduleTool::new(deps.backend.clone())))
        .with(Arc::new(RecommendMeetingTimeTool::new(deps.backend.clone())))
        .with(Arc::new(SummarizeChannelTool::new(
            deps.backend.clone(),
            deps.llm.clone(),
        )))
        .with(Arc::new(GenerateReportTool::new(
            gatherer.clone(),
            deps.llm.clone(),
            deps.artifacts.clone(),
            deps.links.clone(),
        )))
        .with(Arc::new(GeneratePptTool::new(
            gatherer,
            deps.llm.clone(),
            deps.artifacts.clone(),
            deps.links.clone(),
        )))
        .with(Arc::new(ResearchTool::deep_search(deep_search)))
        .with(Arc::new(ResearchTool::arxiv(arxiv)))
        .with(Arc::new(ResearchTool::semantic_scholar(semantic_scholar)))
        .with(Arc::new(ReadWebPageTool::new(deps.page_reader.clone())))
}

/// Assemble the handler context from already-built adapters.
pub fn assemble(settings: &Settings, deps: &ToolDeps) -> Result<AxumContext> {
    let registry = build_tool_registry(deps);
    tracing::info!(tools = ?registry.names(), "Agent tools registered");

    let executor = AgentExecutor::new(deps.llm.clone(), Arc::new(registry))
        .with_max_iterations(settings.agent_max_iterations);
    let auth = JwtVerifier::from_settings(settings).context("Invalid JWT configuration")?;

    Ok(AxumContext::new(
        Arc::new(ChatService::new(executor)),
        Arc::new(auth),
        deps.artifacts.clone(),
        settings.api_v1_str.clone(),
    ))
}

/// Validate `settings` and wire every service.
pub fn bootstrap(settings: &Settings) -> Result<AxumContext> {
    validate_settings(settings).context("Invalid settings")?;

    tracing::info!(
        target: "kseb.bootstrap",
        main_server = %settings.main_server_url,
        model = %settings.openai_model,
        artifact_dir = %settings.artifact_dir.display(),
        api_prefix = %settings.api_v1_str,
        artifact_ttl_hours = settings.artifact_ttl_hours,
        max_iterations = settings.agent_max_iterations,
        "Bootstrapping chatbot server"
    );

    let deps = ToolDeps::from_settings(settings)?;
    assemble(settings, &deps)
}

/// Periodically delete documents older than `ttl`; the first sweep runs at once.
pub fn spawn_artifact_sweeper(
    store: FsArtifactStore,
    ttl: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ARTIFACT_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(e) = store.purge_older_than(ttl).await {
                tracing::warn!(error = %e, dir = %store.dir().display(), "Artifact sweep failed");
            }
        }
    })
}

/// Bootstrap and serve until the process is stopped.
pub async fn start_server(settings: &Settings, config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(settings)?;
    match settings.artifact_ttl() {
        Some(ttl) => {
            spawn_artifact_sweeper(FsArtifactStore::new(settings.artifact_dir.clone()), ttl);
        }
        None => tracing::info!("Artifact expiry disabled; generated documents are kept"),
    }
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("KSEB chatbot server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
