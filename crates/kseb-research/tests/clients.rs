//! HTTP client tests against mock servers.

use kseb_core::{PageReaderPort, PaperSearchPort, PdfTextPort, ResearchError, WebSearchPort};
use kseb_research::{
    ArxivClient, GoogleSearchClient, HtmlPageReader, JinaReader, PdfFetcher,
    SemanticScholarClient,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn google_search_maps_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "g-key"))
        .and(query_param("cx", "cse-1"))
        .and(query_param("q", "러스트 비동기"))
        .and(query_param("num", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"title": "Tokio", "link": "https://tokio.rs", "snippet": "runtime"},
                {"title": "No link"}
            ]
        })))
        .mount(&server)
        .await;

    let client = GoogleSearchClient::new("g-key", "cse-1")
        .unwrap()
        .with_endpoint(format!("{}/customsearch/v1", server.uri()));
    let hits = client.search("러스트 비동기", 3).await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].link.as_deref(), Some("https://tokio.rs"));
    assert_eq!(hits[1].link, None);
}

#[tokio::test]
async fn google_search_without_items_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "customsearch#search"})))
        .mount(&server)
        .await;

    let client = GoogleSearchClient::new("k", "c").unwrap().with_endpoint(server.uri());
    assert!(client.search("q", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn google_search_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = GoogleSearchClient::new("k", "c").unwrap().with_endpoint(server.uri());
    let err = client.search("q", 3).await.unwrap_err();
    assert!(matches!(err, ResearchError::Http { status: 403, .. }));
}

#[tokio::test]
async fn jina_reader_prefixes_target_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/https://example.com/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Title: Post\n\nBody"))
        .mount(&server)
        .await;

    let reader = JinaReader::new().unwrap().with_base_url(server.uri());
    let text = reader.read("https://example.com/post").await.unwrap();
    assert_eq!(text, "Title: Post\n\nBody");
}

#[tokio::test]
async fn html_reader_returns_visible_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><nav>menu</nav><article><p>본문입니다</p></article></body></html>",
        ))
        .mount(&server)
        .await;

    let reader = HtmlPageReader::new().unwrap();
    let text = reader.read(&format!("{}/page", server.uri())).await.unwrap();
    assert_eq!(text, "본문입니다");
}

#[tokio::test]
async fn html_reader_rejects_non_http_urls() {
    let reader = HtmlPageReader::new().unwrap();
    let err = reader.read("file:///etc/passwd").await.unwrap_err();
    assert!(matches!(err, ResearchError::Parse(_)));
}

#[tokio::test]
async fn arxiv_search_sends_relevance_query() {
    let server = MockServer::start().await;
    let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom">
      <entry>
        <id>http://arxiv.org/abs/2101.00001v1</id>
        <published>2021-01-01T00:00:00Z</published>
        <title>Graph Neural Networks</title>
        <summary>We survey GNNs.</summary>
        <author><name>Kim</name></author>
        <link title="pdf" href="http://arxiv.org/pdf/2101.00001v1" rel="related"/>
      </entry>
    </feed>"#;
    Mock::given(method("GET"))
        .and(query_param("search_query", "all:graph neural network"))
        .and(query_param("max_results", "3"))
        .and(query_param("sortBy", "relevance"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .mount(&server)
        .await;

    let client = ArxivClient::new().unwrap().with_endpoint(server.uri());
    let papers = client.search("graph neural network", 3).await.unwrap();

    assert_eq!(client.source_name(), "arXiv");
    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].title, "Graph Neural Networks");
    assert_eq!(papers[0].published.as_deref(), Some("2021-01-01"));
}

#[tokio::test]
async fn semantic_scholar_sends_key_and_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/paper/search"))
        .and(header("x-api-key", "ss-key"))
        .and(query_param("limit", "3"))
        .and(query_param("fields", "title,abstract,url,year,authors,openAccessPdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "data": [{
                "paperId": "abc",
                "title": "Remote Work and Productivity",
                "abstract": "We study remote work.",
                "url": "https://www.semanticscholar.org/paper/abc",
                "year": 2022,
                "authors": [{"authorId": "1", "name": "Lee"}, {"authorId": "2", "name": "Park"}],
                "openAccessPdf": {"url": "https://example.org/paper.pdf", "status": "GREEN"}
            }]
        })))
        .mount(&server)
        .await;

    let client = SemanticScholarClient::new(Some("ss-key".to_string()))
        .unwrap()
        .with_base_url(server.uri());
    let papers = client.search("remote work", 3).await.unwrap();

    assert_eq!(papers.len(), 1);
    let paper = &papers[0];
    assert_eq!(paper.author_line(), "Lee, Park");
    assert_eq!(paper.published.as_deref(), Some("2022"));
    assert_eq!(paper.pdf_url.as_deref(), Some("https://example.org/paper.pdf"));
    assert_eq!(paper.summary.as_deref(), Some("We study remote work."));
}

#[tokio::test]
async fn semantic_scholar_failure_yields_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = SemanticScholarClient::new(None).unwrap().with_base_url(server.uri());
    assert!(client.search("anything", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn pdf_fetcher_reports_download_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = PdfFetcher::new().unwrap();
    let err = fetcher
        .fetch_text(&format!("{}/missing.pdf", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ResearchError::Http { status: 404, .. }));
}

#[tokio::test]
async fn pdf_fetcher_reports_unreadable_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"this is not a pdf".to_vec()))
        .mount(&server)
        .await;

    let fetcher = PdfFetcher::new().unwrap();
    let err = fetcher
        .fetch_text(&format!("{}/broken.pdf", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ResearchError::Pdf(_)));
}
