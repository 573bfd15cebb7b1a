//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_crawler::config::parse_config;
use site_crawler::crawler::{run_crawl, CrawlSettings, Crawler, FetchErrorKind, StopReason};
use site_crawler::PageStatus;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates test settings with no politeness delay
fn test_settings(depth: u32, max_pages: usize) -> CrawlSettings {
    CrawlSettings {
        depth,
        max_pages,
        delay: Duration::ZERO,
        ..CrawlSettings::default()
    }
}

/// Builds a simple HTML page linking to the given hrefs
fn html_page(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>\n", href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{} body text</p>\n{}</body></html>",
        title, title, links
    )
}

/// Mounts an HTML page that must be requested exactly `expected` times
async fn mount_page(server: &MockServer, route: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/html"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_depth_zero_fetches_seed_only() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/about", "/blog"]), 1).await;
    mount_page(&mock_server, "/about", html_page("About", &[]), 0).await;
    mount_page(&mock_server, "/blog", html_page("Blog", &[]), 0).await;

    let seed = format!("{}/", mock_server.uri());
    let report = run_crawl(test_settings(0, 10), &[seed.as_str()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.url, seed);
    assert_eq!(record.title, "Home");
    assert!(record.content.contains("Home body text"));
    assert_eq!(record.depth, 0);
    assert!(record.links.is_none());
    assert_eq!(report.stats.stop_reason, StopReason::FrontierEmpty);
}

#[tokio::test]
async fn test_depth_one_follows_same_site_links() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", &["/about", "blog/post-1", "https://elsewhere.invalid/about"]),
        1,
    )
    .await;
    mount_page(&mock_server, "/about", html_page("About", &["/deeper"]), 1).await;
    mount_page(&mock_server, "/blog/post-1", html_page("Post", &[]), 1).await;
    mount_page(&mock_server, "/deeper", html_page("Deeper", &[]), 0).await;

    let report = run_crawl(test_settings(1, 10), &[base.as_str()])
        .await
        .expect("crawl failed");

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/about", base),
            format!("{}/blog/post-1", base),
        ]
    );

    let root_links = report.records[0].links.as_ref().expect("root links missing");
    assert_eq!(root_links.len(), 2);
    assert!(root_links.iter().all(|l| !l.contains("elsewhere.invalid")));

    // Pages at the depth limit are not expanded
    assert!(report.records[1].links.is_none());
    assert!(report.records[2].links.is_none());
    assert_eq!(report.stats.succeeded, 3);
}

#[tokio::test]
async fn test_server_error_is_recorded_and_not_expanded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string(html_page("Oops", &["/next"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/next", html_page("Next", &[]), 0).await;

    let report = run_crawl(test_settings(2, 10), &[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert!(!record.is_success());
    assert!(record.title.is_empty());
    assert!(record.content.is_empty());
    assert!(record.links.is_none());

    match &record.status {
        PageStatus::Error(error) => {
            assert_eq!(error.kind, FetchErrorKind::HttpStatus);
            assert_eq!(error.status_code, Some(500));
        }
        PageStatus::Success => panic!("expected an error status"),
    }

    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.stats.failed, 1);
}

#[tokio::test]
async fn test_missing_child_does_not_stop_session() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/gone", "/present"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/present", html_page("Present", &[]), 1).await;

    let report = run_crawl(test_settings(1, 10), &[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 3);
    assert!(report.records[0].is_success());
    assert_eq!(
        report.records[1].status.error().and_then(|e| e.status_code),
        Some(404)
    );
    assert!(report.records[2].is_success());
    assert_eq!(report.stats.succeeded, 2);
    assert_eq!(report.stats.failed, 1);
}

#[tokio::test]
async fn test_unreachable_seed_is_recorded() {
    // Reserve a free port, then release it so nothing is listening
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        format!("http://{}/", listener.local_addr().expect("addr"))
    };

    let report = run_crawl(test_settings(1, 5), &[uri.as_str()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 1);
    let error = report.records[0].status.error().expect("expected error");
    assert_eq!(error.kind, FetchErrorKind::Connect);
    assert!(error.status_code.is_none());
}

#[tokio::test]
async fn test_duplicate_seeds_fetched_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", html_page("Home", &[]), 1).await;

    let seeds = vec![
        base.clone(),
        format!("{}/", base),
        format!("{}/#top", base),
        format!("{}/?utm_source=newsletter", base),
    ];
    let report = run_crawl(test_settings(0, 10), seeds.as_slice())
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.stats.unique_urls_visited, 1);
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let mock_server = MockServer::start().await;

    let children = ["/a", "/b", "/c", "/d", "/e"];
    mount_page(&mock_server, "/", html_page("Home", &children), 1).await;
    mount_page(&mock_server, "/a", html_page("A", &[]), 1).await;
    mount_page(&mock_server, "/b", html_page("B", &[]), 1).await;
    for child in &children[2..] {
        mount_page(&mock_server, child, html_page("Unreached", &[]), 0).await;
    }

    let report = run_crawl(test_settings(1, 3), &[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.pages_fetched, 3);
    assert_eq!(report.stats.configured_page_limit, 3);
    assert_eq!(report.stats.stop_reason, StopReason::BudgetExhausted);
}

#[tokio::test]
async fn test_fanout_caps_limit_admitted_links() {
    let mock_server = MockServer::start().await;

    let content: Vec<String> = (0..10).map(|i| format!("/post-{}", i)).collect();
    let navigational: Vec<String> = (0..5).map(|i| format!("/about-{}", i)).collect();

    // Content links come first in the markup to check reordering
    let hrefs: Vec<&str> = content
        .iter()
        .chain(navigational.iter())
        .map(String::as_str)
        .collect();
    mount_page(&mock_server, "/", html_page("Home", &hrefs), 1).await;

    for (i, route) in navigational.iter().enumerate() {
        let expected = if i < 3 { 1 } else { 0 };
        mount_page(&mock_server, route, html_page("Nav", &[]), expected).await;
    }
    for (i, route) in content.iter().enumerate() {
        let expected = if i < 7 { 1 } else { 0 };
        mount_page(&mock_server, route, html_page("Post", &[]), expected).await;
    }

    let report = run_crawl(test_settings(1, 50), &[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 1 + 3 + 7);

    // The root record lists every eligible link, before caps
    let root_links = report.records[0].links.as_ref().expect("root links missing");
    assert_eq!(root_links.len(), 15);

    // Navigational links are enqueued ahead of content links
    for record in &report.records[1..4] {
        assert!(record.url.contains("/about-"), "unexpected order: {}", record.url);
    }
    for record in &report.records[4..] {
        assert!(record.url.contains("/post-"), "unexpected order: {}", record.url);
    }
}

#[tokio::test]
async fn test_custom_scorer_changes_priority() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/news", "/about"]), 1).await;
    mount_page(&mock_server, "/news", html_page("News", &[]), 1).await;
    mount_page(&mock_server, "/about", html_page("About", &[]), 0).await;

    let mut settings = test_settings(1, 10);
    settings.fanout.navigational = 1;
    settings.fanout.content = 0;

    let mut crawler = Crawler::new(settings)
        .expect("crawler")
        .with_scorer(|url: &str| {
            if url.contains("news") {
                site_crawler::crawler::LinkPriority::Navigational
            } else {
                site_crawler::crawler::LinkPriority::Content
            }
        });
    let report = crawler
        .crawl(&[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 2);
    assert!(report.records[1].url.ends_with("/news"));
}

#[tokio::test]
async fn test_cyclic_links_visited_once() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/a", "/b"]), 1).await;
    mount_page(&mock_server, "/a", html_page("A", &["/", "/b", "/a/"]), 1).await;
    mount_page(&mock_server, "/b", html_page("B", &["/", "/a"]), 1).await;

    let report = run_crawl(test_settings(3, 50), &[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.unique_urls_visited, 3);
    assert_eq!(report.stats.stop_reason, StopReason::FrontierEmpty);

    let mut urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls.len(), 3);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/l1-a", "/l1-b"]), 1).await;
    mount_page(&mock_server, "/l1-a", html_page("L1A", &["/l2-a"]), 1).await;
    mount_page(&mock_server, "/l1-b", html_page("L1B", &["/l2-b"]), 1).await;
    mount_page(&mock_server, "/l2-a", html_page("L2A", &[]), 1).await;
    mount_page(&mock_server, "/l2-b", html_page("L2B", &[]), 1).await;

    let report = run_crawl(test_settings(2, 50), &[mock_server.uri()])
        .await
        .expect("crawl failed");

    let depths: Vec<u32> = report.records.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 2, 2]);

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "L1A", "L1B", "L2A", "L2B"]);
}

#[tokio::test]
async fn test_non_content_links_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            &["/brochure.pdf", "/login", "/feed", "/find?q=rust", "/team"],
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/team", html_page("Team", &[]), 1).await;

    let report = run_crawl(test_settings(1, 10), &[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(
        report.records[0].links,
        Some(vec![format!("{}/team", mock_server.uri())])
    );
}

#[tokio::test]
async fn test_relative_links_resolve_against_final_url() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let location = format!("{}/docs/new", base);

    Mock::given(method("GET"))
        .and(path("/docs/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", location.as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/new", html_page("Docs", &["next"]), 1).await;
    mount_page(&mock_server, "/docs/next", html_page("Next", &[]), 1).await;

    let seed = format!("{}/docs/old", base);
    let report = run_crawl(test_settings(1, 10), &[seed.as_str()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].url, seed);
    assert_eq!(report.records[0].title, "Docs");
    assert_eq!(report.records[1].url, format!("{}/docs/next", base));
}

#[tokio::test]
async fn test_delay_spaces_requests() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/a", "/b"]), 1).await;
    mount_page(&mock_server, "/a", html_page("A", &[]), 1).await;
    mount_page(&mock_server, "/b", html_page("B", &[]), 1).await;

    let settings = CrawlSettings {
        delay: Duration::from_millis(150),
        ..test_settings(1, 10)
    };

    let started = Instant::now();
    let report = run_crawl(settings, &[mock_server.uri()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 3);
    // Two gaps between three fetches
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_crawl_from_toml_config() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/contact"]), 1).await;
    mount_page(&mock_server, "/contact", html_page("Contact", &[]), 1).await;

    let toml = format!(
        r#"
seeds = ["{}"]

[crawler]
depth = 1
max-pages = 5
delay-seconds = 0.0

[fetcher]
user-agent = "TestBot/1.0"
timeout-seconds = 5
"#,
        mock_server.uri()
    );

    let config = parse_config(&toml).expect("config should parse");
    let settings = config.crawl_settings().expect("settings");
    assert_eq!(settings.fetch.user_agent, "TestBot/1.0");

    let report = run_crawl(settings, config.seeds.as_slice())
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[1].title, "Contact");
    assert_eq!(report.stats.configured_depth, 1);
}

#[tokio::test]
async fn test_links_not_extracted_from_non_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("plain notes <a href=\"/child\">child</a>")
                .insert_header("content-type", "text/plain"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/child", html_page("Child", &[]), 0).await;

    let seed = format!("{}/notes.txt", mock_server.uri());
    let report = run_crawl(test_settings(1, 10), &[seed.as_str()])
        .await
        .expect("crawl failed");

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert!(record.is_success());
    assert_eq!(record.links, Some(Vec::new()));
    assert_eq!(report.stats.stop_reason, StopReason::FrontierEmpty);
}
