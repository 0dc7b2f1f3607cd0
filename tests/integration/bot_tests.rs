use super::*;
use app_info_bot::{RedditClient, stores::{AppStoreCatalog, StaticToken}};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn page_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/us/app/things-3/id904237743"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_FIXTURE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/us/app/gone/id1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_scraped_page_is_posted_as_reply() -> anyhow::Result<()> {
    let server = page_server().await;
    let url = format!("{}/us/app/things-3/id904237743", server.uri());

    let forum = Arc::new(FakeForum::with_posts("iosapps", vec![link_post("a1", "iosapps", &url)]));
    let mut config = get_test_config();
    config.reddit.subreddits = vec!["iosapps".to_string()];

    let bot = create_test_bot(forum.clone(), local_registry("127.0.0.1"), &config);
    let report = assert_ok!(bot.run().await);

    assert_eq!(report.replied(), 1);
    let replies = forum.replies().await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].0, "t3_a1");
    assert!(replies[0].1.starts_with("## [**Things 3**]"));
    assert!(replies[0].1.contains("Cultured Code"));
    Ok(())
}

#[tokio::test]
async fn test_one_broken_page_does_not_stop_the_run() -> anyhow::Result<()> {
    let server = page_server().await;
    let good = format!("{}/us/app/things-3/id904237743", server.uri());
    let gone = format!("{}/us/app/gone/id1", server.uri());

    let forum = Arc::new(FakeForum::with_posts(
        "iosapps",
        vec![
            link_post("a1", "iosapps", &good),
            link_post("a2", "iosapps", &gone),
            link_post("a3", "iosapps", &good),
        ],
    ));
    let mut config = get_test_config();
    config.reddit.subreddits = vec!["iosapps".to_string()];

    let bot = create_test_bot(forum.clone(), local_registry("127.0.0.1"), &config);
    let report = bot.run().await?;

    let subreddit = &report.subreddits[0];
    assert_eq!(subreddit.replied.len(), 2);
    assert_eq!(subreddit.failed.len(), 1);
    assert_eq!(subreddit.failed[0].url, gone);

    let targets: Vec<String> = forum.replies().await.into_iter().map(|(name, _)| name).collect();
    assert_eq!(targets, vec!["t3_a1", "t3_a3"]);
    Ok(())
}

#[tokio::test]
async fn test_already_analyzed_post_is_skipped() -> anyhow::Result<()> {
    let server = page_server().await;
    let url = format!("{}/us/app/things-3/id904237743", server.uri());

    let mut forum = FakeForum::with_posts("iosapps", vec![link_post("a1", "iosapps", &url)]);
    forum
        .authors
        .insert("a1".to_string(), vec!["someone".to_string(), USERNAME.to_string()]);
    let forum = Arc::new(forum);

    let mut config = get_test_config();
    config.reddit.subreddits = vec!["iosapps".to_string()];

    let report = create_test_bot(forum.clone(), local_registry("127.0.0.1"), &config)
        .run()
        .await?;

    assert_eq!(report.subreddits[0].skipped.analyzed, 1);
    assert!(forum.replies().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_subreddit_fails_the_run() {
    let forum = Arc::new(FakeForum::with_posts("iosapps", vec![]));
    let config = get_test_config();

    let bot = create_test_bot(forum, local_registry("127.0.0.1"), &config);
    assert_err!(bot.run().await);
}

#[tokio::test]
async fn test_catalog_entry_is_posted_as_reply() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/catalog/US/apps/904237743"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CATALOG_FIXTURE))
        .expect(1)
        .mount(&server)
        .await;

    let config = get_test_config();
    let mut registry = StoreRegistry::new();
    registry.register(
        "127.0.0.1",
        Arc::new(AppStoreCatalog::new(
            reqwest::Client::new(),
            format!("{}/v1/catalog/US/apps", server.uri()),
            Arc::new(StaticToken::new("test-token")),
            config.store.github_url.clone(),
        )),
    );

    let url = format!("{}/us/app/things-3/id904237743", server.uri());
    let mut forum = FakeForum::with_posts("iosapps", vec![link_post("a1", "iosapps", &url)]);
    forum.posts.insert("apple".to_string(), vec![]);
    let forum = Arc::new(forum);

    let report = create_test_bot(forum.clone(), registry, &config).run().await?;

    assert_eq!(report.subreddits.len(), 2);
    assert_eq!(report.replied(), 1);
    let replies = forum.replies().await;
    assert!(replies[0].1.starts_with("## [**Things 3**]"));
    assert!(replies[0].1.ends_with("^[github](https://github.com/fedecalendino/app-info-bot)"));
    Ok(())
}

#[tokio::test]
async fn test_undecodable_catalog_entry_does_not_stop_the_run() -> anyhow::Result<()> {
    let mut broken: serde_json::Value = serde_json::from_str(CATALOG_FIXTURE)?;
    if let Some(attributes) = broken["data"][0]["attributes"].as_object_mut() {
        attributes.remove("genreDisplayName");
    }

    let server = MockServer::start().await;
    for id in ["1", "3"] {
        Mock::given(method("GET"))
            .and(path(format!("/v1/catalog/US/apps/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(CATALOG_FIXTURE))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/v1/catalog/US/apps/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(broken))
        .mount(&server)
        .await;

    let mut config = get_test_config();
    config.reddit.subreddits = vec!["iosapps".to_string()];

    let mut registry = StoreRegistry::new();
    registry.register(
        "127.0.0.1",
        Arc::new(AppStoreCatalog::new(
            reqwest::Client::new(),
            format!("{}/v1/catalog/US/apps", server.uri()),
            Arc::new(StaticToken::new("test-token")),
            config.store.github_url.clone(),
        )),
    );

    let posts = (1..=3)
        .map(|n| {
            let url = format!("{}/us/app/app-{}/id{}", server.uri(), n, n);
            link_post(&format!("a{}", n), "iosapps", &url)
        })
        .collect();
    let forum = Arc::new(FakeForum::with_posts("iosapps", posts));

    let report = assert_ok!(create_test_bot(forum.clone(), registry, &config).run().await);

    let subreddit = &report.subreddits[0];
    assert_eq!(subreddit.replied.len(), 2);
    assert_eq!(subreddit.failed.len(), 1);
    assert_eq!(subreddit.failed[0].permalink, "/r/iosapps/comments/a2/post/");
    assert!(subreddit.failed[0].error.starts_with("Serialization error"));

    let targets: Vec<String> = forum.replies().await.into_iter().map(|(name, _)| name).collect();
    assert_eq!(targets, vec!["t3_a1", "t3_a3"]);
    Ok(())
}

#[tokio::test]
async fn test_reddit_client_drives_a_full_run() -> anyhow::Result<()> {
    let pages = page_server().await;
    let page_url = format!("{}/us/app/things-3/id904237743", pages.uri());

    let reddit = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&reddit)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": USERNAME })))
        .mount(&reddit)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/iosapps/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "Listing",
            "data": {"children": [{"kind": "t3", "data": {
                "id": "a1", "name": "t3_a1", "title": "Things", "subreddit": "iosapps",
                "url": page_url, "is_self": false, "created_utc": 1700000000.0,
                "permalink": "/r/iosapps/comments/a1/things/"
            }}]}
        })))
        .mount(&reddit)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"kind": "Listing", "data": {"children": []}},
            {"kind": "Listing", "data": {"children": []}}
        ])))
        .mount(&reddit)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/comment"))
        .and(body_string_contains("thing_id=t3_a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"json": {"errors": []}})))
        .expect(1)
        .mount(&reddit)
        .await;

    let mut config = get_test_config();
    config.reddit.subreddits = vec!["iosapps".to_string()];
    config.reddit.auth_url = reddit.uri();
    config.reddit.api_url = reddit.uri();

    let client = RedditClient::login(reqwest::Client::new(), config.reddit.clone()).await?;
    let report = create_test_bot(Arc::new(client), local_registry("127.0.0.1"), &config)
        .run()
        .await?;

    assert_eq!(report.subreddits[0].replied, vec!["/r/iosapps/comments/a1/things/"]);
    Ok(())
}
