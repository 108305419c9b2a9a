//! Page markup through to webhook delivery, without the network

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use relay_core::{CommunityKey, KnownPostStore, Post};
use relay_runtime::{DeliveryError, DeliveryQueue, Poller, PollerConfig, WebhookSink};
use relay_scrape::{parse_posts, ExtractConfig, FieldExtractor, MalformedPostPolicy, PostSource, ScanError};

/// Serves canned page bodies through the real extractor
struct HtmlSource {
    pages: Mutex<VecDeque<String>>,
    extractor: FieldExtractor,
}

#[async_trait]
impl PostSource for HtmlSource {
    async fn scan(&self, _key: &CommunityKey) -> Result<Vec<Post>, ScanError> {
        let html = self.pages.lock().unwrap().pop_front().unwrap_or_default();
        Ok(parse_posts(&html, &self.extractor, MalformedPostPolicy::Abort)?)
    }
}

#[derive(Default)]
struct RecordingSink {
    bodies: Mutex<Vec<serde_json::Value>>,
}

#[async_trait]
impl WebhookSink for RecordingSink {
    async fn send(&self, post: &Post) -> Result<u16, DeliveryError> {
        let body = serde_json::to_value(relay_runtime::WebhookPayload::new(post)).unwrap();
        self.bodies.lock().unwrap().push(body);
        Ok(204)
    }
}

fn post_html(id: &str, age: &str, text: &str) -> String {
    format!(
        r#"<div class="Ihwked x hE2QI">
            <div class="dzuq1e">
                <a class="X1U4Ie" href="./1001"><img src="//cdn.test/avatar.png"></a>
                <div class="nMlfCf">
                    <div class="Cd5D8b"><div class="xHn24c"><a href="./1001">Grace</a></div></div>
                    <div class="eRzjb"><a class="qXj2He" href="./communities/42/posts/{id}"><span>{age}</span></a></div>
                </div>
            </div>
            <div class="ELUvyf"><div><div><div>{text}</div></div></div></div>
        </div>"#,
        id = id,
        age = age,
        text = text
    )
}

fn page(posts: &[String]) -> String {
    format!("<html><body>{}</body></html>", posts.join(""))
}

#[tokio::test(start_paused = true)]
async fn test_two_cycles_deliver_each_post_once() {
    let store = KnownPostStore::new(
        std::env::temp_dir().join(format!("known_posts_{}.json", uuid::Uuid::new_v4())),
    );

    let first = page(&[post_html("a", "1d", "first"), post_html("b", "2w", "second")]);
    let second = page(&[
        post_html("c", "0d", "third"),
        post_html("a", "1d", "first"),
        post_html("b", "2w", "second"),
    ]);

    let source = Arc::new(HtmlSource {
        pages: Mutex::new(VecDeque::from(vec![first, second])),
        extractor: FieldExtractor::new(ExtractConfig::new("https://cdn.test/banner.png")),
    });
    let sink = Arc::new(RecordingSink::default());
    let (queue, worker) = DeliveryQueue::new(sink.clone(), Duration::from_secs(1));
    let poller = Poller::new(
        source,
        store.clone(),
        queue,
        PollerConfig::new(CommunityKey::new("42", None)),
    );

    let report = poller.run_cycle().await.unwrap();
    assert_eq!(report.new_posts, 2);

    let report = poller.run_cycle().await.unwrap();
    assert_eq!(report.scanned, 3);
    assert_eq!(report.new_posts, 1);

    drop(poller);
    let stats = worker.run().await;
    assert_eq!(stats.delivered, 3);

    let bodies = sink.bodies.lock().unwrap();
    let urls: Vec<_> = bodies
        .iter()
        .map(|b| b["embeds"][0]["url"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://plus.google.com/communities/42/posts/a",
            "https://plus.google.com/communities/42/posts/b",
            "https://plus.google.com/communities/42/posts/c",
        ]
    );

    let embed = &bodies[0]["embeds"][0];
    assert_eq!(embed["title"], "first");
    assert_eq!(embed["image"]["url"], "https://cdn.test/banner.png");
    assert_eq!(embed["author"]["url"], "https://plus.google.com/1001");
    assert_eq!(embed["author"]["icon_url"], "https://cdn.test/avatar.png");

    assert_eq!(store.load().unwrap().posts("42").len(), 3);
    std::fs::remove_file(store.path()).unwrap();
}
