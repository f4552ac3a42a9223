//! Reference crawler: prestige
//!
//! Prestige serves item detail pages at `goods/goods_detail.php?sku={code}`.
//! Quirks this implementation encodes:
//! - HTTP 500 is the site's "no such item" signal, not a server fault
//! - HTTP 403 means the client's network region is blocked
//! - Full data requires an adult-verification cookie; without it the site
//!   still answers 200 with a redirected consent page
//! - The page reveals the item's canonical code, which may differ in
//!   spelling from the one requested

use crate::config::Config;
use crate::crawler::extract::{
    attrs_of, clean_name, direct_text, extract_field, first_number, select_first, strip_query,
    FieldRule, Traversal,
};
use crate::crawler::{Crawler, SourceId};
use crate::net::{build_session, EndpointResolver, SessionCookie};
use crate::record::MetadataRecord;
use crate::{CrawlError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::Html;
use url::Url;

/// Primary endpoint; prestige currently runs no public mirrors
const DEFAULT_CANDIDATES: &[&str] = &["https://www.prestige-av.com"];

/// Adult-verification cookie the site checks before serving real content
const CONSENT_COOKIE: SessionCookie = SessionCookie {
    name: "__age_auth__",
    value: "true",
};

const CONTAINER_SELECTOR: &str = "section[class='px-4 mb-4 md:px-8 md:mb-16']";
const COVER_SELECTOR: &str = "div[class='c-ratio-image mr-8'] img";

pub struct PrestigeCrawler {
    base_url: Url,
    client: Client,
}

impl PrestigeCrawler {
    /// Resolves the endpoint and prepares the session, once per instance
    pub async fn create(config: &Config, resolver: &EndpointResolver) -> Result<Self> {
        let id = SourceId::Prestige;
        let candidates: Vec<String> = match config.candidates_for(id.as_str()) {
            Some(candidates) => candidates.to_vec(),
            None => DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        };

        let base_url = resolver.resolve(id, &candidates).await?;
        let client = build_session(&config.network, &base_url, &[CONSENT_COOKIE])?;

        Ok(PrestigeCrawler { base_url, client })
    }

    /// Extracts every claimed field from a fetched detail page
    ///
    /// Fails with `ItemNotFound` when the content container or the title is
    /// absent: a 200 page without them is a valid page shape with no
    /// matching item, which is the same semantic absence as the 500 signal.
    fn extract_page(&self, body: &str, identifier: &str) -> Result<ExtractedItem> {
        let document = Html::parse_document(body);
        let container = select_first(document.root_element(), CONTAINER_SELECTOR).ok_or_else(
            || CrawlError::ItemNotFound {
                source_id: self.id(),
                identifier: identifier.to_string(),
            },
        )?;

        let title = select_first(container, "h1")
            .map(direct_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CrawlError::ItemNotFound {
                source_id: self.id(),
                identifier: identifier.to_string(),
            })?;

        let cover = attrs_of(container, COVER_SELECTOR, "src")
            .into_iter()
            .next()
            .map(|src| strip_query(&src));

        let cast = extract_field(
            container,
            &FieldRule {
                label_selector: "p",
                label: "出演者：",
                relation: Traversal::NextAnchorTexts,
            },
        )
        .iter()
        .map(|name| clean_name(name))
        .collect();

        let duration_minutes = extract_field(
            container,
            &FieldRule {
                label_selector: "p",
                label: "収録時間：",
                relation: Traversal::NextText,
            },
        )
        .first()
        .and_then(|text| first_number(text));

        // The release date only appears as a ?date= suffix on the link to
        // the by-date listing
        let release_date = extract_field(
            container,
            &FieldRule {
                label_selector: "p",
                label: "発売日：",
                relation: Traversal::NextAnchorHref,
            },
        )
        .first()
        .and_then(|href| href.split("?date=").nth(1).map(str::to_string));

        let publisher = extract_field(
            container,
            &FieldRule {
                label_selector: "p",
                label: "メーカー：",
                relation: Traversal::NextAnchorTexts,
            },
        )
        .into_iter()
        .next();

        let canonical_id = extract_field(
            container,
            &FieldRule {
                label_selector: "p",
                label: "品番：",
                relation: Traversal::NextText,
            },
        )
        .into_iter()
        .next();

        let genres = extract_field(
            container,
            &FieldRule {
                label_selector: "p",
                label: "ジャンル：",
                relation: Traversal::NextAnchorTexts,
            },
        );

        let label = extract_field(
            container,
            &FieldRule {
                label_selector: "p",
                label: "レーベル：",
                relation: Traversal::NextAnchorTexts,
            },
        )
        .into_iter()
        .next();

        let synopsis = extract_field(
            container,
            &FieldRule {
                label_selector: "h2",
                label: "商品紹介",
                relation: Traversal::NextText,
            },
        )
        .into_iter()
        .next();

        let preview_image_urls = extract_field(
            container,
            &FieldRule {
                label_selector: "h2",
                label: "サンプル画像",
                relation: Traversal::NextImageSrcs,
            },
        )
        .iter()
        .map(|src| strip_query(src))
        .collect();

        Ok(ExtractedItem {
            canonical_id,
            title,
            cover,
            cast,
            duration_minutes,
            release_date,
            publisher,
            genres,
            label,
            synopsis,
            preview_image_urls,
        })
    }
}

#[async_trait]
impl Crawler for PrestigeCrawler {
    fn id(&self) -> SourceId {
        SourceId::Prestige
    }

    async fn crawl_and_fill(&self, record: &mut MetadataRecord) -> Result<()> {
        let mut url = self.base_url.join("goods/goods_detail.php")?;
        url.query_pairs_mut().append_pair("sku", &record.identifier);

        tracing::debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CrawlError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // The site answers 500 when it has no data for the code; this
            // is a confirmed absence, not an availability problem
            return Err(CrawlError::ItemNotFound {
                source_id: self.id(),
                identifier: record.identifier.clone(),
            });
        }
        if status == StatusCode::FORBIDDEN {
            return Err(CrawlError::SourceBlocked {
                source_id: self.id(),
                message: "prestige rejects requests from this network region; \
                          try a Japanese network region"
                    .to_string(),
            });
        }
        if !status.is_success() {
            return Err(CrawlError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| CrawlError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let item = self.extract_page(&body, &record.identifier)?;
        item.apply_to(record, url.as_str());
        Ok(())
    }
}

/// Everything extracted from one detail page, staged before any write
///
/// Staging keeps the fill atomic: the record is only touched after the
/// whole extraction succeeded.
struct ExtractedItem {
    canonical_id: Option<String>,
    title: String,
    cover: Option<String>,
    cast: Vec<String>,
    duration_minutes: Option<u32>,
    release_date: Option<String>,
    publisher: Option<String>,
    genres: Vec<String>,
    label: Option<String>,
    synopsis: Option<String>,
    preview_image_urls: Vec<String>,
}

impl ExtractedItem {
    fn apply_to(self, record: &mut MetadataRecord, source_url: &str) {
        record.source_url = Some(source_url.to_string());
        // The page reveals the canonical code spelling; last writer wins
        if let Some(canonical_id) = self.canonical_id {
            record.identifier = canonical_id;
        }
        record.title = Some(self.title);
        if let Some(cover) = self.cover {
            record.cover_image_url = Some(cover);
        }
        record.cast = self.cast;
        if let Some(duration) = self.duration_minutes {
            record.duration_minutes = Some(duration);
        }
        if let Some(date) = self.release_date {
            record.release_date = Some(date);
        }
        if let Some(publisher) = self.publisher {
            record.publisher = Some(publisher);
        }
        record.genres = self.genres;
        if let Some(label) = self.label {
            record.label = Some(label);
        }
        if let Some(synopsis) = self.synopsis {
            record.synopsis = Some(synopsis);
        }
        record.preview_image_urls = self.preview_image_urls;
        // Domestic Japanese release, never uncensored; a fact about the
        // source, not the page content
        record.is_uncensored = Some(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    fn test_crawler() -> PrestigeCrawler {
        let base_url = Url::parse("https://www.prestige-av.com/").unwrap();
        let client = build_session(&NetworkConfig::default(), &base_url, &[CONSENT_COOKIE])
            .expect("client builds");
        PrestigeCrawler { base_url, client }
    }

    fn detail_page() -> &'static str {
        r#"<html><body>
            <section class="px-4 mb-4 md:px-8 md:mb-16">
                <h1><span>SKU</span>  Sample Title  </h1>
                <div class="c-ratio-image mr-8"><picture><source>
                    <img src="https://x/img.jpg?sig=abc">
                </source></picture></div>
                <p>出演者：</p>
                <div><p><a href="/a/1">鈴木 一花</a></p><p><a href="/a/2">佐藤 二葉</a></p></div>
                <p>収録時間：</p>
                <div><p>Runtime: 95 min</p></div>
                <p>発売日：</p>
                <div><a href="/goods/list?date=2019-07-19">2019/07/19</a></div>
                <p>メーカー：</p>
                <div><a href="/maker/1">プレステージ</a></div>
                <p>品番：</p>
                <div><p>ABP-647</p></div>
                <p>ジャンル：</p>
                <div><a href="/g/1">Drama</a><a href="/g/2">Thriller</a></div>
                <p>レーベル：</p>
                <div><a href="/l/1">ABSOLUTELY PERFECT</a></div>
                <h2>商品紹介</h2>
                <p>A synopsis.</p>
                <h2>サンプル画像</h2>
                <div><div><picture><source>
                    <img src="https://x/p1.jpg?t=1">
                    <img src="https://x/p2.jpg?t=2">
                </source></picture></div></div>
            </section>
            </body></html>"#
    }

    #[test]
    fn test_extract_full_page() {
        let crawler = test_crawler();
        let item = crawler.extract_page(detail_page(), "abp647").unwrap();

        assert_eq!(item.title, "Sample Title");
        assert_eq!(item.canonical_id.as_deref(), Some("ABP-647"));
        assert_eq!(item.cover.as_deref(), Some("https://x/img.jpg"));
        assert_eq!(item.cast, vec!["鈴木一花", "佐藤二葉"]);
        assert_eq!(item.duration_minutes, Some(95));
        assert_eq!(item.release_date.as_deref(), Some("2019-07-19"));
        assert_eq!(item.publisher.as_deref(), Some("プレステージ"));
        assert_eq!(item.genres, vec!["Drama", "Thriller"]);
        assert_eq!(item.label.as_deref(), Some("ABSOLUTELY PERFECT"));
        assert_eq!(item.synopsis.as_deref(), Some("A synopsis."));
        assert_eq!(
            item.preview_image_urls,
            vec!["https://x/p1.jpg", "https://x/p2.jpg"]
        );
    }

    #[test]
    fn test_missing_container_is_item_not_found() {
        let crawler = test_crawler();
        let body = "<html><body><p>consent wall</p></body></html>";
        let result = crawler.extract_page(body, "ABP-647");
        assert!(matches!(
            result,
            Err(CrawlError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_title_is_item_not_found() {
        let crawler = test_crawler();
        let body = r#"<html><body>
            <section class="px-4 mb-4 md:px-8 md:mb-16"><p>ジャンル：</p></section>
            </body></html>"#;
        let result = crawler.extract_page(body, "ABP-647");
        assert!(matches!(
            result,
            Err(CrawlError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_apply_writes_all_claimed_fields() {
        let crawler = test_crawler();
        let item = crawler.extract_page(detail_page(), "abp647").unwrap();

        let mut record = MetadataRecord::new("abp647");
        item.apply_to(&mut record, "https://www.prestige-av.com/goods/goods_detail.php?sku=abp647");

        assert_eq!(record.identifier, "ABP-647"); // corrected by the page
        assert_eq!(record.title.as_deref(), Some("Sample Title"));
        assert_eq!(record.is_uncensored, Some(false));
        assert_eq!(
            record.source_url.as_deref(),
            Some("https://www.prestige-av.com/goods/goods_detail.php?sku=abp647")
        );
    }

    #[test]
    fn test_absent_value_does_not_clear_existing_field() {
        let crawler = test_crawler();
        let body = r#"<html><body>
            <section class="px-4 mb-4 md:px-8 md:mb-16">
                <h1><span>SKU</span>Sample Title</h1>
            </section>
            </body></html>"#;
        let item = crawler.extract_page(body, "ABP-647").unwrap();

        let mut record = MetadataRecord::new("ABP-647");
        record.release_date = Some("2019-07-19".to_string());
        item.apply_to(&mut record, "https://www.prestige-av.com/x");

        // The page carried no release date, so the value from an earlier
        // source survives
        assert_eq!(record.release_date.as_deref(), Some("2019-07-19"));
        assert_eq!(record.title.as_deref(), Some("Sample Title"));
    }
}
