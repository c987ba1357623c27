//! Krishi Jagran Odia homepage layout and fetcher.
//!
//! The portal at [odia.krishijagran.com](https://odia.krishijagran.com)
//! renders its homepage server-side, so the whole article index is available
//! from one GET. Links and images are emitted as root-relative paths and
//! absolutized against [`BASE_ORIGIN`].

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::{debug, info, instrument};

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::Section;
use crate::scrapers::HomepageSource;
use crate::scrapers::fields::{LocationSpec, image_at};
use crate::scrapers::recipe::SectionRecipe;
use crate::utils::truncate_for_log;

/// Origin every relative path on the homepage is resolved against.
pub const BASE_ORIGIN: &str = "https://odia.krishijagran.com";

/// The homepage itself.
pub const HOMEPAGE_URL: &str = "https://odia.krishijagran.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ANCHOR_TITLE: &[LocationSpec] = &[LocationSpec::attr("a", "title"), LocationSpec::text("a")];
const ANCHOR_HREF: &[LocationSpec] = &[LocationSpec::attr("a", "href")];
const HEADLINE_TITLE: &[LocationSpec] = &[
    LocationSpec::attr("h2 a", "title"),
    LocationSpec::text("h2 a"),
];
const HEADLINE_HREF: &[LocationSpec] = &[LocationSpec::attr("h2 a", "href")];
const ANY_IMAGE: &[LocationSpec] = &image_at("img");
const LINKED_IMAGE: &[LocationSpec] = &image_at(".img a img");
const PANEL_IMAGE: &[LocationSpec] = &image_at(".img img");
// The visible anchor text is the headline in the health panel; `title` is
// often missing there.
const PANEL_TITLE: &[LocationSpec] = &[LocationSpec::text("a"), LocationSpec::attr("a", "title")];
const READ_MORE_HREF: &[LocationSpec] = &[LocationSpec::attr(".btn-link", "href")];
const CATEGORY_NAME: &[LocationSpec] = &[
    LocationSpec::attr(".cat-h a", "title"),
    LocationSpec::text(".cat-h a"),
];

/// Section recipes in processing order.
pub const RECIPES: &[SectionRecipe] = &[
    SectionRecipe {
        section: Section::TopStory,
        root: ".row.h-t-20 .top-story",
        group_name: None,
        item: None,
        title: ANCHOR_TITLE,
        link: ANCHOR_HREF,
        image: ANY_IMAGE,
        read_more_link: &[],
    },
    SectionRecipe {
        section: Section::LeftList,
        root: ".row.h-t-20 .home-top-news-lst-lft",
        group_name: None,
        item: Some(".news-item"),
        title: ANCHOR_TITLE,
        link: ANCHOR_HREF,
        image: ANY_IMAGE,
        read_more_link: &[],
    },
    SectionRecipe {
        section: Section::RightList,
        root: ".row.h-t-20 .home-top-news-lst-rt",
        group_name: None,
        item: Some(".news-item"),
        title: ANCHOR_TITLE,
        link: ANCHOR_HREF,
        image: ANY_IMAGE,
        read_more_link: &[],
    },
    SectionRecipe {
        section: Section::AnimalHusbandry,
        root: ".weather-home",
        group_name: None,
        item: Some(".h-item"),
        title: HEADLINE_TITLE,
        link: HEADLINE_HREF,
        image: LINKED_IMAGE,
        read_more_link: &[],
    },
    SectionRecipe {
        section: Section::HealthLifestyle,
        root: ".weather-home",
        group_name: None,
        item: Some(".h-title"),
        title: PANEL_TITLE,
        link: ANCHOR_HREF,
        image: PANEL_IMAGE,
        read_more_link: READ_MORE_HREF,
    },
    SectionRecipe {
        section: Section::Categories,
        root: ".home-cat .cat-flex",
        group_name: Some(CATEGORY_NAME),
        item: Some(".list-unstyled li"),
        title: HEADLINE_TITLE,
        link: HEADLINE_HREF,
        image: ANY_IMAGE,
        read_more_link: &[],
    },
    SectionRecipe {
        section: Section::Trending,
        root: ".trending-articles",
        group_name: None,
        item: Some(".list-unstyled li"),
        title: ANCHOR_TITLE,
        link: ANCHOR_HREF,
        image: ANY_IMAGE,
        read_more_link: &[],
    },
    SectionRecipe {
        section: Section::LatestNews,
        root: ".latest-news",
        group_name: None,
        item: Some(".list-unstyled li"),
        title: ANCHOR_TITLE,
        link: ANCHOR_HREF,
        image: ANY_IMAGE,
        read_more_link: &[],
    },
];

/// Fetches the live homepage over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Build a client with browser-like headers and the configured timeout.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies `source_url` and `fetch_timeout_secs`
    ///
    /// # Returns
    ///
    /// The source, or [`AppError::Http`](crate::error::AppError::Http) if the
    /// TLS backend cannot be initialised.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> krishi_news::error::Result<()> {
    /// use krishi_news::config::AppConfig;
    /// use krishi_news::scrapers::HomepageSource;
    /// use krishi_news::scrapers::krishijagran::HttpSource;
    ///
    /// let html = HttpSource::new(&AppConfig::default())?.fetch().await?;
    /// println!("{} bytes", html.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.source_url.clone(),
        })
    }
}

impl HomepageSource for HttpSource {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch(&self) -> Result<String> {
        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        info!(bytes = html.len(), "Fetched homepage");
        debug!(preview = %truncate_for_log(&html, 200), "Homepage body");
        Ok(html)
    }
}
