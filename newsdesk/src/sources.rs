//! Compiled-in list of publishers and their feeds.

use regex::Regex;
use std::sync::LazyLock;

/// A named publisher with an ordered list of feed URLs
#[derive(Debug, Clone, Copy)]
pub struct NewsSource {
    pub name: &'static str,
    pub feeds: &'static [&'static str],
}

pub static NEWS_SOURCES: [NewsSource; 3] = [
    NewsSource {
        name: "Times of India",
        feeds: &[
            "https://timesofindia.indiatimes.com/rssfeeds/296589292.cms",
            "https://timesofindia.indiatimes.com/rssfeeds/1221656.cms",
            "https://timesofindia.indiatimes.com/rssfeeds/4719148.cms",
        ],
    },
    NewsSource {
        name: "The Hindu",
        feeds: &[
            "https://www.thehindu.com/news/national/feeder/default.rss",
            "https://www.thehindu.com/sport/feeder/default.rss",
            "https://www.thehindu.com/news/states/feeder/default.rss",
            "https://www.thehindu.com/business/feeder/default.rss",
            "https://www.thehindu.com/sci-tech/technology/feeder/default.rss",
            "https://www.thehindu.com/entertainment/feeder/default.rss",
            "https://www.thehindu.com/news/cities/feeder/default.rss",
            "https://www.thehindu.com/opinion/feeder/default.rss",
            "https://www.thehindu.com/life-and-style/feeder/default.rss",
        ],
    },
    NewsSource {
        name: "Hindustan Times",
        feeds: &[
            "https://www.hindustantimes.com/feeds/rss/india-news/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/sports/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/cities/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/business/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/education/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/entertainment/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/world-news/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/technology/rssfeed.xml",
            "https://www.hindustantimes.com/feeds/rss/lifestyle/rssfeed.xml",
        ],
    },
];

static FEED_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/([^/]+)/(?:rssfeed\.xml|default\.rss|\d+\.cms)$")
        .expect("valid feed category pattern")
});

/// Case-insensitive lookup by publisher name.
pub fn find_source(name: &str) -> Option<&'static NewsSource> {
    NEWS_SOURCES
        .iter()
        .find(|source| source.name.eq_ignore_ascii_case(name))
}

pub fn source_names() -> Vec<&'static str> {
    NEWS_SOURCES.iter().map(|source| source.name).collect()
}

/// Best-effort label taken from the path segment in front of the feed file name.
pub fn feed_category(url: &str) -> String {
    FEED_CATEGORY
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|segment| segment.as_str())
        .unwrap_or("general")
        .replace('-', " ")
}
