//! RSS, sitemap and robots.txt

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::PostSummary;
use crate::helpers::{date_rfc1123, date_xml, escape_xml, full_url_for, published_xml, utc_midnight};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const SITEMAP_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
pub const ROBOTS_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const FEED_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate=86400";

/// RSS 2.0 feed of the newest posts
pub fn rss_xml(config: &SiteConfig, posts: &[PostSummary], now: DateTime<Utc>) -> String {
    let mut rss = String::new();
    rss.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    rss.push_str("<rss version=\"2.0\">\n<channel>\n");
    rss.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    rss.push_str(&format!("  <link>{}</link>\n", escape_xml(config.base_url())));
    rss.push_str(&format!(
        "  <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    rss.push_str(&format!(
        "  <lastBuildDate>{}</lastBuildDate>\n",
        date_rfc1123(&now)
    ));

    for post in posts.iter().take(config.feed.max_items) {
        let url = escape_xml(&full_url_for(config, &post.path()));
        rss.push_str("<item>\n");
        rss.push_str(&format!("  <title>{}</title>\n", escape_xml(&post.title)));
        rss.push_str(&format!("  <link>{}</link>\n", url));
        rss.push_str(&format!("  <guid>{}</guid>\n", url));
        rss.push_str(&format!(
            "  <description>{}</description>\n",
            escape_xml(&post.description)
        ));
        rss.push_str(&format!(
            "  <pubDate>{}</pubDate>\n",
            date_rfc1123(&utc_midnight(post.date))
        ));
        rss.push_str("</item>\n");
    }

    rss.push_str("</channel>\n</rss>\n");
    rss
}

/// Sitemap listing the home page and every post
pub fn sitemap_xml(config: &SiteConfig, posts: &[PostSummary], now: DateTime<Utc>) -> String {
    let mut entries = vec![(full_url_for(config, "/"), date_xml(&now))];
    entries.extend(
        posts
            .iter()
            .map(|post| (full_url_for(config, &post.path()), published_xml(post.date))),
    );

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for (loc, lastmod) in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// robots.txt allowing everything and pointing at the sitemap
pub fn robots_txt(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        full_url_for(config, "/sitemap.xml")
    )
}
