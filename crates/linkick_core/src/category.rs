use std::fmt;

/// Classification label for a shared URL.
///
/// Variants are listed in rule order; [`categorize`] applies them top to
/// bottom and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Screenshot,
    Youtube,
    Twitter,
    Instagram,
    TikTok,
    Streamable,
    KickClip,
    KickVideo,
    KickChannel,
    Twitch,
    Discord,
    Music,
    Dev,
    News,
    Other,
}

impl Category {
    /// Display label used in views and filter chips.
    pub fn label(self) -> &'static str {
        match self {
            Category::Screenshot => "PRNT.SC",
            Category::Youtube => "YOUTUBE",
            Category::Twitter => "X (TWITTER)",
            Category::Instagram => "INSTAGRAM",
            Category::TikTok => "TIKTOK",
            Category::Streamable => "STREAMABLE",
            Category::KickClip => "KICK CLIP",
            Category::KickVideo => "KICK VIDEO",
            Category::KickChannel => "KICK CHANNEL",
            Category::Twitch => "TWITCH",
            Category::Discord => "DISCORD",
            Category::Music => "SPOTIFY / MUSIC",
            Category::Dev => "DEV / GITHUB",
            Category::News => "NEWS",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Substrings that mark a URL as pointing at a news outlet.
const NEWS_MARKERS: [&str; 7] = ["haber", "gazete", "ajans", "news", "cnn", "bbc", "sondakika"];

/// Classify a URL by plain substring containment on its lowercase form.
///
/// Stateless and side-effect free. Rule order matters: the `kick.com`
/// sub-rules must run before the generic platforms below them, and the
/// fallback is always [`Category::Other`].
pub fn categorize(url: &str) -> Category {
    let url = url.to_lowercase();

    if url.contains("prnt.sc") || url.contains("lightshot") {
        return Category::Screenshot;
    }
    if url.contains("youtube.com") || url.contains("youtu.be") {
        return Category::Youtube;
    }
    if url.contains("twitter.com") || url.contains("x.com") {
        return Category::Twitter;
    }
    if url.contains("instagram.com") {
        return Category::Instagram;
    }
    if url.contains("tiktok.com") {
        return Category::TikTok;
    }
    if url.contains("streamable.com") {
        return Category::Streamable;
    }
    if url.contains("kick.com") {
        if url.contains("clip") {
            return Category::KickClip;
        }
        if url.contains("/video/") {
            return Category::KickVideo;
        }
        return Category::KickChannel;
    }
    if url.contains("twitch.tv") {
        return Category::Twitch;
    }
    // Normally filtered out by the parser deny-list already; kept as a net
    // for callers that classify URLs from other sources.
    if url.contains("discord") {
        return Category::Discord;
    }
    if url.contains("spotify.com") || url.contains("soundcloud.com") {
        return Category::Music;
    }
    if url.contains("github.com") || url.contains("stackoverflow.com") {
        return Category::Dev;
    }
    if NEWS_MARKERS.iter().any(|marker| url.contains(marker)) {
        return Category::News;
    }

    Category::Other
}
