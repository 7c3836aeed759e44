//! Project link classification.

/// What a project link points at, judged from its URL alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    GooglePlay,
    AppStore,
    GitHub,
    Demo,
    Video,
    Website,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            LinkKind::GooglePlay => "Google Play",
            LinkKind::AppStore => "App Store",
            LinkKind::GitHub => "GitHub",
            LinkKind::Demo => "Demo",
            LinkKind::Video => "Video",
            LinkKind::Website => "Website",
        }
    }
}

/// Domain fragments in priority order; the first one contained in the URL wins.
const RULES: &[(&str, LinkKind)] = &[
    ("play.google.com", LinkKind::GooglePlay),
    ("apps.apple.com", LinkKind::AppStore),
    ("github.com", LinkKind::GitHub),
    ("vercel.app", LinkKind::Demo),
    ("netlify.app", LinkKind::Demo),
    ("drive.google.com", LinkKind::Video),
];

/// Classify any string; unmatched input is a plain website.
pub fn classify_link(url: &str) -> LinkKind {
    RULES
        .iter()
        .find(|(fragment, _)| url.contains(fragment))
        .map(|(_, kind)| *kind)
        .unwrap_or(LinkKind::Website)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_domain() {
        let cases = [
            ("https://play.google.com/x", "Google Play"),
            ("https://apps.apple.com/x", "App Store"),
            ("https://github.com/x", "GitHub"),
            ("https://vercel.app/x", "Demo"),
            ("https://netlify.app/x", "Demo"),
            ("https://drive.google.com/x", "Video"),
            ("https://example.com/x", "Website"),
        ];
        for (url, label) in cases {
            assert_eq!(classify_link(url).label(), label, "url: {url}");
        }
    }

    #[test]
    fn earlier_rule_wins() {
        assert_eq!(
            classify_link("https://github.com/me/site.vercel.app"),
            LinkKind::GitHub
        );
        assert_eq!(
            classify_link("https://my-app.vercel.app/?src=drive.google.com"),
            LinkKind::Demo
        );
    }

    #[test]
    fn total_over_odd_input() {
        assert_eq!(classify_link(""), LinkKind::Website);
        assert_eq!(classify_link("not a url at all"), LinkKind::Website);
        assert_eq!(classify_link("GITHUB.COM/x"), LinkKind::Website);
    }
}
