//! Embed surface capability.
//!
//! The hosting UI owns the actual player frame. The session only tells it
//! what to show; failure reports travel back through the session handle.

use super::candidate::PlaybackCandidate;

/// Something that can display a provider's embeddable player.
pub trait EmbedSurface: Send {
    /// Show `candidate` in an isolated embedding context.
    fn render(&mut self, candidate: &PlaybackCandidate);

    /// Remove any player currently shown.
    fn clear(&mut self);

    /// Show the terminal "no sources" condition.
    fn show_unavailable(&mut self, message: &str);
}

/// Surface for hosts that render nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmbed;

impl EmbedSurface for NullEmbed {
    fn render(&mut self, _candidate: &PlaybackCandidate) {}

    fn clear(&mut self) {}

    fn show_unavailable(&mut self, _message: &str) {}
}

/// Sandboxed iframe markup for a candidate.
pub fn iframe_markup(candidate: &PlaybackCandidate) -> String {
    format!(
        concat!(
            r#"<iframe src="{src}" title="{title}" "#,
            r#"sandbox="allow-scripts allow-same-origin allow-presentation" "#,
            r#"allow="autoplay; fullscreen; encrypted-media" allowfullscreen "#,
            r#"referrerpolicy="no-referrer" style="border:0;width:100%;height:100%"></iframe>"#
        ),
        src = escape_attribute(candidate.url().as_str()),
        title = escape_attribute(&candidate.label()),
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::playback::CandidateOrigin;

    #[test]
    fn test_iframe_markup_escapes_and_sandboxes() {
        let url = Url::parse("https://videocdn.tv/api/short?kinopoisk_id=301&lang=ru").unwrap();
        let candidate = PlaybackCandidate::new("Player \"1\"", url, CandidateOrigin::Static);

        let markup = iframe_markup(&candidate);

        assert!(markup.starts_with("<iframe "));
        assert!(markup.contains(r#"src="https://videocdn.tv/api/short?kinopoisk_id=301&amp;lang=ru""#));
        assert!(markup.contains(r#"title="Player &quot;1&quot;""#));
        assert!(markup.contains("sandbox="));
        assert!(markup.contains(r#"allow="autoplay; fullscreen; encrypted-media""#));
        assert!(markup.contains("allowfullscreen"));
    }
}
