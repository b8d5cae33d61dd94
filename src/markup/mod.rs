//! Wiki style links in free text, such as `doc:MyPage` or `issue:25`.

mod provider;

pub use provider::{IssueLinkProvider, LinkProvider, LinkProviders, UrlTemplateProvider};

const DELIMITERS: &str = " \t\n\r\u{0C}<>(){}&.,!?;";

/// Renders `text` as HTML, turning `module:name` tokens into links.
///
/// Links whose target is missing are still rendered but flagged with the `brokenlink`
/// class and a trailing `[?]` hint.
pub fn mark_up(text: &str, project: &str, providers: &LinkProviders) -> String {
    let mut out = String::with_capacity(text.len());
    for token in tokens(text) {
        if !token.contains(':') {
            out.push_str(&encode(token));
            continue;
        }

        let resolved = providers.resolve(token, project);
        let link = resolved.and_then(|(provider, name, project)| provider.link(name, project));
        let broken = resolved
            .map(|(provider, name, project)| provider.is_link_broken(name, project))
            .unwrap_or(false);

        match link {
            Some(link) => {
                out.push_str("<a href=\"");
                out.push_str(&encode(&link));
                out.push('"');
                if broken {
                    out.push_str(" class=\"brokenlink\"");
                }
                out.push('>');
                out.push_str(&encode(token));
                out.push_str("</a>");
            }
            None => out.push_str(&encode(token)),
        }
        if broken {
            out.push_str("<span class=\"brokenlinkhint\">[?]</span>");
        }
    }
    out
}

/// Splits on [`DELIMITERS`], returning each delimiter as a token of its own.
fn tokens(text: &str) -> Vec<&str> {
    let mut tokens = vec![];
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        if DELIMITERS.contains(ch) {
            if start < index {
                tokens.push(&text[start..index]);
            }
            let end = index + ch.len_utf8();
            tokens.push(&text[index..end]);
            start = end;
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

fn encode(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\n', "<br />")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn providers() -> LinkProviders {
        let mut providers = LinkProviders::new(vec!["agile".to_string()]);
        providers.register("doc", UrlTemplateProvider::new("/{project}/docs/{name}"));
        providers.register("issue", IssueLinkProvider::new("/{project}/issues/{name}", [25]));
        providers
    }

    #[test]
    fn test_tokens_keep_delimiters() {
        assert_eq!(
            tokens("see doc:Index, (now)"),
            vec!["see", " ", "doc:Index", ",", " ", "(", "now", ")"]
        );
    }

    #[test]
    fn test_tokens_split_on_form_feed() {
        assert_eq!(tokens("a\u{0C}doc:x"), vec!["a", "\u{0C}", "doc:x"]);
    }

    #[test]
    fn test_quote_in_link_stays_inside_href() {
        assert_eq!(
            mark_up("doc:x\"onmouseover=\"alert(1)", "agile", &providers()),
            "<a href=\"/agile/docs/x&quot;onmouseover=&quot;alert\">\
             doc:x&quot;onmouseover=&quot;alert</a>(1)"
        );
    }

    #[test]
    fn test_links_are_marked_up() {
        assert_eq!(
            mark_up("see doc:Index.", "agile", &providers()),
            "see <a href=\"/agile/docs/Index\">doc:Index</a>."
        );
    }

    #[test]
    fn test_broken_link_is_flagged() {
        assert_eq!(
            mark_up("issue:26", "agile", &providers()),
            "<a href=\"/agile/issues/26\" class=\"brokenlink\">issue:26</a>\
             <span class=\"brokenlinkhint\">[?]</span>"
        );
    }

    #[test]
    fn test_unknown_module_is_plain_text() {
        assert_eq!(
            mark_up("time: 10:30", "agile", &providers()),
            "time: 10:30"
        );
    }

    #[test]
    fn test_text_is_encoded() {
        assert_eq!(
            mark_up("a<b & \"c\"\nd", "agile", &providers()),
            "a&lt;b &amp; &quot;c&quot;<br />d"
        );
    }
}
