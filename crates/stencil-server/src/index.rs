//! HTML index of the results directory.

use stencil_core::config::artifact_url;

/// Body shown when the results directory holds nothing worth listing.
pub const NO_FILES_MESSAGE: &str = "No files found";

/// Renders the index page: one link per entry, or [`NO_FILES_MESSAGE`].
///
/// Links are absolute (`<base_url>/<name>`) so they work when the page is
/// opened from a different host name than the one the server advertises.
pub fn render_index(base_url: &str, names: &[String]) -> String {
    let mut body = String::new();
    if names.is_empty() {
        body.push_str("<p>");
        body.push_str(NO_FILES_MESSAGE);
        body.push_str("</p>\n");
    } else {
        body.push_str("<ul>\n");
        for name in names {
            let href = artifact_url(base_url, name);
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                html_escape::encode_double_quoted_attribute(&href),
                html_escape::encode_text(name)
            ));
        }
        body.push_str("</ul>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Generated files</title>\n</head>\n<body>\n<h1>Generated files</h1>\n{}</body>\n</html>\n",
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listing_shows_message() {
        let html = render_index("https://localhost:3000", &[]);
        assert!(html.contains("<p>No files found</p>"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_one_link_per_entry() {
        let names = vec!["a.html".to_string(), "b.html".to_string()];
        let html = render_index("https://localhost:3000", &names);
        assert!(html.contains("<li><a href=\"https://localhost:3000/a.html\">a.html</a></li>"));
        assert!(html.contains("<li><a href=\"https://localhost:3000/b.html\">b.html</a></li>"));
        assert!(!html.contains(NO_FILES_MESSAGE));
    }

    #[test]
    fn test_names_are_escaped() {
        let names = vec!["<x>&y.html".to_string()];
        let html = render_index("https://h:1", &names);
        assert!(html.contains(">&lt;x&gt;&amp;y.html</a>"));
        assert!(html.contains("href=\"https://h:1/%3Cx%3E%26y.html\""));
    }
}
