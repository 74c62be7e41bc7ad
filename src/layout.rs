//! Page layout wrapper

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Wraps rendered page content with standard HTML structure
///
/// Provides DOCTYPE, html, head, and container structure for every page.
/// The body is already rendered HTML and is inserted unescaped.
///
/// # Arguments
///
/// * `title`: Page title text (without suffix)
/// * `project`: Project name used as title suffix and header
/// * `stylesheet`: Relative path to the stylesheet
/// * `body`: Rendered page body
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page_wrapper(title: &str, project: &str, stylesheet: &str, body: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (project) }
                link rel="stylesheet" href=(stylesheet);
            }
            body {
                header class="site-header" {
                    span class="site-name" { (project) }
                }
                main class="container markdown-body" {
                    (PreEscaped(body))
                }
            }
        }
    }
}
