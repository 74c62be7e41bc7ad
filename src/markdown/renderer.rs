//! Markdown rendering with GitHub Flavored Markdown support.

use anyhow::{Context, Result};
use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options, format_html, parse_document};
use std::path::Path;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::math::{DisplayMath, HtmlTranslator, InlineMath, MathError, MathSession, Visit};

/// HTML callback for a math node kind.
pub type VisitFn<N> = fn(&mut HtmlTranslator<'_>, &N) -> Result<Visit, MathError>;

/// Plain text callback used where markup is not allowed (page titles).
pub type TextFn = fn(&InlineMath) -> String;

/// Callbacks registered on the math extension point.
#[derive(Clone, Copy)]
pub struct MathVisitors {
    pub inline: VisitFn<InlineMath>,
    pub display: VisitFn<DisplayMath>,
    /// Plain text renderer; raw LaTeX is used when absent.
    pub text: Option<TextFn>,
}

/// Which display equations receive a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EquationNumbering {
    /// Only labelled equations (```` ```math label ````).
    #[default]
    Labelled,
    /// Every display equation.
    All,
}

/// Rendered page body with its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Plain text of the first level 1 heading.
    pub title: Option<String>,
    pub html: String,
}

struct MathExtension {
    visitors: MathVisitors,
    session: MathSession,
}

enum MathNode {
    Inline(InlineMath),
    Display { node: DisplayMath, block: bool },
}

/// Renders markdown to HTML with GitHub Flavored Markdown extensions.
///
/// Provides GFM extensions including tables, strikethrough, autolinks,
/// task lists, footnotes, and description lists. Uses syntect for code
/// block syntax highlighting when language is specified. Math written as
/// `$...$`, `$$...$$` or fenced `math` blocks is handed to the callbacks
/// registered with [`MarkdownRenderer::set_math`].
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    syntax_set: SyntaxSet,
    numbering: EquationNumbering,
    math: Option<MathExtension>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with GitHub Flavored Markdown options.
    ///
    /// Configures all GFM extensions and security settings:
    /// - Tables, strikethrough, autolinks, task lists, footnotes
    /// - Dollar delimited math
    /// - Smart punctuation for quotes and dashes
    /// - Raw HTML passthrough (documentation sources are trusted)
    /// - Syntax highlighting with syntect using CSS classes
    pub fn new() -> Self {
        let mut options = Options::default();

        // Extension options (GFM features)
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;
        options.extension.math_dollars = true;

        // Parse options (smart punctuation)
        options.parse.smart = true;

        // Render options (security: we trust)
        options.render.unsafe_ = true;

        // Load syntax definitions for highlighting
        let syntax_set = SyntaxSet::load_defaults_newlines();

        Self {
            options,
            syntax_set,
            numbering: EquationNumbering::default(),
            math: None,
        }
    }

    /// Selects which display equations are numbered.
    pub fn with_numbering(mut self, numbering: EquationNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Registers math callbacks and the session they convert with.
    ///
    /// Replaces any previously registered extension.
    pub fn set_math(&mut self, visitors: MathVisitors, session: MathSession) {
        self.math = Some(MathExtension { visitors, session });
    }

    /// Session of the registered math extension.
    pub fn math_session(&self) -> Option<&MathSession> {
        self.math.as_ref().map(|ext| &ext.session)
    }

    /// Renders markdown content to HTML string.
    ///
    /// # Errors
    ///
    /// Returns error if a math callback or syntax highlighting fails
    pub fn render(&mut self, content: &str) -> Result<String> {
        Ok(self.render_page(content)?.html)
    }

    /// Renders markdown content and extracts the page title.
    ///
    /// Parses markdown into AST, replaces math nodes with the output of the
    /// registered callbacks, and renders to HTML. Code blocks are syntax
    /// highlighted with CSS class names using syntect.
    ///
    /// # Arguments
    ///
    /// * `content`: Markdown content to render
    ///
    /// # Errors
    ///
    /// Returns error if a math callback fails, in which case nothing is
    /// rendered, or if syntax highlighting fails
    pub fn render_page(&mut self, content: &str) -> Result<RenderedPage> {
        let arena = Arena::new();
        let root = parse_document(&arena, content, &self.options);

        let text = self.math.as_ref().and_then(|ext| ext.visitors.text);
        let title = page_title(root, text);

        let numbering = self.numbering;
        if let Some(ext) = self.math.as_mut() {
            apply_math(root, ext, numbering)?;
        }

        let mut output = Vec::new();
        format_html(root, &self.options, &mut output).context("Failed to format markdown")?;
        let html = String::from_utf8(output).context("Rendered HTML is not valid UTF8")?;

        // Post-process HTML to add syntax highlighting with CSS classes
        let html = self.highlight_code_blocks(&html)?;

        Ok(RenderedPage { title, html })
    }

    /// Replaces the content of `<code class="language-X">` blocks with
    /// syntect highlighted HTML.
    ///
    /// Runs after math substitution, so fenced `math` blocks never reach it.
    fn highlight_code_blocks(&self, html: &str) -> Result<String> {
        let mut result = String::with_capacity(html.len());
        let mut last_end = 0;

        // Pattern: <code class="language-LANG">CODE</code>
        let mut search_pos = 0;

        while let Some(code_start) = html[search_pos..].find("<code class=\"language-") {
            let code_start = search_pos + code_start;

            // Find the language name
            let lang_start = code_start + "<code class=\"language-".len();
            let lang_end = match html[lang_start..].find('"') {
                Some(pos) => lang_start + pos,
                None => {
                    search_pos = code_start + 1;
                    continue;
                }
            };

            let language = &html[lang_start..lang_end];

            // Find the end of the opening tag
            let content_start = match html[lang_end..].find('>') {
                Some(pos) => lang_end + pos + 1,
                None => {
                    search_pos = code_start + 1;
                    continue;
                }
            };

            // Find the closing </code> tag
            let content_end = match html[content_start..].find("</code>") {
                Some(pos) => content_start + pos,
                None => {
                    search_pos = code_start + 1;
                    continue;
                }
            };

            let code_content = &html[content_start..content_end];

            // HTML decode the content (comrak escapes &, <, >, ", ')
            let decoded_content = Self::html_decode(code_content);

            // Copy everything before this code block
            result.push_str(&html[last_end..code_start]);

            // Generate highlighted HTML with CSS classes
            let highlighted = self
                .highlight_code(&decoded_content, language)
                .context("Failed to highlight code block")?;

            // Write opening tag with language class preserved
            result.push_str("<code class=\"language-");
            result.push_str(language);
            result.push_str("\">");
            result.push_str(&highlighted);
            result.push_str("</code>");

            // Move past this code block
            last_end = content_end + "</code>".len();
            search_pos = last_end;
        }

        // Copy remaining HTML after last code block
        result.push_str(&html[last_end..]);

        Ok(result)
    }

    /// Highlights code with syntect, emitting `hljs-` prefixed CSS classes.
    ///
    /// Languages syntect does not know are returned escaped as plain text.
    fn highlight_code(&self, code: &str, language: &str) -> Result<String> {
        // Handle empty code blocks
        if code.is_empty() {
            return Ok(String::new());
        }

        // Find syntax definition for language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language));

        let syntax = match syntax {
            Some(s) => s,
            None => {
                // Unknown language: return escaped plain text
                return Ok(Self::html_escape(code));
            }
        };

        // Generate HTML with CSS classes using hljs- prefix
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed { prefix: "hljs-" },
        );

        // Process each line
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .context("Failed to parse line for syntax highlighting")?;
        }

        Ok(generator.finalize())
    }

    /// Reverses the entity escaping comrak applies to code block content.
    fn html_decode(html: &str) -> String {
        html.replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
    }

    /// Escapes HTML special characters for unknown languages.
    fn html_escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Renders markdown file at given path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or rendering fails
    pub fn render_file(&mut self, path: impl AsRef<Path>) -> Result<RenderedPage> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read markdown file")?;
        self.render_page(&content)
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces math nodes with the HTML written by registered callbacks.
///
/// Nodes are numbered in document order. A callback error aborts before
/// the document is formatted.
fn apply_math<'a>(
    root: &'a AstNode<'a>,
    ext: &mut MathExtension,
    numbering: EquationNumbering,
) -> Result<()> {
    let mut next_number = 1;
    let nodes: Vec<&'a AstNode<'a>> = root.descendants().collect();

    for node in nodes {
        let math = match &node.data.borrow().value {
            NodeValue::Math(math) if math.display_math => MathNode::Display {
                node: DisplayMath::new(math.literal.as_str()),
                block: false,
            },
            NodeValue::Math(math) => MathNode::Inline(InlineMath::new(math.literal.as_str())),
            NodeValue::CodeBlock(code) if code.fenced => match math_fence_label(&code.info) {
                Some(label) => {
                    let mut display = DisplayMath::new(code.literal.trim_end_matches('\n'));
                    display.label = label;
                    MathNode::Display {
                        node: display,
                        block: true,
                    }
                }
                None => continue,
            },
            _ => continue,
        };

        let mut translator = HtmlTranslator::new(&mut ext.session);
        let (visit, block) = match math {
            MathNode::Inline(inline) => ((ext.visitors.inline)(&mut translator, &inline), false),
            MathNode::Display {
                node: mut display,
                block,
            } => {
                if display.label.is_some() || numbering == EquationNumbering::All {
                    display.number = Some(next_number);
                    next_number += 1;
                }
                ((ext.visitors.display)(&mut translator, &display), block)
            }
        };
        let visit = visit.context("Failed to render math")?;

        if visit == Visit::SkipNode {
            let html = translator.into_body();
            let paragraph = if block { None } else { standalone_paragraph(node) };

            match paragraph {
                Some(paragraph) => {
                    node.detach();
                    paragraph.data.borrow_mut().value = html_block(html);
                }
                None if block => node.data.borrow_mut().value = html_block(html),
                None => node.data.borrow_mut().value = NodeValue::HtmlInline(html),
            }
        }
    }

    Ok(())
}

/// Returns the paragraph holding a display math node as its only child.
fn standalone_paragraph<'a>(node: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
    let parent = node.parent()?;
    let is_display = matches!(&node.data.borrow().value, NodeValue::Math(math) if math.display_math);
    let is_paragraph = matches!(&parent.data.borrow().value, NodeValue::Paragraph);
    let only_child = parent.first_child().is_some_and(|first| std::ptr::eq(first, node))
        && parent.last_child().is_some_and(|last| std::ptr::eq(last, node));

    (is_display && is_paragraph && only_child).then_some(parent)
}

fn html_block(html: String) -> NodeValue {
    NodeValue::HtmlBlock(NodeHtmlBlock {
        block_type: 0,
        literal: format!("{}\n", html),
    })
}

/// Parses a fenced block info string of the form `math [label]`.
///
/// Returns None when the block is not math, otherwise the optional label.
fn math_fence_label(info: &str) -> Option<Option<String>> {
    let mut words = info.split_whitespace();
    if words.next()? != "math" {
        return None;
    }
    Some(words.next().map(String::from))
}

/// Returns plain text of the first level 1 heading.
fn page_title<'a>(root: &'a AstNode<'a>, text: Option<TextFn>) -> Option<String> {
    let heading = root.descendants().find(|node| {
        matches!(&node.data.borrow().value, NodeValue::Heading(heading) if heading.level == 1)
    })?;

    let mut title = String::new();
    for node in heading.descendants() {
        match &node.data.borrow().value {
            NodeValue::Text(value) => title.push_str(value),
            NodeValue::Code(code) => title.push_str(&code.literal),
            NodeValue::Math(math) => match text {
                Some(render) => title.push_str(&render(&InlineMath::new(math.literal.as_str()))),
                None => title.push_str(&math.literal),
            },
            NodeValue::SoftBreak | NodeValue::LineBreak => title.push(' '),
            _ => {}
        }
    }

    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
