//! Integration tests for mathdoc.
//!
//! Tests math conversion through the public API and full site builds with
//! scripted converters.

mod common;

use anyhow::Result;
use common::{Script, ScriptedConverter, X_FRAGMENT, X_OUTPUT, create_docs};
use mathdoc::markdown::EquationNumbering;
use mathdoc::math::{self, DisplayMath, HtmlTranslator, InlineMath, Visit};
use mathdoc::{MarkdownRenderer, MathError, MathSession, build_site};
use std::fs;
use tempfile::TempDir;

/// Tests converter output envelope becomes a MathML fragment.
#[test]
fn test_build_mathml_wraps_converter_output() -> Result<()> {
    // Arrange
    let (converter, _calls) = ScriptedConverter::new(Script::Output(X_OUTPUT));
    let mut session = MathSession::new(converter);

    // Act
    let fragment = session.build_mathml("x")?;

    // Assert
    assert_eq!(fragment.as_deref(), Some(X_FRAGMENT));
    Ok(())
}

/// Tests empty envelope yields no fragment and an empty container.
#[test]
fn test_empty_envelope_appends_nothing() -> Result<()> {
    // Arrange
    let empty = "<blahtex>\n<mathml>\n<markup>\n</markup>\n</mathml>\n</blahtex>\n";
    let (converter, _calls) = ScriptedConverter::new(Script::Output(empty));
    let mut session = MathSession::new(converter);

    // Act
    let fragment = session.build_mathml("")?;
    let mut translator = HtmlTranslator::new(&mut session);
    math::html_visit_math(&mut translator, &InlineMath::new(""))?;

    // Assert
    assert_eq!(fragment, None);
    assert_eq!(translator.into_body(), "<span class=\"math\"></span>");
    Ok(())
}

/// Tests unavailable converter is spawned once per session.
#[test]
fn test_unavailable_converter_short_circuits() -> Result<()> {
    // Arrange
    let (converter, calls) = ScriptedConverter::new(Script::Missing);
    let mut session = MathSession::new(converter);

    // Act
    let mut first = HtmlTranslator::new(&mut session);
    math::html_visit_math(&mut first, &InlineMath::new("a"))?;
    let first = first.into_body();

    let mut second = HtmlTranslator::new(&mut session);
    math::html_visit_displaymath(&mut second, &DisplayMath::new("b").with_number(1))?;
    let second = second.into_body();

    // Assert
    assert_eq!(calls.get(), 1, "Converter should not be spawned again");
    assert_eq!(first, "<span class=\"math\"></span>");
    assert_eq!(
        second,
        "<div class=\"math\"><span class=\"eqno\">(1)</span></div>"
    );
    assert_eq!(session.warnings().len(), 1);
    Ok(())
}

/// Tests non-zero exit raises an error and writes nothing.
#[test]
fn test_non_zero_exit_writes_no_html() {
    // Arrange
    let (converter, _calls) = ScriptedConverter::new(Script::Fails);
    let mut session = MathSession::new(converter);
    let mut translator = HtmlTranslator::new(&mut session);

    // Act
    let result = math::html_visit_displaymath(&mut translator, &DisplayMath::new("\\frac{"));

    // Assert
    match result {
        Err(MathError::ConverterFailed { stderr, .. }) => assert_eq!(stderr, "syntax error"),
        Ok(visit) => panic!("Expected converter failure, got {:?}", visit),
    }
    assert!(translator.into_body().is_empty(), "No partial HTML expected");
}

/// Tests numbering span is attached once for multi paragraph source.
#[test]
fn test_multi_paragraph_display_numbered_once() -> Result<()> {
    // Arrange
    let (converter, _calls) = ScriptedConverter::new(Script::Output(X_OUTPUT));
    let mut session = MathSession::new(converter);
    let mut translator = HtmlTranslator::new(&mut session);
    let node = DisplayMath::new("x = 1\n\ny = 2\n\nz = 3").with_number(7);

    // Act
    let visit = math::html_visit_displaymath(&mut translator, &node)?;

    // Assert
    assert_eq!(visit, Visit::SkipNode);
    assert_eq!(
        translator.into_body(),
        format!(
            "<div class=\"math\">{}<span class=\"eqno\">(7)</span></div>",
            X_FRAGMENT
        )
    );
    Ok(())
}

/// Tests setup registers callbacks on the renderer.
#[test]
fn test_setup_registers_math_callbacks() -> Result<()> {
    // Arrange
    let (converter, calls) = ScriptedConverter::new(Script::Echo);
    let mut renderer = MarkdownRenderer::new();
    math::setup(&mut renderer, MathSession::new(converter));

    // Act
    let html = renderer.render("Let $n$ be even.\n\n$$n = 2k$$")?;

    // Assert
    assert_eq!(calls.get(), 2);
    assert!(html.contains("<span class=\"math\">"), "Html: {}", html);
    assert!(html.contains("<div class=\"math\">"), "Html: {}", html);
    assert!(html.contains("<mi>n = 2k</mi>"), "Html: {}", html);
    Ok(())
}

/// Tests full site build writes pages and stylesheet.
#[test]
fn test_build_site_writes_pages() -> Result<()> {
    // Arrange
    let docs = create_docs(&[
        ("index.md", "# Welcome\n\nEuler: $e^{i\\pi} + 1 = 0$\n"),
        (
            "guide/equations.md",
            "# Equations\n\n```math pythagoras\na^2 + b^2 = c^2\n```\n\n$$x$$\n",
        ),
        ("notes.txt", "not markdown"),
    ])?;
    let output = TempDir::new()?;
    let (converter, _calls) = ScriptedConverter::new(Script::Echo);

    // Act
    let report = build_site(
        docs.path(),
        output.path(),
        "Handbook",
        EquationNumbering::All,
        MathSession::new(converter),
    )?;

    // Assert
    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.equations_converted, 3);
    assert!(report.warnings.is_empty());

    let index = fs::read_to_string(output.path().join("index.html"))?;
    assert!(index.contains("<title>Welcome - Handbook</title>"), "Index: {}", index);
    assert!(index.contains("href=\"assets/docs.css\""));
    assert!(index.contains("<span class=\"math\">"));

    let equations = fs::read_to_string(output.path().join("guide/equations.html"))?;
    assert!(equations.contains("href=\"../assets/docs.css\""));
    assert!(equations.contains("id=\"equation-pythagoras\""));
    assert!(equations.contains("<span class=\"eqno\">(1)</span>"));
    assert!(equations.contains("<span class=\"eqno\">(2)</span>"));

    assert!(output.path().join("assets/docs.css").exists());
    assert!(!output.path().join("notes.html").exists());
    Ok(())
}

/// Tests missing converter degrades the whole build with one warning.
#[test]
fn test_build_site_with_missing_converter() -> Result<()> {
    // Arrange
    let docs = create_docs(&[
        ("a.md", "Inline $a$ and $b$.\n"),
        ("b.md", "$$c$$\n"),
    ])?;
    let output = TempDir::new()?;
    let (converter, calls) = ScriptedConverter::new(Script::Missing);

    // Act
    let report = build_site(
        docs.path(),
        output.path(),
        "Docs",
        EquationNumbering::Labelled,
        MathSession::new(converter),
    )?;

    // Assert
    assert_eq!(calls.get(), 1);
    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.equations_converted, 0);
    assert_eq!(report.warnings.len(), 1);

    let page = fs::read_to_string(output.path().join("a.html"))?;
    assert_eq!(page.matches("<span class=\"math\"></span>").count(), 2);
    Ok(())
}

/// Tests converter failure aborts the build with the math error.
#[test]
fn test_build_site_converter_failure_is_fatal() -> Result<()> {
    // Arrange
    let docs = create_docs(&[("bad.md", "Broken $x$ math.\n")])?;
    let output = TempDir::new()?;
    let (converter, _calls) = ScriptedConverter::new(Script::Fails);

    // Act
    let result = build_site(
        docs.path(),
        output.path(),
        "Docs",
        EquationNumbering::Labelled,
        MathSession::new(converter),
    );

    // Assert
    let error = result.expect_err("Build should fail");
    assert!(error.downcast_ref::<MathError>().is_some(), "Error: {:#}", error);
    assert!(!output.path().join("bad.html").exists());
    Ok(())
}

/// Tests each build gets its own failure state.
#[test]
fn test_consecutive_builds_do_not_share_state() -> Result<()> {
    // Arrange
    let docs = create_docs(&[("index.md", "$a$\n")])?;
    let output = TempDir::new()?;
    let (missing, missing_calls) = ScriptedConverter::new(Script::Missing);
    let (echo, echo_calls) = ScriptedConverter::new(Script::Echo);

    // Act
    let first = build_site(
        docs.path(),
        output.path(),
        "Docs",
        EquationNumbering::Labelled,
        MathSession::new(missing),
    )?;
    let second = build_site(
        docs.path(),
        output.path(),
        "Docs",
        EquationNumbering::Labelled,
        MathSession::new(echo),
    )?;

    // Assert
    assert_eq!(missing_calls.get(), 1);
    assert_eq!(echo_calls.get(), 1);
    assert_eq!(first.warnings.len(), 1);
    assert!(second.warnings.is_empty());
    assert_eq!(second.equations_converted, 1);
    Ok(())
}

/// Tests empty input directory is rejected.
#[test]
fn test_build_site_without_pages() -> Result<()> {
    // Arrange
    let docs = TempDir::new()?;
    let output = TempDir::new()?;

    // Act
    let result = build_site(
        docs.path(),
        output.path(),
        "Docs",
        EquationNumbering::Labelled,
        MathSession::default(),
    );

    // Assert
    assert!(result.is_err(), "Build without pages should fail");
    Ok(())
}
