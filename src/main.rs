use anyhow::{Context, Result};
use mathdoc::{Config, MathSession};

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    let project = config.project_name()?;
    let session = MathSession::new(config.converter_command());

    let report = mathdoc::build_site(
        &config.input,
        &config.output,
        &project,
        config.numbering(),
        session,
    )
    .context("Documentation build failed")?;

    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    for page in &report.pages {
        println!("Generated: {}", page.display());
    }

    println!(
        "Built {} pages ({} equations converted)",
        report.pages.len(),
        report.equations_converted
    );

    Ok(())
}
