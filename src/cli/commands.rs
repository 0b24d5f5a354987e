use crate::config::ExcelOptions;
use crate::error::{TabulaError, TabulaResult};
use crate::excel::{WorkbookReader, HEADER_ROW};
use crate::report::{ReportRenderer, TemplateContext};
use colored::Colorize;
use std::path::PathBuf;

/// Execute the report command
pub fn report(
    template: PathBuf,
    data: PathBuf,
    output: PathBuf,
    verbose: bool,
) -> TabulaResult<()> {
    println!("{}", "📊 Tabula - Report".bold().green());
    println!("   Template: {}", template.display());
    println!("   Data:     {}", data.display());
    println!("   Output:   {}\n", output.display());

    if verbose {
        println!("{}", "📖 Loading context...".cyan());
    }
    let context = TemplateContext::from_file(&data)?;

    if verbose {
        println!("{}", "📖 Loading template workbook...".cyan());
    }
    let renderer = ReportRenderer::from_path(&template, context)?;

    if verbose {
        for name in renderer.sheet_names() {
            println!("   📄 Sheet: {}", name.bright_blue());
        }
        println!();
        println!("{}", "💾 Rendering...".cyan());
    }
    renderer.render_to_path(&output)?;

    println!("{}", "✅ Report Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());

    Ok(())
}

/// Execute the inspect command: show a sheet the way the importer reads it
pub fn inspect(
    file: PathBuf,
    sheet: Option<String>,
    remind: bool,
    config: Option<PathBuf>,
) -> TabulaResult<()> {
    println!("{}", "🔍 Tabula - Inspect".bold().green());
    println!("   File: {}\n", file.display());

    let mut workbook = WorkbookReader::from_path(&file)?;
    let names = workbook.sheet_names();

    let mut options = match config {
        Some(path) => ExcelOptions::from_yaml_file(&path)?,
        None => {
            let first = names.first().cloned().ok_or_else(|| {
                TabulaError::MalformedWorkbook("workbook has no sheets".to_string())
            })?;
            // The title only matters on export
            ExcelOptions::new(first, "")
        }
    };
    if let Some(name) = sheet {
        options.sheet_name = name;
    }
    options.show_remind |= remind;
    options.validate()?;

    let reader = workbook.sheet(&options.sheet_name)?;
    println!(
        "   Sheet: {} ({} of {})",
        reader.name().bright_blue(),
        names.iter().position(|n| *n == options.sheet_name).map(|i| i + 1).unwrap_or(0),
        names.len()
    );

    let header = reader.header_cells(HEADER_ROW)?;
    if header.is_empty() {
        println!("{}", "⚠️  Header row is empty".yellow());
        return Ok(());
    }

    println!("\n{}", "Header bindings:".bold());
    for (coordinate, text) in &header {
        println!("   {} → {}", coordinate.cyan(), text);
    }

    println!("\n{}", "Data rows:".bold());
    let first_data_row = options.skip_rows() + 1;
    let mut count = 0;
    for (row, texts) in reader.rows().filter(|(row, _)| *row >= first_data_row) {
        println!("   {:>4}  {}", row.to_string().bright_black(), texts.join(" | "));
        count += 1;
    }

    println!("\n{}", format!("Rows: {}", count).bold());
    Ok(())
}
