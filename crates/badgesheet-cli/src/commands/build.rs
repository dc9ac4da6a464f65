use anyhow::{Context as _, Result};
use badgesheet_directory::{
    assemble_with_report, merge_must_include, read_roster_file, SkippedEmail,
};
use badgesheet_render::{
    layout_sheet, write_pdf, FontMetrics, FontSet, LayoutOptions, PdfOptions, SheetPlan,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::commands::{print_json, Context};
use crate::error::invalid_input;

#[derive(Debug, clap::Args)]
pub struct BuildArgs {
    /// Comma-delimited roster with a header line
    #[arg(long)]
    pub roster: PathBuf,
    /// Where the sheet is written
    #[arg(long)]
    pub out: PathBuf,
    /// Extra email to badge even if the roster omits it (repeatable)
    #[arg(long = "include", value_name = "EMAIL")]
    pub include: Vec<String>,
    /// Write the layout plan as JSON instead of a PDF
    #[arg(long)]
    pub plan: bool,
}

#[derive(Debug, Serialize)]
struct BuildSummary {
    out: PathBuf,
    emails: usize,
    records: usize,
    pages: usize,
    skipped: Vec<SkippedEmail>,
}

pub fn build(ctx: &Context<'_>, args: BuildArgs) -> Result<()> {
    if !args.roster.is_file() {
        return Err(invalid_input(format!(
            "roster not found: {}",
            args.roster.display()
        )));
    }
    let roster = read_roster_file(&args.roster)
        .with_context(|| format!("read roster {}", args.roster.display()))?;
    let emails = merge_must_include(roster, &args.include);
    debug!(count = emails.len(), "roster loaded");

    // Fonts are checked before any network traffic.
    let fonts = font_set(ctx);
    let metrics = FontMetrics::load(&fonts).with_context(|| "load fonts")?;

    let assembly = ctx.assembly_context()?;
    let runtime = ctx.runtime()?;
    let report = runtime.block_on(assemble_with_report(&assembly, &emails));

    let sheet = &ctx.config.sheet;
    let options = LayoutOptions {
        base_font_size: sheet.base_font_size,
        text_padding: sheet.text_padding,
        watermark: sheet.watermark.clone(),
    };
    let plan = layout_sheet(&report.records, &sheet.template, &metrics, &options);

    if args.plan {
        write_plan(&plan, &args.out)?;
    } else {
        let pdf = PdfOptions {
            fonts,
            library_dir: ctx.config.output.pdfium_dir.clone(),
        };
        write_pdf(&plan, &pdf, &args.out)
            .with_context(|| format!("write pdf {}", args.out.display()))?;
    }

    let summary = BuildSummary {
        out: args.out,
        emails: emails.len(),
        records: report.records.len(),
        pages: plan.pages.len(),
        skipped: report.skipped,
    };
    if ctx.json {
        return print_json(&summary);
    }

    println!(
        "{} of {} emails resolved, {} page(s) written to {}",
        summary.records,
        summary.emails,
        summary.pages,
        summary.out.display()
    );
    for skipped in &summary.skipped {
        println!("  skipped {}: {}", skipped.email, skipped.reason);
    }
    Ok(())
}

fn font_set(ctx: &Context<'_>) -> FontSet {
    let fonts = &ctx.config.fonts;
    FontSet {
        regular: fonts.regular.clone(),
        bold: fonts.bold.clone(),
        alt: fonts.alt.clone(),
        italic: fonts.italic.clone(),
    }
}

fn write_plan(plan: &SheetPlan, out: &Path) -> Result<()> {
    let file = File::create(out).with_context(|| format!("create {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, plan)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
