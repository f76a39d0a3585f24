//! Document assembly: turn ordered reports into a block sequence.

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Block, ReportContent};

const ISO_DATE: &str = "%Y-%m-%d";

/// Earliest and latest report dates.
///
/// `reports` must already be in chronological order.
pub fn date_range(reports: &[ReportContent]) -> Option<(NaiveDate, NaiveDate)> {
    let first = reports.first()?.source.date;
    let last = reports.last()?.source.date;
    Some((first, last))
}

/// Fill in the title template.
///
/// `{min}`, `{max}` and `{today}` become ISO-8601 dates.
pub fn render_title(template: &str, min: NaiveDate, max: NaiveDate, today: NaiveDate) -> String {
    template
        .replace("{min}", &min.format(ISO_DATE).to_string())
        .replace("{max}", &max.format(ISO_DATE).to_string())
        .replace("{today}", &today.format(ISO_DATE).to_string())
}

/// Build the block sequence for a report book.
///
/// The structure is fixed: title page, index page with the table of contents
/// placeholder, then one section per report in the given order. Each section
/// is a heading named after the report file, its paragraphs, and a page break.
///
/// # Errors
/// `Error::NoInput` if `reports` is empty.
pub fn assemble(
    reports: &[ReportContent],
    config: &Config,
    generated_on: NaiveDate,
) -> Result<Vec<Block>> {
    let (min, max) = date_range(reports).ok_or_else(|| Error::NoInput {
        dir: config.input_dir.clone(),
    })?;

    let paragraph_count: usize = reports.iter().map(|r| r.lines.len()).sum();
    let mut blocks = Vec::with_capacity(5 + paragraph_count + reports.len() * 2);

    blocks.push(Block::title(render_title(
        &config.title_template,
        min,
        max,
        generated_on,
    )));
    blocks.push(Block::PageBreak);

    blocks.push(Block::title(config.index_title.clone()));
    blocks.push(Block::TocPlaceholder);
    blocks.push(Block::PageBreak);

    for report in reports {
        let name = &report.source.name;
        blocks.push(Block::heading(name.clone(), name.clone()));
        blocks.extend(report.lines.iter().map(|line| Block::paragraph(line.clone())));
        blocks.push(Block::PageBreak);
    }

    log::debug!(
        "Assembled {} blocks for {} reports ({} to {})",
        blocks.len(),
        reports.len(),
        min,
        max
    );
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceFile;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn report(name: &str, when: NaiveDate, lines: &[&str]) -> ReportContent {
        ReportContent::new(
            SourceFile::new(name, name, when),
            lines.iter().map(|l| l.to_string()).collect(),
        )
    }

    #[test]
    fn test_render_title() {
        let title = render_title(
            "From {min} to {max} ({today})",
            date(2023, 12, 31),
            date(2024, 1, 5),
            date(2024, 2, 1),
        );
        assert_eq!(title, "From 2023-12-31 to 2024-01-05 (2024-02-01)");
    }

    #[test]
    fn test_assemble_structure() {
        let reports = vec![
            report("B_2023-12-31.txt", date(2023, 12, 31), &["one", "two"]),
            report("A_2024-01-05.txt", date(2024, 1, 5), &[]),
        ];
        let config = Config::default();
        let blocks = assemble(&reports, &config, date(2024, 2, 1)).unwrap();

        assert_eq!(
            blocks,
            vec![
                Block::title(
                    "Reports from 2023-12-31 to 2024-01-05, generated on 2024-02-01."
                ),
                Block::PageBreak,
                Block::title("Report Index"),
                Block::TocPlaceholder,
                Block::PageBreak,
                Block::heading("B_2023-12-31.txt", "B_2023-12-31.txt"),
                Block::paragraph("one"),
                Block::paragraph("two"),
                Block::PageBreak,
                Block::heading("A_2024-01-05.txt", "A_2024-01-05.txt"),
                Block::PageBreak,
            ]
        );
    }

    #[test]
    fn test_assemble_heading_order_follows_reports() {
        let reports = vec![
            report("x_2024-01-01.txt", date(2024, 1, 1), &["a"]),
            report("y_2024-01-02.txt", date(2024, 1, 2), &["b"]),
            report("z_2024-01-02.txt", date(2024, 1, 2), &["c"]),
        ];
        let blocks = assemble(&reports, &Config::default(), date(2024, 1, 3)).unwrap();
        let headings: Vec<_> = blocks
            .iter()
            .filter(|b| b.is_heading())
            .filter_map(|b| b.text())
            .collect();
        assert_eq!(
            headings,
            vec!["x_2024-01-01.txt", "y_2024-01-02.txt", "z_2024-01-02.txt"]
        );
    }

    #[test]
    fn test_assemble_empty_is_no_input() {
        let err = assemble(&[], &Config::default(), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::NoInput { .. }));
    }
}
