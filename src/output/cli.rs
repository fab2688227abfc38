use crate::audit::AuditReport;
use crate::model::ReportRow;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PwnedRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "URL")]
    url: String,
}

/// Prints the pwned entries and run totals. Passwords stay in the CSV.
pub fn print_summary(report: &AuditReport) {
    print!("{}", render_summary(report));
}

pub fn render_summary(report: &AuditReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    out.push('\n');
    if result.interrupted {
        out.push_str("Interrupted, partial results only.\n\n");
    }

    let pwned: Vec<&ReportRow> = result.rows.iter().filter(|r| r.is_pwned()).collect();
    if pwned.is_empty() {
        out.push_str("No pwned passwords found.\n");
    } else {
        out.push_str(&format!("Found {} pwned passwords:\n\n", pwned.len()));

        let rows: Vec<PwnedRow> = pwned
            .iter()
            .map(|r| PwnedRow {
                title: truncate(&r.title, 40),
                username: truncate(&r.username, 30),
                count: r.count,
                url: r.url.clone(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        out.push_str(&table);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!(
        "Items: {}  Checked: {}  Skipped: {}  Unavailable: {}\n",
        result.total_items,
        result.rows.len(),
        result.skipped,
        result.unavailable
    ));

    if result.unavailable > 0 {
        out.push_str("Some lookups could not reach the service; those rows read \"No\".\n");
    }

    match &report.report {
        Some(path) => out.push_str(&format!("All done √\nReport saved at: {}\n", path.display())),
        None => out.push_str("Nothing to report, no file written.\n"),
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{}...", kept)
    }
}
