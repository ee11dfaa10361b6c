use belge_core::batch::BatchOutcome;
use belge_core::model::{DocumentRecord, Field};

pub fn print_outcome(outcome: &BatchOutcome) {
    print_records(&outcome.records);

    if !outcome.mismatches.is_empty() {
        println!();
        println!("Mismatches:");
        for m in &outcome.mismatches {
            println!("  {m}");
        }
    }

    let stats = &outcome.stats;
    println!();
    println!(
        "{} file(s): {} new, {} updated, {} duplicate(s) dropped, {} without code",
        stats.uploaded, stats.inserted, stats.updated, stats.duplicates_dropped, stats.without_code
    );
}

pub fn print_records(records: &[DocumentRecord]) {
    let widths: Vec<usize> = Field::REPORT_ORDER
        .iter()
        .map(|f| {
            records
                .iter()
                .map(|r| r.get(*f).chars().count())
                .chain(std::iter::once(f.report_label().chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = Field::REPORT_ORDER
        .iter()
        .zip(&widths)
        .map(|(f, &w)| format!("{:<w$}", f.report_label()))
        .collect();
    println!("{}", header.join("  ").trim_end());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));

    for record in records {
        let cells: Vec<String> = Field::REPORT_ORDER
            .iter()
            .zip(&widths)
            .map(|(f, &w)| format!("{:<w$}", record.get(*f)))
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}
