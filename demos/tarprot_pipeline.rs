//! Example of a targeted-proteolysis analysis.
//!
//! This example shows how to:
//! 1. Build a peptide table and protein sequences in memory
//! 2. Run the TarProt design with progress reporting
//! 3. Examine significant peptides
//! 4. Summarize cleavages as fragments and a histogram

use composable_proteolysis::prelude::*;

const NATIVE: &str = "KTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQ";

fn main() -> Result<()> {
    println!("=== Composable Proteolysis Example ===\n");

    let recombinant = format!("MGSSHHHHHHSSGLVPRGSH{}LEHHHHHH", NATIVE);
    let sequences = SequenceInfo::new(&recombinant, Some(NATIVE))?;
    println!("Protein:");
    println!("  Recombinant length: {}", sequences.rec_length());
    if let Some((start, end)) = sequences.window() {
        println!("  Native window:      {}-{}", start, end);
    }
    println!();

    let table = create_example_table()?;
    println!("Peptides: {}", table.n_rows());
    println!();

    let config = AnalysisConfig {
        name: "TarProt-example".to_string(),
        target_protein: None,
        score_threshold: 20.0,
        alpha: 0.05,
        correction: CorrectionMethod::BenjaminiHochberg,
        columns: ColumnLayout {
            sequence: 0,
            score: 1,
            detected_protein: None,
            exclude: None,
            control: ColumnSpec::parse("2-4")?,
            experiments: vec![
                ExperimentGroup::new("5min", ColumnSpec::parse("5-7")?),
                ExperimentGroup::new("30min", ColumnSpec::parse("8-10")?),
            ],
        },
        prep: PrepConfig {
            normalization: NormalizationMethod::None,
            seed: Some(42),
            ..PrepConfig::default()
        },
        design: AnalysisDesign::TarProt,
    };

    println!("=== Running TarProt Analysis ===\n");

    let outcome = AnalysisRunner::new(config)
        .with_progress(|stage| println!("  stage: {}", stage))
        .run(&table, &sequences)?;
    println!();

    let output = match outcome {
        AnalysisOutcome::Completed(output) => output,
        AnalysisOutcome::NoSignificant { message, .. } => {
            println!("{}", message);
            return Ok(());
        }
    };
    let results = &output.results;

    println!("=== Results ===\n");
    for (label, n) in results.labels.iter().zip(results.n_significant()) {
        println!("  {}: {} significant peptides", label, n);
    }
    println!();
    println!("  {:<12} {:>6} {:>6} {:>10} {:>10}", "Sequence", "Start", "End", "P 5min", "P 30min");
    for row in &results.rows {
        println!(
            "  {:<12} {:>6} {:>6} {:>10.2e} {:>10.2e}",
            row.sequence,
            row.position.rec.n,
            row.position.rec.c,
            results.p_value(row, 0),
            results.p_value(row, 1)
        );
    }
    println!();

    println!("=== Cleavage Summaries ===\n");
    let coords = sequences.coords();
    let set = fragments(results, &coords, Significance::at(0.05), 0)?;
    for label in &set.labels {
        println!("  {} fragments:", label);
        for fragment in set.for_label(label).unwrap_or_default() {
            println!("    {}-{}  {}", fragment.rec.n, fragment.rec.c, fragment.wrapped_sequence(60));
        }
    }
    println!();

    let hist = histogram(results, &coords, &HistWindows::Fixed(25), Significance::at(0.05))?;
    println!("  Cleavages per 25 residues (Rec/All):");
    for (key, values) in hist.keys.iter().zip(&hist.values) {
        println!("    {:>7}: {:?}", key, &values[..results.n_labels()]);
    }

    Ok(())
}

/// Intensities rise with digestion time for three peptides.
fn create_example_table() -> Result<RawTable> {
    let rows = [
        ("MGSSHHHHHH", 85.0, [1000.0, 1100.0, 900.0], 4.0, 8.0),
        ("KTAYIAKQ", 60.0, [2000.0, 2100.0, 1900.0], 1.0, 6.0),
        ("ISFVKSHF", 72.0, [1500.0, 1450.0, 1550.0], 3.0, 3.0),
        ("SRQLEERL", 40.0, [800.0, 850.0, 750.0], 1.0, 1.0),
        ("LGLIEVQA", 10.0, [900.0, 950.0, 850.0], 5.0, 5.0),
        ("GDGTQDNL", 55.0, [1200.0, 1150.0, 1250.0], 1.0, 1.0),
    ];

    let headers = ["Sequence", "Score", "C1", "C2", "C3", "T5a", "T5b", "T5c", "T30a", "T30b", "T30c"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let data = rows
        .iter()
        .map(|(seq, score, control, fc5, fc30)| {
            let mut row = vec![seq.to_string(), score.to_string()];
            row.extend(control.iter().map(|v| v.to_string()));
            row.extend(control.iter().map(|v| (v * fc5).to_string()));
            row.extend(control.iter().map(|v| (v * fc30).to_string()));
            row
        })
        .collect();
    RawTable::new(headers, data)
}
