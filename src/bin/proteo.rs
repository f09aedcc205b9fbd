//! proteo - Proteolysis analysis CLI
//!
//! Command-line interface for TarProt, LimProt and ProtProf analyses and
//! their cleavage-level aggregations.

use clap::{Parser, Subcommand, ValueEnum};
use composable_proteolysis::aggregate::{
    aa_distribution, cleavage_evolution, cleavage_per_residue, fragments, histogram, HistWindows,
    Significance,
};
use composable_proteolysis::correct::CorrectionMethod;
use composable_proteolysis::data::{
    AnalysisConfig, ColumnLayout, ColumnSpec, ExperimentGroup, PrepConfig, RawTable, ResultTable,
};
use composable_proteolysis::error::Result;
use composable_proteolysis::pipeline::{AnalysisDesign, AnalysisOutcome, AnalysisRunner};
use composable_proteolysis::seq::{SeqTarget, SequenceInfo};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Cleavage-level summaries available from the `aggregate` command
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AggregateKind {
    /// Merged overlapping peptides per label
    Fragments,
    /// Cleavage counts per sequence window
    Histogram,
    /// Cleavages per residue
    Cpr,
    /// Cleavage evolution across labels
    Cevol,
    /// Amino-acid distribution around cleavages
    Aa,
}

/// Numbering used for residue-keyed summaries
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Numbering {
    Rec,
    Nat,
}

impl From<Numbering> for SeqTarget {
    fn from(n: Numbering) -> Self {
        match n {
            Numbering::Rec => SeqTarget::Recombinant,
            Numbering::Nat => SeqTarget::Native,
        }
    }
}

/// Quantitative analysis of proteolysis experiments
#[derive(Parser)]
#[command(name = "proteo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an analysis from a YAML configuration file
    Run {
        /// Path to analysis configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the peptide table (TSV)
        #[arg(short, long)]
        data: PathBuf,

        /// FASTA with the recombinant sequence and optionally the native one
        #[arg(short, long)]
        fasta: PathBuf,

        /// Output directory for results and data-preparation steps
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run an analysis and write one cleavage-level summary
    Aggregate {
        /// Path to analysis configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the peptide table (TSV)
        #[arg(short, long)]
        data: PathBuf,

        /// FASTA with the recombinant sequence and optionally the native one
        #[arg(short, long)]
        fasta: PathBuf,

        /// Summary to compute
        #[arg(short, long, value_enum)]
        kind: AggregateKind,

        /// Output path for the summary TSV
        #[arg(short, long)]
        output: PathBuf,

        /// Numbering for cpr and cevol
        #[arg(long, value_enum, default_value = "rec")]
        numbering: Numbering,

        /// Histogram window width in residues
        #[arg(long, default_value = "50")]
        window: usize,

        /// Largest gap bridged when merging fragments
        #[arg(long, default_value = "0")]
        delta: usize,

        /// Residues on each side of a cleavage for the AA distribution
        #[arg(long, default_value = "5")]
        positions: usize,
    },

    /// Align the sequences of a FASTA file and report the native window
    Align {
        /// FASTA with the recombinant sequence followed by the native one
        #[arg(short, long)]
        fasta: PathBuf,
    },

    /// Write an example configuration file
    Example {
        /// Output path for the YAML file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            data,
            fasta,
            output,
        } => cmd_run(&config, &data, &fasta, &output),

        Commands::Aggregate {
            config,
            data,
            fasta,
            kind,
            output,
            numbering,
            window,
            delta,
            positions,
        } => cmd_aggregate(
            &config, &data, &fasta, kind, &output, numbering, window, delta, positions,
        ),

        Commands::Align { fasta } => cmd_align(&fasta),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load inputs and run the analysis, reporting each stage.
fn load_and_run(
    config_path: &Path,
    data_path: &Path,
    fasta_path: &Path,
) -> Result<(AnalysisConfig, SequenceInfo, AnalysisOutcome)> {
    let config = AnalysisConfig::from_yaml(&std::fs::read_to_string(config_path)?)?;
    let table = RawTable::from_tsv(data_path)?;
    let sequences = SequenceInfo::from_fasta(fasta_path)?;
    info!(
        rows = table.n_rows(),
        columns = table.n_columns(),
        protein_length = sequences.rec_length(),
        "inputs loaded"
    );

    let mut runner = AnalysisRunner::new(config.clone())
        .with_progress(|stage| info!(stage = %stage, "stage complete"));
    let outcome = runner.run(&table, &sequences)?;
    Ok((config, sequences, outcome))
}

/// Run an analysis from configuration
fn cmd_run(config_path: &Path, data_path: &Path, fasta_path: &Path, output_dir: &Path) -> Result<()> {
    let (config, _, outcome) = load_and_run(config_path, data_path, fasta_path)?;

    std::fs::create_dir_all(output_dir)?;
    outcome.steps().write_dir(output_dir.join("Steps"))?;

    match outcome {
        AnalysisOutcome::Completed(output) => {
            let path = output_dir.join("results.tsv");
            output.results.to_tsv(&path)?;
            eprintln!("Done! {} peptides tested in '{}'", output.results.len(), config.name);
            for (label, n) in output.results.labels.iter().zip(output.results.n_significant()) {
                eprintln!("  {}: {} significant at alpha = {}", label, n, config.alpha);
            }
            eprintln!("Results written to {:?}", path);
        }
        AnalysisOutcome::NoSignificant { message, .. } => {
            eprintln!("{}", message);
            eprintln!("Data-preparation steps written to {:?}", output_dir.join("Steps"));
        }
    }

    Ok(())
}

/// Run an analysis and compute one aggregation of its results
#[allow(clippy::too_many_arguments)]
fn cmd_aggregate(
    config_path: &Path,
    data_path: &Path,
    fasta_path: &Path,
    kind: AggregateKind,
    output_path: &Path,
    numbering: Numbering,
    window: usize,
    delta: usize,
    positions: usize,
) -> Result<()> {
    let (config, sequences, outcome) = load_and_run(config_path, data_path, fasta_path)?;
    let output = outcome.into_output()?;
    let results: &ResultTable = &output.results;
    let coords = sequences.coords();
    let significance = Significance::at(config.alpha);

    match kind {
        AggregateKind::Fragments => {
            let set = fragments(results, &coords, significance, delta)?;
            set.to_tsv(output_path)?;
            eprintln!("{} fragments", set.total());
        }
        AggregateKind::Histogram => {
            histogram(results, &coords, &HistWindows::Fixed(window), significance)?
                .to_tsv(output_path)?;
        }
        AggregateKind::Cpr => {
            cleavage_per_residue(results, &coords, numbering.into(), significance)?
                .to_tsv(output_path)?;
        }
        AggregateKind::Cevol => {
            cleavage_evolution(results, &coords, numbering.into(), significance)?
                .to_tsv(output_path)?;
        }
        AggregateKind::Aa => {
            let dist = aa_distribution(results, &sequences, positions, significance, config.alpha)?;
            dist.counts.to_tsv(output_path)?;
            let chi_path = output_path.with_extension("chi.tsv");
            dist.chi.to_tsv(&chi_path)?;
            eprintln!("Chi-square table written to {:?}", chi_path);
        }
    }

    eprintln!("Wrote {:?} to {:?}", kind, output_path);
    Ok(())
}

/// Align recombinant and native sequences
fn cmd_align(fasta_path: &Path) -> Result<()> {
    let sequences = SequenceInfo::from_fasta(fasta_path)?;
    println!("Recombinant length: {}", sequences.rec_length());
    match sequences.window() {
        Some((start, end)) => {
            println!("Native window:      {}-{}", start, end);
            println!("Delta (nat - rec):  {}", sequences.delta());
        }
        None => println!("No native sequence"),
    }
    Ok(())
}

/// Generate example analysis configuration
fn cmd_example(output_path: &Path) -> Result<()> {
    let config = AnalysisConfig {
        name: "example-tarprot".to_string(),
        target_protein: None,
        score_threshold: 0.0,
        alpha: 0.05,
        correction: CorrectionMethod::BenjaminiHochberg,
        columns: ColumnLayout {
            sequence: 0,
            score: 1,
            detected_protein: None,
            exclude: None,
            control: ColumnSpec::parse("2-4")?,
            experiments: vec![
                ExperimentGroup::new("Exp1", ColumnSpec::parse("5-7")?),
                ExperimentGroup::new("Exp2", ColumnSpec::parse("8-10")?),
            ],
        },
        prep: PrepConfig::default(),
        design: AnalysisDesign::TarProt,
    };
    let yaml = config.to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example configuration to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}
