use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dotenvy::dotenv;

use cbeta_backend::analysis::{analyze_corpus, AnalysisSummary};
use cbeta_backend::corpus::{collect_titles, read_corpus};
use cbeta_backend::logger::{format_duration, init_tracing};
use cbeta_backend::report::{write_analysis, write_title_list};
use cbeta_backend::settings::AnalysisSettings;
use cbeta_backend::title_patterns::{TitlePatterns, TitleRules};
use cbeta_backend::types::TextType;

#[derive(Parser, Debug)]
#[command(author, version, about = "CBETA title classification and relationship CLI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optional JSON file overriding the title pattern lists.
    /// If not provided, the CBETA_PATTERNS environment variable will be used,
    /// and the built-in lists otherwise.
    #[arg(long, global = true, value_name = "FILE_PATH", env = "CBETA_PATTERNS")]
    patterns: Option<PathBuf>,

    /// Optional JSON file with report limits and output file names.
    /// If not provided, the CBETA_SETTINGS environment variable will be used,
    /// and the defaults otherwise.
    #[arg(long, global = true, value_name = "FILE_PATH", env = "CBETA_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify and group a corpus, then write the JSON tables and text reports
    Analyze {
        /// Directory of CBETA JSON documents
        #[arg(long, value_name = "DIRECTORY_PATH", env = "CBETA_DATA_DIR")]
        data_dir: PathBuf,

        /// Directory to write the reports to
        #[arg(long, value_name = "DIRECTORY_PATH", env = "CBETA_OUTPUT_DIR")]
        output_dir: PathBuf,
    },

    /// Classify titles given on the command line
    #[command(arg_required_else_help = true)]
    Classify {
        /// One or more titles
        #[arg(value_name = "TITLE", required = true)]
        titles: Vec<String>,
    },

    /// Write the sorted list of unique titles in a corpus
    Titles {
        /// Directory of CBETA JSON documents
        #[arg(long, value_name = "DIRECTORY_PATH", env = "CBETA_DATA_DIR")]
        data_dir: PathBuf,

        /// File to write the list to
        #[arg(long, value_name = "FILE_PATH")]
        output: PathBuf,
    },
}

fn load_rules(patterns_path: Option<&Path>) -> Result<TitleRules> {
    let patterns = match patterns_path {
        Some(p) => TitlePatterns::from_json_file(p)
            .with_context(|| format!("Failed to load title patterns from {:?}", p))?,
        None => TitlePatterns::default(),
    };
    TitleRules::new(patterns).context("Invalid title patterns")
}

fn load_settings(settings_path: Option<&Path>) -> Result<AnalysisSettings> {
    match settings_path {
        Some(p) => AnalysisSettings::from_json_file(p)
            .with_context(|| format!("Failed to load settings from {:?}", p)),
        None => Ok(AnalysisSettings::default()),
    }
}

fn print_summary(summary: &AnalysisSummary) {
    println!("{}", "Analysis Summary".green().bold());
    println!("  Records: {}", summary.total_records);

    for s in summary.type_stats.iter() {
        if s.text_type == TextType::Unknown {
            println!("  {:<8} total: {}", s.text_type.as_str(), s.total);
            continue;
        }
        println!(
            "  {:<8} total: {}, multi-version groups: {}, in multi-version groups: {}, single: {}",
            s.text_type.as_str(),
            s.total,
            s.multi_version_groups,
            s.multi_version_records,
            s.single_version_records,
        );
    }

    println!(
        "  Commentaries matched to a source: {} of {} ({} sources)",
        summary.matched_zhushu.to_string().green(),
        summary.total_zhushu,
        summary.sources_with_zhushu,
    );
    println!("  Sutras with several translations: {}", summary.translation_groups);
}

fn analyze(data_dir: &Path, output_dir: &Path, rules: &TitleRules, settings: &AnalysisSettings) -> Result<()> {
    let start = Instant::now();
    println!("{} {}", "Reading".cyan().bold(), data_dir.display());

    let records = read_corpus(data_dir)
        .with_context(|| format!("Failed to read corpus in {:?}", data_dir))?;
    let analysis = analyze_corpus(records, rules);

    let data_label = data_dir.display().to_string();
    let paths = write_analysis(&analysis, output_dir, &data_label, settings)
        .with_context(|| format!("Failed to write reports to {:?}", output_dir))?;

    print_summary(&analysis.summary);

    println!("{} {}", "Reports written to".green(), output_dir.display().to_string().cyan());
    for p in [
        &paths.groups_json,
        &paths.commentary_json,
        &paths.translations_json,
        &paths.zhushu_summary,
        &paths.groups_report,
    ] {
        println!("  {}", p.display());
    }
    println!("Finished in {}", format_duration(start.elapsed()));

    Ok(())
}

fn classify(titles: &[String], rules: &TitleRules) -> Result<()> {
    for title in titles {
        let c = rules.classify(title);
        let key = rules.normalize_for_grouping(title, c.text_type);

        println!("{}", title.bold());
        println!("  type:   {} ({})", c.text_type, c.text_type.label());
        if !c.matched_suffix.is_empty() {
            println!("  suffix: {}", c.matched_suffix);
        }
        println!("  key:    {}", key);

        if c.text_type == TextType::Zhushu {
            match rules.extract_source(title, c.text_type) {
                Some(source) => println!("  source: {}", source.cyan()),
                None => println!("  source: {}", "-".dimmed()),
            }
        }
    }
    Ok(())
}

fn titles(data_dir: &Path, output: &Path) -> Result<()> {
    let records = read_corpus(data_dir)
        .with_context(|| format!("Failed to read corpus in {:?}", data_dir))?;
    let titles = collect_titles(&records);

    write_title_list(&titles, output)
        .with_context(|| format!("Failed to write title list to {:?}", output))?;

    println!("{} {} titles to {}", "Wrote".green(), titles.len(), output.display());
    Ok(())
}

fn main() {
    // Attempt to load .env file. This might define CBETA_DATA_DIR and the
    // other options. Clap will pick them up via `env = "..."`.
    let _ = dotenv();

    init_tracing();

    let cli = Cli::parse();

    let loaded = load_rules(cli.patterns.as_deref())
        .and_then(|rules| Ok((rules, load_settings(cli.settings.as_deref())?)));
    let (rules, settings) = match loaded {
        Ok(x) => x,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            exit(1);
        }
    };

    let command_result = match cli.command {
        Commands::Analyze { data_dir, output_dir } => analyze(&data_dir, &output_dir, &rules, &settings),
        Commands::Classify { titles } => classify(&titles, &rules),
        Commands::Titles { data_dir, output } => titles(&data_dir, &output),
    };

    if let Err(e) = command_result {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        exit(1);
    }
}
