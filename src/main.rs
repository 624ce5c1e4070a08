// Tue Jan 13 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use relscan::{
    config::{ConfigFile, ScanConfig},
    memory::LoadMode,
    orchestration::{parse_extension_list, FileEnumerator, ScanOrchestrator},
    output::{ConsoleReporter, JsonReport, MatchCollector, Tee},
    pattern::{compile_template, PatternSource},
    ui::{Banner, ScanProgress},
    utils::{format_bytes, logging::scoped_timer, LoggingUtils},
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version)]
#[command(about = "Relative byte-pattern scanner for unknown text encodings", long_about = None)]
struct Args {
    /// File or directory to scan
    target: PathBuf,

    /// File whose first non-empty line is the template
    #[arg(short = 'p', long, conflicts_with = "template")]
    pattern_file: Option<PathBuf>,

    /// Template given inline, e.g. "b a n a n a"
    #[arg(short, long)]
    template: Option<String>,

    /// Bytes per element
    #[arg(short, long)]
    width: Option<usize>,

    /// Ignored bytes after every element
    #[arg(long)]
    wildcard: Option<usize>,

    /// Worker threads (default: logical cores - 1)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Extensions to skip, comma-separated; may be repeated
    #[arg(long = "ignore-ext")]
    ignore_ext: Vec<String>,

    /// Memory-map files instead of reading them
    #[arg(long)]
    mmap: bool,

    /// Write a JSON report of every match
    #[arg(long)]
    json: Option<PathBuf>,

    /// Show at most this many matches per file
    #[arg(long)]
    max_per_file: Option<usize>,

    /// JSON config file with defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    quiet: bool,

    #[arg(long)]
    no_color: bool,

    #[arg(long)]
    no_progress: bool,

    #[arg(long)]
    no_banner: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let use_color = !args.no_color && atty::is(atty::Stream::Stdout);
    if !use_color {
        colored::control::set_override(false);
    }
    LoggingUtils::init(LoggingUtils::level_from_verbosity(args.verbose), use_color);

    if !args.no_banner && !args.quiet {
        Banner::default().with_color(use_color).print();
    }

    let file = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConfigFile::default(),
    };
    let config = merge_config(&args, file.scan.clone());
    config.validate()?;

    let source = read_template(&args, &file)?;
    let template = compile_template(&source, config.element_width, config.wildcard_width)?;

    if !args.quiet {
        eprintln!("{} Template {} ({})", "[*]".blue(), template.letters(), template);
    }

    let enumerator = FileEnumerator::new()
        .ignore_extensions(config.ignore_extensions.iter())
        .follow_links(config.follow_links);
    let mut orchestrator = ScanOrchestrator::from_config(template.clone(), &config)?;
    let mut console = ConsoleReporter::new(&template)
        .with_color(use_color)
        .with_matches(!args.quiet)
        .with_max_per_file(config.max_matches_per_file);

    if !args.no_progress && !args.quiet && atty::is(atty::Stream::Stderr) {
        let progress = ScanProgress::new(0);
        console = console.with_progress(progress.clone());
        orchestrator = orchestrator.with_progress(progress);
    }

    let json_path = args.json.clone().or(file.json_output.clone());
    let collector = json_path.as_ref().map(|_| MatchCollector::new());

    let summary = {
        let _timer = scoped_timer("scan");
        match &collector {
            Some(collector) => {
                orchestrator.scan_root(&args.target, &enumerator, &Tee::new(&console, collector))?
            }
            None => orchestrator.scan_root(&args.target, &enumerator, &console)?,
        }
    };

    log::debug!(
        "Orchestrator {:?} after {} workers ran {}",
        orchestrator.state(),
        orchestrator.workers(),
        orchestrator.template()
    );

    if let (Some(path), Some(collector)) = (json_path, collector) {
        log::info!("Collected {} matches for the report", collector.len());
        let report = JsonReport::new(&template, summary.clone(), collector.into_sorted());
        report
            .save(&path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        if !args.quiet {
            eprintln!(
                "{} Report saved to {} ({} matches, {} scanned)",
                "[+]".green(),
                path.display(),
                summary.total_matches,
                format_bytes(summary.bytes_scanned)
            );
        }
    }

    Ok(())
}

/// Flags given on the command line win over config file values.
fn merge_config(args: &Args, mut config: ScanConfig) -> ScanConfig {
    if let Some(width) = args.width {
        config = config.with_element_width(width);
    }
    if let Some(wildcard) = args.wildcard {
        config = config.with_wildcard_width(wildcard);
    }
    if let Some(threads) = args.threads {
        config = config.with_worker_count(threads);
    }
    if !args.ignore_ext.is_empty() {
        config = config.with_ignore_extensions(
            args.ignore_ext
                .iter()
                .flat_map(|list| parse_extension_list(list))
                .collect(),
        );
    }
    if args.mmap {
        config = config.with_load_mode(LoadMode::Mapped);
    }
    if args.max_per_file.is_some() {
        config.max_matches_per_file = args.max_per_file;
    }
    config
}

fn read_template(args: &Args, file: &ConfigFile) -> Result<String> {
    if let Some(template) = &args.template {
        return Ok(template.clone());
    }

    let pattern_file = args.pattern_file.as_ref().or(file.pattern_file.as_ref());
    if let Some(path) = pattern_file {
        return Ok(PatternSource::read(path)?);
    }

    match &file.template {
        Some(template) => Ok(template.clone()),
        None => bail!("no template given; use --template or --pattern-file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relscan::pattern::PatternError;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_blank_template_rejected_before_target_is_touched() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-there");
        let args = parse(&[
            "relscan",
            missing.to_str().unwrap(),
            "--template",
            "  \t ",
            "--quiet",
            "--no-color",
        ]);

        let err = run(args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PatternError>(),
            Some(PatternError::InvalidTemplate(_))
        ));
        assert!(!missing.exists());
    }

    #[test]
    fn test_flags_override_config_values() {
        let args = parse(&[
            "relscan",
            "rom.bin",
            "-t",
            "A B A",
            "--width",
            "2",
            "--threads",
            "3",
            "--ignore-ext",
            "txt,.PNG",
            "--ignore-ext",
            "dat",
            "--mmap",
        ]);
        let file = ScanConfig::new().with_wildcard_width(1).with_element_width(4);

        let config = merge_config(&args, file);
        assert_eq!(config.element_width, 2);
        assert_eq!(config.wildcard_width, 1);
        assert_eq!(config.worker_count, Some(3));
        assert_eq!(config.ignore_extensions, vec!["txt", "png", "dat"]);
        assert_eq!(config.load_mode, LoadMode::Mapped);
    }

    #[test]
    fn test_template_sources() {
        let file = ConfigFile {
            template: Some("X Y".to_string()),
            ..ConfigFile::default()
        };

        let inline = parse(&["relscan", "rom.bin", "-t", "A A"]);
        assert_eq!(read_template(&inline, &file).unwrap(), "A A");

        let fallback = parse(&["relscan", "rom.bin"]);
        assert_eq!(read_template(&fallback, &file).unwrap(), "X Y");
        assert!(read_template(&fallback, &ConfigFile::default()).is_err());
    }
}
