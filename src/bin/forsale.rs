//! forsale CLI
//!
//! Check, show and generate `_for-sale` DNS TXT records.

use std::io::{self, BufRead, Write};
use std::net::IpAddr;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use forsale_txt::forsale::{
    generate, nlfs_action, nlfs_identifier, zone_entry, ActionKind, DisplayCategory, DomainReport, Generated, LookupStatus,
    RecordOutcome, RecordReport, TagKind,
};
use forsale_txt::{ForSaleVerifier, HickoryResolver};
use tracing_subscriber::EnvFilter;

const EXIT_FOR_SALE: u8 = 0;
const EXIT_NOT_FOR_SALE: u8 = 2;
const EXIT_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "forsale")]
#[command(version)]
#[command(about = "Check, show and generate _for-sale DNS TXT records")]
struct Cli {
    /// Nameserver to query instead of the system resolver (repeatable)
    #[arg(long = "nameserver", global = true)]
    nameservers: Vec<IpAddr>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate every _for-sale TXT record of a domain
    Check {
        domain: String,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show what a domain's _for-sale records say
    Show {
        domain: String,

        /// Only show records with an NLFS- for-sale code
        #[arg(long)]
        nlfs: bool,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Generate a _for-sale TXT record
    #[command(group(ArgGroup::new("content").args(["fcod", "ftxt", "furi", "interactive"])))]
    Generate {
        /// For-sale code (1-239 visible ASCII characters)
        #[arg(long)]
        fcod: Option<String>,

        /// For-sale text (1-239 visible ASCII characters, no " or \)
        #[arg(long)]
        ftxt: Option<String>,

        /// For-sale URI (http, https, mailto or tel recommended)
        #[arg(long)]
        furi: Option<String>,

        /// Prompt for the content tag
        #[arg(short, long)]
        interactive: bool,

        /// Domain the record is published for
        #[arg(long, default_value = "example.com")]
        domain: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Check { domain, json } => {
            let report = lookup(&cli.nameservers, &domain, false).await?;
            if json {
                print_json(&report)?;
            } else {
                print_check(&report);
            }
            Ok(exit_code(&report))
        }
        Commands::Show { domain, nlfs, json } => {
            let report = lookup(&cli.nameservers, &domain, nlfs).await?;
            if json {
                print_json(&report)?;
            } else {
                print_show(&report, nlfs);
            }
            Ok(exit_code(&report))
        }
        Commands::Generate {
            fcod,
            ftxt,
            furi,
            interactive,
            domain,
        } => {
            let generated = if interactive {
                prompt_generate(&mut io::stdin().lock(), &mut io::stdout())?
            } else {
                let (kind, value) = match (fcod, ftxt, furi) {
                    (Some(v), _, _) => (Some(TagKind::Fcod), v),
                    (_, Some(v), _) => (Some(TagKind::Ftxt), v),
                    (_, _, Some(v)) => (Some(TagKind::Furi), v),
                    _ => (None, String::new()),
                };
                match generate(kind, &value) {
                    Ok(g) => g,
                    Err(e) => {
                        eprintln!("[ERROR] {}", e);
                        return Ok(EXIT_ERROR);
                    }
                }
            };
            print_generated(&generated, &domain);
            Ok(EXIT_FOR_SALE)
        }
    }
}

async fn lookup(nameservers: &[IpAddr], domain: &str, nlfs: bool) -> Result<DomainReport> {
    let resolver = if nameservers.is_empty() {
        HickoryResolver::new()
    } else {
        HickoryResolver::with_nameservers(nameservers)
    };
    ForSaleVerifier::new(resolver)
        .nlfs_only(nlfs)
        .check(domain)
        .await
        .with_context(|| format!("checking {}", domain))
}

fn exit_code(report: &DomainReport) -> u8 {
    if report.is_for_sale() {
        EXIT_FOR_SALE
    } else {
        EXIT_NOT_FOR_SALE
    }
}

fn print_json(report: &DomainReport) -> Result<()> {
    let out = serde_json::to_string_pretty(report).context("serializing report")?;
    println!("{}", out);
    Ok(())
}

fn print_lookup_status(report: &DomainReport) -> bool {
    match report.status {
        LookupStatus::Found => return true,
        LookupStatus::NoRecords => println!(
            "No '_for-sale' TXT record found for {}. Domain is likely not for sale.",
            report.domain
        ),
        LookupStatus::NxDomain => println!(
            "'{}' does not exist. Domain is likely not declared for sale via this method.",
            report.query
        ),
        LookupStatus::OutOfScope => println!(
            "'{}' is in the .arpa hierarchy; _for-sale records there are ignored.",
            report.domain
        ),
    }
    false
}

fn print_check(report: &DomainReport) {
    println!("Checking TXT records for: {}\n", report.query);
    if !print_lookup_status(report) {
        return;
    }

    for record in &report.records {
        print_record_check(record);
        println!();
    }

    let s = report.summary();
    println!(
        "Summary: {} record(s) total: {} valid, {} ignored (no version), {} invalid",
        s.total, s.valid, s.ignored, s.invalid
    );
}

fn print_record_check(record: &RecordReport) {
    match &record.text {
        Some(text) => println!("Found TXT record: \"{}\"", text),
        None => println!("Found TXT record: {:?}", String::from_utf8_lossy(record.raw.as_bytes())),
    }
    if record.parts != 1 {
        println!(
            "  [WARNING] TXT record holds {} character-strings; it MUST be a single string. Evaluated joined.",
            record.parts
        );
    }

    match &record.outcome {
        RecordOutcome::NotRecognized => {
            println!("  [IGNORED] Record does not start with 'v=FORSALE1;'.")
        }
        RecordOutcome::DecodeFailed(e) => {
            println!("  [ERROR] Record is not US-ASCII: {}. Skipped.", e)
        }
        RecordOutcome::ValidNoContent => println!(
            "  [INFO] Record contains only the version tag. Processors MAY assume the domain is for sale."
        ),
        RecordOutcome::ValidWithTag { tag, advisories } => {
            println!("  [OK] {} value is valid: \"{}\"", tag.kind(), tag.value());
            for advisory in advisories {
                println!("  [WARNING] {}", advisory);
            }
        }
        RecordOutcome::MalformedMultipleTags { kinds } => {
            let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
            println!(
                "  [ERROR] Record holds more than one tag-value pair ({}).",
                names.join(", ")
            );
            println!("  The tags SHOULD be treated as absent. Processors MAY assume the domain is for sale.");
        }
        RecordOutcome::MalformedTagValue(e) => {
            for violation in &e.violations {
                match e.kind {
                    Some(kind) => println!("  [ERROR] {}: {}", kind, violation),
                    None => println!("  [ERROR] {}", violation),
                }
            }
            println!("  The tag SHOULD be treated as absent. Processors MAY assume the domain is for sale.");
        }
    }
}

fn print_show(report: &DomainReport, nlfs: bool) {
    if !print_lookup_status(report) {
        return;
    }

    let mut shown = 0;
    for record in &report.records {
        if !record.category.is_for_sale() {
            continue;
        }
        shown += 1;
        println!("\nFor sale record {}:", shown);
        if record.parts != 1 {
            println!("  [WARNING] Published as {} character-strings.", record.parts);
        }
        match &record.category {
            DisplayCategory::NotForSale => {}
            DisplayCategory::ForSaleNoDetail => {
                println!("  This domain is declared for sale.");
                println!("  No specific sale information is available in this record.");
            }
            DisplayCategory::ForSaleWithCode { code } => {
                println!("  For Sale Code: {}", code);
                if nlfs {
                    for line in nlfs_lines(record, &report.domain) {
                        println!("  {}", line);
                    }
                }
            }
            DisplayCategory::ForSaleWithText { text } => println!("  For Sale Text: {}", text),
            DisplayCategory::ForSaleAction { kind, target } => match kind {
                ActionKind::Visit => {
                    println!("  Action: Visit this URL for more information or to make an offer:");
                    println!("  {}", target);
                }
                ActionKind::Email => println!("  Action: Email {} for more information.", target),
                ActionKind::Call => println!("  Action: Call {} for more information.", target),
                ActionKind::GenericUri => {
                    println!("  Action: Use this URI for more information:");
                    println!("  {}", target);
                }
            },
        }
    }

    if shown == 0 {
        if nlfs {
            println!("No '_for-sale' records with an NLFS- for-sale code were found.");
        } else {
            println!("No usable '_for-sale' records were found.");
        }
    }
}

fn nlfs_lines(record: &RecordReport, domain: &str) -> Vec<String> {
    let Some(id) = record.outcome.tag().and_then(nlfs_identifier) else {
        return Vec::new();
    };
    let action = match nlfs_action(id, domain) {
        Some(url) => format!("Action: Visit {} for more information.", url),
        None => "[WARNING] NLFS identifier not found in the registry.".to_string(),
    };
    vec![format!("NLFS identifier: {}", id), action]
}

fn print_generated(generated: &Generated, domain: &str) {
    for advisory in &generated.advisories {
        println!("[WARNING] {}", advisory);
    }
    println!("\nRecord for the zone of {}:", domain);
    println!("{}", zone_entry(domain, &generated.record));
}

/// Ask for a content tag until a valid value is entered.
fn prompt_generate(input: &mut impl BufRead, output: &mut impl Write) -> Result<Generated> {
    let kind = loop {
        writeln!(output, "Choose a content tag type (only one allowed per record):")?;
        writeln!(output, "1. fcod (For Sale Code)")?;
        writeln!(output, "2. ftxt (For Sale Text)")?;
        writeln!(output, "3. furi (For Sale URI)")?;
        writeln!(output, "4. No content tag (version tag only)")?;
        match read_answer(input, output, "Enter your choice (1-4): ")?.as_str() {
            "1" => break Some(TagKind::Fcod),
            "2" => break Some(TagKind::Ftxt),
            "3" => break Some(TagKind::Furi),
            "4" => break None,
            _ => writeln!(output, "Invalid choice. Please enter a number between 1 and 4.")?,
        }
    };

    let Some(kind) = kind else {
        return Ok(generate(None, "")?);
    };

    loop {
        let value = read_answer(input, output, &format!("Enter the {} value: ", kind))?;
        match generate(Some(kind), &value) {
            Ok(generated) => return Ok(generated),
            Err(e) => {
                writeln!(output, "[ERROR] {}", e)?;
                writeln!(output, "Please try again.")?;
            }
        }
    }
}

fn read_answer(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("unexpected end of input");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forsale_txt::forsale::nlfs::KNOWN_IDENTIFIER;
    use forsale_txt::forsale::{evaluate_records, RawRecord};
    use std::io::Cursor;

    fn run_prompt(answers: &str) -> (Result<Generated>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = prompt_generate(&mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn prompt_retries_until_valid() {
        let (result, output) = run_prompt("9\n2\nsay \"hi\"\nMake an offer\n");
        let generated = result.unwrap();
        assert_eq!(generated.record, "v=FORSALE1;ftxt=Make an offer");
        assert!(output.contains("Invalid choice"));
        assert!(output.contains("[ERROR] invalid ftxt tag"));
    }

    #[test]
    fn prompt_version_only() {
        let (result, _) = run_prompt("4\n");
        assert_eq!(result.unwrap().record, "v=FORSALE1;");
    }

    #[test]
    fn prompt_fails_on_eof() {
        let (result, _) = run_prompt("1\n");
        assert!(result.is_err());
    }

    #[test]
    fn cli_rejects_two_content_tags() {
        let parsed = Cli::try_parse_from(["forsale", "generate", "--fcod", "A", "--ftxt", "B"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parses_global_nameserver() {
        let cli = Cli::try_parse_from(["forsale", "check", "example.nl", "--nameserver", "192.0.2.53"])
            .unwrap();
        assert_eq!(cli.nameservers, vec!["192.0.2.53".parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn nlfs_lines_show_identifier_and_action() {
        let known = format!("v=FORSALE1;fcod=NLFS-{}", KNOWN_IDENTIFIER);
        let unknown = format!("v=FORSALE1;fcod=NLFS-{}", "Z".repeat(48));
        let reports = evaluate_records(vec![
            RawRecord::from(known.as_str()),
            RawRecord::from(unknown.as_str()),
            RawRecord::from("v=FORSALE1;fcod=PLAIN"),
        ]);

        let lines = nlfs_lines(&reports[0], "example.nl");
        assert_eq!(lines[0], format!("NLFS identifier: {}", KNOWN_IDENTIFIER));
        assert!(lines[1].contains("?domain=example.nl"));

        let lines = nlfs_lines(&reports[1], "example.nl");
        assert_eq!(lines[0], format!("NLFS identifier: {}", "Z".repeat(48)));
        assert!(lines[1].contains("not found in the registry"));

        assert!(nlfs_lines(&reports[2], "example.nl").is_empty());
    }
}
