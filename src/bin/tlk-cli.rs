//! tlk-cli - Command-line interface for tlkdecode
//!
//! A command-line tool for decoding TLK talk tables to XML or plain text.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tlkdecode::render::{write_table, OutputFormat};
use tlkdecode::{LoadOptions, TalkTableFile};

#[derive(Parser)]
#[command(name = "tlk-cli")]
#[command(about = "A CLI tool for decoding TLK talk table files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a talk table into XML or text
    Decode {
        /// Input TLK file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t = CliOutputFormat::Xml)]
        format: CliOutputFormat,

        /// Fail when an entry's string runs off the end of the data instead of keeping it
        #[arg(short, long)]
        strict: bool,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Get information about a talk table
    Info {
        /// TLK file to analyze
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliOutputFormat {
    /// XML document with one <string> element per entry
    Xml,
    /// One "id: text" line per entry
    Text,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Xml => OutputFormat::Xml,
            CliOutputFormat::Text => OutputFormat::Text,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            format,
            strict,
            force,
        } => decode_file(
            &input,
            &output,
            format.into(),
            strict,
            force,
            cli.verbose,
            cli.quiet,
        ),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn decode_file(
    input: &PathBuf,
    output: &PathBuf,
    format: OutputFormat,
    strict: bool,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    if verbose {
        println!("Decoding '{}' to '{}'", input.display(), output.display());
        println!("Format: {:?}, Strict: {}", format, strict);
    }

    let start_time = Instant::now();

    let input_data = fs::read(input)?;
    let input_size = input_data.len();

    // Show a spinner for large tables
    let progress = if !quiet && input_size > 1024 * 1024 {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Decoding...");
        Some(pb)
    } else {
        None
    };

    let options = if strict {
        LoadOptions::strict()
    } else {
        LoadOptions::default()
    };
    let table = TalkTableFile::from_bytes_with_options(&input_data, &options)
        .map_err(|e| format!("Decoding failed: {}", e))?;

    if let Some(ref pb) = progress {
        pb.set_message("Writing...");
    }

    let mut rendered = Vec::new();
    write_table(&table, format, &mut rendered)?;
    fs::write(output, &rendered)?;

    if let Some(ref pb) = progress {
        pb.finish_with_message("Decoding complete");
    }

    let elapsed = start_time.elapsed();
    let stats = table.stats();

    if !quiet {
        println!("✓ Decoding successful!");
        println!("  Input:    {} bytes", input_size);
        println!("  Output:   {} bytes", rendered.len());
        println!("  Entries:  {}", table.string_refs().len());
        println!("  Strings:  {}", stats.catalogue_strings);
        println!("  Time:     {:.2?}", elapsed);

        if verbose {
            println!("  Cache hits:       {}", stats.cache_hits);
            println!("  Fallback decodes: {}", stats.fallback_decodes);
            println!("  Empty entries:    {}", stats.empty_entries);
            println!("  Unterminated:     {}", stats.unterminated_strings);
        }
    }

    Ok(())
}

fn show_file_info(input: &PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    let file_size = data.len();

    println!("TLK File Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", file_size);

    if verbose && data.len() >= 4 {
        println!(
            "  Magic bytes: {:02x} {:02x} {:02x} {:02x}",
            data[0], data[1], data[2], data[3]
        );
    }

    match TalkTableFile::from_bytes(&data) {
        Ok(table) => {
            let header = table.header();
            let stats = table.stats();
            println!("  Version: {} (min {})", header.version, header.min_version);
            println!("  Male entries: {}", header.entry1_count);
            println!("  Female entries: {}", header.entry2_count);
            println!("  Tree nodes: {}", table.tree().len());
            println!("  Data length: {} bytes", header.data_length);
            println!("  Catalogued strings: {}", stats.catalogue_strings);
            if verbose {
                println!("  Data bits: {}", table.bits().len_bits());
                println!("  Cache hits: {}", stats.cache_hits);
                println!("  Fallback decodes: {}", stats.fallback_decodes);
                println!("  Empty entries: {}", stats.empty_entries);
                println!("  Unterminated strings: {}", stats.unterminated_strings);
            }
            println!("  Status: ✓ Valid talk table");
        }
        Err(e) => {
            println!("  Status: ✗ Invalid or corrupted talk table");
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}
