use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use lsbsteg::{bits, raster, CodecOptions, TerminatorPolicy};
use std::{io::Write, path::PathBuf, str};

/// Hide messages in the least significant bits of PNG and BMP images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Accept the terminator at any bit offset when decoding, as older LSB tools do
    #[arg(long, global = true)]
    bit_granular: bool,

    /// Fail instead of printing a best-effort message when no terminator is found
    #[arg(long, global = true)]
    strict: bool,

    /// End-of-message delimiter as eight binary digits; must match between encode and decode
    #[arg(long, global = true, default_value = "11111111", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed a message and save the result losslessly
    Encode {
        input: PathBuf,
        message: String,
        /// Output image, must end in .png or .bmp
        output: PathBuf,
    },
    /// Print the message hidden in an image
    Decode { input: PathBuf },
    /// Show how much an image can hold
    Capacity { input: PathBuf },
}

impl Args {
    fn options(&self) -> CodecOptions {
        let terminator = if self.bit_granular {
            TerminatorPolicy::BitGranular
        } else {
            TerminatorPolicy::ByteAligned
        };
        CodecOptions::default()
            .with_delimiter(self.delimiter)
            .with_terminator(terminator)
            .with_require_terminator(self.strict)
    }
}

/// Parses a delimiter written as a byte of binary digits, e.g. `11111111`
fn parse_delimiter(digits: &str) -> Result<u8, String> {
    if digits.len() != u8::BITS as usize || !digits.bytes().all(|d| d == b'0' || d == b'1') {
        return Err(format!("expected 8 binary digits, got `{digits}`"));
    }
    u8::from_str_radix(digits, 2).map_err(|err| err.to_string())
}

/// Format: `[LEVEL] message`
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);
    let options = args.options();

    match args.command {
        Command::Encode {
            input,
            message,
            output,
        } => {
            // Refuse lossy outputs before doing any work
            raster::OutputFormat::from_path(&output)?;
            let cover = raster::open(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let stego = lsbsteg::encode_with(&cover, message.as_bytes(), &options)?;
            raster::save(&stego, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("Message encoded and saved to {}", output.display());
        }
        Command::Decode { input } => {
            let stego = raster::open(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let extraction = lsbsteg::decode_with(&stego, &options)?;
            match str::from_utf8(&extraction.message) {
                Ok(text) => println!("{text}"),
                Err(_) => {
                    warn!("message is not valid UTF-8, printing lossily");
                    println!("{}", String::from_utf8_lossy(&extraction.message));
                }
            }
        }
        Command::Capacity { input } => {
            let cover = raster::open(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            println!(
                "{}x{}: {} bits, up to {} message bytes",
                cover.width(),
                cover.height(),
                cover.capacity_bits(),
                bits::max_message_len(cover.width(), cover.height())
            );
        }
    }

    Ok(())
}
