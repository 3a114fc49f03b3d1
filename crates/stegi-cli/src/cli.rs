use std::path::PathBuf;

use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{ArgAction, Parser};
use stegi_core::{BitOrder, ProcessOptions, StegiError, ValidationPolicy};

use crate::progress::SweepBar;
use crate::CliResult;

/// stegsolve as cli
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Set verbosity level
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Plane bit mask, a base-2 number like 00000001
    #[arg(short = 'b', value_name = "plane mask", value_parser = parse_plane_mask)]
    pub plane_mask: Option<u8>,

    /// Channel bit mask, a base-2 number like 001 for the first channel
    #[arg(short = 'c', value_name = "channel mask", value_parser = parse_channel_mask)]
    pub channel_mask: Option<u32>,

    /// Keep the original color
    #[arg(short = 'k')]
    pub keep_color: bool,

    /// Output file, or output folder when all masks are written [default with -a: out]
    #[arg(short = 'o', value_name = "output")]
    pub out_file: Option<PathBuf>,

    /// Output all channel and plane masks
    #[arg(short = 'a')]
    pub all: bool,

    /// Output raw binary data instead of images
    #[arg(short = 'r')]
    pub raw: bool,

    /// Pack raw binary data column by column
    #[arg(long)]
    pub column: bool,

    /// Fail on masks that do not fit the image instead of passing it through unchanged
    #[arg(long)]
    pub strict: bool,

    /// Input image
    #[arg(value_name = "file", value_parser = OsStringValueParser::new().map(PathBuf::from))]
    pub input: Option<PathBuf>,
}

#[derive(Debug)]
pub enum CliError {
    MissingInput,
    Stegi(StegiError),
}

impl From<StegiError> for CliError {
    fn from(e: StegiError) -> Self {
        CliError::Stegi(e)
    }
}

impl CliArgs {
    pub fn options(&self) -> ProcessOptions {
        let out_file = match (&self.out_file, self.all) {
            (None, true) => Some(PathBuf::from(stegi_core::sweep::DEFAULT_SWEEP_DIR)),
            (out_file, _) => out_file.clone(),
        };

        ProcessOptions {
            channel_mask: self.channel_mask.unwrap_or(0),
            plane_mask: self.plane_mask.unwrap_or(0),
            keep_color: self.keep_color,
            out_file,
            all_masks: self.all,
            raw_binary: self.raw,
            order: if self.column {
                BitOrder::ColumnMajor
            } else {
                BitOrder::RowMajor
            },
            validation: if self.strict {
                ValidationPolicy::Strict
            } else {
                ValidationPolicy::Lenient
            },
        }
    }

    pub fn run(self) -> CliResult<()> {
        let options = self.options();
        if self.verbose > 0 {
            self.echo(&options);
        }

        let Some(input) = self.input.filter(|p| !p.as_os_str().is_empty()) else {
            return Err(CliError::MissingInput);
        };

        let mut bar = SweepBar::default();
        stegi_core::api::solve::prepare()
            .from_image(input)
            .with_options(options)
            .execute_with_progress(|p| bar.update(&p))?;
        bar.finish();

        Ok(())
    }

    /// echoes the resolved parameters, stdout may carry raw data
    fn echo(&self, options: &ProcessOptions) {
        let out_file = options
            .out_file
            .as_ref()
            .map_or_else(|| "None".to_owned(), |p| p.display().to_string());
        let file = self
            .input
            .as_ref()
            .map_or_else(|| "None".to_owned(), |p| p.display().to_string());

        eprintln!("Verbose: {}", self.verbose);
        eprintln!("File: {file}");
        eprintln!("Channel mask: {:b}", options.channel_mask);
        eprintln!("Plane mask: {:b}", options.plane_mask);
        eprintln!("Keep color: {}", options.keep_color);
        eprintln!("Output file: {out_file}");
        eprintln!("All masks: {}", options.all_masks);
    }
}

fn parse_bits(bits: &str) -> Result<u32, String> {
    let bits = bits.trim();
    if bits.is_empty() {
        return Ok(0);
    }
    u32::from_str_radix(bits, 2).map_err(|e| format!("`{bits}` is not a base-2 number: {e}"))
}

fn parse_channel_mask(bits: &str) -> Result<u32, String> {
    parse_bits(bits)
}

fn parse_plane_mask(bits: &str) -> Result<u8, String> {
    let mask = parse_bits(bits)?;
    u8::try_from(mask).map_err(|_| format!("plane mask `{}` is wider than 8 bits", bits.trim()))
}
