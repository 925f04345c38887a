use clap::Parser;
use hamming_channel::ecc::{ChannelConfig, NoisyChannel};
use hamming_channel::Result;
use std::process;
use tracing_subscriber::EnvFilter;

/// Level used when RUST_LOG is unset or unparsable
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "hamming_sim", about = "Send a bit string through a noisy Hamming(7,4) channel")]
struct Args {
    /// Bits to send, e.g. 10110001; padded with zeros to whole 4-bit blocks
    #[arg(default_value = "10110001")]
    bits: String,
    /// Chance, in percent, that a codeword gets one bit flipped
    #[arg(default_value_t = 50.0)]
    noise_percent: f64,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn run(args: &Args) -> Result<()> {
    let mut config = ChannelConfig::from_percentage(args.noise_percent)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut channel = NoisyChannel::new(config)?;
    let report = channel.transmit_bit_string(args.bits.trim())?;

    println!("Hamming(7,4) over a channel with {}% noise", args.noise_percent);
    if report.padding > 0 {
        println!("Note: appended {} zero bit(s) to complete the last block", report.padding);
    }
    println!(
        "{:<15} | {:<20} | {:<20} | {:<15} | Status",
        "Original block", "Encoded (7 bits)", "Noisy", "Decoded"
    );
    println!("{}", "-".repeat(90));
    for block in &report.blocks {
        println!("{}", block);
    }

    let stats = channel.stats();
    println!(
        "\n{} block(s), {} bit flip(s), {} error(s) detected, {} miscorrection(s)",
        stats.blocks, stats.bits_flipped, stats.errors_detected, stats.miscorrections
    );
    println!("Recovered: {}", report.decoded_bits());
    Ok(())
}

fn main() {
    // Library diagnostics go through `log`; fmt() bridges them into tracing
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["hamming_sim"]).unwrap();
        assert_eq!(args.bits, "10110001");
        assert_eq!(args.noise_percent, 50.0);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn test_seed_flag_is_not_taken_as_bits() {
        let args = Args::try_parse_from(["hamming_sim", "--seed", "5"]).unwrap();
        assert_eq!(args.seed, Some(5));
        assert_eq!(args.bits, "10110001");

        let args = Args::try_parse_from(["hamming_sim", "1011000", "15", "--seed", "42"]).unwrap();
        assert_eq!(args.bits, "1011000");
        assert_eq!(args.noise_percent, 15.0);
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn test_bad_arguments_are_usage_errors() {
        assert!(Args::try_parse_from(["hamming_sim", "101", "lots"]).is_err());
        assert!(Args::try_parse_from(["hamming_sim", "--seed", "-3"]).is_err());
    }

    #[test]
    fn test_run_reports_invalid_input() {
        let args = Args::try_parse_from(["hamming_sim", "10x1", "0", "--seed", "1"]).unwrap();
        assert!(run(&args).is_err());

        let args = Args::try_parse_from(["hamming_sim", "101", "150"]).unwrap();
        assert!(run(&args).is_err());

        let args = Args::try_parse_from(["hamming_sim", "101", "0", "--seed", "1"]).unwrap();
        assert!(run(&args).is_ok());
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("trace")).max_level_hint(), Some(LevelFilter::TRACE));
    }
}
