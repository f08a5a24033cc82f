//! Print the gate code for a ticket seed, as the holder's device would.

use chrono::Utc;
use clap::Parser;
use gatepass_core::TotpConfig;
use gatepass_core::totp::{DEFAULT_DIGITS, DEFAULT_STEP_SECONDS, DEFAULT_WINDOW};
use gatepass_server::client;

#[derive(Parser)]
#[command(name = "gatepass-totp")]
#[command(about = "Generate the current TOTP gate code from a base64 ticket seed")]
struct Cli {
    /// Ticket seed, base64 encoded
    seed: String,
    /// Time step in seconds
    #[arg(long, default_value_t = DEFAULT_STEP_SECONDS, value_parser = clap::value_parser!(u64).range(1..))]
    step: u64,
    /// Code length (6 to 8)
    #[arg(long, default_value_t = DEFAULT_DIGITS, value_parser = clap::value_parser!(u32).range(6..=8))]
    digits: u32,
}

fn main() {
    let cli = Cli::parse();
    let code = TotpConfig::new(cli.step, cli.digits, DEFAULT_WINDOW)
        .map_err(|e| e.to_string())
        .and_then(|config| {
            client::code_at(&cli.seed, config, Utc::now()).map_err(|e| e.to_string())
        });

    match code {
        Ok(code) => println!("Your TOTP code is: {code}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine() {
        let cli = Cli::try_parse_from(["gatepass-totp", "SGVsbG8h"]).unwrap();
        assert_eq!(cli.step, 60);
        assert_eq!(cli.digits, 6);
    }

    #[test]
    fn out_of_range_digits_are_rejected() {
        for digits in ["5", "9", "20"] {
            assert!(
                Cli::try_parse_from(["gatepass-totp", "SGVsbG8h", "--digits", digits]).is_err(),
                "{digits}"
            );
        }
        let cli = Cli::try_parse_from(["gatepass-totp", "SGVsbG8h", "--digits", "8"]).unwrap();
        assert_eq!(cli.digits, 8);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(Cli::try_parse_from(["gatepass-totp", "SGVsbG8h", "--step", "0"]).is_err());
    }
}
