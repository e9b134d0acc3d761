//! # Shipping Quote
//!
//! Prints shipping charges from the live region service.
//!
//! ## Usage
//! ```bash
//! # Default quotes: UK, France and Albania at £99.99 and £100.00
//! cargo run -p fulfil-shipping --bin shipping-quote
//!
//! # One country at one amount (pence)
//! cargo run -p fulfil-shipping --bin shipping-quote -- --country Germany --amount 15000
//!
//! # Use a specific config file
//! cargo run -p fulfil-shipping --bin shipping-quote -- --config ./shipping.toml
//! ```

use std::env;
use std::path::PathBuf;

use fulfil_core::{Country, Money, ShippingCalculator};
use fulfil_shipping::{HttpRegionResolver, ShippingConfig};
use tracing_subscriber::EnvFilter;

/// Amounts quoted when `--amount` is not given.
const DEFAULT_AMOUNTS: &[i64] = &[9999, 10000];

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,fulfil=debug";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Default)]
struct QuoteArgs {
    countries: Vec<Country>,
    amounts: Vec<Money>,
    config_path: Option<PathBuf>,
    help: bool,
}

/// Value following the flag at `args[i]`.
fn flag_value(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} expects a value", args[i]))
}

/// Parses everything after the program name.
fn parse_args(args: &[String]) -> Result<QuoteArgs, String> {
    let mut parsed = QuoteArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--country" | "-c" => {
                parsed.countries.push(Country::new(flag_value(args, i)?));
                i += 1;
            }
            "--amount" | "-a" => {
                let value = flag_value(args, i)?;
                let pence: i64 = value
                    .parse()
                    .map_err(|_| format!("--amount expects pence, got {}", value))?;
                parsed.amounts.push(Money::from_pence(pence));
                i += 1;
            }
            "--config" => {
                parsed.config_path = Some(PathBuf::from(flag_value(args, i)?));
                i += 1;
            }
            "--help" | "-h" => {
                parsed.help = true;
                return Ok(parsed);
            }
            other => return Err(format!("unknown option {} (try --help)", other)),
        }
        i += 1;
    }

    Ok(parsed)
}

fn print_help() {
    println!("Fulfil Shipping Quote");
    println!();
    println!("Usage: shipping-quote [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --country <NAME>   Destination country (repeatable)");
    println!("  -a, --amount <PENCE>   Basket subtotal in pence (repeatable)");
    println!("      --config <PATH>    shipping.toml to load");
    println!("  -h, --help             Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let QuoteArgs {
        mut countries,
        mut amounts,
        config_path,
        help,
    } = parse_args(&args)?;

    if help {
        print_help();
        return Ok(());
    }

    if countries.is_empty() {
        countries = vec![
            Country::united_kingdom(),
            Country::france(),
            Country::albania(),
        ];
    }
    if amounts.is_empty() {
        amounts = DEFAULT_AMOUNTS.iter().copied().map(Money::from_pence).collect();
    }

    let config = ShippingConfig::load(config_path)?;
    let resolver = HttpRegionResolver::new(&config.region_service)?;
    println!("Region service: {}", resolver.endpoint());
    println!();

    let calculator = ShippingCalculator::from_resolver(resolver);

    for country in &countries {
        for amount in &amounts {
            match calculator.calculate_shipping(country, *amount).await {
                Ok(charge) => println!(
                    "Shipping cost to {} for an order of {}: {}",
                    country, amount, charge
                ),
                Err(e) => println!(
                    "Shipping cost to {} for an order of {}: unavailable ({})",
                    country, amount, e
                ),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_parse_country_and_amount() {
        let parsed = parse_args(&args(&["--country", "Germany", "-a", "15000"])).unwrap();

        assert_eq!(parsed.countries, vec![Country::new("Germany")]);
        assert_eq!(parsed.amounts, vec![Money::from_pence(15000)]);
        assert!(parsed.config_path.is_none());
        assert!(!parsed.help);
    }

    #[test]
    fn test_no_arguments_uses_defaults() {
        let parsed = parse_args(&[]).unwrap();
        assert!(parsed.countries.is_empty());
        assert!(parsed.amounts.is_empty());
    }

    #[test]
    fn test_flag_without_value_is_rejected() {
        assert_eq!(
            parse_args(&args(&["--country"])).unwrap_err(),
            "--country expects a value"
        );
        assert_eq!(
            parse_args(&args(&["--amount", "100", "-a"])).unwrap_err(),
            "-a expects a value"
        );
        assert!(parse_args(&args(&["--config"])).is_err());
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = parse_args(&args(&["--contry", "France"])).unwrap_err();
        assert!(err.contains("--contry"));
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        assert!(parse_args(&args(&["--amount", "£1.00"])).is_err());
    }

    #[test]
    fn test_help_stops_parsing() {
        let parsed = parse_args(&args(&["--help", "--bogus"])).unwrap();
        assert!(parsed.help);
    }

    #[test]
    fn test_default_log_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
