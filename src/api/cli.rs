use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use super::{csv_string, run_http_server};
use crate::config::CalculatorDefaults;
use crate::core::convert_frequency;
use crate::scenarios::loan::{self, LoanRequest};
use crate::scenarios::mortgage::{self, MortgageRequest};

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    about = "Loan, mortgage, retirement and financial independence calculators"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print an amortization table for a generic loan.
    Loan {
        #[arg(long)]
        principal: f64,
        /// Annual interest rate in percent.
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: f64,
        /// One of daily, monthly, quarterly, half-year, yearly. Defaults to
        /// the configured frequency.
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        csv: bool,
    },
    /// Print a monthly mortgage schedule.
    Mortgage {
        #[arg(long)]
        property_value: f64,
        #[arg(long)]
        down_payment: f64,
        /// Annual interest rate in percent.
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
        /// First payment month, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        csv: bool,
    },
}

fn render<T: Serialize, R: Serialize>(result: &T, rows: &[R], csv: bool) -> Result<String, String> {
    if csv {
        csv_string(rows)
    } else {
        serde_json::to_string_pretty(result).map_err(|e| format!("failed to serialize result: {e}"))
    }
}

pub async fn run(cli: Cli, defaults: CalculatorDefaults) -> Result<Option<String>, String> {
    match cli.command {
        Command::Serve { port } => {
            run_http_server(port, defaults)
                .await
                .map_err(|e| format!("server error: {e}"))?;
            Ok(None)
        }
        Command::Loan {
            principal,
            rate,
            years,
            frequency,
            csv,
        } => {
            let frequency = match frequency {
                Some(name) => convert_frequency(&name).map_err(|e| e.to_string())?,
                None => defaults.default_frequency(),
            };
            let request = LoanRequest {
                loan_amount: principal,
                number_of_years: years,
                rate_of_interest: rate,
                frequency,
            };
            let result = loan::loan_schedule(&request, &defaults).map_err(|e| e.to_string())?;
            render(&result, &result.periods, csv).map(Some)
        }
        Command::Mortgage {
            property_value,
            down_payment,
            rate,
            years,
            start_date,
            csv,
        } => {
            let request = MortgageRequest {
                property_value,
                down_payment,
                interest_rate: rate,
                loan_term_years: years,
                ..MortgageRequest::starting(start_date.unwrap_or_else(|| Local::now().date_naive()))
            };
            let result = mortgage::mortgage(&request, &defaults).map_err(|e| e.to_string())?;
            render(&result, &result.periods, csv).map(Some)
        }
    }
}
