//! Command-line shell around the ledger client
//!
//! Parses arguments, builds one configuration, makes one call into
//! ledger-core and prints the result as JSON. No policy logic lives here.

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use ledger_core::{CreateBillOptions, LedgerClient, LedgerConfig};
use ledger_types::{BillCreate, InvoiceCreate, PurchaseOrderCreate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("ledger-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Audited QuickBooks Desktop client")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path; falls back to CONDUCTOR_* environment variables"),
        )
        .subcommand(Command::new("status").about("Check gateway connectivity and show the end-user"))
        .subcommand(Command::new("vendors").about("List vendors"))
        .subcommand(
            Command::new("vendor")
                .about("Show one vendor")
                .arg(Arg::new("id").long("id").value_name("ID").required(true)),
        )
        .subcommand(Command::new("customers").about("List customers"))
        .subcommand(
            Command::new("bills")
                .about("List bills")
                .arg(Arg::new("vendor-id").long("vendor-id").value_name("ID"))
                .arg(
                    Arg::new("updated-after")
                        .long("updated-after")
                        .value_name("DATE")
                        .help("Only bills updated on or after this date (YYYY-MM-DD)"),
                ),
        )
        .subcommand(
            Command::new("bill")
                .about("Show one bill")
                .arg(Arg::new("id").long("id").value_name("ID").required(true)),
        )
        .subcommand(
            Command::new("invoices")
                .about("List invoices")
                .arg(Arg::new("customer-id").long("customer-id").value_name("ID")),
        )
        .subcommand(
            Command::new("purchase-orders")
                .about("List purchase orders")
                .arg(Arg::new("vendor-id").long("vendor-id").value_name("ID"))
                .arg(
                    Arg::new("active")
                        .long("active")
                        .action(ArgAction::SetTrue)
                        .help("Only purchase orders still open for linking (requires --vendor-id)"),
                ),
        )
        .subcommand(Command::new("patterns").about("List local vendor posting patterns"))
        .subcommand(
            Command::new("check-pattern")
                .about("Check whether a posting pattern exists for a vendor")
                .arg(
                    Arg::new("vendor-id")
                        .long("vendor-id")
                        .value_name("ID")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("create-bill")
                .about("Create a bill from a JSON input file under full posting policy")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .value_name("FILE")
                        .required(true),
                )
                .arg(
                    Arg::new("skip-pattern-check")
                        .long("skip-pattern-check")
                        .action(ArgAction::SetTrue)
                        .help("Post even when no posting pattern exists for the vendor"),
                )
                .arg(
                    Arg::new("skip-duplicate-check")
                        .long("skip-duplicate-check")
                        .action(ArgAction::SetTrue)
                        .help("Post even when a recent bill carries the same reference number"),
                ),
        )
        .subcommand(
            Command::new("update-bill")
                .about("Update a bill from a JSON changes file")
                .arg(Arg::new("id").long("id").value_name("ID").required(true))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .value_name("FILE")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("delete-bill")
                .about("Delete a bill")
                .arg(Arg::new("id").long("id").value_name("ID").required(true)),
        )
        .subcommand(
            Command::new("create-invoice")
                .about("Create an invoice from a JSON input file")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .value_name("FILE")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("create-purchase-order")
                .about("Create a purchase order from a JSON input file")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .value_name("FILE")
                        .required(true),
                ),
        )
        .get_matches();

    // Load configuration
    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            LedgerConfig::from_file(path).with_context(|| format!("Loading config from {}", path))?
        }
        None => LedgerConfig::from_env().context("Loading config from environment")?,
    };

    let client = LedgerClient::new(&config)?;

    match matches.subcommand() {
        Some(("status", _)) => {
            if !client.check_connection().await? {
                log::error!("Gateway unreachable or credentials rejected");
                std::process::exit(1);
            }
            print_json(&client.end_user().await?)?;
        }
        Some(("vendors", _)) => print_json(&client.list_vendors().await?)?,
        Some(("vendor", sub)) => {
            print_json(&client.get_vendor(sub.get_one::<String>("id").unwrap()).await?)?
        }
        Some(("customers", _)) => print_json(&client.list_customers().await?)?,
        Some(("bills", sub)) => {
            let vendor_id = sub.get_one::<String>("vendor-id").map(String::as_str);
            let updated_after = sub
                .get_one::<String>("updated-after")
                .map(|s| s.parse::<chrono::NaiveDate>())
                .transpose()
                .context("Invalid --updated-after date, expected YYYY-MM-DD")?;
            print_json(&client.list_bills(vendor_id, updated_after).await?)?;
        }
        Some(("bill", sub)) => {
            print_json(&client.get_bill(sub.get_one::<String>("id").unwrap()).await?)?
        }
        Some(("invoices", sub)) => {
            let customer_id = sub.get_one::<String>("customer-id").map(String::as_str);
            print_json(&client.list_invoices(customer_id).await?)?;
        }
        Some(("purchase-orders", sub)) => {
            let vendor_id = sub.get_one::<String>("vendor-id").map(String::as_str);
            if sub.get_flag("active") {
                let vendor_id =
                    vendor_id.context("--active needs --vendor-id to scope the listing")?;
                print_json(&client.list_active_purchase_orders(vendor_id).await?)?;
            } else {
                print_json(&client.list_purchase_orders(vendor_id).await?)?;
            }
        }
        Some(("patterns", _)) => print_json(&client.list_vendor_patterns()?)?,
        Some(("check-pattern", sub)) => {
            let vendor_id = sub.get_one::<String>("vendor-id").unwrap();
            match client.vendor_pattern(vendor_id)? {
                Some(pattern) => print_json(&pattern)?,
                None => {
                    log::error!("No posting pattern on file for vendor {}", vendor_id);
                    std::process::exit(1);
                }
            }
        }
        Some(("create-bill", sub)) => {
            let input: BillCreate = read_input(sub.get_one::<String>("file").unwrap())?;
            let opts = CreateBillOptions {
                skip_pattern_check: sub.get_flag("skip-pattern-check"),
                skip_duplicate_check: sub.get_flag("skip-duplicate-check"),
            };
            match client.create_bill(&input, opts).await {
                Ok(bill) => print_json(&bill)?,
                Err(e) => {
                    log::error!("Bill refused [{}]: {}", e.code(), e);
                    std::process::exit(1);
                }
            }
        }
        Some(("update-bill", sub)) => {
            let bill_id = sub.get_one::<String>("id").unwrap();
            let changes: serde_json::Value = read_input(sub.get_one::<String>("file").unwrap())?;
            print_json(&client.update_bill(bill_id, changes).await?)?;
        }
        Some(("delete-bill", sub)) => {
            let bill_id = sub.get_one::<String>("id").unwrap();
            print_json(&client.delete_bill(bill_id).await?)?;
        }
        Some(("create-invoice", sub)) => {
            let input: InvoiceCreate = read_input(sub.get_one::<String>("file").unwrap())?;
            print_json(&client.create_invoice(&input).await?)?;
        }
        Some(("create-purchase-order", sub)) => {
            let input: PurchaseOrderCreate = read_input(sub.get_one::<String>("file").unwrap())?;
            print_json(&client.create_purchase_order(&input).await?)?;
        }
        _ => {
            log::error!("No command specified. Use --help for options.");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn read_input<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Reading input file {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Parsing input file {}", path))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
