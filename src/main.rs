// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;

use expense_ledger::{open_app, Clock, Config, ExpenseApp, FormFields, KeyValueStore, VERSION};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env()?;
    log::info!("Using ledger at {}", config.db_path.display());

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("list") => run_list(&config)?,
        Some("add") => run_add(&config, &args[2..])?,
        Some("delete") => run_delete(&config, &args[2..])?,
        Some("--version") => println!("expense-ledger {}", VERSION),
        Some(other) => {
            eprintln!("❌ Unknown command '{}'", other);
            eprintln!("   expense-ledger {}", VERSION);
            eprintln!("   Usage: expense-ledger [list | add <description> <amount> <YYYY-MM-DD> | delete <row>]");
            std::process::exit(2);
        }
        // UI mode (default)
        None => run_ui_mode(&config)?,
    }

    Ok(())
}

fn print_ledger<S: KeyValueStore, C: Clock>(app: &ExpenseApp<S, C>) {
    let view = app.view();
    if view.rows.is_empty() {
        println!("(no entries)");
    }
    for row in &view.rows {
        println!("{:>3}. [{}] {}", row.index + 1, row.classification.label(), row.line());
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Balance: {}", view.balance);
}

fn run_list(config: &Config) -> Result<()> {
    let app = open_app(config)?;
    print_ledger(&app);
    Ok(())
}

fn run_add(config: &Config, args: &[String]) -> Result<()> {
    let [description, amount, date] = args else {
        bail!("add expects exactly 3 arguments: <description> <amount> <YYYY-MM-DD>");
    };

    let mut app = open_app(config)?;
    *app.fields_mut() = FormFields::new(description, amount, date);

    if app.submit().is_none() {
        let message = app.notification().unwrap_or("Invalid entry").to_string();
        eprintln!("❌ {}", message);
        std::process::exit(1);
    }

    println!("✓ Added \"{}\"", description.trim());
    print_ledger(&app);
    Ok(())
}

fn run_delete(config: &Config, args: &[String]) -> Result<()> {
    let [row] = args else {
        bail!("delete expects exactly 1 argument: <row number from 'list'>");
    };
    let number: usize = row
        .parse()
        .with_context(|| format!("'{}' is not a row number", row))?;

    let mut app = open_app(config)?;
    let action = number
        .checked_sub(1)
        .and_then(|index| app.view().row(index))
        .map(|row| row.delete());

    match action {
        Some(action) => {
            app.dispatch(action);
            println!("✓ Deleted row {}", number);
        }
        None => println!("No row {} (nothing deleted)", number),
    }

    print_ledger(&app);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let mut app = open_app(config)?;
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: expense-ledger list | add | delete");
    std::process::exit(1);
}
