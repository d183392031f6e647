// console/command_handler.rs

use crate::console::Console;
use crate::model::{FieldUpdate, WeightUnit};
use tracing::info;

/// Handles one input line. Returns false when the session should end.
pub async fn handle_command(line: &str, console: &mut Console) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&command) = parts.first() else {
        return true;
    };

    match command {
        "show" => console.render_products(),
        "set" => {
            handle_set(console, &parts[1..]);
        }
        "example" => {
            console.store.load_chocolate_example();
            console.advice.clear();
            console.render_products();
        }
        "reset" => {
            console.store.reset();
            console.advice.clear();
            console.render_products();
        }
        "advice" => {
            let use_search = parts.get(1) == Some(&"live");
            if !console.advice.begin() {
                println!("An advice request is already running. Hold on...");
                return true;
            }
            info!("Advice requested (live market: {})", use_search);
            println!("Consulting the shopping expert...");
            let products = console.store.products().to_vec();
            let advice = console.advisor.advise(&products, use_search).await;
            console.advice.finish(advice);
            console.render_advice();
        }
        "config" => {
            println!(
                "model: {} | temperature: {} | 1 EUR = {} BGN",
                console.config.gemini_model, console.config.temperature, console.config.eur_to_bgn
            );
        }
        "help" => console.render_help(),
        "quit" | "exit" => {
            return false;
        }
        _ => println!("Unknown command. Type 'help' for a list of commands."),
    }
    true
}

fn handle_set(console: &mut Console, args: &[&str]) {
    let [id, field, value @ ..] = args else {
        println!("Usage: set <id> <field> <value>");
        return;
    };
    if value.is_empty() {
        println!("Usage: set <id> <field> <value>");
        return;
    }
    let value = value.join(" ");

    let update = match *field {
        "name" => FieldUpdate::Name(value),
        "weight" => match parse_amount(&value) {
            Ok(weight) => FieldUpdate::Weight(weight),
            Err(msg) => {
                println!("{}", msg);
                return;
            }
        },
        "quantity" | "qty" => match parse_amount(&value) {
            Ok(quantity) => FieldUpdate::Quantity(quantity),
            Err(msg) => {
                println!("{}", msg);
                return;
            }
        },
        "price" => match parse_amount(&value) {
            Ok(price) => FieldUpdate::PriceEur(price),
            Err(msg) => {
                println!("{}", msg);
                return;
            }
        },
        "unit" => match value.parse::<WeightUnit>() {
            Ok(unit) => FieldUpdate::Unit(unit),
            Err(msg) => {
                println!("{}", msg);
                return;
            }
        },
        other => {
            println!(
                "Unknown field '{}'. Editable fields: name, weight, unit, quantity, price.",
                other
            );
            return;
        }
    };

    if !console.store.update(id, update) {
        println!("No product with id '{}'.", id);
        return;
    }
    console.render_products();
}

/// Parses a numeric field value; '-' clears the field back to unset.
fn parse_amount(value: &str) -> Result<Option<f64>, String> {
    if value == "-" {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{}' is not a number (use '-' to clear the field)", value))
}
