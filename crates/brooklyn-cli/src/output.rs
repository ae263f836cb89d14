use brooklyn_core::ApplicationState;
use colored::Colorize;
use serde_json::{Value, json};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_status(id: &str, name: Option<&str>, state: ApplicationState, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            print_json(&json!({
                "id": id,
                "name": name,
                "state": state,
            }));
        }
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "State"]);
            builder.push_record([
                if id.is_empty() { "-" } else { id },
                name.unwrap_or("-"),
                state.as_str(),
            ]);
            let table = builder.build().with(Style::rounded()).to_string();
            println!("{table}");
        }
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
