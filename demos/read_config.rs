//! Reading a configuration both dynamically and into typed structs.
//!
//! Run with: cargo run --example read_config

use scf::{from_table, parse, Value};
use serde::Deserialize;
use std::error::Error;

const CONFIG: &str = r#"
name = "demo"
window {
    width = 1280
    height = 720
    scale = 1.5
    vsync = true
}
"#;

#[derive(Debug, Deserialize)]
struct Config {
    name: String,
    window: Window,
}

#[derive(Debug, Deserialize)]
struct Window {
    width: u32,
    height: u32,
    scale: f32,
    vsync: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut table = parse(CONFIG)?;

    // Walk entries in document order
    for (key, value) in &table {
        match value {
            Value::Table(block) => println!("{key}: block with {} entries", block.len()),
            other => println!("{key}: {other:?}"),
        }
    }

    // Typed lookups distinguish a missing key from a wrong type
    println!("width = {:?}", table.get_table("window")?.and_then(|w| w.get("width")));
    println!("missing = {:?}", table.get_i32("missing")?);
    if let Err(err) = table.get_i32("name") {
        println!("error: {err}");
    }

    // Upsert keeps the position of an existing key
    table.set("name", "renamed");
    println!("\nAs JSON:\n{}\n", serde_json::to_string_pretty(&table)?);

    let config: Config = from_table(table)?;
    println!("Typed: {config:#?}");

    // Errors carry their location
    if let Err(err) = parse("window {\n  width = 1280\n  height = \n}") {
        println!("\nerror: {err}");
    }

    Ok(())
}
