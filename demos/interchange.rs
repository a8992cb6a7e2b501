//! Move data between INI and the interchange `Value`.
//!
//! Run with: cargo run --example interchange

use std::error::Error;
use textgram::ini::{self, IniSyntax, Section};
use textgram::value;

fn main() -> Result<(), Box<dyn Error>> {
    let syntax = IniSyntax::unix();

    let doc = ini::from_str("[db]\nport = 5432\nreplica = a\nreplica = b\nssl = true\n", syntax)?;
    let value = ini::to_value(&doc, syntax);
    println!("as value: {}", value);
    println!("as json:  {}", serde_json::to_string(&doc)?);

    let config = value!({
        "service": { "name": "api", "workers": 4, "hosts": ["x", "y"] }
    });
    let section = Section::try_from(&config)?;
    println!("\nas ini:\n{}", ini::to_string(&section, syntax)?);

    Ok(())
}
