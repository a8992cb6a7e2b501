//! Parse an INI document, inspect it and write it back.
//!
//! Run with: cargo run --example parse_ini

use std::error::Error;
use textgram::ini::{self, IniSyntax, Node};

const INPUT: &str = "\
; application settings
name = demo

[server]
host = localhost ; primary host
port = 8080
allow = 10.0.0.1
allow = 10.0.0.2

[.tls]
cert = \"/etc/ssl/demo cert.pem\"
";

fn main() -> Result<(), Box<dyn Error>> {
    let syntax = IniSyntax::unix();
    let doc = ini::from_str(INPUT, syntax)?;

    println!("name        = {:?}", doc.get_value(&["name"]));
    println!("server.port = {:?}", doc.get_value(&["server", "port"]));
    println!("tls cert    = {:?}", doc.get_value(&["server", "tls", "cert"]));

    if let Some(Node::Property(allow)) = doc.get_path(&["server", "allow"]) {
        let hosts: Vec<_> = allow.values().collect();
        println!("allowed     = {:?}", hosts);
    }

    let text = ini::to_string(&doc, syntax)?;
    println!("\nFormatted:\n{}", text);
    assert_eq!(ini::from_str(&text, syntax)?, doc);
    println!("✓ Round-trip successful");

    Ok(())
}
