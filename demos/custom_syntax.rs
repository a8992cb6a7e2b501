//! Build a custom INI dialect and see role validation in action.
//!
//! Run with: cargo run --example custom_syntax

use std::error::Error;
use textgram::ini::{self, DuplicateDirective, IniSyntaxBuilder};
use textgram::{FileInfo, Value};

fn main() -> Result<(), Box<dyn Error>> {
    let syntax = IniSyntaxBuilder::new()
        .with_delimiters(&[':'])?
        .with_comments(&['%'])?
        .with_nesting(&['/'])?
        .with_property_duplicates(DuplicateDirective::Throw)
        .with_value_parser(Value::literal)
        .with_file_info(FileInfo::new("Slash INI", &["sini"], "text/plain"))
        .build()?;

    let doc = ini::from_str("[a/b]\nkey: value % note\n", &syntax)?;
    println!("a/b/key = {:?}", doc.get_value(&["a", "b", "key"]));
    println!("{}", ini::to_string(&doc, &syntax)?);

    match ini::from_str("k: 1\nk: 2\n", &syntax) {
        Ok(_) => println!("duplicates accepted"),
        Err(e) => println!("rejected: {}", e),
    }

    // '%' already starts comments
    if let Err(e) = IniSyntaxBuilder::new()
        .with_comments(&['%'])
        .and_then(|b| b.with_delimiters(&['%']))
    {
        println!("invalid dialect: {}", e);
    }

    Ok(())
}
