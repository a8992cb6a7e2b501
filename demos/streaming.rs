//! Feed input in arbitrary chunks and parse once it is complete.
//!
//! Run with: cargo run --example streaming

use std::error::Error;
use textgram::ini::{IniExpr, IniLexer, IniSyntax};
use textgram::{Converter, Lexer};

fn main() -> Result<(), Box<dyn Error>> {
    let input = "[cache]\r\nsize = 512\r\nunicode = caf\\u00e9\r\n".as_bytes();
    let syntax = IniSyntax::unix();
    let mut converter = Converter::new(syntax, IniLexer::new());

    // deliberately awkward chunk size: splits "\r\n", escapes and words
    for chunk in input.chunks(3) {
        converter.feed_bytes(chunk)?;
    }
    println!("queued tokens: {}", converter.lexer().queue().len());

    match converter.finish()? {
        Some(IniExpr::Section { section, .. }) => {
            println!("size    = {:?}", section.get_value(&["cache", "size"]));
            println!("unicode = {:?}", section.get_value(&["cache", "unicode"]));
        }
        other => println!("unexpected result: {:?}", other),
    }

    Ok(())
}
