use textgram::ini::{
    self, DuplicateDirective, IniExpr, IniLexer, IniSyntax, IniSyntaxBuilder, Node,
};
use textgram::{Converter, Error, Value};

fn unix(input: &str) -> ini::Section {
    ini::from_str(input, IniSyntax::unix()).unwrap()
}

fn values<'a>(doc: &'a ini::Section, path: &[&str]) -> Vec<&'a str> {
    doc.get_path(path)
        .and_then(Node::as_property)
        .map(|p| p.values().collect())
        .unwrap_or_default()
}

#[test]
fn test_global_section() {
    let doc = unix("[Global]\nkey = value\n");
    assert_eq!(doc.len(), 1);
    let global = doc.section("Global").unwrap();
    assert_eq!(global.len(), 1);
    assert_eq!(global.get_value(&["key"]), Some("value"));
}

#[test]
fn test_relative_nesting() {
    let doc = unix("[Parent]\nname = p\n[.Child]\nname = c\n");
    let parent = doc.section("Parent").unwrap();
    assert_eq!(parent.get_value(&["name"]), Some("p"));
    assert_eq!(parent.get_value(&["Child", "name"]), Some("c"));
    assert!(doc.section("Child").is_none());
}

#[test]
fn test_relative_nesting_chains_from_last_header() {
    let doc = unix("[a]\n[.b]\n[.c]\nk = 1\n");
    assert_eq!(doc.get_value(&["a", "b", "c", "k"]), Some("1"));
}

#[test]
fn test_relative_nesting_disabled() {
    let syntax = IniSyntaxBuilder::new()
        .with_relative_nesting(false)
        .build()
        .unwrap();
    assert!(ini::from_str("[a]\n[.b]\n", &syntax).is_err());
}

#[test]
fn test_absolute_nesting() {
    let doc = unix("[a.b]\nx = 1\n[a]\ny = 2\n");
    let a = doc.section("a").unwrap();
    assert_eq!(a.get_value(&["y"]), Some("2"));
    assert_eq!(a.get_value(&["b", "x"]), Some("1"));
}

#[test]
fn test_duplicate_properties() {
    let input = "[s]\nk = 1\nk = 2\n";

    let doc = unix(input);
    assert_eq!(values(&doc, &["s", "k"]), ["1", "2"]);

    for (directive, expected) in [
        (DuplicateDirective::Overwrite, vec!["2"]),
        (DuplicateDirective::Discard, vec!["1"]),
    ] {
        let syntax = IniSyntaxBuilder::new()
            .with_property_duplicates(directive)
            .build()
            .unwrap();
        let doc = ini::from_str(input, &syntax).unwrap();
        assert_eq!(values(&doc, &["s", "k"]), expected);
    }

    let syntax = IniSyntaxBuilder::new()
        .with_property_duplicates(DuplicateDirective::Throw)
        .build()
        .unwrap();
    let err = ini::from_str(input, &syntax).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate property 'k'");
}

#[test]
fn test_duplicate_sections() {
    let input = "[s]\na = 1\n[t]\n[s]\nb = 2\n";

    let doc = unix(input);
    let s = doc.section("s").unwrap();
    assert_eq!(s.get_value(&["a"]), Some("1"));
    assert_eq!(s.get_value(&["b"]), Some("2"));
    let order: Vec<_> = doc.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(order, ["s", "t"]);

    let build = |directive| {
        IniSyntaxBuilder::new()
            .with_section_duplicates(directive)
            .build()
            .unwrap()
    };

    let doc = ini::from_str(input, &build(DuplicateDirective::Overwrite)).unwrap();
    assert_eq!(doc.get_value(&["s", "a"]), None);
    assert_eq!(doc.get_value(&["s", "b"]), Some("2"));

    let doc = ini::from_str(input, &build(DuplicateDirective::Discard)).unwrap();
    assert_eq!(doc.get_value(&["s", "a"]), Some("1"));
    assert_eq!(doc.get_value(&["s", "b"]), None);

    let err = ini::from_str(input, &build(DuplicateDirective::Throw)).unwrap_err();
    assert!(matches!(err, Error::Duplicate { ref kind, ref name } if kind == "section" && name == "s"));
}

#[test]
fn test_opening_a_parent_path_is_not_a_duplicate() {
    let syntax = IniSyntaxBuilder::new()
        .with_section_duplicates(DuplicateDirective::Throw)
        .build()
        .unwrap();
    let doc = ini::from_str("[a.b]\nx = 1\n[a.c]\ny = 2\n", &syntax).unwrap();
    assert_eq!(doc.section("a").unwrap().len(), 2);
}

#[test]
fn test_parent_declared_after_nested_header() {
    let syntax = IniSyntaxBuilder::new()
        .with_section_duplicates(DuplicateDirective::Throw)
        .build()
        .unwrap();
    let doc = ini::from_str("[a.b]\nx = 1\n[a]\ny = 2\n", &syntax).unwrap();
    assert_eq!(doc.get_value(&["a", "y"]), Some("2"));
    assert_eq!(doc.get_value(&["a", "b", "x"]), Some("1"));

    let err = ini::from_str("[a.b]\n[a]\n[a]\n", &syntax).unwrap_err();
    assert!(matches!(err, Error::Duplicate { ref kind, ref name } if kind == "section" && name == "a"));
}

#[test]
fn test_section_over_property_is_a_structural_error() {
    let err = ini::from_str("s = 1\n[s]\nk = 2\n", IniSyntax::unix()).unwrap_err();
    assert!(!matches!(err, Error::Duplicate { .. }));
    assert!(err.to_string().contains("cannot merge section 's' into a property"));

    let syntax = IniSyntaxBuilder::new()
        .with_section_duplicates(DuplicateDirective::Throw)
        .build()
        .unwrap();
    let err = ini::from_str("s = 1\n[s]\nk = 2\n", &syntax).unwrap_err();
    assert!(matches!(err, Error::Duplicate { .. }));
}

#[test]
fn test_comments_attach_to_following_node() {
    let doc = unix("# about s\n; second\n[s] # header\n# about k\nk = v ; trailing\n# dangling\n");
    let s = doc.section("s").unwrap();
    assert_eq!(s.comments.preceding, ["about s", "second"]);
    assert_eq!(s.comments.inline.as_deref(), Some("header"));

    let k = &s.property("k").unwrap().entries()[0];
    assert_eq!(k.comments.preceding, ["about k"]);
    assert_eq!(k.comments.inline.as_deref(), Some("trailing"));
    assert_eq!(doc.trailing, ["dangling"]);
}

#[test]
fn test_comments_can_be_dropped() {
    let syntax = IniSyntaxBuilder::new()
        .with_retain_comments(false)
        .build()
        .unwrap();
    let doc = ini::from_str("# gone\nk = v # gone too\n", &syntax).unwrap();
    let k = &doc.property("k").unwrap().entries()[0];
    assert!(k.comments.is_empty());
    assert_eq!(k.value, "v");
}

#[test]
fn test_inline_comments_disabled() {
    let syntax = IniSyntaxBuilder::new()
        .with_inline_comments(false)
        .build()
        .unwrap();
    let doc = ini::from_str("# full line\ncolor = #ff0000\n", &syntax).unwrap();
    assert_eq!(doc.get_value(&["color"]), Some("#ff0000"));
}

#[test]
fn test_escapes() {
    let doc = unix("tab = a\\tb\nunicode = \\u0041\\x42\nsemi = a\\;b\nslash = a\\\\b\n");
    assert_eq!(doc.get_value(&["tab"]), Some("a\tb"));
    assert_eq!(doc.get_value(&["unicode"]), Some("AB"));
    assert_eq!(doc.get_value(&["semi"]), Some("a;b"));
    assert_eq!(doc.get_value(&["slash"]), Some("a\\b"));
}

#[test]
fn test_escaped_edges_survive_trimming() {
    let doc = unix("k = \\  padded\\ \n");
    assert_eq!(doc.get_value(&["k"]), Some("  padded "));
}

#[test]
fn test_line_continuation() {
    let doc = ini::from_str(
        "list = a,\\\n       b,\\\n       c\nnext = 1\n",
        IniSyntax::properties(),
    )
    .unwrap();
    assert_eq!(doc.get_value(&["list"]), Some("a,b,c"));
    assert_eq!(doc.get_value(&["next"]), Some("1"));
}

#[test]
fn test_dangling_escape_fails() {
    let err = ini::from_str("k = v\\", IniSyntax::unix()).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
}

#[test]
fn test_bad_unicode_escape_fails() {
    let err = ini::from_str("k = \\u12g4\n", IniSyntax::unix()).unwrap_err();
    assert_eq!(err.position(), Some((1, 9)));
}

#[test]
fn test_quotes() {
    let doc = unix("a = \"x ; y\"\nb = 'say \"hi\"'\nc = it's\n\"d = e\" = f\n");
    assert_eq!(doc.get_value(&["a"]), Some("x ; y"));
    assert_eq!(doc.get_value(&["b"]), Some("say \"hi\""));
    assert_eq!(doc.get_value(&["c"]), Some("it's"));
    assert_eq!(doc.get_value(&["d = e"]), Some("f"));
}

#[test]
fn test_quoting_disabled() {
    let doc = ini::from_str("k = \"raw\"\n", IniSyntax::properties()).unwrap();
    assert_eq!(doc.get_value(&["k"]), Some("\"raw\""));
}

#[test]
fn test_unterminated_quote_fails() {
    let err = ini::from_str("k = \"open\n", IniSyntax::unix()).unwrap_err();
    assert!(matches!(err, Error::Parse { line: 1, col: 5, .. }));
}

#[test]
fn test_unclosed_section_fails() {
    let err = ini::from_str("[Global\nkey = value\n", IniSyntax::unix()).unwrap_err();
    assert!(matches!(err, Error::Syntax { line: 1, .. }));
}

#[test]
fn test_empty_section_segment_fails() {
    for input in ["[]\n", "[a.]\n", "[a..b]\n"] {
        let err = ini::from_str(input, IniSyntax::unix()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "{input:?}: {err}");
    }
}

#[test]
fn test_blank_lines_and_indentation() {
    let doc = unix("\n\n   [s]\n\t k = v\n   \n  j=w\n");
    assert_eq!(doc.get_value(&["s", "k"]), Some("v"));
    assert_eq!(doc.get_value(&["s", "j"]), Some("w"));
}

#[test]
fn test_crlf_input() {
    let doc = unix("[s]\r\nk = v\r\nj = w");
    assert_eq!(doc.get_value(&["s", "k"]), Some("v"));
    assert_eq!(doc.get_value(&["s", "j"]), Some("w"));
}

#[test]
fn test_properties_dialect() {
    let input = "! comment\nhost:localhost\nport = 8080\nhost = example.org\npath = c:\\\\temp\n";
    let doc = ini::from_str(input, IniSyntax::properties()).unwrap();
    assert_eq!(doc.get_value(&["host"]), Some("example.org"));
    assert_eq!(doc.get_value(&["port"]), Some("8080"));
    assert_eq!(doc.get_value(&["path"]), Some("c:\\temp"));

    let value = ini::to_value(&doc, IniSyntax::properties());
    assert_eq!(value.pointer(&["port"]), Some(&Value::from("8080")));
}

#[test]
fn test_winapi_dialect() {
    let input = "; settings\n[Paths]\nroot=C:\\Program Files\\App\nroot=D:\\\n";
    let doc = ini::from_str(input, IniSyntax::winapi()).unwrap();
    assert_eq!(
        doc.get_value(&["Paths", "root"]),
        Some("C:\\Program Files\\App")
    );
}

#[test]
fn test_round_trip_is_idempotent() {
    let input = "\
; leading
top = 1
[server]
host = \"  spaced  \" # inline
path = a\\tb
[.tls]
cert = /etc/cert.pem
[server.tls]
key = k
[other]
empty =
flag
";
    for syntax in [IniSyntax::unix(), IniSyntax::winapi()] {
        let doc = ini::from_str(input, syntax).unwrap();
        let first = ini::to_string(&doc, syntax).unwrap();
        let reparsed = ini::from_str(&first, syntax).unwrap();
        assert_eq!(reparsed, doc);
        assert_eq!(ini::to_string(&reparsed, syntax).unwrap(), first);
    }
}

#[test]
fn test_to_value_types_values() {
    let doc = unix("[s]\nn = 42\nf = 1.5\nb = yes\nt = true\nz = null\nd = 2024-01-15T10:30:00Z\n");
    let value = ini::to_value(&doc, IniSyntax::unix());
    assert_eq!(value.pointer(&["s", "n"]).and_then(Value::as_i64), Some(42));
    assert_eq!(value.pointer(&["s", "b"]).and_then(Value::as_str), Some("yes"));
    assert_eq!(value.pointer(&["s", "t"]).and_then(Value::as_bool), Some(true));
    assert!(value.pointer(&["s", "z"]).is_some_and(Value::is_null));
    assert!(value
        .pointer(&["s", "d"])
        .and_then(Value::as_atom)
        .is_some_and(|a| a.is_date()));
}

#[test]
fn test_custom_value_parser() {
    let syntax = IniSyntaxBuilder::new()
        .with_value_parser(|raw| Value::from(raw.to_uppercase()))
        .build()
        .unwrap();
    let doc = ini::from_str("k = abc\n", &syntax).unwrap();
    assert_eq!(
        ini::to_value(&doc, &syntax).pointer(&["k"]),
        Some(&Value::from("ABC"))
    );
}

#[test]
fn test_value_to_ini() {
    let value = textgram::value!({
        "name": "demo",
        "server": { "port": 8080, "hosts": ["a", "b"] }
    });
    let doc = ini::Section::try_from(&value).unwrap();
    let text = ini::to_string(&doc, IniSyntax::unix()).unwrap();
    assert_eq!(
        text,
        "name = demo\n\n[server]\nport = 8080\nhosts = a\nhosts = b\n"
    );
    let reparsed = ini::from_str(&text, IniSyntax::unix()).unwrap();
    assert_eq!(ini::to_value(&reparsed, IniSyntax::unix()), value);
}

#[test]
fn test_from_reader() {
    let input = "[s]\nk = v\n".repeat(2000);
    let doc = ini::from_reader(input.as_bytes(), IniSyntax::unix()).unwrap();
    assert_eq!(doc.section("s").unwrap().property("k").unwrap().len(), 2000);
}

#[test]
fn test_converter_bytes_split_inside_utf8() {
    let syntax = IniSyntax::unix();
    let input = "k = héllo wörld\n".as_bytes();
    let mut converter = Converter::new(syntax, IniLexer::new());
    for byte in input {
        converter.feed_bytes(std::slice::from_ref(byte)).unwrap();
    }
    let Some(IniExpr::Section { section, .. }) = converter.finish().unwrap() else {
        panic!("expected a document");
    };
    assert_eq!(section.get_value(&["k"]), Some("héllo wörld"));
}

#[test]
fn test_converter_rejects_truncated_utf8() {
    let mut converter = Converter::new(IniSyntax::unix(), IniLexer::new());
    converter.feed_bytes(&"é".as_bytes()[..1]).unwrap();
    assert!(converter.finish().is_err());
}
