use ttc::ast::{Item, Member};
use ttc::parser::parse_template;

#[test]
fn test_round_trip_is_byte_identical() {
    let source = r#"// Person tests
using System;
using Microsoft.VisualStudio.TestTools.UnitTesting;

namespace Company.Tests
{
    [TemplatedTestClass]
    public class PersonTests_Template
    {
        private readonly string greeting = @"Hello, ""world""";

        public string Subject { get; set; } = "Ada";

        public PersonTests_Template() : base()
        {
            Subject = "Ada Lovelace";
        }

        /* body under test */
        [TemplatedTestMethod("checks the name")]
        public void Constructor_SetsName()
        {
            var person = new Person_Template(Subject);
            Assert.AreEqual(Subject, person.Name);
        }
    }
}
"#;

    let unit = parse_template(source).expect("Failed to parse");
    assert_eq!(unit.to_source(), source);
}

#[test]
fn test_round_trip_with_crlf_line_endings() {
    let source = "using System;\r\n\r\nclass C\r\n{\r\n    void M()\r\n    {\r\n        F();\r\n    }\r\n}\r\n";
    let unit = parse_template(source).expect("Failed to parse");
    assert_eq!(unit.to_source(), source);
}

#[test]
fn test_member_classification() {
    let source = r#"class Widget_Template
{
    private int count;

    public string Label { get; set; }

    public Widget_Template(int count) { this.count = count; }

    public int Doubled() => count * 2;

    [TemplatedTestMethod]
    public void Count_StartsAtZero()
    {
        Assert.AreEqual(0, count);
    }

    class Inner { }
}
"#;

    let unit = parse_template(source).expect("Failed to parse");
    let ty = match &unit.items[0] {
        Item::Type(ty) => ty,
        other => panic!("expected type declaration, got {:?}", other),
    };

    assert_eq!(ty.name, "Widget_Template");
    assert_eq!(ty.members.len(), 6);
    assert!(matches!(ty.members[0], Member::Raw(_)));
    assert!(matches!(ty.members[1], Member::Raw(_)));
    assert!(matches!(ty.members[2], Member::Constructor(_)));
    assert!(matches!(ty.members[3], Member::Raw(_)));
    assert!(matches!(ty.members[4], Member::Method(_)));
    assert!(matches!(ty.members[5], Member::Type(_)));
}

#[test]
fn test_statement_splitting_keeps_control_flow_together() {
    let source = r#"class C
{
    void M()
    {
        if (a) { F(); } else { G(); }
        do { Tick(); } while (more);
        var xs = new[] { 1, 2 };
    }
}
"#;

    let unit = parse_template(source).expect("Failed to parse");
    let ty = match &unit.items[0] {
        Item::Type(ty) => ty,
        other => panic!("expected type declaration, got {:?}", other),
    };
    let method = match &ty.members[0] {
        Member::Method(method) => method,
        other => panic!("expected method, got {:?}", other),
    };

    let texts: Vec<&str> = method.body.statements.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "if (a) { F(); } else { G(); }",
            "do { Tick(); } while (more);",
            "var xs = new[] { 1, 2 };",
        ]
    );
}

#[test]
fn test_unbalanced_braces_are_rejected() {
    let source = "class C { void M() { F(); }";
    assert!(parse_template(source).is_err());
}

#[test]
fn test_stray_close_brace_is_rejected() {
    let source = "class C { } }";
    assert!(parse_template(source).is_err());
}
