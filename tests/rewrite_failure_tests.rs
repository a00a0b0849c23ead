use ttc::ast::Block;
use ttc::{rewrite, Config, StatementTransformer, TableResolver, TranslationFailure};

/// Transformer double that fails every body with a fixed message
struct FailingTransformer {
    message: &'static str,
}

impl StatementTransformer for FailingTransformer {
    fn transform(&self, _block: &Block) -> Result<Block, TranslationFailure> {
        Err(TranslationFailure::new(self.message))
    }
}

fn rewrite_failing(source: &str, message: &'static str) -> String {
    let resolver = TableResolver::mstest();
    let transformer = FailingTransformer { message };
    rewrite(source, &resolver, &transformer, &Config::default()).expect("Failed to rewrite")
}

#[test]
fn test_failed_body_becomes_commented_source_and_throw() {
    let source = r#"[TemplatedTestClass]
public class PersonTests_Template
{
    [TemplatedTestMethod]
    public void Constructor_SetsName()
    {
        var person = new Person_Template("Ada");
        Assert.AreEqual("Ada", person.Name);
    }
}
"#;

    let expected = r#"[TestClass]
public class PersonTests
{
    [TestMethod]
    public void Constructor_SetsName()
    {
        // == Failed To Compile ==
        // var person = new Person_Template("Ada");
        // Assert.AreEqual("Ada", person.Name);
        throw new AssertFailedException("Unknown type Person_Template");
    }
}
"#;

    assert_eq!(rewrite_failing(source, "Unknown type Person_Template"), expected);
}

#[test]
fn test_single_line_body_gets_default_formatting() {
    let source = r#"class C
{
    [TemplatedTestMethod]
    public void M() { F(); }
}
"#;

    let expected = r#"class C
{
    [TestMethod]
    public void M() {
    // == Failed To Compile ==
    // F();
    throw new AssertFailedException("boom");
    }
}
"#;

    assert_eq!(rewrite_failing(source, "boom"), expected);
}

#[test]
fn test_blank_lines_between_statements_survive_uncommented() {
    let source = r#"class C
{
    [TemplatedTestMethod]
    public void M()
    {
        First();

        Second();
    }
}
"#;

    let expected = r#"class C
{
    [TestMethod]
    public void M()
    {
        // == Failed To Compile ==
        // First();

        // Second();
        throw new AssertFailedException("boom");
    }
}
"#;

    assert_eq!(rewrite_failing(source, "boom"), expected);
}

#[test]
fn test_multi_line_statement_keeps_relative_indentation() {
    let source = r#"class C
{
    [TemplatedTestMethod]
    public void M()
    {
        Console.WriteLine(
            "a very long string",
            second);
    }
}
"#;

    let expected = r#"class C
{
    [TestMethod]
    public void M()
    {
        // == Failed To Compile ==
        // Console.WriteLine(
        //     "a very long string",
        //     second);
        throw new AssertFailedException("boom");
    }
}
"#;

    assert_eq!(rewrite_failing(source, "boom"), expected);
}

#[test]
fn test_failure_message_is_escaped() {
    let source = r#"class C
{
    [TemplatedTestMethod]
    public void M()
    {
        F();
    }
}
"#;

    let generated = rewrite_failing(source, "cannot resolve \"Person\"\ncheck the template");
    assert!(generated.contains(
        r#"throw new AssertFailedException("cannot resolve \"Person\"\ncheck the template");"#
    ));
}

#[test]
fn test_failure_is_local_to_the_failing_method() {
    let source = r#"using System;

[TemplatedTestClass]
class SuiteTests_Template
{
    private int shared = 1;

    [TemplatedTestMethod]
    public void First()
    {
        A();
    }

    public void Helper()
    {
        B();
    }

    [TemplatedTestMethod]
    public void Second()
    {
        C();
    }
}
"#;

    let generated = rewrite_failing(source, "boom");

    // both marked methods fail independently
    assert_eq!(generated.matches("// == Failed To Compile ==").count(), 2);
    assert!(generated.contains("// A();"));
    assert!(generated.contains("// C();"));

    // everything between them is untouched
    assert!(generated.contains("using System;"));
    assert!(generated.contains("private int shared = 1;"));
    assert!(generated.contains("public void Helper()\n    {\n        B();\n    }"));
}

#[test]
fn test_crlf_templates_synthesize_crlf() {
    let source = "class C\r\n{\r\n    [TemplatedTestMethod]\r\n    public void M()\r\n    {\r\n        F();\r\n    }\r\n}\r\n";
    let generated = rewrite_failing(source, "boom");

    assert!(generated.contains(
        "{\r\n        // == Failed To Compile ==\r\n        // F();\r\n        throw new AssertFailedException(\"boom\");\r\n    }"
    ));
}
