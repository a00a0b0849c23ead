use ttc::{rewrite, Config, IdentityTransformer, TableResolver};

/// Resolver whose resolved attribute types are fully qualified
fn qualified_resolver() -> TableResolver {
    let mut resolver = TableResolver::new();
    resolver.add_attribute(
        "TemplatedTestClass",
        "Microsoft.VisualStudio.TestTools.UnitTesting.TestClass",
        None,
    );
    resolver.add_attribute(
        "TemplatedTestMethod",
        "Microsoft.VisualStudio.TestTools.UnitTesting.TestMethod",
        Some("AssertFailedException"),
    );
    resolver
}

fn rewrite_with(resolver: &TableResolver, source: &str) -> String {
    rewrite(source, resolver, &IdentityTransformer, &Config::default())
        .expect("Failed to rewrite")
}

#[test]
fn test_bare_reference_stays_bare() {
    let source = "[TemplatedTestClass]\nclass C { }\n";
    let expected = "[TestClass]\nclass C { }\n";
    assert_eq!(rewrite_with(&qualified_resolver(), source), expected);
}

#[test]
fn test_qualified_reference_takes_the_full_resolved_name() {
    let source = "[Templates.TemplatedTestClass]\nclass C { }\n";
    let expected = "[Microsoft.VisualStudio.TestTools.UnitTesting.TestClass]\nclass C { }\n";
    assert_eq!(rewrite_with(&qualified_resolver(), source), expected);
}

#[test]
fn test_deeply_qualified_reference_is_not_templated() {
    let source = "[My.Deep.TemplatedTestClass]\nclass C { }\n";
    assert_eq!(rewrite_with(&qualified_resolver(), source), source);
}

#[test]
fn test_unknown_attributes_pass_through() {
    let source = "[Serializable]\n[TestClass]\nclass C { }\n";
    assert_eq!(rewrite_with(&qualified_resolver(), source), source);
}

#[test]
fn test_arguments_and_bracket_trivia_are_preserved() {
    let source = "[ TemplatedTestMethod(\"checks the name\", Timeout = 100) ]\nclass C { }\n";
    let expected = "[ TestMethod(\"checks the name\", Timeout = 100) ]\nclass C { }\n";
    assert_eq!(rewrite_with(&qualified_resolver(), source), expected);
}

#[test]
fn test_method_and_constructor_attributes_are_translated() {
    let source = r#"[TemplatedTestClass]
class PersonTests_Template
{
    [TemplatedTestMethod]
    public PersonTests_Template() { }

    [TemplatedTestMethod]
    public void M()
    {
        F();
    }
}
"#;

    let resolver = TableResolver::mstest();
    let generated = rewrite_with(&resolver, source);

    assert!(generated.contains("[TestClass]\nclass PersonTests\n"));
    assert!(generated.contains("[TestMethod]\n    public PersonTests() { }"));
    assert!(generated.contains("[TestMethod]\n    public void M()"));
    assert!(!generated.contains("Templated"));
}
