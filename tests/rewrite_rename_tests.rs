use ttc::{rewrite, Config, IdentityTransformer, TableResolver};

fn rewrite_mstest(source: &str) -> String {
    let resolver = TableResolver::mstest();
    rewrite(source, &resolver, &IdentityTransformer, &Config::default())
        .expect("Failed to rewrite")
}

#[test]
fn test_type_and_constructor_are_renamed_together() {
    let source = r#"public class PersonTests_Template
{
    public PersonTests_Template() : base()
    {
        Setup();
    }

    public PersonTests_Template(int seed) { }
}
"#;

    let expected = r#"public class PersonTests
{
    public PersonTests() : base()
    {
        Setup();
    }

    public PersonTests(int seed) { }
}
"#;

    assert_eq!(rewrite_mstest(source), expected);
}

#[test]
fn test_type_without_marker_suffix_is_untouched() {
    let source = r#"public class PersonTests
{
    public PersonTests() { }
}
"#;

    assert_eq!(rewrite_mstest(source), source);
}

#[test]
fn test_bare_marker_suffix_is_not_a_rename() {
    // stripping would leave an empty identifier
    let source = "class _Template { public _Template() { } }\n";
    assert_eq!(rewrite_mstest(source), source);
}

#[test]
fn test_suffix_in_the_middle_of_a_name_is_untouched() {
    let source = "class Person_TemplateTests { }\n";
    assert_eq!(rewrite_mstest(source), source);
}

#[test]
fn test_nested_type_renames_use_the_nearest_enclosing_type() {
    let source = r#"class Outer_Template
{
    public Outer_Template() { }

    class Inner_Template
    {
        public Inner_Template() { }
    }

    class Plain
    {
        public Plain() { }
    }
}
"#;

    let expected = r#"class Outer
{
    public Outer() { }

    class Inner
    {
        public Inner() { }
    }

    class Plain
    {
        public Plain() { }
    }
}
"#;

    assert_eq!(rewrite_mstest(source), expected);
}

#[test]
fn test_constructor_with_foreign_name_is_not_renamed() {
    // a body-less scan can misfile declarations; only an exact match on the
    // enclosing type's original name is a constructor rename
    let source = r#"class Runner_Template
{
    public Runner_Template() { }

    public Widget_Template(int x) { }
}
"#;

    let generated = rewrite_mstest(source);
    assert!(generated.contains("class Runner\n"));
    assert!(generated.contains("public Runner() { }"));
    assert!(generated.contains("public Widget_Template(int x) { }"));
}

#[test]
fn test_custom_marker_suffix() {
    let source = r#"class PersonTestsTemplate
{
    public PersonTestsTemplate() { }
}
"#;

    let resolver = TableResolver::mstest();
    let config = Config::default().with_marker_suffix("Template");
    let generated = rewrite(source, &resolver, &IdentityTransformer, &config)
        .expect("Failed to rewrite");

    assert!(generated.contains("class PersonTests\n"));
    assert!(generated.contains("public PersonTests() { }"));
}
