use ttc::{rewrite, Config, IdentityTransformer, TableResolver};

fn tools_resolver() -> TableResolver {
    let mut resolver = TableResolver::mstest();
    resolver.add_namespace(
        "TestTools.Templates",
        "Microsoft.VisualStudio.TestTools.UnitTesting",
    );
    resolver
}

#[test]
fn test_registered_namespace_is_replaced() {
    let source = "using TestTools.Templates;\n\nclass C { }\n";
    let expected = "using Microsoft.VisualStudio.TestTools.UnitTesting;\n\nclass C { }\n";

    let generated = rewrite(source, &tools_resolver(), &IdentityTransformer, &Config::default())
        .expect("Failed to rewrite");
    assert_eq!(generated, expected);
}

#[test]
fn test_unregistered_namespace_passes_through() {
    let source = "using System;\nusing System.Linq;\n\nclass C { }\n";

    let generated = rewrite(source, &tools_resolver(), &IdentityTransformer, &Config::default())
        .expect("Failed to rewrite");
    assert_eq!(generated, source);
}

#[test]
fn test_directive_trivia_survives_replacement() {
    let source = "// tooling import\nusing   TestTools.Templates ;  // keep\nclass C { }\n";
    let expected =
        "// tooling import\nusing   Microsoft.VisualStudio.TestTools.UnitTesting ;  // keep\nclass C { }\n";

    let generated = rewrite(source, &tools_resolver(), &IdentityTransformer, &Config::default())
        .expect("Failed to rewrite");
    assert_eq!(generated, expected);
}

#[test]
fn test_imports_inside_namespace_are_replaced() {
    let source = r#"namespace Company.Tests
{
    using TestTools.Templates;

    class C { }
}
"#;

    let generated = rewrite(source, &tools_resolver(), &IdentityTransformer, &Config::default())
        .expect("Failed to rewrite");
    assert!(generated.contains("using Microsoft.VisualStudio.TestTools.UnitTesting;"));
    assert!(!generated.contains("TestTools.Templates"));
}
