use std::fs;
use std::path::PathBuf;

use ttc::{rewrite_file, Config, IdentityTransformer, TableResolver};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ttc-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

#[test]
fn test_rewrite_file_writes_generated_source() {
    let dir = scratch_dir("generate");
    let input = dir.join("PersonTests.cs");
    fs::write(
        &input,
        "[TemplatedTestClass]\nclass PersonTests_Template\n{\n    public PersonTests_Template() { }\n}\n",
    )
    .expect("Failed to write template");

    let resolver = TableResolver::mstest();
    let generated = rewrite_file(&input, None, &resolver, &IdentityTransformer, &Config::default())
        .expect("Failed to rewrite file");

    assert_eq!(generated.file_name().and_then(|n| n.to_str()), Some("PersonTests.g.cs"));
    let text = fs::read_to_string(&generated).expect("Failed to read generated file");
    assert!(text.contains("[TestClass]"));
    assert!(text.contains("class PersonTests\n"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_rewrite_file_honors_output_dir() {
    let dir = scratch_dir("outdir");
    let out = dir.join("generated");
    fs::create_dir_all(&out).expect("Failed to create output dir");
    let input = dir.join("StackTests.cs");
    fs::write(&input, "class StackTests_Template { }\n").expect("Failed to write template");

    let resolver = TableResolver::mstest();
    let generated = rewrite_file(
        &input,
        Some(&out),
        &resolver,
        &IdentityTransformer,
        &Config::default(),
    )
    .expect("Failed to rewrite file");

    assert_eq!(generated, out.join("StackTests.g.cs"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_generated_files_are_rejected_as_input() {
    let dir = scratch_dir("reject");
    let input = dir.join("PersonTests.g.cs");
    fs::write(&input, "class PersonTests { }\n").expect("Failed to write file");

    let resolver = TableResolver::mstest();
    let result = rewrite_file(&input, None, &resolver, &IdentityTransformer, &Config::default());
    assert!(result.is_err());

    fs::remove_dir_all(&dir).ok();
}
