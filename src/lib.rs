//! Test Template Compiler (ttc)
//!
//! Rewrites test templates - source files containing placeholder names and
//! marker annotations that reference not-yet-written student code - into
//! compilable test source.
//!
//! ## Architecture
//!
//! - **parser**: Lexical analysis and parsing of template source into a
//!   lossless template tree
//! - **rewrite**: The rewriting engine (name normalization, attribute
//!   translation, method-body rewriting with failure isolation)
//! - **ast**: Template tree representation preserving exact source text
//! - **bin**: Command-line interface
//!
//! ## Rewrite Flow
//!
//! ```text
//! Template Source → Parser → Template Tree → Rewriting Engine → Generated Source
//!                                                ↓
//!                         DescriptionResolver + StatementTransformer
//! ```

pub mod ast;
pub mod parser;
pub mod rewrite;
pub mod error;
pub mod config;
pub mod consts;

pub use config::Config;
pub use error::{Error, Result};
pub use rewrite::{
    DescriptionResolver, IdentityTransformer, StatementTransformer, TableResolver,
    TemplateRewriter, TranslationFailure,
};

use std::path::{Path, PathBuf};

/// Rewrite template source in memory
///
/// Template Source → Parser → Template Tree → Rewriting Engine → Generated Source
pub fn rewrite(
    source: &str,
    resolver: &dyn DescriptionResolver,
    transformer: &dyn StatementTransformer,
    config: &Config,
) -> Result<String> {
    if config.verbose {
        eprintln!("📝 TTC: Parsing template source");
    }
    let unit = parser::parse_template(source)?;

    if config.verbose {
        eprintln!("🔧 TTC: Rewriting template tree");
    }
    let rewriter = TemplateRewriter::new(resolver, transformer)
        .with_marker_suffix(&config.marker_suffix);
    let rewritten = rewriter.rewrite_unit(&unit)?;

    if config.verbose {
        eprintln!("✅ TTC: Rewrite complete");
    }
    Ok(rewritten.to_source())
}

/// Rewrite a template file, writing the generated source next to it (or into
/// `output_dir`). Returns the path of the generated file.
pub fn rewrite_file(
    input_path: &Path,
    output_dir: Option<&Path>,
    resolver: &dyn DescriptionResolver,
    transformer: &dyn StatementTransformer,
    config: &Config,
) -> Result<PathBuf> {
    let file_name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::config_error(format!("invalid input path {}", input_path.display())))?;

    // Output of an earlier run must never be rewritten again
    if file_name.ends_with(&config.generated_suffix) {
        return Err(Error::config_error(format!(
            "{} is a generated file and cannot be used as a template",
            input_path.display()
        )));
    }

    if config.verbose {
        eprintln!("📂 TTC: Rewriting template {}", input_path.display());
    }

    let source = std::fs::read_to_string(input_path)?;
    let generated = rewrite(&source, resolver, transformer, config)?;

    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let out_name = format!("{}{}", stem, config.generated_suffix);
    let out_path = match output_dir {
        Some(dir) => dir.join(out_name),
        None => input_path.with_file_name(out_name),
    };

    std::fs::write(&out_path, generated)?;

    if config.verbose {
        eprintln!("✅ TTC: Wrote {}", out_path.display());
    }
    Ok(out_path)
}

/// Rewrite multiple template files
pub fn rewrite_files(
    input_paths: &[PathBuf],
    output_dir: Option<&Path>,
    resolver: &dyn DescriptionResolver,
    transformer: &dyn StatementTransformer,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    let mut generated = Vec::with_capacity(input_paths.len());
    for (index, input_path) in input_paths.iter().enumerate() {
        if config.verbose {
            eprintln!(
                "🔄 TTC: [{}/{}] {}",
                index + 1,
                input_paths.len(),
                input_path.display()
            );
        }
        generated.push(rewrite_file(input_path, output_dir, resolver, transformer, config)?);
    }
    Ok(generated)
}
