// Global safety caps to prevent pathological or infinite loops

// Parser: maximum iterations for any guarded loop or overall passes
pub const PARSER_MAX_LOOP_ITERS: usize = 200_000;

// Identifier suffix marking a type or constructor as template-only
pub const MARKER_SUFFIX: &str = "_Template";

// Suffix carried by generated output files; files ending in this suffix
// are never used as rewrite input
pub const GENERATED_SUFFIX: &str = ".g.cs";

// First line of every synthesized failure block
pub const FAILED_TO_COMPILE_COMMENT: &str = "// == Failed To Compile ==";

// Fallback statement indentation when the original block gives no line structure
pub const DEFAULT_STATEMENT_INDENT: &str = "    ";
