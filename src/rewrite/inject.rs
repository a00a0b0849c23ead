//! Failure block synthesis
//!
//! When the statement transformer fails for one method body, the body is
//! replaced by a synthesized block: a marker comment, the original statements
//! commented out line-by-line, and a single throw of the attribute's
//! associated exception type. Everything here is a pure string operation over
//! the original statements' text blobs.

use crate::ast::{Block, Statement};
use crate::consts;

/// Build the replacement block for a method whose body failed to translate.
///
/// `decl_indent` is the indentation of the line the method declaration starts
/// on; it positions the closing brace when the original block was written on
/// a single line.
pub(crate) fn synthesize_failure_block(
    original: &Block,
    exception_type: &str,
    message: &str,
    decl_indent: &str,
) -> Block {
    let newline = if block_text(original).contains("\r\n") { "\r\n" } else { "\n" };
    let indent = statement_indent(original);

    let mut leading = String::new();
    leading.push_str(newline);
    leading.push_str(&indent);
    leading.push_str(consts::FAILED_TO_COMPILE_COMMENT);
    leading.push_str(newline);

    for (index, statement) in original.statements.iter().enumerate() {
        if index > 0 {
            for blank in blank_lines(&statement.leading) {
                leading.push_str(blank);
                leading.push_str(newline);
            }
        }
        for line in commented_lines(statement, &indent) {
            leading.push_str(&line);
            leading.push_str(newline);
        }
    }
    leading.push_str(&indent);

    // The throw carries the exception's simple name; the surrounding test
    // class is expected to import its namespace
    let exception = exception_type.rsplit('.').next().unwrap_or(exception_type);
    let text = format!("throw new {}({});", exception, string_literal(message));

    let close = if original.close.contains('\n') {
        original.close.clone()
    } else {
        format!("{}{}{}", newline, decl_indent, "}")
    };

    Block {
        open: "{".to_string(),
        statements: vec![Statement {
            leading,
            text,
            span: original.span,
        }],
        close,
        span: original.span,
    }
}

fn block_text(block: &Block) -> String {
    block.to_string()
}

/// Indentation for synthesized statement lines: the first original
/// statement's own line indentation when the block gives line structure,
/// else a fixed default
fn statement_indent(block: &Block) -> String {
    for statement in &block.statements {
        if statement.leading.contains('\n') {
            return statement.line_indent().to_string();
        }
    }
    consts::DEFAULT_STATEMENT_INDENT.to_string()
}

/// Whitespace-only lines between the previous statement and this one,
/// reproduced verbatim (uncommented) in the synthesized block
fn blank_lines(leading: &str) -> Vec<&str> {
    let segments: Vec<&str> = leading.split('\n').collect();
    if segments.len() < 3 {
        return Vec::new();
    }
    segments[1..segments.len() - 1]
        .iter()
        .map(|s| s.trim_end_matches('\r'))
        .filter(|s| s.chars().all(|c| c == ' ' || c == '\t'))
        .collect()
}

/// The statement's exact text, line by line, each prefixed with `// ` at the
/// synthesized indentation. Continuation lines keep their indentation
/// relative to the statement's first line.
fn commented_lines(statement: &Statement, indent: &str) -> Vec<String> {
    let base = statement.line_indent();
    statement
        .text
        .split('\n')
        .enumerate()
        .map(|(index, raw)| {
            let line = raw.trim_end_matches('\r');
            let rest = if index == 0 { line } else { strip_base_indent(line, base) };
            format!("{}// {}", indent, rest)
        })
        .collect()
}

/// Strip the statement's base indentation from a continuation line, keeping
/// whatever indentation goes deeper
fn strip_base_indent<'a>(line: &'a str, base: &str) -> &'a str {
    let mut chars = line.char_indices();
    let mut base_chars = base.chars();
    loop {
        match (chars.clone().next(), base_chars.next()) {
            (Some((_, c)), Some(b)) if c == b && (c == ' ' || c == '\t') => {
                chars.next();
            }
            (Some((pos, _)), _) => return &line[pos..],
            (None, _) => return "",
        }
    }
}

/// Render a message as a source string literal
fn string_literal(message: &str) -> String {
    let mut out = String::with_capacity(message.len() + 2);
    out.push('"');
    for ch in message.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
