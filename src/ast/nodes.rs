use super::{HasSpan, Span};
use std::fmt;

/// A whole template source unit.
///
/// Printing a compilation unit concatenates the text pieces of every node in
/// document order, which reproduces the original source exactly for any part
/// that was not rewritten.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub items: Vec<Item>,
    /// Trivia after the last item (or the whole file if it has no items)
    pub trailing: String,
    pub span: Span,
}

impl CompilationUnit {
    /// Render the unit back to source text
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

impl HasSpan for CompilationUnit {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            write!(f, "{}", item)?;
        }
        write!(f, "{}", self.trailing)
    }
}

/// Unit-level and namespace-level items
#[derive(Debug, Clone)]
pub enum Item {
    Import(ImportDecl),
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

impl HasSpan for Item {
    fn span(&self) -> Span {
        match self {
            Item::Import(i) => i.span,
            Item::Namespace(n) => n.span,
            Item::Type(t) => t.span,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Import(i) => write!(f, "{}", i),
            Item::Namespace(n) => write!(f, "{}", n),
            Item::Type(t) => write!(f, "{}", t),
        }
    }
}

/// `using <name>;` directive.
///
/// Only `name` is ever rewritten; `head` and `tail` keep the directive's
/// keyword and punctuation trivia byte-for-byte.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    /// Leading trivia + `using` keyword + trivia before the name
    pub head: String,
    /// The namespace name exactly as written
    pub name: String,
    /// Trivia + `;`
    pub tail: String,
    pub span: Span,
}

impl HasSpan for ImportDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.head, self.name, self.tail)
    }
}

/// `namespace <name> { ... }` container. The header is opaque text; only the
/// items inside are subject to rewriting.
#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    /// Leading trivia + `namespace` keyword + name + trivia + `{`
    pub head: String,
    pub items: Vec<Item>,
    /// Trivia + `}`
    pub close: String,
    pub span: Span,
}

impl HasSpan for NamespaceDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for NamespaceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for item in &self.items {
            write!(f, "{}", item)?;
        }
        write!(f, "{}", self.close)
    }
}

/// A class declaration
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Attribute lists preceding the declaration, each with its own trivia
    pub attributes: Vec<Attribute>,
    /// Trivia + modifiers + `class` keyword + trivia, up to the identifier
    pub head: String,
    /// The type identifier
    pub name: String,
    /// Everything between the identifier and the opening `{`, inclusive
    /// (generic parameters, base list)
    pub body_head: String,
    pub members: Vec<Member>,
    /// Trivia + `}`
    pub close: String,
    pub span: Span,
}

impl HasSpan for TypeDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.attributes {
            write!(f, "{}", attr)?;
        }
        write!(f, "{}{}{}", self.head, self.name, self.body_head)?;
        for member in &self.members {
            write!(f, "{}", member)?;
        }
        write!(f, "{}", self.close)
    }
}

/// Class members. Anything the parser does not need to understand (fields,
/// properties, expression-bodied or abstract members) is kept as raw text and
/// always passes through unchanged.
#[derive(Debug, Clone)]
pub enum Member {
    Constructor(ConstructorDecl),
    Method(MethodDecl),
    Type(TypeDecl),
    Raw(RawMember),
}

impl HasSpan for Member {
    fn span(&self) -> Span {
        match self {
            Member::Constructor(c) => c.span,
            Member::Method(m) => m.span,
            Member::Type(t) => t.span,
            Member::Raw(r) => r.span,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Constructor(c) => write!(f, "{}", c),
            Member::Method(m) => write!(f, "{}", m),
            Member::Type(t) => write!(f, "{}", t),
            Member::Raw(r) => write!(f, "{}", r.text),
        }
    }
}

/// An unparsed member, preserved verbatim (leading trivia included)
#[derive(Debug, Clone)]
pub struct RawMember {
    pub text: String,
    pub span: Span,
}

/// A constructor declaration. Only the identifier can be rewritten; the
/// parameter list and body are opaque text.
#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub attributes: Vec<Attribute>,
    /// Trivia + modifiers, up to the identifier
    pub head: String,
    pub name: String,
    /// `(` parameters `)` + initializer + body, verbatim
    pub tail: String,
    pub span: Span,
}

impl HasSpan for ConstructorDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ConstructorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.attributes {
            write!(f, "{}", attr)?;
        }
        write!(f, "{}{}{}", self.head, self.name, self.tail)
    }
}

/// A block-bodied method declaration
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub attributes: Vec<Attribute>,
    /// Trivia + modifiers + return type + name + parameters, up to the block
    pub head: String,
    pub body: Block,
    pub span: Span,
}

impl MethodDecl {
    /// Indentation of the line the declaration starts on, used when a
    /// replacement body has to be formatted from scratch.
    pub fn line_indent(&self) -> &str {
        let candidates = std::iter::once(self.head.as_str())
            .chain(self.attributes.first().map(|a| a.leading.as_str()));
        for text in candidates {
            if let Some(pos) = text.rfind('\n') {
                let rest = &text[pos + 1..];
                if rest.chars().all(|c| c == ' ' || c == '\t') {
                    return rest;
                }
            }
        }
        ""
    }
}

impl HasSpan for MethodDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.attributes {
            write!(f, "{}", attr)?;
        }
        write!(f, "{}{}", self.head, self.body)
    }
}

/// An attribute annotation `[Name]` / `[Ns.Name(args)]`.
///
/// Only `name` is ever rewritten; argument text and bracket trivia are kept
/// exactly as written.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Trivia before the `[`
    pub leading: String,
    /// `[` + trivia
    pub open: String,
    /// The attribute type reference exactly as written
    pub name: String,
    /// `(` arguments `)` verbatim, or empty
    pub args: String,
    /// Trivia + `]`
    pub close: String,
    pub span: Span,
}

impl HasSpan for Attribute {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}{}", self.leading, self.open, self.name, self.args, self.close)
    }
}

/// A `{ ... }` method body with its top-level statements
#[derive(Debug, Clone)]
pub struct Block {
    /// The opening `{`
    pub open: String,
    pub statements: Vec<Statement>,
    /// Trivia + `}`
    pub close: String,
    pub span: Span,
}

impl HasSpan for Block {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.open)?;
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        write!(f, "{}", self.close)
    }
}

/// One top-level statement, kept as an opaque text blob with the trivia that
/// preceded it
#[derive(Debug, Clone)]
pub struct Statement {
    /// Trivia between the previous statement (or `{`) and the first token
    pub leading: String,
    /// Exact statement text, first token through terminator
    pub text: String,
    pub span: Span,
}

impl Statement {
    /// Indentation of the line the statement starts on (empty when the
    /// statement does not start a line)
    pub fn line_indent(&self) -> &str {
        match self.leading.rfind('\n') {
            Some(pos) => {
                let rest = &self.leading[pos + 1..];
                if rest.chars().all(|c| c == ' ' || c == '\t') {
                    rest
                } else {
                    ""
                }
            }
            None => "",
        }
    }
}

impl HasSpan for Statement {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.leading, self.text)
    }
}
