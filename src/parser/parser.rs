//! Parser implementation for test templates
//!
//! A recursive descent parser over the token stream. It recognizes just
//! enough structure for the rewriting engine (imports, namespaces, classes,
//! constructors, block-bodied methods, attributes, top-level statements) and
//! keeps every other region as opaque text, so untouched source is
//! reproduced byte-for-byte.

use super::{error::{ParseError, ParseResult}, lexer::{Lexer, LexicalToken, Token}};
use crate::ast::*;
use crate::consts;
use crate::error::Result;

/// What a member scan decided about the upcoming class member
enum MemberShape {
    /// Block-bodied callable; `name_index` is the token index of its
    /// identifier, `is_constructor` when the identifier is the only
    /// significant token before the parameter list
    Callable { name_index: usize, is_constructor: bool },
    /// Anything else (field, property, abstract or expression-bodied member),
    /// preserved as raw text
    Plain,
}

/// Parser for template source
pub struct Parser {
    source: String,
    tokens: Vec<LexicalToken>,
    current: usize,
    iters: usize,
    eof_location: Location,
}

impl Parser {
    /// Create a new parser from source code
    pub fn new(source: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(source)
            .tokenize()
            .map_err(|message| ParseError::lexical_error(&message, Location::start()))?;

        let line = source.bytes().filter(|b| *b == b'\n').count() + 1;
        let column = source
            .rfind('\n')
            .map(|pos| source[pos + 1..].chars().count() + 1)
            .unwrap_or_else(|| source.chars().count() + 1);
        let eof_location = Location::new(line, column, source.len());

        Ok(Self {
            source: source.to_string(),
            tokens,
            current: 0,
            iters: 0,
            eof_location,
        })
    }

    /// Parse the source into a compilation unit
    pub fn parse(mut self) -> ParseResult<CompilationUnit> {
        let start = Location::start();
        let (items, trailing) = self.parse_items(true)?;
        Ok(CompilationUnit {
            items,
            trailing,
            span: Span::new(start, self.eof_location),
        })
    }

    // --- cursor helpers ---

    fn gas(&mut self) -> ParseResult<()> {
        self.iters += 1;
        if self.iters > consts::PARSER_MAX_LOOP_ITERS {
            return Err(ParseError::invalid_syntax(
                "parser iteration limit exceeded",
                self.current_location(),
            ));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&LexicalToken> {
        self.tokens.get(self.current)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|t| &t.token)
    }

    /// Next non-trivia token without consuming anything
    fn peek_significant(&self) -> Option<&LexicalToken> {
        self.tokens[self.current..].iter().find(|t| !t.token.is_trivia())
    }

    fn bump(&mut self) -> ParseResult<LexicalToken> {
        match self.tokens.get(self.current) {
            Some(t) => {
                let t = t.clone();
                self.current += 1;
                Ok(t)
            }
            None => Err(ParseError::unexpected_end_of_input("a token", self.eof_location)),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> ParseResult<LexicalToken> {
        match self.tokens.get(self.current) {
            Some(t) if t.is(&token) => {
                let t = t.clone();
                self.current += 1;
                Ok(t)
            }
            Some(t) => Err(ParseError::unexpected_token(expected, &t.lexeme, t.location)),
            None => Err(ParseError::unexpected_end_of_input(expected, self.eof_location)),
        }
    }

    /// Consume trivia tokens and return their concatenated text
    fn take_trivia(&mut self) -> String {
        let mut text = String::new();
        while let Some(t) = self.peek() {
            if !t.token.is_trivia() {
                break;
            }
            text.push_str(&t.lexeme);
            self.current += 1;
        }
        text
    }

    /// Consume trivia tokens without collecting text (the surrounding slice
    /// already covers them)
    fn skip_trivia(&mut self) {
        while let Some(t) = self.peek() {
            if !t.token.is_trivia() {
                break;
            }
            self.current += 1;
        }
    }

    /// Byte offset of the next unconsumed token (or end of file)
    fn offset(&self) -> usize {
        self.peek().map(|t| t.start()).unwrap_or(self.source.len())
    }

    /// Byte offset just past the last consumed token
    fn prev_end(&self) -> usize {
        self.tokens[..self.current].last().map(|t| t.end()).unwrap_or(0)
    }

    fn current_location(&self) -> Location {
        self.peek().map(|t| t.location).unwrap_or(self.eof_location)
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }

    // --- items ---

    fn parse_items(&mut self, top_level: bool) -> ParseResult<(Vec<Item>, String)> {
        let mut items = Vec::new();
        loop {
            self.gas()?;
            let leading = self.take_trivia();
            match self.peek_token() {
                None => {
                    if top_level {
                        return Ok((items, leading));
                    }
                    return Err(ParseError::unexpected_end_of_input("'}'", self.eof_location));
                }
                Some(Token::RightBrace) if !top_level => {
                    let brace = self.bump()?;
                    return Ok((items, format!("{}{}", leading, brace.lexeme)));
                }
                Some(Token::Using) => {
                    items.push(Item::Import(self.parse_import(leading)?));
                }
                Some(Token::Namespace) => {
                    items.push(Item::Namespace(self.parse_namespace(leading)?));
                }
                Some(Token::LeftBracket) | Some(Token::Class) => {
                    items.push(Item::Type(self.parse_type_decl(leading)?));
                }
                Some(t) if t.is_modifier() => {
                    items.push(Item::Type(self.parse_type_decl(leading)?));
                }
                Some(_) => {
                    let t = self.bump()?;
                    return Err(ParseError::unexpected_token("a declaration", &t.lexeme, t.location));
                }
            }
        }
    }

    fn parse_import(&mut self, leading: String) -> ParseResult<ImportDecl> {
        let using = self.expect(Token::Using, "'using'")?;
        let mut head = leading;
        head.push_str(&using.lexeme);
        head.push_str(&self.take_trivia());
        let name = self.parse_dotted_name("namespace name")?;
        // Alias directives (`using A = Ns.Type;`) keep their remainder in the
        // tail; the resolver will simply not recognize the alias name
        let mut tail = String::new();
        loop {
            self.gas()?;
            match self.peek_token() {
                Some(Token::Semicolon) => {
                    tail.push_str(&self.bump()?.lexeme);
                    break;
                }
                Some(_) => {
                    tail.push_str(&self.bump()?.lexeme);
                }
                None => {
                    return Err(ParseError::unexpected_end_of_input("';'", self.eof_location));
                }
            }
        }
        let span = Span::new(using.location, self.current_location());
        Ok(ImportDecl { head, name, tail, span })
    }

    fn parse_namespace(&mut self, leading: String) -> ParseResult<NamespaceDecl> {
        let ns = self.expect(Token::Namespace, "'namespace'")?;
        let head_start = ns.start();
        self.skip_trivia();
        self.parse_dotted_name("namespace name")?;
        self.skip_trivia();
        let lbrace = self.expect(Token::LeftBrace, "'{'")?;
        let head = format!("{}{}", leading, self.slice(head_start, lbrace.end()));
        let (items, close) = self.parse_items(false)?;
        let span = Span::new(ns.location, self.current_location());
        Ok(NamespaceDecl { head, items, close, span })
    }

    /// Parse a dotted identifier chain (`A.B.C`) with no interior trivia
    fn parse_dotted_name(&mut self, expected: &str) -> ParseResult<String> {
        let first = self.expect(Token::Identifier, expected)?;
        let mut name = first.lexeme;
        loop {
            self.gas()?;
            if matches!(self.peek_token(), Some(Token::Dot)) {
                self.bump()?;
                let id = self.expect(Token::Identifier, "identifier")?;
                name.push('.');
                name.push_str(&id.lexeme);
            } else {
                break;
            }
        }
        Ok(name)
    }

    // --- type declarations ---

    fn parse_type_decl(&mut self, leading: String) -> ParseResult<TypeDecl> {
        let start = self.current_location();
        let mut attributes = Vec::new();
        let mut lead = leading;
        while matches!(self.peek_token(), Some(Token::LeftBracket)) {
            self.gas()?;
            attributes.push(self.parse_attribute(lead)?);
            lead = self.take_trivia();
        }

        let head_start = self.offset();
        loop {
            self.gas()?;
            self.skip_trivia();
            match self.peek_token() {
                Some(t) if t.is_modifier() => {
                    self.bump()?;
                }
                Some(Token::Class) => {
                    self.bump()?;
                    break;
                }
                Some(_) => {
                    let t = self.bump()?;
                    return Err(ParseError::unexpected_token("'class'", &t.lexeme, t.location));
                }
                None => {
                    return Err(ParseError::unexpected_end_of_input("'class'", self.eof_location));
                }
            }
        }
        self.skip_trivia();
        let name_tok = self.expect(Token::Identifier, "type name")?;
        let head = format!("{}{}", lead, self.slice(head_start, name_tok.start()));
        let name = name_tok.lexeme.clone();

        // Generic parameters, base list and constraints up to the body
        let body_start = name_tok.end();
        let lbrace = loop {
            self.gas()?;
            match self.peek_token() {
                Some(Token::LeftBrace) => break self.bump()?,
                Some(Token::Semicolon) => {
                    let t = self.bump()?;
                    return Err(ParseError::invalid_syntax(
                        "type declaration without a body",
                        t.location,
                    ));
                }
                Some(_) => {
                    self.bump()?;
                }
                None => {
                    return Err(ParseError::unexpected_end_of_input("'{'", self.eof_location));
                }
            }
        };
        let body_head = self.slice(body_start, lbrace.end()).to_string();

        let mut members = Vec::new();
        let close;
        loop {
            self.gas()?;
            let member_lead = self.take_trivia();
            match self.peek_token() {
                Some(Token::RightBrace) => {
                    let brace = self.bump()?;
                    close = format!("{}{}", member_lead, brace.lexeme);
                    break;
                }
                None => {
                    return Err(ParseError::unexpected_end_of_input("'}'", self.eof_location));
                }
                Some(_) => {
                    members.push(self.parse_member(member_lead)?);
                }
            }
        }

        let span = Span::new(start, self.current_location());
        Ok(TypeDecl { attributes, head, name, body_head, members, close, span })
    }

    // --- members ---

    fn parse_member(&mut self, leading: String) -> ParseResult<Member> {
        if self.lookahead_is_nested_type() {
            return Ok(Member::Type(self.parse_type_decl(leading)?));
        }

        let start = self.current_location();
        let mut attributes = Vec::new();
        let mut lead = leading;
        while matches!(self.peek_token(), Some(Token::LeftBracket)) {
            self.gas()?;
            attributes.push(self.parse_attribute(lead)?);
            lead = self.take_trivia();
        }

        let head_start = self.offset();
        loop {
            self.gas()?;
            match self.peek_token() {
                Some(t) if t.is_modifier() => {
                    self.bump()?;
                    self.skip_trivia();
                }
                _ => break,
            }
        }

        match self.scan_member_shape()? {
            MemberShape::Callable { name_index, is_constructor: true } => {
                while self.current < name_index {
                    self.bump()?;
                }
                let name_tok = self.expect(Token::Identifier, "constructor name")?;
                let head = format!("{}{}", lead, self.slice(head_start, name_tok.start()));
                let tail_start = name_tok.end();
                self.consume_to_block_open()?;
                self.consume_balanced(Token::LeftBrace, Token::RightBrace)?;
                let tail = self.slice(tail_start, self.prev_end()).to_string();
                let span = Span::new(start, self.current_location());
                Ok(Member::Constructor(ConstructorDecl {
                    attributes,
                    head,
                    name: name_tok.lexeme,
                    tail,
                    span,
                }))
            }
            MemberShape::Callable { name_index, is_constructor: false } => {
                while self.current <= name_index {
                    self.bump()?;
                }
                let lbrace_start = self.consume_to_block_open()?;
                let head = format!("{}{}", lead, self.slice(head_start, lbrace_start));
                let body = self.parse_block()?;
                let span = Span::new(start, self.current_location());
                Ok(Member::Method(MethodDecl { attributes, head, body, span }))
            }
            MemberShape::Plain => {
                self.consume_plain_member()?;
                let mut text = String::new();
                for attr in &attributes {
                    text.push_str(&attr.to_string());
                }
                text.push_str(&lead);
                text.push_str(self.slice(head_start, self.prev_end()));
                let span = Span::new(start, self.current_location());
                Ok(Member::Raw(RawMember { text, span }))
            }
        }
    }

    /// Does the member at the cursor start a nested type declaration?
    fn lookahead_is_nested_type(&self) -> bool {
        let mut idx = self.current;
        loop {
            // Skip an attribute list
            while matches!(self.tokens.get(idx).map(|t| &t.token), Some(t) if t.is_trivia()) {
                idx += 1;
            }
            if !matches!(self.tokens.get(idx).map(|t| &t.token), Some(Token::LeftBracket)) {
                break;
            }
            let mut depth = 0usize;
            while let Some(t) = self.tokens.get(idx) {
                idx += 1;
                match t.token {
                    Token::LeftBracket => depth += 1,
                    Token::RightBracket => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
        loop {
            match self.tokens.get(idx).map(|t| &t.token) {
                Some(t) if t.is_trivia() || t.is_modifier() => idx += 1,
                Some(Token::Class) => return true,
                _ => return false,
            }
        }
    }

    /// Classify the member at the cursor without consuming anything.
    ///
    /// Scans forward at bracket depth zero for the first decision token:
    /// `(` makes a callable (provided a block body follows), while `;`, `=`
    /// or `{` make a plain member.
    fn scan_member_shape(&self) -> ParseResult<MemberShape> {
        let mut idx = self.current;
        let mut depth = 0usize;
        let mut last_ident = None;
        let mut significant = 0usize;
        let mut decision: Option<(usize, bool)> = None;

        while let Some(t) = self.tokens.get(idx) {
            if t.token.is_trivia() {
                idx += 1;
                continue;
            }
            match &t.token {
                Token::LeftParen if depth == 0 && decision.is_none() => {
                    let name_index = match last_ident {
                        Some(i) => i,
                        None => return Ok(MemberShape::Plain),
                    };
                    decision = Some((name_index, significant == 1));
                    depth += 1;
                }
                Token::Semicolon if depth == 0 => return Ok(MemberShape::Plain),
                Token::Operator if depth == 0 && t.lexeme == "=" => {
                    return Ok(MemberShape::Plain);
                }
                Token::LeftBrace if depth == 0 => {
                    return match decision {
                        Some((name_index, is_constructor)) => {
                            Ok(MemberShape::Callable { name_index, is_constructor })
                        }
                        None => Ok(MemberShape::Plain),
                    };
                }
                Token::LeftParen | Token::LeftBracket | Token::LeftBrace => depth += 1,
                Token::RightParen | Token::RightBracket | Token::RightBrace => {
                    depth = depth.saturating_sub(1);
                }
                Token::Identifier if decision.is_none() => {
                    if depth == 0 {
                        last_ident = Some(idx);
                        significant += 1;
                    }
                }
                _ => {
                    if depth == 0 && decision.is_none() {
                        significant += 1;
                    }
                }
            }
            idx += 1;
        }
        Err(ParseError::unexpected_end_of_input("a member", self.eof_location))
    }

    /// Consume tokens until the `{` opening a body at depth zero; the brace
    /// itself is not consumed. Returns its byte offset.
    fn consume_to_block_open(&mut self) -> ParseResult<usize> {
        let mut depth = 0usize;
        loop {
            self.gas()?;
            match self.peek_token() {
                Some(Token::LeftBrace) if depth == 0 => return Ok(self.offset()),
                Some(Token::LeftParen) | Some(Token::LeftBracket) | Some(Token::LeftBrace) => {
                    depth += 1;
                    self.bump()?;
                }
                Some(Token::RightParen) | Some(Token::RightBracket) | Some(Token::RightBrace) => {
                    depth = depth.saturating_sub(1);
                    self.bump()?;
                }
                Some(_) => {
                    self.bump()?;
                }
                None => {
                    return Err(ParseError::unexpected_end_of_input("'{'", self.eof_location));
                }
            }
        }
    }

    /// Consume a balanced group starting at `open` (which must be next)
    fn consume_balanced(&mut self, open: Token, close: Token) -> ParseResult<()> {
        let first = self.expect(open, "an opening delimiter")?;
        let mut depth = 1usize;
        loop {
            self.gas()?;
            let t = match self.peek() {
                Some(t) => t,
                None => {
                    return Err(ParseError::unexpected_end_of_input(
                        "a closing delimiter",
                        self.eof_location,
                    ));
                }
            };
            if t.is(&first.token) {
                depth += 1;
            } else if t.is(&close) {
                depth -= 1;
            }
            self.bump()?;
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Consume a plain member (field, property, abstract or expression-bodied
    /// declaration) as opaque text
    fn consume_plain_member(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            self.gas()?;
            match self.peek_token() {
                Some(Token::Semicolon) if depth == 0 => {
                    self.bump()?;
                    return Ok(());
                }
                Some(Token::LeftBrace) if depth == 0 => {
                    self.consume_balanced(Token::LeftBrace, Token::RightBrace)?;
                    // Auto-property initializer: `{ ... } = value;`
                    match self.peek_significant() {
                        Some(t) if t.is(&Token::Operator) && t.lexeme == "=" => continue,
                        _ => return Ok(()),
                    }
                }
                Some(Token::RightBrace) if depth == 0 => {
                    return Err(ParseError::invalid_syntax(
                        "unterminated member declaration",
                        self.current_location(),
                    ));
                }
                Some(Token::LeftParen) | Some(Token::LeftBracket) | Some(Token::LeftBrace) => {
                    depth += 1;
                    self.bump()?;
                }
                Some(Token::RightParen) | Some(Token::RightBracket) | Some(Token::RightBrace) => {
                    depth = depth.saturating_sub(1);
                    self.bump()?;
                }
                Some(_) => {
                    self.bump()?;
                }
                None => {
                    return Err(ParseError::unexpected_end_of_input("';'", self.eof_location));
                }
            }
        }
    }

    // --- attributes ---

    fn parse_attribute(&mut self, leading: String) -> ParseResult<Attribute> {
        let lbracket = self.expect(Token::LeftBracket, "'['")?;
        let start = lbracket.location;
        let open = format!("{}{}", lbracket.lexeme, self.take_trivia());
        let name = self.parse_dotted_name("attribute name")?;
        let trivia = self.take_trivia();

        let (args, close) = if matches!(self.peek_token(), Some(Token::LeftParen)) {
            let args_start = self.offset();
            self.consume_balanced(Token::LeftParen, Token::RightParen)?;
            let args = format!("{}{}", trivia, self.slice(args_start, self.prev_end()));
            let close_trivia = self.take_trivia();
            let rbracket = self.expect(Token::RightBracket, "']'")?;
            (args, format!("{}{}", close_trivia, rbracket.lexeme))
        } else {
            let rbracket = self.expect(Token::RightBracket, "']'")?;
            (String::new(), format!("{}{}", trivia, rbracket.lexeme))
        };

        let span = Span::new(start, self.current_location());
        Ok(Attribute { leading, open, name, args, close, span })
    }

    // --- blocks and statements ---

    fn parse_block(&mut self) -> ParseResult<Block> {
        let lbrace = self.expect(Token::LeftBrace, "'{'")?;
        let start = lbrace.location;
        let open = lbrace.lexeme;

        let mut statements = Vec::new();
        let close;
        loop {
            self.gas()?;
            let leading = self.take_trivia();
            match self.peek_token() {
                Some(Token::RightBrace) => {
                    let brace = self.bump()?;
                    close = format!("{}{}", leading, brace.lexeme);
                    break;
                }
                None => {
                    return Err(ParseError::unexpected_end_of_input("'}'", self.eof_location));
                }
                Some(_) => {
                    statements.push(self.parse_statement(leading)?);
                }
            }
        }

        let span = Span::new(start, self.current_location());
        Ok(Block { open, statements, close, span })
    }

    fn parse_statement(&mut self, leading: String) -> ParseResult<Statement> {
        let start_offset = self.offset();
        let start = self.current_location();
        let starts_with_do = matches!(self.peek_token(), Some(Token::Do));
        let mut depth = 0usize;

        loop {
            self.gas()?;
            match self.peek_token() {
                None => {
                    return Err(ParseError::unexpected_end_of_input("';' or '}'", self.eof_location));
                }
                Some(Token::Semicolon) if depth == 0 => {
                    self.bump()?;
                    break;
                }
                // The enclosing block's close; the statement ends unterminated
                Some(Token::RightBrace) if depth == 0 => break,
                Some(t) => {
                    let opens = matches!(t, Token::LeftBrace | Token::LeftParen | Token::LeftBracket);
                    let closes = matches!(t, Token::RightBrace | Token::RightParen | Token::RightBracket);
                    let brace_close = matches!(t, Token::RightBrace);
                    self.bump()?;
                    if opens {
                        depth += 1;
                    } else if closes {
                        depth = depth.saturating_sub(1);
                        if depth == 0 && brace_close && !self.statement_continues(starts_with_do) {
                            break;
                        }
                    }
                }
            }
        }

        let text = self.slice(start_offset, self.prev_end()).to_string();
        let span = Span::new(start, self.current_location());
        Ok(Statement { leading, text, span })
    }

    /// After a closing brace at depth zero, does the statement keep going?
    fn statement_continues(&self, starts_with_do: bool) -> bool {
        match self.peek_significant().map(|t| &t.token) {
            Some(Token::Else) | Some(Token::Catch) | Some(Token::Finally) => true,
            Some(Token::While) => starts_with_do,
            Some(Token::Semicolon) | Some(Token::Dot) | Some(Token::Comma) | Some(Token::Operator) => true,
            _ => false,
        }
    }
}

/// Parse template source into a compilation unit
pub fn parse(source: &str) -> Result<CompilationUnit> {
    let parser = Parser::new(source)?;
    parser.parse().map_err(Into::into)
}
