use std::fmt;

use crate::form::{Element, Form};

use proc_macro2::{Delimiter, Literal, Spacing, TokenStream, TokenTree};

#[derive(Debug)]
struct Parser {
    tokens: Vec<TokenTree>,
    index: usize,
}

#[derive(Debug)]
pub enum ParseError {
    ExpectedStringLiteral(Literal),
    UnexpectedToken(TokenTree),
    UnexpectedChar(char),
    UnexpectedDelimiter(Delimiter),
    UnexpectedSplice,
    OddMapForms(usize),
    UnexpectedEnd,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ExpectedStringLiteral(lit) => {
                write!(f, "expected a string literal, found {}", lit)
            }
            ParseError::UnexpectedToken(token) => write!(f, "unexpected token {}", token),
            ParseError::UnexpectedChar(c) => write!(f, "unexpected character {:?}", c),
            ParseError::UnexpectedDelimiter(delim) => {
                write!(f, "unexpected delimiter {:?}", delim)
            }
            ParseError::UnexpectedSplice => {
                f.write_str("~@ can only be used inside a list, vector or set")
            }
            ParseError::OddMapForms(n) => write!(f, "map with an odd number of forms ({})", n),
            ParseError::UnexpectedEnd => f.write_str("unexpected end of input"),
        }
    }
}

impl Parser {
    fn new(tokens: Vec<TokenTree>) -> Self {
        Parser { tokens, index: 0 }
    }

    fn next_token(&mut self) -> Option<&TokenTree> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    fn token(&mut self) -> Result<&TokenTree, ParseError> {
        self.next_token().ok_or(ParseError::UnexpectedEnd)
    }

    fn peek(&self) -> Option<&TokenTree> {
        self.tokens.get(self.index)
    }

    fn eat_token(&mut self) {
        debug_assert!(self.index < self.tokens.len());
        self.index += 1;
    }

    // Commas are whitespace, as in Clojure.
    fn skip_commas(&mut self) {
        while matches!(self.peek(), Some(TokenTree::Punct(p)) if p.as_char() == ',') {
            self.eat_token();
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_commas();
        self.peek().is_none()
    }

    fn parse(&mut self) -> Result<Form, ParseError> {
        match self.parse_element()? {
            Element::Form(form) => Ok(form),
            Element::Splice(_) => Err(ParseError::UnexpectedSplice),
        }
    }

    fn parse_element(&mut self) -> Result<Element, ParseError> {
        self.skip_commas();
        let token = self.token()?.clone();
        let form = match token {
            TokenTree::Punct(punct) => match punct.as_char() {
                '#' => self.parse_octothorpe()?,
                '~' => return self.parse_unquote(),
                ':' => self.parse_keyword()?,
                c @ ('!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | '<' | '=' | '>'
                | '?' | '^' | '_') => match punct.spacing() {
                    Spacing::Joint => Form::Symbol(self.parse_identifier(c.to_string())),
                    Spacing::Alone => match (c, self.peek()) {
                        ('-', Some(TokenTree::Literal(lit))) => {
                            let lit = lit.clone();
                            self.eat_token();
                            Form::Negated(lit)
                        }
                        _ => Form::Symbol(c.to_string()),
                    },
                },
                c => return Err(ParseError::UnexpectedChar(c)),
            },
            TokenTree::Literal(literal) => Form::Literal(literal),
            TokenTree::Ident(ident) => match ident.to_string().as_str() {
                "nil" => Form::Nil,
                "true" => Form::Bool(true),
                "false" => Form::Bool(false),
                name => Form::Symbol(name.to_owned()),
            },
            TokenTree::Group(group) => match group.delimiter() {
                Delimiter::Parenthesis => Form::List(parse_elements(group.stream())?),
                Delimiter::Bracket => Form::Vector(parse_elements(group.stream())?),
                Delimiter::Brace => parse_map(group.stream())?,
                Delimiter::None => parse(group.stream())?,
            },
        };
        Ok(Element::Form(form))
    }

    /// After `~`: `~@expr` splices, `~expr` interpolates.
    fn parse_unquote(&mut self) -> Result<Element, ParseError> {
        if let Some(TokenTree::Punct(punct)) = self.peek() {
            if punct.as_char() == '@' {
                self.eat_token();
                return Ok(Element::Splice(self.token()?.clone()));
            }
        }
        Ok(Element::Form(Form::Unquoted(self.token()?.clone())))
    }

    /// After `:`, either a name or a string literal holding one.
    fn parse_keyword(&mut self) -> Result<Form, ParseError> {
        match self.peek() {
            Some(TokenTree::Literal(lit)) => {
                let name = string_literal(lit)?;
                self.eat_token();
                Ok(Form::Keyword(name))
            }
            Some(TokenTree::Ident(_)) | Some(TokenTree::Punct(_)) => {
                let name = self.parse_identifier(String::new());
                if name.is_empty() {
                    return Err(ParseError::UnexpectedChar(':'));
                }
                Ok(Form::Keyword(name))
            }
            Some(token) => Err(ParseError::UnexpectedToken(token.clone())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_identifier(&mut self, prefix: String) -> String {
        let mut identifier = prefix;
        while let Some(token) = self.peek() {
            match token {
                TokenTree::Punct(punct) => match punct.as_char() {
                    '!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | ':' | '<' | '=' | '>'
                    | '?' | '^' => {
                        identifier.push(punct.as_char());
                        let spacing = punct.spacing();
                        self.eat_token();
                        match spacing {
                            Spacing::Joint => {}
                            Spacing::Alone => break,
                        }
                    }
                    _ => break,
                },
                TokenTree::Ident(part) => {
                    identifier.push_str(&part.to_string());
                    self.eat_token();
                    break;
                }
                _ => break,
            }
        }
        identifier
    }

    /// After `#`: `#"name"` is a symbol, `#{...}` a set.
    fn parse_octothorpe(&mut self) -> Result<Form, ParseError> {
        let token = self.token()?.clone();
        match token {
            TokenTree::Literal(lit) => Ok(Form::Symbol(string_literal(&lit)?)),
            TokenTree::Group(group) => match group.delimiter() {
                Delimiter::Brace => Ok(Form::Set(parse_elements(group.stream())?)),
                delim => Err(ParseError::UnexpectedDelimiter(delim)),
            },
            token => Err(ParseError::UnexpectedToken(token)),
        }
    }
}

fn string_literal(lit: &Literal) -> Result<String, ParseError> {
    let s = lit.to_string();
    match s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(name) => Ok(name.to_owned()),
        None => Err(ParseError::ExpectedStringLiteral(lit.clone())),
    }
}

fn parse_elements(tokens: TokenStream) -> Result<Vec<Element>, ParseError> {
    let mut elements = vec![];
    let mut parser = Parser::new(tokens.into_iter().collect());
    while !parser.at_end() {
        elements.push(parser.parse_element()?);
    }
    Ok(elements)
}

fn parse_map(tokens: TokenStream) -> Result<Form, ParseError> {
    let mut forms = Vec::new();
    for element in parse_elements(tokens)? {
        match element {
            Element::Form(form) => forms.push(form),
            Element::Splice(_) => return Err(ParseError::UnexpectedSplice),
        }
    }
    if forms.len() % 2 == 1 {
        return Err(ParseError::OddMapForms(forms.len()));
    }
    let mut entries = Vec::with_capacity(forms.len() / 2);
    let mut iter = forms.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        entries.push((key, value));
    }
    Ok(Form::Map(entries))
}

pub fn parse(tokens: TokenStream) -> Result<Form, ParseError> {
    let mut parser = Parser::new(tokens.into_iter().collect());
    let form = parser.parse()?;
    if !parser.at_end() {
        if let Some(token) = parser.peek() {
            return Err(ParseError::UnexpectedToken(token.clone()));
        }
    }
    Ok(form)
}
