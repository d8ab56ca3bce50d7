//! Readers for the primary macro characters.

use super::error::ErrorCode;
use super::read::{self as source, decode_code_point};
use super::{MacroFn, Read, Reader, Result, Step};
use crate::syntax::{self, char_by_name};
use crate::{Form, Map};

fn position_meta(line: usize, column: usize) -> Map {
    let mut meta = Map::new();
    meta.insert(Form::keyword("line"), Form::from(line as i64));
    meta.insert(Form::keyword("column"), Form::from(column as i64));
    meta
}

impl<R: Read> Reader<R> {
    pub(super) fn macro_fn(ch: char) -> Option<MacroFn<R>> {
        let f: MacroFn<R> = match ch {
            '"' => Self::read_string,
            ';' => Self::read_comment,
            '\'' => Self::read_quote,
            '@' => Self::read_deref,
            '^' => Self::read_meta,
            '`' => Self::read_syntax_quote,
            '~' => Self::read_unquote,
            '(' => Self::read_list,
            ')' | ']' | '}' => Self::read_unmatched_delimiter,
            '[' => Self::read_vector,
            '{' => Self::read_map,
            '\\' => Self::read_char,
            '%' => Self::read_arg,
            '#' => Self::read_dispatch,
            _ => return None,
        };
        Some(f)
    }

    fn read_string(&mut self, _: char) -> Result<Step> {
        self.scratch.clear();
        source::parse_str(&mut self.read, &mut self.scratch)?;
        Ok(Step::Form(Form::String(self.scratch.as_str().into())))
    }

    /// Skips to the end of the line; also used for `#!`.
    pub(super) fn read_comment(&mut self, _: char) -> Result<Step> {
        loop {
            match self.next_char()? {
                None | Some('\n') | Some('\r') => return Ok(Step::Continue),
                Some(_) => {}
            }
        }
    }

    fn read_quote(&mut self, _: char) -> Result<Step> {
        let form = self.read_next()?;
        Ok(Step::Form(syntax::call("quote", [form])))
    }

    fn read_deref(&mut self, _: char) -> Result<Step> {
        let form = self.read_next()?;
        Ok(Step::Form(syntax::core_call("deref", [form])))
    }

    /// `^meta form`, also reached through `#^`.
    pub(super) fn read_meta(&mut self, _: char) -> Result<Step> {
        let pos = self.read.position();
        let mut meta = match self.read_next()?.strip_meta() {
            tag @ Form::Symbol(_) | tag @ Form::String(_) => {
                let mut meta = Map::new();
                meta.insert(Form::keyword("tag"), tag);
                meta
            }
            kw @ Form::Keyword(_) => {
                let mut meta = Map::new();
                meta.insert(kw, Form::Bool(true));
                meta
            }
            Form::Map(map) => map,
            _ => return Err(self.error(ErrorCode::InvalidMetadata)),
        };
        let target = self.read_next()?;
        if !target.supports_meta() {
            return Err(self.error(ErrorCode::InvalidMetadataTarget));
        }
        if target.is_list() {
            meta.merge(&position_meta(pos.line, pos.column));
        }
        Ok(Step::Form(target.with_meta(meta)))
    }

    fn read_list(&mut self, _: char) -> Result<Step> {
        self.read_list_form().map(Step::Form)
    }

    /// Reads the rest of a list whose `(` was just consumed.
    ///
    /// A non-empty list carries the position of its opening parenthesis as
    /// `:line` and `:column` metadata.
    pub(super) fn read_list_form(&mut self) -> Result<Form> {
        let pos = self.read.position();
        let items = self.read_delimited(')')?;
        if items.is_empty() {
            return Ok(Form::empty_list());
        }
        Ok(Form::List(items.into()).with_meta(position_meta(pos.line, pos.column)))
    }

    fn read_vector(&mut self, _: char) -> Result<Step> {
        let items = self.read_delimited(']')?;
        Ok(Step::Form(Form::Vector(items.into())))
    }

    fn read_map(&mut self, _: char) -> Result<Step> {
        let items = self.read_delimited('}')?;
        self.build_map(items).map(Step::Form)
    }

    /// Pairs up the forms of a map literal.
    pub(super) fn build_map(&self, items: Vec<Form>) -> Result<Form> {
        if items.len() % 2 == 1 {
            return Err(self.error(ErrorCode::OddMapForms));
        }
        let mut pairs = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            pairs.push((key, value));
        }
        Map::from_pairs(pairs)
            .map(Form::Map)
            .map_err(|key| self.error(ErrorCode::DuplicateKey(key.to_string())))
    }

    fn read_unmatched_delimiter(&mut self, ch: char) -> Result<Step> {
        Err(self.error(ErrorCode::UnmatchedDelimiter(ch)))
    }

    fn read_char(&mut self, _: char) -> Result<Step> {
        let init = match self.next_char()? {
            Some(ch) => ch,
            None => return Err(self.error(ErrorCode::EofWhileReadingCharacter)),
        };
        let token = self.read_token(init)?;
        if token.len() == init.len_utf8() {
            return Ok(Step::Form(Form::Char(init)));
        }
        if let Some(c) = char_by_name(&token) {
            return Ok(Step::Form(Form::Char(c)));
        }
        if let Some(digits) = token.strip_prefix('u') {
            let invalid = || ErrorCode::InvalidUnicodeEscape(format!("invalid unicode character: \\{}", token));
            let n = match decode_code_point(digits, 16, 4) {
                Some(n) => n,
                None => return Err(self.error(invalid())),
            };
            if (0xD800..=0xDFFF).contains(&n) {
                return Err(self.error(ErrorCode::InvalidUnicodeEscape(format!(
                    "invalid character constant: \\u{:x}",
                    n
                ))));
            }
            return match char::from_u32(n) {
                Some(c) => Ok(Step::Form(Form::Char(c))),
                None => Err(self.error(invalid())),
            };
        }
        if let Some(digits) = token.strip_prefix('o') {
            let len = digits.chars().count();
            if len > 3 {
                return Err(self.error(ErrorCode::InvalidOctalEscape(format!(
                    "invalid octal escape sequence length: {}",
                    len
                ))));
            }
            return match decode_code_point(digits, 8, len).and_then(|n| {
                if n <= 0o377 {
                    char::from_u32(n)
                } else {
                    None
                }
            }) {
                Some(c) => Ok(Step::Form(Form::Char(c))),
                None => Err(self.error(ErrorCode::InvalidOctalEscape(format!(
                    "\\{} is not an octal escape in range [0, 377]",
                    token
                )))),
            };
        }
        Err(self.error(ErrorCode::UnsupportedCharacter(token)))
    }
}
