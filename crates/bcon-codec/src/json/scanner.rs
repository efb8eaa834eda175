//! JSON tokenizer over a pull-one-byte source.

use bcon_buffers::ByteSource;

use super::error::ParseError;

/// One lexical token of JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    Colon,
    Comma,
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    True,
    False,
    Null,
    Eof,
}

/// Pulls bytes from a [`ByteSource`] one at a time and classifies them
/// into [`Token`]s.
///
/// The only buffering is a single pushed-back byte: a number token ends
/// at the first byte that cannot extend it, and that byte belongs to the
/// next token.
pub struct Scanner<S: ByteSource> {
    source: S,
    lookahead: Option<u8>,
    offset: usize,
}

impl<S: ByteSource> Scanner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: None,
            offset: 0,
        }
    }

    /// Bytes consumed so far, for diagnostics.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_byte(&mut self) -> Result<Option<u8>, ParseError> {
        if let Some(byte) = self.lookahead.take() {
            self.offset += 1;
            return Ok(Some(byte));
        }
        let byte = self.source.next()?;
        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    fn push_back(&mut self, byte: u8) {
        self.lookahead = Some(byte);
        self.offset -= 1;
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(message, self.offset)
    }

    /// Produces the next token, skipping whitespace. End of input is the
    /// [`Token::Eof`] token, which the caller decides is legal or not.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        let byte = loop {
            match self.next_byte()? {
                None => return Ok(Token::Eof),
                Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => continue,
                Some(byte) => break byte,
            }
        };
        match byte {
            b'{' => Ok(Token::ObjectBegin),
            b'}' => Ok(Token::ObjectEnd),
            b'[' => Ok(Token::ArrayBegin),
            b']' => Ok(Token::ArrayEnd),
            b':' => Ok(Token::Colon),
            b',' => Ok(Token::Comma),
            b'"' => self.read_string(),
            b't' => self.read_keyword(b"rue", Token::True),
            b'f' => self.read_keyword(b"alse", Token::False),
            b'n' => self.read_keyword(b"ull", Token::Null),
            b'-' | b'0'..=b'9' => self.read_number(byte),
            other => Err(self.err(format!("unexpected character 0x{other:02x}"))),
        }
    }

    fn read_keyword(&mut self, rest: &[u8], token: Token) -> Result<Token, ParseError> {
        for &expected in rest {
            match self.next_byte()? {
                Some(byte) if byte == expected => {}
                _ => return Err(self.err("invalid literal")),
            }
        }
        Ok(token)
    }

    fn read_string(&mut self) -> Result<Token, ParseError> {
        let mut out: Vec<u8> = Vec::new();
        loop {
            let byte = match self.next_byte()? {
                None => return Err(self.err("unterminated string")),
                Some(byte) => byte,
            };
            match byte {
                b'"' => break,
                b'\\' => self.read_escape(&mut out)?,
                _ => out.push(byte),
            }
        }
        let text = String::from_utf8(out).map_err(|_| self.err("invalid UTF-8 in string"))?;
        Ok(Token::Str(text))
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let byte = match self.next_byte()? {
            None => return Err(self.err("unterminated string")),
            Some(byte) => byte,
        };
        match byte {
            b'"' => out.push(b'"'),
            b'\\' => out.push(b'\\'),
            b'/' => out.push(b'/'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'u' => {
                let unit = self.read_hex4()?;
                let code = if (0xD800..=0xDBFF).contains(&unit) {
                    // High surrogate: the low half must follow immediately.
                    if self.next_byte()? != Some(b'\\') || self.next_byte()? != Some(b'u') {
                        return Err(self.err("unpaired surrogate escape"));
                    }
                    let low = self.read_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(self.err("unpaired surrogate escape"));
                    }
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
                } else if (0xDC00..=0xDFFF).contains(&unit) {
                    return Err(self.err("unpaired surrogate escape"));
                } else {
                    u32::from(unit)
                };
                let ch =
                    char::from_u32(code).ok_or_else(|| self.err("invalid unicode escape"))?;
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
            other => return Err(self.err(format!("invalid escape '\\{}'", other as char))),
        }
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u16, ParseError> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let byte = match self.next_byte()? {
                None => return Err(self.err("unterminated string")),
                Some(byte) => byte,
            };
            let digit = match byte {
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                _ => return Err(self.err("invalid unicode escape")),
            };
            unit = (unit << 4) | u16::from(digit);
        }
        Ok(unit)
    }

    fn read_number(&mut self, first: u8) -> Result<Token, ParseError> {
        let start = self.offset;
        let mut text = String::new();
        text.push(first as char);
        let mut is_float = false;
        loop {
            let byte = match self.next_byte()? {
                None => break,
                Some(byte) => byte,
            };
            match byte {
                b'0'..=b'9' | b'+' | b'-' => text.push(byte as char),
                b'.' | b'e' | b'E' => {
                    is_float = true;
                    text.push(byte as char);
                }
                other => {
                    self.push_back(other);
                    break;
                }
            }
        }
        // JSON forbids leading zeros on the integer part.
        let digits = text.strip_prefix('-').unwrap_or(&text);
        if digits.len() > 1 && digits.starts_with('0') && digits.as_bytes()[1].is_ascii_digit() {
            return Err(ParseError::syntax("invalid number", start));
        }
        if is_float {
            let num: f64 = text
                .parse()
                .map_err(|_| ParseError::syntax("invalid number", start))?;
            return Ok(Token::Float(num));
        }
        if let Ok(num) = text.parse::<i64>() {
            Ok(Token::Int(num))
        } else if let Ok(num) = text.parse::<u64>() {
            Ok(Token::UInt(num))
        } else if let Ok(num) = text.parse::<f64>() {
            // Integer form too wide for 64 bits.
            Ok(Token::Float(num))
        } else {
            Err(ParseError::syntax("invalid number", start))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcon_buffers::SliceSource;

    fn tokens(text: &str) -> Result<Vec<Token>, ParseError> {
        let mut scanner = Scanner::new(SliceSource::new(text.as_bytes()));
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token()?;
            let done = token == Token::Eof;
            out.push(token);
            if done {
                return Ok(out);
            }
        }
    }

    #[test]
    fn structural_and_keyword_tokens() {
        assert_eq!(
            tokens(" { } [ ] : , true false null ").unwrap(),
            vec![
                Token::ObjectBegin,
                Token::ObjectEnd,
                Token::ArrayBegin,
                Token::ArrayEnd,
                Token::Colon,
                Token::Comma,
                Token::True,
                Token::False,
                Token::Null,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn number_forms() {
        assert_eq!(tokens("0").unwrap()[0], Token::Int(0));
        assert_eq!(tokens("-42").unwrap()[0], Token::Int(-42));
        assert_eq!(
            tokens("18446744073709551615").unwrap()[0],
            Token::UInt(u64::MAX)
        );
        assert_eq!(tokens("1.5").unwrap()[0], Token::Float(1.5));
        assert_eq!(tokens("-2e3").unwrap()[0], Token::Float(-2000.0));
        assert_eq!(tokens("1E+2").unwrap()[0], Token::Float(100.0));
    }

    #[test]
    fn leading_zeros_are_rejected() {
        assert!(tokens("0123").is_err());
        assert!(tokens("-012").is_err());
        assert!(tokens("01.5").is_err());
        assert_eq!(tokens("0").unwrap()[0], Token::Int(0));
        assert_eq!(tokens("-0").unwrap()[0], Token::Int(0));
        assert_eq!(tokens("0.5").unwrap()[0], Token::Float(0.5));
    }

    #[test]
    fn number_terminated_by_next_token() {
        assert_eq!(
            tokens("[1,2]").unwrap(),
            vec![
                Token::ArrayBegin,
                Token::Int(1),
                Token::Comma,
                Token::Int(2),
                Token::ArrayEnd,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            tokens(r#""a\"b\\c\/\n\t\r\b\f""#).unwrap()[0],
            Token::Str("a\"b\\c/\n\t\r\u{8}\u{c}".into())
        );
        assert_eq!(tokens(r#""é""#).unwrap()[0], Token::Str("é".into()));
        assert_eq!(
            tokens(r#""😀""#).unwrap()[0],
            Token::Str("😀".into())
        );
    }

    #[test]
    fn unterminated_string_fails() {
        let err = tokens(r#""abc"#).unwrap_err();
        assert!(err.to_string().contains("unterminated string"));
    }

    #[test]
    fn bad_keyword_fails() {
        assert!(tokens("tru").is_err());
        assert!(tokens("nul!").is_err());
    }

    #[test]
    fn unpaired_surrogate_fails() {
        assert!(tokens(r#""\ud83d""#).is_err());
        assert!(tokens(r#""\ude00""#).is_err());
    }
}
