//! JSON grammar state machine and the one-shot decode driver.

use std::collections::BTreeMap;

use bcon_buffers::{ByteSource, SliceSource};

use super::error::ParseError;
use super::scanner::{Scanner, Token};
use crate::value::Value;

/// Grammar states. Array "value or end" is the only place a value
/// expectation also admits a closing bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectValue,
    ObjectKeyOrEnd,
    ObjectColon,
    ObjectCommaOrEnd,
    ArrayValueOrEnd,
    ArrayCommaOrEnd,
    Done,
}

/// One open container on the parse stack.
enum Frame {
    Object {
        entries: BTreeMap<String, Value>,
        pending_key: Option<String>,
    },
    Array {
        items: Vec<Value>,
    },
}

/// One-shot JSON decode session over a [`ByteSource`].
///
/// `parse` consumes the driver: the session is not restartable and not
/// reentrant. The container stack is explicit, so adversarially deep
/// input is bounded by the heap, not the call stack.
pub struct Driver<S: ByteSource> {
    scanner: Scanner<S>,
}

impl<S: ByteSource> Driver<S> {
    pub fn new(source: S) -> Self {
        Self {
            scanner: Scanner::new(source),
        }
    }

    /// Parses exactly one JSON value; anything but whitespace after it
    /// is an error.
    pub fn parse(mut self) -> Result<Value, ParseError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut state = State::ExpectValue;
        let mut result: Option<Value> = None;

        loop {
            let token = self.scanner.next_token()?;
            if token == Token::Eof {
                if state == State::Done {
                    break;
                }
                return Err(self.err("unexpected end of input"));
            }
            state = match state {
                State::Done => return Err(self.err("trailing content after value")),
                State::ExpectValue | State::ArrayValueOrEnd => match token {
                    Token::ArrayEnd if state == State::ArrayValueOrEnd => {
                        self.close_array(&mut stack, &mut result)?
                    }
                    Token::ObjectBegin => {
                        stack.push(Frame::Object {
                            entries: BTreeMap::new(),
                            pending_key: None,
                        });
                        State::ObjectKeyOrEnd
                    }
                    Token::ArrayBegin => {
                        stack.push(Frame::Array { items: Vec::new() });
                        State::ArrayValueOrEnd
                    }
                    Token::Str(s) => self.complete(Value::Str(s), &mut stack, &mut result)?,
                    Token::Int(i) => self.complete(Value::Int64(i), &mut stack, &mut result)?,
                    Token::UInt(u) => self.complete(Value::UInt64(u), &mut stack, &mut result)?,
                    Token::Float(f) => self.complete(Value::Double(f), &mut stack, &mut result)?,
                    Token::True => self.complete(Value::Bool(true), &mut stack, &mut result)?,
                    Token::False => self.complete(Value::Bool(false), &mut stack, &mut result)?,
                    Token::Null => self.complete(Value::Null, &mut stack, &mut result)?,
                    _ => return Err(self.err("expected a value")),
                },
                State::ObjectKeyOrEnd => match token {
                    Token::ObjectEnd => self.close_object(&mut stack, &mut result)?,
                    Token::Str(key) => {
                        match stack.last_mut() {
                            Some(Frame::Object { pending_key, .. }) => {
                                *pending_key = Some(key);
                            }
                            _ => return Err(self.err("parser stack corrupt")),
                        }
                        State::ObjectColon
                    }
                    _ => return Err(self.err("expected a key or '}'")),
                },
                State::ObjectColon => match token {
                    Token::Colon => State::ExpectValue,
                    _ => return Err(self.err("expected ':'")),
                },
                State::ObjectCommaOrEnd => match token {
                    Token::Comma => State::ObjectKeyOrEnd,
                    Token::ObjectEnd => self.close_object(&mut stack, &mut result)?,
                    _ => return Err(self.err("expected ',' or '}'")),
                },
                State::ArrayCommaOrEnd => match token {
                    Token::Comma => State::ArrayValueOrEnd,
                    Token::ArrayEnd => self.close_array(&mut stack, &mut result)?,
                    _ => return Err(self.err("expected ',' or ']'")),
                },
            };
        }

        result.ok_or_else(|| self.err("empty input"))
    }

    /// A value is complete: attach it to the enclosing container, or
    /// finish the parse if the stack is empty.
    fn complete(
        &self,
        value: Value,
        stack: &mut Vec<Frame>,
        result: &mut Option<Value>,
    ) -> Result<State, ParseError> {
        match stack.last_mut() {
            None => {
                *result = Some(value);
                Ok(State::Done)
            }
            Some(Frame::Array { items }) => {
                items.push(value);
                Ok(State::ArrayCommaOrEnd)
            }
            Some(Frame::Object {
                entries,
                pending_key,
            }) => {
                let key = pending_key
                    .take()
                    .ok_or_else(|| self.err("parser stack corrupt"))?;
                // Duplicate keys: the last value wins.
                entries.insert(key, value);
                Ok(State::ObjectCommaOrEnd)
            }
        }
    }

    fn close_array(
        &self,
        stack: &mut Vec<Frame>,
        result: &mut Option<Value>,
    ) -> Result<State, ParseError> {
        match stack.pop() {
            Some(Frame::Array { items }) => self.complete(Value::Array(items), stack, result),
            _ => Err(self.err("parser stack corrupt")),
        }
    }

    fn close_object(
        &self,
        stack: &mut Vec<Frame>,
        result: &mut Option<Value>,
    ) -> Result<State, ParseError> {
        match stack.pop() {
            Some(Frame::Object { entries, .. }) => {
                self.complete(Value::Map(entries), stack, result)
            }
            _ => Err(self.err("parser stack corrupt")),
        }
    }

    fn err(&self, message: &str) -> ParseError {
        ParseError::syntax(message, self.scanner.offset())
    }
}

/// Parses one JSON value from an in-memory byte slice.
pub fn parse_json(data: &[u8]) -> Result<Value, ParseError> {
    Driver::new(SliceSource::new(data)).parse()
}

/// Parses one JSON value from a string.
pub fn parse_json_str(text: &str) -> Result<Value, ParseError> {
    parse_json(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(parse_json_str("null").unwrap(), Value::Null);
        assert_eq!(parse_json_str(" true ").unwrap(), Value::Bool(true));
        assert_eq!(parse_json_str("-7").unwrap(), Value::Int64(-7));
        assert_eq!(parse_json_str("1.25").unwrap(), Value::Double(1.25));
        assert_eq!(parse_json_str("\"x\"").unwrap(), Value::Str("x".into()));
    }

    #[test]
    fn nested_containers() {
        let v = parse_json_str(r#"{"a": [1, {"b": null}], "c": "d"}"#).unwrap();
        assert_eq!(
            v,
            Value::map([
                (
                    "a",
                    Value::array([Value::Int64(1), Value::map([("b", Value::Null)])])
                ),
                ("c", Value::Str("d".into())),
            ])
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(parse_json_str("{}").unwrap(), Value::map::<String, _>([]));
        assert_eq!(parse_json_str("[]").unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let v = parse_json_str(r#"{"k": 1, "k": 2}"#).unwrap();
        assert_eq!(v, Value::map([("k", Value::Int64(2))]));
    }

    #[test]
    fn trailing_content_is_rejected() {
        assert!(parse_json_str("123 456").unwrap_err().is_syntax());
        assert!(parse_json_str("{} {}").unwrap_err().is_syntax());
        assert!(parse_json_str("null,").unwrap_err().is_syntax());
    }

    #[test]
    fn unterminated_object_is_rejected() {
        assert!(parse_json_str(r#"{"a":1"#).unwrap_err().is_syntax());
    }

    #[test]
    fn grammar_violations_are_rejected() {
        for text in [
            "",
            "[,1]",
            "{\"a\" 1}",
            "{1: 2}",
            "{\"a\":}",
            "[1 2]",
            "]",
            "}",
            "{,}",
        ] {
            assert!(parse_json_str(text).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn trailing_commas_are_tolerated() {
        // The closing bracket is legal wherever a value or key may
        // start, so a dangling comma parses.
        assert_eq!(
            parse_json_str("[1,]").unwrap(),
            Value::array([Value::Int64(1)])
        );
        assert_eq!(
            parse_json_str(r#"{"a":1,}"#).unwrap(),
            Value::map([("a", Value::Int64(1))])
        );
    }

    #[test]
    fn deep_nesting_is_heap_bounded() {
        let depth = 100_000;
        let mut text = String::with_capacity(depth * 2 + 4);
        for _ in 0..depth {
            text.push('[');
        }
        text.push('1');
        for _ in 0..depth {
            text.push(']');
        }
        let mut v = parse_json_str(&text).unwrap();
        for _ in 0..depth {
            match v {
                Value::Array(mut items) => {
                    assert_eq!(items.len(), 1);
                    v = items.pop().unwrap();
                }
                other => panic!("expected array, got {other:?}"),
            }
        }
        assert_eq!(v, Value::Int64(1));
    }
}
