use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::parser::Parser;
pub use crate::parser::ParseError;

/// A parsed dotted-path address such as `Context[0].OtherData`.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Key(String), // .foo, foo or ['foo']
    Index(i64),  // [0]
}

/// A position reached while walking an address.
///
/// Context sequences are borrowed as slices, so a walk can sit on a list
/// that is not itself a `serde_json::Value`.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Value(&'a Value),
    List(&'a [Value]),
}

/// Anything an address can start from. Members borrow from `'a`, not from
/// the root handle, so overlays built per call can hand out long-lived values.
pub trait AddressRoot<'a> {
    fn member(&self, key: &str) -> Option<Node<'a>>;
}

impl<'a> AddressRoot<'a> for &'a Value {
    fn member(&self, key: &str) -> Option<Node<'a>> {
        step(Node::Value(*self), &Segment::Key(key.to_string()))
    }
}

impl<'a> AddressRoot<'a> for &'a serde_json::Map<String, Value> {
    fn member(&self, key: &str) -> Option<Node<'a>> {
        self.get(key).map(Node::Value)
    }
}

/// Resolve `address` against `root`; `None` means the path does not exist
/// (or could not be parsed).
pub fn get_value_by_hash<'a, R>(root: R, address: &str) -> Option<Cow<'a, Value>>
where
    R: AddressRoot<'a>,
{
    let parsed = match parse_address(address) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(address, error = ?e, "unparseable address resolves to undefined");
            return None;
        }
    };
    let mut segments = parsed.segments.iter();
    let mut node = match segments.next()? {
        Segment::Key(k) => root.member(k)?,
        Segment::Index(i) => root.member(&i.to_string())?,
    };
    for seg in segments {
        node = step(node, seg)?;
    }
    Some(match node {
        Node::Value(v) => Cow::Borrowed(v),
        Node::List(items) => Cow::Owned(Value::Array(items.to_vec())),
    })
}

pub fn parse_address(input: &str) -> Result<Address, ParseError> {
    let mut p = Parser::new(input.trim());
    let mut segments = Vec::new();

    if p.peek_char() == Some('[') {
        segments.push(parse_bracket(&mut p)?);
    } else {
        segments.push(Segment::Key(p.parse_key()?));
    }

    while !p.eof() {
        if p.consume_char('.') {
            segments.push(Segment::Key(p.parse_key()?));
            continue;
        }
        if p.peek_char() == Some('[') {
            segments.push(parse_bracket(&mut p)?);
            continue;
        }
        return Err(ParseError::InvalidSyntax("unexpected character in address".into()));
    }
    Ok(Address { segments })
}

fn parse_bracket(p: &mut Parser) -> Result<Segment, ParseError> {
    p.expect('[')?;
    p.skip_ws();
    let seg = match p.peek_char() {
        Some('\'') | Some('"') => Segment::Key(p.parse_quoted_string()?),
        _ => Segment::Index(p.parse_int()?),
    };
    p.skip_ws();
    p.expect(']')?;
    Ok(seg)
}

fn step<'a>(node: Node<'a>, seg: &Segment) -> Option<Node<'a>> {
    match (node, seg) {
        (Node::List(items), Segment::Index(i)) => index(items, *i),
        (Node::List(items), Segment::Key(k)) => k.parse::<i64>().ok().and_then(|i| index(items, i)),
        (Node::Value(Value::Array(items)), _) => step(Node::List(items.as_slice()), seg),
        (Node::Value(Value::Object(map)), Segment::Key(k)) => map.get(k).map(Node::Value),
        (Node::Value(Value::Object(map)), Segment::Index(i)) => {
            map.get(&i.to_string()).map(Node::Value)
        }
        _ => None,
    }
}

fn index(items: &[Value], i: i64) -> Option<Node<'_>> {
    if i < 0 {
        return None;
    }
    items.get(i as usize).map(Node::Value)
}
