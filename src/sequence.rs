//! Generic SEQUENCE of values.

use std::fmt;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::Result;
use crate::value::Value;

/// Ordered, heterogeneous list of [`Value`]s encoded as a BER SEQUENCE.
///
/// Insertion order is preserved on the wire and in the text form, which
/// wraps each element in spaces inside parentheses:
///
/// ```
/// use snmp_trap::{Sequence, Value};
///
/// let seq = Sequence::from(vec![
///     Value::Integer(100),
///     Value::IpAddress([127, 0, 0, 1]),
///     Value::Null,
/// ]);
/// assert_eq!(seq.to_string(), "( 100  127.0.0.1  Null )");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sequence {
    items: Vec<Value>,
}

impl Sequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Elements as a slice.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Take the elements.
    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    /// Encode as a SEQUENCE TLV.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            for item in self.items.iter().rev() {
                item.encode(buf);
            }
        });
    }

    /// Decode a SEQUENCE TLV.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut content = decoder.read_constructed(tag::universal::SEQUENCE)?;
        Self::decode_content(&mut content)
    }

    /// Decode elements until the decoder is exhausted.
    pub(crate) fn decode_content(content: &mut Decoder) -> Result<Self> {
        let mut items = Vec::new();
        while !content.is_empty() {
            items.push(Value::decode(content)?);
        }
        Ok(Self { items })
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for item in &self.items {
            write!(f, " {} ", item)?;
        }
        f.write_str(")")
    }
}
