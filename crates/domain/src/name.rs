use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A domain name as an ordered list of labels. The root name has no labels.
///
/// Comparison and hashing ignore ASCII case, so `Example.TEST.` and
/// `example.test.` are the same name. The original spelling of every label is
/// kept so that a decoded name re-encodes to the exact same bytes.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    labels: Vec<Box<[u8]>>,
}

impl Name {
    pub const MAX_LABEL_LEN: usize = 63;
    pub const MAX_WIRE_LEN: usize = 255;

    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn from_labels<I, L>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut collected: Vec<Box<[u8]>> = Vec::new();
        let mut wire_len = 1;

        for label in labels {
            let label = label.as_ref();
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(
                    "empty label in domain name".to_string(),
                ));
            }
            if label.len() > Self::MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label of {} bytes exceeds {}",
                    label.len(),
                    Self::MAX_LABEL_LEN
                )));
            }
            wire_len += 1 + label.len();
            if wire_len > Self::MAX_WIRE_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "name exceeds {} bytes on the wire",
                    Self::MAX_WIRE_LEN
                )));
            }
            collected.push(label.into());
        }

        Ok(Self { labels: collected })
    }

    pub fn labels(&self) -> impl ExactSizeIterator<Item = &[u8]> + DoubleEndedIterator {
        self.labels.iter().map(|label| label.as_ref())
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length of the uncompressed wire encoding, terminating zero included.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// The name with its leftmost label removed, `None` for the root.
    pub fn parent(&self) -> Option<Name> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            labels: self.labels[1..].to_vec(),
        })
    }

    /// This name followed by each of its ancestors, ending with the root.
    pub fn suffixes(&self) -> impl Iterator<Item = Name> + '_ {
        (0..=self.labels.len()).map(move |skip| Self {
            labels: self.labels[skip..].to_vec(),
        })
    }

    pub fn is_subdomain_of(&self, zone: &Name) -> bool {
        if zone.labels.len() > self.labels.len() {
            return false;
        }
        let offset = self.labels.len() - zone.labels.len();
        self.labels[offset..]
            .iter()
            .zip(zone.labels.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.labels.len());
        for label in &self.labels {
            state.write_usize(label.len());
            for byte in label.iter() {
                state.write_u8(byte.to_ascii_lowercase());
            }
        }
    }
}

impl FromStr for Name {
    type Err = DomainError;

    /// Parses presentation format: labels separated by unescaped dots,
    /// `\.` and `\\` for literal characters, `\DDD` for any byte.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "." {
            return Ok(Self::root());
        }
        parse_labels(trimmed.as_bytes())
            .and_then(Self::from_labels)
            .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", s, e)))
    }
}

fn parse_labels(text: &[u8]) -> Result<Vec<Vec<u8>>, DomainError> {
    let mut labels = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;

    while i < text.len() {
        match text[i] {
            b'.' => {
                if current.is_empty() {
                    return Err(DomainError::InvalidDomainName(
                        "empty label in domain name".to_string(),
                    ));
                }
                labels.push(std::mem::take(&mut current));
                i += 1;
            }
            b'\\' => {
                let rest = &text[i + 1..];
                if rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) {
                    let value = rest[..3]
                        .iter()
                        .fold(0u16, |acc, digit| acc * 10 + u16::from(digit - b'0'));
                    let byte = u8::try_from(value).map_err(|_| {
                        DomainError::InvalidDomainName(format!("escape \\{} out of range", value))
                    })?;
                    current.push(byte);
                    i += 4;
                } else if let Some(&literal) = rest.first() {
                    current.push(literal);
                    i += 2;
                } else {
                    return Err(DomainError::InvalidDomainName(
                        "dangling escape at end of name".to_string(),
                    ));
                }
            }
            byte => {
                current.push(byte);
                i += 1;
            }
        }
    }

    if !current.is_empty() {
        labels.push(current);
    }
    Ok(labels)
}

impl TryFrom<String> for Name {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.to_string()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for label in &self.labels {
            for &byte in label.iter() {
                match byte {
                    b'.' | b'\\' => write!(f, "\\{}", byte as char)?,
                    0x21..=0x7E => write!(f, "{}", byte as char)?,
                    _ => write!(f, "\\{:03}", byte)?,
                }
            }
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}
