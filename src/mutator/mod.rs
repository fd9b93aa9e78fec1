//! The `mutator` module generates the variants of a password that are
//! stored as similar-password entries, using a fixed ordered table of
//! mangling rules.

mod rules;

use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;

pub use rules::{RDAS_RULES, RDAS_RULE_COUNT};

/// A single mangling rule. Positions are byte offsets; a negative position
/// counts from the end of the password.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
  /// Toggles the case of the byte at the position, read as a Latin-1
  /// character.
  Capitalize(i32),
  /// Removes a prefix (position >= 0) or a suffix (position < 0) whose
  /// length is the absolute value of the position.
  Delete(i32),
  /// Inserts the string at the position; -1 appends.
  Insert(i32, &'static str),
  /// Replaces every occurrence of the first string with the second.
  Substitute(&'static str, &'static str),
}

/// Toggles the case of `b` as a Latin-1 character. The result keeps only
/// the low byte of the mapped character, so 0xFF becomes 0x78. Bytes that
/// are not cased letters, or whose mapping is not a single character, are
/// returned unchanged.
fn switch_case(b: u8) -> u8 {
  fn single<I: ExactSizeIterator<Item = char>>(mut it: I) -> Option<char> {
    if it.len() == 1 {
      it.next()
    } else {
      None
    }
  }

  let c = char::from(b);
  let toggled = if c.is_uppercase() {
    single(c.to_lowercase())
  } else if c.is_lowercase() {
    single(c.to_uppercase())
  } else {
    None
  };
  toggled.map_or(b, |t| t as u8)
}

impl Rule {
  /// Applies the rule to `password`. A position out of range leaves the
  /// password unchanged.
  pub fn apply(&self, password: &[u8]) -> Vec<u8> {
    let len = password.len() as i64;
    match *self {
      Rule::Capitalize(pos) => {
        let mut out = password.to_vec();
        let idx = if pos < 0 { len + pos as i64 } else { pos as i64 };
        if idx >= 0 && idx < len {
          let b = &mut out[idx as usize];
          *b = switch_case(*b);
        }
        out
      }
      Rule::Delete(pos) => {
        let pos = pos as i64;
        if pos >= 0 && pos <= len {
          password[pos as usize..].to_vec()
        } else if pos < 0 && len + pos >= 0 {
          password[..(len + pos) as usize].to_vec()
        } else {
          password.to_vec()
        }
      }
      Rule::Insert(pos, s) => {
        let mut pos = pos as i64;
        if pos < 0 {
          pos += len + 1;
        }
        if pos < 0 || pos > len {
          return password.to_vec();
        }
        let (head, tail) = password.split_at(pos as usize);
        let mut out = Vec::with_capacity(password.len() + s.len());
        out.extend_from_slice(head);
        out.extend_from_slice(s.as_bytes());
        out.extend_from_slice(tail);
        out
      }
      Rule::Substitute(from, to) => {
        replace_all(password, from.as_bytes(), to.as_bytes())
      }
    }
  }
}

fn replace_all(haystack: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
  if from.is_empty() {
    return haystack.to_vec();
  }
  let mut out = Vec::with_capacity(haystack.len());
  let mut i = 0;
  while i < haystack.len() {
    if haystack[i..].starts_with(from) {
      out.extend_from_slice(to);
      i += from.len();
    } else {
      out.push(haystack[i]);
      i += 1;
    }
  }
  out
}

/// A `Mutator` produces up to `count` distinct variants of a password,
/// none equal to the password itself.
pub trait Mutator: Send + Sync {
  fn mutate(&self, password: &[u8], count: usize) -> Vec<Vec<u8>>;
}

type SeenSet = HashSet<Vec<u8>, BuildHasherDefault<SeaHasher>>;

/// `RDasMutator` walks `RDAS_RULES` in order, applying each rule to the
/// original password and keeping the first `count` novel results.
#[derive(Clone, Copy, Debug)]
pub struct RDasMutator {
  rules: &'static [Rule],
}

impl RDasMutator {
  pub fn new() -> Self {
    Self {
      rules: &RDAS_RULES,
    }
  }
}

impl Default for RDasMutator {
  fn default() -> Self {
    Self::new()
  }
}

impl Mutator for RDasMutator {
  fn mutate(&self, password: &[u8], count: usize) -> Vec<Vec<u8>> {
    let mut variants = Vec::new();
    if count == 0 {
      return variants;
    }
    let mut seen = SeenSet::default();
    seen.insert(password.to_vec());
    for rule in self.rules {
      let candidate = rule.apply(password);
      if seen.insert(candidate.clone()) {
        variants.push(candidate);
        if variants.len() == count {
          break;
        }
      }
    }
    variants
  }
}
