use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;

/// Property bag of an object value. Iterates in insertion order; inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
  entries: Vec<(String, Object)>,
  index: HashMap<String, usize>,
}

impl Properties {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, key: String, value: Object) {
    match self.index.get(&key) {
      Some(&position) => self.entries[position].1 = value,
      None => {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
      }
    }
  }

  pub fn get(&self, key: &str) -> Option<&Object> {
    self.index.get(key).map(|&position| &self.entries[position].1)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
    self.entries.iter().map(|(key, value)| (key.as_str(), value))
  }
}

impl FromIterator<(String, Object)> for Properties {
  fn from_iter<I: IntoIterator<Item = (String, Object)>>(iter: I) -> Self {
    let mut properties = Properties::new();
    for (key, value) in iter {
      properties.insert(key, value);
    }
    properties
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
  Null,
  Boolean(bool),
  Number(f64),
  String(String),
  Object(Properties),
}

impl fmt::Display for Object {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Object::Null => f.write_str("null"),
      Object::Boolean(b) => write!(f, "{}", b),
      Object::Number(n) => write!(f, "{}", n),
      Object::String(s) => write!(f, "{}", s),
      Object::Object(properties) => {
        if properties.is_empty() {
          return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (index, (key, value)) in properties.iter().enumerate() {
          if index > 0 {
            f.write_str(", ")?;
          }
          match value {
            Object::String(s) => write!(f, "{}: {:?}", key, s)?,
            value => write!(f, "{}: {}", key, value)?,
          }
        }
        f.write_str(" }")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insert_replaces_in_place() {
    let mut properties = Properties::new();
    properties.insert("a".to_owned(), Object::Number(1.0));
    properties.insert("b".to_owned(), Object::Number(2.0));
    properties.insert("a".to_owned(), Object::Null);

    let keys: Vec<&str> = properties.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(properties.get("a"), Some(&Object::Null));
    assert_eq!(properties.get("c"), None);
  }

  #[test]
  fn display() {
    assert_eq!(Object::Number(14.0).to_string(), "14");
    assert_eq!(Object::Number(2.5).to_string(), "2.5");
    assert_eq!(Object::Null.to_string(), "null");

    let nested: Properties = vec![("c".to_owned(), Object::Boolean(true))].into_iter().collect();
    let object: Properties = vec![
      ("a".to_owned(), Object::String("hi".to_owned())),
      ("b".to_owned(), Object::Object(nested)),
      ("d".to_owned(), Object::Object(Properties::new())),
    ]
    .into_iter()
    .collect();
    assert_eq!(Object::Object(object).to_string(), r#"{ a: "hi", b: { c: true }, d: {} }"#);
  }
}
