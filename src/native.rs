use std::collections::HashMap;
use std::f64::consts::PI;

use crate::object::Object;

/// Language-level constants every global scope starts with.
pub fn constants() -> HashMap<String, Object> {
  let mut constants = HashMap::new();
  constants.insert(String::from("true"), Object::Boolean(true));
  constants.insert(String::from("false"), Object::Boolean(false));
  constants.insert(String::from("null"), Object::Null);
  constants.insert(String::from("pi"), Object::Number(PI));
  constants
}
