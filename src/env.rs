use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::RuntimeError;
use crate::native::constants;
use crate::object::Object;

type Objects = HashMap<String, Object>;

#[derive(Debug, Default)]
struct Scope {
  objects: Objects,
  constants: HashSet<String>,
  parent: Option<Env>,
}

/// Handle to one lexical scope. Cloning the handle shares the scope; a child
/// keeps its parent alive, and since a scope can only be created under an
/// existing one the chain never forms a cycle.
#[derive(Clone, Default)]
pub struct Env {
  scope: Rc<RefCell<Scope>>,
}

impl Env {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_parent(parent: &Env) -> Self {
    let scope = Scope {
      parent: Some(parent.clone()),
      ..Scope::default()
    };

    Self {
      scope: Rc::new(RefCell::new(scope)),
    }
  }

  /// Root scope with the language constants declared.
  pub fn global() -> Self {
    let env = Env::new();
    {
      let mut scope = env.scope.borrow_mut();
      for (name, value) in constants() {
        scope.constants.insert(name.clone());
        scope.objects.insert(name, value);
      }
    }
    env
  }

  pub fn parent(&self) -> Option<Env> {
    self.scope.borrow().parent.clone()
  }

  pub fn contains_local(&self, name: &str) -> bool {
    self.scope.borrow().objects.contains_key(name)
  }

  pub fn is_constant(&self, name: &str) -> bool {
    self.scope.borrow().constants.contains(name)
  }

  /// Names bound directly in this scope, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.scope.borrow().objects.keys().cloned().collect();
    names.sort();
    names
  }

  pub fn declare(&self, name: &str, value: Object, constant: bool) -> Result<Object, RuntimeError> {
    let mut scope = self.scope.borrow_mut();

    if scope.objects.contains_key(name) {
      return Err(RuntimeError::DuplicateDeclaration { name: name.to_owned(), span: None });
    }

    debug!(name, constant, %value, "declare");
    scope.objects.insert(name.to_owned(), value.clone());
    if constant {
      scope.constants.insert(name.to_owned());
    }

    Ok(value)
  }

  /// Overwrites the binding in the scope that owns `name`, which may be an
  /// ancestor of this one.
  pub fn assign(&self, name: &str, value: Object) -> Result<Object, RuntimeError> {
    let owner = self.resolve(name)?;
    let mut scope = owner.scope.borrow_mut();

    if scope.constants.contains(name) {
      return Err(RuntimeError::ConstantReassignment { name: name.to_owned(), span: None });
    }

    debug!(name, %value, "assign");
    scope.objects.insert(name.to_owned(), value.clone());

    Ok(value)
  }

  pub fn lookup(&self, name: &str) -> Result<Object, RuntimeError> {
    let owner = self.resolve(name)?;
    let scope = owner.scope.borrow();

    scope.objects.get(name).cloned().ok_or_else(|| RuntimeError::unresolved(name))
  }

  /// Innermost scope binding `name`.
  pub fn resolve(&self, name: &str) -> Result<Env, RuntimeError> {
    let mut current = self.clone();

    loop {
      if current.contains_local(name) {
        return Ok(current);
      }

      current = current.parent().ok_or_else(|| RuntimeError::unresolved(name))?;
    }
  }

  pub fn ptr_eq(&self, other: &Env) -> bool {
    Rc::ptr_eq(&self.scope, &other.scope)
  }
}

impl fmt::Debug for Env {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let scope = self.scope.borrow();
    f.debug_struct("Env")
      .field("objects", &scope.objects)
      .field("constants", &scope.constants)
      .field("has_parent", &scope.parent.is_some())
      .finish()
  }
}
