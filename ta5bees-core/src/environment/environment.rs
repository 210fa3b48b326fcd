use std::{cell::RefCell, collections::{HashMap, HashSet}, rc::Rc};

use crate::eval::prelude::{RuntimeError, RuntimeErrorType};

use super::value::Value;

/// Shared handle to a scope. Closures and child scopes keep their parent
/// alive through it.
pub type Scope = Rc<RefCell<Environment>>;

#[derive(Default, Debug)]
pub struct Environment {
    store: HashMap<String, Value>,
    constants: HashSet<String>,
    parent: Option<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root() -> Scope {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn child(parent: &Scope) -> Scope {
        Rc::new(RefCell::new(Self {
            parent: Some(parent.clone()),
            ..Self::default()
        }))
    }

    /// Binds `name` in this scope only. Shadowing a parent's binding is
    /// allowed, redeclaring one of this scope's own is not.
    pub fn declare(&mut self, name: &str, value: Value, constant: bool) -> Result<Value, RuntimeError> {
        if self.store.contains_key(name) {
            return Err(RuntimeError::new(RuntimeErrorType::DuplicateDeclaration {
                name: name.to_string()
            }));
        }

        if constant {
            self.constants.insert(name.to_string());
        }

        self.store.insert(name.to_string(), value.clone());

        Ok(value)
    }

    /// Updates the nearest binding of `name`, walking up the chain.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<Value, RuntimeError> {
        if let Some(slot) = self.store.get_mut(name) {
            if self.constants.contains(name) {
                return Err(RuntimeError::new(RuntimeErrorType::ConstantReassignment {
                    name: name.to_string()
                }));
            }

            *slot = value.clone();

            return Ok(value);
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(RuntimeError::new(RuntimeErrorType::UnresolvedIdentifier {
                name: name.to_string()
            }))
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(value) = self.store.get(name) {
            return Ok(value.clone());
        }

        match &self.parent {
            Some(parent) => parent.borrow().lookup(name),
            None => Err(RuntimeError::new(RuntimeErrorType::UnresolvedIdentifier {
                name: name.to_string()
            }))
        }
    }

    /// This scope's own binding, ignoring parents.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.store.get(name).cloned()
    }

    /// Overwrites this scope's own binding, bypassing the constant check.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.store.get_mut(name) {
            *slot = value;
        }
    }
}
