use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A shared, mutable handle to an [`Environment`].
///
/// Call frames keep their parent alive through this handle, and the
/// interpreter holds the global one.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One scope of name bindings, linked to its enclosing scope.
///
/// The global environment has no parent. Every function call creates a new
/// environment whose parent is the environment of the *caller*, so free names
/// in a function body resolve against the call site.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    parent:   Option<EnvRef>,
}

impl Environment {
    /// Creates a root environment with no bindings.
    #[must_use]
    pub fn new_global() -> EnvRef {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates an empty environment nested inside `parent`.
    #[must_use]
    pub fn child_of(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Self { bindings: HashMap::new(),
                                    parent:   Some(Rc::clone(parent)), }))
    }

    /// Looks a name up, walking from this scope towards the root.
    ///
    /// # Returns
    /// A clone of the bound value, or `None` if no scope binds the name.
    ///
    /// # Example
    /// ```
    /// use mathpy::interpreter::{environment::Environment, value::core::Value};
    ///
    /// let global = Environment::new_global();
    /// global.borrow_mut().set("x", Value::Integer(1));
    ///
    /// let local = Environment::child_of(&global);
    /// assert_eq!(local.borrow().get("x"), Some(Value::Integer(1)));
    /// assert_eq!(local.borrow().get("y"), None);
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref().and_then(|parent| parent.borrow().get(name)),
        }
    }

    /// Binds a name in this scope, replacing any previous binding here.
    pub fn set(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Rebinds a name where it already lives.
    ///
    /// If this scope binds the name, it is overwritten here. Otherwise the
    /// update is forwarded to the parent. A name bound nowhere ends up in the
    /// root scope, where the walk stops.
    pub fn update(&mut self, name: &str, value: Value) {
        if self.bindings.contains_key(name) {
            self.bindings.insert(name.to_string(), value);
            return;
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().update(name, value),
            None => self.set(name, value),
        }
    }
}
