use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A single lexical scope: a name-to-value map plus a link to the enclosing
/// scope. Closures hold an `Rc` to the environment active at the point they
/// were declared, so the chain forms a DAG of shared scopes rather than a
/// simple stack.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, variables: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    /// Walks exactly `distance` links up the enclosing chain.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self.enclosing.clone()
            .expect("resolver-computed distance to not exceed the environment chain length");

        for _ in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .expect("resolver-computed distance to not exceed the environment chain length");
            environment = parent;
        }

        environment
    }

    /// Assigns to an existing binding, walking outward to globals. Unlike
    /// `define`, this never creates a new binding.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Assigns at a resolver-computed depth; `distance` 0 means this scope.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Reads at a resolver-computed depth; `distance` 0 means this scope.
    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let undefined = || RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        };

        if distance > 0 {
            self.ancestor(distance).borrow().variables.get(&name.lexeme).cloned().ok_or_else(undefined)
        } else {
            self.variables.get(&name.lexeme).cloned().ok_or_else(undefined)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Literal;
    use crate::token::Type;

    fn token(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, 1)
    }

    #[test]
    fn get_walks_to_enclosing() {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        globals.borrow_mut().define("x", Object::from(1.0));

        let local = Environment::new(Some(Rc::clone(&globals)));
        assert_eq!(local.get(&token("x")).unwrap(), Object::from(1.0));
    }

    #[test]
    fn assign_to_undefined_is_runtime_error() {
        let mut env = Environment::new(None);
        assert!(env.assign(&token("x"), Object::from(Literal::Nil)).is_err());
    }

    #[test]
    fn get_at_walks_exactly_distance_hops() {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        globals.borrow_mut().define("x", Object::from("outer"));

        let middle = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&globals)))));
        middle.borrow_mut().define("x", Object::from("middle"));

        let inner = Environment::new(Some(Rc::clone(&middle)));

        assert_eq!(inner.get_at(0, &token("x")).unwrap(), Object::from("middle"));
        assert_eq!(inner.get_at(1, &token("x")).unwrap(), Object::from("outer"));
    }
}
