use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Error, ErrorReporter, RuntimeError};
use crate::expr::{Expr, ExprVisitor, NodeId};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Token, Type};

/// Propagates a `return` out of whatever statements are currently executing,
/// up to the call that entered the function body. Modeled as an ordinary
/// value threaded through `StmtVisitor` rather than a thrown/caught "error",
/// since a return is control flow, not a failure.
#[derive(Debug)]
pub enum Signal {
    None,
    Return(Object),
}

pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new(None)));

        for native in NativeFunction::get_globals() {
            let name = native.name.lexeme.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output }
    }

    /// Runs a parsed, resolved program. Stops and reports at the first
    /// runtime error; statements already executed keep their side effects.
    pub fn interpret(&mut self, statements: &[Stmt], reporter: &ErrorReporter) {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                error.throw(reporter);
                return;
            }
        }
    }

    /// Called by the resolver once per variable reference, recording how
    /// many environments separate it from its binding.
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    /// Executes `statements` in a fresh environment nested under
    /// `environment`, restoring the caller's environment afterward even if a
    /// statement errors out partway through.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Signal, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(Signal::None);
        for statement in statements {
            match self.execute(statement) {
                Ok(Signal::None) => continue,
                Ok(signal) => {
                    result = Ok(signal);
                    break;
                }
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn look_up_variable(&self, id: NodeId, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(&distance) = self.locals.get(&id) {
            self.environment.borrow().get_at(distance, name)
        } else {
            self.globals.borrow().get(name)
        }
    }
}

fn check_number_operand(operator: &Token, operand: &Object) -> Result<f64, RuntimeError> {
    match operand {
        Object::Literal(Literal::Number(n)) => Ok(*n),
        _ => Err(RuntimeError { token: operator.clone(), message: "Operand must be a number.".to_string() }),
    }
}

fn check_number_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Object::Literal(Literal::Number(a)), Object::Literal(Literal::Number(b))) => Ok((*a, *b)),
        _ => Err(RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() }),
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Literal(literal) = expr else { unreachable!() };
        Ok(Object::from(literal.clone()))
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Variable(variable) = expr else { unreachable!() };
        self.look_up_variable(variable.id, &variable.name)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Assign(assign) = expr else { unreachable!() };

        let value = self.evaluate(&assign.value)?;

        if let Some(&distance) = self.locals.get(&assign.id) {
            self.environment.borrow_mut().assign_at(distance, &assign.name, value.clone());
        } else {
            self.globals.borrow_mut().assign(&assign.name, value.clone())?;
        }

        Ok(value)
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Unary(unary) = expr else { unreachable!() };

        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Minus => Ok(Object::from(-check_number_operand(&unary.operator, &right)?)),
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            _ => unreachable!("parser only produces valid unary operators"),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Binary(binary) = expr else { unreachable!() };

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let operator = &binary.operator;

        match operator.r#type {
            Type::Minus => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Object::from(a - b))
            }
            Type::Slash => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Object::from(a / b))
            }
            Type::Star => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Object::from(a * b))
            }
            Type::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(a)), Object::Literal(Literal::Number(b))) => {
                    Ok(Object::from(a + b))
                }
                (Object::Literal(Literal::String(a)), Object::Literal(Literal::String(b))) => {
                    Ok(Object::from(format!("{a}{b}")))
                }
                _ => Err(RuntimeError {
                    token: operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            Type::Greater => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Object::from(a > b))
            }
            Type::GreaterEqual => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Object::from(a >= b))
            }
            Type::Less => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Object::from(a < b))
            }
            Type::LessEqual => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Object::from(a <= b))
            }
            Type::BangEqual => Ok(Object::from(left != right)),
            Type::EqualEqual => Ok(Object::from(left == right)),
            _ => unreachable!("parser only produces valid binary operators"),
        }
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Logical(logical) = expr else { unreachable!() };

        let left = self.evaluate(&logical.left)?;

        if logical.operator.r#type == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&logical.right)
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Grouping(grouping) = expr else { unreachable!() };
        self.evaluate(&grouping.expr)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Call(call) = expr else { unreachable!() };

        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(native) => native.arity(),
            Object::Class(class) => class.borrow().arity(),
            _ => {
                return Err(RuntimeError {
                    token: call.paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                });
            }
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: call.paren.clone(),
                message: format!("Expected {arity} arguments but got {}.", arguments.len()),
            });
        }

        match &callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(native) => native.call(self, arguments),
            Object::Class(class) => {
                let class = Rc::clone(class);
                let borrowed = class.borrow();
                borrowed.call(self, arguments)
            }
            _ => unreachable!(),
        }
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Get(get) = expr else { unreachable!() };

        let object = self.evaluate(&get.object)?;

        if let Object::Instance(instance) = &object {
            return instance.borrow().get(&get.name, Rc::clone(instance));
        }

        Err(RuntimeError { token: get.name.clone(), message: "Only instances have properties.".to_string() })
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Set(set) = expr else { unreachable!() };

        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = &object else {
            return Err(RuntimeError { token: set.name.clone(), message: "Only instances have fields.".to_string() });
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::This(this) = expr else { unreachable!() };
        self.look_up_variable(this.id, &this.keyword)
    }

    fn visit_super_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Super(super_expr) = expr else { unreachable!() };

        let distance = *self
            .locals
            .get(&super_expr.id)
            .expect("resolver to have recorded a distance for every 'super' expression");

        let superclass = match self.environment.borrow().get_at(distance, &super_expr.keyword)? {
            Object::Class(class) => class,
            _ => unreachable!("'super' always resolves to a class"),
        };

        let this_token = Token::new(Type::This, "this".to_string(), None, super_expr.keyword.line);
        let instance = match self.environment.borrow().get_at(distance - 1, &this_token)? {
            Object::Instance(instance) => instance,
            _ => unreachable!("'this' always resolves to an instance"),
        };

        let method = superclass.borrow().find_method(&super_expr.method.lexeme).ok_or_else(|| RuntimeError {
            token: super_expr.method.clone(),
            message: format!("Undefined property '{}'.", super_expr.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl StmtVisitor<Result<Signal, RuntimeError>> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expr)?;
        Ok(Signal::None)
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("write to output sink to succeed");
        Ok(Signal::None)
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(Signal::None)
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::Block(block) = stmt else { unreachable!() };
        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&block.statements, Rc::new(RefCell::new(environment)))
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Signal::None)
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.is_truthy() {
            match self.execute(&data.body)? {
                Signal::None => continue,
                signal => return Ok(signal),
            }
        }

        Ok(Signal::None)
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::Function(data) = stmt else { unreachable!() };

        let function = Function::new(
            data.name.clone(),
            Rc::clone(&data.params),
            Rc::clone(&data.body),
            Rc::clone(&self.environment),
            false,
        );

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(Signal::None)
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        Ok(Signal::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        let Stmt::Class(class_stmt) = stmt else { unreachable!() };

        let superclass = match &class_stmt.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                let Object::Class(class) = value else {
                    let Expr::Variable(variable) = expr else { unreachable!() };
                    return Err(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    });
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&class_stmt.name.lexeme, Object::from(Literal::Nil));

        let previous_environment = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass {
            let mut scope = Environment::new(Some(Rc::clone(&self.environment)));
            scope.define("super", Object::from(Rc::clone(superclass)));
            self.environment = Rc::new(RefCell::new(scope));
        }

        let mut methods = HashMap::new();
        for method in &class_stmt.methods {
            let Stmt::Function(data) = method else { unreachable!() };
            let is_initializer = data.name.lexeme == "init";
            let function = Function::new(
                data.name.clone(),
                Rc::clone(&data.params),
                Rc::clone(&data.body),
                Rc::clone(&self.environment),
                is_initializer,
            );
            methods.insert(data.name.lexeme.clone(), function);
        }

        let class = Class::new(class_stmt.name.lexeme.clone(), superclass, methods);

        self.environment = previous_environment;

        self.environment.borrow_mut().assign(&class_stmt.name, Object::from(Rc::new(RefCell::new(class))))?;

        Ok(Signal::None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> String {
        let reporter = ErrorReporter::new();
        let tokens = Scanner::new(source, &reporter).scan_tokens();
        let statements = Parser::new(tokens, &reporter).parse();
        assert!(!reporter.had_error(), "scan/parse error for source: {source}");

        let buffer = crate::SharedBuffer::default();
        let mut interpreter = Interpreter::new(Box::new(buffer.clone()));
        {
            let mut resolver = Resolver::new(&mut interpreter, &reporter);
            resolver.resolve(&statements);
        }
        assert!(!reporter.had_error(), "resolve error for source: {source}");

        interpreter.interpret(&statements, &reporter);

        buffer.contents()
    }

    #[test]
    fn arithmetic_and_print() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run("print \"a\" + \"b\";"), "ab\n");
    }

    #[test]
    fn adding_number_to_string_is_a_runtime_error() {
        let reporter = ErrorReporter::new();
        let tokens = Scanner::new("print \"a\" + 1;", &reporter).scan_tokens();
        let statements = Parser::new(tokens, &reporter).parse();
        let mut interpreter = Interpreter::new(Box::new(Vec::new()));
        {
            let mut resolver = Resolver::new(&mut interpreter, &reporter);
            resolver.resolve(&statements);
        }
        interpreter.interpret(&statements, &reporter);
        assert!(reporter.had_runtime_error());
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let source = "
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }
            var counter = makeCounter();
            print counter();
            print counter();
        ";
        assert_eq!(run(source), "1\n2\n");
    }

    #[test]
    fn classes_support_inheritance_and_super_calls() {
        let source = "
            class Animal {
                speak() {
                    return \"...\";
                }
            }
            class Dog < Animal {
                speak() {
                    return super.speak() + \" woof\";
                }
            }
            print Dog().speak();
        ";
        assert_eq!(run(source), "... woof\n");
    }
}
