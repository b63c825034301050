// AST (Abstract Syntax Tree) definitions for the minic front end

use serde::Serialize;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    /// Byte offset into the source text
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Declared type of a variable or function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Type {
    Int,
    Double,
    Str,
    Const(Box<Type>),
}

impl Type {
    pub fn with_const(self) -> Self {
        Type::Const(Box::new(self))
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Operators of `x op= value;` statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
        }
    }
}

/// Call of a named function or builtin: `name(args)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub callee: String,
    pub args: Vec<Expr>,
    pub location: SourceLocation,
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Number(f64, SourceLocation),
    String(String, SourceLocation),
    Identifier(String, SourceLocation),
    Call(Call),
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Number(_, loc) => loc,
            Expr::String(_, loc) => loc,
            Expr::Identifier(_, loc) => loc,
            Expr::Call(call) => &call.location,
            Expr::BinOp { location, .. } => location,
        }
    }
}

/// Variable declaration, with or without initializer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    VarDecl {
        ty: Type,
        name: String,
        location: SourceLocation,
    },
    VarDeclAssign {
        ty: Type,
        name: String,
        value: Expr,
        location: SourceLocation,
    },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::VarDecl { name, .. } | Declaration::VarDeclAssign { name, .. } => name,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Declaration::VarDecl { ty, .. } | Declaration::VarDeclAssign { ty, .. } => ty,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Declaration::VarDecl { location, .. }
            | Declaration::VarDeclAssign { location, .. } => location,
        }
    }
}

/// Braced statement list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Declaration(Declaration),
    Assign {
        name: String,
        value: Expr,
        location: SourceLocation,
    },
    CompoundAssign {
        name: String,
        op: AssignOp,
        value: Expr,
        location: SourceLocation,
    },
    ExprStmt(Expr),
    Return {
        value: Expr,
        location: SourceLocation,
    },
    Block(Block),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        location: SourceLocation,
    },
    IfElse {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    FuncCall(Call),
}

impl Stmt {
    /// Get the source location of this statement
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::Declaration(decl) => decl.location(),
            Stmt::Assign { location, .. } => location,
            Stmt::CompoundAssign { location, .. } => location,
            Stmt::ExprStmt(expr) => expr.location(),
            Stmt::Return { location, .. } => location,
            Stmt::Block(block) => &block.location,
            Stmt::If { location, .. } => location,
            Stmt::IfElse { location, .. } => location,
            Stmt::While { location, .. } => location,
            Stmt::Break { location } => location,
            Stmt::FuncCall(call) => &call.location,
        }
    }
}

/// Function definition: `type name() { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub return_type: Type,
    pub name: String,
    pub body: Block,
    pub location: SourceLocation,
}

/// Top-level item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Item {
    Function(FunctionDecl),
    Declaration(Declaration),
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(func) => Some(func),
            Item::Declaration(_) => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().find(|func| func.name == name)
    }
}

// ===== S-expression rendering =====

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Double => write!(f, "double"),
            Type::Str => write!(f, "str"),
            Type::Const(inner) => write!(f, "(const {})", inner),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(call {}", self.callee)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n, _) => write!(f, "{}", n),
            Expr::String(s, _) => write!(f, "{:?}", s),
            Expr::Identifier(name, _) => write!(f, "{}", name),
            Expr::Call(call) => write!(f, "{}", call),
            Expr::BinOp {
                op, left, right, ..
            } => write!(f, "({} {} {})", op, left, right),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::VarDecl { ty, name, .. } => write!(f, "(declare {} {})", ty, name),
            Declaration::VarDeclAssign {
                ty, name, value, ..
            } => write!(f, "(declare {} {} {})", ty, name, value),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(block")?;
        for stmt in &self.statements {
            write!(f, " {}", stmt)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Declaration(decl) => write!(f, "{}", decl),
            Stmt::Assign { name, value, .. } => write!(f, "(assign {} {})", name, value),
            Stmt::CompoundAssign {
                name, op, value, ..
            } => write!(f, "(assign{} {} {})", op.symbol(), name, value),
            Stmt::ExprStmt(expr) => write!(f, "(expr {})", expr),
            Stmt::Return { value, .. } => write!(f, "(return {})", value),
            Stmt::Block(block) => write!(f, "{}", block),
            Stmt::If {
                condition,
                then_branch,
                ..
            } => write!(f, "(if {} {})", condition, then_branch),
            Stmt::IfElse {
                condition,
                then_branch,
                else_branch,
                ..
            } => write!(f, "(if {} {} {})", condition, then_branch, else_branch),
            Stmt::While {
                condition, body, ..
            } => write!(f, "(while {} {})", condition, body),
            Stmt::Break { .. } => write!(f, "(break)"),
            Stmt::FuncCall(call) => write!(f, "{}", call),
        }
    }
}

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(function {} {} {})", self.return_type, self.name, self.body)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Function(func) => write!(f, "{}", func),
            Item::Declaration(decl) => write!(f, "{}", decl),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(program")?;
        for item in &self.items {
            write!(f, " {}", item)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Expr {
        Expr::Number(n, SourceLocation::default())
    }

    #[test]
    fn test_nested_const_display() {
        let ty = Type::Double.with_const().with_const();
        assert_eq!(ty, Type::Const(Box::new(Type::Const(Box::new(Type::Double)))));
        assert_eq!(ty.to_string(), "(const (const double))");
    }

    #[test]
    fn test_expr_display() {
        let expr = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(num(1.0)),
            right: Box::new(Expr::BinOp {
                op: BinOp::Mul,
                left: Box::new(num(2.5)),
                right: Box::new(Expr::Identifier("x".to_string(), SourceLocation::default())),
                location: SourceLocation::default(),
            }),
            location: SourceLocation::default(),
        };
        assert_eq!(expr.to_string(), "(+ 1 (* 2.5 x))");
    }

    #[test]
    fn test_compound_assign_display() {
        let stmt = Stmt::CompoundAssign {
            name: "i".to_string(),
            op: AssignOp::Sub,
            value: num(2.0),
            location: SourceLocation::default(),
        };
        assert_eq!(stmt.to_string(), "(assign-= i 2)");
    }
}
