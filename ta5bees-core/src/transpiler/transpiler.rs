use crate::{
    environment::prelude::format_number,
    parser::prelude::{
        ArrowBody, ArrowFunction, Binary, Block, ElseBranch, Expression, ForInit, ForStatement,
        FunctionDeclaration, IfStatement, Member, ObjectLiteral, Precedence, Primitive, Program,
        Statement, TryCatchStatement, VariableDeclaration
    }
};

use super::{builder::CodeBuilder, source_map::SourceMap};

/// Evaluator built-ins and the JavaScript globals they stand for.
const REWRITES: [(&str, &str); 2] = [
    ("gool", "console.log"),
    ("jeeb", "fetch")
];

#[derive(Debug, Clone, PartialEq)]
pub struct TranspileOptions {
    pub source_map: bool,
    pub source_name: String
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            source_map: false,
            source_name: "main.ta5bees".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transpiled {
    pub code: String,
    pub source_map: Option<SourceMap>
}

/// Re-prints `program` as JavaScript.
pub fn transpile(program: &Program, options: &TranspileOptions) -> Transpiled {
    let mut transpiler = Transpiler::new(CodeBuilder::new());

    for (index, statement) in program.body.iter().enumerate() {
        if index > 0 {
            transpiler.builder.blank();
        }

        transpiler.transpile_statement(statement);
    }

    let (code, mappings) = transpiler.builder.finish();

    log::debug!("transpiled {} statements into {} mappings", program.body.len(), mappings.len());

    Transpiled {
        code,
        source_map: options.source_map.then(|| SourceMap::new(options.source_name.clone(), mappings))
    }
}

struct Transpiler {
    builder: CodeBuilder
}

impl Transpiler {
    fn new(builder: CodeBuilder) -> Self {
        Self { builder }
    }

    fn transpile_block(&mut self, block: &Block) {
        self.builder.indent();

        for statement in block.iter() {
            self.transpile_statement(statement);
        }

        self.builder.dedent();
    }

    fn transpile_statement(&mut self, statement: &Statement) {
        let origin = Some(statement.location());

        match statement {
            Statement::VariableDeclaration(declaration) => {
                let line = format!("{};", self.transpile_declaration(declaration));
                self.builder.line(line, origin);
            },
            Statement::FunctionDeclaration(function) => self.transpile_function(function),
            Statement::If(if_) => {
                let head = format!("if ({}) {{", self.transpile_expression(&if_.test));
                self.builder.line(head, origin);
                self.transpile_if_tail(if_);
            },
            Statement::For(for_) => self.transpile_for(for_),
            Statement::TryCatch(try_) => self.transpile_try(try_),
            Statement::Return(return_) => {
                let line = match &return_.argument {
                    Some(argument) => format!("return {};", self.transpile_expression(argument)),
                    None => "return;".to_string()
                };
                self.builder.line(line, origin);
            },
            Statement::Throw(throw) => {
                let line = format!("throw {};", self.transpile_expression(&throw.argument));
                self.builder.line(line, origin);
            },
            Statement::Break { .. } => self.builder.line("break;", origin),
            Statement::Continue { .. } => self.builder.line("continue;", origin),
            Statement::Expression(expression) => {
                let text = self.transpile_expression(expression);

                // a leading brace would open a block
                let line = if matches!(expression, Expression::Object(_)) {
                    format!("({text});")
                } else {
                    format!("{text};")
                };

                self.builder.line(line, origin);
            }
        }
    }

    fn transpile_declaration(&self, declaration: &VariableDeclaration) -> String {
        let keyword = if declaration.constant { "const" } else { "let" };

        match &declaration.value {
            Some(value) => format!("{keyword} {} = {}", declaration.name.value, self.transpile_expression(value)),
            None => format!("{keyword} {}", declaration.name.value)
        }
    }

    fn transpile_function(&mut self, function: &FunctionDeclaration) {
        let parameters = function.parameters.iter()
            .map(|parameter| parameter.value.as_str())
            .collect::<Vec<&str>>()
            .join(", ");

        let keyword = if function.is_async { "async function" } else { "function" };

        self.builder.line(
            format!("{keyword} {}({parameters}) {{", function.name.value),
            Some(function.location)
        );
        self.transpile_block(&function.body);
        self.builder.line("}", None);
    }

    /// Consequent block and the `else` chain of an `if` whose head is
    /// already written.
    fn transpile_if_tail(&mut self, if_: &IfStatement) {
        self.transpile_block(&if_.consequent);

        match &if_.alternate {
            None => self.builder.line("}", None),
            Some(ElseBranch::Block(block)) => {
                self.builder.line("} else {", None);
                self.transpile_block(block);
                self.builder.line("}", None);
            },
            Some(ElseBranch::If(nested)) => {
                let head = format!("}} else if ({}) {{", self.transpile_expression(&nested.test));
                self.builder.line(head, Some(nested.location));
                self.transpile_if_tail(nested);
            }
        }
    }

    fn transpile_for(&mut self, for_: &ForStatement) {
        let init = match &for_.init {
            Some(ForInit::Declaration(declaration)) => self.transpile_declaration(declaration),
            Some(ForInit::Expression(expression)) => self.transpile_expression(expression),
            None => String::new()
        };

        let clause = |expression: &Option<Expression>| match expression {
            Some(expression) => format!(" {}", self.transpile_expression(expression)),
            None => String::new()
        };

        let head = format!("for ({init};{};{}) {{", clause(&for_.test), clause(&for_.update));

        self.builder.line(head, Some(for_.location));
        self.transpile_block(&for_.body);
        self.builder.line("}", None);
    }

    fn transpile_try(&mut self, try_: &TryCatchStatement) {
        self.builder.line("try {", Some(try_.location));
        self.transpile_block(&try_.body);
        self.builder.line(format!("}} catch ({}) {{", try_.parameter.value), None);
        self.transpile_block(&try_.handler);
        self.builder.line("}", None);
    }

    fn transpile_expression(&self, expression: &Expression) -> String {
        match expression {
            Expression::Identifier(identifier) => REWRITES.iter()
                .find(|(name, _)| *name == identifier.value)
                .map(|(_, target)| target.to_string())
                .unwrap_or_else(|| identifier.value.clone()),
            Expression::Primitive(Primitive::Number { value, .. }) => format_number(*value),
            Expression::Primitive(Primitive::String { value, .. }) => quote(value),
            Expression::Binary(binary) => self.transpile_binary(binary),
            Expression::Assignment(assignment) => format!(
                "{} = {}",
                self.transpile_expression(&assignment.assignee),
                self.transpile_expression(&assignment.value)
            ),
            Expression::Call(call) => {
                let arguments = call.arguments.iter()
                    .map(|argument| self.transpile_expression(argument))
                    .collect::<Vec<String>>();

                format!("{}({})", self.transpile_callee(&call.callee), arguments.join(", "))
            },
            Expression::Member(member) => self.transpile_member(member),
            Expression::Array(array) => {
                let elements = array.elements.iter()
                    .map(|element| self.transpile_expression(element))
                    .collect::<Vec<String>>();

                format!("[{}]", elements.join(", "))
            },
            Expression::Object(object) => self.transpile_object(object),
            Expression::ArrowFunction(arrow) => self.transpile_arrow(arrow),
            Expression::Await(await_) => format!("await {}", self.transpile_callee(&await_.argument)),
            Expression::AsyncWrap(wrap) => match wrap.argument.as_ref() {
                Expression::ArrowFunction(arrow) => format!("async {}", self.transpile_arrow(arrow)),
                other => format!("(async () => {})()", self.transpile_arrow_result(other))
            }
        }
    }

    fn transpile_binary(&self, binary: &Binary) -> String {
        let operand = |operand: &Expression, is_right: bool| {
            let text = self.transpile_expression(operand);

            if binary.needs_parens(operand, is_right) || splits_in_js(binary, operand) {
                format!("({text})")
            } else {
                text
            }
        };

        format!(
            "{} {} {}",
            operand(&binary.left, false),
            binary.operator.as_literal(),
            operand(&binary.right, true)
        )
    }

    /// Operand of a call, member access or `await`.
    fn transpile_callee(&self, expression: &Expression) -> String {
        let text = self.transpile_expression(expression);

        if expression.precedence() < Precedence::Call {
            format!("({text})")
        } else {
            text
        }
    }

    fn transpile_member(&self, member: &Member) -> String {
        let object = self.transpile_callee(&member.object);

        match member.property.as_ref() {
            Expression::Identifier(property) if !member.computed => format!("{object}.{}", property.value),
            property => format!("{object}[{}]", self.transpile_expression(property))
        }
    }

    fn transpile_object(&self, object: &ObjectLiteral) -> String {
        if object.properties.is_empty() {
            return "{}".to_string();
        }

        let properties = object.properties.iter()
            .map(|property| {
                let key = if is_identifier(&property.key) {
                    property.key.clone()
                } else {
                    quote(&property.key)
                };

                format!("{key}: {}", self.transpile_expression(&property.value))
            })
            .collect::<Vec<String>>();

        format!("{{ {} }}", properties.join(", "))
    }

    fn transpile_arrow(&self, arrow: &ArrowFunction) -> String {
        let parameters = arrow.parameters.iter()
            .map(|parameter| parameter.value.as_str())
            .collect::<Vec<&str>>()
            .join(", ");

        match &arrow.body {
            ArrowBody::Expression(body) => format!("({parameters}) => {}", self.transpile_arrow_result(body)),
            ArrowBody::Block(block) if block.is_empty() => format!("({parameters}) => {{}}"),
            ArrowBody::Block(block) => {
                let depth = self.builder.depth();
                let mut nested = Transpiler::new(CodeBuilder::nested(depth + 1));

                for statement in block.iter() {
                    nested.transpile_statement(statement);
                }

                format!(
                    "({parameters}) => {{\n{}\n{}}}",
                    nested.builder.code(),
                    CodeBuilder::padding(depth)
                )
            }
        }
    }

    /// Expression body of an arrow; object literals need parentheses there.
    fn transpile_arrow_result(&self, expression: &Expression) -> String {
        let text = self.transpile_expression(expression);

        if matches!(expression, Expression::Object(_)) {
            format!("({text})")
        } else {
            text
        }
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        },
        _ => false
    }
}

/// JavaScript ranks `&&` above `||` and relational operators above
/// equality, where the source language gives each pair one
/// left-associative level. A same-level operand with another operator
/// keeps its grouping only in parentheses.
fn splits_in_js(parent: &Binary, operand: &Expression) -> bool {
    let Expression::Binary(operand) = operand else {
        return false;
    };
    let level = Precedence::from(&parent.operator);

    matches!(level, Precedence::Logical | Precedence::Comparison)
        && Precedence::from(&operand.operator) == level
        && operand.operator != parent.operator
}
