pub mod expression;
pub mod interpolate;
pub mod method;

#[cfg(test)]
pub mod test;

use crate::ast::{
    Binding, CheckChain, Declaration, Expr, ForInit, Function, Mutation, Program, Spanned, Stmt,
    Store,
};
use crate::error::CompileError;
use crate::lexer::token::{DeclaredType, Quote};
use crate::lexer::vocab::Vocabulary;

use tracing::{debug, instrument};

use std::collections::HashSet;
use std::ops::Range;

/// Runtime preambles the generated text refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub type_shim: bool,
    pub input: bool,
}

impl Features {
    pub fn merge(&mut self, other: Features) {
        self.type_shim |= other.type_shim;
        self.input |= other.input;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub code: String,
    pub features: Features,
}

pub struct JsGenerator<'v> {
    vocab: &'v Vocabulary,
    features: Features,
    /// Names declared with a type anywhere in the program.
    typed_names: HashSet<String>,
}

/// Double-quoted host string literal.
pub fn quote_js(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if (c as u32) < 0x20 => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Collects every name introduced by an annotated declaration, at any
/// nesting depth.
fn collect_typed_names(statements: &[Spanned<Stmt>], names: &mut HashSet<String>) {
    fn typed(declaration: &Declaration, names: &mut HashSet<String>) {
        if declaration.declared.is_some() {
            names.insert(declaration.name.clone());
        }
    }
    for (stmt, _) in statements {
        match stmt {
            Stmt::Declare(declaration) => typed(declaration, names),
            Stmt::For { init, body, .. } => {
                if let ForInit::Declare(declaration) = &init.0 {
                    typed(declaration, names);
                }
                collect_typed_names(body, names);
            }
            Stmt::Check(chain) => {
                collect_typed_names(&chain.primary.body, names);
                for alternate in &chain.alternates {
                    collect_typed_names(&alternate.body, names);
                }
                if let Some(fallback) = &chain.fallback {
                    collect_typed_names(fallback, names);
                }
            }
            Stmt::RepeatRange { body, .. }
            | Stmt::RepeatEach { body, .. }
            | Stmt::RepeatUntil { body, .. } => collect_typed_names(body, names),
            Stmt::Function(function) => collect_typed_names(&function.body, names),
            _ => {}
        }
    }
}

fn binding_keyword(binding: Binding) -> &'static str {
    match binding {
        Binding::Local => "let",
        Binding::Global => "var",
        Binding::Fixed => "const",
    }
}

impl<'v> JsGenerator<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        JsGenerator {
            vocab,
            features: Features::default(),
            typed_names: HashSet::new(),
        }
    }

    #[instrument(skip_all)]
    pub fn generate(mut self, program: &Program) -> Result<Generated, CompileError> {
        collect_typed_names(&program.statements, &mut self.typed_names);
        let code = self.visit_block(&program.statements)?;
        debug!(bytes = code.len(), features = ?self.features, "generated host text");
        Ok(Generated {
            code,
            features: self.features,
        })
    }

    /// Generates a lone expression, as used for interpolation regions.
    pub fn generate_expression(mut self, expr: &Spanned<Expr>) -> Result<Generated, CompileError> {
        let code = self.visit_expr(expr)?;
        Ok(Generated {
            code,
            features: self.features,
        })
    }

    fn visit_block(&mut self, statements: &[Spanned<Stmt>]) -> Result<String, CompileError> {
        let mut lines = Vec::with_capacity(statements.len());
        for statement in statements {
            lines.push(self.visit_stmt(statement)?);
        }
        Ok(lines.join("\n"))
    }

    fn visit_stmt(&mut self, (stmt, span): &Spanned<Stmt>) -> Result<String, CompileError> {
        match stmt {
            Stmt::Declare(declaration) => Ok(format!(
                "{};",
                self.visit_declaration(declaration, span.clone())?
            )),
            Stmt::Store(store) => self.visit_store(store),
            Stmt::Update(mutation) => Ok(format!("{};", self.visit_mutation(mutation)?)),
            Stmt::Check(chain) => self.visit_check(chain),
            Stmt::RepeatRange {
                var,
                start,
                end,
                step,
                body,
            } => self.visit_repeat_range(var, start, end, step, body),
            Stmt::RepeatEach {
                var,
                collection,
                body,
            } => {
                let body = self.visit_block(body)?;
                Ok(format!("for (const {var} of {collection}) {{\n{body}\n}}"))
            }
            Stmt::For {
                init,
                condition,
                increment,
                body,
            } => {
                let init = match &init.0 {
                    ForInit::Declare(declaration) => {
                        self.visit_declaration(declaration, init.1.clone())?
                    }
                    ForInit::Update(mutation) => self.visit_mutation(mutation)?,
                    ForInit::Identifier(name) => name.clone(),
                };
                let condition = self.visit_expr(condition)?;
                let increment = self.visit_mutation(&increment.0)?;
                let body = self.visit_block(body)?;
                Ok(format!(
                    "for ({init}; {condition}; {increment}) {{\n{body}\n}}"
                ))
            }
            Stmt::RepeatUntil { condition, body } => {
                let body = self.visit_block(body)?;
                let condition = self.visit_expr(condition)?;
                Ok(format!("do {{\n{body}\n}} while (!({condition}));"))
            }
            Stmt::Function(function) => self.visit_function(function),
            Stmt::Give(value) => Ok(format!("return {};", self.visit_expr(value)?)),
            Stmt::Show(value) => Ok(format!("console.log({});", self.visit_printed(value)?)),
            Stmt::Error(value) => Ok(format!("console.error({});", self.visit_printed(value)?)),
            Stmt::Panic(value) => Ok(format!(
                "throw new Error(String({}));",
                self.visit_printed(value)?
            )),
            Stmt::Skip => Ok("continue;".to_string()),
            Stmt::Halt => Ok("break;".to_string()),
            Stmt::Raw(code) => Ok(code.clone()),
            Stmt::Expr(expr) => Ok(format!("{};", self.visit_expr(expr)?)),
        }
    }

    fn check_annotation(&self, declaration: &Declaration, span: Range<usize>) -> Result<(), CompileError> {
        let Some((value, _)) = &declaration.value else {
            return Ok(());
        };
        let declared = declaration.declared.as_ref().map(|(ty, _)| *ty);
        match (value, declared) {
            (Expr::Call { name, .. }, None) => Err(CompileError::generate(
                format!(
                    "`{}` is assigned the result of `{}` and needs a declared type",
                    declaration.name, name
                ),
                span,
            )
            .with_note(format!(
                "write `assign {} as <type> = call {}[...];`",
                declaration.name, name
            ))),
            (Expr::Array(_), declared) if declared != Some(DeclaredType::Array) => {
                Err(CompileError::generate(
                    format!(
                        "`{}` is assigned an array literal and must be declared `as array`",
                        declaration.name
                    ),
                    span,
                ))
            }
            _ => Ok(()),
        }
    }

    fn visit_declaration(&mut self, declaration: &Declaration, span: Range<usize>) -> Result<String, CompileError> {
        self.check_annotation(declaration, span.clone())?;

        let keyword = binding_keyword(declaration.binding);
        let name = &declaration.name;
        let value = match (&declaration.declared, &declaration.value) {
            (Some((ty, _)), Some(value)) => {
                self.features.type_shim = true;
                format!(
                    "__epx_register({}, {}, {})",
                    quote_js(name),
                    quote_js(ty.as_str()),
                    self.visit_expr(value)?
                )
            }
            (Some((ty, _)), None) => {
                self.features.type_shim = true;
                format!("__epx_register({}, {})", quote_js(name), quote_js(ty.as_str()))
            }
            // an unannotated redeclaration drops any type registered under
            // the same name elsewhere
            (None, Some(value)) if self.typed_names.contains(name) => {
                self.features.type_shim = true;
                format!("__epx_forget({}, {})", quote_js(name), self.visit_expr(value)?)
            }
            (None, Some(value)) => self.visit_expr(value)?,
            (None, None) => {
                return Err(CompileError::generate(
                    format!("declaration of `{name}` has neither a type nor a value"),
                    span,
                ));
            }
        };
        Ok(format!("{keyword} {name} = {value}"))
    }

    fn visit_store(&mut self, store: &Store) -> Result<String, CompileError> {
        let keyword = binding_keyword(store.binding);
        let value = if store.quote == Quote::Backtick {
            let offset = store.text_span.start + 1;
            interpolate::reject_bare_calls(&store.text, offset)?;
            self.interpolate(&store.text, offset)?
        } else {
            quote_js(&store.text)
        };
        Ok(format!("{keyword} {} = {value};", store.name))
    }

    /// `show`/`error`/`panic` argument; string literals carrying `[ ]`
    /// regions go through interpolation.
    fn visit_printed(&mut self, value: &Spanned<Expr>) -> Result<String, CompileError> {
        match value {
            (Expr::Str(text, _), span) if text.contains('[') => {
                self.interpolate(text, span.start + 1)
            }
            _ => self.visit_expr(value),
        }
    }

    fn visit_mutation(&mut self, mutation: &Mutation) -> Result<String, CompileError> {
        let target = &mutation.target;
        let value = self.visit_expr(&mutation.value)?;
        if mutation.indices.is_empty() {
            self.features.type_shim = true;
            return Ok(format!(
                "{target} = __epx_validate({}, {value})",
                quote_js(target)
            ));
        }

        let mut place = target.clone();
        for index in &mutation.indices {
            place.push_str(&format!("[{}]", self.visit_expr(index)?));
        }
        Ok(format!("{place} = {value}"))
    }

    fn visit_check(&mut self, chain: &CheckChain) -> Result<String, CompileError> {
        let mut code = format!(
            "if ({}) {{\n{}\n}}",
            self.visit_expr(&chain.primary.condition)?,
            self.visit_block(&chain.primary.body)?
        );

        for alternate in &chain.alternates {
            code.push_str(&format!(
                " else if ({}) {{\n{}\n}}",
                self.visit_expr(&alternate.condition)?,
                self.visit_block(&alternate.body)?
            ));
        }

        if let Some(fallback) = &chain.fallback {
            code.push_str(&format!(" else {{\n{}\n}}", self.visit_block(fallback)?));
        }

        Ok(code)
    }

    /// Each clause re-evaluates the direction test, so the one loop shape
    /// walks up when `start <= end` and down otherwise.
    fn visit_repeat_range(
        &mut self,
        var: &str,
        start: &Spanned<Expr>,
        end: &Spanned<Expr>,
        step: &Spanned<Expr>,
        body: &[Spanned<Stmt>],
    ) -> Result<String, CompileError> {
        let start = self.visit_expr(start)?;
        let end = self.visit_expr(end)?;
        let step = self.visit_expr(step)?;
        let body = self.visit_block(body)?;

        let ascending = format!("({start} <= {end})");
        Ok(format!(
            "for (let {var} = {ascending} ? {start} : {start}; \
             {ascending} ? {var} <= {end} : {var} >= {end}; \
             {var} += {ascending} ? Math.abs({step}) : -Math.abs({step})) {{\n{body}\n}}"
        ))
    }

    fn visit_function(&mut self, function: &Function) -> Result<String, CompileError> {
        let name = &function.name;
        let params = function.params.join(", ");
        let body = self.visit_block(&function.body)?;

        let Some((return_type, _)) = &function.return_type else {
            return Ok(format!("function {name}({params}) {{\n{body}\n}}"));
        };
        self.features.type_shim = true;
        Ok(format!(
            "function {name}({params}) {{\nreturn __epx_returns({}, {}, (() => {{\n{body}\n}})());\n}}",
            quote_js(name),
            quote_js(return_type.as_str())
        ))
    }

    /// Turns template text into a host template literal, compiling each
    /// `[ ]` region on its own.
    fn interpolate(&mut self, text: &str, offset: usize) -> Result<String, CompileError> {
        let mut template = String::from("`");
        for segment in interpolate::split_regions(text, offset)? {
            match segment {
                interpolate::Segment::Text(text) => {
                    template.push_str(&interpolate::escape_template(&text))
                }
                interpolate::Segment::Region { source, offset } => {
                    let fragment = interpolate::compile_region(self.vocab, &source, offset)?;
                    self.features.merge(fragment.features);
                    template.push_str("${");
                    template.push_str(&fragment.code);
                    template.push('}');
                }
            }
        }
        template.push('`');
        Ok(template)
    }
}
