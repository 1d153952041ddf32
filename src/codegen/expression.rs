use crate::ast::{Expr, MethodCall, Spanned, UnOp};
use crate::codegen::method::{self, Lowering};
use crate::codegen::{JsGenerator, quote_js};
use crate::error::CompileError;

use std::ops::Range;

impl JsGenerator<'_> {
    pub(crate) fn visit_expr(&mut self, (expr, span): &Spanned<Expr>) -> Result<String, CompileError> {
        match expr {
            Expr::Number(n) => Ok(format!("{n}")),
            Expr::Str(text, _) => Ok(quote_js(text)),
            Expr::Bool(b) => Ok(b.to_string()),
            Expr::Null => Ok("null".to_string()),
            Expr::Undefined => Ok("undefined".to_string()),
            Expr::Input => {
                self.features.input = true;
                Ok("__epx_input()".to_string())
            }
            Expr::Identifier(name) => Ok(name.clone()),
            Expr::Index { target, index } => Ok(format!(
                "{}[{}]",
                self.visit_expr(target)?,
                self.visit_expr(index)?
            )),
            Expr::Call { name, args } => {
                Ok(format!("{name}({})", self.visit_args(args)?.join(", ")))
            }
            Expr::Array(elements) => Ok(format!("[{}]", self.visit_args(elements)?.join(", "))),
            Expr::Lambda { params, body } => Ok(format!(
                "(({}) => {})",
                params.join(", "),
                self.visit_expr(body)?
            )),
            Expr::Method(call) => self.visit_method(call, span.clone()),
            Expr::BinOp {
                operator,
                l_value,
                r_value,
            } => Ok(format!(
                "({} {} {})",
                self.visit_expr(l_value)?,
                self.vocab.host_operator(*operator),
                self.visit_expr(r_value)?
            )),
            Expr::UnOp { unop, expression } => {
                let sign = match unop {
                    UnOp::Minus => "-",
                    UnOp::Plus => "+",
                };
                Ok(format!("({sign}{})", self.visit_expr(expression)?))
            }
        }
    }

    fn visit_args(&mut self, args: &[Spanned<Expr>]) -> Result<Vec<String>, CompileError> {
        args.iter().map(|arg| self.visit_expr(arg)).collect()
    }

    /// Lowers a method dispatch through the fixed per-type table.
    fn visit_method(&mut self, call: &MethodCall, span: Range<usize>) -> Result<String, CompileError> {
        let (target_type, _) = &call.target_type;
        let (name, name_span) = &call.method;

        let Some(entry) = method::lookup(*target_type, name) else {
            let available = method::names_for(*target_type);
            let note = if available.is_empty() {
                "method dispatch is available for `array` and `string` targets".to_string()
            } else {
                format!("`{}` supports: {}", target_type, available.join(", "))
            };
            return Err(CompileError::generate(
                format!("unknown method `{name}` for target type `{target_type}`"),
                name_span.clone(),
            )
            .with_note(note));
        };

        if call.args.len() != entry.arity {
            return Err(CompileError::generate(
                format!(
                    "method `{}` on `{}` takes {} argument{} but {} {} given",
                    name,
                    target_type,
                    entry.arity,
                    if entry.arity == 1 { "" } else { "s" },
                    call.args.len(),
                    if call.args.len() == 1 { "was" } else { "were" },
                ),
                span,
            ));
        }

        match entry.lowering {
            Lowering::Template(template) => {
                let args = self.visit_args(&call.args)?;
                Ok(method::render(template, &call.target, &args))
            }
            Lowering::Lambda(template) => {
                let (argument, argument_span) = &call.args[0];
                if !matches!(argument, Expr::Lambda { .. }) {
                    return Err(CompileError::generate(
                        format!("method `{name}` on `{target_type}` expects a lambda argument"),
                        argument_span.clone(),
                    )
                    .with_note("write a lambda such as `[x] -> x * 2`"));
                }
                let args = self.visit_args(&call.args)?;
                Ok(method::render(template, &call.target, &args))
            }
            Lowering::Slice => {
                let (argument, argument_span) = &call.args[0];
                let notation = match argument {
                    Expr::Str(text, _) => method::decode_slice(text),
                    _ => None,
                };
                let Some(notation) = notation else {
                    return Err(CompileError::generate(
                        format!("malformed slice notation for `{name}` on `{target_type}`"),
                        argument_span.clone(),
                    )
                    .with_note("use a string literal such as \"2:5\", \"::2\" or \"::-1\""));
                };
                Ok(method::lower_slice(*target_type, &call.target, notation))
            }
        }
    }
}
