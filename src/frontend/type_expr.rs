//! Parser for type expressions such as `Optional[Tensor]` or `Tuple[int, shapes.Point]`.
//!
//! ## Grammar
//!
//! ```text
//! type := NAME ( "[" ( type ( "," type )* )? "]" )?
//! NAME := [A-Za-z0-9_.]+
//! ```
//!
//! Builtin spellings and their aliases come from the `classtype_core` vocabulary registries. Any other
//! name is parsed as a [`QualifiedName`] and handed to a [`TypeResolver`].

use std::rc::Rc;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use classtype_core::QualifiedName;
use classtype_core::lang::conventions::SELF_TYPE_NAME;
use classtype_core::lang::types::generics::{self, GenericBaseId};
use classtype_core::lang::types::scalars::{self, ScalarTypeId};

use crate::registry::CompilationUnit;
use crate::types::Type;

/// Generic arguments nested deeper than this are rejected.
pub const MAX_NESTING: usize = 64;

/// Resolves user-defined names appearing in type expressions.
pub trait TypeResolver {
    fn resolve(&self, name: &QualifiedName) -> Option<Type>;
}

impl TypeResolver for CompilationUnit {
    fn resolve(&self, name: &QualifiedName) -> Option<Type> {
        self.get_type(name)
    }
}

impl TypeResolver for Rc<CompilationUnit> {
    fn resolve(&self, name: &QualifiedName) -> Option<Type> {
        self.get_type(name)
    }
}

/// Resolver that knows no user-defined names; only builtins parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinsOnly;

impl TypeResolver for BuiltinsOnly {
    fn resolve(&self, _name: &QualifiedName) -> Option<Type> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TypeExprError {
    #[error("unexpected end of type expression")]
    #[diagnostic(code(classtype::type_expr::unexpected_end))]
    UnexpectedEnd {
        #[source_code]
        src: String,
        #[label("expected {expected}")]
        span: SourceSpan,
        expected: &'static str,
    },

    #[error("unexpected character '{found}' in type expression")]
    #[diagnostic(code(classtype::type_expr::unexpected_char))]
    UnexpectedChar {
        found: char,
        #[source_code]
        src: String,
        #[label("expected {expected}")]
        span: SourceSpan,
        expected: &'static str,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(
        code(classtype::type_expr::unknown_type),
        help("classes and interfaces must be declared before they are used")
    )]
    UnknownType {
        name: String,
        #[source_code]
        src: String,
        #[label("not a builtin or declared type")]
        span: SourceSpan,
    },

    #[error("'{name}' is not a valid type name")]
    #[diagnostic(code(classtype::type_expr::invalid_name))]
    InvalidName {
        name: String,
        #[source_code]
        src: String,
        #[label("empty qualified name atom")]
        span: SourceSpan,
    },

    #[error("'{name}' does not take type arguments")]
    #[diagnostic(code(classtype::type_expr::not_generic))]
    NotGeneric {
        name: String,
        #[source_code]
        src: String,
        #[label("unexpected type arguments")]
        span: SourceSpan,
    },

    #[error("'{name}' expects {expected} type argument(s), found {found}")]
    #[diagnostic(code(classtype::type_expr::arity))]
    Arity {
        name: String,
        expected: usize,
        found: usize,
        #[source_code]
        src: String,
        #[label("wrong number of type arguments")]
        span: SourceSpan,
    },

    #[error("type expression is nested more than {} levels deep", MAX_NESTING)]
    #[diagnostic(code(classtype::type_expr::too_deep))]
    TooDeep {
        #[source_code]
        src: String,
        #[label("nesting limit reached here")]
        span: SourceSpan,
    },
}

/// Parse a complete type expression.
///
/// ## Errors
/// - Malformed syntax, unknown names, or wrong generic arity. Every error carries the source and a span.
pub fn parse_type<R: TypeResolver + ?Sized>(src: &str, resolver: &R) -> Result<Type, TypeExprError> {
    let mut parser = Parser {
        src,
        pos: 0,
        depth: 0,
        resolver,
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if let Some(found) = parser.peek() {
        return Err(TypeExprError::UnexpectedChar {
            found,
            src: src.to_string(),
            span: (parser.pos, found.len_utf8()).into(),
            expected: "end of type expression",
        });
    }
    Ok(ty)
}

struct Parser<'a, R: ?Sized> {
    src: &'a str,
    pos: usize,
    depth: usize,
    resolver: &'a R,
}

impl<'a, R: TypeResolver + ?Sized> Parser<'a, R> {
    fn parse_type(&mut self) -> Result<Type, TypeExprError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(TypeExprError::TooDeep {
                src: self.src.to_string(),
                span: (self.pos, 0).into(),
            });
        }

        self.skip_ws();
        let start = self.pos;
        let name = self.ident()?;
        self.skip_ws();

        let ty = match generics::from_str(name) {
            Some(ctor) => {
                let args = self.type_args()?;
                self.build_generic(ctor, name, args, start)?
            }
            None => {
                if self.peek() == Some('[') {
                    return Err(TypeExprError::NotGeneric {
                        name: name.to_string(),
                        src: self.src.to_string(),
                        span: (self.pos, 1).into(),
                    });
                }
                self.resolve_name(name, start)?
            }
        };

        self.depth -= 1;
        Ok(ty)
    }

    /// `[T, ...]` after a generic constructor. The brackets are required.
    fn type_args(&mut self) -> Result<Vec<Type>, TypeExprError> {
        self.expect('[', "'['")?;
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_type()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(args);
                }
                Some(found) => return Err(self.unexpected_char(found, "',' or ']'")),
                None => return Err(self.unexpected_end("',' or ']'")),
            }
        }
    }

    fn build_generic(
        &self,
        ctor: GenericBaseId,
        name: &str,
        mut args: Vec<Type>,
        start: usize,
    ) -> Result<Type, TypeExprError> {
        if let Some(expected) = generics::info_for(ctor).arity {
            if args.len() != expected {
                return Err(TypeExprError::Arity {
                    name: name.to_string(),
                    expected,
                    found: args.len(),
                    src: self.src.to_string(),
                    span: (start, self.pos - start).into(),
                });
            }
        }
        Ok(match ctor {
            GenericBaseId::Optional => Type::optional(args.remove(0)),
            GenericBaseId::List => Type::list(args.remove(0)),
            GenericBaseId::Tuple => Type::Tuple(args),
        })
    }

    fn resolve_name(&self, name: &str, start: usize) -> Result<Type, TypeExprError> {
        if name == SELF_TYPE_NAME {
            return Ok(Type::SelfType);
        }
        if let Some(id) = scalars::from_str(name) {
            return Ok(scalar_type(id));
        }
        let span: SourceSpan = (start, name.len()).into();
        let qualname: QualifiedName = name.parse().map_err(|_| TypeExprError::InvalidName {
            name: name.to_string(),
            src: self.src.to_string(),
            span,
        })?;
        self.resolver
            .resolve(&qualname)
            .ok_or_else(|| TypeExprError::UnknownType {
                name: name.to_string(),
                src: self.src.to_string(),
                span,
            })
    }

    fn ident(&mut self) -> Result<&'a str, TypeExprError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos > start {
            let src = self.src;
            return Ok(&src[start..self.pos]);
        }
        match self.peek() {
            Some(found) => Err(self.unexpected_char(found, "a type name")),
            None => Err(self.unexpected_end("a type name")),
        }
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), TypeExprError> {
        match self.peek() {
            Some(c) if c == want => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(self.unexpected_char(found, expected)),
            None => Err(self.unexpected_end(expected)),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn unexpected_char(&self, found: char, expected: &'static str) -> TypeExprError {
        TypeExprError::UnexpectedChar {
            found,
            src: self.src.to_string(),
            span: (self.pos, found.len_utf8()).into(),
            expected,
        }
    }

    fn unexpected_end(&self, expected: &'static str) -> TypeExprError {
        TypeExprError::UnexpectedEnd {
            src: self.src.to_string(),
            span: (self.src.len(), 0).into(),
            expected,
        }
    }
}

fn scalar_type(id: ScalarTypeId) -> Type {
    match id {
        ScalarTypeId::Any => Type::Any,
        ScalarTypeId::None => Type::NoneType,
        ScalarTypeId::Bool => Type::Bool,
        ScalarTypeId::Int => Type::Int,
        ScalarTypeId::Float => Type::Float,
        ScalarTypeId::Str => Type::Str,
        ScalarTypeId::Tensor => Type::Tensor,
    }
}
