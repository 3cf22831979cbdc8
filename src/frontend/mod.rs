//! Declaration front end
//!
//! - `type_expr`: parsing type expressions against builtins and declared names
//! - `declarations`: loading JSON declaration files into a compilation unit

pub mod declarations;
pub mod type_expr;

pub use declarations::{Check, CheckOutcome, DeclError, Declarations, load_declarations};
pub use type_expr::{BuiltinsOnly, TypeExprError, TypeResolver, parse_type};
