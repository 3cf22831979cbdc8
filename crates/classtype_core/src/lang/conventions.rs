//! Naming conventions shared by the type parser and renderers.

/// Spelling of the receiver type inside method signatures.
pub const SELF_TYPE_NAME: &str = "Self";

/// Conventional name of the receiver argument of a method.
pub const SELF_ARG_NAME: &str = "self";

/// Separator between the atoms of a qualified name.
pub const QUALIFIED_NAME_SEPARATOR: char = '.';

/// Display name used for classes created without a qualified name.
pub const ANONYMOUS_CLASS_NAME: &str = "<anonymous class>";
