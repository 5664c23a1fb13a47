// ioc/src/annotation.rs

//! Fallback dependency lookup through `@param` lines in a documentation block.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAM_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)@param\s*(?P<type>\S*)\s*\$(?P<name>\S*)")
    .expect("annotation pattern is valid")
});

// Type names that never name a resolvable service.
const PRIMITIVES: &[&str] = &[
  "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
  "u64", "u128", "usize", "f32", "f64", "int", "integer", "float", "double", "string", "boolean",
  "array", "mixed", "callable", "iterable", "object", "null", "void",
];

/// A single `@param <type> $<name>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParamAnnotation<'a> {
  pub(crate) type_name: &'a str,
  pub(crate) name: &'a str,
}

/// Collects every `@param` annotation in `doc`, in order of appearance.
pub(crate) fn parse(doc: &str) -> Vec<ParamAnnotation<'_>> {
  PARAM_ANNOTATION
    .captures_iter(doc)
    .filter_map(|caps| {
      Some(ParamAnnotation {
        type_name: caps.name("type")?.as_str(),
        name: caps.name("name")?.as_str(),
      })
    })
    .collect()
}

/// The annotated type for `parameter`, taken from the first matching line.
pub(crate) fn annotated_type<'a>(
  annotations: &[ParamAnnotation<'a>],
  parameter: &str,
) -> Option<&'a str> {
  annotations
    .iter()
    .find(|annotation| annotation.name == parameter)
    .map(|annotation| annotation.type_name)
}

/// Whether `type_name` could name a registered service.
pub(crate) fn is_resolvable(type_name: &str) -> bool {
  !type_name.is_empty() && !PRIMITIVES.contains(&type_name)
}
