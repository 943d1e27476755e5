//! Java-like rendering of type tokens for diagnostics and log output.

use std::fmt;

use crate::{ClassId, RawType, Type, TypeEnv};

/// `Display` adapter produced by [`Type::display`].
pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a Type,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, ty: &'a Type) -> Self {
        Self { env, ty }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self.env, self.ty, f)
    }
}

pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    TypeDisplay::new(env, ty).to_string()
}

fn write_type(env: &dyn TypeEnv, ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        Type::Raw(raw) => write_raw(env, raw, f),
        Type::Parameterized(p) => {
            write_class_name(env, p.raw, f)?;
            f.write_str("<")?;
            for (idx, arg) in p.args.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write_type(env, arg, f)?;
            }
            f.write_str(">")
        }
        Type::Variable(id) => match env.type_param(*id) {
            Some(def) => f.write_str(&def.name),
            None => write!(f, "<unknown type variable #{}>", id.to_raw()),
        },
        Type::Wildcard(w) => {
            if let Some(lower) = w.lower() {
                f.write_str("? super ")?;
                return write_type(env, lower, f);
            }
            if env.well_known().is_object(&w.upper) {
                return f.write_str("?");
            }
            f.write_str("? extends ")?;
            write_type(env, &w.upper, f)
        }
        Type::GenericArray(component) => {
            write_type(env, component, f)?;
            f.write_str("[]")
        }
    }
}

fn write_raw(env: &dyn TypeEnv, raw: &RawType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match raw {
        RawType::Class(id) => write_class_name(env, *id, f),
        RawType::Primitive(p) => f.write_str(p.name()),
        RawType::Array(component) => {
            write_raw(env, component, f)?;
            f.write_str("[]")
        }
    }
}

fn write_class_name(env: &dyn TypeEnv, id: ClassId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match env.class(id) {
        Some(def) => f.write_str(&def.name),
        None => write!(f, "<unknown class #{}>", id.to_raw()),
    }
}
