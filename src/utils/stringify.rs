//! Safe value rendering for log lines.
//!
//! [`stringify`] renders any serializable value as JSON and degrades to the
//! `Debug` rendering when serialization fails, so rendering a log payload
//! can never fail or panic. [`stringify_error`] renders error values as a
//! `{"name", "message"}` object.

use std::fmt::{Debug, Display};

use serde::Serialize;

/// Renders `target` as JSON, falling back to its `Debug` form.
///
/// Serialization can fail for values such as maps with non-string keys or
/// `Serialize` impls that refuse self-referential graphs; those values are
/// rendered with `{:?}` instead of propagating the error.
#[must_use]
pub fn stringify<T>(target: &T) -> String
where
    T: Serialize + Debug + ?Sized,
{
    serde_json::to_string(target).unwrap_or_else(|err| {
        tracing::trace!(error = %err, "payload not serializable, using Debug rendering");
        format!("{target:?}")
    })
}

#[derive(Serialize)]
struct ErrorShape<'a> {
    name: &'a str,
    message: String,
}

/// Renders an error value as a JSON object with `name` and `message`.
///
/// `name` is the short type name of `E` (module path and generic arguments
/// stripped), `message` is its `Display` output. Every error type gets this
/// shape, plain values included: `E = String` renders as
/// `{"name":"String","message":"boom"}`, not as `"boom"`. Boxed trait
/// objects report the box, so `Box<dyn Error>` is named `Box`.
#[must_use]
pub fn stringify_error<E>(error: &E) -> String
where
    E: Display + ?Sized,
{
    let shape = ErrorShape {
        name: short_type_name::<E>(),
        message: error.to_string(),
    };
    // A struct of two strings always serializes.
    serde_json::to_string(&shape).unwrap_or_else(|_| format!("{}: {}", shape.name, shape.message))
}

/// Returns the last path segment of `T`'s type name, without generics.
///
/// `std::io::error::Error` becomes `Error`,
/// `core::option::Option<alloc::string::String>` becomes `Option`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let base = base.trim_start_matches('&').trim_start_matches("mut ").trim();
    base.rsplit("::").next().unwrap_or(base)
}
