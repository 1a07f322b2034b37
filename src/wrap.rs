//! Call wrapper contract shared by [`Loggable`](crate::Loggable) and
//! [`Monitorable`](crate::Monitorable).
//!
//! A wrapper implements [`Lifecycle`]: `enter` runs before the original
//! method, then exactly one of `succeeded` / `failed` runs once the method
//! settles. [`invoke`] drives synchronous methods and [`invoke_async`]
//! drives methods that return a future. Both hand back the original
//! `Ok` value or `Err` value untouched.

use std::fmt;
use std::future::Future;

use crate::error::DecorateError;

// ============================================================================
// Targets
// ============================================================================

/// Kind of type member a wrapper is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A callable method.
    Method,
    /// A data field or property.
    Field,
}

/// The member a wrapper is applied to.
///
/// Rust has no class metadata to introspect, so the owner type name is
/// supplied explicitly when the wrapper is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    owner: Option<String>,
    member: String,
    kind: MemberKind,
}

impl Target {
    /// A method `member` declared on type `owner`.
    pub fn method(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            member: member.into(),
            kind: MemberKind::Method,
        }
    }

    /// A field `member` declared on type `owner`.
    pub fn field(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            member: member.into(),
            kind: MemberKind::Field,
        }
    }

    /// A free-standing function with no owner type.
    pub fn detached(member: impl Into<String>) -> Self {
        Self {
            owner: None,
            member: member.into(),
            kind: MemberKind::Method,
        }
    }

    /// Checks that this target is a method of a named type.
    ///
    /// # Errors
    ///
    /// Returns [`DecorateError::UnsupportedTarget`] for fields, targets
    /// without an owner type, and empty names.
    pub fn validate(self, decorator: &'static str) -> Result<MethodTarget, DecorateError> {
        let owner = match (&self.kind, self.owner.as_deref()) {
            (MemberKind::Method, Some(owner)) if !owner.is_empty() && !self.member.is_empty() => {
                owner.to_string()
            }
            _ => {
                return Err(DecorateError::UnsupportedTarget {
                    decorator,
                    target: self.to_string(),
                });
            }
        };
        Ok(MethodTarget {
            class_name: owner,
            method_name: self.member,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            MemberKind::Method => "method",
            MemberKind::Field => "field",
        };
        match self.owner.as_deref() {
            Some(owner) => write!(f, "{kind} {owner}::{}", self.member),
            None => write!(f, "{kind} {} without owner type", self.member),
        }
    }
}

/// A validated method target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTarget {
    /// Name of the type declaring the method.
    pub class_name: String,
    /// Name of the method.
    pub method_name: String,
}

impl fmt::Display for MethodTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class_name, self.method_name)
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Hooks a wrapper runs around one invocation of the original method.
pub trait Lifecycle<A, T, E> {
    /// Per-invocation state handed from `enter` to the settlement hook.
    type Context;

    /// Runs synchronously before the original method is called.
    fn enter(&self, args: &A) -> Self::Context;

    /// Runs when the future returned by [`invoke_async`] is first polled,
    /// before the original future is polled.
    fn first_poll(&self, _cx: &Self::Context) {}

    /// Runs once the original method returned `Ok(value)`.
    fn succeeded(&self, cx: Self::Context, value: &T);

    /// Runs once the original method returned `Err(error)`.
    fn failed(&self, cx: Self::Context, error: &E);
}

/// Calls a synchronous method through `hooks`.
///
/// # Errors
///
/// Returns the original method's error unchanged.
pub fn invoke<L, A, T, E, F>(hooks: &L, args: A, f: F) -> Result<T, E>
where
    L: Lifecycle<A, T, E> + ?Sized,
    F: FnOnce(A) -> Result<T, E>,
{
    let cx = hooks.enter(&args);
    settle::<L, A, T, E>(hooks, cx, f(args))
}

/// Calls an asynchronous method through `hooks`.
///
/// `enter` and the original method run immediately, at the call site.
/// `first_poll` runs once the caller starts awaiting. The settlement hook
/// runs when the returned future observes the original future's output,
/// which it then yields unchanged.
pub fn invoke_async<L, A, T, E, F, Fut>(
    hooks: &L,
    args: A,
    f: F,
) -> impl Future<Output = Result<T, E>>
where
    L: Lifecycle<A, T, E> + ?Sized,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let cx = hooks.enter(&args);
    let pending = f(args);
    async move {
        hooks.first_poll(&cx);
        settle::<L, A, T, E>(hooks, cx, pending.await)
    }
}

fn settle<L, A, T, E>(hooks: &L, cx: L::Context, outcome: Result<T, E>) -> Result<T, E>
where
    L: Lifecycle<A, T, E> + ?Sized,
{
    match &outcome {
        Ok(value) => hooks.succeeded(cx, value),
        Err(error) => hooks.failed(cx, error),
    }
    outcome
}
