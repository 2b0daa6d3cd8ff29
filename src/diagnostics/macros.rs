//! Diagnostic macros.

/// Emit a predefined diagnostic by code.
///
/// # Example
///
/// ```rust,ignore
/// fl_emit!(FL005);
/// ```
#[macro_export]
macro_rules! fl_emit {
    ($code:ident) => {{
        $crate::diagnostics::emit::emit(&$crate::diagnostics::$code);
    }};
}

/// Emit a predefined diagnostic with the current thread captured against
/// the thread the caller is confined to.
///
/// # Example
///
/// ```rust,ignore
/// fl_emit_ctx!(FL001, self.owner, self.is_frozen());
/// ```
#[macro_export]
macro_rules! fl_emit_ctx {
    ($code:ident, $confined_to:expr, $frozen:expr) => {{
        let ctx = $crate::diagnostics::context::DiagContext::capture($confined_to, $frozen);
        $crate::diagnostics::emit::emit_with_context(
            &$crate::diagnostics::$code,
            &ctx.format(),
        );
    }};
}
