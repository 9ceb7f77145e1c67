// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The diagnostic and abort sink.
//!
//! This is the only place in the crate with an irreversible side effect.
//! Checkpoints return [`GuardResult`]; hosts propagate it with `?` up to one
//! termination point ([`terminate_on`] or [`run_guarded`]), and that point is
//! where the process ends. Tests stop one level short and inspect the `Err`.
//!
//! Termination uses [`std::process::abort`]: no unwinding, no destructors, no
//! `atexit` hooks, no flushing of buffered host output. The exit status is
//! abnormal (SIGABRT on Unix).

use std::io::{self, Write};

use crate::invariant::GuardResult;
use crate::report::{DiagnosticFormat, Violation};

/// Write exactly one diagnostic line for `violation` to `out`.
pub fn emit<W: Write>(out: &mut W, violation: &Violation, format: DiagnosticFormat) -> io::Result<()> {
    writeln!(out, "{}", format.render(violation))?;
    out.flush()
}

/// Report `violation` on stderr and abort the process.
pub fn abort_with(violation: &Violation, format: DiagnosticFormat) -> ! {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    // A closed stderr must not keep the process alive.
    let _ = emit(&mut handle, violation, format);
    std::process::abort()
}

/// Unwrap a guarded result, aborting on violation.
pub fn terminate_on<T>(result: GuardResult<T>) -> T {
    terminate_on_with(result, DiagnosticFormat::Text)
}

pub fn terminate_on_with<T>(result: GuardResult<T>, format: DiagnosticFormat) -> T {
    match result {
        Ok(value) => value,
        Err(violation) => abort_with(&violation, format),
    }
}

/// Run a guarded host computation; the single termination point for it.
pub fn run_guarded<T>(host: impl FnOnce() -> GuardResult<T>) -> T {
    terminate_on(host())
}
