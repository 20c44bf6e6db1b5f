// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Crash and exit hooks for the process-wide pipeline.
//!
//! [`register`] installs a handler for the fatal signals below plus a
//! process-exit hook, so that records already accepted by the pipeline
//! reach disk even when the process dies abnormally.
//!
//! The crash notice itself stays async-signal-safe: it is composed in a
//! stack buffer and written with a raw `write(2)` to stderr, bypassing the
//! console mutex entirely. A signal can land while another thread holds
//! that mutex; taking it here would hang the process in its final moments.
//! The flush that follows the notice is a best-effort attempt to save the
//! queued records and may itself be cut short by a wedged lock.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::errors::PipelineError;

/// Signals that route through the crash handler before the process exits.
const CRASH_SIGNALS: [Signal; 4] = [
    Signal::SIGSEGV,
    Signal::SIGABRT,
    Signal::SIGTERM,
    Signal::SIGINT,
];

static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Installs the crash signal handlers and the process-exit hook.
///
/// Called once when the process-wide pipeline starts. Subsequent calls are
/// no-ops so a restart attempt after a failed initialization cannot stack
/// duplicate hooks.
pub(crate) fn register() -> Result<(), PipelineError> {
    if REGISTERED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }

    let action = SigAction::new(
        SigHandler::Handler(handle_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in CRASH_SIGNALS {
        // SAFETY: `handle_signal` only performs async-signal-safe work
        // (stack-buffer formatting, raw write, atomics) before `_exit`.
        unsafe { signal::sigaction(signal, &action) }
            .map_err(PipelineError::RegisterCrashHandler)?;
    }

    // SAFETY: `shutdown_at_exit` is an `extern "C" fn()` with no unwind
    // path, as `atexit` requires.
    let rc = unsafe { libc::atexit(shutdown_at_exit) };
    if rc != 0 {
        return Err(PipelineError::RegisterExitHook);
    }
    Ok(())
}

extern "C" fn shutdown_at_exit() {
    crate::shutdown();
}

extern "C" fn handle_signal(signo: libc::c_int) {
    let mut buffer = [0u8; 64];
    let len = compose_notice(signo, &mut buffer);
    raw_write_stderr(&buffer[..len]);

    crate::shutdown();

    // `exit` would re-run the atexit hook; `_exit` leaves the kernel to
    // reclaim everything.
    unsafe { libc::_exit(exit_status(signo)) }
}

/// SIGINT is a user interrupt, not a failure.
fn exit_status(signo: libc::c_int) -> libc::c_int {
    if signo == libc::SIGINT {
        0
    } else {
        1
    }
}

/// Formats `\nCRASH: Signal {signo} ({name})\n` into `buffer` without
/// allocating, returning the number of bytes used.
fn compose_notice(signo: libc::c_int, buffer: &mut [u8; 64]) -> usize {
    let mut len = 0;
    push_bytes(buffer, &mut len, b"\nCRASH: Signal ");
    push_decimal(buffer, &mut len, signo);
    push_bytes(buffer, &mut len, b" (");
    push_bytes(buffer, &mut len, signal_name(signo).as_bytes());
    push_bytes(buffer, &mut len, b")\n");
    len
}

fn push_bytes(buffer: &mut [u8; 64], len: &mut usize, bytes: &[u8]) {
    for &byte in bytes {
        if *len >= buffer.len() {
            return;
        }
        buffer[*len] = byte;
        *len += 1;
    }
}

fn push_decimal(buffer: &mut [u8; 64], len: &mut usize, value: libc::c_int) {
    if value < 0 {
        push_bytes(buffer, len, b"-");
    }
    let mut digits = [0u8; 12];
    let mut count = 0;
    let mut remaining = value.unsigned_abs();
    loop {
        digits[count] = b'0' + (remaining % 10) as u8;
        count += 1;
        remaining /= 10;
        if remaining == 0 {
            break;
        }
    }
    while count > 0 {
        count -= 1;
        push_bytes(buffer, len, &digits[count..=count]);
    }
}

fn signal_name(signo: libc::c_int) -> &'static str {
    match signo {
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGABRT => "SIGABRT",
        libc::SIGTERM => "SIGTERM",
        libc::SIGINT => "SIGINT",
        _ => "UNKNOWN",
    }
}

/// Writes `bytes` to stderr with the raw syscall, retrying on `EINTR`.
/// Any other error is ignored; there is no safe way to report it here.
fn raw_write_stderr(bytes: &[u8]) {
    let mut written = 0;
    while written < bytes.len() {
        let remaining = &bytes[written..];
        let rc = unsafe {
            libc::write(
                libc::STDERR_FILENO,
                remaining.as_ptr().cast(),
                remaining.len(),
            )
        };
        if rc < 0 {
            if nix::errno::Errno::last() == nix::errno::Errno::EINTR {
                continue;
            }
            return;
        }
        written += rc as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice_for(signo: libc::c_int) -> String {
        let mut buffer = [0u8; 64];
        let len = compose_notice(signo, &mut buffer);
        String::from_utf8(buffer[..len].to_vec()).unwrap()
    }

    #[test]
    fn test_notice_names_known_signals() {
        assert_eq!(
            notice_for(libc::SIGSEGV),
            format!("\nCRASH: Signal {} (SIGSEGV)\n", libc::SIGSEGV)
        );
        assert_eq!(
            notice_for(libc::SIGABRT),
            format!("\nCRASH: Signal {} (SIGABRT)\n", libc::SIGABRT)
        );
        assert_eq!(
            notice_for(libc::SIGTERM),
            format!("\nCRASH: Signal {} (SIGTERM)\n", libc::SIGTERM)
        );
        assert_eq!(
            notice_for(libc::SIGINT),
            format!("\nCRASH: Signal {} (SIGINT)\n", libc::SIGINT)
        );
    }

    #[test]
    fn test_notice_falls_back_to_unknown() {
        assert_eq!(notice_for(99), "\nCRASH: Signal 99 (UNKNOWN)\n");
    }

    #[test]
    fn test_notice_fits_buffer() {
        let mut buffer = [0u8; 64];
        let len = compose_notice(libc::c_int::MAX, &mut buffer);
        assert!(len <= buffer.len());
        let text = String::from_utf8(buffer[..len].to_vec()).unwrap();
        assert!(text.ends_with(")\n"));
    }

    #[test]
    fn test_exit_status_spares_interrupts() {
        assert_eq!(exit_status(libc::SIGINT), 0);
        assert_eq!(exit_status(libc::SIGSEGV), 1);
        assert_eq!(exit_status(libc::SIGABRT), 1);
        assert_eq!(exit_status(libc::SIGTERM), 1);
    }

    #[test]
    fn test_push_decimal_renders_digits() {
        let mut buffer = [0u8; 64];
        let mut len = 0;
        push_decimal(&mut buffer, &mut len, 0);
        push_bytes(&mut buffer, &mut len, b" ");
        push_decimal(&mut buffer, &mut len, 11);
        push_bytes(&mut buffer, &mut len, b" ");
        push_decimal(&mut buffer, &mut len, 305);
        assert_eq!(&buffer[..len], b"0 11 305");
    }
}
