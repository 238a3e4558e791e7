//! Checks function bodies on several threads.
//!
//! The signature table is built and the globals are checked before any
//! worker starts. Workers share both by reference and send their
//! diagnostics back over a channel; the merged list is sorted, so the
//! result does not depend on scheduling.

use std::thread;

use crossbeam_channel::unbounded;
use tracing::debug;

use crate::config::CheckConfig;
use crate::diagnostics::{sort_diagnostics, Diagnostic};
use crate::parser::ast::Program;
use crate::span::LineIndex;

use super::{check_function, check_globals, collect_signatures};

pub fn check_program_parallel(program: &Program, lines: &LineIndex, config: &CheckConfig) -> Vec<Diagnostic> {
    let table = collect_signatures(program, config.builtins);
    let (globals, mut diagnostics) = check_globals(program, &table, lines);

    let jobs = config.jobs.max(1).min(program.functions.len().max(1));
    let chunk_size = program.functions.len().div_ceil(jobs).max(1);
    debug!(jobs, functions = program.functions.len(), "parallel check");

    let (tx, rx) = unbounded::<Vec<Diagnostic>>();
    thread::scope(|s| {
        for chunk in program.functions.chunks(chunk_size) {
            let tx = tx.clone();
            let table = &table;
            let globals = &globals;
            s.spawn(move || {
                let mut found = Vec::new();
                for func in chunk {
                    found.extend(check_function(&func.node, table, globals, lines));
                }
                // The receiver outlives the scope.
                let _ = tx.send(found);
            });
        }
    });
    drop(tx);

    for batch in rx.iter() {
        diagnostics.extend(batch);
    }
    sort_diagnostics(&mut diagnostics);
    diagnostics
}
