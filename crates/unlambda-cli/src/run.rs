//! Assembles a heap, a parsed program, and a machine, and drives one
//! interpreter run to completion. Kept separate from `main.rs` so the flag
//! parsing and exit-code machinery don't get tangled up with the actual
//! work.

use std::fs::File;
use std::io::{self, Read};
use std::time::Instant;

use unlambda_eval::Machine;
use unlambda_heap::{Heap, HeapConfig};

use crate::config::{RunConfig, Source};
use crate::error::{CliError, Result};
use crate::io::StdIo;

pub fn run(config: &RunConfig) -> Result<()> {
    let mut heap = Heap::new(HeapConfig::default())?;

    let wall = match &config.source {
        Source::File(path) => {
            let file = File::open(path).map_err(|e| CliError::SourceFile {
                path: path.display().to_string(),
                source: e,
            })?;
            let (root, atoms) = unlambda_parser::parse(file, &mut heap)?;
            let io = StdIo::new(io::stdin().lock(), io::stdout(), config.unbuffered);
            let mut machine = Machine::new(&mut heap, io, atoms.i, atoms.v);
            let start = Instant::now();
            machine.run(root)?;
            start.elapsed()
        }
        Source::Stdin => {
            let stdin = io::stdin();
            let mut lock = stdin.lock();
            let (root, atoms) = unlambda_parser::parse(&mut lock, &mut heap)?;
            discard_rest_of_line(&mut lock);
            let io = StdIo::new(lock, io::stdout(), config.unbuffered);
            let mut machine = Machine::new(&mut heap, io, atoms.i, atoms.v);
            let start = Instant::now();
            machine.run(root)?;
            start.elapsed()
        }
    };

    if config.verbosity.prints_stats() {
        let stats = heap.stats();
        let gc_time = stats.total_gc_time;
        let eval_time = wall.saturating_sub(gc_time);
        eprintln!("  total eval time --- {:.6} sec.", eval_time.as_secs_f64());
        eprintln!("  total gc time   --- {:.6} sec.", gc_time.as_secs_f64());
        eprintln!("  major gc count  --- {}", stats.major_gc_count);
        eprintln!("  minor gc count  --- {}", stats.minor_gc_count);
    }

    Ok(())
}

/// Drain bytes up to and including the next newline (or EOF), so a program
/// read from standard input doesn't leave its own trailing source text for
/// `@`/`?`/`|` to see as the first bytes of "user input".
fn discard_rest_of_line(reader: &mut impl Read) {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(_) if buf[0] == b'\n' => return,
            Ok(_) => continue,
        }
    }
}
