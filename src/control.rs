//! Loop control: entering, skipping, and re-running loop bodies.
//!
//! A loop is the literal pair `2 3` up to the literal pair `2 4`. Entry and exit
//! are decided by the block actions of `3` and `4` after a command with residue
//! 2, so `6 3` can start skipping a body even though it is no open marker for
//! the scans. Bodies are re-run by walking the command stream again.


use std::io::Write;

use crate::code::{Command, LoopStart, Marker};
use crate::common::debug_println;
use crate::error::Error;
use crate::interpret::{After, Interpreter};
use crate::io::ByteSource;


impl<I: ByteSource, W: Write> Interpreter<I, W> {
    /// Loop entry: a zero guard cell starts skipping the body.
    pub(crate) fn loop_entry(&mut self) -> After {
        if self.tape.current() != 0 {
            return After::Remember;
        }
        debug_println!("guard is zero at cell {}, skipping loop body", self.tape.pointer());
        self.previous = None;
        self.skipping = true;
        After::Forget
    }

    /// Loop exit at the close whose `4` sits at `cursor`: re-run the body until
    /// the guard cell is zero.
    pub(crate) fn loop_exit(&mut self, cursor: usize) -> Result<After, Error> {
        let mut close = cursor;
        while self.tape.current() != 0 {
            match self.rerun_body(close)? {
                Some(next) => close = next,
                // the walk ran off the stream without meeting the close
                None => return Ok(After::Remember),
            }
        }
        self.previous = None;
        Ok(After::Forget)
    }

    /// Re-run the body of the loop enclosing `cursor` once.
    /// # Returns
    /// * `Some(index)` - The walk reached the loop's close marker at `index`.
    /// * `None` - The walk reached the end of the stream first.
    fn rerun_body(&mut self, cursor: usize) -> Result<Option<usize>, Error> {
        self.previous = None;
        let LoopStart { body, mut depth } = self.stream.loop_start(cursor);
        debug_println!("re-entering loop at command {} (close at {})", body, cursor);

        let end = self.stream.len();
        let mut skip_depth = 0;
        for index in body..end {
            match self.stream.marker_at(index) {
                Some(Marker::Close) if depth == 0 => return Ok(Some(index)),
                Some(Marker::Close) => depth -= 1,
                Some(Marker::Open) => depth += 1,
                None => {},
            }
            let command = self.stream[index];
            self.execute(command, index, &mut skip_depth)?;
        }
        Ok(None)
    }

    /// Skip-state bookkeeping: count nested open markers and stop at the close
    /// that brings the depth back below zero.
    pub(crate) fn skip(&mut self, command: Command, depth: &mut usize) {
        match self.previous.and_then(|previous| Marker::between(previous, command)) {
            Some(Marker::Close) if *depth == 0 => {
                debug_println!("loop body skipped");
                self.previous = None;
                self.skipping = false;
                return;
            },
            Some(Marker::Close) => *depth -= 1,
            Some(Marker::Open) => *depth += 1,
            None => {},
        }
        self.previous = Some(command);
    }
}
