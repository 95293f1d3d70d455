//! The Sequence interpreter.


use std::io::{BufRead, Write};

use crate::code::{normalize, split_line, Action, Command, CommandStream};
use crate::common::debug_println;
use crate::error::Error;
use crate::io::{ByteSource, CharOutput};
use crate::tape::{Direction, Tape};


/// Line breaks besides `\n` and `\r\n`.
fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}


/// How a basic action is run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Pass {
    /// Only the priming actions (increment, move right) fire.
    Priming,
    /// All four actions fire.
    Last,
}

/// What happens to the previous-command register after a block action.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum After {
    /// Remember the current command.
    Remember,
    /// The action cleared the register; leave it empty.
    Forget,
}


/// Interpreter state: the tape, the command stream read so far, the
/// previous-command register, the skip state and the I/O adapters.
///
/// Every line is tokenized, appended to the stream and executed immediately.
/// Loop bodies are re-run from the stream when a loop close is reached.
pub struct Interpreter<I, W> {
    pub(crate) tape: Tape,
    pub(crate) stream: CommandStream,
    pub(crate) previous: Option<Command>,
    pub(crate) skipping: bool,
    skip_depth: usize,
    line: usize,
    input: I,
    output: CharOutput<W>,
}

impl<I: ByteSource, W: Write> Interpreter<I, W> {
    pub fn new(input: I, output: W) -> Self {
        Self {
            tape: Tape::new(),
            stream: CommandStream::new(),
            previous: None,
            skipping: false,
            skip_depth: 0,
            line: 0,
            input,
            output: CharOutput::new(output),
        }
    }

    /// Read a program line by line and execute it.
    /// # Arguments
    /// * `program` - The program source.
    /// # Example
    /// ```
    /// use sequencer::{Interpreter, RawInput};
    ///
    /// // read one byte (`4 3`), then write it back (`4 4`)
    /// let mut interpreter = Interpreter::new(RawInput::new(&b"A"[..]), Vec::new());
    /// interpreter.run_str("4 3\n4 4").unwrap();
    ///
    /// assert_eq!(interpreter.into_output().unwrap(), b"A");
    /// ```
    pub fn run<R: BufRead>(&mut self, mut program: R) -> Result<(), Error> {
        // whitespace-only lines only count when a later line has a token
        let mut blank_lines = Vec::new();
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if program.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&buffer);
            let text = text.strip_suffix('\n').unwrap_or(&text);
            let text = text.strip_suffix('\r').unwrap_or(text);

            for line in text.split(is_line_break) {
                if line.trim().is_empty() {
                    blank_lines.push(line.to_owned());
                    continue;
                }
                for blank in blank_lines.drain(..) {
                    self.read_line(&blank)?;
                }
                self.read_line(line)?;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    /// Execute a program held in memory.
    pub fn run_str(&mut self, program: &str) -> Result<(), Error> {
        self.run(program.as_bytes())
    }

    /// Tokenize and execute one source line, then terminate it.
    pub fn read_line(&mut self, line: &str) -> Result<(), Error> {
        self.line += 1;
        let tokens = split_line(line);
        debug_println!("line {}: {:?}", self.line, tokens);

        for token in tokens {
            let command = normalize(token);
            let cursor = self.stream.push(command);
            let mut depth = self.skip_depth;
            self.execute(command, cursor, &mut depth)?;
            self.skip_depth = depth;
        }

        self.stream.push(Command::NOP);
        self.previous = None;
        Ok(())
    }

    /// Execute the command at `cursor` of the stream.
    /// While a loop is being skipped only the bracket depth is tracked.
    pub(crate) fn execute(&mut self, command: Command, cursor: usize, skip_depth: &mut usize) -> Result<(), Error> {
        if self.skipping {
            self.skip(command, skip_depth);
            return Ok(());
        }

        self.basic(command, Pass::Priming);
        if self.block(command, cursor)? == After::Remember {
            self.previous = Some(command);
        }
        Ok(())
    }

    /// Run the basic action selected by the command's residue.
    fn basic(&mut self, command: Command, pass: Pass) {
        match command.action() {
            Some(Action::Increment) => self.tape.add(1),
            Some(Action::Decrement) if pass == Pass::Last => self.tape.add(-1),
            Some(Action::Right) => self.tape.shift(Direction::Right),
            Some(Action::Left) if pass == Pass::Last => self.tape.shift(Direction::Left),
            _ => {},
        }
    }

    /// Run the action selected by the current command combined with the
    /// residue of the previous one.
    fn block(&mut self, command: Command, cursor: usize) -> Result<After, Error> {
        let previous = match self.previous {
            Some(previous) if !previous.is_nop() && !command.is_nop() => previous,
            _ => return Ok(After::Remember),
        };

        match command.value() {
            0 => {
                self.previous = None;
                return Ok(After::Forget);
            },
            1 => self.basic(previous, Pass::Priming),
            2 => self.basic(previous, Pass::Last),
            3 => match previous.residue() {
                1 => self.tape.copy(Direction::Left),
                2 => return Ok(self.loop_entry()),
                3 => self.tape.add_from(Direction::Left),
                _ => self.read_input()?,
            },
            4 => match previous.residue() {
                1 => self.tape.copy(Direction::Right),
                2 => return self.loop_exit(cursor),
                3 => self.tape.add_from(Direction::Right),
                _ => self.output.write_char(self.tape.current())?,
            },
            count => self.repeat(previous, count),
        }
        Ok(After::Remember)
    }

    /// Run the previous command's basic action `count` times in last mode.
    fn repeat(&mut self, previous: Command, count: u64) {
        match previous.action() {
            // additions only matter modulo 256
            Some(Action::Increment) => self.tape.add((count % 256) as i64),
            Some(Action::Decrement) => self.tape.add(-((count % 256) as i64)),
            _ => {
                for _ in 0..count {
                    self.basic(previous, Pass::Last);
                }
            },
        }
    }

    fn read_input(&mut self) -> Result<(), Error> {
        // make pending output visible before blocking on input
        self.output.flush()?;
        if let Some(byte) = self.input.try_read_byte()? {
            self.tape.set(byte);
        }
        Ok(())
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn stream(&self) -> &CommandStream {
        &self.stream
    }

    /// The previous-command register.
    pub fn previous(&self) -> Option<Command> {
        self.previous
    }

    /// Whether a loop body is currently being skipped.
    pub fn is_skipping(&self) -> bool {
        self.skipping
    }

    /// Number of source lines read so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    pub fn output(&self) -> &W {
        self.output.get_ref()
    }

    /// Flush and return the output writer.
    pub fn into_output(mut self) -> Result<W, Error> {
        self.output.flush()?;
        Ok(self.output.into_inner())
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::RawInput;

    fn run<'a>(program: &str, input: &'a [u8]) -> Interpreter<RawInput<&'a [u8]>, Vec<u8>> {
        let mut interpreter = Interpreter::new(RawInput::new(input), Vec::new());
        interpreter.run_str(program).unwrap();
        interpreter
    }

    #[test]
    fn test_basic_priming_actions() {
        // increment, then move right
        let interpreter = run("1\n3", b"");
        assert_eq!(interpreter.tape()[2], 1);
        assert_eq!(interpreter.tape().pointer(), 3);
    }

    #[test]
    fn test_conditional_actions_need_last_mode() {
        // residues 2 and 4 alone do nothing
        let interpreter = run("2\n4\n6\n8", b"");
        assert_eq!(interpreter.tape().to_string(), "0 0 [0] 0 0");
    }

    #[test]
    fn test_repeat_previous() {
        // "1 1": +1, then +1 and the previous +1 again
        assert_eq!(run("1 1", b"").tape().current(), 3);
        // "4 2": previous move left in last mode
        assert_eq!(run("4 2", b"").tape().pointer(), 1);
        // "2 2": previous decrement in last mode
        assert_eq!(run("2 2", b"").tape().current(), 255);
    }

    #[test]
    fn test_repeat_count() {
        // "1 5": +1, then 5 (residue 1) adds one, then repeats "1" five times
        assert_eq!(run("1 5", b"").tape().current(), 7);
        // "3 6": right, then 6 repeats the move right six times
        let interpreter = run("3 6", b"");
        assert_eq!(interpreter.tape().pointer(), 9);
        assert_eq!(interpreter.tape().len(), 10);
        // "2 300": 300 has residue 4 and does nothing itself, 300 decrements wrap
        assert_eq!(run("2 300", b"").tape().current(), 212);
    }

    #[test]
    fn test_copy_and_add_neighbours() {
        // set 3, copy it into the cell to the right with "1 3"
        let interpreter = run("1 1\n3\n1 3", b"");
        assert_eq!(interpreter.tape()[2], 3);
        // "1" adds one to cell 3, then "3" moves right to cell 4 and copies cell 3
        assert_eq!(interpreter.tape().pointer(), 4);
        assert_eq!(interpreter.tape().current(), 1);

        // cell 3 = 1, back to cell 2, then "3 3": right twice and add the left neighbour
        let interpreter = run("3\n1\n4 2\n3 3", b"");
        assert_eq!(interpreter.tape().pointer(), 4);
        assert_eq!(interpreter.tape().current(), 1);
        assert_eq!(interpreter.tape()[3], 1);

        // "3 4": right, then add the right neighbour, extending the tape
        let interpreter = run("3\n3\n3 4", b"");
        assert_eq!(interpreter.tape().pointer(), 5);
        assert_eq!(interpreter.tape().len(), 7);
    }

    #[test]
    fn test_echo_one_byte() {
        let interpreter = run("4 3\n4 4", b"A");
        assert_eq!(interpreter.tape().current(), b'A');
        assert_eq!(interpreter.output(), b"A");
    }

    #[test]
    fn test_read_without_input_keeps_cell() {
        let interpreter = run("1\n4 3", b"");
        assert_eq!(interpreter.tape().current(), 0);
        assert_eq!(interpreter.tape()[2], 1);
    }

    #[test]
    fn test_line_resets_previous() {
        // a block command opening a line is only its basic action
        let interpreter = run("1\n1", b"");
        assert_eq!(interpreter.tape().current(), 2);
        let interpreter = run("4\n4", b"");
        assert!(interpreter.output().is_empty());
        assert_eq!(interpreter.previous(), None);
    }

    #[test]
    fn test_empty_token_breaks_combination() {
        // the empty token between the two ones is a no-op command
        let interpreter = run("1  1", b"");
        assert_eq!(interpreter.tape().current(), 2);
    }

    #[test]
    fn test_stream_terminates_lines() {
        let interpreter = run("1 .. x\n\n3 007", b"");
        assert_eq!(interpreter.stream().to_string(), "1 2 0 0 0 0 3 7 0");
        assert_eq!(interpreter.lines_read(), 3);
    }

    #[test]
    fn test_trailing_blank_lines_are_not_read() {
        let interpreter = run("1\n\n   \n", b"");
        assert_eq!(interpreter.stream().to_string(), "1 0");
        let interpreter = run("1\n  \n1", b"");
        assert_eq!(interpreter.stream().to_string(), "1 0 0 1 0");
    }

    #[test]
    fn test_lone_carriage_return_ends_line() {
        let interpreter = run("1\r1", b"");
        assert_eq!(interpreter.tape().current(), 2);
        assert_eq!(interpreter.stream().to_string(), "1 0 1 0");
        let interpreter = run("1\u{2028}1\r\n1\r", b"");
        assert_eq!(interpreter.tape().current(), 3);
        assert_eq!(interpreter.lines_read(), 3);
    }

    #[test]
    fn test_malformed_tokens_are_no_ops() {
        let interpreter = run("abc 12x -1 !", b"");
        assert_eq!(interpreter.tape(), &Tape::new());
    }

    #[test]
    fn test_output_encodes_code_point() {
        // 255 via "2 2" then output with "4 4"
        let interpreter = run("2 2\n4 4", b"");
        assert_eq!(interpreter.into_output().unwrap(), "ÿ".as_bytes());
    }
}
