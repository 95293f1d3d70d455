//! Tokenization of source lines and the command stream.


use std::fmt;
use std::ops::Index;


/// A normalized source token.
///
/// Every token becomes a non-negative ordinal. Decoding mostly looks at the
/// residue (`value mod 4`, with 0 mapped to 4); the repeat action and the loop
/// markers look at the raw value. Values too large for `u64` saturate, but the
/// residue is always taken from the exact decimal digits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Command {
    value: u64,
    residue: u8,
}

/// The four basic actions selected by a command's residue.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Increment, // residue 1
    Decrement, // residue 2, last mode only
    Right,     // residue 3
    Left,      // residue 4, last mode only
}

impl Command {
    /// The no-op ordinal, also used as the line terminator.
    pub const NOP: Command = Command { value: 0, residue: 4 };

    pub const fn new(value: u64) -> Self {
        let residue = match value % 4 {
            0 => 4,
            r => r as u8,
        };
        Self { value, residue }
    }

    /// Build a command from a string of ASCII digits of any length.
    /// Returns `None` if the string is empty or contains anything else.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value = digits.bytes().fold(0_u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        });
        // 100 is divisible by 4, so the last two digits decide the residue
        let tail = digits.bytes().rev().take(2).rev().fold(0_u8, |acc, b| acc * 10 + (b - b'0'));
        let residue = match tail % 4 {
            0 => 4,
            r => r,
        };
        Some(Self { value, residue })
    }

    /// Raw ordinal value.
    pub fn value(self) -> u64 {
        self.value
    }

    /// `value mod 4` in the range `1..=4`.
    pub fn residue(self) -> u8 {
        self.residue
    }

    pub fn is_nop(self) -> bool {
        self.value == 0
    }

    /// Whether this is literally the ordinal `n` (not merely congruent to it).
    pub fn is(self, n: u64) -> bool {
        self.value == n
    }

    /// The basic action for this command, `None` for the no-op.
    pub fn action(self) -> Option<Action> {
        if self.is_nop() {
            return None;
        }
        Some(match self.residue {
            1 => Action::Increment,
            2 => Action::Decrement,
            3 => Action::Right,
            _ => Action::Left,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}


/// Normalize a raw source token to its ordinal command.
///
/// * empty token: `0`
/// * starts with `.`: the number of dots anywhere in the token
/// * starts with a digit: the token's integer value (`0` if it is not all digits)
/// * anything else: `0`
pub fn normalize(token: &str) -> Command {
    match token.chars().next() {
        Some('.') => Command::new(token.matches('.').count() as u64),
        Some(c) if c.is_ascii_digit() => Command::from_digits(token).unwrap_or(Command::NOP),
        _ => Command::NOP,
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Split one source line into raw tokens.
///
/// Every single whitespace character separates, so runs of whitespace yield
/// empty tokens. Trailing empty tokens are dropped, except that a line with no
/// separator at all is always one token.
pub fn split_line(line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = line.split(is_separator).collect();
    if tokens.len() > 1 {
        while tokens.last().is_some_and(|token| token.is_empty()) {
            tokens.pop();
        }
    }
    tokens
}


/// Loop boundary markers: the literal pairs `2 3` (open) and `2 4` (close).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Marker {
    Open,
    Close,
}

impl Marker {
    /// The marker formed by `previous` followed by `current`, if any.
    /// Only the literal ordinal `2` counts; `6`, `10`, ... do not.
    pub fn between(previous: Command, current: Command) -> Option<Self> {
        if !previous.is(2) {
            return None;
        }
        if current.is(3) {
            Some(Marker::Open)
        } else if current.is(4) {
            Some(Marker::Close)
        } else {
            None
        }
    }
}


/// Where re-execution of a loop body starts, as seen from some position.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LoopStart {
    /// Index of the first command of the body.
    pub body: usize,
    /// Close markers the body walk must pass before the one that ends the loop.
    /// Non-zero only when no open marker was found.
    pub depth: usize,
}


/// Append-only sequence of commands, one per token plus a `0` after every line.
///
/// While commands are appended the stream matches loop markers with a stack
/// and records, for every position, the loop that encloses it. That is the
/// answer a backward scan from that position would give: walking back, each
/// close pair raises a counter, each open pair lowers it or, at zero, is the
/// start. When no open pair is found the body starts at the beginning of the
/// stream and the leftover counter is carried as [`LoopStart::depth`].
#[derive(Clone, Debug, Default)]
pub struct CommandStream {
    commands: Vec<Command>,
    scopes: Vec<LoopStart>,
    open: Vec<usize>,
    unmatched_closes: usize,
}

impl CommandStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command and return its index.
    pub fn push(&mut self, command: Command) -> usize {
        let index = self.commands.len();
        // the scope of a position excludes the pair that ends on it
        self.scopes.push(self.enclosing());
        match self.commands.last().and_then(|&previous| Marker::between(previous, command)) {
            Some(Marker::Open) => self.open.push(index + 1),
            Some(Marker::Close) => {
                if self.open.pop().is_none() {
                    self.unmatched_closes += 1;
                }
            },
            None => {},
        }
        self.commands.push(command);
        index
    }

    fn enclosing(&self) -> LoopStart {
        match self.open.last() {
            Some(&body) => LoopStart { body, depth: 0 },
            None => LoopStart { body: 0, depth: self.unmatched_closes },
        }
    }

    /// Start of the loop enclosing the command at `cursor`.
    pub fn loop_start(&self, cursor: usize) -> LoopStart {
        self.scopes.get(cursor).copied().unwrap_or_else(|| self.enclosing())
    }

    /// The marker whose second command sits at `index`, if any.
    pub fn marker_at(&self, index: usize) -> Option<Marker> {
        if index == 0 || index >= self.commands.len() {
            return None;
        }
        Marker::between(self.commands[index - 1], self.commands[index])
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Index<usize> for CommandStream {
    type Output = Command;

    fn index(&self, index: usize) -> &Self::Output {
        &self.commands[index]
    }
}

impl fmt::Display for CommandStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    fn stream_of(values: &[u64]) -> CommandStream {
        let mut stream = CommandStream::new();
        for &value in values {
            stream.push(Command::new(value));
        }
        stream
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), Command::NOP);
        assert_eq!(normalize("..."), Command::new(3));
        assert_eq!(normalize(".a.b.."), Command::new(4));
        assert_eq!(normalize("."), Command::new(1));
        assert_eq!(normalize("42"), Command::new(42));
        assert_eq!(normalize("007"), Command::new(7));
        assert_eq!(normalize("hello"), Command::NOP);
        assert_eq!(normalize("a..."), Command::NOP);
        assert_eq!(normalize("12abc"), Command::NOP);
        assert_eq!(normalize("-3"), Command::NOP);
    }

    #[test]
    fn test_digits_keep_their_value() {
        for value in [0_u64, 1, 2, 3, 4, 5, 17, 255, 1_000_000] {
            let command = normalize(&value.to_string());
            assert_eq!(command.value(), value);
            assert_eq!(command.to_string(), value.to_string());
        }
    }

    #[test]
    fn test_huge_digits_keep_residue() {
        let command = normalize("123456789012345678901234567890");
        assert_eq!(command.value(), u64::MAX);
        assert_eq!(command.residue(), 2);
        assert_eq!(normalize("99999999999999999999999").residue(), 3);
        assert_eq!(normalize("100000000000000000000000").residue(), 4);
    }

    #[test]
    fn test_residue_and_action() {
        assert_eq!(Command::new(1).action(), Some(Action::Increment));
        assert_eq!(Command::new(6).action(), Some(Action::Decrement));
        assert_eq!(Command::new(7).action(), Some(Action::Right));
        assert_eq!(Command::new(8).action(), Some(Action::Left));
        assert_eq!(Command::new(8).residue(), 4);
        assert_eq!(Command::NOP.action(), None);
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("1 2 3"), vec!["1", "2", "3"]);
        assert_eq!(split_line("1  2"), vec!["1", "", "2"]);
        assert_eq!(split_line(" 1\t2 "), vec!["", "1", "2"]);
        assert_eq!(split_line(""), vec![""]);
        assert_eq!(split_line("   "), Vec::<&str>::new());
    }

    #[test]
    fn test_markers_are_literal() {
        assert_eq!(Marker::between(Command::new(2), Command::new(3)), Some(Marker::Open));
        assert_eq!(Marker::between(Command::new(2), Command::new(4)), Some(Marker::Close));
        assert_eq!(Marker::between(Command::new(6), Command::new(3)), None);
        assert_eq!(Marker::between(Command::new(2), Command::new(7)), None);
        assert_eq!(Marker::between(Command::new(2), Command::new(8)), None);
    }

    #[test]
    fn test_loop_start_nested() {
        let stream = stream_of(&[1, 2, 3, 1, 2, 3, 1, 2, 4, 2, 4]);
        // inner close at 8 belongs to the open ending at 5
        assert_eq!(stream.loop_start(8), LoopStart { body: 6, depth: 0 });
        // outer close at 10 skips the inner pair and finds the open ending at 2
        assert_eq!(stream.loop_start(10), LoopStart { body: 3, depth: 0 });
        assert_eq!(stream.marker_at(2), Some(Marker::Open));
        assert_eq!(stream.marker_at(10), Some(Marker::Close));
        assert_eq!(stream.marker_at(0), None);
    }

    #[test]
    fn test_loop_start_unmatched() {
        let stream = stream_of(&[1, 2, 4, 0, 2, 4, 1, 2, 4]);
        assert_eq!(stream.loop_start(8), LoopStart { body: 0, depth: 2 });
        assert_eq!(stream.loop_start(5), LoopStart { body: 0, depth: 1 });
    }

    #[test]
    fn test_stream_display() {
        let stream = stream_of(&[1, 2, 0, 5]);
        assert_eq!(stream.to_string(), "1 2 0 5");
        assert_eq!(stream.len(), 4);
        assert_eq!(stream[3], Command::new(5));
    }
}
