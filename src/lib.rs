//! An interpreter for Sequence, an esoteric language whose programs are lines
//! of whitespace-separated tokens driving a byte tape.
//!
//! Each token is normalized to an ordinal: a number token is its value, a token
//! starting with a dot is its count of dots, anything else is `0`. A command
//! does a basic action chosen by `value mod 4` (increment, decrement, move
//! right, move left) and a block action chosen by its value together with the
//! previous command (repeat, copy, add a neighbour, loops, input, output).

pub mod code;
pub mod common;
mod control;
pub mod error;
pub mod interpret;
pub mod io;
pub mod tape;



#[doc(inline)]
pub use code::*;

#[doc(inline)]
pub use common::{debug_enabled, set_debug};

#[doc(inline)]
pub use error::*;

#[doc(inline)]
pub use interpret::*;

#[doc(inline)]
pub use io::*;

#[doc(inline)]
pub use tape::*;
