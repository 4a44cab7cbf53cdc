//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Scans a raw formula string and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. It handles
//! whitespace skipping, number parsing (including fractional parts and
//! exponents), and cell reference text like A1 or AA100.
//!
//! SUPPORTED TOKENS:
//! - Operators: + - * /
//! - Delimiters: ( )
//! - Numbers: 1, 2.5, .5, 1e308, 2E-3
//! - Cell references: a run of uppercase letters followed by digits

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Asterisk,
            Some('/') => Token::Slash,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,

            // Handle Numbers (starts with digit or dot)
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.read_number(ch),

            // Handle cell references (starts with an uppercase letter)
            Some(ch) if ch.is_ascii_uppercase() => self.read_cell_ref(ch),

            // End of input
            None => Token::EOF,

            // Unknown character (lowercase letters land here too)
            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    fn read_number(&mut self, first_char: char) -> Token {
        let mut number_str = String::from(first_char);
        let mut has_dot = first_char == '.';

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.input.next();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                number_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        // Optional exponent: e or E, an optional sign, then digits.
        // Inside a number "2E3" is an exponent, not a reference to cell E3.
        if let Some(&ch) = self.input.peek() {
            if ch == 'e' || ch == 'E' {
                number_str.push(ch);
                self.input.next();
                if let Some(&sign) = self.input.peek() {
                    if sign == '+' || sign == '-' {
                        number_str.push(sign);
                        self.input.next();
                    }
                }
                while let Some(&digit) = self.input.peek() {
                    if !digit.is_ascii_digit() {
                        break;
                    }
                    number_str.push(digit);
                    self.input.next();
                }
            }
        }

        if let Ok(n) = number_str.parse::<f64>() {
            Token::Number(n)
        } else {
            // Fallback if parsing fails (e.g. "." or "1e" with no digits)
            Token::Illegal(first_char)
        }
    }

    /// Reads cell reference text: uppercase letters, then any trailing
    /// letters/digits. Whether the text names a real grid position is
    /// decided later by Position::from_string, not here.
    fn read_cell_ref(&mut self, first_char: char) -> Token {
        let mut reference = String::from(first_char);

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
                reference.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        Token::CellRef(reference)
    }
}
