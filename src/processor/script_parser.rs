//! Parser that consumes the lexer and classifies one line into a `Line` AST.
//
//  Grammar (after upper-casing, `_` = optional Space token):
//
//      loop_start   ::= _ NUMBER _ "X" _ '{' ANY*
//      loop_end     ::= _ '}' ANY*
//      instruction  ::= _ frame_spec SPACE buttons [SPACE stick [SPACE stick]] ANY*
//      frame_spec   ::= ['+'] NUMBER ['-' NUMBER]
//      buttons      ::= (any non-Space token)+
//      stick        ::= ['-'] NUMBER ';' ['-'] NUMBER
//
//  Alternatives are tried in the order above; a line that matches none of
//  them is `Line::Ignore`. A stick only counts when it fills its whole
//  field, except for the last one matched, whose field may carry trailing
//  junk (the right stick is only looked for after a clean left stick).

use super::ast::{FrameSpec, InstructionLine, Line, RawStick};
use super::lexer::{Lexer, Token, TokenKind};

/// Classify one raw script line. Matching is case-insensitive.
pub fn parse_line(raw: &str) -> Line {
    let folded = raw.to_uppercase();
    let mut p = Parser::new(&folded);
    p.parse()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            tokens: Lexer::new(src).collect(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> Line {
        if let Some(repetitions) = self.attempt(Self::parse_loop_start) {
            return Line::LoopStart { repetitions };
        }
        if self.attempt(Self::parse_loop_end).is_some() {
            return Line::LoopEnd;
        }
        match self.attempt(Self::parse_instruction) {
            Some(instr) => Line::Instruction(instr),
            None => Line::Ignore,
        }
    }

    /// Run `rule` from the start of the line.
    fn attempt<T>(&mut self, rule: fn(&mut Self) -> Option<T>) -> Option<T> {
        self.pos = 0;
        rule(self)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn text(&self, token: &Token) -> &'a str {
        &self.src[token.span.clone()]
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        let token = self.peek().filter(|t| t.kind == kind)?.clone();
        self.pos += 1;
        Some(token)
    }

    fn skip_space(&mut self) {
        let _ = self.eat(TokenKind::Space);
    }

    fn at_field_end(&self) -> bool {
        self.peek().is_none_or(|t| t.kind == TokenKind::Space)
    }

    /// Unsigned integer that fits in `u64`; anything bigger fails the rule.
    fn number(&mut self) -> Option<u64> {
        let token = self.eat(TokenKind::Number)?;
        self.text(&token).parse().ok()
    }

    fn parse_loop_start(&mut self) -> Option<u64> {
        self.skip_space();
        let repetitions = self.number()?;
        self.skip_space();
        let x = self.eat(TokenKind::Word)?;
        if self.text(&x) != "X" {
            return None;
        }
        self.skip_space();
        self.eat(TokenKind::LBrace)?;
        Some(repetitions)
    }

    fn parse_loop_end(&mut self) -> Option<()> {
        self.skip_space();
        self.eat(TokenKind::RBrace)?;
        Some(())
    }

    fn parse_instruction(&mut self) -> Option<InstructionLine> {
        self.skip_space();
        let frames = self.parse_frame_spec()?;
        self.eat(TokenKind::Space)?;
        let buttons = self.parse_buttons()?;

        let left_stick = self.parse_stick_field();
        let right_stick = match left_stick {
            Some(_) if self.at_field_end() => self.parse_stick_field(),
            _ => None,
        };

        Some(InstructionLine {
            frames,
            buttons,
            left_stick,
            right_stick,
        })
    }

    fn parse_frame_spec(&mut self) -> Option<FrameSpec> {
        let offset = self.eat(TokenKind::Plus).is_some();
        let first = self.number()?;
        let second = match self.eat(TokenKind::Minus) {
            Some(_) => Some(self.number()?),
            None => None,
        };

        Some(if offset {
            FrameSpec::Offset {
                delta: first,
                count: second,
            }
        } else {
            FrameSpec::Absolute {
                start: first,
                end: second,
            }
        })
    }

    /// The whole next field, split on `;`.
    fn parse_buttons(&mut self) -> Option<Vec<String>> {
        let start = self.peek()?.span.start;
        let mut end = start;
        while !self.at_field_end() {
            end = self.tokens[self.pos].span.end;
            self.pos += 1;
        }
        if end == start {
            return None;
        }

        Some(
            self.src[start..end]
                .split(';')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// `SPACE stick`, leaving the cursor untouched when it doesn't match.
    fn parse_stick_field(&mut self) -> Option<RawStick> {
        let saved = self.pos;
        let stick = self
            .eat(TokenKind::Space)
            .and_then(|_| self.parse_stick());
        if stick.is_none() {
            self.pos = saved;
        }
        stick
    }

    fn parse_stick(&mut self) -> Option<RawStick> {
        let x = self.signed()?;
        self.eat(TokenKind::Semicolon)?;
        let y = self.signed()?;
        Some(RawStick { x, y })
    }

    fn signed(&mut self) -> Option<f64> {
        let negative = self.eat(TokenKind::Minus).is_some();
        let token = self.eat(TokenKind::Number)?;
        let magnitude: f64 = self.text(&token).parse().ok()?;
        Some(if negative { -magnitude } else { magnitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instr(
        frames: FrameSpec,
        buttons: &[&str],
        left_stick: Option<(f64, f64)>,
        right_stick: Option<(f64, f64)>,
    ) -> Line {
        let stick = |s: Option<(f64, f64)>| s.map(|(x, y)| RawStick { x, y });
        Line::Instruction(InstructionLine {
            frames,
            buttons: buttons.iter().map(|b| b.to_string()).collect(),
            left_stick: stick(left_stick),
            right_stick: stick(right_stick),
        })
    }

    fn abs(start: u64, end: Option<u64>) -> FrameSpec {
        FrameSpec::Absolute { start, end }
    }

    #[test]
    fn test_parse_loop_markers() {
        let test_cases = vec![
            ("3x{", Line::LoopStart { repetitions: 3 }),
            ("  10 X {", Line::LoopStart { repetitions: 10 }),
            ("0x{ 0 A }", Line::LoopStart { repetitions: 0 }),
            ("2x{ // twice", Line::LoopStart { repetitions: 2 }),
            ("}", Line::LoopEnd),
            ("\t} end of loop", Line::LoopEnd),
            ("2xy{", Line::Ignore),
            ("x{", Line::Ignore),
            ("-2x{", Line::Ignore),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "line: {input:?}");
        }
    }

    #[test]
    fn test_parse_frame_spec() {
        let test_cases = vec![
            ("5 A", instr(abs(5, None), &["A"], None, None)),
            ("5-7 A", instr(abs(5, Some(7)), &["A"], None, None)),
            (
                "5000000000 A",
                instr(abs(5_000_000_000, None), &["A"], None, None),
            ),
            ("   7-5 a", instr(abs(7, Some(5)), &["A"], None, None)),
            (
                "+2 B",
                instr(
                    FrameSpec::Offset {
                        delta: 2,
                        count: None,
                    },
                    &["B"],
                    None,
                    None,
                ),
            ),
            (
                "+0-4 zl",
                instr(
                    FrameSpec::Offset {
                        delta: 0,
                        count: Some(4),
                    },
                    &["ZL"],
                    None,
                    None,
                ),
            ),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "line: {input:?}");
        }
    }

    #[test]
    fn test_parse_buttons_and_sticks() {
        let test_cases = vec![
            (
                "0 a;b;;key_x",
                instr(abs(0, None), &["A", "B", "KEY_X"], None, None),
            ),
            (
                "0 NONE 300;-150",
                instr(abs(0, None), &["NONE"], Some((300.0, -150.0)), None),
            ),
            (
                "0 A -1;2 3;-4",
                instr(
                    abs(0, None),
                    &["A"],
                    Some((-1.0, 2.0)),
                    Some((3.0, -4.0)),
                ),
            ),
            // junk glued to the left stick hides the right one
            (
                "0 A 1;2junk 3;4",
                instr(abs(0, None), &["A"], Some((1.0, 2.0)), None),
            ),
            // no left stick, so no right stick either
            ("0 A junk 3;4", instr(abs(0, None), &["A"], None, None)),
            (
                "0 A 1;2 3;4 trailing comment",
                instr(abs(0, None), &["A"], Some((1.0, 2.0)), Some((3.0, 4.0))),
            ),
            ("0 A +1;2", instr(abs(0, None), &["A"], None, None)),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "line: {input:?}");
        }
    }

    #[test]
    fn test_parse_noise() {
        let test_cases = vec![
            "",
            "   ",
            "// press A then wait",
            "# comment",
            "5",
            "5 ",
            "5A",
            "5-x A",
            "+-3 A",
            "99999999999999999999 A",
            "A 5",
        ];

        for input in test_cases {
            assert_eq!(parse_line(input), Line::Ignore, "line: {input:?}");
        }
    }
}
